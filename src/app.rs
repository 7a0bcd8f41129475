use crate::config::Config;
use crate::controller::Phase;
use crate::display::DisplayContent;
use crate::events::DisplayUpdate;
use crate::language::LanguageCode;
use crate::models::Coordinate;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Steps the cursor can cycle through with `+`/`-`, in degrees.
const CURSOR_STEPS: &[f64] = &[0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0];

/// What a key press asks the pipeline to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Select(Coordinate),
    ChangeLanguage(LanguageCode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub at: Coordinate,
    pub label: Option<String>,
}

pub struct App {
    pub cursor: Coordinate,
    pub cursor_step: f64,
    pub language: LanguageCode,
    pub pin: Option<Pin>,
    pub content: DisplayContent,
    pub phase: Phase,
    pub max_extract_chars: usize,
    pub tick_count: usize,
    pub should_quit: bool,
    pub last_update: Option<DateTime<Local>>,
}

impl App {
    pub fn new(config: &Config, home: Coordinate) -> Self {
        Self {
            cursor: home,
            cursor_step: config.map.cursor_step.abs().max(CURSOR_STEPS[0]),
            language: config.language.initial,
            pin: None,
            content: DisplayContent::Welcome,
            phase: Phase::Idle,
            max_extract_chars: config.language.max_extract_chars,
            tick_count: 0,
            should_quit: false,
            last_update: None,
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
    }

    /// Applies a pipeline write. The pin slot holds one pin at most.
    pub fn apply(&mut self, update: DisplayUpdate) {
        match update {
            DisplayUpdate::RemovePin => self.pin = None,
            DisplayUpdate::SetPin { at, label } => self.pin = Some(Pin { at, label }),
            DisplayUpdate::Content(content) => {
                if content.is_terminal() {
                    self.last_update = Some(Local::now());
                }
                self.content = content;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            self.cursor_step * 5.0
        } else {
            self.cursor_step
        };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(step, 0.0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(-step, 0.0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0.0, -step),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0.0, step),
            KeyCode::Char('+') | KeyCode::Char('=') => self.change_step(true),
            KeyCode::Char('-') => self.change_step(false),
            KeyCode::Enter | KeyCode::Char(' ') => return Some(Action::Select(self.cursor)),
            KeyCode::Char(']') => {
                self.language = self.language.next();
                return Some(Action::ChangeLanguage(self.language));
            }
            KeyCode::Char('[') => {
                self.language = self.language.prev();
                return Some(Action::ChangeLanguage(self.language));
            }
            _ => {}
        }
        None
    }

    fn move_cursor(&mut self, d_lat: f64, d_lon: f64) {
        self.cursor = Coordinate::clamped(self.cursor.latitude() + d_lat, self.cursor.longitude() + d_lon);
    }

    fn change_step(&mut self, bigger: bool) {
        let next = if bigger {
            CURSOR_STEPS.iter().copied().find(|s| *s > self.cursor_step)
        } else {
            CURSOR_STEPS.iter().rev().copied().find(|s| *s < self.cursor_step)
        };
        if let Some(step) = next {
            self.cursor_step = step;
        }
    }
}
