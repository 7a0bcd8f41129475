//! TUI rendering for WikiLoc
//!
//! This module handles all UI rendering logic using the `ratatui` crate: the
//! world map with crosshair and pin, the language panel, the summary panel
//! and the status line.

use crate::app::App;
use crate::display::DisplayContent;
use crate::language::LanguageCode;
use ratatui::{
    prelude::*,
    widgets::{canvas::*, *},
};

/// Renders one frame of the TUI based on current application state.
///
/// Map on the left (65%), language + summary panels on the right, a one-line
/// key help/status bar at the bottom.
pub fn render(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.size());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[0]);

    render_map(f, app, chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(chunks[1]);

    render_language_panel(f, app.language, side[0]);
    render_content_panel(f, app, side[1]);
    render_status_line(f, app, rows[1]);
}

/// World map with the cursor crosshair and the single pin.
fn render_map(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(" World │ {} │ step {}° ", app.cursor, app.cursor_step);
    let canvas = Canvas::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::Rgb(60, 90, 60),
                resolution: MapResolution::High,
            });
            ctx.layer();

            if let Some(pin) = &app.pin {
                let label = pin.label.as_deref().unwrap_or("…");
                ctx.print(
                    pin.at.longitude(),
                    pin.at.latitude(),
                    Line::from(vec![
                        Span::styled(
                            "📍",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(" {} ", label),
                            Style::default().fg(Color::Black).bg(Color::Yellow),
                        ),
                    ]),
                );
            }

            // Blink the crosshair so it stays visible on top of the pin.
            let crosshair = if app.tick_count % 6 < 4 { "⌖" } else { "+" };
            ctx.print(
                app.cursor.longitude(),
                app.cursor.latitude(),
                Line::from(Span::styled(
                    crosshair,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
            );
        });

    f.render_widget(canvas, area);
}

fn render_language_panel(f: &mut Frame, language: LanguageCode, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(" ◀ [ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                language.display_name(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ] ▶", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            format!(" {} · {}", language.group().label(), language.code()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(" Language ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(p, area);
}

/// Summary panel. Articles get styled; every other state is a status line.
fn render_content_panel(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match &app.content {
        DisplayContent::Article {
            summary,
            fallback_from,
        } => {
            let mut lines = vec![Line::from(Span::styled(
                format!(" {} ", summary.language.display_name()),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ))];
            if let Some(requested) = fallback_from {
                lines.push(Line::from(Span::styled(
                    format!("Not available in {}; showing {}.", requested.display_name(), summary.language.display_name()),
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                summary.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            if let Some(description) = &summary.description {
                lines.push(Line::from(Span::styled(
                    description.as_str(),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(summary.excerpt(app.max_extract_chars)));
            if !summary.article_url.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::raw("🔗 "),
                    Span::styled(
                        summary.article_url.as_str(),
                        Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
                    ),
                ]));
            }
            lines
        }
        other => {
            let color = match other {
                DisplayContent::Loading | DisplayContent::Welcome => Color::Gray,
                DisplayContent::FallbackNotice { .. } => Color::Yellow,
                _ => Color::Red,
            };
            vec![Line::from(Span::styled(other.to_string(), Style::default().fg(color)))]
        }
    };

    let title = match &app.pin {
        Some(pin) => format!(" {} ", pin.label.as_deref().unwrap_or("Resolving…")),
        None => " Wikipedia ".to_string(),
    };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .padding(Padding::new(1, 1, 0, 0)),
        );
    f.render_widget(p, area);
}

fn render_status_line(f: &mut Frame, app: &App, area: Rect) {
    let updated = app
        .last_update
        .map(|t| format!("updated {}", t.format("%H:%M:%S")))
        .unwrap_or_else(|| "no lookups yet".to_string());

    let help = Line::from(vec![
        Span::styled(
            " ←↑→↓/hjkl move  +/- step  Enter select  [/] language  q quit ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" │ "),
        Span::styled(app.phase.label(), Style::default().fg(Color::Magenta)),
        Span::raw(" │ "),
        Span::styled(updated, Style::default().fg(Color::Green)),
    ]);
    f.render_widget(Paragraph::new(help), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::events::DisplayUpdate;
    use crate::models::{Coordinate, Summary};
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn renders_article_and_language() {
        let mut app = App::new(&Config::default(), Coordinate::new(0.0, 0.0).unwrap());
        app.apply(DisplayUpdate::SetPin {
            at: Coordinate::new(41.9, 12.5).unwrap(),
            label: Some("Rome".into()),
        });
        app.apply(DisplayUpdate::Content(DisplayContent::Article {
            summary: Summary {
                title: "Rome".into(),
                extract: "Capital city of Italy.".into(),
                description: None,
                article_url: "https://en.wikipedia.org/wiki/Rome".into(),
                language: LanguageCode::default(),
            },
            fallback_from: None,
        }));

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("English"));
        assert!(text.contains("Capital city of Italy."));
        assert!(text.contains("Rome"));
    }

    #[test]
    fn renders_welcome_before_any_selection() {
        let app = App::new(&Config::default(), Coordinate::new(0.0, 0.0).unwrap());
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("no lookups yet"));
    }
}
