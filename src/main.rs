use color_eyre::Result;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc};
use tracing::info;
use wikiloc_tui::{
    api::{self, NearbyCities, ReverseGeocoder, SummaryClient},
    app::{Action, App},
    config::Config,
    controller::SelectionController,
    events::{Event, EventHandler, EventSurface},
    geocode::GeocodeResolver,
    location, logging,
    summary::SummaryFetcher,
    ui,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging();
    color_eyre::install()?;
    // After color_eyre so its report hook runs once the terminal is restored.
    install_panic_hook();

    let config = Config::load();
    let home = location::locate_home(&config.map).await;

    // Pipeline: one shared client, timeouts included
    let client = api::build_client(&config.services)?;
    let events = EventHandler::new(150);
    let controller = Arc::new(SelectionController::new(
        GeocodeResolver::new(
            ReverseGeocoder::new(client.clone(), &config.services),
            NearbyCities::new(client.clone(), &config.services),
        ),
        SummaryFetcher::new(SummaryClient::new(client, &config.services)),
        EventSurface::new(events.tx.clone()),
        config.language.initial,
    ));

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new(&config, home);
    info!("Starting at {} in {}", home, app.language);

    // Main loop
    let mut event_handler = events;
    while !app.should_quit {
        app.phase = controller.phase();
        terminal.draw(|f| ui::render(f, &app))?;

        let Some(event) = event_handler.next().await else {
            break;
        };
        match event {
            Event::Tick => app.on_tick(),
            Event::Display(update) => app.apply(update),
            Event::Input(key) => {
                // Tokens are taken here, in key order; lookups run off the loop.
                match app.handle_key(key) {
                    Some(Action::Select(at)) => {
                        let token = controller.begin_selection(at);
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move { controller.complete_selection(token, at).await });
                    }
                    Some(Action::ChangeLanguage(language)) => {
                        if let Some(refresh) = controller.begin_language_change(language) {
                            let controller = Arc::clone(&controller);
                            tokio::spawn(async move { controller.refresh_summary(refresh).await });
                        }
                    }
                    None => {}
                }
            }
        }
    }

    restore_terminal(terminal)?;
    info!("Shutting down.");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, crossterm::cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Force terminal cleanup!
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show).ok();
        original_hook(panic_info);
    }));
}
