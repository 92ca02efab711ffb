//! AyurDesk - Ayurvedic therapist dashboard for the terminal.
//!
//! Registers the therapist, keeps the profile on disk between runs and
//! shows the day's schedule, patients, requests and feedback.

use std::io;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use ayurdesk::application::{App, AppMode, ProfileContainer};
use ayurdesk::infrastructure::{self, AppConfig, FileStorage, ProfileRepository, APP_VERSION};
use ayurdesk::presentation::{render_ui, InputHandler};

/// Loads configuration, restores the stored profile and runs the
/// dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup fails or if there are issues
/// with the terminal interface during runtime.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();
    if let Err(e) = infrastructure::logging::init(&config) {
        eprintln!("ayurdesk: logging disabled: {e}");
    }
    info!(
        version = APP_VERSION,
        data_dir = %config.data_dir.display(),
        "starting ayurdesk"
    );

    let repository = ProfileRepository::new(FileStorage::new(config.data_dir.clone()));
    let mut app = App::new(ProfileContainer::open(repository));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal failure");
        println!("{err:?}");
    }
    info!("ayurdesk stopped");

    Ok(())
}

/// Draws, then feeds key presses to the input handler. `q` quits from
/// normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
