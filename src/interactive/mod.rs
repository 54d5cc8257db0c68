//! Interactive terminal dashboard
//!
//! Shows the login form while signed out and the charts once a session
//! token exists. Fetches run on spawned tasks; the draw loop applies their
//! outcomes between frames.

pub mod app;
pub mod charts;
pub mod events;
pub mod login_form;
pub mod messages;
pub mod ui;
pub mod utils;

pub use app::App;
pub use events::EventHandler;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

use crate::client::{ApiClient, HttpTransport};
use crate::config::Config;
use crate::session::Session;
use crate::storage::{DynStore, FileStore, MemoryStore, StoreScope};
use crate::theme::{Theme, ThemeState};

/// Store for `scope`, or an in-memory one when no per-user directory exists
pub fn open_store(scope: StoreScope) -> DynStore {
    match FileStore::for_scope(scope) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, ?scope, "Falling back to in-memory store");
            Box::new(MemoryStore::new())
        }
    }
}

/// Theme used when nothing has been saved yet
pub fn system_theme() -> Theme {
    Theme::from_terminal_hint(std::env::var("COLORFGBG").ok().as_deref())
}

/// Run the interactive UI application
pub async fn run_interactive(config: Config, export_dir: PathBuf) -> Result<()> {
    let client = ApiClient::new(config.normalized_api_base()?);
    let session = Session::restore(open_store(StoreScope::Session));
    let theme = ThemeState::load(open_store(StoreScope::Durable), system_theme());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, client, session, theme, export_dir);
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "Interactive session ended with an error");
    }
    res
}

/// Main application loop
async fn run_app<B, T>(terminal: &mut Terminal<B>, app: &mut App<T>) -> Result<()>
where
    B: ratatui::backend::Backend,
    T: HttpTransport + 'static,
{
    let event_handler = EventHandler::new();

    loop {
        app.drain_outcomes();
        terminal.draw(|f| ui::draw(f, app))?;

        let event = event_handler.next()?;
        if !app.handle_event(event).await? {
            break;
        }
    }

    Ok(())
}
