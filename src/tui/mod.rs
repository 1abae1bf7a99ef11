//! Terminal User Interface Module
//!
//! Terminal front end for the oxidation-state search, talking to a running
//! relay over HTTP. Built with Ratatui.
//!
//! ```text
//! ┌──────────────── Search Material Data ────────────────┐
//! ├─ Formula ────────────────────────────────────────────┤
//! │ CrO*                                       [ Search ]│
//! │                ● Searching... / ✗ error              │
//! ├─ Results: ───────────────────────────────────────────┤
//! │ CrO3                                                 │
//! │   Material ID: mp-510                                │
//! │   ...                                                │
//! └──────────────────────────────────────────────────────┘
//!  [Enter] Search [↑/↓] Scroll [F1] Help [Esc] Quit
//! ```

pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::{App, AppEvent, Screen};
pub use event::{AppAction, EventHandler};

use crate::view::RelayClient;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use tracing::{error, info};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI against the relay at `relay`
pub async fn run(relay: RelayClient) -> anyhow::Result<()> {
    info!(relay = %relay.base_url(), "Starting TUI mode");

    let mut terminal = init_terminal()?;
    let mut app = App::new(relay);
    let mut events = EventHandler::new(std::time::Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &mut events).await;

    if let Err(e) = restore_terminal(&mut terminal) {
        error!("Failed to restore terminal: {}", e);
    }

    result
}

/// Main application loop
async fn run_app(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> anyhow::Result<()> {
    while !app.should_quit {
        let viewport = terminal.size()?.height.saturating_sub(ui::CHROME_HEIGHT);
        let content = ui::result_lines(&app.search.results).len() as u16;
        app.update_scroll_bounds(content, viewport);

        terminal.draw(|frame| ui::render(frame, app))?;

        app.poll_events();

        // Returns within one tick even without input
        match events.next().await {
            Some(action) => app.handle_action(action).await,
            None => break,
        }
    }

    info!("TUI exited normally");
    Ok(())
}
