//! TUI for the task manager
//!
//! A list of tasks next to a shared add/edit form, rendered with ratatui.

mod app;
mod event;
mod form;
mod theme;

pub mod widgets;

pub use app::{Action, App, Focus, Outcome};
pub use event::{Event, EventHandler};
pub use form::{FormField, FormMode, Submission, TaskForm};

use anyhow::{bail, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::prelude::*;
use std::io::{self, Stdout};
use std::sync::Arc;

use crate::api::TaskApi;
use crate::store::ClientTaskStore;

/// Terminal type alias for convenience
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Check if we're running in an interactive terminal
pub fn is_interactive() -> bool {
    io::stdout().is_tty()
}

/// Initialize the terminal for TUI mode
pub fn init() -> Result<Tui> {
    if !is_interactive() {
        bail!("The task client requires an interactive terminal.");
    }

    enable_raw_mode()?;

    // If any subsequent operation fails, we must restore raw mode
    let result = (|| {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    })();

    if result.is_err() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }

    result
}

/// Restore the terminal to its original state
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI against `store` until the user quits.
pub async fn run<A: TaskApi + 'static>(store: Arc<ClientTaskStore<A>>) -> Result<()> {
    let mut terminal = init()?;

    let mut app = App::new(store);
    let events = EventHandler::new(250);

    app.mount();
    let result = app.run(&mut terminal, events).await;

    restore()?;

    result
}
