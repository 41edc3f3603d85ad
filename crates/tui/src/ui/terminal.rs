use std::io::{Stdout, stdout};

use crossterm::{
    cursor,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::Result;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switches to the alternate screen in raw mode. Pair every call with
/// [`restore_terminal`], error paths included, or the shell is left unusable.
pub fn setup_terminal() -> Result<AppTerminal> {
    terminal::enable_raw_mode()?;
    crossterm::execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<()> {
    terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}
