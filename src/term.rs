use std::io::{self, Stdout, Write, stdout};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use log::error;

/// Where frames go. The game only ever clears and redraws the whole board.
pub trait Screen {
    fn clear(&mut self) -> io::Result<()>;
    fn draw(&mut self, lines: &[String]) -> io::Result<()>;
}

pub struct TermManager {
    stdout: Stdout,
    // Set as soon as the alternate screen is entered, cleared by `restore`
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout(), active: false }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;

        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
    }

    /// Leaves raw mode and the alternate screen. A no-op when nothing was set up.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        // Attempt every step even if an earlier one fails
        let raw = terminal::disable_raw_mode();
        let screen = execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen);
        raw.and(screen)
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Error and panic paths end up here without an explicit restore
        if let Err(e) = self.restore() {
            error!("Error restoring the terminal: {}", e);
        }
    }
}

impl Screen for TermManager {
    fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    fn draw(&mut self, lines: &[String]) -> io::Result<()> {
        // Raw mode: no implicit carriage returns, so position every line
        for (y, line) in lines.iter().enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, y as u16), style::Print(line))?;
        }
        self.stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_without_setup_is_noop() {
        let mut term = TermManager::new();

        assert!(!term.is_active());
        assert!(term.restore().is_ok());
        assert!(term.restore().is_ok());
        assert!(!term.is_active());
    }
}
