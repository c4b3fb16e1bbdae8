//! The editor's screen: raw mode on an alternate screen, put back when the
//! editor exits or panics.

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A terminal the editor draws into. Dropping it leaves the editor screen.
pub struct EditorTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    screen: Arc<Screen>,
}

impl EditorTerminal {
    /// Switches stdout to the editor screen and installs a panic hook that
    /// switches it back before the panic message is printed.
    pub fn enter() -> io::Result<Self> {
        let screen = Arc::new(Screen::new(leave_editor_screen));
        enable_raw_mode()?;
        let terminal = enter_editor_screen().and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
        let terminal = match terminal {
            Ok(terminal) => terminal,
            Err(e) => {
                screen.leave();
                return Err(e);
            }
        };
        install_panic_hook(Arc::clone(&screen));
        tracing::debug!("entered editor screen");
        Ok(Self { terminal, screen })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(render).map(|_| ())
    }
}

impl Drop for EditorTerminal {
    fn drop(&mut self) {
        self.screen.leave();
    }
}

/// Leaves the editor screen at most once, whether from drop or from the
/// panic hook.
struct Screen {
    left: AtomicBool,
    leave: fn() -> io::Result<()>,
}

impl Screen {
    fn new(leave: fn() -> io::Result<()>) -> Self {
        Self {
            left: AtomicBool::new(false),
            leave,
        }
    }

    /// Returns false if the screen was already left.
    fn leave(&self) -> bool {
        if self.left.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Err(e) = (self.leave)() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
        true
    }
}

fn install_panic_hook(screen: Arc<Screen>) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if screen.leave() {
            tracing::error!(panic = %info, "editor panicked, terminal restored");
        }
        previous(info);
    }));
}

fn enter_editor_screen() -> io::Result<()> {
    execute!(io::stdout(), EnterAlternateScreen, Clear(ClearType::All), Hide)
}

fn leave_editor_screen() -> io::Result<()> {
    // Raw mode goes first so a failed escape sequence still leaves a usable shell.
    let raw = disable_raw_mode();
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    raw
}
