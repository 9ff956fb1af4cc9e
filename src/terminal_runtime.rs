use std::io;
use std::panic;
use std::sync::Once;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

type BoardTerminal = Terminal<CrosstermBackend<io::Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Raw mode for as long as the guard lives.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(error) = disable_raw_mode() {
            tracing::error!(%error, "failed to disable raw mode");
        }
    }
}

/// Alternate screen with a hidden cursor, drawn through ratatui.
///
/// Fields drop in order, so the screen is left before raw mode ends.
pub struct TerminalSession {
    terminal: BoardTerminal,
    _raw_mode: RawMode,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        PANIC_HOOK.call_once(restore_before_panic_message);

        let raw_mode = RawMode::enable()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;

        let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
            leave_alternate_screen();
        })?;

        Ok(Self {
            terminal,
            _raw_mode: raw_mode,
        })
    }

    /// Draws one frame.
    pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        leave_alternate_screen();
    }
}

fn leave_alternate_screen() {
    let mut stdout = io::stdout();
    if let Err(error) = execute!(stdout, Show, LeaveAlternateScreen) {
        tracing::error!(%error, "failed to leave alternate screen");
    }
}

fn restore_before_panic_message() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Show, LeaveAlternateScreen);
        default_hook(panic_info);
    }));
}
