//! RAII terminal lifecycle guard backed by crossterm.
//!
//! The dashboard owns the screen only while a [`TerminalGuard`] is alive.
//! Dropping it (normal quit, `?` early return, or unwinding) hands the
//! terminal back in cooked mode. The panic hook does the same before the
//! panic message prints, so the message is readable.

use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

/// Set while raw mode is active. Checked by the panic hook.
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// RAII guard around raw mode + alternate screen.
pub struct TerminalGuard {
    hook_installed: bool,
}

impl TerminalGuard {
    /// Take over the terminal and chain a restoring panic hook.
    ///
    /// # Errors
    /// Returns I/O errors if terminal setup fails. On partial failure whatever
    /// was set up is undone before returning.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            restore_terminal_best_effort();
            return Err(err);
        }

        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal_best_effort();
            prev(info);
        }));

        Ok(Self {
            hook_installed: true,
        })
    }

    /// Terminal dimensions (columns, rows), falling back to 80x24 without a tty.
    #[must_use]
    pub fn terminal_size() -> (u16, u16) {
        terminal::size()
            .ok()
            .filter(|&(cols, rows)| cols > 0 && rows > 0)
            .unwrap_or((80, 24))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal_best_effort();
        if self.hook_installed {
            // The previous hook was moved into ours; fall back to the default.
            let _ = panic::take_hook();
        }
    }
}

/// Leave the alternate screen and raw mode. Safe to call repeatedly.
fn restore_terminal_best_effort() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ──────────────────── tests ────────────────────
