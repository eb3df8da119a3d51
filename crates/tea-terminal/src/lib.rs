//! Raw-mode terminal ownership: enter/restore, size queries, alternate screen,
//! cursor visibility, and a resize-signal listener.
//!
//! Every fallible entry point returns [`Error`] rather than a bare string so
//! callers can classify failures (the program loop treats a failed [`enter`]
//! as fatal-at-startup and a failed mid-run write as fatal-but-recoverable,
//! per the two different error kinds this crate can produce).

use std::io::{self, Write, stdout};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{
    cursor::{Hide, Show},
    execute, queue,
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use signal_hook::consts::SIGWINCH;
use signal_hook::iterator::Signals;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terminal is unavailable: {0}")]
    Unavailable(#[source] io::Error),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Enters raw mode (and, optionally, the alternate screen) and returns a
/// guard that restores the prior terminal state on drop — including on
/// unwind, so a panic anywhere in the program loop still leaves the user's
/// shell usable.
pub fn enter(alt_screen: bool) -> Result<TerminalGuard, Error> {
    enable_raw_mode().map_err(Error::Unavailable)?;
    let mut out = stdout();
    if alt_screen {
        execute!(out, EnterAlternateScreen, Hide).map_err(Error::Unavailable)?;
    } else {
        execute!(out, Hide).map_err(Error::Unavailable)?;
    }
    tracing::debug!(target: "tea::terminal", alt_screen, "entered raw mode");
    Ok(TerminalGuard {
        alt_screen,
        restored: false,
    })
}

/// RAII handle for the raw-mode/alternate-screen state acquired by [`enter`].
///
/// Restoration is idempotent and infallible-from-the-caller's-perspective:
/// `Drop` swallows errors (there is nowhere left to report them to), while
/// [`TerminalGuard::restore`] surfaces them for the one caller — the program
/// loop's orderly shutdown path — that wants to know.
pub struct TerminalGuard {
    alt_screen: bool,
    restored: bool,
}

impl TerminalGuard {
    pub fn restore(&mut self) -> Result<(), Error> {
        if self.restored {
            return Ok(());
        }
        let mut out = stdout();
        if self.alt_screen {
            execute!(out, LeaveAlternateScreen, Show)?;
        } else {
            execute!(out, Show)?;
        }
        disable_raw_mode().map_err(Error::Io)?;
        self.restored = true;
        tracing::debug!(target: "tea::terminal", "restored terminal state");
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Queries the OS for the current terminal size, in `(cols, rows)`.
pub fn size() -> Result<(u16, u16), Error> {
    Ok(crossterm::terminal::size()?)
}

pub fn hide_cursor() -> Result<(), Error> {
    Ok(execute!(stdout(), Hide)?)
}

pub fn show_cursor() -> Result<(), Error> {
    Ok(execute!(stdout(), Show)?)
}

/// Clears the whole screen and homes the cursor. Used by the renderer's
/// `reset()` on resize and on alternate-screen entry.
pub fn clear_and_home() -> Result<(), Error> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All), crossterm::cursor::MoveTo(0, 0))?;
    out.flush()?;
    Ok(())
}

/// Handle returned by [`listen_for_resize`]; dropping or calling
/// [`ResizeListener::stop`] unblocks the background signal thread.
pub struct ResizeListener {
    handle: signal_hook::iterator::Handle,
    join: Option<std::thread::JoinHandle<()>>,
    stopped: Arc<AtomicBool>,
}

impl ResizeListener {
    pub fn stop(mut self) {
        self.stop_inner();
    }

    fn stop_inner(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.handle.close();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        self.stop_inner();
    }
}

/// Subscribes to the OS window-change signal (`SIGWINCH`) and invokes
/// `callback(cols, rows)` on each delivery. Re-query failures (e.g. a
/// transient ENOTTY) are swallowed; the most recent successful query is
/// what the callback observes on the *next* signal.
pub fn listen_for_resize<F>(mut callback: F) -> io::Result<ResizeListener>
where
    F: FnMut(u16, u16) + Send + 'static,
{
    let mut signals = Signals::new([SIGWINCH])?;
    let handle = signals.handle();
    let stopped = Arc::new(AtomicBool::new(false));
    let join = std::thread::Builder::new()
        .name("tea-resize-listener".into())
        .spawn(move || {
            for _ in signals.forever() {
                if let Ok((cols, rows)) = size() {
                    callback(cols, rows);
                }
            }
        })?;
    Ok(ResizeListener {
        handle,
        join: Some(join),
        stopped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_restore_is_idempotent() {
        // Constructing a real guard requires a TTY; exercise the idempotence
        // contract directly against the restored flag instead.
        let mut guard = TerminalGuard {
            alt_screen: false,
            restored: true,
        };
        assert!(guard.restore().is_ok());
    }
}
