//! The fatal error kinds `Program::run` can surface. Per §7 these are the
//! only two ways a run ends abnormally: the terminal was never usable, or
//! something failed mid-run badly enough that recovery isn't local (I/O
//! failure or a panic inside the model). `CommandFailure` and
//! `ParserOverflow` are deliberately absent here — both recover locally as
//! `Message::Err`/`"unknown"` key events and never reach this boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// stdin/stdout is not a TTY, or raw-mode setup failed. Reported on
    /// startup; the program never starts running.
    #[error("terminal is unavailable: {0}")]
    TerminalUnavailable(#[source] tea_terminal::Error),

    /// A read or write on stdin/stdout failed mid-run. Teardown has already
    /// run by the time this is returned.
    #[error("terminal I/O failed: {0}")]
    IoFailure(#[source] std::io::Error),

    /// `update` or `view` panicked. Teardown has already run; `phase`
    /// names which call raised.
    #[error("model panicked during {phase}")]
    ModelPanic { phase: &'static str },
}
