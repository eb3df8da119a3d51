//! The Model contract: the three-method capability set (`init`, `update`,
//! `view`), the built-in `Message` taxonomy, and the `Command` primitives
//! that let a `Model` schedule deferred, side-effecting work.
//!
//! A `Model` is a value owned exclusively by `tea_program::Program` for the
//! lifetime of a run. `update` mutates it in place and returns the `Command`
//! to execute next; there is no aliasing while an update is in flight.

use std::any::Any;
use std::fmt;

/// A single key press, decoded by `tea_keys` and delivered to `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMsg {
    /// Canonical key name, e.g. `"a"`, `"up"`, `"ctrl+c"`, `"esc"`.
    pub key: String,
    /// The literal UTF-8 runes that produced this key, when applicable.
    pub runes: String,
    pub alt: bool,
}

/// The terminal's size changed, either at startup or on a resize signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSizeMsg {
    pub width: u16,
    pub height: u16,
}

/// An opaque payload produced by a `Command`, typed by the application.
/// Downcast with [`UserMsg::downcast`].
pub struct UserMsg(Box<dyn Any + Send>);

impl UserMsg {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn downcast<T: Any + Send>(self) -> Result<T, UserMsg> {
        match self.0.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(boxed) => Err(UserMsg(boxed)),
        }
    }

    pub fn is<T: Any + Send>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for UserMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UserMsg").field(&"..").finish()
    }
}

/// The closed set of built-in message kinds, plus the application's own
/// open-ended payload kind. §7's `CommandFailure` is delivered as `Err`.
#[derive(Debug)]
pub enum Message {
    Key(KeyMsg),
    WindowSize(WindowSizeMsg),
    Quit,
    Err(anyhow::Error),
    User(UserMsg),
}

impl Message {
    pub fn user<T: Any + Send>(value: T) -> Self {
        Message::User(UserMsg::new(value))
    }
}

/// A deferred, side-effecting computation that produces a `Message` when it
/// completes. `Command::None` is a no-op; `Command::Batch` dispatches every
/// child concurrently, with messages delivered in completion order, not
/// submission order.
pub enum Command {
    None,
    Function(Box<dyn FnOnce() -> Message + Send>),
    Batch(Vec<Command>),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::None => f.write_str("Command::None"),
            Command::Function(_) => f.write_str("Command::Function(..)"),
            Command::Batch(cmds) => f.debug_tuple("Command::Batch").field(cmds).finish(),
        }
    }
}

impl Command {
    /// Wraps a nullary function producing a `Message` as a single command.
    pub fn perform<F>(f: F) -> Self
    where
        F: FnOnce() -> Message + Send + 'static,
    {
        Command::Function(Box::new(f))
    }

    /// Combines commands for concurrent, independent execution.
    pub fn batch(cmds: impl IntoIterator<Item = Command>) -> Self {
        let cmds: Vec<Command> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Command::None))
            .collect();
        match cmds.len() {
            0 => Command::None,
            1 => cmds.into_iter().next().unwrap(),
            _ => Command::Batch(cmds),
        }
    }
}

/// The sentinel command producing [`Message::Quit`].
pub fn quit_cmd() -> Command {
    Command::perform(|| Message::Quit)
}

/// The capability set an application implements: initialize, react to a
/// message producing the next command, and render the current state.
///
/// `update` and `view` must not block — long work belongs in a `Command`
/// executed off the main loop.
pub trait Model: Send + 'static {
    /// Runs once before the first render; any returned command is enqueued
    /// immediately.
    fn init(&mut self) -> Command {
        Command::None
    }

    /// Applies `msg`, mutating `self` in place, and returns the next
    /// command to execute (`Command::None` if there is nothing to do).
    fn update(&mut self, msg: Message) -> Command;

    /// Renders the current state as the next frame, split on `\n` by the
    /// renderer.
    fn view(&self) -> String;
}
