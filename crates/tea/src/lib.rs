//! Public facade over the `tea-*` workspace: one crate an application
//! depends on to write an Elm-architecture terminal program, re-exporting
//! the model protocol, the program runner, styling, layout and string
//! width utilities, and the ambient config/terminal/error types.
//!
//! Submodules stay available under their own names (`tea::style`,
//! `tea::layout`, `tea::text`) for callers who prefer qualified paths; the
//! prelude re-exports at the crate root cover the common path.

pub use tea_model::{Command, KeyMsg, Message, Model, UserMsg, WindowSizeMsg, quit_cmd};
pub use tea_program::{Config, Error, Program};

pub mod config {
    pub use tea_config::{discover, load_from};
}

pub mod style {
    pub use tea_style::*;
}

pub mod layout {
    pub use tea_layout::*;
}

pub mod text {
    pub use tea_text::*;
}

pub mod keys {
    pub use tea_keys::*;
}

pub mod terminal {
    pub use tea_terminal::*;
}
