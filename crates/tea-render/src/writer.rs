//! A thin batching layer over terminal primitives: cursor moves, line
//! erases, and raw writes queue up and flush through exactly one
//! `Write::flush` call per `render()`, rather than one syscall per escape
//! sequence.
//!
//! Generic over the sink so tests can assert against an in-memory buffer
//! instead of real stdout.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

enum Op {
    MoveTo(u16, u16),
    ClearLine,
    Print(String),
}

/// Queues terminal operations and flushes them as a single batch.
#[derive(Default)]
pub struct Writer {
    ops: Vec<Op>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0-based; callers convert to the 1-based `ESC[<row>;<col>H` form.
    pub fn move_to(&mut self, col: u16, row: u16) {
        self.ops.push(Op::MoveTo(col, row));
    }

    pub fn clear_line(&mut self) {
        self.ops.push(Op::ClearLine);
    }

    pub fn print(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.is_empty() {
            self.ops.push(Op::Print(s));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Flushes every queued op to `out` in one pass, ending with a single
    /// `out.flush()`.
    pub fn flush_to<W: Write>(self, out: &mut W) -> io::Result<()> {
        for op in self.ops {
            match op {
                Op::MoveTo(col, row) => queue!(out, MoveTo(col, row))?,
                Op::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Op::Print(s) => queue!(out, Print(s))?,
            }
        }
        out.flush()
    }
}
