//! Line-diff frame renderer: compares successive `view()` strings
//! line-by-line and emits the minimal cursor-movement + rewrite sequences
//! needed to bring the terminal from the previous frame to the next one.
//!
//! Coordinated with resize: the program loop calls [`Renderer::resize`] on
//! a `WindowSizeMsg`, which clears the remembered previous frame so the
//! next `render()` rewrites every line unconditionally.

pub mod writer;

use std::io::{self, Write};

use writer::Writer;

/// Diffs and writes frames to `W`. `W` is `std::io::Stdout` in production;
/// tests use an in-memory buffer to assert on emitted bytes directly.
pub struct Renderer<W> {
    out: W,
    width: u16,
    height: u16,
    prev_lines: Option<Vec<String>>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            width,
            height,
            prev_lines: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Splits `frame` on `\n`, truncates each line to the renderer's width,
    /// diffs against the previous frame, and writes only the changed lines
    /// plus a single trailing flush.
    pub fn render(&mut self, frame: &str) -> io::Result<()> {
        let width = self.width as usize;
        let new_lines: Vec<String> = frame
            .split('\n')
            .map(|l| tea_text::truncate(l, width))
            .collect();

        let prev_len = self.prev_lines.as_ref().map(Vec::len).unwrap_or(0);
        let total = new_lines.len().max(prev_len);

        let mut w = Writer::new();
        for i in 0..total {
            if i >= new_lines.len() {
                w.move_to(0, i as u16);
                w.clear_line();
                continue;
            }
            let changed = match &self.prev_lines {
                Some(prev) => i >= prev.len() || prev[i] != new_lines[i],
                None => true,
            };
            if changed {
                w.move_to(0, i as u16);
                w.clear_line();
                w.print(new_lines[i].clone());
            }
        }

        w.flush_to(&mut self.out)?;
        self.prev_lines = Some(new_lines);
        Ok(())
    }

    /// Clears the remembered previous frame and repaints the terminal from
    /// scratch: home the cursor, clear the screen. The next `render()` call
    /// therefore rewrites every line. Invoked on resize and on
    /// alternate-screen entry.
    pub fn reset(&mut self) -> io::Result<()> {
        self.prev_lines = None;
        let mut w = Writer::new();
        w.move_to(0, 0);
        w.print("\u{1b}[2J");
        w.flush_to(&mut self.out)
    }

    /// Updates the renderer's dimensions and resets, so the next frame is
    /// rewritten unconditionally.
    pub fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.width = width;
        self.height = height;
        tracing::debug!(target: "tea::render", width, height, "renderer resized");
        self.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_buf(r: &mut Renderer<Vec<u8>>, frame: &str) -> String {
        r.render(frame).unwrap();
        let s = String::from_utf8(std::mem::take(&mut r.out)).unwrap();
        s
    }

    #[test]
    fn first_render_writes_every_line() {
        let mut r = Renderer::new(Vec::new(), 80, 24);
        let out = render_to_buf(&mut r, "a\nb\nc");
        assert!(out.contains('a'));
        assert!(out.contains('b'));
        assert!(out.contains('c'));
    }

    #[test]
    fn unchanged_frame_emits_nothing() {
        let mut r = Renderer::new(Vec::new(), 80, 24);
        render_to_buf(&mut r, "same\nframe");
        let second = render_to_buf(&mut r, "same\nframe");
        assert!(second.is_empty(), "expected zero bytes, got {second:?}");
    }

    #[test]
    fn only_changed_line_is_rewritten() {
        let mut r = Renderer::new(Vec::new(), 80, 24);
        render_to_buf(&mut r, "one\ntwo\nthree");
        let second = render_to_buf(&mut r, "one\nTWO\nthree");
        assert!(second.contains("TWO"));
        assert!(!second.contains("three") || second.matches("three").count() <= 1);
    }

    #[test]
    fn shrinking_frame_erases_trailing_lines() {
        let mut r = Renderer::new(Vec::new(), 80, 24);
        render_to_buf(&mut r, "a\nb\nc");
        let second = render_to_buf(&mut r, "a");
        // The vacated rows (1, 2) must each get a cursor-move + clear.
        assert!(second.matches("2K").count() >= 2);
    }

    #[test]
    fn lines_are_truncated_to_width() {
        let mut r = Renderer::new(Vec::new(), 5, 24);
        let out = render_to_buf(&mut r, "abcdefghij");
        assert!(out.contains("abcde"));
        assert!(!out.contains("fghij"));
    }

    #[test]
    fn resize_forces_full_rewrite_next_frame() {
        let mut r = Renderer::new(Vec::new(), 80, 24);
        render_to_buf(&mut r, "a\nb");
        r.out.clear();
        r.resize(100, 30).unwrap();
        let out = render_to_buf(&mut r, "a\nb");
        assert!(out.contains('a'));
        assert!(out.contains('b'));
    }
}
