//! ANSI-aware string utilities: visible width, stripping, truncation,
//! word-wrap and right-padding in the presence of embedded CSI/OSC/SGR
//! escape sequences and wide/zero-width Unicode scalar values.
//!
//! Every operation here treats `ESC [ ... final-byte` (CSI, including SGR)
//! and `ESC ] ... BEL|ST` (OSC) as zero-width pass-through: they never count
//! toward a string's visible width but are preserved verbatim in output.

mod width;

pub use width::char_width;

/// One lexical unit of an ANSI-bearing string: either a single Unicode
/// scalar value, or a whole escape sequence treated as an opaque, zero-width
/// atom.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Unit {
    Char(char),
    Esc(String),
}

fn tokenize(s: &str) -> Vec<Unit> {
    let mut out = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            out.push(Unit::Char(c));
            continue;
        }
        let mut seq = String::new();
        seq.push(c);
        match chars.peek() {
            Some('[') => {
                seq.push(chars.next().unwrap());
                for nc in chars.by_ref() {
                    seq.push(nc);
                    if ('\u{40}'..='\u{7e}').contains(&nc) {
                        break;
                    }
                }
            }
            Some(']') => {
                seq.push(chars.next().unwrap());
                let mut prev_esc = false;
                while let Some(nc) = chars.next() {
                    seq.push(nc);
                    if nc == '\u{7}' {
                        break;
                    }
                    if prev_esc && nc == '\\' {
                        break;
                    }
                    prev_esc = nc == '\u{1b}';
                }
            }
            _ => {
                // A bare ESC (or an escape kind this parser doesn't model)
                // is kept as its own zero-width atom so it round-trips.
            }
        }
        out.push(Unit::Esc(seq));
    }
    out
}

/// Sum of per-code-point widths outside escape sequences.
pub fn visible_width(s: &str) -> usize {
    tokenize(s)
        .into_iter()
        .map(|u| match u {
            Unit::Char(c) => width::char_width(c),
            Unit::Esc(_) => 0,
        })
        .sum()
}

/// Returns `s` with all escape sequences removed.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for u in tokenize(s) {
        if let Unit::Char(c) = u {
            out.push(c);
        }
    }
    out
}

/// True if the CSI parameter/intermediate bytes of an SGR sequence
/// (`ESC [ ... m`) denote a reset (empty or `0`), per the implementer-level
/// approximation the spec allows: track SGR *opens* rather than the full
/// attribute stack.
fn sgr_is_reset(seq: &str) -> bool {
    let Some(body) = seq.strip_prefix("\u{1b}[").and_then(|b| b.strip_suffix('m')) else {
        return false;
    };
    body.is_empty() || body.split(';').all(|p| p.is_empty() || p == "0")
}

fn is_sgr(seq: &str) -> bool {
    seq.starts_with("\u{1b}[") && seq.ends_with('m')
}

/// The longest prefix of `s` whose visible width is `<= n`.
///
/// If an SGR attribute was left open at the cut point, a trailing
/// `ESC[0m` is appended so the truncation can never bleed style into
/// whatever gets printed after it.
pub fn truncate(s: &str, n: usize) -> String {
    let mut out = String::new();
    let mut width_used = 0usize;
    let mut sgr_active = false;
    for u in tokenize(s) {
        match u {
            Unit::Esc(seq) => {
                if is_sgr(&seq) {
                    sgr_active = !sgr_is_reset(&seq);
                }
                out.push_str(&seq);
            }
            Unit::Char(c) => {
                let w = width::char_width(c);
                if width_used + w > n {
                    break;
                }
                width_used += w;
                out.push(c);
            }
        }
    }
    if sgr_active {
        out.push_str("\u{1b}[0m");
    }
    out
}

/// If `visible_width(s) < n`, appends spaces to reach `n`; otherwise
/// returns `s` unchanged.
pub fn pad_right(s: &str, n: usize) -> String {
    let w = visible_width(s);
    if w >= n {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + (n - w));
    out.push_str(s);
    out.extend(std::iter::repeat_n(' ', n - w));
    out
}

struct Wrapper {
    width: usize,
    lines: Vec<String>,
    line: String,
    line_width: usize,
    word: String,
    word_width: usize,
}

impl Wrapper {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
            line: String::new(),
            line_width: 0,
            word: String::new(),
            word_width: 0,
        }
    }

    fn push_esc(&mut self, seq: &str) {
        self.word.push_str(seq);
    }

    fn push_char(&mut self, c: char) {
        self.word.push(c);
        self.word_width += width::char_width(c);
    }

    fn newline(&mut self) {
        self.lines.push(std::mem::take(&mut self.line));
        self.line_width = 0;
    }

    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        if self.word_width > self.width {
            self.hard_break();
        } else {
            if self.line_width > 0 && self.line_width + 1 + self.word_width > self.width {
                self.newline();
            } else if self.line_width > 0 {
                self.line.push(' ');
                self.line_width += 1;
            }
            self.line.push_str(&self.word);
            self.line_width += self.word_width;
        }
        self.word.clear();
        self.word_width = 0;
    }

    /// A single token longer than `width` is hard-broken at exactly `width`
    /// code-points per chunk, with any escape sequences attached to
    /// whichever chunk they fall in.
    fn hard_break(&mut self) {
        if self.line_width > 0 {
            self.newline();
        }
        let mut chunk = String::new();
        let mut chunk_width = 0usize;
        for u in tokenize(&self.word) {
            match u {
                Unit::Esc(seq) => chunk.push_str(&seq),
                Unit::Char(c) => {
                    let w = width::char_width(c);
                    if chunk_width > 0 && chunk_width + w > self.width {
                        self.lines.push(std::mem::take(&mut chunk));
                        chunk_width = 0;
                    }
                    chunk.push(c);
                    chunk_width += w;
                }
            }
        }
        self.line = chunk;
        self.line_width = chunk_width;
    }

    fn finish(mut self) -> String {
        self.flush_word();
        self.lines.push(self.line);
        self.lines.join("\n")
    }
}

/// Greedy word-wrap at ASCII whitespace to `width` columns. Tokens longer
/// than `width` are hard-broken; embedded escape sequences are preserved at
/// their logical position and never count toward width; input newlines
/// force a line break.
pub fn word_wrap(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut w = Wrapper::new(width);
    for u in tokenize(s) {
        match u {
            Unit::Esc(seq) => w.push_esc(&seq),
            Unit::Char('\n') => {
                w.flush_word();
                w.newline();
            }
            Unit::Char(c) if c.is_ascii_whitespace() => {
                w.flush_word();
            }
            Unit::Char(c) => w.push_char(c),
        }
    }
    w.finish()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn truncation_soundness(s in "[a-zA-Z0-9 ]{0,40}", n in 0usize..40) {
            prop_assert!(visible_width(&truncate(&s, n)) <= n);
        }

        #[test]
        fn pad_idempotence(s in "[a-zA-Z0-9 ]{0,20}", n in 0usize..30) {
            let once = pad_right(&s, n);
            let twice = pad_right(&once, n);
            prop_assert_eq!(once, twice);
        }
    }
}
