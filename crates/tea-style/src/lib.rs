//! Immutable style builder: compose border, padding, margin, alignment,
//! width/height constraints and SGR color/attributes into a rectangular
//! text block.
//!
//! Every setter takes `self` by value and returns a new `Style` — since all
//! fields are `Copy`, the receiver binding is left untouched at the call
//! site; there is no interior mutability anywhere in this type.

use bitflags::bitflags;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Color(pub u8, pub u8, pub u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Sides {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Sides {
    fn horizontal(&self) -> u16 {
        self.left + self.right
    }

    fn vertical(&self) -> u16 {
        self.top + self.bottom
    }
}

/// CSS-style 1/2/3/4-argument shorthand: `[all]`, `[vertical, horizontal]`,
/// `[top, horizontal, bottom]`, `[top, right, bottom, left]`.
fn css_shorthand(values: &[u16]) -> Sides {
    match values {
        [] => Sides::default(),
        [all] => Sides {
            top: *all,
            right: *all,
            bottom: *all,
            left: *all,
        },
        [v, h] => Sides {
            top: *v,
            right: *h,
            bottom: *v,
            left: *h,
        },
        [t, h, b] => Sides {
            top: *t,
            right: *h,
            bottom: *b,
            left: *h,
        },
        [t, r, b, l, ..] => Sides {
            top: *t,
            right: *r,
            bottom: *b,
            left: *l,
        },
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BorderSides: u8 {
        const TOP = 0b0001;
        const RIGHT = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT = 0b1000;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderKind {
    None,
    Normal,
    Rounded,
    Thick,
    Double,
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub top: char,
    pub top_right: char,
    pub right: char,
    pub bottom_right: char,
    pub bottom: char,
    pub bottom_left: char,
    pub left: char,
}

impl BorderKind {
    fn glyphs(self) -> Option<BorderGlyphs> {
        let g = match self {
            BorderKind::None => return None,
            BorderKind::Normal => BorderGlyphs {
                top_left: '┌',
                top: '─',
                top_right: '┐',
                right: '│',
                bottom_right: '┘',
                bottom: '─',
                bottom_left: '└',
                left: '│',
            },
            BorderKind::Rounded => BorderGlyphs {
                top_left: '╭',
                top: '─',
                top_right: '╮',
                right: '│',
                bottom_right: '╯',
                bottom: '─',
                bottom_left: '╰',
                left: '│',
            },
            BorderKind::Thick => BorderGlyphs {
                top_left: '┏',
                top: '━',
                top_right: '┓',
                right: '┃',
                bottom_right: '┛',
                bottom: '━',
                bottom_left: '┗',
                left: '┃',
            },
            BorderKind::Double => BorderGlyphs {
                top_left: '╔',
                top: '═',
                top_right: '╗',
                right: '║',
                bottom_right: '╝',
                bottom: '═',
                bottom_left: '╚',
                left: '║',
            },
            BorderKind::Hidden => BorderGlyphs {
                top_left: ' ',
                top: ' ',
                top_right: ' ',
                right: ' ',
                bottom_right: ' ',
                bottom: ' ',
                bottom_left: ' ',
                left: ' ',
            },
        };
        Some(g)
    }
}

/// An immutable record of optional presentation attributes. `Style::default()`
/// applies no attributes and renders its input unchanged (modulo
/// rectangularization if a line-count/width constraint is set).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    dim: bool,
    italic: bool,
    underline: bool,
    reverse: bool,
    strikethrough: bool,
    padding: Sides,
    margin: Sides,
    width: Option<u16>,
    height: Option<u16>,
    max_width: Option<u16>,
    max_height: Option<u16>,
    align: Align,
    wrap: bool,
    border_kind: BorderKind_,
    border_sides: BorderSides,
    border_fg: Option<Color>,
}

/// `BorderKind` isn't `Default`-able as an enum without picking a variant;
/// wrap it so `Style` can derive `Default` with "no border" as the zero value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BorderKind_(BorderKind);

impl Default for BorderKind_ {
    fn default() -> Self {
        BorderKind_(BorderKind::None)
    }
}

impl Default for BorderSides {
    fn default() -> Self {
        BorderSides::empty()
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, c: Color) -> Self {
        self.fg = Some(c);
        self
    }

    pub fn bg(mut self, c: Color) -> Self {
        self.bg = Some(c);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    pub fn padding(mut self, values: &[u16]) -> Self {
        self.padding = css_shorthand(values);
        self
    }

    pub fn margin(mut self, values: &[u16]) -> Self {
        self.margin = css_shorthand(values);
        self
    }

    pub fn width(mut self, n: u16) -> Self {
        self.width = Some(n);
        self
    }

    pub fn height(mut self, n: u16) -> Self {
        self.height = Some(n);
        self
    }

    pub fn max_width(mut self, n: u16) -> Self {
        self.max_width = Some(n);
        self
    }

    pub fn max_height(mut self, n: u16) -> Self {
        self.max_height = Some(n);
        self
    }

    pub fn align(mut self, a: Align) -> Self {
        self.align = a;
        self
    }

    /// Enables word-wrapping content to `width` (minus horizontal padding)
    /// before alignment. A no-op unless `width` is also set.
    pub fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    /// Sets the border kind and defaults its sides to all four; call
    /// [`Style::border_sides`] afterwards to restrict which sides are drawn.
    pub fn border(mut self, kind: BorderKind) -> Self {
        self.border_kind = BorderKind_(kind);
        self.border_sides = BorderSides::all();
        self
    }

    pub fn border_sides(mut self, sides: BorderSides) -> Self {
        self.border_sides = sides;
        self
    }

    pub fn border_fg(mut self, c: Color) -> Self {
        self.border_fg = Some(c);
        self
    }

    fn sgr_prefix(&self) -> String {
        let mut codes: Vec<String> = Vec::new();
        if self.bold {
            codes.push("1".into());
        }
        if self.dim {
            codes.push("2".into());
        }
        if self.italic {
            codes.push("3".into());
        }
        if self.underline {
            codes.push("4".into());
        }
        if self.reverse {
            codes.push("7".into());
        }
        if self.strikethrough {
            codes.push("9".into());
        }
        if let Some(Color(r, g, b)) = self.fg {
            codes.push(format!("38;2;{r};{g};{b}"));
        }
        if let Some(Color(r, g, b)) = self.bg {
            codes.push(format!("48;2;{r};{g};{b}"));
        }
        if codes.is_empty() {
            String::new()
        } else {
            format!("\u{1b}[{}m", codes.join(";"))
        }
    }

    /// Applies this style to `s`, returning a rectangular block: every
    /// output line has identical visible width.
    pub fn render(&self, s: &str) -> String {
        let mut lines: Vec<String> = s.split('\n').map(str::to_string).collect();

        if let Some(width) = self.width
            && self.wrap
        {
            let inner = (width as usize).saturating_sub(self.padding.horizontal() as usize);
            lines = tea_text::word_wrap(&lines.join("\n"), inner)
                .split('\n')
                .map(str::to_string)
                .collect();
        }

        let inner_width = match self.width {
            Some(w) => (w as usize).saturating_sub(self.padding.horizontal() as usize),
            None => lines.iter().map(|l| tea_text::visible_width(l)).max().unwrap_or(0),
        };

        for line in &mut lines {
            *line = align_line(line, inner_width, self.align);
        }

        if let Some(h) = self.height {
            let target = h as usize;
            while lines.len() < target {
                lines.push(" ".repeat(inner_width));
            }
        }

        if let Some(mw) = self.max_width {
            lines = lines.iter().map(|l| tea_text::truncate(l, mw as usize)).collect();
        }
        if let Some(mh) = self.max_height {
            lines.truncate(mh as usize);
        }

        let prefix = self.sgr_prefix();
        if !prefix.is_empty() {
            lines = lines
                .iter()
                .map(|l| format!("{prefix}{l}\u{1b}[0m"))
                .collect();
        }

        lines = apply_padding(lines, self.padding, inner_width);
        lines = apply_border(lines, self.border_kind.0, self.border_sides, self.border_fg);
        let framed_width = lines.first().map(|l| tea_text::visible_width(l)).unwrap_or(0);
        lines = apply_margin(lines, self.margin, framed_width);

        lines.join("\n")
    }
}

fn align_line(line: &str, width: usize, align: Align) -> String {
    let w = tea_text::visible_width(line);
    if w >= width {
        return line.to_string();
    }
    let gap = width - w;
    match align {
        Align::Left => tea_text::pad_right(line, width),
        Align::Right => format!("{}{}", " ".repeat(gap), line),
        Align::Center => {
            let left = gap / 2;
            let right = gap - left;
            format!("{}{}{}", " ".repeat(left), line, " ".repeat(right))
        }
    }
}

fn apply_padding(lines: Vec<String>, padding: Sides, inner_width: usize) -> Vec<String> {
    let total = inner_width + padding.horizontal() as usize;
    let left = " ".repeat(padding.left as usize);
    let right = " ".repeat(padding.right as usize);
    let mut out = Vec::with_capacity(lines.len() + padding.vertical() as usize);
    for _ in 0..padding.top {
        out.push(" ".repeat(total));
    }
    for l in lines {
        out.push(format!("{left}{l}{right}"));
    }
    for _ in 0..padding.bottom {
        out.push(" ".repeat(total));
    }
    out
}

fn colorize(glyphs: &str, fg: Option<Color>) -> String {
    match fg {
        Some(Color(r, g, b)) => format!("\u{1b}[38;2;{r};{g};{b}m{glyphs}\u{1b}[0m"),
        None => glyphs.to_string(),
    }
}

fn apply_border(
    lines: Vec<String>,
    kind: BorderKind,
    sides: BorderSides,
    fg: Option<Color>,
) -> Vec<String> {
    let Some(g) = kind.glyphs() else {
        return lines;
    };
    let content_width = lines
        .iter()
        .map(|l| tea_text::visible_width(l))
        .max()
        .unwrap_or(0);
    let mut out = Vec::with_capacity(lines.len() + 2);

    if sides.contains(BorderSides::TOP) {
        let mut row = String::new();
        if sides.contains(BorderSides::LEFT) {
            row.push(g.top_left);
        }
        row.extend(std::iter::repeat_n(g.top, content_width));
        if sides.contains(BorderSides::RIGHT) {
            row.push(g.top_right);
        }
        out.push(colorize(&row, fg));
    }

    for l in lines {
        let left = if sides.contains(BorderSides::LEFT) {
            colorize(&g.left.to_string(), fg)
        } else {
            String::new()
        };
        let right = if sides.contains(BorderSides::RIGHT) {
            colorize(&g.right.to_string(), fg)
        } else {
            String::new()
        };
        out.push(format!("{left}{l}{right}"));
    }

    if sides.contains(BorderSides::BOTTOM) {
        let mut row = String::new();
        if sides.contains(BorderSides::LEFT) {
            row.push(g.bottom_left);
        }
        row.extend(std::iter::repeat_n(g.bottom, content_width));
        if sides.contains(BorderSides::RIGHT) {
            row.push(g.bottom_right);
        }
        out.push(colorize(&row, fg));
    }

    out
}

fn apply_margin(lines: Vec<String>, margin: Sides, content_width: usize) -> Vec<String> {
    let total = content_width + margin.horizontal() as usize;
    let left = " ".repeat(margin.left as usize);
    let right = " ".repeat(margin.right as usize);
    let mut out = Vec::with_capacity(lines.len() + margin.vertical() as usize);
    for _ in 0..margin.top {
        out.push(" ".repeat(total));
    }
    for l in lines {
        out.push(format!("{left}{l}{right}"));
    }
    for _ in 0..margin.bottom {
        out.push(" ".repeat(total));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immutability_of_setters() {
        let base = Style::new();
        let _ = base.bold().fg(Color(1, 2, 3)).padding(&[1]);
        assert_eq!(base, Style::new());
    }

    #[test]
    fn rectangularity_with_multiline_input() {
        let st = Style::new().width(10);
        let out = st.render("hi\nhello there");
        let widths: Vec<usize> = out.split('\n').map(tea_text::visible_width).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn border_and_padding_rectangularity() {
        let st = Style::new().border(BorderKind::Normal).padding(&[1]).width(10);
        let out = st.render("hi");
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 5);
        for line in &lines {
            assert_eq!(tea_text::visible_width(line), 12);
        }
        assert!(lines[0].starts_with('┌'));
        assert!(lines[0].ends_with('┐'));
        assert!(lines[4].starts_with('└'));
        assert!(lines[4].ends_with('┘'));
    }

    #[test]
    fn sgr_resets_at_line_end_to_avoid_bleed() {
        let st = Style::new().bold().width(4);
        let out = st.render("hi");
        assert!(out.ends_with("\u{1b}[0m"));
    }

    #[test]
    fn css_shorthand_variants() {
        assert_eq!(
            css_shorthand(&[2]),
            Sides { top: 2, right: 2, bottom: 2, left: 2 }
        );
        assert_eq!(
            css_shorthand(&[1, 2]),
            Sides { top: 1, right: 2, bottom: 1, left: 2 }
        );
        assert_eq!(
            css_shorthand(&[1, 2, 3]),
            Sides { top: 1, right: 2, bottom: 3, left: 2 }
        );
        assert_eq!(
            css_shorthand(&[1, 2, 3, 4]),
            Sides { top: 1, right: 2, bottom: 3, left: 4 }
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rectangularity(s in "[a-zA-Z0-9 ]{0,30}", width in 1u16..30) {
            let st = Style::new().width(width);
            let out = st.render(&s);
            let widths: Vec<usize> = out.split('\n').map(tea_text::visible_width).collect();
            prop_assert!(widths.iter().all(|w| *w == widths[0]));
        }
    }
}
