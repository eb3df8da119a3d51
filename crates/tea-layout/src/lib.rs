//! Block join (horizontal/vertical) and 2D placement.
//!
//! Invariants:
//! - `join_horizontal`/`join_vertical` never drop a line: every input block
//!   contributes exactly its own line count to the output, padded to the
//!   group's max height/width.
//! - `place` never exceeds the requested canvas width on padded lines.

use tea_style::Align;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Pads each block to the max height of the group (blank lines added per
/// `valign`), then concatenates lines at equal index, left to right. Each
/// line is padded to its own block's width with spaces first.
pub fn join_horizontal(blocks: &[&str], valign: VAlign) -> String {
    if blocks.is_empty() {
        return String::new();
    }
    let block_lines: Vec<Vec<&str>> = blocks.iter().map(|b| b.split('\n').collect()).collect();
    let max_height = block_lines.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = block_lines
        .iter()
        .map(|lines| lines.iter().map(|l| tea_text::visible_width(l)).max().unwrap_or(0))
        .collect();

    let columns: Vec<Vec<String>> = block_lines
        .iter()
        .zip(widths.iter())
        .map(|(lines, &w)| {
            let deficit = max_height - lines.len();
            let (top, bottom) = match valign {
                VAlign::Top => (0, deficit),
                VAlign::Bottom => (deficit, 0),
                VAlign::Center => (deficit / 2, deficit - deficit / 2),
            };
            let blank = " ".repeat(w);
            let mut out = Vec::with_capacity(max_height);
            out.extend(std::iter::repeat_n(blank.clone(), top));
            out.extend(lines.iter().map(|l| tea_text::pad_right(l, w)));
            out.extend(std::iter::repeat_n(blank, bottom));
            out
        })
        .collect();

    (0..max_height)
        .map(|i| columns.iter().map(|col| col[i].as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn align_to_width(line: &str, width: usize, align: Align) -> String {
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

/// Pads each block to the max width of the group, aligns, then
/// concatenates blocks top to bottom.
pub fn join_vertical(blocks: &[&str], halign: Align) -> String {
    if blocks.is_empty() {
        return String::new();
    }
    let max_width = blocks
        .iter()
        .flat_map(|b| b.split('\n'))
        .map(tea_text::visible_width)
        .max()
        .unwrap_or(0);

    blocks
        .iter()
        .flat_map(|b| b.split('\n'))
        .map(|l| align_to_width(l, max_width, halign))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Embeds `content` in a `width x height` canvas. `h_pos`/`v_pos` range over
/// `[0.0, 1.0]` (0 = start, 0.5 = center, 1 = end); remainder is filled with
/// spaces.
pub fn place(width: usize, height: usize, h_pos: f32, v_pos: f32, content: &str) -> String {
    let lines: Vec<&str> = content.split('\n').collect();
    let content_width = lines.iter().map(|l| tea_text::visible_width(l)).max().unwrap_or(0);
    let content_height = lines.len();

    let extra_h = width.saturating_sub(content_width);
    let left = ((extra_h as f32) * h_pos.clamp(0.0, 1.0)).round() as usize;

    let extra_v = height.saturating_sub(content_height);
    let top = ((extra_v as f32) * v_pos.clamp(0.0, 1.0)).round() as usize;
    let bottom = extra_v - top;

    let mut out = Vec::with_capacity(height);
    out.extend(std::iter::repeat_n(" ".repeat(width), top));
    for l in &lines {
        let w = tea_text::visible_width(l);
        let right = width.saturating_sub(w + left);
        out.push(format!("{}{}{}", " ".repeat(left), l, " ".repeat(right)));
    }
    out.extend(std::iter::repeat_n(" ".repeat(width), bottom));
    out.join("\n")
}
