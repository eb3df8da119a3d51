//! Per-code-point display width classification.
//!
//! Evaluated per Unicode scalar value, not per grapheme cluster: combining
//! marks and joiners are zero-width on their own, East-Asian-wide and emoji
//! ranges are width 2, everything else is width 1. A real grapheme-aware
//! engine would instead measure whole clusters; that is explicitly out of
//! scope here.

const ZWJ: char = '\u{200D}';

fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}'
        | '\u{1AB0}'..='\u{1AFF}'
        | '\u{1DC0}'..='\u{1DFF}'
        | '\u{20D0}'..='\u{20FF}'
        | '\u{FE00}'..='\u{FE0F}' // variation selectors, incl. VS16
        | '\u{200B}'              // zero width space
    )
}

fn is_wide(c: char) -> bool {
    matches!(c,
        '\u{1100}'..='\u{115F}'    // Hangul Jamo
        | '\u{2E80}'..='\u{303E}'  // CJK Radicals, Kangxi, CJK Symbols & Punctuation
        | '\u{3041}'..='\u{33FF}'  // Hiragana .. CJK Compatibility
        | '\u{3400}'..='\u{4DBF}'  // CJK Unified Ideographs Extension A
        | '\u{4E00}'..='\u{9FFF}'  // CJK Unified Ideographs
        | '\u{A000}'..='\u{A4CF}'  // Yi Syllables / Radicals
        | '\u{AC00}'..='\u{D7A3}'  // Hangul Syllables
        | '\u{F900}'..='\u{FAFF}'  // CJK Compatibility Ideographs
        | '\u{FF00}'..='\u{FF60}'  // Fullwidth Forms
        | '\u{FFE0}'..='\u{FFE6}'  // Fullwidth Signs
        | '\u{1F300}'..='\u{1FAFF}' // emoji & symbol blocks
        | '\u{2600}'..='\u{27BF}'   // Misc Symbols & Dingbats (legacy emoji)
        | '\u{20000}'..='\u{3FFFD}' // CJK Unified Ideographs Extension B and beyond
    )
}

/// Display width of a single Unicode scalar value, in terminal columns.
pub fn char_width(c: char) -> usize {
    if c == '\t' {
        return 1;
    }
    if c == ZWJ || is_combining_mark(c) {
        return 0;
    }
    if c.is_control() {
        return 0;
    }
    if is_wide(c) {
        return 2;
    }
    unicode_width::UnicodeWidthChar::width(c).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one() {
        assert_eq!(char_width('a'), 1);
    }

    #[test]
    fn tab_is_one() {
        assert_eq!(char_width('\t'), 1);
    }

    #[test]
    fn cjk_is_two() {
        assert_eq!(char_width('界'), 2);
    }

    #[test]
    fn combining_mark_is_zero() {
        assert_eq!(char_width('\u{0301}'), 0);
    }

    #[test]
    fn emoji_is_two() {
        assert_eq!(char_width('😀'), 2);
    }

    #[test]
    fn control_is_zero() {
        assert_eq!(char_width('\u{0007}'), 0);
    }
}
