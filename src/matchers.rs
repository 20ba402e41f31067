use crate::cursor;
use crate::cursor::Direction;
use crate::folds;
use crate::indexing::Input;
use core::ops::Range;

/// \return whether this is a word char, the same set as `\w`.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Check whether the text in \p orig_range matches at position \p pos.
pub fn backref<Dir: Direction>(
    input: &Input,
    dir: Dir,
    orig_range: Range<usize>,
    pos: &mut usize,
) -> bool {
    cursor::subrange_eq(input, dir, pos, orig_range.start, orig_range.end)
}

/// Like backref, but comparing case-insensitively char by char.
pub fn backref_icase<Dir: Direction>(
    input: &Input,
    dir: Dir,
    orig_range: Range<usize>,
    pos: &mut usize,
) -> bool {
    let ref_input = Input::new(input.slice(orig_range));
    let mut ref_pos = if Dir::FORWARD { 0 } else { ref_input.len() };
    while let Some(c1) = cursor::next(&ref_input, dir, &mut ref_pos) {
        let mut matched = false;
        if let Some(c2) = cursor::next(input, dir, pos) {
            matched = folds::fold_equals(c1, c2)
        }
        if !matched {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{Backward, Forward};

    #[test]
    fn word_chars() {
        assert!(is_word_char('a'));
        assert!(is_word_char('_'));
        assert!(!is_word_char('\u{00E9}'));
        assert!(!is_word_char('-'));
        assert!(!is_word_char(' '));
    }

    #[test]
    fn backrefs_both_directions() {
        let input = Input::new("abcABCabc");
        let mut pos = 6;
        assert!(backref(&input, Forward, 0..3, &mut pos));
        assert_eq!(pos, 9);

        let mut pos = 3;
        assert!(!backref(&input, Forward, 0..3, &mut pos));
        let mut pos = 3;
        assert!(backref_icase(&input, Forward, 0..3, &mut pos));
        assert_eq!(pos, 6);

        let mut pos = 6;
        assert!(backref_icase(&input, Backward, 0..3, &mut pos));
        assert_eq!(pos, 3);
    }
}
