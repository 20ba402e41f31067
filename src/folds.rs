//! Simple case folding built on the standard library's case mappings.

/// \return the single-character lowercase mapping of \p c, or \p c itself
/// when the mapping is not a single character.
#[inline]
pub fn fold(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    single(c.to_lowercase()).unwrap_or(c)
}

/// \return whether two characters are equal after folding.
#[inline]
pub fn fold_equals(c1: char, c2: char) -> bool {
    c1 == c2 || fold(c1) == fold(c2)
}

/// \return \p c together with its single-character lower and upper case
/// mappings. Duplicates are possible.
pub fn case_variants(c: char) -> [char; 3] {
    if c.is_ascii() {
        return [c, c.to_ascii_lowercase(), c.to_ascii_uppercase()];
    }
    [
        c,
        single(c.to_lowercase()).unwrap_or(c),
        single(c.to_uppercase()).unwrap_or(c),
    ]
}

/// \return whether \p c has no case variants other than itself.
pub fn is_caseless(c: char) -> bool {
    case_variants(c).iter().all(|&v| v == c)
}

fn single<I: Iterator<Item = char>>(mut iter: I) -> Option<char> {
    let c = iter.next()?;
    match iter.next() {
        None => Some(c),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_folds() {
        assert_eq!(fold('A'), 'a');
        assert_eq!(fold('a'), 'a');
        assert_eq!(fold('_'), '_');
        assert!(fold_equals('Q', 'q'));
        assert!(!fold_equals('Q', 'r'));
    }

    #[test]
    fn non_ascii_folds() {
        assert_eq!(fold('\u{00C9}'), '\u{00E9}');
        assert!(fold_equals('\u{0394}', '\u{03B4}'));
        // U+0130 lowercases to two characters and so folds to itself.
        assert_eq!(fold('\u{0130}'), '\u{0130}');
    }

    #[test]
    fn variants() {
        assert_eq!(case_variants('k'), ['k', 'k', 'K']);
        assert!(is_caseless('7'));
        assert!(!is_caseless('x'));
    }
}
