use crate::cursor;
use crate::cursor::Direction;
use crate::folds;
use crate::indexing::Input;
use crate::matchers;
use crate::types::BracketContents;

/// A trait for things that match a single char.
pub trait SingleCharMatcher<Dir: Direction> {
    /// \return whether we match the character at the given position, advancing
    /// the position if so. On a false return, the position is unspecified.
    fn matches(&self, input: &Input, dir: Dir, pos: &mut usize) -> bool;
}

/// Insn::Char
pub struct Char {
    pub c: char,
}

impl<Dir: Direction> SingleCharMatcher<Dir> for Char {
    #[inline(always)]
    fn matches(&self, input: &Input, dir: Dir, pos: &mut usize) -> bool {
        match cursor::next(input, dir, pos) {
            Some(c2) => c2 == self.c,
            _ => false,
        }
    }
}

/// Insn::CharICase. The stored char is already folded.
pub struct CharICase {
    pub c: char,
}

impl<Dir: Direction> SingleCharMatcher<Dir> for CharICase {
    #[inline(always)]
    fn matches(&self, input: &Input, dir: Dir, pos: &mut usize) -> bool {
        match cursor::next(input, dir, pos) {
            Some(c2) => c2 == self.c || folds::fold(c2) == self.c,
            _ => false,
        }
    }
}

/// Insn::Bracket
pub struct Bracket<'a> {
    pub bc: &'a BracketContents,
}

impl<'a, Dir: Direction> SingleCharMatcher<Dir> for Bracket<'a> {
    #[inline(always)]
    fn matches(&self, input: &Input, dir: Dir, pos: &mut usize) -> bool {
        match cursor::next(input, dir, pos) {
            Some(c) => self.bc.matches(c),
            _ => false,
        }
    }
}

/// Insn::MatchAny
pub struct MatchAny {}

impl MatchAny {
    pub fn new() -> Self {
        Self {}
    }
}

impl<Dir: Direction> SingleCharMatcher<Dir> for MatchAny {
    #[inline(always)]
    fn matches(&self, input: &Input, dir: Dir, pos: &mut usize) -> bool {
        // If there is a character, it counts as a match.
        cursor::next(input, dir, pos).is_some()
    }
}

/// Insn::MatchAnyExceptLineTerminator
pub struct MatchAnyExceptLineTerminator {}

impl MatchAnyExceptLineTerminator {
    pub fn new() -> Self {
        Self {}
    }
}

impl<Dir: Direction> SingleCharMatcher<Dir> for MatchAnyExceptLineTerminator {
    #[inline(always)]
    fn matches(&self, input: &Input, dir: Dir, pos: &mut usize) -> bool {
        match cursor::next(input, dir, pos) {
            Some(c2) => !matchers::is_line_terminator(c2),
            _ => false,
        }
    }
}
