use crate::codepointset::{CodePointSet, CODE_POINT_MAX};
use crate::folds;
use core::ops;

/// A group index is u16.
/// CaptureGroupID 0 corresponds to the first capture group.
pub type CaptureGroupID = u16;

/// The name of a named capture group.
pub type CaptureGroupName = Box<str>;

/// The maximum number of capture groups supported.
pub const MAX_CAPTURE_GROUPS: usize = 65535;

/// The maximum number of loops supported.
pub const MAX_LOOPS: usize = 65535;

/// The maximum nesting of groups and stacked quantifiers.
pub const MAX_NESTING_DEPTH: u32 = 128;
pub type LoopID = u16;

/// An instruction pointer.
pub type IP = usize;

/// A byte offset into the input.
pub type Position = usize;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CharacterClassType {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digits,
    Graph,
    Lower,
    Print,
    Punct,
    Spaces,
    Upper,
    Words,
    XDigits,
}

impl CharacterClassType {
    /// Look up a POSIX class name as written in `[[:name:]]`.
    pub fn from_posix_name(name: &str) -> Option<Self> {
        Some(match name {
            "alnum" => Self::Alnum,
            "alpha" => Self::Alpha,
            "blank" => Self::Blank,
            "cntrl" => Self::Cntrl,
            "digit" | "d" => Self::Digits,
            "graph" => Self::Graph,
            "lower" | "l" => Self::Lower,
            "print" => Self::Print,
            "punct" => Self::Punct,
            "space" | "s" => Self::Spaces,
            "upper" | "u" => Self::Upper,
            "word" | "w" => Self::Words,
            "xdigit" => Self::XDigits,
            _ => return None,
        })
    }
}

/// The stuff in a bracket.
#[derive(Debug, Clone, Default)]
pub struct BracketContents {
    pub invert: bool,
    pub icase: bool,
    pub cps: CodePointSet,
}

impl BracketContents {
    /// \return whether the bracket matches the character \p c.
    /// Respects 'invert' and 'icase'.
    #[inline]
    pub fn matches(&self, c: char) -> bool {
        let contained = if self.icase {
            folds::case_variants(c)
                .iter()
                .any(|&v| self.cps.contains(v as u32))
        } else {
            self.cps.contains(c as u32)
        };
        contained != self.invert
    }

    /// Return true if the bracket can never match.
    pub fn is_empty(&self) -> bool {
        if self.invert {
            self.cps.count_codepoints() > CODE_POINT_MAX as usize
        } else {
            self.cps.is_empty()
        }
    }
}

/// Representation of a loop.
#[derive(Debug, Copy, Clone)]
pub struct LoopData {
    pub iters: usize,
    pub entry: Position,
}

impl LoopData {
    pub fn new(entry: Position) -> LoopData {
        LoopData { iters: 0, entry }
    }
}

/// Representation of a capture group.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GroupData {
    pub start: Option<Position>,
    pub end: Option<Position>,
}

impl GroupData {
    pub fn new() -> GroupData {
        GroupData {
            start: None,
            end: None,
        }
    }

    pub fn start_matched(&self) -> bool {
        self.start.is_some()
    }

    pub fn end_matched(&self) -> bool {
        self.end.is_some()
    }

    pub fn as_range(&self) -> Option<ops::Range<Position>> {
        // Note: we may have only start_matched (if forwards) or end_matched (if
        // backwards) set.
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(ops::Range { start, end }),
            _ => None,
        }
    }

    /// Reset the group to "not entered."
    pub fn reset(&mut self) {
        self.start = None;
        self.end = None;
    }
}
