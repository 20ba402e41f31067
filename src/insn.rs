//! Bytecode instructions for a compiled regex

use crate::flags::Flags;
use crate::types::{BracketContents, CaptureGroupID, LoopID};
use core::fmt;
use core::ops::Range;
use memchr::memmem;

pub type JumpTarget = u32;

#[derive(Debug, Clone)]
pub struct LoopFields {
    pub loop_id: LoopID,
    pub min_iters: usize,
    pub max_iters: usize,
    pub greedy: bool,
    pub exit: JumpTarget,
}

#[derive(Debug, Clone)]
/// The list of bytecode instructions.
pub enum Insn {
    /// The match was successful.
    Goal,

    /// Match a single char.
    Char(char),

    /// Match a single char, case-insensitive. The char is folded.
    CharICase(char),

    /// Match the start of a line (if multiline); emitted by '^'
    StartOfLine { multiline: bool },

    /// Match the end of a line (if multiline); emitted by '$'
    EndOfLine { multiline: bool },

    /// Match the start of the input; emitted by \A.
    StartOfText,

    /// Match the end of the input; emitted by \z.
    EndOfText,

    /// Match the end of the input, or just before a final newline; emitted by \Z.
    EndOfTextOrFinalNewline,

    /// Match any character; emitted by '.' when dots match newlines.
    MatchAny,

    /// Match any character except a line terminator; emitted by '.'
    MatchAnyExceptLineTerminator,

    /// Enter a loop from "outside".
    EnterLoop(LoopFields),

    /// Re-enter a loop.
    LoopAgain { begin: JumpTarget },

    /// The next instruction is a "1Char" instruction which always matches one
    /// character. Attempt to match it [min, max] times.
    Loop1CharBody {
        min_iters: usize,
        max_iters: usize,
        greedy: bool,
    },

    /// Set the IP to a new value.
    Jump { target: JumpTarget },

    /// The next instruction is the primary branch.
    /// If it fails to match, jump to secondary.
    Alt { secondary: JumpTarget },

    /// Enter a capture group.
    BeginCaptureGroup(CaptureGroupID),

    /// Exit a capture group.
    EndCaptureGroup(CaptureGroupID),

    /// Clear a capture group.
    ResetCaptureGroup(CaptureGroupID),

    /// Perform a backreference match against a 0-based group.
    BackRef { group: u32, icase: bool },

    /// Match the next character against the bracket contents, stored at the given index in the CompiledRegex.
    Bracket(usize),

    /// Perform a lookahead assertion.
    Lookahead {
        negate: bool,
        start_group: CaptureGroupID,
        end_group: CaptureGroupID,
        continuation: JumpTarget,
    },

    /// Perform a lookbehind assertion.
    Lookbehind {
        negate: bool,
        start_group: CaptureGroupID,
        end_group: CaptureGroupID,
        continuation: JumpTarget,
    },

    /// Match the following instructions up to their Goal once, without
    /// backtracking into them, then continue.
    Atomic { continuation: JumpTarget },

    /// \b or \B word boundaries.
    WordBoundary { invert: bool },

    /// \< or \> word edges.
    WordEdge { start: bool },

    /// An instruction that always fails, which may be produced in weird cases
    /// like an inverted bracket which matches everything.
    JustFail,
}

/// The peeled prefix start predicate.
/// This is a fast way of locating the first potential match.
#[derive(Debug, Clone)]
pub enum StartPredicate {
    /// May match an arbitrary sequence.
    Arbitrary,

    /// Look for the first instance of any of the given bytes.
    ByteSet1([u8; 1]),
    ByteSet2([u8; 2]),
    ByteSet3([u8; 3]),

    /// Look for a byte sequence.
    ByteSeq(Box<memmem::Finder<'static>>),

    /// The regex is anchored to the start of the string.
    /// This avoids string searching entirely and only tries matching at the beginning.
    StartAnchored,
}

#[derive(Debug, Clone)]
pub struct CompiledRegex {
    // Sequence of instructions.
    pub insns: Vec<Insn>,

    // The bracket contents, indexed by the value of the `Bracket` instruction.
    pub brackets: Vec<BracketContents>,

    // Predicate to rapidly find the first potential match.
    pub start_pred: StartPredicate,

    // Number of loops, used to populate loop data.
    pub loops: u32,

    // Number of capture groups, used to populate capture group data.
    pub groups: u32,

    // A list of capture group names. This is either:
    //   - Empty, if there were no named capture groups.
    //   - A list of names with length `groups`, corresponding to the capture
    //     group names in order. Groups without names have an empty string.
    pub group_names: Box<[Box<str>]>,

    // Pattern byte ranges of each capture group.
    pub subexpressions: Vec<Range<usize>>,

    // Flags the regex was compiled with.
    pub flags: Flags,

    // Whether to report the longest match at the leftmost position rather
    // than the first by priority.
    pub longest: bool,
}

impl fmt::Display for CompiledRegex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "start predicate: {:?}", self.start_pred)?;
        for (ip, insn) in self.insns.iter().enumerate() {
            match insn {
                &Insn::Bracket(idx) => writeln!(f, "{:4}: Bracket {:?}", ip, self.brackets[idx])?,
                _ => writeln!(f, "{:4}: {:?}", ip, insn)?,
            }
        }
        Ok(())
    }
}
