use crate::classicalbacktrack;
use crate::emit;
use crate::error::{Error, ResourceLimit, SyntaxError};
use crate::flags::Flags;
use crate::insn::CompiledRegex;
use crate::limits::Limits;
use crate::optimizer;
use crate::parse;
use crate::registers::Registers;

use core::hash::{Hash, Hasher};
use core::ops::Range;
use core::{fmt, str::FromStr};
use log::debug;
use std::sync::Arc;

/// A compiled regular expression.
///
/// A Regex remembers the source text and flags it was built from. Two
/// Regexes are equal when both are equal, regardless of how they were
/// constructed. The compiled program is shared, so cloning is cheap.
#[derive(Debug, Clone)]
pub struct Regex {
    source: Box<str>,
    flags: Flags,

    // The compiled program, or the reason compilation failed. Only patterns
    // constructed with `Flags::NO_EXCEPT` may hold an error.
    program: Result<Arc<CompiledRegex>, SyntaxError>,
}

fn compile(pattern: &str, flags: Flags, optimize: bool) -> Result<CompiledRegex, SyntaxError> {
    let mut ire = parse::try_parse(pattern, flags)?;
    if optimize {
        optimizer::optimize(&mut ire);
    }
    Ok(emit::emit(&ire))
}

impl Regex {
    /// Construct a regex by parsing `pattern` with the Perl grammar.
    ///
    /// ```rust
    /// use hostregex::Regex;
    /// let re = Regex::new(r"a(b)c").unwrap();
    /// assert_eq!(re.group_count(), 1);
    /// ```
    #[inline]
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Self::with_flags(pattern, Flags::NORMAL)
    }

    /// Construct a regex by parsing `pattern` with `flags`.
    ///
    /// If the pattern is invalid and `flags` contains `Flags::NO_EXCEPT`,
    /// construction succeeds: the returned Regex has `Flags::FAILBIT` set and
    /// every search on it fails with the syntax error.
    #[inline]
    pub fn with_flags<F>(pattern: &str, flags: F) -> Result<Regex, Error>
    where
        F: Into<Flags>,
    {
        Self::build(pattern, flags.into(), true)
    }

    fn build(pattern: &str, flags: Flags, optimize: bool) -> Result<Regex, Error> {
        match compile(pattern, flags, optimize) {
            Ok(cr) => {
                debug!(
                    "compiled {:?} with {} groups and flags {:#x}",
                    pattern,
                    cr.groups,
                    flags.bits()
                );
                Ok(Regex {
                    source: pattern.into(),
                    flags,
                    program: Ok(Arc::new(cr)),
                })
            }
            Err(err) if flags.contains(Flags::NO_EXCEPT) => {
                debug!("deferring error for {:?}: {}", pattern, err);
                Ok(Regex {
                    source: pattern.into(),
                    flags: flags | Flags::FAILBIT,
                    program: Err(err),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// \return the pattern text this regex was built from.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// \return the effective flags.
    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// \return the compilation error of a regex built under
    /// `Flags::NO_EXCEPT`, if any.
    #[inline]
    pub fn status(&self) -> Option<&SyntaxError> {
        self.program.as_ref().err()
    }

    /// \return whether the regex is case-insensitive.
    #[inline]
    pub fn casefold(&self) -> bool {
        self.flags.icase()
    }

    /// \return the number of capture groups, not counting the overall match.
    pub fn group_count(&self) -> usize {
        match &self.program {
            Ok(cr) => cr.groups as usize,
            Err(_) => 0,
        }
    }

    /// \return the names of capture groups, one entry per group with empty
    /// strings for unnamed groups, or an empty slice if no group is named.
    pub fn group_names(&self) -> &[Box<str>] {
        match &self.program {
            Ok(cr) => &cr.group_names,
            Err(_) => &[],
        }
    }

    /// \return the 1-based group index of the first group named \p name.
    pub fn group_index(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.group_names()
            .iter()
            .position(|n| n.as_ref() == name)
            .map(|idx| idx + 1)
    }

    /// \return the byte range in the source of capture group \p idx (where
    /// 0 is the whole pattern). Only available for regexes compiled with
    /// `Flags::SAVE_SUBEXPRESSION_LOCATION`.
    pub fn subexpression(&self, idx: usize) -> Option<Range<usize>> {
        if !self.flags.contains(Flags::SAVE_SUBEXPRESSION_LOCATION) {
            return None;
        }
        if idx == 0 {
            return Some(0..self.source.len());
        }
        let cr = self.program.as_ref().ok()?;
        cr.subexpressions.get(idx - 1).cloned()
    }

    /// Search \p text for the leftmost match at or after byte offset
    /// \p start, with default limits.
    ///
    /// On a match, `regs` receives the overall match in slot 0 and one slot
    /// per capture group. On no match, `regs` is invalidated. On error, `regs`
    /// is left untouched.
    ///
    /// ```rust
    /// use hostregex::{Registers, Regex};
    /// let re = Regex::new(r"a(b)c").unwrap();
    /// let mut regs = Registers::new();
    /// assert!(re.search("xxabcxx", 0, &mut regs).unwrap());
    /// assert_eq!(regs.get(0), Some(2..5));
    /// assert_eq!(regs.get(1), Some(3..4));
    /// ```
    #[inline]
    pub fn search(&self, text: &str, start: usize, regs: &mut Registers) -> Result<bool, Error> {
        self.search_with_limits(text, start, &Limits::default(), regs)
    }

    /// Like `search`, with explicit resource limits.
    pub fn search_with_limits(
        &self,
        text: &str,
        start: usize,
        limits: &Limits,
        regs: &mut Registers,
    ) -> Result<bool, Error> {
        let cr = match &self.program {
            Ok(cr) => cr,
            Err(err) => return Err(err.clone().into()),
        };
        if start > text.len() || !text.is_char_boundary(start) {
            regs.clear();
            return Ok(false);
        }
        match classicalbacktrack::search(cr, text, start, limits, regs) {
            Ok(true) => Ok(true),
            Ok(false) => {
                regs.clear();
                Ok(false)
            }
            Err(limit) => {
                self.log_exhausted(text, limit);
                Err(limit.into())
            }
        }
    }

    fn log_exhausted(&self, text: &str, limit: ResourceLimit) {
        debug!(
            "search for {:?} over {} bytes gave up: {}",
            self.source,
            text.len(),
            limit
        );
    }

    /// \return the byte offset of the leftmost match in \p text.
    pub fn index_of(&self, text: &str) -> Result<Option<usize>, Error> {
        let mut regs = Registers::new();
        if self.search(text, 0, &mut regs)? {
            Ok(regs.get(0).map(|r| r.start))
        } else {
            Ok(None)
        }
    }

    /// \return whether \p text contains a match.
    pub fn is_match(&self, text: &str) -> Result<bool, Error> {
        Ok(self.index_of(text)?.is_some())
    }
}

impl PartialEq for Regex {
    fn eq(&self, other: &Self) -> bool {
        self.flags == other.flags && self.source == other.source
    }
}

impl Eq for Regex {}

impl Hash for Regex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.flags.hash(state);
        self.source.hash(state);
    }
}

impl fmt::Display for Regex {
    /// Writes the host inspect form, like `/ab+c/mi`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    #[inline]
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s)
    }
}

// Support for driving the compiler in stages.
#[doc(hidden)]
pub mod backends {
    use super::{Error, Flags, Regex};
    pub use crate::emit::emit;
    pub use crate::optimizer::optimize;
    pub use crate::parse::try_parse;

    /// Construct a regex, optionally skipping IR optimization.
    pub fn compile(pattern: &str, flags: Flags, optimize: bool) -> Result<Regex, Error> {
        Regex::build(pattern, flags, optimize)
    }

    /// \return a dump of the bytecode of \p re, or None if it failed to
    /// compile.
    pub fn dump_bytecode(re: &Regex) -> Option<String> {
        re.program.as_ref().ok().map(|cr| cr.to_string())
    }
}
