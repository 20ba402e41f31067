//! Dialect and modifier flags for compiling a pattern.

use core::{fmt, ops, str::FromStr};

/// A bitmask selecting the pattern grammar and its modifiers.
///
/// The numeric values are stable and shared with the host environment: the
/// low byte selects the grammar, bits 8..16 are grammar-specific, and the
/// remaining bits apply to every grammar. Because bits 8..16 are interpreted
/// per grammar, `NO_BK_REFS` and `NO_CHAR_CLASSES` (for example) share a value.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Flags(u32);

/// The grammar a pattern is parsed with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Syntax {
    Perl,
    Basic,
    Literal,
}

impl Flags {
    /// Perl grammar with no modifiers.
    pub const NORMAL: Flags = Flags(0);
    pub const PERL: Flags = Flags::NORMAL;
    pub const ECMASCRIPT: Flags = Flags::NORMAL;
    pub const JAVASCRIPT: Flags = Flags::NORMAL;
    pub const JSCRIPT: Flags = Flags::NORMAL;
    /// Accepted for compatibility; patterns are always optimized.
    pub const OPTIMIZE: Flags = Flags(0);

    /// Selects the POSIX basic grammar.
    pub const BASIC_SYNTAX_GROUP: Flags = Flags(1);
    /// Every character of the pattern matches itself.
    pub const LITERAL: Flags = Flags(2);
    const MAIN_OPTION_TYPE: u32 = 3;

    // Perl grammar options.
    pub const NO_BK_REFS: Flags = Flags(1 << 8);
    pub const NO_PERL_EX: Flags = Flags(1 << 9);
    pub const NO_MOD_M: Flags = Flags(1 << 10);
    pub const MOD_X: Flags = Flags(1 << 11);
    pub const MOD_S: Flags = Flags(1 << 12);
    pub const NO_MOD_S: Flags = Flags(1 << 13);

    // POSIX basic grammar options.
    pub const NO_CHAR_CLASSES: Flags = Flags(1 << 8);
    pub const NO_INTERVALS: Flags = Flags(1 << 9);
    pub const BK_PLUS_QM: Flags = Flags(1 << 10);
    pub const BK_VBAR: Flags = Flags(1 << 11);

    // Options common to every grammar.
    pub const NO_ESCAPE_IN_LISTS: Flags = Flags(1 << 16);
    pub const NEWLINE_ALT: Flags = Flags(1 << 17);
    pub const NO_EXCEPT: Flags = Flags(1 << 18);
    /// Set on a pattern whose compilation failed under `NO_EXCEPT`.
    pub const FAILBIT: Flags = Flags(1 << 19);
    pub const ICASE: Flags = Flags(1 << 20);
    pub const COLLATE: Flags = Flags(1 << 21);
    pub const NOSUBS: Flags = Flags(1 << 22);
    pub const SAVE_SUBEXPRESSION_LOCATION: Flags = Flags(1 << 23);
    pub const NO_EMPTY_EXPRESSIONS: Flags = Flags(1 << 24);

    // Composite dialects.
    pub const BASIC: Flags = Flags(1 | (1 << 21) | (1 << 16));
    pub const SED: Flags = Flags::BASIC;
    pub const GREP: Flags = Flags(Flags::BASIC.0 | (1 << 17));
    pub const EXTENDED: Flags = Flags((1 << 8) | (1 << 21) | (1 << 9) | (1 << 16));
    pub const EGREP: Flags = Flags(Flags::EXTENDED.0 | (1 << 17));
    pub const AWK: Flags = Flags((1 << 8) | (1 << 21) | (1 << 9));

    /// Construct from raw bits. Every value is accepted; invalid grammar
    /// combinations are reported when a pattern is compiled.
    #[inline]
    pub const fn from_bits(bits: u32) -> Flags {
        Flags(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// \return whether every bit of `other` is set in self.
    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    /// \return the grammar, or None for the invalid `BASIC | LITERAL` selector.
    pub(crate) fn syntax(self) -> Option<Syntax> {
        match self.0 & Flags::MAIN_OPTION_TYPE {
            0 => Some(Syntax::Perl),
            1 => Some(Syntax::Basic),
            2 => Some(Syntax::Literal),
            _ => None,
        }
    }

    fn perl_option(self, option: Flags) -> bool {
        self.syntax() == Some(Syntax::Perl) && self.contains(option)
    }

    fn basic_option(self, option: Flags) -> bool {
        self.syntax() == Some(Syntax::Basic) && self.contains(option)
    }

    #[inline]
    pub fn icase(self) -> bool {
        self.contains(Flags::ICASE)
    }

    pub(crate) fn no_bk_refs(self) -> bool {
        self.perl_option(Flags::NO_BK_REFS)
    }

    pub(crate) fn no_perl_ex(self) -> bool {
        self.perl_option(Flags::NO_PERL_EX)
    }

    pub(crate) fn mod_x(self) -> bool {
        self.perl_option(Flags::MOD_X)
    }

    pub(crate) fn mod_s(self) -> bool {
        self.perl_option(Flags::MOD_S)
    }

    pub(crate) fn no_mod_s(self) -> bool {
        self.perl_option(Flags::NO_MOD_S)
    }

    pub(crate) fn no_mod_m(self) -> bool {
        self.perl_option(Flags::NO_MOD_M)
    }

    pub(crate) fn char_classes(self) -> bool {
        !self.basic_option(Flags::NO_CHAR_CLASSES)
    }

    pub(crate) fn intervals(self) -> bool {
        !self.basic_option(Flags::NO_INTERVALS)
    }

    pub(crate) fn bk_plus_qm(self) -> bool {
        self.basic_option(Flags::BK_PLUS_QM)
    }

    pub(crate) fn bk_vbar(self) -> bool {
        self.basic_option(Flags::BK_VBAR)
    }

    /// POSIX grammars report the longest match at the leftmost position;
    /// Perl grammars report the first match by priority.
    pub(crate) fn leftmost_longest(self) -> bool {
        match self.syntax() {
            Some(Syntax::Basic) => true,
            Some(Syntax::Perl) => self.no_perl_ex(),
            _ => false,
        }
    }

    /// Look up a flag by its lowercase name, like "icase" or "egrep".
    pub fn from_name(name: &str) -> Option<Flags> {
        NAMED_FLAGS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, flags)| flags)
    }
}

/// Names accepted by `Flags::from_name` and `FromStr`.
const NAMED_FLAGS: &[(&str, Flags)] = &[
    ("normal", Flags::NORMAL),
    ("perl", Flags::PERL),
    ("ecmascript", Flags::ECMASCRIPT),
    ("javascript", Flags::JAVASCRIPT),
    ("jscript", Flags::JSCRIPT),
    ("optimize", Flags::OPTIMIZE),
    ("basic", Flags::BASIC),
    ("sed", Flags::SED),
    ("grep", Flags::GREP),
    ("extended", Flags::EXTENDED),
    ("egrep", Flags::EGREP),
    ("awk", Flags::AWK),
    ("literal", Flags::LITERAL),
    ("no_bk_refs", Flags::NO_BK_REFS),
    ("no_perl_ex", Flags::NO_PERL_EX),
    ("no_mod_m", Flags::NO_MOD_M),
    ("mod_x", Flags::MOD_X),
    ("mod_s", Flags::MOD_S),
    ("no_mod_s", Flags::NO_MOD_S),
    ("no_char_classes", Flags::NO_CHAR_CLASSES),
    ("no_intervals", Flags::NO_INTERVALS),
    ("bk_plus_qm", Flags::BK_PLUS_QM),
    ("bk_vbar", Flags::BK_VBAR),
    ("no_escape_in_lists", Flags::NO_ESCAPE_IN_LISTS),
    ("newline_alt", Flags::NEWLINE_ALT),
    ("no_except", Flags::NO_EXCEPT),
    ("icase", Flags::ICASE),
    ("collate", Flags::COLLATE),
    ("nosubs", Flags::NOSUBS),
    ("save_subexpression_location", Flags::SAVE_SUBEXPRESSION_LOCATION),
    ("no_empty_expressions", Flags::NO_EMPTY_EXPRESSIONS),
];

impl ops::BitOr for Flags {
    type Output = Flags;
    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl ops::BitOrAssign for Flags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0
    }
}

impl ops::BitAnd for Flags {
    type Output = Flags;
    #[inline]
    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl From<u32> for Flags {
    #[inline]
    fn from(bits: u32) -> Self {
        Flags(bits)
    }
}

impl From<Flags> for u32 {
    #[inline]
    fn from(flags: Flags) -> Self {
        flags.0
    }
}

/// Error returned when parsing an unknown flag name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown flag name '{0}'")]
pub struct UnknownFlag(pub String);

impl FromStr for Flags {
    type Err = UnknownFlag;

    /// Parse a `|`-separated list of flag names, like "perl|icase".
    /// A decimal number is taken as raw bits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = Flags::NORMAL;
        for name in s.split('|').map(str::trim).filter(|n| !n.is_empty()) {
            if let Ok(bits) = name.parse::<u32>() {
                result |= Flags(bits);
                continue;
            }
            match Flags::from_name(&name.to_ascii_lowercase()) {
                Some(flags) => result |= flags,
                None => return Err(UnknownFlag(name.to_string())),
            }
        }
        Ok(result)
    }
}

impl fmt::Display for Flags {
    /// Writes the host inspect suffix: `m` for dot-matches-newline, `i` for
    /// case-insensitive, `x` for whitespace-insensitive.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.contains(Flags::MOD_S) {
            f.write_str("m")?;
        }
        if self.contains(Flags::ICASE) {
            f.write_str("i")?;
        }
        if self.contains(Flags::MOD_X) {
            f.write_str("x")?;
        }
        Ok(())
    }
}
