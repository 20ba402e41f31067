//! The host side of the binding: host values, host-native regexes, and the
//! translation of host regex options into engine flags.

use crate::api::Regex;
use crate::error::Error;
use crate::flags::Flags;
use std::borrow::Cow;

/// Host option bit: ignore case (`/i`).
pub const IGNORECASE: u32 = 1;

/// Host option bit: extended, whitespace-insensitive syntax (`/x`).
pub const EXTENDED: u32 = 2;

/// Host option bit: dot matches newlines (`/m`).
pub const MULTILINE: u32 = 4;

/// Host option bits and the engine flags they map to.
const FLAG_TRANSLATION: &[(u32, Flags)] = &[
    (IGNORECASE, Flags::ICASE),
    (EXTENDED, Flags::MOD_X),
    (MULTILINE, Flags::MOD_S),
];

/// Translate host regex options into engine flags. Unknown host bits are
/// ignored.
pub fn translate_host_options(options: u32) -> Flags {
    FLAG_TRANSLATION
        .iter()
        .filter(|(host_bit, _)| options & host_bit != 0)
        .fold(Flags::NORMAL, |acc, &(_, flags)| acc | flags)
}

/// The flag constants, under the names the host exposes them by.
pub const CONSTANTS: &[(&str, Flags)] = &[
    ("NORMAL", Flags::NORMAL),
    ("PERL", Flags::PERL),
    ("ECMASCRIPT", Flags::ECMASCRIPT),
    ("JAVASCRIPT", Flags::JAVASCRIPT),
    ("JSCRIPT", Flags::JSCRIPT),
    ("OPTIMIZE", Flags::OPTIMIZE),
    ("BASIC", Flags::BASIC),
    ("SED", Flags::SED),
    ("GREP", Flags::GREP),
    ("EXTENDED", Flags::EXTENDED),
    ("EGREP", Flags::EGREP),
    ("AWK", Flags::AWK),
    ("LITERAL", Flags::LITERAL),
    ("IGNORECASE", Flags::ICASE),
    ("IGNORE_WHITESPACE", Flags::MOD_X),
    ("DOTS_MATCH_NEWLINES", Flags::MOD_S),
    ("DOTS_NEVER_NEWLINES", Flags::NO_MOD_S),
    ("NO_SUBS", Flags::NOSUBS),
    ("NO_EXCEPTIONS", Flags::NO_EXCEPT),
    ("FAILBIT", Flags::FAILBIT),
    ("NO_BK_REFS", Flags::NO_BK_REFS),
    ("NO_PERL_EX", Flags::NO_PERL_EX),
    ("NO_MOD_M", Flags::NO_MOD_M),
    ("NO_CHAR_CLASSES", Flags::NO_CHAR_CLASSES),
    ("NO_INTERVALS", Flags::NO_INTERVALS),
    ("BK_PLUS_QM", Flags::BK_PLUS_QM),
    ("BK_VBAR", Flags::BK_VBAR),
    ("NO_ESCAPE_IN_LISTS", Flags::NO_ESCAPE_IN_LISTS),
    ("NEWLINE_ALT", Flags::NEWLINE_ALT),
    ("COLLATE", Flags::COLLATE),
    ("SAVE_SUBEXPRESSION_LOCATION", Flags::SAVE_SUBEXPRESSION_LOCATION),
    ("NO_EMPTY_EXPRESSIONS", Flags::NO_EMPTY_EXPRESSIONS),
];

/// Look up a host flag constant by name.
pub fn constant(name: &str) -> Option<Flags> {
    CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, flags)| flags)
}

/// A regex native to the host, as written `/source/options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRegexp {
    source: String,
    options: u32,
}

impl HostRegexp {
    pub fn new(source: impl Into<String>, options: u32) -> Self {
        HostRegexp {
            source: source.into(),
            options,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> u32 {
        self.options
    }

    /// Compile this regex with the engine, OR-ing \p flags into the
    /// translated host options.
    pub fn to_engine(&self, flags: Flags) -> Result<Regex, Error> {
        Regex::with_flags(&self.source, translate_host_options(self.options) | flags)
    }
}

/// A value handed over by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HostValue {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    Regexp(HostRegexp),
}

impl HostValue {
    /// \return the host's name for the type of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Nil => "nil",
            HostValue::Bool(true) => "true",
            HostValue::Bool(false) => "false",
            HostValue::Integer(_) => "Integer",
            HostValue::Float(_) => "Float",
            HostValue::Str(_) => "String",
            HostValue::Symbol(_) => "Symbol",
            HostValue::Regexp(_) => "Regexp",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, HostValue::Nil)
    }

    /// Implicitly convert to a string, the way the host does for string
    /// arguments. Only strings convert.
    pub fn to_str(&self) -> Result<&str, Error> {
        match self {
            HostValue::Str(s) => Ok(s),
            other => Err(Error::TypeConversion(other.type_name())),
        }
    }

    /// Convert to pattern text. Symbols are accepted by name.
    fn to_pattern(&self) -> Result<Cow<'_, str>, Error> {
        match self {
            HostValue::Str(s) | HostValue::Symbol(s) => Ok(Cow::Borrowed(s)),
            other => Err(Error::TypeConversion(other.type_name())),
        }
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::Str(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::Str(s)
    }
}

impl From<HostRegexp> for HostValue {
    fn from(re: HostRegexp) -> Self {
        HostValue::Regexp(re)
    }
}

impl Regex {
    /// Construct a regex from a host value: either pattern text, or a
    /// host-native regex whose options are translated and OR'd into
    /// \p flags.
    pub fn from_host(value: &HostValue, flags: Flags) -> Result<Regex, Error> {
        match value {
            HostValue::Regexp(re) => re.to_engine(flags),
            other => Regex::with_flags(&other.to_pattern()?, flags),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_is_bit_for_bit() {
        assert_eq!(translate_host_options(0), Flags::NORMAL);
        assert_eq!(translate_host_options(IGNORECASE), Flags::ICASE);
        assert_eq!(
            translate_host_options(IGNORECASE | EXTENDED | MULTILINE),
            Flags::ICASE | Flags::MOD_X | Flags::MOD_S
        );
        assert_eq!(translate_host_options(8), Flags::NORMAL);
    }

    #[test]
    fn host_regexps_merge_flags() {
        let host = HostRegexp::new("abc", IGNORECASE | EXTENDED | MULTILINE);
        let re = host.to_engine(Flags::NOSUBS).unwrap();
        assert_eq!(
            re.flags(),
            Flags::ICASE | Flags::MOD_X | Flags::MOD_S | Flags::NOSUBS
        );
        assert_eq!(re.source(), "abc");
    }

    #[test]
    fn only_strings_convert() {
        assert_eq!(HostValue::from("x").to_str().unwrap(), "x");
        assert_eq!(
            HostValue::Integer(3).to_str(),
            Err(Error::TypeConversion("Integer"))
        );
        assert!(matches!(
            Regex::from_host(&HostValue::Float(1.0), Flags::NORMAL),
            Err(Error::TypeConversion("Float"))
        ));
        let re = Regex::from_host(&HostValue::Symbol("ab".into()), Flags::NORMAL).unwrap();
        assert_eq!(re.source(), "ab");
    }

    #[test]
    fn constants_by_name() {
        assert_eq!(constant("IGNORECASE"), Some(Flags::ICASE));
        assert_eq!(constant("DOTS_NEVER_NEWLINES"), Some(Flags::NO_MOD_S));
        assert_eq!(constant("BOGUS"), None);
    }
}
