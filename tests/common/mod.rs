#![allow(clippy::uninlined_format_args)]

use hostregex::{backends, Flags, Registers};
use std::ops::Range;

/// Parse a `|`-separated flag list like "extended|icase".
#[track_caller]
pub fn flags(flags_str: &str) -> Flags {
    match flags_str.parse::<Flags>() {
        Ok(flags) => flags,
        Err(err) => panic!("Bad flags {:?}: {}", flags_str, err),
    }
}

/// Test that \p pattern fails to parse with default flags.
pub fn test_parse_fails(pattern: &str) {
    let res = hostregex::Regex::new(pattern);
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// Test that \p pattern fails to parse with flags.
pub fn test_parse_fails_flags(pattern: &str, flags_str: &str) {
    let res = hostregex::Regex::with_flags(pattern, flags(flags_str));
    assert!(res.is_err(), "Pattern should not have parsed: {}", pattern);
}

/// One match: the overall range followed by each group's range.
pub type Match = Vec<Option<Range<usize>>>;

/// Format a Match by inserting commas between all capture groups.
fn format_match(m: &Match, input: &str) -> String {
    let mut iter = m.iter();
    let mut result = match iter.next() {
        Some(Some(r)) => input[r.clone()].to_string(),
        _ => String::new(),
    };
    for cg in iter {
        result.push(',');
        if let Some(cg) = cg {
            result.push_str(&input[cg.clone()])
        }
    }
    result
}

pub trait StringTestHelpers {
    /// "Fluent" style helper for testing that a String is equal to a str.
    fn test_eq(&self, s: &str);
}

impl StringTestHelpers for String {
    fn test_eq(&self, rhs: &str) {
        assert_eq!(self.as_str(), rhs)
    }
}

pub trait VecTestHelpers {
    /// "Fluent" style helper for testing that a Vec<&str> is equal to a
    /// Vec<&str>.
    fn test_eq(&self, rhs: Vec<&str>);
}

impl VecTestHelpers for Vec<&str> {
    fn test_eq(&self, rhs: Vec<&str>) {
        assert_eq!(*self, rhs)
    }
}

/// A compiled regex which remembers a TestConfig.
#[derive(Debug, Clone)]
pub struct TestCompiledRegex {
    pub re: hostregex::Regex,
    #[allow(dead_code)]
    tc: TestConfig,
}

impl TestCompiledRegex {
    /// Search for self in \p input from \p start, returning every
    /// non-overlapping match. An empty match advances by one character.
    #[track_caller]
    pub fn matches(&self, input: &str, start: usize) -> Vec<Match> {
        let mut result = Vec::new();
        let mut regs = Registers::new();
        let mut pos = start;
        while pos <= input.len() {
            match self.re.search(input, pos, &mut regs) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => panic!("Search failed: {}", err),
            }
            let m: Match = regs.iter().collect();
            let overall = m[0].clone().expect("Overall match should be set");
            pos = if overall.is_empty() {
                match input[overall.end..].chars().next() {
                    Some(c) => overall.end + c.len_utf8(),
                    None => input.len() + 1,
                }
            } else {
                overall.end
            };
            result.push(m);
        }
        result
    }

    /// Search for self in \p input, returning the first Match, or None if
    /// none.
    pub fn find(&self, input: &str) -> Option<Match> {
        let mut regs = Registers::new();
        match self.re.search(input, 0, &mut regs) {
            Ok(true) => Some(regs.iter().collect()),
            Ok(false) => None,
            Err(err) => panic!("Search failed: {}", err),
        }
    }

    /// Match against a string, returning the first formatted match.
    #[track_caller]
    pub fn match1f(&self, input: &str) -> String {
        match self.find(input) {
            Some(m) => format_match(&m, input),
            None => panic!("Failed to match {}", input),
        }
    }

    /// Match against a string, returning the string of the named capture
    /// group given.
    #[track_caller]
    pub fn match1_named_group(&self, input: &str, group: &str) -> String {
        let idx = match self.re.group_index(group) {
            Some(idx) => idx,
            None => panic!("Named capture group does not exist {}", group),
        };
        match self.find(input) {
            Some(m) => match &m[idx] {
                Some(r) => input[r.clone()].to_string(),
                None => panic!("Named capture group did not participate {}", group),
            },
            None => panic!("Failed to match {}", input),
        }
    }

    /// Match against a string, returning the match as a Vec containing None
    /// for unmatched groups, or the matched strings.
    #[track_caller]
    pub fn match1_vec<'b>(&self, input: &'b str) -> Vec<Option<&'b str>> {
        let m = self.find(input).expect("Failed to match");
        m.into_iter().map(|r| r.map(|r| &input[r])).collect()
    }

    /// Test that matching against \p input fails.
    #[track_caller]
    pub fn test_fails(&self, input: &str) {
        assert!(self.find(input).is_none(), "Should not have matched")
    }

    /// Test that matching against \p input succeeds.
    #[track_caller]
    pub fn test_succeeds(&self, input: &str) {
        assert!(self.find(input).is_some(), "Should have matched")
    }

    /// Return a list of all non-overlapping matches.
    pub fn match_all<'b>(&self, input: &'b str) -> Vec<&'b str> {
        self.matches(input, 0)
            .into_iter()
            .filter_map(|m| m[0].clone())
            .map(move |r| &input[r])
            .collect()
    }

    /// Collect all matches into a String, separated by commas.
    pub fn run_global_match(&self, input: &str) -> String {
        self.matches(input, 0)
            .iter()
            .map(|m| format_match(m, input))
            .collect::<Vec<String>>()
            .join(",")
    }
}

/// Description of how to test a regex.
#[derive(Debug, Copy, Clone)]
pub struct TestConfig {
    // Whether to optimize.
    optimize: bool,
}

impl TestConfig {
    /// Compile a pattern to a regex, with default flags.
    #[track_caller]
    pub fn compile(&self, pattern: &str) -> TestCompiledRegex {
        self.compilef(pattern, "")
    }

    /// Compile a pattern to a regex, with given flags.
    #[track_caller]
    pub fn compilef(&self, pattern: &str, flags_str: &str) -> TestCompiledRegex {
        let re = backends::compile(pattern, flags(flags_str), self.optimize);
        assert!(
            re.is_ok(),
            "Failed to parse! flags: {} pattern: {}, error: {}",
            flags_str,
            pattern,
            re.unwrap_err()
        );
        TestCompiledRegex {
            re: re.unwrap(),
            tc: *self,
        }
    }

    /// Test that \p pattern and \p flags successfully parses, and matches
    /// \p input.
    #[track_caller]
    pub fn test_match_succeeds(&self, pattern: &str, flags_str: &str, input: &str) {
        let cr = self.compilef(pattern, flags_str);
        cr.test_succeeds(input)
    }

    /// Test that \p pattern and \p flags successfully parses, and does not
    /// match \p input.
    #[track_caller]
    pub fn test_match_fails(&self, pattern: &str, flags_str: &str, input: &str) {
        let cr = self.compilef(pattern, flags_str);
        cr.test_fails(input)
    }
}

/// Invoke \p F with each test config, in turn.
pub fn test_with_configs<F>(func: F)
where
    F: Fn(TestConfig),
{
    func(TestConfig { optimize: false });
    func(TestConfig { optimize: true });
}
