// Work around dead code warnings: rust-lang issue #46379
pub mod common;

// Work around dead code warnings: rust-lang issue #46379
use common::*;

use hostregex::{Error, Flags, Limits, Regex, Registers, ResourceLimit};

fn test_basic_search_tc(tc: TestConfig) {
    assert_eq!(
        tc.compile("a(b)c").match1_vec("xxabcxx"),
        vec![Some("abc"), Some("b")]
    );
    assert_eq!(
        tc.compile("(foo)?bar").match1_vec("bar"),
        vec![Some("bar"), None]
    );
    tc.compile("z").test_fails("abc");
    tc.compile("abcd").match1f("xyzabcdef").test_eq("abcd");
}

#[test]
fn test_basic_search() {
    test_with_configs(test_basic_search_tc)
}

#[test]
fn registers_hold_offsets_and_sentinels() {
    let re = Regex::new("a(b)c").unwrap();
    let mut regs = Registers::new();
    assert!(re.search("xxabcxx", 0, &mut regs).unwrap());
    assert_eq!(regs.num_regs(), 2);
    assert_eq!((regs.begin(0), regs.end(0)), (2, 5));
    assert_eq!((regs.begin(1), regs.end(1)), (3, 4));

    let re = Regex::new("(foo)?bar").unwrap();
    assert!(re.search("bar", 0, &mut regs).unwrap());
    assert_eq!((regs.begin(0), regs.end(0)), (0, 3));
    assert_eq!((regs.begin(1), regs.end(1)), (-1, -1));

    let re = Regex::new("z").unwrap();
    assert!(!re.search("abc", 0, &mut regs).unwrap());
    assert!(!regs.is_valid());
}

#[test]
fn invalid_patterns_are_rejected() {
    assert!(matches!(
        Regex::new("[invalid("),
        Err(Error::InvalidPattern(..))
    ));
}

fn non_matching_captures_tc(tc: TestConfig) {
    assert_eq!(
        tc.compile("aa(b)?aa").match1_vec("aaaa"),
        vec![Some("aaaa"), None]
    );
    assert_eq!(
        tc.compile("(a)|(b)").match1_vec("b"),
        vec![Some("b"), None, Some("b")]
    );
}

#[test]
fn non_matching_captures() {
    test_with_configs(non_matching_captures_tc)
}

fn test_zero_length_matches_tc(tc: TestConfig) {
    tc.compile("x*").match_all("ab").test_eq(vec!["", "", ""]);
    tc.compile(".*?").match_all("a").test_eq(vec!["", ""]);
    tc.compile(".*?")
        .match_all("\u{0251}")
        .test_eq(vec!["", ""]);
}

#[test]
fn test_zero_length_matches() {
    test_with_configs(test_zero_length_matches_tc)
}

fn test_multiline_tc(tc: TestConfig) {
    // Anchors are line anchors unless NO_MOD_M.
    tc.compile(r"^def").match1f("abc\ndef").test_eq("def");
    tc.compilef(r"^def", "no_mod_m").test_fails("abc\ndef");
    tc.compilef(r"^abc", "no_mod_m").match1f("abc\ndef").test_eq("abc");

    tc.compile(r"[ab]$").match1f("a\nb").test_eq("a");
    tc.compilef(r"[ab]$", "no_mod_m").match1f("a\nb").test_eq("b");

    tc.compile(r"^\d")
        .match_all("aaa\n789\r\nccc\r\n345")
        .test_eq(vec!["7", "3"]);
    tc.compile(r"\d$")
        .match_all("aaa789\n789\r\nccc10\r\n345")
        .test_eq(vec!["9", "9", "0", "5"]);

    // Inline modifiers.
    tc.compilef(r"(?m)^def", "no_mod_m")
        .match1f("abc\ndef")
        .test_eq("def");
    tc.compile(r"(?-m)^def").test_fails("abc\ndef");
}

#[test]
fn test_multiline() {
    test_with_configs(test_multiline_tc)
}

fn test_crlf_tc(tc: TestConfig) {
    // A CRLF pair is a single line break.
    tc.compile(r"^b").match1f("a\r\nb").test_eq("b");
    tc.compile(r"a$").match1f("a\r\nb").test_eq("a");
    tc.compile(r"\r$").test_fails("a\r\nb");
    tc.compile(r"^\n").test_fails("a\r\nb");
}

#[test]
fn test_crlf() {
    test_with_configs(test_crlf_tc)
}

fn test_dot_tc(tc: TestConfig) {
    // Dot matches newlines by default.
    tc.compile(r".").match1f("\n").test_eq("\n");
    tc.compile("abc.def").match1f("abc\ndef").test_eq("abc\ndef");

    tc.compilef(r".", "no_mod_s").test_fails("\n");
    tc.compilef(r".", "no_mod_s").test_fails("\r");
    tc.compilef("abc.def", "no_mod_s").test_fails("abc\ndef");
    tc.compilef("abc.def", "no_mod_s")
        .match1f("abc.def")
        .test_eq("abc.def");

    // MOD_S wins over NO_MOD_S.
    tc.compilef(r".", "mod_s|no_mod_s")
        .match1f("\n")
        .test_eq("\n");
    tc.compilef(r".", "mod_s").match1f("\n").test_eq("\n");

    tc.compile(r"(?-s).").test_fails("\n");
    tc.compilef(r"(?s).", "no_mod_s")
        .match1f("\n")
        .test_eq("\n");

    // Dot consumes whole characters.
    tc.compile("a.c").match1f("xa\u{00E9}c").test_eq("a\u{00E9}c");
}

#[test]
fn test_dot() {
    test_with_configs(test_dot_tc)
}

fn test_extended_syntax_tc(tc: TestConfig) {
    tc.compilef("a b c # comment\n d", "mod_x")
        .match1f("xabcd")
        .test_eq("abcd");
    tc.compilef("a b", "mod_x").test_fails("a b");
    tc.compilef("a[ ]b", "mod_x").match1f("a b").test_eq("a b");
    tc.compilef(r"a\ b", "mod_x").match1f("a b").test_eq("a b");
    tc.compilef("a +", "mod_x").match1f("aaa").test_eq("aaa");
    tc.compile("(?x) a b ").match1f("ab").test_eq("ab");
    tc.compile("a b").match1f("a b").test_eq("a b");
}

#[test]
fn test_extended_syntax() {
    test_with_configs(test_extended_syntax_tc)
}

fn test_icase_tc(tc: TestConfig) {
    tc.compilef("ABC", "icase").match1f("xabcx").test_eq("abc");
    tc.compilef("abc", "icase").match1f("xABCx").test_eq("ABC");
    tc.compilef("[a-c]+", "icase").match1f("xAbCx").test_eq("AbC");
    tc.compilef(r"(a)\1", "icase").match1f("aA").test_eq("aA,a");
    tc.compile("abc").test_fails("ABC");
    tc.compile("(?i)abc").match1f("ABC").test_eq("ABC");
    tc.compile("a(?i:b)c").match1f("aBc").test_eq("aBc");
    tc.compile("a(?i:b)c").test_fails("aBC");
}

#[test]
fn test_icase() {
    test_with_configs(test_icase_tc)
}

fn test_quantifiers_tc(tc: TestConfig) {
    tc.compile("a{2,3}")
        .match_all("aaaaaaa")
        .test_eq(vec!["aaa", "aaa"]);
    tc.compile("a{2}").match_all("aaaaa").test_eq(vec!["aa", "aa"]);
    tc.compile("a{2,}").match1f("aaaaa").test_eq("aaaaa");
    tc.compile("a+?").match1f("aaa").test_eq("a");
    tc.compile("a*?b").match1f("aaab").test_eq("aaab");
    tc.compile("a??a").match1f("aa").test_eq("a");
    tc.compile("(ab)+").match1f("xababx").test_eq("abab,ab");
    tc.compile("(?:ab){2}").match1f("abababab").test_eq("abab");

    // A brace which does not form a quantifier is literal.
    tc.compile("a{3").match1f("a{3").test_eq("a{3");
    tc.compile("a{,3}").match1f("a{,3}").test_eq("a{,3}");
    tc.compile("{").match1f("{").test_eq("{");
}

#[test]
fn test_quantifiers() {
    test_with_configs(test_quantifiers_tc)
}

fn test_atomic_tc(tc: TestConfig) {
    tc.compile("(?>a+)b").match1f("aaab").test_eq("aaab");
    tc.compile("(?>a+)ab").test_fails("aaab");
    tc.compile("a*+a").test_fails("aaa");
    tc.compile("a++b").match1f("aaab").test_eq("aaab");
    tc.compile("(?>(a)b|ac)").match1f("ac").test_eq("ac,");
    tc.compile("(?>x|xb)c").test_fails("xbc");
    tc.compile("(?:x|xb)c").match1f("xbc").test_eq("xbc");
}

#[test]
fn test_atomic() {
    test_with_configs(test_atomic_tc)
}

fn test_lookaround_tc(tc: TestConfig) {
    tc.compile("a(?=b)").match1f("acab").test_eq("a");
    tc.compile("a(?!b)").match_all("abac").test_eq(vec!["a"]);
    tc.compile("(?<=a)b").match1f("ab").test_eq("b");
    tc.compile("(?<=a)b").test_fails("cb");
    tc.compile("(?<!a)b").match_all("abcb").test_eq(vec!["b"]);
    tc.compile("(?<=(a))b").match1f("ab").test_eq("b,a");
    tc.compile("(?<=ab)c").match1f("abc").test_eq("c");
    tc.compile("(?=(a))a").match1f("a").test_eq("a,a");
}

#[test]
fn test_lookaround() {
    test_with_configs(test_lookaround_tc)
}

fn test_backrefs_tc(tc: TestConfig) {
    tc.compile(r"(a)\1").match1f("xaa").test_eq("aa,a");
    tc.compile(r"(\w+) \1").match1f("hello hello").test_eq("hello hello,hello");
    tc.compile(r"(a)?\1b").test_fails("b");
    tc.compile(r"(a)?\1b").match1f("aab").test_eq("aab,a");
    tc.compile(r"(a)\g1").match1f("aa").test_eq("aa,a");
    tc.compile(r"(a)\g{1}").match1f("aa").test_eq("aa,a");
    tc.compile(r"(a)(b)\g{-1}").match1f("abb").test_eq("abb,a,b");
    tc.compile(r"(?<x>a)\k<x>").match1f("aa").test_eq("aa,a");
    tc.compile(r"(?P<x>a)(?P=x)").match1f("aa").test_eq("aa,a");
}

#[test]
fn test_backrefs() {
    test_with_configs(test_backrefs_tc)
}

fn test_named_groups_tc(tc: TestConfig) {
    let re = tc.compile(r"(?<year>\d{4})-(?<month>\d\d)");
    re.match1_named_group("on 2024-05", "year").test_eq("2024");
    re.match1_named_group("on 2024-05", "month").test_eq("05");
    assert_eq!(re.re.group_index("month"), Some(2));
    assert_eq!(re.re.group_index("day"), None);

    let re = tc.compile(r"(?'a'x)(y)");
    re.match1_named_group("xy", "a").test_eq("x");
    let names: Vec<&str> = re.re.group_names().iter().map(|n| &**n).collect();
    assert_eq!(names, vec!["a", ""]);
}

#[test]
fn test_named_groups() {
    test_with_configs(test_named_groups_tc)
}

fn test_escapes_tc(tc: TestConfig) {
    tc.compile(r"\d+").match1f("ab123c").test_eq("123");
    tc.compile(r"\D+").match1f("12ab3").test_eq("ab");
    tc.compile(r"\w+").match1f("--a_1--").test_eq("a_1");
    tc.compile(r"\s+").match1f("a \t\nb").test_eq(" \t\n");
    tc.compile(r"\x41\x{42}").match1f("AB").test_eq("AB");
    tc.compile(r"\t\n").match1f("\t\n").test_eq("\t\n");
    tc.compile(r"\012").match1f("\n").test_eq("\n");
    tc.compilef(r"\101", "extended").match1f("A").test_eq("A");
    tc.compile(r"\cA").match1f("\x01").test_eq("\x01");
    tc.compile(r"\Qa.b\E+").match1f("a.bbb").test_eq("a.bbb");
    tc.compile(r"\Qa.b").test_fails("axb");
    tc.compile(r"\.").test_fails("a");
}

#[test]
fn test_escapes() {
    test_with_configs(test_escapes_tc)
}

fn test_text_anchors_tc(tc: TestConfig) {
    tc.compile(r"\Aa").test_fails("ba");
    tc.compile(r"\Aa").match1f("ab").test_eq("a");
    tc.compile(r"a\z").test_fails("a\n");
    tc.compile(r"a\Z").match1f("a\n").test_eq("a");
    tc.compile(r"a\Z").match1f("a").test_eq("a");
    tc.compile(r"a\Z").test_fails("a\n\n");
    tc.compile(r"\`a").match1f("a").test_eq("a");
    tc.compile(r"a\'").test_fails("a\n");
}

#[test]
fn test_text_anchors() {
    test_with_configs(test_text_anchors_tc)
}

fn test_word_boundaries_tc(tc: TestConfig) {
    tc.compile(r"\bfoo\b").match1f("a foo b").test_eq("foo");
    tc.compile(r"\bfoo\b").test_fails("afoob");
    tc.compile(r"\Boo\B").match1f("afoob").test_eq("oo");
    tc.compile(r"\<foo\>").match1f("a foo").test_eq("foo");
    tc.compile(r"\<oo").test_fails("foo");
    tc.compile(r"fo\>").test_fails("foo");
}

#[test]
fn test_word_boundaries() {
    test_with_configs(test_word_boundaries_tc)
}

fn test_brackets_tc(tc: TestConfig) {
    tc.compile("[[:digit:]]+").match1f("ab123").test_eq("123");
    tc.compile("[[:alpha:][:digit:]]+").match1f("-a1b2-").test_eq("a1b2");
    tc.compile("[[:^digit:]]+").match1f("12ab3").test_eq("ab");
    tc.compile("[]a]+").match1f("x]a]").test_eq("]a]");
    tc.compile("[^a-c]").match1f("abcd").test_eq("d");
    tc.compile("[a-]+").match1f("x-a-").test_eq("-a-");
    tc.compile("[[=a=]]").match1f("xa").test_eq("a");
    tc.compile("[[.-.]]").match1f("a-").test_eq("-");
    tc.compile(r"[\d]+").match1f("a42").test_eq("42");
    tc.compile("[\u{00E9}-\u{00EB}]+")
        .match1f("a\u{00EA}\u{00E9}b")
        .test_eq("\u{00EA}\u{00E9}");
}

#[test]
fn test_brackets() {
    test_with_configs(test_brackets_tc)
}

fn test_posix_extended_tc(tc: TestConfig) {
    // Leftmost-longest.
    tc.compilef("a|ab|abc", "extended")
        .match1f("abcd")
        .test_eq("abc");
    tc.compile("a|ab|abc").match1f("abcd").test_eq("a");
    tc.compilef("(ab|a)(bc)?", "extended")
        .match1f("abcd")
        .test_eq("abc,a,bc");
    tc.compile("(ab|a)(bc)?").match1f("abcd").test_eq("ab,ab,");
    tc.compilef("a|ab", "no_perl_ex").match1f("ab").test_eq("ab");

    // Leftmost wins over longest.
    tc.compilef("b|abc", "egrep").match1f("xabc").test_eq("abc");
    tc.compilef("bcd|ab", "awk").match1f("abcd").test_eq("ab");

    // No Perl extensions.
    tc.compilef(r"\8", "extended").match1f("8").test_eq("8");
    tc.compilef("a{2}", "extended").match1f("aaa").test_eq("aa");
    tc.compilef("a**", "extended").match1f("aa").test_eq("aa");
    test_parse_fails_flags("(?:a)", "extended");
}

#[test]
fn test_posix_extended() {
    test_with_configs(test_posix_extended_tc)
}

fn test_posix_basic_tc(tc: TestConfig) {
    assert_eq!(
        tc.compilef(r"\(ab\)*c", "basic").match1_vec("xababcx"),
        vec![Some("ababc"), Some("ab")]
    );
    tc.compilef("*a", "basic").match1f("x*a").test_eq("*a");
    tc.compilef("^*a", "basic").match1f("*a").test_eq("*a");
    tc.compilef("a+", "basic").match1f("xa+").test_eq("a+");
    tc.compilef("a|b", "basic").match1f("a|b").test_eq("a|b");
    tc.compilef(r"a\{2\}", "basic").match1f("aaa").test_eq("aa");
    tc.compilef(r"a\{1,2\}", "sed").match1f("aaa").test_eq("aa");
    tc.compilef(r"\(a\)\1", "basic").match1f("aa").test_eq("aa,a");
    tc.compilef("a$b", "basic").match1f("a$b").test_eq("a$b");
    tc.compilef("a^b", "basic").match1f("a^b").test_eq("a^b");
    tc.compilef("(a)", "basic").match1f("(a)").test_eq("(a)");
    tc.compilef(r"\w\+", "basic|bk_plus_qm")
        .match1f("-ab-")
        .test_eq("ab");
    tc.compilef(r"x*\|ab", "basic|bk_vbar")
        .match1f("ab")
        .test_eq("ab");
    tc.compilef("[[:digit:]]", "basic|no_char_classes").test_fails("1");
    tc.compilef(r"a\{2\}", "basic|no_intervals")
        .match1f("a{2}")
        .test_eq("a{2}");
}

#[test]
fn test_posix_basic() {
    test_with_configs(test_posix_basic_tc)
}

fn test_newline_alt_tc(tc: TestConfig) {
    tc.compilef("abc\ndef", "grep").match1f("xxdef").test_eq("def");
    tc.compilef("abc\ndef", "egrep").match1f("xxabc").test_eq("abc");
    tc.compilef("abc\ndef", "newline_alt")
        .match1f("def")
        .test_eq("def");
    tc.compile("abc\ndef").test_fails("def");
}

#[test]
fn test_newline_alt() {
    test_with_configs(test_newline_alt_tc)
}

fn test_literal_tc(tc: TestConfig) {
    tc.compilef("a.c(", "literal").match1f("xa.c(").test_eq("a.c(");
    tc.compilef("a.c(", "literal").test_fails("abc(");
    tc.compilef("A*", "literal|icase").match1f("a*").test_eq("a*");
    tc.compilef(r"\d", "literal").match1f(r"\d").test_eq(r"\d");
}

#[test]
fn test_literal() {
    test_with_configs(test_literal_tc)
}

#[test]
fn nosubs_keeps_only_the_overall_match() {
    let re = Regex::with_flags("(a)(b)", Flags::NOSUBS).unwrap();
    assert_eq!(re.group_count(), 0);
    let mut regs = Registers::new();
    assert!(re.search("xab", 0, &mut regs).unwrap());
    assert_eq!(regs.num_regs(), 1);
    assert_eq!(regs.get(0), Some(1..3));
}

#[test]
fn registers_grow_and_keep_capacity() {
    let mut regs = Registers::new();
    let five = Regex::new("(a)(b)(c)(d)(e)").unwrap();
    let one = Regex::new("(a)").unwrap();

    assert!(one.search("a", 0, &mut regs).unwrap());
    assert_eq!(regs.num_regs(), 2);
    assert!(five.search("abcde", 0, &mut regs).unwrap());
    assert_eq!(regs.num_regs(), 6);
    assert_eq!(regs.get(5), Some(4..5));

    assert!(one.search("a", 0, &mut regs).unwrap());
    assert_eq!(regs.num_regs(), 2);
    assert!(regs.capacity() >= 6);
}

#[test]
fn searching_is_idempotent() {
    let re = Regex::new(r"(\d+)-(\d+)").unwrap();
    let mut first = Registers::new();
    let mut second = Registers::new();
    assert!(re.search("tel 555-1234", 0, &mut first).unwrap());
    assert!(re.search("tel 555-1234", 0, &mut second).unwrap());
    assert_eq!(first, second);
    assert!(re.search("tel 555-1234", 0, &mut second).unwrap());
    assert_eq!(first, second);
}

#[test]
fn search_honors_start_offset() {
    let re = Regex::new("a").unwrap();
    let mut regs = Registers::new();
    assert!(re.search("abab", 1, &mut regs).unwrap());
    assert_eq!(regs.get(0), Some(2..3));
    assert!(re.search("abab", 2, &mut regs).unwrap());
    assert_eq!(regs.get(0), Some(2..3));
    assert!(!re.search("abab", 3, &mut regs).unwrap());

    // Start offsets past the end, or inside a character, do not match.
    assert!(!re.search("abc", 10, &mut regs).unwrap());
    assert!(!regs.is_valid());
    assert!(!Regex::new("b").unwrap().search("\u{00E9}b", 1, &mut regs).unwrap());

    // \A is the start of the text, not the start of the search.
    let re = Regex::new(r"\Ab").unwrap();
    assert!(!re.search("ab", 1, &mut regs).unwrap());
}

#[test]
fn index_of_reports_the_offset() {
    let re = Regex::new("abcd").unwrap();
    assert_eq!(re.index_of("xyzabcdef").unwrap(), Some(3));
    assert_eq!(re.index_of("uqioer").unwrap(), None);
    assert!(re.is_match("abcd").unwrap());
}

#[test]
fn resource_exhaustion_leaves_registers_untouched() {
    let limits = Limits {
        min_steps: 1_000,
        max_steps: 10_000,
        max_backtrack_depth: 1 << 20,
    };
    let mut regs = Registers::new();
    assert!(Regex::new("x").unwrap().search("axb", 0, &mut regs).unwrap());
    let before = regs.clone();

    let re = Regex::new("(a*)*b").unwrap();
    let text = "a".repeat(40);
    let res = re.search_with_limits(&text, 0, &limits, &mut regs);
    assert!(
        matches!(res, Err(Error::ResourceExhausted(ResourceLimit::Steps(..)))),
        "{:?}",
        res
    );
    assert_eq!(regs, before);
}

#[test]
fn deep_backtracking_is_bounded() {
    let limits = Limits {
        max_backtrack_depth: 10,
        ..Limits::default()
    };
    let re = Regex::new("(?:ab)*c").unwrap();
    let text = "ab".repeat(100);
    let mut regs = Registers::new();
    let res = re.search_with_limits(&text, 0, &limits, &mut regs);
    assert_eq!(
        res,
        Err(Error::ResourceExhausted(ResourceLimit::BacktrackDepth(10)))
    );
    assert!(!regs.is_valid());

    // Default limits cope with the same search.
    assert!(!re.search(&text, 0, &mut regs).unwrap());
}

#[test]
fn subexpression_locations() {
    let re = Regex::with_flags("a(b(c))(d)", Flags::SAVE_SUBEXPRESSION_LOCATION).unwrap();
    assert_eq!(re.subexpression(0), Some(0..10));
    assert_eq!(re.subexpression(1), Some(1..7));
    assert_eq!(re.subexpression(2), Some(3..6));
    assert_eq!(re.subexpression(3), Some(7..10));
    assert_eq!(re.subexpression(4), None);

    let re = Regex::new("a(b)").unwrap();
    assert_eq!(re.subexpression(1), None);
}

#[test]
fn equality_and_hashing() {
    use std::collections::HashSet;
    let a = Regex::new("a+").unwrap();
    let b: Regex = "a+".parse().unwrap();
    let c = Regex::with_flags("a+", Flags::ICASE).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    let set: HashSet<Regex> = vec![a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn source_round_trips() {
    let cases = [
        ("a(b)c", Flags::NORMAL, "xabcx"),
        (r"\(a\)*b", Flags::BASIC, "aab"),
        ("a b # comment", Flags::MOD_X, "xab"),
        ("(a|ab)(c|bcd)", Flags::EXTENDED | Flags::ICASE, "ABCD"),
        ("a.c", Flags::LITERAL, "xa.c"),
    ];
    for (pattern, flags, subject) in cases {
        let re = Regex::with_flags(pattern, flags).unwrap();
        let again = Regex::with_flags(re.source(), re.flags()).unwrap();
        assert_eq!(re, again, "{}", pattern);

        let mut regs = Registers::new();
        let mut again_regs = Registers::new();
        assert!(re.search(subject, 0, &mut regs).unwrap(), "{}", pattern);
        assert!(again.search(subject, 0, &mut again_regs).unwrap());
        assert_eq!(regs, again_regs, "{}", pattern);
    }
}

#[test]
fn accessors() {
    let re = Regex::with_flags("ab+c", Flags::ICASE | Flags::MOD_X).unwrap();
    assert_eq!(re.source(), "ab+c");
    assert_eq!(re.flags(), Flags::ICASE | Flags::MOD_X);
    assert!(re.casefold());
    assert!(re.status().is_none());
    assert_eq!(re.to_string(), "/ab+c/ix");
    assert!(!Regex::new("a").unwrap().casefold());
}

#[test]
fn deferred_errors_surface_on_search() {
    let re = Regex::with_flags("[[:alnum]]", Flags::NO_EXCEPT).unwrap();
    assert!(re.flags().contains(Flags::FAILBIT));
    let err = re.status().cloned().expect("should hold an error");
    assert_eq!(err.text, "Character class name is not terminated");
    let mut regs = Registers::new();
    assert_eq!(
        re.search("abc", 0, &mut regs),
        Err(Error::InvalidPattern(err))
    );

    // Valid patterns are unaffected by NO_EXCEPT.
    let re = Regex::with_flags("a", Flags::NO_EXCEPT).unwrap();
    assert!(!re.flags().contains(Flags::FAILBIT));
    assert!(re.is_match("a").unwrap());
}

#[test]
fn flags_parse_from_names() {
    assert_eq!(flags("perl|icase"), Flags::ICASE);
    assert_eq!(flags("EXTENDED"), Flags::EXTENDED);
    assert_eq!(flags(""), Flags::NORMAL);
    assert!("bogus".parse::<Flags>().is_err());
}
