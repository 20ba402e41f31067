//! Parser from regex patterns to IR

use crate::charclasses;
use crate::codepointset::{CodePointSet, Interval};
use crate::flags::{Flags, Syntax};
use crate::folds;
use crate::ir;
use crate::types::{
    BracketContents, CaptureGroupID, CharacterClassType, MAX_CAPTURE_GROUPS, MAX_LOOPS,
    MAX_NESTING_DEPTH,
};
use core::mem;
use core::ops::Range;

/// Represents an error encountered during regex compilation.
/// The text contains a human-readable error message; the position is the
/// byte offset in the pattern at which the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{text} at offset {position}")]
pub struct SyntaxError {
    pub text: String,
    pub position: usize,
}

enum ClassAtom {
    CodePoint(char),
    CharacterClass {
        class_type: CharacterClassType,
        positive: bool,
    },
}

/// What a `(?...)` construct produced.
enum Extension {
    /// A node which may be quantified.
    Node(ir::Node),
    /// A zero-width assertion, which may not be quantified.
    Assertion(ir::Node),
    /// Nothing: a comment or a bare modifier group.
    Nothing,
}

/// Modifiers which `(?imsx-imsx)` can change within a group.
#[derive(Debug, Copy, Clone)]
struct Mods {
    icase: bool,
    multiline: bool,
    dot_all: bool,
    extended: bool,
}

fn make_cat(mut nodes: ir::NodeList) -> ir::Node {
    if nodes.len() > 1 {
        return ir::Node::Cat(nodes);
    }
    nodes.pop().unwrap_or(ir::Node::Empty)
}

fn make_alt(nodes: ir::NodeList) -> ir::Node {
    let mut mright = None;
    for node in nodes.into_iter().rev() {
        match mright {
            None => mright = Some(node),
            Some(right) => mright = Some(ir::Node::Alt(Box::new(node), Box::new(right))),
        }
    }
    mright.unwrap_or(ir::Node::Empty)
}

/// \return a CodePointSet for a character class (positive or negative).
fn codepoints_from_class(ct: CharacterClassType, positive: bool) -> CodePointSet {
    let ivs: &[Interval] = match ct {
        CharacterClassType::Alnum => &charclasses::ALNUM,
        CharacterClassType::Alpha => &charclasses::ALPHA,
        CharacterClassType::Blank => &charclasses::BLANK,
        CharacterClassType::Cntrl => &charclasses::CNTRL,
        CharacterClassType::Digits => &charclasses::DIGITS,
        CharacterClassType::Graph => &charclasses::GRAPH,
        CharacterClassType::Lower => &charclasses::LOWER,
        CharacterClassType::Print => &charclasses::PRINT,
        CharacterClassType::Punct => &charclasses::PUNCT,
        CharacterClassType::Spaces => &charclasses::WHITESPACE,
        CharacterClassType::Upper => &charclasses::UPPER,
        CharacterClassType::Words => &charclasses::WORD_CHARS,
        CharacterClassType::XDigits => &charclasses::XDIGITS,
    };
    let mut cps = CodePointSet::from_intervals(ivs);
    if ct == CharacterClassType::Spaces {
        for &iv in charclasses::LINE_TERMINATOR.iter() {
            cps.add(iv)
        }
    }
    if !positive {
        cps = cps.inverted()
    }
    cps
}

/// \return a Bracket for a given character escape (positive or negative).
fn make_bracket_class(ct: CharacterClassType, positive: bool) -> ir::Node {
    ir::Node::Bracket(BracketContents {
        invert: false,
        icase: false,
        cps: codepoints_from_class(ct, positive),
    })
}

/// \return the class named by an escape letter like `d` or `W`.
fn escape_class(c: char) -> Option<(CharacterClassType, bool)> {
    let class_type = match c.to_ascii_lowercase() {
        'd' => CharacterClassType::Digits,
        's' => CharacterClassType::Spaces,
        'w' => CharacterClassType::Words,
        'h' => CharacterClassType::Blank,
        _ => return None,
    };
    Some((class_type, c.is_ascii_lowercase()))
}

fn add_class_atom(bc: &mut BracketContents, atom: ClassAtom) {
    match atom {
        ClassAtom::CodePoint(c) => bc.cps.add_one(c as u32),
        ClassAtom::CharacterClass {
            class_type,
            positive,
        } => {
            bc.cps.add_set(&codepoints_from_class(class_type, positive));
        }
    }
}

fn is_group_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Represents the state used to parse a regex.
struct Parser<'a> {
    /// The whole pattern.
    pattern: &'a str,

    /// Byte offset of the next unparsed char.
    pos: usize,

    /// Flags used.
    flags: Flags,

    /// Modifiers in effect at the current position.
    mods: Mods,

    /// Number of loops.
    loop_count: u32,

    /// Number of capturing groups.
    group_count: CaptureGroupID,

    /// Current nesting of groups.
    depth: u32,

    /// Maximum backreference encountered, and where.
    /// Note that values larger than will fit are early errors.
    max_backref: u32,
    max_backref_pos: usize,

    /// Whether a lookbehind was encountered.
    has_lookbehind: bool,

    /// One name per capture group; empty for unnamed groups.
    group_names: Vec<Box<str>>,
    has_named_groups: bool,

    /// Pattern ranges of each capture group.
    subexpressions: Vec<Range<usize>>,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str, flags: Flags) -> Self {
        Parser {
            pattern,
            pos: 0,
            flags,
            mods: Mods {
                icase: flags.icase(),
                multiline: !flags.no_mod_m(),
                dot_all: flags.mod_s() || !flags.no_mod_s(),
                extended: flags.mod_x(),
            },
            loop_count: 0,
            group_count: 0,
            depth: 0,
            max_backref: 0,
            max_backref_pos: 0,
            has_lookbehind: false,
            group_names: Vec::new(),
            has_named_groups: false,
            subexpressions: Vec::new(),
        }
    }

    fn error<T, S: ToString>(&self, text: S) -> Result<T, SyntaxError> {
        self.error_at(text, self.pos)
    }

    fn error_at<T, S: ToString>(&self, text: S, position: usize) -> Result<T, SyntaxError> {
        Err(SyntaxError {
            text: text.to_string(),
            position,
        })
    }

    /// \return the unparsed remainder of the pattern.
    fn rest(&self) -> &'a str {
        &self.pattern[self.pos..]
    }

    /// Consume a character, returning it.
    fn consume(&mut self, c: char) -> char {
        debug_assert!(self.peek() == Some(c), "char was not next");
        self.pos += c.len_utf8();
        c
    }

    /// If our contents begin with the char c, consume it from our contents
    /// and return true. Otherwise return false.
    fn try_consume(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// If our contents begin with the string \p s, consume it from our contents
    /// and return true. Otherwise return false.
    fn try_consume_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Peek at the next character.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// \return the next character.
    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn make_char(&self, c: char) -> ir::Node {
        let icase = self.mods.icase;
        ir::Node::Char {
            c: if icase { folds::fold(c) } else { c },
            icase,
        }
    }

    fn make_dot(&self) -> ir::Node {
        if self.mods.dot_all {
            ir::Node::MatchAny
        } else {
            ir::Node::MatchAnyExceptLineTerminator
        }
    }

    fn make_anchor(&self, anchor_type: ir::AnchorType) -> ir::Node {
        ir::Node::Anchor {
            anchor_type,
            multiline: self.mods.multiline,
        }
    }

    fn make_loop(
        &mut self,
        loopee: ir::Node,
        quant: ir::Quantifier,
        start_group: CaptureGroupID,
    ) -> Result<ir::Node, SyntaxError> {
        if self.loop_count as usize >= MAX_LOOPS {
            return self.error("Loop count limit exceeded");
        }
        self.loop_count += 1;
        Ok(ir::Node::Loop {
            loopee: Box::new(loopee),
            quant,
            enclosed_groups: start_group..self.group_count,
        })
    }

    /// Fail if \p extra more levels would nest too deeply.
    fn check_nesting(&self, extra: u32) -> Result<(), SyntaxError> {
        if self.depth + extra > MAX_NESTING_DEPTH {
            return self.error("Nesting depth limit exceeded");
        }
        Ok(())
    }

    fn note_backref(&mut self, group: u32, position: usize) {
        if group > self.max_backref {
            self.max_backref = group;
            self.max_backref_pos = position;
        }
    }

    fn try_parse(&mut self) -> Result<ir::Regex, SyntaxError> {
        let body = match self.flags.syntax() {
            None => return self.error("Invalid combination of syntax flags"),
            Some(Syntax::Perl) => {
                // Parse a disjunction. If we consume everything, it's success.
                // The only thing which stops it early is an excess closing paren.
                let body = self.consume_disjunction()?;
                if self.peek().is_some() {
                    return self.error("Unbalanced parenthesis");
                }
                body
            }
            Some(Syntax::Basic) => {
                let body = self.consume_basic_disjunction()?;
                if self.peek().is_some() {
                    return self.error("Unbalanced parenthesis");
                }
                body
            }
            Some(Syntax::Literal) => self.consume_literal(),
        };
        self.finalize(body)
    }

    fn check_empty_alternatives(&self, terms: &[ir::Node]) -> Result<(), SyntaxError> {
        if self.flags.contains(Flags::NO_EMPTY_EXPRESSIONS) && terms.iter().any(ir::Node::is_empty)
        {
            return self.error("Empty expression");
        }
        Ok(())
    }

    fn newline_alt(&self) -> bool {
        self.flags.contains(Flags::NEWLINE_ALT)
    }

    /// Skip whitespace and `#` comments when the `x` modifier is on.
    fn skip_extended_whitespace(&mut self) {
        if !self.mods.extended {
            return;
        }
        loop {
            match self.peek() {
                Some('#') => {
                    while let Some(c) = self.next() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some(c) if c.is_whitespace() => {
                    self.consume(c);
                }
                _ => return,
            }
        }
    }

    /// Alternatives separated by `|` (and newlines under NEWLINE_ALT).
    fn consume_disjunction(&mut self) -> Result<ir::Node, SyntaxError> {
        self.check_nesting(1)?;
        self.depth += 1;
        let res = self.consume_alternatives();
        self.depth -= 1;
        res
    }

    fn consume_alternatives(&mut self) -> Result<ir::Node, SyntaxError> {
        let mut terms = vec![self.consume_term()?];
        while self.try_consume('|') || (self.newline_alt() && self.try_consume('\n')) {
            terms.push(self.consume_term()?)
        }
        self.check_empty_alternatives(&terms)?;
        Ok(make_alt(terms))
    }

    /// A catenation of quantified atoms in the Perl grammar.
    fn consume_term(&mut self) -> Result<ir::Node, SyntaxError> {
        let mut result: Vec<ir::Node> = Vec::new();
        loop {
            self.skip_extended_whitespace();
            let start_group = self.group_count;
            let mut start_offset = result.len();
            let mut quantifier_allowed = true;

            let c = match self.peek() {
                None => break,
                Some(c) => c,
            };
            match c {
                // A catenation is terminated by closing parens or alternation.
                ')' | '|' => break,
                '\n' if self.newline_alt() => break,

                '^' => {
                    self.consume('^');
                    result.push(self.make_anchor(ir::AnchorType::StartOfLine));
                    quantifier_allowed = false;
                }

                '$' => {
                    self.consume('$');
                    result.push(self.make_anchor(ir::AnchorType::EndOfLine));
                    quantifier_allowed = false;
                }

                '\\' => {
                    self.consume('\\');
                    if self.try_consume('Q') {
                        // Quoted text; a quantifier applies to its last char.
                        let mut chars = self.consume_quoted();
                        match chars.pop() {
                            Some(last) => {
                                for c in chars {
                                    let node = self.make_char(c);
                                    result.push(node);
                                }
                                start_offset = result.len();
                                result.push(self.make_char(last));
                            }
                            None => quantifier_allowed = false,
                        }
                    } else if self.try_consume('E') {
                        // Stray \E is ignored.
                        quantifier_allowed = false;
                    } else {
                        result.push(self.consume_atom_escape()?);
                    }
                }

                '.' => {
                    self.consume('.');
                    result.push(self.make_dot());
                }

                '(' => {
                    let group_start = self.pos;
                    self.consume('(');
                    if !self.flags.no_perl_ex() && self.try_consume('?') {
                        match self.consume_extension(group_start)? {
                            Extension::Node(node) => result.push(node),
                            Extension::Assertion(node) => {
                                result.push(node);
                                quantifier_allowed = false;
                            }
                            Extension::Nothing => quantifier_allowed = false,
                        }
                    } else {
                        let group = self.begin_capture(group_start, None)?;
                        let contents = self.consume_group_body()?;
                        result.push(self.end_capture(group, contents));
                    }
                }

                '[' => {
                    result.push(self.consume_bracket()?);
                }

                '*' | '+' | '?' => {
                    return self.error("Nothing to repeat");
                }

                '{' => {
                    // A brace which forms a quantifier has nothing to repeat.
                    // Otherwise Perl takes it literally.
                    let saved = self.pos;
                    if self.flags.no_perl_ex() || self.try_consume_quantifier_prefix()?.is_some() {
                        return self.error_at("Nothing to repeat", saved);
                    }
                    self.pos = saved;
                    self.consume('{');
                    result.push(self.make_char('{'));
                }

                c => {
                    self.consume(c);
                    result.push(self.make_char(c));
                }
            }

            // We just parsed an atom; try parsing quantifiers. POSIX grammars
            // may stack them, as in `a**`.
            let mut stacked = 0;
            loop {
                self.skip_extended_whitespace();
                let quant_pos = self.pos;
                let (quant, possessive) = match self.try_consume_quantifier()? {
                    Some(q) => q,
                    None => break,
                };
                if !quantifier_allowed || result.len() == start_offset {
                    return self.error_at("Quantifier not allowed here", quant_pos);
                }
                stacked += 1;
                self.check_nesting(stacked)?;
                let quantifee = result.split_off(start_offset);
                let node = self.make_loop(make_cat(quantifee), quant, start_group)?;
                result.push(if possessive {
                    ir::Node::Atomic(Box::new(node))
                } else {
                    node
                });
                if !self.flags.no_perl_ex() {
                    break;
                }
            }
        }
        Ok(make_cat(result))
    }

    /// Consume the text of `\Q...\E`, after the `\Q`.
    fn consume_quoted(&mut self) -> Vec<char> {
        let rest = self.rest();
        let (quoted, consumed) = match rest.find("\\E") {
            Some(idx) => (&rest[..idx], idx + 2),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        quoted.chars().collect()
    }

    /// Register a capture group opening at \p group_start.
    /// \return the group's ID, or None if groups do not capture.
    fn begin_capture(
        &mut self,
        group_start: usize,
        name: Option<Box<str>>,
    ) -> Result<Option<CaptureGroupID>, SyntaxError> {
        if self.flags.contains(Flags::NOSUBS) {
            return Ok(None);
        }
        if self.group_count as usize >= MAX_CAPTURE_GROUPS {
            return self.error("Capture group count limit exceeded");
        }
        let group = self.group_count;
        self.group_count += 1;
        if name.is_some() {
            self.has_named_groups = true;
        }
        self.group_names.push(name.unwrap_or_default());
        self.subexpressions.push(group_start..group_start);
        Ok(Some(group))
    }

    /// Wrap \p contents in the group begun by begin_capture, which has just
    /// been closed.
    fn end_capture(&mut self, group: Option<CaptureGroupID>, contents: ir::Node) -> ir::Node {
        let group = match group {
            Some(group) => group,
            None => return contents,
        };
        self.subexpressions[group as usize].end = self.pos;
        let name = &self.group_names[group as usize];
        if name.is_empty() {
            ir::Node::CaptureGroup(Box::new(contents), group)
        } else {
            ir::Node::NamedCaptureGroup(Box::new(contents), group, name.clone())
        }
    }

    /// Parse the inside of a group through its closing paren. Inline
    /// modifiers do not leak out of the group.
    fn consume_group_body(&mut self) -> Result<ir::Node, SyntaxError> {
        let saved = self.mods;
        let contents = self.consume_disjunction()?;
        if !self.try_consume(')') {
            return self.error("Unbalanced parenthesis");
        }
        self.mods = saved;
        Ok(contents)
    }

    /// Parse a `(?...)` construct, after the `(?`.
    fn consume_extension(&mut self, group_start: usize) -> Result<Extension, SyntaxError> {
        let kind_pos = self.pos;
        let c = match self.next() {
            Some(c) => c,
            None => return self.error("Invalid group modifier"),
        };
        match c {
            ':' => Ok(Extension::Node(self.consume_group_body()?)),
            '=' | '!' => Ok(Extension::Assertion(self.consume_lookaround(
                group_start,
                c == '!',
                false,
            )?)),
            '<' if self.try_consume('=') => {
                Ok(Extension::Assertion(self.consume_lookaround(group_start, false, true)?))
            }
            '<' if self.try_consume('!') => {
                Ok(Extension::Assertion(self.consume_lookaround(group_start, true, true)?))
            }
            '<' => self.consume_named_group(group_start, '>'),
            '\'' => self.consume_named_group(group_start, '\''),
            'P' if self.try_consume('<') => self.consume_named_group(group_start, '>'),
            'P' if self.try_consume('=') => {
                let name = self.consume_group_name(')')?;
                Ok(Extension::Node(self.make_named_backref(&name, kind_pos)?))
            }
            '>' => Ok(Extension::Node(ir::Node::Atomic(Box::new(
                self.consume_group_body()?,
            )))),
            '#' => match self.rest().find(')') {
                Some(idx) => {
                    self.pos += idx + 1;
                    Ok(Extension::Nothing)
                }
                None => self.error_at("Unterminated comment", group_start),
            },
            'i' | 'm' | 's' | 'x' | '-' => {
                self.pos = kind_pos;
                self.consume_inline_modifiers()
            }
            _ => self.error_at("Invalid group modifier", kind_pos),
        }
    }

    fn consume_named_group(
        &mut self,
        group_start: usize,
        terminator: char,
    ) -> Result<Extension, SyntaxError> {
        let name = self.consume_group_name(terminator)?;
        let group = self.begin_capture(group_start, Some(name))?;
        let contents = self.consume_group_body()?;
        Ok(Extension::Node(self.end_capture(group, contents)))
    }

    /// Parse a group name through its \p terminator.
    fn consume_group_name(&mut self, terminator: char) -> Result<Box<str>, SyntaxError> {
        let start = self.pos;
        let rest = self.rest();
        let len = rest
            .find(|c: char| !is_group_name_char(c))
            .unwrap_or(rest.len());
        let name = &rest[..len];
        self.pos += len;
        let valid_start = name
            .chars()
            .next()
            .map_or(false, |c| !c.is_ascii_digit());
        if !valid_start || !self.try_consume(terminator) {
            return self.error_at("Invalid group name", start);
        }
        Ok(name.into())
    }

    /// \return a backreference to the group named \p name, which must
    /// already have been defined.
    fn make_named_backref(&self, name: &str, position: usize) -> Result<ir::Node, SyntaxError> {
        match self.group_names.iter().position(|n| &**n == name) {
            Some(idx) => Ok(ir::Node::BackRef {
                group: idx as u32 + 1,
                icase: self.mods.icase,
            }),
            None => self.error_at("Reference to undefined group name", position),
        }
    }

    /// Parse `imsx-imsx` followed by `)` or `:`.
    fn consume_inline_modifiers(&mut self) -> Result<Extension, SyntaxError> {
        let mut mods = self.mods;
        let mut on = true;
        loop {
            let pos = self.pos;
            match self.next() {
                Some('i') => mods.icase = on,
                Some('m') => mods.multiline = on,
                Some('s') => mods.dot_all = on,
                Some('x') => mods.extended = on,
                Some('-') if on => on = false,
                Some(')') => {
                    // Applies to the rest of the enclosing group.
                    self.mods = mods;
                    return Ok(Extension::Nothing);
                }
                Some(':') => {
                    let saved = self.mods;
                    self.mods = mods;
                    let contents = self.consume_group_body()?;
                    self.mods = saved;
                    return Ok(Extension::Node(contents));
                }
                _ => return self.error_at("Invalid group modifier", pos),
            }
        }
    }

    fn consume_lookaround(
        &mut self,
        group_start: usize,
        negate: bool,
        backwards: bool,
    ) -> Result<ir::Node, SyntaxError> {
        let start_group = self.group_count;
        let contents = self.consume_group_body()?;
        let end_group = self.group_count;
        if backwards {
            // Lookbehinds must have a fixed width.
            if contents.fixed_width().is_none() {
                return self.error_at("Invalid lookbehind assertion", group_start);
            }
            self.has_lookbehind = true;
        }
        Ok(ir::Node::LookaroundAssertion {
            negate,
            backwards,
            start_group,
            end_group,
            contents: Box::new(contents),
        })
    }

    fn try_consume_quantifier(&mut self) -> Result<Option<(ir::Quantifier, bool)>, SyntaxError> {
        let mut quant = match self.try_consume_quantifier_prefix()? {
            Some(quant) => quant,
            None => return Ok(None),
        };
        let mut possessive = false;
        if !self.flags.no_perl_ex() {
            if self.try_consume('?') {
                quant.greedy = false;
            } else if self.try_consume('+') {
                possessive = true;
            }
        }
        Ok(Some((quant, possessive)))
    }

    fn try_consume_quantifier_prefix(&mut self) -> Result<Option<ir::Quantifier>, SyntaxError> {
        let (min, max) = match self.peek() {
            Some('+') => (1, None),
            Some('*') => (0, None),
            Some('?') => (0, Some(1)),
            Some('{') => {
                let open = self.pos;
                self.consume('{');
                return match self.try_consume_interval("}") {
                    Some(quant) => self.validate_quantifier(quant, open).map(Some),
                    None if self.flags.no_perl_ex() => self.error_at("Invalid quantifier", open),
                    None => {
                        // Not a quantifier, like `/{3/`.
                        self.pos = open;
                        Ok(None)
                    }
                };
            }
            _ => return Ok(None),
        };
        self.next();
        Ok(Some(ir::Quantifier {
            min,
            max,
            greedy: true,
        }))
    }

    /// Parse `m}`, `m,}` or `m,n}` where the closing brace is \p close.
    fn try_consume_interval(&mut self, close: &str) -> Option<ir::Quantifier> {
        let min = self.try_consume_decimal_integer_literal()?;
        let max = if self.try_consume(',') {
            self.try_consume_decimal_integer_literal()
        } else {
            Some(min)
        };
        if !self.try_consume_str(close) {
            return None;
        }
        Some(ir::Quantifier {
            min,
            max,
            greedy: true,
        })
    }

    fn validate_quantifier(
        &self,
        quant: ir::Quantifier,
        position: usize,
    ) -> Result<ir::Quantifier, SyntaxError> {
        match quant.max {
            Some(max) if quant.min > max => self.error_at("Invalid quantifier", position),
            _ => Ok(quant),
        }
    }

    /// If the value would overflow, usize::MAX is returned.
    /// All decimal digits are consumed regardless.
    fn try_consume_decimal_integer_literal(&mut self) -> Option<usize> {
        let mut result: usize = 0;
        let mut char_count = 0;
        while let Some(c) = self.peek() {
            if let Some(digit) = c.to_digit(10) {
                self.consume(c);
                char_count += 1;
                result = result.saturating_mul(10);
                result = result.saturating_add(digit as usize);
            } else {
                break;
            }
        }
        if char_count > 0 {
            Some(result)
        } else {
            None
        }
    }

    /// Parse an escape outside of brackets, after the backslash.
    fn consume_atom_escape(&mut self) -> Result<ir::Node, SyntaxError> {
        let escape_pos = self.pos - 1;
        let c = match self.peek() {
            Some(c) => c,
            None => return self.error("Incomplete escape"),
        };
        if let Some((class_type, positive)) = escape_class(c) {
            self.consume(c);
            return Ok(make_bracket_class(class_type, positive));
        }
        match c {
            'b' | 'B' => {
                self.consume(c);
                Ok(ir::Node::WordBoundary { invert: c == 'B' })
            }
            '<' | '>' => {
                self.consume(c);
                Ok(ir::Node::WordEdge { start: c == '<' })
            }
            'A' | '`' => {
                self.consume(c);
                Ok(self.make_anchor(ir::AnchorType::StartOfText))
            }
            'z' | '\'' => {
                self.consume(c);
                Ok(self.make_anchor(ir::AnchorType::EndOfText))
            }
            'Z' => {
                self.consume(c);
                Ok(self.make_anchor(ir::AnchorType::EndOfTextOrFinalNewline))
            }

            '1'..='9' if self.flags.no_bk_refs() => {
                // Without backreferences this is an octal escape, or just
                // the digit.
                self.consume(c);
                let cc = match c.to_digit(8) {
                    Some(d) => self.consume_octal(d, 2),
                    None => c,
                };
                Ok(self.make_char(cc))
            }

            '1'..='9' => {
                // Note we limit backreferences to u32 but the value may exceed that.
                let val = self.try_consume_decimal_integer_literal().unwrap_or(0);
                let group = val.min(MAX_CAPTURE_GROUPS + 1) as u32;
                self.note_backref(group, escape_pos);
                Ok(ir::Node::BackRef {
                    group,
                    icase: self.mods.icase,
                })
            }

            'g' => {
                self.consume('g');
                self.consume_g_backref(escape_pos)
            }

            'k' => {
                self.consume('k');
                let terminator = match self.next() {
                    Some('<') => '>',
                    Some('\'') => '\'',
                    Some('{') => '}',
                    _ => return self.error_at("Invalid group name", escape_pos),
                };
                let name = self.consume_group_name(terminator)?;
                self.make_named_backref(&name, escape_pos)
            }

            _ => {
                let cc = self.consume_character_escape(false)?;
                Ok(self.make_char(cc))
            }
        }
    }

    /// Parse `\gN`, `\g{N}`, `\g{-N}` or `\g{name}`, after the `\g`.
    fn consume_g_backref(&mut self, escape_pos: usize) -> Result<ir::Node, SyntaxError> {
        let braced = self.try_consume('{');
        let relative = braced && self.try_consume('-');
        let group = match self.try_consume_decimal_integer_literal() {
            Some(val) => val,
            None if braced && !relative => {
                let name = self.consume_group_name('}')?;
                return self.make_named_backref(&name, escape_pos);
            }
            None => return self.error_at("Invalid character escape", escape_pos),
        };
        if braced && !self.try_consume('}') {
            return self.error_at("Invalid character escape", escape_pos);
        }
        let group = if relative {
            // \g{-1} is the most recently opened group.
            let opened = self.group_count as usize;
            if group == 0 || group > opened {
                return self.error_at(
                    format!("Backreference \\g{{-{}}} exceeds number of capture groups", group),
                    escape_pos,
                );
            }
            opened + 1 - group
        } else {
            group
        };
        if group == 0 {
            return self.error_at("Invalid character escape", escape_pos);
        }
        let group = group.min(MAX_CAPTURE_GROUPS + 1) as u32;
        self.note_backref(group, escape_pos);
        Ok(ir::Node::BackRef {
            group,
            icase: self.mods.icase,
        })
    }

    /// Accumulate up to \p max_digits further octal digits onto \p value.
    fn consume_octal(&mut self, mut value: u32, max_digits: usize) -> char {
        for _ in 0..max_digits {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(d) => {
                    self.next();
                    value = value * 8 + d;
                }
                None => break,
            }
        }
        char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Parse an escape which denotes a single character, after the
    /// backslash. Unknown escapes denote the escaped character itself.
    fn consume_character_escape(&mut self, in_bracket: bool) -> Result<char, SyntaxError> {
        let escape_pos = self.pos.saturating_sub(1);
        let c = match self.next() {
            Some(c) => c,
            None => return self.error("Incomplete escape"),
        };
        Ok(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'f' => '\x0C',
            'v' => '\x0B',
            'a' => '\x07',
            'e' => '\x1B',
            'b' if in_bracket => '\x08',
            '0' => self.consume_octal(0, 2),
            'c' => match self.next() {
                Some(nc) => char::from((nc as u32 % 32) as u8),
                None => return self.error("Incomplete escape"),
            },
            'x' => match self.consume_hex_escape() {
                Some(cc) => cc,
                None => return self.error_at("Invalid character escape", escape_pos),
            },
            c => c,
        })
    }

    /// Parse `HH` or `{H...}` after `\x`.
    fn consume_hex_escape(&mut self) -> Option<char> {
        let braced = self.try_consume('{');
        let rest = self.rest();
        let limit = if braced { rest.len() } else { 2 };
        let len = rest
            .char_indices()
            .take(limit)
            .find(|&(_, c)| !c.is_ascii_hexdigit())
            .map_or_else(|| rest.len().min(limit), |(idx, _)| idx);
        let digits = &rest[..len];
        self.pos += len;
        if digits.is_empty() || (braced && !self.try_consume('}')) {
            return None;
        }
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
    }

    /// Parse a bracket expression like `[a-z[:digit:]]`.
    fn consume_bracket(&mut self) -> Result<ir::Node, SyntaxError> {
        let open = self.pos;
        self.consume('[');
        let mut result = BracketContents {
            invert: self.try_consume('^'),
            icase: self.mods.icase,
            cps: CodePointSet::new(),
        };

        // A leading ] is literal.
        let mut first = true;
        loop {
            match self.peek() {
                None => return self.error_at("Unbalanced bracket", open),
                Some(']') if !first => {
                    self.consume(']');
                    return Ok(ir::Node::Bracket(result));
                }
                _ => {}
            }
            first = false;

            let atom = self.consume_bracket_class_atom(open)?;

            // Check for a dash; we may have a range. A dash before the
            // closing bracket is literal, as in [a-].
            let rest = self.rest();
            if !rest.starts_with('-') || rest.starts_with("-]") || rest.len() == 1 {
                add_class_atom(&mut result, atom);
                continue;
            }
            let range_pos = self.pos;
            self.consume('-');
            let second = self.consume_bracket_class_atom(open)?;

            // Ranges can't contain character classes: [\d-z] is invalid.
            // Ranges must also be in order: z-a is invalid.
            match (atom, second) {
                (ClassAtom::CodePoint(c1), ClassAtom::CodePoint(c2)) if c1 <= c2 => {
                    result.cps.add(Interval::new(c1 as u32, c2 as u32))
                }
                _ => return self.error_at("Invalid character range", range_pos),
            }
        }
    }

    fn consume_bracket_class_atom(&mut self, open: usize) -> Result<ClassAtom, SyntaxError> {
        let rest = self.rest();
        let c = match rest.chars().next() {
            Some(c) => c,
            None => return self.error_at("Unbalanced bracket", open),
        };
        if rest.starts_with("[:") && self.flags.char_classes() {
            return self.consume_posix_class();
        }
        if rest.starts_with("[=") || rest.starts_with("[.") {
            return self.consume_collating_element();
        }
        if c == '\\' && !self.flags.contains(Flags::NO_ESCAPE_IN_LISTS) {
            self.consume('\\');
            let ec = match self.peek() {
                Some(ec) => ec,
                None => return self.error("Incomplete escape"),
            };
            if let Some((class_type, positive)) = escape_class(ec) {
                self.consume(ec);
                return Ok(ClassAtom::CharacterClass {
                    class_type,
                    positive,
                });
            }
            return Ok(ClassAtom::CodePoint(self.consume_character_escape(true)?));
        }
        Ok(ClassAtom::CodePoint(self.consume(c)))
    }

    /// Parse `[:name:]` or `[:^name:]`.
    fn consume_posix_class(&mut self) -> Result<ClassAtom, SyntaxError> {
        let start = self.pos;
        self.pos += 2;
        let positive = !self.try_consume('^');
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let name = &rest[..len];
        self.pos += len;
        if !self.try_consume_str(":]") {
            return self.error_at("Character class name is not terminated", start);
        }
        match CharacterClassType::from_posix_name(name) {
            Some(class_type) => Ok(ClassAtom::CharacterClass {
                class_type,
                positive,
            }),
            None => self.error_at("Unknown character class name", start),
        }
    }

    /// Parse `[=c=]` or `[.c.]`, each of which denotes one character here.
    fn consume_collating_element(&mut self) -> Result<ClassAtom, SyntaxError> {
        let start = self.pos;
        let delim = if self.rest().starts_with("[=") { "=]" } else { ".]" };
        self.pos += 2;
        let rest = self.rest();
        let mut chars = rest.chars();
        match (chars.next(), chars.as_str().starts_with(delim)) {
            (Some(c), true) => {
                self.pos += c.len_utf8() + delim.len();
                Ok(ClassAtom::CodePoint(c))
            }
            _ => self.error_at("Invalid collating element", start),
        }
    }

    /// \return whether a basic-grammar expression ends at \p pos.
    fn basic_term_ends_at(&self, pos: usize) -> bool {
        let rest = &self.pattern[pos..];
        rest.is_empty()
            || rest.starts_with("\\)")
            || (self.flags.bk_vbar() && rest.starts_with("\\|"))
            || (self.newline_alt() && rest.starts_with('\n'))
    }

    fn consume_basic_disjunction(&mut self) -> Result<ir::Node, SyntaxError> {
        self.check_nesting(1)?;
        self.depth += 1;
        let res = self.consume_basic_alternatives();
        self.depth -= 1;
        res
    }

    fn consume_basic_alternatives(&mut self) -> Result<ir::Node, SyntaxError> {
        let mut terms = vec![self.consume_basic_term()?];
        while (self.flags.bk_vbar() && self.try_consume_str("\\|"))
            || (self.newline_alt() && self.try_consume('\n'))
        {
            terms.push(self.consume_basic_term()?);
        }
        self.check_empty_alternatives(&terms)?;
        Ok(make_alt(terms))
    }

    /// A catenation in the POSIX basic grammar.
    fn consume_basic_term(&mut self) -> Result<ir::Node, SyntaxError> {
        let mut result: Vec<ir::Node> = Vec::new();
        // `*` is literal at the start of an expression, including just
        // after a leading `^`.
        let mut at_start = true;
        while !self.basic_term_ends_at(self.pos) {
            let start_group = self.group_count;
            let start_offset = result.len();
            let c = match self.peek() {
                Some(c) => c,
                None => break,
            };
            match c {
                '^' if at_start => {
                    self.consume('^');
                    result.push(self.make_anchor(ir::AnchorType::StartOfLine));
                    continue;
                }
                '$' if self.basic_term_ends_at(self.pos + 1) => {
                    self.consume('$');
                    result.push(self.make_anchor(ir::AnchorType::EndOfLine));
                    continue;
                }
                '.' => {
                    self.consume('.');
                    result.push(self.make_dot());
                }
                '[' => {
                    result.push(self.consume_bracket()?);
                }
                '\\' => {
                    self.consume('\\');
                    result.push(self.consume_basic_escape()?);
                }
                c => {
                    self.consume(c);
                    result.push(self.make_char(c));
                }
            }
            at_start = false;

            let mut stacked = 0;
            while let Some(quant) = self.try_consume_basic_quantifier()? {
                stacked += 1;
                self.check_nesting(stacked)?;
                let quantifee = result.split_off(start_offset);
                let node = self.make_loop(make_cat(quantifee), quant, start_group)?;
                result.push(node);
            }
        }
        Ok(make_cat(result))
    }

    /// Parse an escape in the basic grammar, after the backslash.
    fn consume_basic_escape(&mut self) -> Result<ir::Node, SyntaxError> {
        let escape_pos = self.pos - 1;
        let c = match self.peek() {
            Some(c) => c,
            None => return self.error("Incomplete escape"),
        };
        match c {
            '(' => {
                self.consume('(');
                let group = self.begin_capture(escape_pos, None)?;
                let contents = self.consume_basic_disjunction()?;
                if !self.try_consume_str("\\)") {
                    return self.error_at("Unbalanced parenthesis", escape_pos);
                }
                Ok(self.end_capture(group, contents))
            }
            '{' if self.flags.intervals() => self.error_at("Nothing to repeat", escape_pos),
            '+' | '?' if self.flags.bk_plus_qm() => {
                self.error_at("Nothing to repeat", escape_pos)
            }
            '1'..='9' => {
                self.consume(c);
                let group = c.to_digit(10).unwrap_or(0);
                self.note_backref(group, escape_pos);
                Ok(ir::Node::BackRef {
                    group,
                    icase: self.mods.icase,
                })
            }
            'w' | 'W' | 's' | 'S' => {
                self.consume(c);
                match escape_class(c) {
                    Some((class_type, positive)) => Ok(make_bracket_class(class_type, positive)),
                    None => Ok(self.make_char(c)),
                }
            }
            'b' | 'B' => {
                self.consume(c);
                Ok(ir::Node::WordBoundary { invert: c == 'B' })
            }
            '<' | '>' => {
                self.consume(c);
                Ok(ir::Node::WordEdge { start: c == '<' })
            }
            '`' => {
                self.consume(c);
                Ok(self.make_anchor(ir::AnchorType::StartOfText))
            }
            '\'' => {
                self.consume(c);
                Ok(self.make_anchor(ir::AnchorType::EndOfText))
            }
            c => {
                self.consume(c);
                Ok(self.make_char(c))
            }
        }
    }

    fn try_consume_basic_quantifier(&mut self) -> Result<Option<ir::Quantifier>, SyntaxError> {
        let (min, max) = if self.try_consume('*') {
            (0, None)
        } else if self.flags.bk_plus_qm() && self.try_consume_str("\\+") {
            (1, None)
        } else if self.flags.bk_plus_qm() && self.try_consume_str("\\?") {
            (0, Some(1))
        } else if self.flags.intervals() && self.rest().starts_with("\\{") {
            let open = self.pos;
            self.pos += 2;
            return match self.try_consume_interval("\\}") {
                Some(quant) => self.validate_quantifier(quant, open).map(Some),
                None => self.error_at("Invalid quantifier", open),
            };
        } else {
            return Ok(None);
        };
        Ok(Some(ir::Quantifier {
            min,
            max,
            greedy: true,
        }))
    }

    /// Every char of the pattern matches itself.
    fn consume_literal(&mut self) -> ir::Node {
        let rest = self.rest();
        self.pos = self.pattern.len();
        make_cat(rest.chars().map(|c| self.make_char(c)).collect())
    }

    fn finalize(&mut self, body: ir::Node) -> Result<ir::Regex, SyntaxError> {
        debug_assert!(self.loop_count <= MAX_LOOPS as u32);
        debug_assert!(self.group_count as usize <= MAX_CAPTURE_GROUPS);
        if self.max_backref > self.group_count as u32 {
            return self.error_at(
                format!(
                    "Backreference \\{} exceeds number of capture groups",
                    self.max_backref
                ),
                self.max_backref_pos,
            );
        }
        let mut node = make_cat(vec![body, ir::Node::Goal]);
        if self.has_lookbehind {
            ir::walk_mut(false, &mut node, &mut ir::Node::reverse_cats);
        }
        let group_names = if self.has_named_groups {
            mem::take(&mut self.group_names).into_boxed_slice()
        } else {
            Box::default()
        };
        Ok(ir::Regex {
            node,
            flags: self.flags,
            groups: self.group_count,
            group_names,
            subexpressions: mem::take(&mut self.subexpressions),
        })
    }
}

/// Try parsing a given pattern.
/// Return the resulting IR regex, or an error.
pub fn try_parse(pattern: &str, flags: Flags) -> Result<ir::Regex, SyntaxError> {
    let mut p = Parser::new(pattern, flags);
    p.try_parse()
}
