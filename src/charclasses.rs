use crate::codepointset::Interval;

// Character classes like \d, \s or [:punct:].

/// Construct an interval from an inclusive range of char.
const fn r(first: char, last: char) -> Interval {
    Interval::new(first as u32, last as u32)
}

/// Construct an interval from a single char.
const fn r1(c: char) -> Interval {
    Interval::new(c as u32, c as u32)
}

// Note all of these are sorted.

pub const WORD_CHARS: [Interval; 4] = [r('0', '9'), r('A', 'Z'), r1('_'), r('a', 'z')];

pub const DIGITS: [Interval; 1] = [r('0', '9')];

pub const ALNUM: [Interval; 3] = [r('0', '9'), r('A', 'Z'), r('a', 'z')];

pub const ALPHA: [Interval; 2] = [r('A', 'Z'), r('a', 'z')];

pub const LOWER: [Interval; 1] = [r('a', 'z')];

pub const UPPER: [Interval; 1] = [r('A', 'Z')];

pub const XDIGITS: [Interval; 3] = [r('0', '9'), r('A', 'F'), r('a', 'f')];

pub const CNTRL: [Interval; 2] = [r('\u{0000}', '\u{001F}'), r1('\u{007F}')];

pub const GRAPH: [Interval; 1] = [r('!', '~')];

pub const PRINT: [Interval; 1] = [r(' ', '~')];

pub const PUNCT: [Interval; 4] = [r('!', '/'), r(':', '@'), r('[', '`'), r('{', '~')];

/// Horizontal whitespace, \h.
pub const BLANK: [Interval; 8] = [
    r1('\t'),
    r1(' '),
    r1('\u{00A0}'),
    r1('\u{1680}'),
    r('\u{2000}', '\u{200A}'),
    r1('\u{202F}'),
    r1('\u{205F}'),
    r1('\u{3000}'),
];

/// Whitespace other than line terminators.
pub const WHITESPACE: [Interval; 9] = [
    // TAB, VT, FF
    r('\u{0009}', '\u{000C}'),
    r1('\u{0020}'),
    r1('\u{00A0}'),
    r1('\u{1680}'),
    r('\u{2000}', '\u{200A}'),
    r1('\u{202F}'),
    r1('\u{205F}'),
    r1('\u{3000}'),
    r1('\u{FEFF}'),
];

/// Characters which end a line for `^`, `$` and `.`.
pub const LINE_TERMINATOR: [Interval; 3] =
    [r1('\u{000A}'), r1('\u{000D}'), r('\u{2028}', '\u{2029}')];
