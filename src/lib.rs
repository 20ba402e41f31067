/*!

# hostregex - a backtracking regex engine for a host scripting environment

This crate compiles patterns in several dialects (Perl, POSIX basic and
extended, awk, grep, egrep, sed, and literal text), searches strings with them,
and writes the result into a reusable register store. A small binding layer
models what a host scripting language needs on top of that: a per-context
"last match" record, an implicit current subject, and the translation of
host regex options into engine flags.

# Example: search and read the registers

```rust
use hostregex::{Regex, Registers};
let re = Regex::new(r"(\d{3})-(\d{4})").unwrap();
let mut regs = Registers::new();
assert!(re.search("call 555-1234 now", 0, &mut regs).unwrap());
assert_eq!(regs.get(0), Some(5..13));
assert_eq!(regs.get(1), Some(5..8));
assert_eq!(regs.get(2), Some(9..13));
```

Groups which did not participate in the match hold the sentinel -1:

```rust
use hostregex::{Regex, Registers};
let re = Regex::new("(foo)?bar").unwrap();
let mut regs = Registers::new();
assert!(re.search("bar", 0, &mut regs).unwrap());
assert_eq!(regs.begin(1), -1);
assert_eq!(regs.end(1), -1);
```

# Example: dialects

```rust
use hostregex::{Flags, Regex};
// POSIX grammars report the longest match at the leftmost position.
let re = Regex::with_flags("a|ab", Flags::EXTENDED).unwrap();
let mut regs = hostregex::Registers::new();
assert!(re.search("abc", 0, &mut regs).unwrap());
assert_eq!(regs.get(0), Some(0..2));

// Basic grammar uses backslashed groups.
let re = Regex::with_flags(r"\(ab\)*c", Flags::BASIC).unwrap();
assert_eq!(re.group_count(), 1);
```

# Example: the host contract

```rust
use hostregex::{Context, Regex};
let mut cx = Context::new();
let re = Regex::new("abcd").unwrap();
assert_eq!(cx.search(&re, &"xyzabcdef".into()).unwrap(), Some(3));
let md = cx.last_match().unwrap();
assert_eq!(md.pre_match(), "xyz");
assert_eq!(md.post_match(), "ef");

assert_eq!(cx.search(&re, &"uqioer".into()).unwrap(), None);
assert!(cx.last_match().is_none());
```

# Resource limits

Backtracking can take exponential time. Every search runs under a step
budget which grows with the program size and the input length, and under a
cap on the backtrack stack depth. A search which exceeds either fails with
`Error::ResourceExhausted` and leaves the registers untouched.

# Architecture

hostregex has a parser, an intermediate representation, an optimizer which
acts on the IR, a bytecode emitter, and a classical backtracking interpreter
with an explicit backtracking stack.

*/

#![warn(clippy::all)]
#![allow(clippy::upper_case_acronyms, clippy::match_like_matches_macro)]
// Clippy's manual_range_contains suggestion produces worse codegen.
#![allow(clippy::manual_range_contains)]

pub use crate::api::*;
pub use crate::context::{Context, MatchData};
pub use crate::error::{Error, ResourceLimit, SyntaxError};
pub use crate::flags::{Flags, UnknownFlag};
pub use crate::host::{HostRegexp, HostValue};
pub use crate::limits::Limits;
pub use crate::registers::{Registers, Span, UNSET};

mod api;
mod charclasses;
mod classicalbacktrack;
mod codepointset;
mod context;
mod cursor;
mod emit;
mod error;
mod flags;
mod folds;
pub mod host;
mod indexing;
mod insn;
mod ir;
mod limits;
mod matchers;
mod optimizer;
mod parse;
mod registers;
mod scm;
mod startpredicate;
mod types;
