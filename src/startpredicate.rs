//! Support for quickly finding potential match locations.
use crate::folds;
use crate::insn::StartPredicate;
use crate::ir;
use crate::ir::Node;
use memchr::memmem;

/// The most bytes a set predicate may hold.
const MAX_SET_BYTES: usize = 3;

/// Check if a node is anchored to the start of the string.
/// Returns true if the node begins with \A or a non-multiline ^.
fn is_start_anchored(n: &Node) -> bool {
    match n {
        Node::Anchor {
            anchor_type: ir::AnchorType::StartOfText,
            ..
        } => true,
        Node::Anchor {
            anchor_type: ir::AnchorType::StartOfLine,
            multiline,
        } => !multiline,
        Node::Cat(nodes) => {
            // For concatenation, check if the first node is start-anchored
            nodes.first().is_some_and(is_start_anchored)
        }
        Node::CaptureGroup(child, ..) | Node::NamedCaptureGroup(child, ..) | Node::Atomic(child) => {
            is_start_anchored(child)
        }
        Node::Alt(left, right) => is_start_anchored(left) && is_start_anchored(right),
        // Other nodes are not anchored
        _ => false,
    }
}

/// \return the first UTF-8 byte of \p c.
fn utf8_first_byte(c: char) -> u8 {
    let mut buf = [0; 4];
    c.encode_utf8(&mut buf);
    buf[0]
}

/// The "IR" for a start predicate.
enum AbstractStartPredicate {
    /// No predicate.
    Arbitrary,

    /// Sequence of non-empty bytes.
    Sequence(Vec<u8>),

    /// Set of up to MAX_SET_BYTES bytes.
    Set(Vec<u8>),
}

impl AbstractStartPredicate {
    /// \return a predicate for a set of possible first bytes.
    fn set_of(mut bytes: Vec<u8>) -> Self {
        bytes.sort_unstable();
        bytes.dedup();
        if bytes.is_empty() || bytes.len() > MAX_SET_BYTES {
            Self::Arbitrary
        } else {
            Self::Set(bytes)
        }
    }

    /// \return the disjunction of two predicates.
    /// That is, a predicate that matches x OR y.
    fn disjunction(x: Self, y: Self) -> Self {
        match (x, y) {
            (Self::Arbitrary, _) => Self::Arbitrary,
            (_, Self::Arbitrary) => Self::Arbitrary,

            (Self::Sequence(s1), Self::Sequence(s2)) => {
                // Compute the length of the shared prefix.
                let shared_len = s1.iter().zip(s2.iter()).take_while(|(a, b)| a == b).count();
                if shared_len > 0 {
                    // Use the shared prefix.
                    Self::Sequence(s1[..shared_len].to_vec())
                } else {
                    // Use a set of their first byte.
                    Self::set_of(vec![s1[0], s2[0]])
                }
            }

            (Self::Set(mut s1), Self::Set(s2)) => {
                s1.extend(s2);
                Self::set_of(s1)
            }

            (Self::Set(mut s1), Self::Sequence(s2)) | (Self::Sequence(s2), Self::Set(mut s1)) => {
                // Add first byte to set.
                s1.push(s2[0]);
                Self::set_of(s1)
            }
        }
    }

    /// Resolve ourselves to a concrete start predicate.
    fn resolve_to_insn(self) -> StartPredicate {
        match self {
            Self::Arbitrary => StartPredicate::Arbitrary,
            Self::Sequence(vals) if vals.is_empty() => StartPredicate::Arbitrary,
            Self::Sequence(vals) if vals.len() == 1 => StartPredicate::ByteSet1([vals[0]]),
            Self::Sequence(vals) => {
                StartPredicate::ByteSeq(Box::new(memmem::Finder::new(&vals).into_owned()))
            }
            Self::Set(bytes) => match *bytes.as_slice() {
                [a] => StartPredicate::ByteSet1([a]),
                [a, b] => StartPredicate::ByteSet2([a, b]),
                [a, b, c] => StartPredicate::ByteSet3([a, b, c]),
                _ => StartPredicate::Arbitrary,
            },
        }
    }
}

/// \return the predicate for a single (maybe case-insensitive) char.
fn char_predicate(c: char, icase: bool) -> AbstractStartPredicate {
    if !icase || folds::is_caseless(c) {
        let mut buf = [0; 4];
        return AbstractStartPredicate::Sequence(c.encode_utf8(&mut buf).as_bytes().to_vec());
    }
    AbstractStartPredicate::set_of(
        folds::case_variants(c)
            .iter()
            .map(|&v| utf8_first_byte(v))
            .collect(),
    )
}

/// Compute any start-predicate for a node..
/// If this returns None, then the instruction is conceptually zero-width (e.g.
/// lookahead assertion) and does not contribute to the predicate.
/// If this returns StartPredicate::Arbitrary, then there is no predicate.
fn compute_start_predicate(n: &Node) -> Option<AbstractStartPredicate> {
    let arbitrary = Some(AbstractStartPredicate::Arbitrary);
    match n {
        Node::Empty => arbitrary,
        Node::Goal => arbitrary,
        Node::BackRef { .. } => arbitrary,

        &Node::Char { c, icase } => Some(char_predicate(c, icase)),

        // Cats join their leading literal chars, and otherwise return the
        // first non-None value, if any.
        Node::Cat(nodes) => {
            let mut bytes = Vec::new();
            for nn in nodes {
                match *nn {
                    Node::Char { c, icase: false } => {
                        let mut buf = [0; 4];
                        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                    _ => break,
                }
            }
            if !bytes.is_empty() {
                return Some(AbstractStartPredicate::Sequence(bytes));
            }
            nodes.iter().find_map(compute_start_predicate)
        }

        // MatchAny (aka .) is too common to do a fast prefix search for.
        Node::MatchAny => arbitrary,
        Node::MatchAnyExceptLineTerminator => arbitrary,

        Node::Anchor { .. } => arbitrary,
        Node::WordBoundary { .. } | Node::WordEdge { .. } => arbitrary,

        // Capture groups delegate to their contents.
        Node::CaptureGroup(child, ..) | Node::NamedCaptureGroup(child, ..) | Node::Atomic(child) => {
            compute_start_predicate(child)
        }

        // Zero-width assertions are one of the few instructions that impose no start predicate.
        Node::LookaroundAssertion { .. } => None,

        Node::Loop { loopee, quant, .. } | Node::Loop1CharBody { loopee, quant } => {
            if quant.min > 0 {
                compute_start_predicate(loopee)
            } else {
                arbitrary
            }
        }

        // This one is interesting - we compute the disjunction of the predicates of our two arms.
        Node::Alt(left, right) => {
            if let (Some(x), Some(y)) = (compute_start_predicate(left), compute_start_predicate(right))
            {
                Some(AbstractStartPredicate::disjunction(x, y))
            } else {
                // This indicates that one of our branches could match the empty string.
                arbitrary
            }
        }

        // Brackets are usually too broad to be worth it.
        Node::Bracket(..) => arbitrary,
    }
}

/// \return the start predicate for a Regex.
pub fn predicate_for_re(re: &ir::Regex) -> StartPredicate {
    if is_start_anchored(&re.node) {
        return StartPredicate::StartAnchored;
    }
    compute_start_predicate(&re.node)
        .unwrap_or(AbstractStartPredicate::Arbitrary)
        .resolve_to_insn()
}
