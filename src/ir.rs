//! Intermediate representation for a regex

use crate::flags::Flags;
use crate::types::{BracketContents, CaptureGroupID, CaptureGroupName};
use core::fmt;
use core::ops::Range;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnchorType {
    StartOfLine,             // ^
    EndOfLine,               // $
    StartOfText,             // \A \`
    EndOfText,               // \z \'
    EndOfTextOrFinalNewline, // \Z
}

/// A Quantifier.
#[derive(Debug, Copy, Clone)]
pub struct Quantifier {
    /// Minimum number of iterations of the loop, inclusive.
    pub min: usize,

    /// Maximum number of iterations of the loop, inclusive, or None if
    /// unbounded.
    pub max: Option<usize>,

    /// Whether the loop is greedy.
    pub greedy: bool,
}

/// The node types of our IR.
#[derive(Debug)]
pub enum Node {
    /// Matches the empty string.
    Empty,

    /// Reaching this node terminates the match successfully.
    Goal,

    /// Match a literal character.
    /// If icase is true, then `c` MUST be already folded.
    Char { c: char, icase: bool },

    /// Match the catenation of multiple nodes.
    Cat(Vec<Node>),

    /// Match an alternation like a|b.
    Alt(Box<Node>, Box<Node>),

    /// Match anything including newlines.
    MatchAny,

    /// Match anything except a newline.
    MatchAnyExceptLineTerminator,

    /// Match an anchor like ^ or \A.
    /// `multiline` only affects line anchors.
    Anchor {
        anchor_type: AnchorType,
        multiline: bool,
    },

    /// Word boundary (\b or \B).
    WordBoundary { invert: bool },

    /// Start (\<) or end (\>) of a word.
    WordEdge { start: bool },

    /// A capturing group.
    CaptureGroup(Box<Node>, CaptureGroupID),

    /// A named capturing group.
    NamedCaptureGroup(Box<Node>, CaptureGroupID, CaptureGroupName),

    /// A backreference to a 1-based group number.
    BackRef { group: u32, icase: bool },

    /// A bracket.
    Bracket(BracketContents),

    /// A lookaround assertions like (?=) or (?<!).
    LookaroundAssertion {
        negate: bool,
        backwards: bool,
        start_group: CaptureGroupID,
        end_group: CaptureGroupID,
        contents: Box<Node>,
    },

    /// An atomic group (?>...), which never backtracks into its contents
    /// once matched.
    Atomic(Box<Node>),

    /// A loop like /.*/ or /x{3, 5}?/
    Loop {
        loopee: Box<Node>,
        quant: Quantifier,
        enclosed_groups: Range<u16>,
    },

    /// A loop whose body matches exactly one character.
    /// Enclosed capture groups are forbidden here.
    Loop1CharBody {
        loopee: Box<Node>,
        quant: Quantifier,
    },
}

pub type NodeList = Vec<Node>;

impl Node {
    /// Helper to return an "always fails" node.
    pub fn make_always_fails() -> Node {
        Node::Bracket(BracketContents::default())
    }

    /// Reverse the children of \p self if in a lookbehind.
    /// Used as a parameter to walk_mut.
    pub fn reverse_cats(&mut self, w: &mut Walk) {
        match self {
            Node::Cat(nodes) if w.in_lookbehind => nodes.reverse(),
            _ => {}
        }
    }

    /// \return whether this is an Empty node.
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    /// \return whether this is a Cat node.
    pub fn is_cat(&self) -> bool {
        matches!(self, Node::Cat(..))
    }

    /// \return whether this node is known to match exactly one char.
    /// This is best-effort: a false return is always safe.
    pub fn matches_exactly_one_char(&self) -> bool {
        match self {
            Node::Char { .. } => true,
            Node::Bracket(contents) => !contents.is_empty(),
            Node::MatchAny => true,
            Node::MatchAnyExceptLineTerminator => true,
            _ => false,
        }
    }

    /// \return true if this node will always fail to match.
    /// Note this is different than matching the empty string.
    pub fn match_always_fails(&self) -> bool {
        match self {
            Node::Bracket(contents) => contents.is_empty(),
            _ => false,
        }
    }

    /// \return the number of chars this node always matches, or None if
    /// that varies.
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            Node::Empty
            | Node::Goal
            | Node::Anchor { .. }
            | Node::WordBoundary { .. }
            | Node::WordEdge { .. }
            | Node::LookaroundAssertion { .. } => Some(0),
            Node::Char { .. }
            | Node::MatchAny
            | Node::MatchAnyExceptLineTerminator
            | Node::Bracket(..) => Some(1),
            Node::Cat(nodes) => nodes
                .iter()
                .try_fold(0usize, |acc, n| Some(acc + n.fixed_width()?)),
            Node::Alt(left, right) => {
                let width = left.fixed_width()?;
                if right.fixed_width()? == width {
                    Some(width)
                } else {
                    None
                }
            }
            Node::CaptureGroup(contents, ..)
            | Node::NamedCaptureGroup(contents, ..)
            | Node::Atomic(contents) => contents.fixed_width(),
            Node::BackRef { .. } => None,
            Node::Loop { loopee, quant, .. } | Node::Loop1CharBody { loopee, quant } => {
                match quant.max {
                    Some(max) if max == quant.min => loopee.fixed_width()?.checked_mul(max),
                    _ => None,
                }
            }
        }
    }

    /// Duplicate a node. Capture groups are never duplicated.
    ///
    /// Returns None if the depth is too high or the node holds a group.
    pub fn try_duplicate(&self, mut depth: usize) -> Option<Node> {
        if depth > 100 {
            return None;
        }
        depth += 1;
        Some(match self {
            Node::Empty => Node::Empty,
            Node::Goal => Node::Goal,
            &Node::Char { c, icase } => Node::Char { c, icase },
            Node::Cat(nodes) => {
                let mut new_nodes = Vec::with_capacity(nodes.len());
                for n in nodes {
                    new_nodes.push(n.try_duplicate(depth)?);
                }
                Node::Cat(new_nodes)
            }
            Node::Alt(left, right) => Node::Alt(
                Box::new(left.try_duplicate(depth)?),
                Box::new(right.try_duplicate(depth)?),
            ),
            Node::MatchAny => Node::MatchAny,
            Node::MatchAnyExceptLineTerminator => Node::MatchAnyExceptLineTerminator,
            &Node::Anchor {
                anchor_type,
                multiline,
            } => Node::Anchor {
                anchor_type,
                multiline,
            },
            Node::Loop {
                loopee,
                quant,
                enclosed_groups,
            } => {
                if !enclosed_groups.is_empty() {
                    return None;
                }
                Node::Loop {
                    loopee: Box::new(loopee.try_duplicate(depth)?),
                    quant: *quant,
                    enclosed_groups: enclosed_groups.clone(),
                }
            }
            Node::Loop1CharBody { loopee, quant } => Node::Loop1CharBody {
                loopee: Box::new(loopee.try_duplicate(depth)?),
                quant: *quant,
            },
            Node::CaptureGroup(..) | Node::NamedCaptureGroup(..) => return None,
            &Node::WordBoundary { invert } => Node::WordBoundary { invert },
            &Node::WordEdge { start } => Node::WordEdge { start },
            &Node::BackRef { group, icase } => Node::BackRef { group, icase },
            Node::Bracket(bc) => Node::Bracket(bc.clone()),
            Node::Atomic(contents) => Node::Atomic(Box::new(contents.try_duplicate(depth)?)),
            Node::LookaroundAssertion {
                negate,
                backwards,
                start_group,
                end_group,
                contents,
            } => {
                if start_group < end_group {
                    return None;
                }
                Node::LookaroundAssertion {
                    negate: *negate,
                    backwards: *backwards,
                    start_group: *start_group,
                    end_group: *end_group,
                    contents: Box::new(contents.try_duplicate(depth)?),
                }
            }
        })
    }
}

/// A helper type for walking.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    // It set to true, skip the children of this node.
    pub skip_children: bool,

    // The current depth of the walk.
    pub depth: usize,

    // If true, we are in a lookbehind (and so the cursor will move backwards).
    pub in_lookbehind: bool,
}

struct Walker<'a, F>
where
    F: FnMut(&Node, &mut Walk),
{
    func: &'a mut F,
    postorder: bool,
    walk: Walk,
}

impl<F> Walker<'_, F>
where
    F: FnMut(&Node, &mut Walk),
{
    fn process_children(&mut self, n: &Node) {
        match n {
            Node::Empty
            | Node::Goal
            | Node::Char { .. }
            | Node::MatchAny
            | Node::MatchAnyExceptLineTerminator
            | Node::Anchor { .. }
            | Node::WordBoundary { .. }
            | Node::WordEdge { .. }
            | Node::BackRef { .. }
            | Node::Bracket(..) => {}
            Node::Cat(nodes) => {
                for node in nodes {
                    self.process(node);
                }
            }
            Node::Alt(left, right) => {
                self.process(left.as_ref());
                self.process(right.as_ref());
            }
            Node::Loop { loopee, .. } | Node::Loop1CharBody { loopee, .. } => self.process(loopee),
            Node::CaptureGroup(contents, ..)
            | Node::NamedCaptureGroup(contents, ..)
            | Node::Atomic(contents) => self.process(contents.as_ref()),
            Node::LookaroundAssertion {
                backwards,
                contents,
                ..
            } => {
                let saved = self.walk.in_lookbehind;
                self.walk.in_lookbehind = *backwards;
                self.process(contents.as_ref());
                self.walk.in_lookbehind = saved;
            }
        }
    }

    fn process(&mut self, n: &Node) {
        self.walk.skip_children = false;
        if !self.postorder {
            (self.func)(n, &mut self.walk);
        }
        if !self.walk.skip_children {
            self.walk.depth += 1;
            self.process_children(n);
            self.walk.depth -= 1;
        }
        if self.postorder {
            (self.func)(n, &mut self.walk)
        }
    }
}

struct MutWalker<'a, F>
where
    F: FnMut(&mut Node, &mut Walk),
{
    func: &'a mut F,
    postorder: bool,
    walk: Walk,
}

impl<F> MutWalker<'_, F>
where
    F: FnMut(&mut Node, &mut Walk),
{
    fn process_children(&mut self, n: &mut Node) {
        match n {
            Node::Empty
            | Node::Goal
            | Node::Char { .. }
            | Node::MatchAny
            | Node::MatchAnyExceptLineTerminator
            | Node::Anchor { .. }
            | Node::WordBoundary { .. }
            | Node::WordEdge { .. }
            | Node::BackRef { .. }
            | Node::Bracket(..) => {}
            Node::Cat(nodes) => {
                nodes.iter_mut().for_each(|node| self.process(node));
            }
            Node::Alt(left, right) => {
                self.process(left.as_mut());
                self.process(right.as_mut());
            }
            Node::Loop { loopee, .. } | Node::Loop1CharBody { loopee, .. } => {
                self.process(loopee);
            }
            Node::CaptureGroup(contents, ..)
            | Node::NamedCaptureGroup(contents, ..)
            | Node::Atomic(contents) => self.process(contents.as_mut()),
            Node::LookaroundAssertion {
                backwards,
                contents,
                ..
            } => {
                let saved = self.walk.in_lookbehind;
                self.walk.in_lookbehind = *backwards;
                self.process(contents.as_mut());
                self.walk.in_lookbehind = saved;
            }
        }
    }

    fn process(&mut self, n: &mut Node) {
        self.walk.skip_children = false;
        if !self.postorder {
            (self.func)(n, &mut self.walk);
        }
        if !self.walk.skip_children {
            self.walk.depth += 1;
            self.process_children(n);
            self.walk.depth -= 1;
        }
        if self.postorder {
            (self.func)(n, &mut self.walk);
        }
    }
}

/// Call a function on every Node.
/// If \p postorder is true, then process children before the node;
/// otherwise process children after the node.
pub fn walk<F>(postorder: bool, n: &Node, func: &mut F)
where
    F: FnMut(&Node, &mut Walk),
{
    let mut walker = Walker {
        func,
        postorder,
        walk: Walk::default(),
    };
    walker.process(n);
}

/// Call a function on every Node, which may mutate the node.
/// If \p postorder is true, then process children before the node;
/// otherwise process children after the node.
pub fn walk_mut<F>(postorder: bool, n: &mut Node, func: &mut F)
where
    F: FnMut(&mut Node, &mut Walk),
{
    let mut walker = MutWalker {
        func,
        postorder,
        walk: Walk::default(),
    };
    walker.process(n);
}

/// A regex in IR form.
#[derive(Debug)]
pub struct Regex {
    pub node: Node,
    pub flags: Flags,

    /// Number of capture groups.
    pub groups: u16,

    /// Either empty, or one name per capture group (empty for unnamed).
    pub group_names: Box<[Box<str>]>,

    /// Source ranges of each capture group, if requested.
    pub subexpressions: Vec<Range<usize>>,
}

fn display_node(node: &Node, depth: usize, f: &mut fmt::Formatter) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "..")?;
    }
    match node {
        Node::Empty => writeln!(f, "Empty"),
        Node::Goal => writeln!(f, "Goal"),
        Node::Char { c, icase } => {
            let suffix = if *icase { " (icase)" } else { "" };
            writeln!(f, "'{}'{}", c.escape_debug(), suffix)
        }
        Node::Cat(..) => writeln!(f, "Cat"),
        Node::Alt(..) => writeln!(f, "Alt"),
        Node::MatchAny => writeln!(f, "MatchAny"),
        Node::MatchAnyExceptLineTerminator => writeln!(f, "MatchAnyExceptLineTerminator"),
        Node::Anchor {
            anchor_type,
            multiline,
        } => writeln!(f, "Anchor {:?} multiline={}", anchor_type, multiline),
        Node::Loop {
            quant,
            enclosed_groups,
            ..
        } => writeln!(f, "Loop (groups {:?}) {:?}", enclosed_groups, quant),
        Node::Loop1CharBody { quant, .. } => writeln!(f, "Loop1Char {:?}", quant),
        Node::CaptureGroup(_node, idx) => writeln!(f, "CaptureGroup {:?}", idx),
        Node::NamedCaptureGroup(_node, idx, name) => {
            writeln!(f, "NamedCaptureGroup {:?} {:?}", idx, name)
        }
        &Node::WordBoundary { invert } => {
            let kind = if invert { "\\B" } else { "\\b" };
            writeln!(f, "WordBoundary {:?}", kind)
        }
        &Node::WordEdge { start } => {
            let kind = if start { "\\<" } else { "\\>" };
            writeln!(f, "WordEdge {:?}", kind)
        }
        &Node::BackRef { group, icase } => writeln!(f, "BackRef {:?} icase={}", group, icase),
        Node::Bracket(contents) => writeln!(f, "Bracket {:?}", contents),
        Node::Atomic(..) => writeln!(f, "Atomic"),
        &Node::LookaroundAssertion {
            negate,
            backwards,
            start_group,
            end_group,
            ..
        } => {
            let sense = if negate { "negative" } else { "positive" };
            let direction = if backwards { "backwards" } else { "forwards" };
            writeln!(
                f,
                "LookaroundAssertion {} {} {:?} {:?}",
                sense, direction, start_group, end_group
            )
        }
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = Ok(());
        walk(false, &self.node, &mut |node: &Node, walk: &mut Walk| {
            if result.is_ok() {
                result = display_node(node, walk.depth, f)
            }
        });
        result
    }
}
