//! Regex compiler back-end: transforms IR into a CompiledRegex

use crate::insn::{CompiledRegex, Insn, JumpTarget, LoopFields};
use crate::ir;
use crate::ir::Node;
use crate::startpredicate;
use crate::types::{CaptureGroupID, LoopID};

/// \return an anchor instruction for a given IR anchor.
fn make_anchor(anchor_type: ir::AnchorType, multiline: bool) -> Insn {
    match anchor_type {
        ir::AnchorType::StartOfLine => Insn::StartOfLine { multiline },
        ir::AnchorType::EndOfLine => Insn::EndOfLine { multiline },
        ir::AnchorType::StartOfText => Insn::StartOfText,
        ir::AnchorType::EndOfText => Insn::EndOfText,
        ir::AnchorType::EndOfTextOrFinalNewline => Insn::EndOfTextOrFinalNewline,
    }
}

/// Type which wraps up the context needed to emit a CompiledRegex.
struct Emitter {
    result: CompiledRegex,

    // Number of loops seen so far.
    next_loop_id: LoopID,
}

impl Emitter {
    /// Emit an instruction.
    fn emit_insn(&mut self, insn: Insn) {
        self.result.insns.push(insn);
    }

    /// Get an instruction at a given index.
    fn get_insn(&mut self, idx: JumpTarget) -> &mut Insn {
        &mut self.result.insns[idx as usize]
    }

    /// \return the offset of the next instruction emitted.
    fn next_offset(&self) -> JumpTarget {
        self.result.insns.len() as JumpTarget
    }

    /// Emit an instruction, returning its offset.
    fn emit_insn_offset(&mut self, insn: Insn) -> JumpTarget {
        let ret = self.next_offset();
        self.emit_insn(insn);
        ret
    }

    /// Point the continuation of the instruction at \p idx to the next
    /// instruction to be emitted.
    fn fix_continuation(&mut self, idx: JumpTarget) {
        let next_insn = self.next_offset();
        match self.get_insn(idx) {
            Insn::Lookahead { continuation, .. }
            | Insn::Lookbehind { continuation, .. }
            | Insn::Atomic { continuation } => *continuation = next_insn,
            _ => panic!("Should be an instruction with a continuation"),
        }
    }

    /// Emit instructions corresponding to a given node.
    fn emit_node(&mut self, node: &Node) {
        match node {
            Node::Empty => {}
            Node::Goal => self.emit_insn(Insn::Goal),
            &Node::Char { c, icase } => {
                if icase {
                    self.emit_insn(Insn::CharICase(c))
                } else {
                    self.emit_insn(Insn::Char(c))
                }
            }
            Node::Cat(children) => {
                for nn in children {
                    self.emit_node(nn)
                }
            }
            Node::Alt(left, right) => {
                // Alternation is followed by the primary branch and has a jump to secondary
                // branch. After primary branch, jump to the continuation.
                let alt_insn = self.emit_insn_offset(Insn::Alt { secondary: 0 });
                self.emit_node(left);
                let jump_insn = self.emit_insn_offset(Insn::Jump { target: 0 });
                let right_branch = self.next_offset();
                self.emit_node(right);
                let exit = self.next_offset();

                // Fix up our jump targets.
                match self.get_insn(alt_insn) {
                    Insn::Alt { secondary } => *secondary = right_branch,
                    _ => panic!("Should be an Alt instruction"),
                }
                match self.get_insn(jump_insn) {
                    Insn::Jump { target } => *target = exit,
                    _ => panic!("Should be a Jump instruction"),
                }
            }
            Node::Bracket(contents) => {
                if contents.is_empty() {
                    self.emit_insn(Insn::JustFail)
                } else {
                    let idx = self.result.brackets.len();
                    self.result.brackets.push(contents.clone());
                    self.emit_insn(Insn::Bracket(idx))
                }
            }
            Node::MatchAny => self.emit_insn(Insn::MatchAny),
            Node::MatchAnyExceptLineTerminator => {
                self.emit_insn(Insn::MatchAnyExceptLineTerminator)
            }
            &Node::Anchor {
                anchor_type,
                multiline,
            } => self.emit_insn(make_anchor(anchor_type, multiline)),
            Node::Loop {
                loopee,
                quant,
                enclosed_groups,
            } => {
                let loop_id = self.next_loop_id;
                self.next_loop_id += 1;
                let loop_insn = self.emit_insn_offset(Insn::EnterLoop(LoopFields {
                    loop_id,
                    min_iters: quant.min,
                    max_iters: quant.max.unwrap_or(usize::MAX),
                    greedy: quant.greedy,
                    exit: 0,
                }));
                self.result.loops += 1;
                // Emit a sequence of ResetCaptureGroup for any contained groups.
                for gid in enclosed_groups.start..enclosed_groups.end {
                    self.emit_insn(Insn::ResetCaptureGroup(gid))
                }
                self.emit_node(loopee);
                self.emit_insn(Insn::LoopAgain { begin: loop_insn });
                // Fix up our loop exit.
                let exit = self.next_offset();
                match self.get_insn(loop_insn) {
                    Insn::EnterLoop(fields) => fields.exit = exit,
                    _ => panic!("Should be an EnterLoop instruction"),
                }
            }
            Node::Loop1CharBody { loopee, quant } => {
                self.emit_insn(Insn::Loop1CharBody {
                    min_iters: quant.min,
                    max_iters: quant.max.unwrap_or(usize::MAX),
                    greedy: quant.greedy,
                });
                self.emit_node(loopee);
            }
            Node::CaptureGroup(contents, group) | Node::NamedCaptureGroup(contents, group, _) => {
                let group = *group as CaptureGroupID;
                self.result.groups += 1;
                self.emit_insn(Insn::BeginCaptureGroup(group));
                self.emit_node(contents);
                self.emit_insn(Insn::EndCaptureGroup(group));
            }
            &Node::LookaroundAssertion {
                negate,
                backwards,
                start_group,
                end_group,
                ref contents,
            } => {
                let lookaround = if backwards {
                    self.emit_insn_offset(Insn::Lookbehind {
                        negate,
                        start_group,
                        end_group,
                        continuation: 0,
                    })
                } else {
                    self.emit_insn_offset(Insn::Lookahead {
                        negate,
                        start_group,
                        end_group,
                        continuation: 0,
                    })
                };
                self.emit_node(contents);
                self.emit_insn(Insn::Goal);
                self.fix_continuation(lookaround);
            }
            Node::Atomic(contents) => {
                let atomic = self.emit_insn_offset(Insn::Atomic { continuation: 0 });
                self.emit_node(contents);
                self.emit_insn(Insn::Goal);
                self.fix_continuation(atomic);
            }
            &Node::WordBoundary { invert } => self.emit_insn(Insn::WordBoundary { invert }),
            &Node::WordEdge { start } => self.emit_insn(Insn::WordEdge { start }),
            &Node::BackRef { group, icase } => {
                debug_assert!(group >= 1, "Group should not be zero");
                // -1 because \1 matches the first capture group, which has index 0.
                self.emit_insn(Insn::BackRef {
                    group: group - 1,
                    icase,
                })
            }
        }
    }
}

/// Compile the given IR to a CompiledRegex.
pub fn emit(n: &ir::Regex) -> CompiledRegex {
    let mut emitter = Emitter {
        next_loop_id: 0,
        result: CompiledRegex {
            insns: Vec::new(),
            brackets: Vec::new(),
            start_pred: startpredicate::predicate_for_re(n),
            loops: 0,
            groups: 0,
            group_names: n.group_names.clone(),
            subexpressions: n.subexpressions.clone(),
            flags: n.flags,
            longest: n.flags.leftmost_longest(),
        },
    };
    emitter.emit_node(&n.node);
    emitter.result
}
