//! Classical backtracking execution engine

use crate::cursor::{Backward, Direction, Forward};
use crate::error::ResourceLimit;
use crate::indexing::Input;
use crate::insn::{CompiledRegex, Insn, LoopFields, StartPredicate};
use crate::limits::Limits;
use crate::matchers;
use crate::registers::Registers;
use crate::scm;
use crate::scm::SingleCharMatcher;
use crate::types::{CaptureGroupID, GroupData, LoopData, LoopID, Position, IP, MAX_CAPTURE_GROUPS};
use core::ops::Range;

#[derive(Clone, Debug)]
enum BacktrackInsn {
    /// Nothing more to backtrack.
    /// This "backstops" our stack.
    Exhausted,

    /// Restore the IP and position.
    SetPosition { ip: IP, pos: Position },

    SetLoopData {
        id: LoopID,
        data: LoopData,
    },

    SetCaptureGroup {
        id: CaptureGroupID,
        data: GroupData,
    },

    EnterNonGreedyLoop {
        // The IP of the loop.
        // This is guaranteed to point to an EnterLoopInsn.
        ip: IP,
        data: LoopData,
    },

    GreedyLoop1Char {
        continuation: IP,
        min: Position,
        max: Position,
    },

    NonGreedyLoop1Char {
        continuation: IP,
        min: Position,
        max: Position,
    },
}

#[derive(Debug, Default)]
struct State {
    loops: Vec<LoopData>,
    groups: Vec<GroupData>,
}

#[derive(Debug)]
pub(crate) struct MatchAttempter<'a> {
    re: &'a CompiledRegex,
    bts: Vec<BacktrackInsn>,
    s: State,

    // Successful backtracks so far, across all start positions.
    steps: u64,
    budget: u64,
    max_depth: usize,

    // Nesting of lookarounds and atomic groups we are running inside.
    depth: usize,

    // Longest match found so far at the current start position, when the
    // regex reports leftmost-longest matches.
    best: Option<(Position, Vec<GroupData>)>,
}

impl<'a> MatchAttempter<'a> {
    pub(crate) fn new(re: &'a CompiledRegex, input: &Input, limits: &Limits) -> Self {
        Self {
            re,
            bts: vec![BacktrackInsn::Exhausted],
            s: State {
                loops: vec![LoopData::new(0); re.loops as usize],
                groups: vec![GroupData::new(); re.groups as usize],
            },
            steps: 0,
            budget: limits.step_budget(re.insns.len(), input.len()),
            max_depth: limits.max_backtrack_depth,
            depth: 0,
            best: None,
        }
    }

    #[inline(always)]
    fn push_backtrack(&mut self, bt: BacktrackInsn) {
        self.bts.push(bt)
    }

    #[inline(always)]
    fn pop_backtrack(&mut self) {
        // Note we never pop the last instruction so this will never be empty.
        debug_assert!(self.bts.len() > 1);
        self.bts.pop();
    }

    fn prepare_to_enter_loop(
        bts: &mut Vec<BacktrackInsn>,
        pos: Position,
        loop_fields: &LoopFields,
        loop_data: &mut LoopData,
    ) {
        bts.push(BacktrackInsn::SetLoopData {
            id: loop_fields.loop_id,
            data: *loop_data,
        });
        loop_data.iters += 1;
        loop_data.entry = pos;
    }

    fn run_loop(&mut self, loop_fields: &'a LoopFields, pos: Position, ip: IP) -> Option<IP> {
        let loop_data = &mut self.s.loops[loop_fields.loop_id as usize];
        let iteration = loop_data.iters;

        let do_taken = iteration < loop_fields.max_iters;
        let do_not_taken = iteration >= loop_fields.min_iters;

        let loop_taken_ip = ip + 1;
        let loop_not_taken_ip = loop_fields.exit as IP;

        // Once the minimum is satisfied, an iteration that consumed nothing
        // may not be repeated.
        if loop_data.entry == pos && iteration > loop_fields.min_iters {
            return None;
        }

        match (do_taken, do_not_taken) {
            (false, false) => {
                // No arms viable.
                None
            }
            (false, true) => {
                // Only skipping is viable.
                Some(loop_not_taken_ip)
            }
            (true, false) => {
                // Only entering is viable.
                MatchAttempter::prepare_to_enter_loop(&mut self.bts, pos, loop_fields, loop_data);
                Some(loop_taken_ip)
            }
            (true, true) if !loop_fields.greedy => {
                // Both arms are viable; backtrack into the loop.
                loop_data.entry = pos;
                self.bts.push(BacktrackInsn::EnterNonGreedyLoop {
                    ip,
                    data: *loop_data,
                });
                Some(loop_not_taken_ip)
            }
            (true, true) => {
                debug_assert!(loop_fields.greedy, "Should be greedy");
                // Both arms are viable; backtrack out of the loop.
                self.bts.push(BacktrackInsn::SetPosition {
                    ip: loop_not_taken_ip,
                    pos,
                });
                MatchAttempter::prepare_to_enter_loop(&mut self.bts, pos, loop_fields, loop_data);
                Some(loop_taken_ip)
            }
        }
    }

    // Drive the loop up to \p max times.
    // \return the position (min, max), or None on failure.
    #[inline(always)]
    fn run_scm_loop_impl<Dir: Direction, Scm: SingleCharMatcher<Dir>>(
        input: &Input,
        mut pos: Position,
        min: usize,
        max: usize,
        dir: Dir,
        matcher: Scm,
    ) -> Option<(Position, Position)> {
        debug_assert!(min <= max, "min should be <= max");
        // Drive the iteration min times.
        // That tells us the min position.
        for _ in 0..min {
            if !matcher.matches(input, dir, &mut pos) {
                return None;
            }
        }
        let min_pos = pos;

        // Drive it up to the max.
        for _ in 0..(max - min) {
            let saved = pos;
            if !matcher.matches(input, dir, &mut pos) {
                pos = saved;
                break;
            }
        }
        let max_pos = pos;
        Some((min_pos, max_pos))
    }

    // Given that ip points at a loop whose body matches exactly one character, run
    // a "single character loop". The big idea here is that we don't need to save
    // our position every iteration: we know that our loop body matches a single
    // character so we can backtrack by matching a character backwards.
    // \return the next IP, or None if the loop failed.
    #[allow(clippy::too_many_arguments)]
    fn run_scm_loop<Dir: Direction>(
        &mut self,
        input: &Input,
        dir: Dir,
        pos: &mut Position,
        min: usize,
        max: usize,
        ip: IP,
        greedy: bool,
    ) -> Option<IP> {
        // Iterate as far as we can go.
        let loop_res = match &self.re.insns[ip + 1] {
            &Insn::Char(c) => Self::run_scm_loop_impl(input, *pos, min, max, dir, scm::Char { c }),
            &Insn::CharICase(c) => {
                Self::run_scm_loop_impl(input, *pos, min, max, dir, scm::CharICase { c })
            }
            &Insn::Bracket(idx) => {
                let bc = &self.re.brackets[idx];
                Self::run_scm_loop_impl(input, *pos, min, max, dir, scm::Bracket { bc })
            }
            Insn::MatchAny => {
                Self::run_scm_loop_impl(input, *pos, min, max, dir, scm::MatchAny::new())
            }
            Insn::MatchAnyExceptLineTerminator => Self::run_scm_loop_impl(
                input,
                *pos,
                min,
                max,
                dir,
                scm::MatchAnyExceptLineTerminator::new(),
            ),
            _ => {
                // There should be no other SCMs.
                unreachable!("Missing SCM: {:?}", self.re.insns[ip + 1]);
            }
        };

        // If loop_res is none, we failed to match at least the minimum.
        let (min_pos, max_pos) = loop_res?;
        debug_assert!(
            if Dir::FORWARD {
                min_pos <= max_pos
            } else {
                min_pos >= max_pos
            },
            "min should be <= (>=) max if cursor is tracking forwards (backwards)"
        );

        // The continuation is one past the loop body, which is one past the loop.
        let continuation = ip + 2;
        if min_pos != max_pos {
            // Backtracking is possible.
            let bti = if greedy {
                BacktrackInsn::GreedyLoop1Char {
                    continuation,
                    min: min_pos,
                    max: max_pos,
                }
            } else {
                BacktrackInsn::NonGreedyLoop1Char {
                    continuation,
                    min: min_pos,
                    max: max_pos,
                }
            };
            self.bts.push(bti);
        }

        // Start at the max (min) if greedy (nongreedy).
        *pos = if greedy { max_pos } else { min_pos };
        Some(continuation)
    }

    // Run the instructions starting at \p ip as a nested match with its own
    // backtrack stack, in the direction \p Dir.
    // \return the end position if the nested match succeeded.
    fn run_nested<Dir: Direction>(
        &mut self,
        input: &Input,
        ip: IP,
        pos: Position,
    ) -> Result<Option<Position>, ResourceLimit> {
        // Start with an "empty" backtrack stack.
        let mut saved_bts = vec![BacktrackInsn::Exhausted];
        core::mem::swap(&mut self.bts, &mut saved_bts);
        self.depth += 1;

        let res = self.try_at_pos(*input, ip, pos, Dir::new());

        // Put back our bts.
        self.depth -= 1;
        core::mem::swap(&mut self.bts, &mut saved_bts);
        res
    }

    // Run a lookaround instruction, which is either forwards or backwards
    // (according to Direction). The half-open range
    // start_group..end_group is the range of contained capture groups.
    // \return whether we matched and negate was false, or did not match but negate
    // is true.
    #[allow(clippy::too_many_arguments)]
    fn run_lookaround<Dir: Direction>(
        &mut self,
        input: &Input,
        ip: IP,
        pos: Position,
        start_group: CaptureGroupID,
        end_group: CaptureGroupID,
        negate: bool,
    ) -> Result<bool, ResourceLimit> {
        // Copy capture groups, because if the match fails (or if we are inverted)
        // we need to restore these.
        let range = (start_group as usize)..(end_group as usize);
        let saved_groups = self.s.groups[range.clone()].to_vec();

        let matched = self.run_nested::<Dir>(input, ip, pos)?.is_some();

        // If we are a positive lookaround that successfully matched, retain the
        // capture groups (but we need to set up backtracking). Otherwise restore
        // them.
        if matched && !negate {
            for (idx, cg) in saved_groups.iter().enumerate() {
                debug_assert!(idx + (start_group as usize) < MAX_CAPTURE_GROUPS);
                self.push_backtrack(BacktrackInsn::SetCaptureGroup {
                    id: (idx as CaptureGroupID) + start_group,
                    data: *cg,
                });
            }
        } else {
            self.s.groups.splice(range, saved_groups);
        }
        Ok(matched != negate)
    }

    // Run an atomic group starting at \p ip. Its contents match at most once:
    // backtracking into the group is impossible, but capture groups it set are
    // restored if we backtrack past it.
    // \return the position after the group, or None if it failed.
    fn run_atomic<Dir: Direction>(
        &mut self,
        input: &Input,
        ip: IP,
        pos: Position,
    ) -> Result<Option<Position>, ResourceLimit> {
        let saved_groups = self.s.groups.clone();
        match self.run_nested::<Dir>(input, ip, pos)? {
            Some(end) => {
                for (idx, cg) in saved_groups.iter().enumerate() {
                    if self.s.groups[idx] != *cg {
                        self.push_backtrack(BacktrackInsn::SetCaptureGroup {
                            id: idx as CaptureGroupID,
                            data: *cg,
                        });
                    }
                }
                Ok(Some(end))
            }
            None => {
                self.s.groups = saved_groups;
                Ok(None)
            }
        }
    }

    /// Attempt to backtrack.
    /// \return true if we backtracked, false if we exhaust the backtrack stack.
    fn try_backtrack<Dir: Direction>(
        &mut self,
        input: &Input,
        ip: &mut IP,
        pos: &mut Position,
        _dir: Dir,
    ) -> Result<bool, ResourceLimit> {
        let backtracked = self.backtrack_once::<Dir>(input, ip, pos);
        if backtracked {
            self.steps += 1;
            if self.steps > self.budget {
                return Err(ResourceLimit::Steps(self.budget));
            }
        }
        Ok(backtracked)
    }

    fn backtrack_once<Dir: Direction>(
        &mut self,
        input: &Input,
        ip: &mut IP,
        pos: &mut Position,
    ) -> bool {
        loop {
            // We always have a single Exhausted instruction backstopping our stack,
            // so we do not need to check for empty bts.
            let Some(bt) = self.bts.last_mut() else {
                return false;
            };
            match bt {
                BacktrackInsn::Exhausted => return false,

                BacktrackInsn::SetPosition {
                    ip: saved_ip,
                    pos: saved_pos,
                } => {
                    *ip = *saved_ip;
                    *pos = *saved_pos;
                    self.pop_backtrack();
                    return true;
                }
                &mut BacktrackInsn::SetLoopData { id, data } => {
                    self.s.loops[id as usize] = data;
                    self.pop_backtrack();
                }
                &mut BacktrackInsn::SetCaptureGroup { id, data } => {
                    self.s.groups[id as usize] = data;
                    self.pop_backtrack();
                }

                &mut BacktrackInsn::EnterNonGreedyLoop { ip: loop_ip, data } => {
                    // Must pop before we enter the loop.
                    self.pop_backtrack();
                    *ip = loop_ip + 1;
                    *pos = data.entry;
                    let Insn::EnterLoop(loop_fields) = &self.re.insns[loop_ip] else {
                        unreachable!("EnterNonGreedyLoop must point at a loop instruction")
                    };
                    let loop_data = &mut self.s.loops[loop_fields.loop_id as usize];
                    *loop_data = data;
                    MatchAttempter::prepare_to_enter_loop(
                        &mut self.bts,
                        *pos,
                        loop_fields,
                        loop_data,
                    );
                    return true;
                }

                BacktrackInsn::GreedyLoop1Char {
                    continuation,
                    min,
                    max,
                } => {
                    // The match failed at the max location.
                    // If min is equal to max, there is no more backtracking to be done;
                    // otherwise move opposite the direction of the cursor.
                    if *max == *min {
                        // We have backtracked this loop as far as possible.
                        self.bts.pop();
                        continue;
                    }
                    let newmax = if Dir::FORWARD {
                        input.next_left_pos(*max)
                    } else {
                        input.next_right_pos(*max)
                    };
                    let Some(newmax) = newmax else {
                        unreachable!("Should always be able to advance since min != max")
                    };
                    *pos = newmax;
                    *max = newmax;
                    *ip = *continuation;
                    return true;
                }

                BacktrackInsn::NonGreedyLoop1Char {
                    continuation,
                    min,
                    max,
                } => {
                    // The match failed at the min location.
                    if *max == *min {
                        // We have backtracked this loop as far as possible.
                        self.bts.pop();
                        continue;
                    }
                    // Move in the direction of the cursor.
                    let newmin = if Dir::FORWARD {
                        input.next_right_pos(*min)
                    } else {
                        input.next_left_pos(*min)
                    };
                    let Some(newmin) = newmin else {
                        unreachable!("Should always be able to advance since min != max")
                    };
                    *pos = newmin;
                    *min = newmin;
                    *ip = *continuation;
                    return true;
                }
            }
        }
    }

    /// \return whether \p pos is at the start of a line.
    fn at_start_of_line(input: &Input, pos: Position, multiline: bool) -> bool {
        match input.peek_left(pos) {
            None => true,
            // A CRLF pair is a single line break.
            Some('\r') if input.peek_right(pos) == Some('\n') => false,
            Some(c) => multiline && matchers::is_line_terminator(c),
        }
    }

    /// \return whether \p pos is at the end of a line.
    fn at_end_of_line(input: &Input, pos: Position, multiline: bool) -> bool {
        match input.peek_right(pos) {
            None => true,
            Some('\n') if input.peek_left(pos) == Some('\r') => false,
            Some(c) => multiline && matchers::is_line_terminator(c),
        }
    }

    /// Attempt to match at a given IP and position.
    fn try_at_pos<Dir: Direction>(
        &mut self,
        inp: Input,
        mut ip: IP,
        mut pos: Position,
        dir: Dir,
    ) -> Result<Option<Position>, ResourceLimit> {
        debug_assert!(
            self.bts.len() == 1,
            "Should be only initial exhausted backtrack insn"
        );
        let input = &inp;
        let re = self.re;
        // These are not really loops, they are just labels that we effectively 'goto'
        // to.
        #[allow(clippy::never_loop)]
        'nextinsn: loop {
            if self.bts.len() > self.max_depth {
                return Err(ResourceLimit::BacktrackDepth(self.max_depth));
            }
            'backtrack: loop {
                // Helper macro to either increment ip and go to the next insn, or backtrack.
                macro_rules! next_or_bt {
                    ($e:expr) => {
                        if $e {
                            ip += 1;
                            continue 'nextinsn;
                        } else {
                            break 'backtrack;
                        }
                    };
                }

                match &re.insns[ip] {
                    &Insn::Char(c) => {
                        next_or_bt!(scm::Char { c }.matches(input, dir, &mut pos))
                    }

                    &Insn::CharICase(c) => {
                        next_or_bt!(scm::CharICase { c }.matches(input, dir, &mut pos))
                    }

                    &Insn::Bracket(idx) => {
                        next_or_bt!(scm::Bracket {
                            bc: &re.brackets[idx]
                        }
                        .matches(input, dir, &mut pos))
                    }

                    Insn::MatchAny => {
                        next_or_bt!(scm::MatchAny::new().matches(input, dir, &mut pos))
                    }

                    Insn::MatchAnyExceptLineTerminator => {
                        next_or_bt!(
                            scm::MatchAnyExceptLineTerminator::new().matches(input, dir, &mut pos)
                        )
                    }

                    &Insn::WordBoundary { invert } => {
                        let prev_wordchar = input.peek_left(pos).is_some_and(matchers::is_word_char);
                        let curr_wordchar =
                            input.peek_right(pos).is_some_and(matchers::is_word_char);
                        let is_boundary = prev_wordchar != curr_wordchar;
                        next_or_bt!(is_boundary != invert)
                    }

                    &Insn::WordEdge { start } => {
                        let prev_wordchar = input.peek_left(pos).is_some_and(matchers::is_word_char);
                        let curr_wordchar =
                            input.peek_right(pos).is_some_and(matchers::is_word_char);
                        let matches = if start {
                            !prev_wordchar && curr_wordchar
                        } else {
                            prev_wordchar && !curr_wordchar
                        };
                        next_or_bt!(matches)
                    }

                    &Insn::StartOfLine { multiline } => {
                        next_or_bt!(Self::at_start_of_line(input, pos, multiline))
                    }
                    &Insn::EndOfLine { multiline } => {
                        next_or_bt!(Self::at_end_of_line(input, pos, multiline))
                    }
                    Insn::StartOfText => next_or_bt!(pos == 0),
                    Insn::EndOfText => next_or_bt!(pos == input.len()),
                    Insn::EndOfTextOrFinalNewline => {
                        let len = input.len();
                        next_or_bt!(
                            pos == len || (pos + 1 == len && input.peek_right(pos) == Some('\n'))
                        )
                    }

                    &Insn::Jump { target } => {
                        ip = target as IP;
                        continue 'nextinsn;
                    }

                    &Insn::BeginCaptureGroup(cg_idx) => {
                        let cg = &mut self.s.groups[cg_idx as usize];
                        self.bts.push(BacktrackInsn::SetCaptureGroup {
                            id: cg_idx,
                            data: *cg,
                        });
                        if Dir::FORWARD {
                            cg.start = Some(pos);
                            cg.end = None;
                        } else {
                            cg.end = Some(pos);
                            cg.start = None;
                        }
                        next_or_bt!(true)
                    }

                    &Insn::EndCaptureGroup(cg_idx) => {
                        let cg = &mut self.s.groups[cg_idx as usize];
                        if Dir::FORWARD {
                            debug_assert!(
                                cg.start_matched(),
                                "Capture group should have been entered"
                            );
                            cg.end = Some(pos);
                        } else {
                            debug_assert!(
                                cg.end_matched(),
                                "Capture group should have been entered"
                            );
                            cg.start = Some(pos)
                        }
                        next_or_bt!(true)
                    }

                    &Insn::ResetCaptureGroup(cg_idx) => {
                        let cg = &mut self.s.groups[cg_idx as usize];
                        self.bts.push(BacktrackInsn::SetCaptureGroup {
                            id: cg_idx,
                            data: *cg,
                        });
                        cg.reset();
                        next_or_bt!(true)
                    }

                    &Insn::BackRef { group, icase } => {
                        // A backreference to a group that has not matched fails.
                        // Note we may be in the capture group we are examining, e.g. /(abc\1)/.
                        let matched = match self
                            .s
                            .groups
                            .get(group as usize)
                            .and_then(GroupData::as_range)
                        {
                            Some(orig_range) if icase => {
                                matchers::backref_icase(input, dir, orig_range, &mut pos)
                            }
                            Some(orig_range) => matchers::backref(input, dir, orig_range, &mut pos),
                            None => false,
                        };
                        next_or_bt!(matched)
                    }

                    &Insn::Lookahead {
                        negate,
                        start_group,
                        end_group,
                        continuation,
                    } => {
                        if self.run_lookaround::<Forward>(
                            input,
                            ip + 1,
                            pos,
                            start_group,
                            end_group,
                            negate,
                        )? {
                            ip = continuation as IP;
                            continue 'nextinsn;
                        } else {
                            break 'backtrack;
                        }
                    }

                    &Insn::Lookbehind {
                        negate,
                        start_group,
                        end_group,
                        continuation,
                    } => {
                        if self.run_lookaround::<Backward>(
                            input,
                            ip + 1,
                            pos,
                            start_group,
                            end_group,
                            negate,
                        )? {
                            ip = continuation as IP;
                            continue 'nextinsn;
                        } else {
                            break 'backtrack;
                        }
                    }

                    &Insn::Atomic { continuation } => {
                        match self.run_atomic::<Dir>(input, ip + 1, pos)? {
                            Some(end) => {
                                pos = end;
                                ip = continuation as IP;
                                continue 'nextinsn;
                            }
                            None => break 'backtrack,
                        }
                    }

                    &Insn::Alt { secondary } => {
                        self.push_backtrack(BacktrackInsn::SetPosition {
                            ip: secondary as IP,
                            pos,
                        });
                        next_or_bt!(true);
                    }

                    Insn::EnterLoop(fields) => {
                        // Entering a loop, not re-entering it.
                        self.s.loops[fields.loop_id as usize].iters = 0;
                        match self.run_loop(fields, pos, ip) {
                            Some(next_ip) => {
                                ip = next_ip;
                                continue 'nextinsn;
                            }
                            None => {
                                break 'backtrack;
                            }
                        }
                    }

                    &Insn::LoopAgain { begin } => {
                        let Insn::EnterLoop(fields) = &re.insns[begin as IP] else {
                            unreachable!("LoopAgain should always refer to a loop")
                        };
                        match self.run_loop(fields, pos, begin as IP) {
                            Some(next_ip) => {
                                ip = next_ip;
                                continue 'nextinsn;
                            }
                            None => break 'backtrack,
                        }
                    }

                    &Insn::Loop1CharBody {
                        min_iters,
                        max_iters,
                        greedy,
                    } => {
                        if let Some(next_ip) = self
                            .run_scm_loop(input, dir, &mut pos, min_iters, max_iters, ip, greedy)
                        {
                            ip = next_ip;
                            continue 'nextinsn;
                        } else {
                            break 'backtrack;
                        }
                    }

                    Insn::Goal => {
                        // Leftmost-longest: remember this end and keep looking
                        // for a longer one, unless nothing could be longer.
                        if re.longest && self.depth == 0 && pos != input.len() {
                            let longer = match &self.best {
                                Some((end, _)) => pos > *end,
                                None => true,
                            };
                            if longer {
                                self.best = Some((pos, self.s.groups.clone()));
                            }
                            break 'backtrack;
                        }
                        // Keep all but the initial give-up bts.
                        self.bts.truncate(1);
                        return Ok(Some(pos));
                    }

                    Insn::JustFail => {
                        break 'backtrack;
                    }
                }
            }

            // This after the backtrack loop.
            // A break 'backtrack will jump here.
            if self.try_backtrack(input, &mut ip, &mut pos, dir)? {
                continue 'nextinsn;
            }

            // We have exhausted the backtracking stack.
            debug_assert!(self.bts.len() == 1, "Should have exhausted backtrack stack");
            if self.depth == 0 {
                if let Some((end, groups)) = self.best.take() {
                    self.s.groups = groups;
                    return Ok(Some(end));
                }
            }
            return Ok(None);
        }
    }
}

#[derive(Debug)]
pub(crate) struct BacktrackExecutor<'r, 't> {
    input: Input<'t>,
    matcher: MatchAttempter<'r>,
}

impl<'r, 't> BacktrackExecutor<'r, 't> {
    pub(crate) fn new(re: &'r CompiledRegex, text: &'t str, limits: &Limits) -> Self {
        let input = Input::new(text);
        Self {
            input,
            matcher: MatchAttempter::new(re, &input, limits),
        }
    }

    /// \return the capture groups of the last successful match, clearing them.
    fn take_captures(&mut self) -> Vec<Option<Range<usize>>> {
        let mut captures = Vec::with_capacity(self.matcher.s.groups.len());
        for gd in self.matcher.s.groups.iter_mut() {
            captures.push(gd.as_range());
            gd.reset();
        }
        captures
    }

    /// \return the range of the leftmost match at or after \p pos.
    /// The capture groups of the match are left in the matcher state.
    pub(crate) fn next_match(
        &mut self,
        mut pos: Position,
    ) -> Result<Option<Range<Position>>, ResourceLimit> {
        let inp = self.input;
        let re = self.matcher.re;
        loop {
            // Find the next start location, or None if none.
            let found = match &re.start_pred {
                StartPredicate::Arbitrary => Some(pos),
                StartPredicate::ByteSet1(bytes) => inp.find_byte_set(pos, bytes),
                StartPredicate::ByteSet2(bytes) => inp.find_byte_set(pos, bytes),
                StartPredicate::ByteSet3(bytes) => inp.find_byte_set(pos, bytes),
                StartPredicate::ByteSeq(finder) => inp.find_seq(pos, finder),
                StartPredicate::StartAnchored if pos == 0 => Some(pos),
                StartPredicate::StartAnchored => None,
            };
            let Some(start) = found else {
                return Ok(None);
            };
            pos = start;
            if let Some(end) = self.matcher.try_at_pos(inp, 0, pos, Forward::new())? {
                return Ok(Some(pos..end));
            }
            if matches!(re.start_pred, StartPredicate::StartAnchored) {
                return Ok(None);
            }
            // Didn't find it at this position, try the next one.
            match inp.next_right_pos(pos) {
                Some(next) => pos = next,
                None => return Ok(None),
            }
        }
    }
}

/// Search \p text for \p re starting at byte offset \p start, which must be
/// a char boundary. On a match, load \p regs and return true. On no match,
/// return false and leave \p regs alone.
pub(crate) fn search(
    re: &CompiledRegex,
    text: &str,
    start: usize,
    limits: &Limits,
    regs: &mut Registers,
) -> Result<bool, ResourceLimit> {
    let mut executor = BacktrackExecutor::new(re, text, limits);
    match executor.next_match(start)? {
        Some(range) => {
            let captures = executor.take_captures();
            regs.load(range, captures.into_iter());
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit;
    use crate::flags::Flags;
    use crate::optimizer;
    use crate::parse;

    fn compile(pattern: &str, flags: Flags) -> CompiledRegex {
        let mut ir = match parse::try_parse(pattern, flags) {
            Ok(ir) => ir,
            Err(err) => panic!("{}", err),
        };
        optimizer::optimize(&mut ir);
        emit::emit(&ir)
    }

    fn find(pattern: &str, flags: Flags, text: &str) -> Option<Vec<Option<Range<usize>>>> {
        let re = compile(pattern, flags);
        let mut regs = Registers::new();
        match search(&re, text, 0, &Limits::default(), &mut regs) {
            Ok(true) => Some(regs.iter().collect()),
            Ok(false) => None,
            Err(err) => panic!("{}", err),
        }
    }

    #[test]
    fn finds_leftmost() {
        assert_eq!(
            find("a(b)c", Flags::NORMAL, "xxabcxx"),
            Some(vec![Some(2..5), Some(3..4)])
        );
        assert_eq!(find("z", Flags::NORMAL, "abc"), None);
    }

    #[test]
    fn perl_takes_first_alternative_posix_takes_longest() {
        assert_eq!(find("a|ab", Flags::NORMAL, "abc"), Some(vec![Some(0..1)]));
        assert_eq!(find("a|ab", Flags::EXTENDED, "abc"), Some(vec![Some(0..2)]));
    }

    #[test]
    fn atomic_groups_do_not_backtrack() {
        assert_eq!(find("(?>a+)ab", Flags::NORMAL, "aaab"), None);
        assert_eq!(find("a++b", Flags::NORMAL, "aaab"), Some(vec![Some(0..4)]));
        assert_eq!(find("a++ab", Flags::NORMAL, "aaab"), None);
    }

    #[test]
    fn backref_to_unmatched_group_fails() {
        assert_eq!(find("(a)?\\1b", Flags::NORMAL, "b"), None);
        assert_eq!(
            find("(a)?\\1b", Flags::NORMAL, "aab"),
            Some(vec![Some(0..3), Some(0..1)])
        );
    }

    #[test]
    fn catastrophic_patterns_exhaust_the_budget() {
        let re = compile("(a*)*b", Flags::NORMAL);
        let text = "a".repeat(40);
        let limits = Limits {
            min_steps: 1_000,
            max_steps: 10_000,
            max_backtrack_depth: 1 << 20,
        };
        let mut regs = Registers::new();
        let res = search(&re, &text, 0, &limits, &mut regs);
        assert!(matches!(res, Err(ResourceLimit::Steps(..))), "{:?}", res);
        assert!(!regs.is_valid());
    }

    #[test]
    fn crlf_is_one_line_break() {
        assert_eq!(find("^b", Flags::NORMAL, "a\r\nb"), Some(vec![Some(3..4)]));
        assert_eq!(find("a$", Flags::NORMAL, "a\r\nb"), Some(vec![Some(0..1)]));
        assert_eq!(find("\\r$", Flags::NORMAL, "a\r\nb"), None);
    }
}
