//! Per-execution-context state: the register store, the current subject,
//! and the shared "last match" record.

use crate::api::Regex;
use crate::error::Error;
use crate::host::HostValue;
use crate::limits::Limits;
use crate::registers::Registers;
use core::cell::Cell;
use core::ops::Range;
use log::trace;
use std::rc::Rc;

/// Safe levels at or above this taint the match records they produce.
const TAINT_SAFE_LEVEL: u8 = 3;

/// The record of a successful match: a copy of the subject, the capture
/// registers, and the regex that produced it.
#[derive(Debug)]
pub struct MatchData {
    subject: String,
    regs: Registers,
    regex: Regex,
    tainted: bool,
    busy: Cell<bool>,
}

impl MatchData {
    fn new(regex: &Regex, subject: &str, regs: &Registers, tainted: bool) -> Self {
        let mut copy = Registers::with_capacity(regs.num_regs());
        copy.copy_from(regs);
        MatchData {
            subject: subject.to_string(),
            regs: copy,
            regex: regex.clone(),
            tainted,
            busy: Cell::new(false),
        }
    }

    /// Overwrite this record in place, keeping its allocations.
    fn refill(&mut self, regex: &Regex, subject: &str, regs: &Registers, tainted: bool) {
        self.subject.clear();
        self.subject.push_str(subject);
        self.regs.copy_from(regs);
        self.regex = regex.clone();
        self.tainted = tainted;
    }

    /// \return the copy of the searched subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// \return the regex which produced this match.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    /// \return the number of entries, counting the overall match.
    pub fn len(&self) -> usize {
        self.regs.num_regs()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// \return the byte range of group \p idx, where 0 is the overall match.
    pub fn span(&self, idx: usize) -> Option<Range<usize>> {
        self.regs.get(idx)
    }

    pub fn begin(&self, idx: usize) -> Option<usize> {
        self.span(idx).map(|r| r.start)
    }

    pub fn end(&self, idx: usize) -> Option<usize> {
        self.span(idx).map(|r| r.end)
    }

    /// \return the text of group \p idx, or None if it did not participate.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.span(idx).map(|r| &self.subject[r])
    }

    /// \return the text of the first group named \p name.
    pub fn named(&self, name: &str) -> Option<&str> {
        self.get(self.regex.group_index(name)?)
    }

    /// \return the text before the match.
    pub fn pre_match(&self) -> &str {
        match self.begin(0) {
            Some(begin) => &self.subject[..begin],
            None => "",
        }
    }

    /// \return the text after the match.
    pub fn post_match(&self) -> &str {
        match self.end(0) {
            Some(end) => &self.subject[end..],
            None => "",
        }
    }

    /// \return the text of every group, in order.
    pub fn to_vec(&self) -> Vec<Option<&str>> {
        (0..self.len()).map(|idx| self.get(idx)).collect()
    }

    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    /// Mark this record as engaged elsewhere, so it is never reused in place.
    pub fn mark_busy(&self) {
        self.busy.set(true)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }
}

/// One execution context of the host.
///
/// Each context owns its register store and its last-match slot; contexts
/// are not shared.
#[derive(Debug, Default)]
pub struct Context {
    last_match: Option<Rc<MatchData>>,
    current_subject: HostValue,
    registers: Registers,
    limits: Limits,
    safe_level: u8,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Context {
            limits,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn safe_level(&self) -> u8 {
        self.safe_level
    }

    pub fn set_safe_level(&mut self, level: u8) {
        self.safe_level = level
    }

    /// \return the subject used by implicit matches.
    pub fn current_subject(&self) -> &HostValue {
        &self.current_subject
    }

    pub fn set_current_subject(&mut self, subject: impl Into<HostValue>) {
        self.current_subject = subject.into()
    }

    /// \return the registers of the last search.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// \return the last-match record, if the last search matched.
    pub fn last_match(&self) -> Option<&Rc<MatchData>> {
        self.last_match.as_ref()
    }

    /// Search \p subject for \p re, returning the offset of the match.
    ///
    /// On a match the last-match record is written; on no match it is
    /// cleared. A nil subject never matches. On error, neither the registers
    /// nor the last-match record change.
    pub fn search(&mut self, re: &Regex, subject: &HostValue) -> Result<Option<usize>, Error> {
        if subject.is_nil() {
            self.registers.clear();
            self.last_match = None;
            return Ok(None);
        }
        let text = subject.to_str()?;
        if !re.search_with_limits(text, 0, &self.limits, &mut self.registers)? {
            self.last_match = None;
            return Ok(None);
        }
        self.record_match(re, text);
        Ok(self.registers.get(0).map(|r| r.start))
    }

    /// Like search, but only reports whether there was a match.
    pub fn case_eq(&mut self, re: &Regex, subject: &HostValue) -> Result<bool, Error> {
        Ok(self.search(re, subject)?.is_some())
    }

    /// Like search, but returns the last-match record.
    pub fn match_data(
        &mut self,
        re: &Regex,
        subject: &HostValue,
    ) -> Result<Option<Rc<MatchData>>, Error> {
        self.search(re, subject)?;
        Ok(self.last_match.clone())
    }

    /// Search the current subject.
    pub fn implicit_search(&mut self, re: &Regex) -> Result<Option<usize>, Error> {
        let subject = self.current_subject.clone();
        self.search(re, &subject)
    }

    /// Search the current subject, returning the last-match record.
    pub fn implicit_match(&mut self, re: &Regex) -> Result<Option<Rc<MatchData>>, Error> {
        let subject = self.current_subject.clone();
        self.match_data(re, &subject)
    }

    /// Write the registers into the last-match record, reusing it unless
    /// it is absent, busy, or referenced elsewhere.
    fn record_match(&mut self, re: &Regex, subject: &str) {
        let tainted = self.safe_level >= TAINT_SAFE_LEVEL;
        if let Some(last) = self.last_match.as_mut() {
            if !last.is_busy() {
                if let Some(md) = Rc::get_mut(last) {
                    trace!("reusing last-match record");
                    md.refill(re, subject, &self.registers, tainted);
                    return;
                }
            }
        }
        trace!("allocating last-match record");
        self.last_match = Some(Rc::new(MatchData::new(
            re,
            subject,
            &self.registers,
            tainted,
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_reused_only_when_unobserved() {
        let re = Regex::new("b").unwrap();
        let mut cx = Context::new();
        assert_eq!(cx.search(&re, &"abc".into()).unwrap(), Some(1));
        let first = cx.last_match().map(Rc::as_ptr);

        // Nobody else holds the record, so it is reused.
        assert_eq!(cx.search(&re, &"bb".into()).unwrap(), Some(0));
        assert_eq!(cx.last_match().map(Rc::as_ptr), first);

        // A held record is left alone.
        let held = cx.match_data(&re, &"xb".into()).unwrap().unwrap();
        assert_eq!(cx.search(&re, &"xxb".into()).unwrap(), Some(2));
        assert_ne!(cx.last_match().map(Rc::as_ptr), Some(Rc::as_ptr(&held)));
        assert_eq!(held.pre_match(), "x");
    }

    #[test]
    fn busy_records_are_not_reused() {
        let re = Regex::new("b").unwrap();
        let mut cx = Context::new();
        cx.search(&re, &"b".into()).unwrap();
        let first = cx.last_match().map(Rc::as_ptr);
        if let Some(md) = cx.last_match() {
            md.mark_busy();
        }
        cx.search(&re, &"ab".into()).unwrap();
        assert_ne!(cx.last_match().map(Rc::as_ptr), first);
        assert!(!cx.last_match().unwrap().is_busy());
    }

    #[test]
    fn taint_follows_safe_level() {
        let re = Regex::new("a").unwrap();
        let mut cx = Context::new();
        cx.set_safe_level(3);
        cx.search(&re, &"a".into()).unwrap();
        assert!(cx.last_match().unwrap().is_tainted());
        cx.set_safe_level(0);
        cx.search(&re, &"a".into()).unwrap();
        assert!(!cx.last_match().unwrap().is_tainted());
    }
}
