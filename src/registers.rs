//! Capture registers: the reusable store a search writes its result into.

use core::ops::Range;

/// Offset stored for a group that did not participate in the match.
pub const UNSET: isize = -1;

/// A (begin, end) pair of byte offsets into the searched input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub begin: isize,
    pub end: isize,
}

impl Span {
    /// The span of a group that did not match.
    pub const UNSET: Span = Span {
        begin: UNSET,
        end: UNSET,
    };

    /// \return whether this span holds a match.
    #[inline]
    pub fn is_set(self) -> bool {
        self.begin >= 0 && self.end >= 0
    }

    /// \return the span as a byte range, or None if unset.
    #[inline]
    pub fn range(self) -> Option<Range<usize>> {
        if self.is_set() {
            Some(self.begin as usize..self.end as usize)
        } else {
            None
        }
    }
}

impl From<Option<Range<usize>>> for Span {
    fn from(r: Option<Range<usize>>) -> Self {
        match r {
            Some(r) => Span {
                begin: r.start as isize,
                end: r.end as isize,
            },
            None => Span::UNSET,
        }
    }
}

/// A grow-only buffer of capture spans.
///
/// After a successful search, slot 0 holds the overall match and slot `i`
/// holds capture group `i`; exactly `num_regs()` slots are valid. After an
/// unsuccessful search the store is invalidated (`num_regs() == 0`) but its
/// allocation is kept for the next search. Storage never shrinks.
#[derive(Debug, Clone, Default)]
pub struct Registers {
    slots: Vec<Span>,
    num_regs: usize,
}

impl Registers {
    /// An empty store with nothing allocated.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store with room for \p n slots.
    pub fn with_capacity(n: usize) -> Self {
        let mut regs = Self::new();
        regs.reserve_regs(n);
        regs
    }

    /// Number of allocated slots. Never decreases.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of valid slots: one plus the group count of the last
    /// successful match, or zero if the store is invalid.
    #[inline]
    pub fn num_regs(&self) -> usize {
        self.num_regs
    }

    /// \return whether the store holds a match.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.num_regs > 0
    }

    /// Invalidate the store without releasing its storage.
    #[inline]
    pub fn clear(&mut self) {
        self.num_regs = 0;
    }

    /// \return the span at \p idx, or `Span::UNSET` past `num_regs()`.
    #[inline]
    pub fn span(&self, idx: usize) -> Span {
        if idx < self.num_regs {
            self.slots[idx]
        } else {
            Span::UNSET
        }
    }

    /// \return the begin offset at \p idx, or `UNSET`.
    #[inline]
    pub fn begin(&self, idx: usize) -> isize {
        self.span(idx).begin
    }

    /// \return the end offset at \p idx, or `UNSET`.
    #[inline]
    pub fn end(&self, idx: usize) -> isize {
        self.span(idx).end
    }

    /// \return the byte range at \p idx, or None if it is unset or invalid.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<Range<usize>> {
        self.span(idx).range()
    }

    /// The valid spans.
    #[inline]
    pub fn spans(&self) -> &[Span] {
        &self.slots[..self.num_regs]
    }

    /// Iterate over the valid slots as optional byte ranges.
    pub fn iter(&self) -> impl Iterator<Item = Option<Range<usize>>> + '_ {
        self.spans().iter().map(|s| s.range())
    }

    /// Grow to at least \p n slots. New slots are unset; existing slots
    /// are preserved.
    pub(crate) fn reserve_regs(&mut self, n: usize) {
        if n > self.slots.len() {
            self.slots.resize(n, Span::UNSET);
        }
    }

    /// Write a successful match: the overall range followed by one entry per
    /// capture group.
    pub(crate) fn load<I>(&mut self, overall: Range<usize>, groups: I)
    where
        I: ExactSizeIterator<Item = Option<Range<usize>>>,
    {
        let n = 1 + groups.len();
        self.reserve_regs(n);
        self.slots[0] = Span::from(Some(overall));
        for (slot, group) in self.slots[1..n].iter_mut().zip(groups) {
            *slot = Span::from(group);
        }
        self.num_regs = n;
    }

    /// Make self a copy of \p other, growing if needed and keeping any
    /// larger allocation.
    pub fn copy_from(&mut self, other: &Registers) {
        let n = other.num_regs;
        self.reserve_regs(n);
        self.slots[..n].copy_from_slice(&other.slots[..n]);
        self.num_regs = n;
    }
}

impl PartialEq for Registers {
    /// Two stores are equal if their valid slots are equal; spare capacity
    /// is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.spans() == other.spans()
    }
}

impl Eq for Registers {}
