use core::cmp;

pub type CodePoint = u32;

/// The maximum (inclusive) code point.
pub const CODE_POINT_MAX: CodePoint = 0x10FFFF;

/// An inclusive range of code points.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Interval {
    pub(crate) first: CodePoint,
    pub(crate) last: CodePoint,
}

impl Interval {
    pub(crate) const fn new(first: CodePoint, last: CodePoint) -> Interval {
        Interval { first, last }
    }

    /// Return whether self contains a code point \p cp.
    #[inline]
    pub fn contains(self, cp: CodePoint) -> bool {
        self.first <= cp && cp <= self.last
    }

    /// Return the number of contained code points.
    pub fn count_codepoints(self) -> usize {
        (self.last - self.first + 1) as usize
    }
}

/// A set of code points stored as sorted intervals which neither overlap
/// nor abut.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodePointSet {
    ivs: Vec<Interval>,
}

impl CodePointSet {
    pub fn new() -> CodePointSet {
        CodePointSet { ivs: Vec::new() }
    }

    /// Construct from intervals in any order, which may overlap.
    pub fn from_intervals(ivs: &[Interval]) -> CodePointSet {
        let mut set = CodePointSet::new();
        for &iv in ivs {
            set.add(iv);
        }
        set
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ivs.is_empty()
    }

    pub(crate) fn contains(&self, cp: CodePoint) -> bool {
        self.ivs
            .binary_search_by(|iv| {
                if iv.last < cp {
                    cmp::Ordering::Less
                } else if iv.first > cp {
                    cmp::Ordering::Greater
                } else {
                    cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// \return the intervals
    pub fn intervals(&self) -> &[Interval] {
        &self.ivs
    }

    /// \return the number of contained code points.
    pub fn count_codepoints(&self) -> usize {
        self.ivs.iter().map(|iv| iv.count_codepoints()).sum()
    }

    /// Add an interval of code points to the set.
    pub fn add(&mut self, iv: Interval) {
        debug_assert!(iv.first <= iv.last && iv.last <= CODE_POINT_MAX);
        // Intervals in lo..hi overlap or abut the new one and get merged into it.
        let lo = self
            .ivs
            .partition_point(|x| x.last.saturating_add(1) < iv.first);
        let hi = self
            .ivs
            .partition_point(|x| x.first <= iv.last.saturating_add(1));
        if lo == hi {
            self.ivs.insert(lo, iv);
        } else {
            let merged = Interval {
                first: cmp::min(iv.first, self.ivs[lo].first),
                last: cmp::max(iv.last, self.ivs[hi - 1].last),
            };
            self.ivs.splice(lo..hi, core::iter::once(merged));
        }
    }

    /// Add a single code point to the set.
    #[inline]
    pub fn add_one(&mut self, cp: CodePoint) {
        self.add(Interval::new(cp, cp))
    }

    /// Add every code point of another set.
    pub fn add_set(&mut self, rhs: &CodePointSet) {
        for &iv in rhs.intervals() {
            self.add(iv)
        }
    }

    /// \return a set containing every code point NOT in the receiver.
    pub fn inverted(&self) -> CodePointSet {
        let mut ivs = Vec::with_capacity(self.ivs.len() + 1);
        let mut start: CodePoint = 0;
        for iv in &self.ivs {
            if start < iv.first {
                ivs.push(Interval::new(start, iv.first - 1));
            }
            start = iv.last + 1;
        }
        if start <= CODE_POINT_MAX {
            ivs.push(Interval::new(start, CODE_POINT_MAX));
        }
        CodePointSet { ivs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(first: u32, last: u32) -> Interval {
        Interval { first, last }
    }

    #[test]
    fn test_add_merges() {
        let mut set = CodePointSet::new();
        set.add(iv(10, 20));
        set.add(iv(30, 40));
        set.add(iv(15, 35));
        assert_eq!(set.intervals(), &[iv(10, 40)]);
    }

    #[test]
    fn test_add_one() {
        let mut set = CodePointSet::new();
        set.add_one(10);
        set.add_one(20);
        set.add_one(15);
        assert_eq!(set.intervals(), &[iv(10, 10), iv(15, 15), iv(20, 20)]);
        set.add_one(11);
        assert_eq!(set.intervals(), &[iv(10, 11), iv(15, 15), iv(20, 20)]);
    }

    #[test]
    fn test_contains() {
        let set = CodePointSet::from_intervals(&[iv(50, 60), iv(0, 9)]);
        assert!(set.contains(0));
        assert!(set.contains(9));
        assert!(!set.contains(10));
        assert!(set.contains(55));
        assert!(!set.contains(61));
        assert_eq!(set.count_codepoints(), 21);
    }

    #[test]
    fn test_inverted() {
        let set = CodePointSet::from_intervals(&[iv(10, 20), iv(30, 40)]);
        let inverted = set.inverted();
        assert_eq!(
            inverted.intervals(),
            &[iv(0, 9), iv(21, 29), iv(41, CODE_POINT_MAX)]
        );
        assert_eq!(inverted.inverted(), set);
        assert!(CodePointSet::new().inverted().contains(CODE_POINT_MAX));
    }

    #[test]
    fn test_adds_torture() {
        let mut set = CodePointSet::new();
        set.add(iv(1, 3));
        set.add(iv(0, 0));
        assert_eq!(set.intervals(), &[iv(0, 3)]);
        set.add(iv(3, 5));
        set.add(iv(6, 10));
        assert_eq!(set.intervals(), &[iv(0, 10)]);
        set.add(iv(15, 15));
        set.add(iv(12, 14));
        assert_eq!(set.intervals(), &[iv(0, 10), iv(12, 15)]);
        set.add(iv(100, 200));
        set.add(iv(16, 99));
        assert_eq!(set.intervals(), &[iv(0, 10), iv(12, 200)]);
        set.add(iv(0, CODE_POINT_MAX));
        assert_eq!(set.intervals(), &[iv(0, CODE_POINT_MAX)]);
    }
}
