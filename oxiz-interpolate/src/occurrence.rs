//! Per-group visibility of terms and symbols.
//!
//! For group `i`, the A-side is the subtree rooted at `i` and the B-side is
//! everything else. An [`Occurrence`] records, for every group, whether a
//! term is visible on the A-side, on the B-side, or is mixed (an equality or
//! bound that relates an A-local term to a B-local one).

use crate::partition::{Color, PartitionTree};
use std::fmt;

const WORD_BITS: usize = 64;

/// Fixed-width bit set over the groups `0..=N`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GroupSet {
    words: Vec<u64>,
    len: usize,
}

impl GroupSet {
    /// Empty set of the given width.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS).max(1)],
            len,
        }
    }

    /// Set with the bits `0..upto` set.
    #[must_use]
    pub fn with_prefix(len: usize, upto: usize) -> Self {
        let mut set = Self::new(len);
        for i in 0..upto.min(len) {
            set.insert(i);
        }
        set
    }

    /// Width of the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no bit is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Test a bit.
    #[must_use]
    pub fn contains(&self, i: usize) -> bool {
        i < self.len && self.words[i / WORD_BITS] & (1 << (i % WORD_BITS)) != 0
    }

    /// Set a bit.
    pub fn insert(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
    }

    /// Clear a bit.
    pub fn remove(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / WORD_BITS] &= !(1 << (i % WORD_BITS));
    }

    /// Set every bit in `from..to`.
    pub fn insert_range(&mut self, from: usize, to: usize) {
        for i in from..to.min(self.len) {
            self.insert(i);
        }
    }

    /// In-place intersection.
    pub fn intersect_with(&mut self, other: &GroupSet) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w &= o;
        }
    }

    /// In-place union.
    pub fn union_with(&mut self, other: &GroupSet) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= o;
        }
    }

    /// Lowest clear bit, if any below the width.
    #[must_use]
    pub fn first_clear(&self) -> Option<usize> {
        (0..self.len).find(|&i| !self.contains(i))
    }

    /// Set bits in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.contains(i))
    }
}

impl fmt::Debug for GroupSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Visibility of one term or symbol across all groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occurrence {
    in_a: GroupSet,
    in_b: GroupSet,
    mixed: GroupSet,
}

impl Occurrence {
    /// Occurrence of something only the root group has seen: A-side of the
    /// root only.
    #[must_use]
    pub fn new(num_interpolants: usize) -> Self {
        let width = num_interpolants + 1;
        let mut in_a = GroupSet::new(width);
        in_a.insert(num_interpolants);
        Self {
            in_a,
            in_b: GroupSet::new(width),
            mixed: GroupSet::new(width),
        }
    }

    /// Occurrence of something visible everywhere: shared by every group.
    #[must_use]
    pub fn full(num_interpolants: usize) -> Self {
        let width = num_interpolants + 1;
        Self {
            in_a: GroupSet::with_prefix(width, width),
            in_b: GroupSet::with_prefix(width, num_interpolants),
            mixed: GroupSet::new(width),
        }
    }

    /// Number of interpolants `N`.
    #[must_use]
    pub fn num_interpolants(&self) -> usize {
        self.in_a.len() - 1
    }

    /// Record that the term is visible to `color`.
    pub fn occurs_in(&mut self, color: Color, tree: &PartitionTree) {
        let n = self.num_interpolants();
        match color {
            Color::Everywhere => {
                self.in_a.insert_range(0, n + 1);
                self.in_b.insert_range(0, n);
            }
            Color::Group(p) => {
                for i in 0..=n {
                    if i < p || tree.start_of_subtree(i) > p {
                        self.in_b.insert(i);
                    } else {
                        self.in_a.insert(i);
                    }
                }
            }
        }
    }

    /// Whether the term was already recorded as visible to `color`.
    #[must_use]
    pub fn contains(&self, color: Color, tree: &PartitionTree) -> bool {
        let n = self.num_interpolants();
        match color {
            Color::Everywhere => (0..n).all(|i| self.in_a.contains(i) && self.in_b.contains(i)),
            Color::Group(p) => {
                if !self.in_a.contains(p) {
                    return false;
                }
                if self.in_b.contains(p) {
                    return true;
                }
                let mut child = p.checked_sub(1);
                while let Some(c) = child.filter(|&c| c >= tree.start_of_subtree(p)) {
                    if !self.in_b.contains(c) {
                        return false;
                    }
                    child = tree.start_of_subtree(c).checked_sub(1);
                }
                true
            }
        }
    }

    /// Whether some direct child of `p` sees the term on its A-side. The
    /// child may see it on its B-side as well.
    #[must_use]
    pub fn is_a_local_in_some_child(&self, p: usize, tree: &PartitionTree) -> bool {
        tree.children(p).any(|c| self.in_a.contains(c))
    }

    /// A group the term can be attributed to: the lowest group with the
    /// term on its A-side, or, if that group also has it on its B-side, the
    /// next group above it without a B-side occurrence.
    #[must_use]
    pub fn a_local_color(&self) -> Option<usize> {
        let first = self.in_a.iter().next()?;
        if !self.in_b.contains(first) {
            return Some(first);
        }
        (first..self.in_b.len()).find(|&i| !self.in_b.contains(i))
    }

    /// Term visible only on the A-side of group `p`.
    #[must_use]
    pub fn is_a_local(&self, p: usize) -> bool {
        self.in_a.contains(p) && !self.in_b.contains(p)
    }

    /// Term visible only on the B-side of group `p`.
    #[must_use]
    pub fn is_b_local(&self, p: usize) -> bool {
        self.in_b.contains(p) && !self.in_a.contains(p)
    }

    /// Term visible on both sides of group `p`.
    #[must_use]
    pub fn is_ab(&self, p: usize) -> bool {
        self.in_a.contains(p) && self.in_b.contains(p)
    }

    /// Term on neither side of `p`: it mixes A-local and B-local parts.
    #[must_use]
    pub fn is_mixed(&self, p: usize) -> bool {
        !self.in_a.contains(p) && !self.in_b.contains(p)
    }

    /// Whether some proper sub-term is mixed at `p`.
    #[must_use]
    pub fn contains_mixed_term(&self, p: usize) -> bool {
        self.mixed.contains(p)
    }

    /// Intersection of A and B sides; mixed flags accumulate.
    #[must_use]
    pub fn intersect(&self, other: &Occurrence) -> Occurrence {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    pub(crate) fn intersect_with(&mut self, other: &Occurrence) {
        self.in_a.intersect_with(&other.in_a);
        self.in_b.intersect_with(&other.in_b);
        self.mixed.union_with(&other.mixed);
    }

    /// Make `p` look like `other` at `p` and flag a mixed sub-term there.
    pub(crate) fn recolor_mixed(&mut self, p: usize, other: &Occurrence) {
        if other.in_a.contains(p) {
            self.in_a.insert(p);
        }
        if other.in_b.contains(p) {
            self.in_b.insert(p);
        }
        self.mixed.insert(p);
    }

    pub(crate) fn in_a(&self) -> &GroupSet {
        &self.in_a
    }

    pub(crate) fn in_b(&self) -> &GroupSet {
        &self.in_b
    }

    pub(crate) fn from_parts(in_a: GroupSet, in_b: GroupSet, mixed: GroupSet) -> Self {
        Self { in_a, in_b, mixed }
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..=self.num_interpolants() {
            let c = match (self.in_a.contains(i), self.in_b.contains(i)) {
                (true, true) => 'S',
                (true, false) => 'A',
                (false, true) => 'B',
                (false, false) => 'M',
            };
            write!(f, "{c}")?;
        }
        write!(f, "]")
    }
}
