//! Partition tree over interpolation groups.
//!
//! The tree has `N + 1` nodes numbered in post-order: the interpolation
//! groups `0..N` and the root group `N`. It is stored as a bracket array:
//! `start_of_subtree[i]` is the lowest index in the subtree rooted at `i`,
//! so that subtree is exactly the range `start_of_subtree[i]..=i`.

use oxiz_core::error::{OxizError, Result};
use rustc_hash::FxHashMap;

/// Where an assertion or literal is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Visible to every group (unnamed assertions)
    Everywhere,
    /// Owned by one group
    Group(usize),
}

/// Static tree over `N` interpolation groups plus the root group.
#[derive(Debug, Clone)]
pub struct PartitionTree {
    start_of_subtree: Vec<usize>,
    groups: FxHashMap<String, usize>,
}

impl PartitionTree {
    /// Build a tree from the assertion names of every group and the bracket
    /// array.
    ///
    /// `groups` has one entry per node in post-order; the last entry holds
    /// the names of the root group and may be omitted. The bracket array
    /// must describe a valid post-order tree: every subtree range nests in
    /// or is disjoint from every other, and the root spans everything.
    pub fn new(groups: Vec<Vec<String>>, start_of_subtree: Vec<usize>) -> Result<Self> {
        let Some(root) = start_of_subtree.len().checked_sub(1) else {
            return Err(OxizError::invalid_partition("empty bracket array"));
        };
        if groups.len() != root && groups.len() != root + 1 {
            return Err(OxizError::invalid_partition(format!(
                "{} name sets for {} tree nodes",
                groups.len(),
                root + 1
            )));
        }
        if start_of_subtree[root] != 0 {
            return Err(OxizError::invalid_partition(
                "root subtree must start at 0",
            ));
        }
        for (i, &start) in start_of_subtree.iter().enumerate() {
            if start > i {
                return Err(OxizError::invalid_partition(format!(
                    "subtree of {i} starts after it at {start}"
                )));
            }
            // Every node inside the range of i must have its own range inside it.
            if let Some(j) = (start..i).find(|&j| start_of_subtree[j] < start) {
                return Err(OxizError::invalid_partition(format!(
                    "subtrees of {j} and {i} overlap"
                )));
            }
        }

        let mut names = FxHashMap::default();
        for (group, members) in groups.into_iter().enumerate() {
            for name in members {
                if let Some(previous) = names.insert(name.clone(), group) {
                    return Err(OxizError::invalid_partition(format!(
                        "assertion {name} belongs to groups {previous} and {group}"
                    )));
                }
            }
        }

        Ok(Self {
            start_of_subtree,
            groups: names,
        })
    }

    /// Sequence interpolation: each group is the child of the next one and
    /// the last group is the root.
    pub fn sequence(groups: Vec<Vec<String>>) -> Result<Self> {
        let len = groups.len();
        Self::new(groups, vec![0; len])
    }

    /// Classical binary interpolation between `a` and `b`.
    pub fn binary(a: Vec<String>, b: Vec<String>) -> Result<Self> {
        Self::sequence(vec![a, b])
    }

    /// Number of interpolants, `N`.
    #[must_use]
    pub fn num_interpolants(&self) -> usize {
        self.start_of_subtree.len() - 1
    }

    /// The root group `N`.
    #[must_use]
    pub fn root(&self) -> usize {
        self.num_interpolants()
    }

    /// Group owning an assertion name.
    #[must_use]
    pub fn group_of(&self, name: &str) -> Option<usize> {
        self.groups.get(name).copied()
    }

    /// Coloring for an assertion: its group, or [`Color::Everywhere`] for
    /// unnamed assertions and names no group claims.
    #[must_use]
    pub fn color_of(&self, source: Option<&str>) -> Color {
        source
            .and_then(|name| self.group_of(name))
            .map_or(Color::Everywhere, Color::Group)
    }

    /// Group an input clause is attributed to when interpolating it: its
    /// owner, or the root for unnamed and unknown sources.
    #[must_use]
    pub fn leaf_group(&self, source: Option<&str>) -> usize {
        source
            .and_then(|name| self.group_of(name))
            .unwrap_or_else(|| self.root())
    }

    /// Lowest index in the subtree rooted at `i`.
    #[must_use]
    pub fn start_of_subtree(&self, i: usize) -> usize {
        self.start_of_subtree[i]
    }

    /// Whether `p` lies in the subtree rooted at `i`.
    #[must_use]
    pub fn in_subtree(&self, i: usize, p: usize) -> bool {
        self.start_of_subtree[i] <= p && p <= i
    }

    /// Direct children of `i`, from the highest index down.
    pub fn children(&self, i: usize) -> Children<'_> {
        Children {
            start: &self.start_of_subtree,
            lower: self.start_of_subtree[i],
            next: i.checked_sub(1),
        }
    }

    /// Parent of `i`; `None` for the root.
    #[must_use]
    pub fn parent(&self, i: usize) -> Option<usize> {
        (i + 1..self.start_of_subtree.len()).find(|&j| self.start_of_subtree[j] <= i)
    }
}

/// Iterator over the children of a tree node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    start: &'a [usize],
    lower: usize,
    next: Option<usize>,
}

impl Iterator for Children<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let child = self.next.filter(|&c| c >= self.lower)?;
        self.next = self.start[child].checked_sub(1);
        Some(child)
    }
}
