//! Property-based tests for partition trees and occurrences
//!
//! Trees are generated as random shapes and laid out in post-order, the
//! same way callers build bracket arrays.

use oxiz_interpolate::{Color, Occurrence, PartitionTree};
use proptest::prelude::*;

/// Tree shape: a node with its children, left to right.
#[derive(Debug, Clone)]
struct Shape(Vec<Shape>);

fn shape_strategy() -> impl Strategy<Value = Shape> {
    Just(Shape(Vec::new())).prop_recursive(4, 24, 3, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(Shape)
    })
}

/// Append the post-order bracket array of `shape` to `out`.
fn bracket(shape: &Shape, out: &mut Vec<usize>) {
    let start = out.len();
    for child in &shape.0 {
        bracket(child, out);
    }
    out.push(start);
}

fn tree_strategy() -> impl Strategy<Value = PartitionTree> {
    shape_strategy()
        .prop_filter("at least one interpolant", |shape| !shape.0.is_empty())
        .prop_map(|shape| {
            let mut starts = Vec::new();
            bracket(&shape, &mut starts);
            let groups = vec![Vec::new(); starts.len()];
            PartitionTree::new(groups, starts).unwrap()
        })
}

/// `i` and its ancestors, following parent links.
fn ancestors(tree: &PartitionTree, i: usize) -> Vec<usize> {
    let mut chain = vec![i];
    let mut node = i;
    while let Some(parent) = tree.parent(node) {
        chain.push(parent);
        node = parent;
    }
    chain
}

proptest! {
    /// Every non-root node is a child of its parent, and the root has none
    #[test]
    fn parent_and_children_agree(tree in tree_strategy()) {
        let root = tree.root();
        prop_assert_eq!(tree.parent(root), None);
        for i in 0..root {
            let parent = tree.parent(i);
            prop_assert!(parent.is_some());
            let parent = parent.unwrap();
            prop_assert!(parent > i);
            prop_assert!(tree.children(parent).any(|c| c == i));
        }
    }

    /// The children of a node tile its subtree below it
    #[test]
    fn children_tile_the_subtree(tree in tree_strategy()) {
        for i in 0..=tree.root() {
            let children: Vec<usize> = tree.children(i).collect();
            prop_assert!(children.windows(2).all(|w| w[0] > w[1]));
            let covered: usize = children
                .iter()
                .map(|&c| c - tree.start_of_subtree(c) + 1)
                .sum();
            prop_assert_eq!(covered, i - tree.start_of_subtree(i));
        }
    }

    /// `in_subtree(i, p)` holds exactly when `i` is `p` or an ancestor of it
    #[test]
    fn subtree_membership_follows_ancestry(tree in tree_strategy()) {
        for p in 0..=tree.root() {
            let chain = ancestors(&tree, p);
            prop_assert_eq!(*chain.last().unwrap(), tree.root());
            for i in 0..=tree.root() {
                prop_assert_eq!(tree.in_subtree(i, p), chain.contains(&i));
            }
        }
    }

    /// Sequence trees are chains
    #[test]
    fn sequence_trees_are_chains(len in 2usize..10) {
        let groups = (0..len).map(|i| vec![format!("G{i}")]).collect();
        let tree = PartitionTree::sequence(groups).unwrap();
        prop_assert_eq!(tree.num_interpolants(), len - 1);
        for i in 0..len {
            let expected: Vec<usize> = i.checked_sub(1).into_iter().collect();
            prop_assert_eq!(tree.children(i).collect::<Vec<_>>(), expected);
            prop_assert_eq!(tree.group_of(&format!("G{i}")), Some(i));
        }
    }

    /// A term seen by one group is A-local exactly above that group
    #[test]
    fn single_group_occurrence(tree in tree_strategy(), seed in any::<usize>()) {
        let n = tree.num_interpolants();
        let g = seed % (n + 1);
        let mut occ = Occurrence::new(n);
        occ.occurs_in(Color::Group(g), &tree);
        prop_assert!(occ.contains(Color::Group(g), &tree));
        for p in 0..n {
            prop_assert_eq!(occ.is_a_local(p), tree.in_subtree(p, g));
            prop_assert_eq!(occ.is_b_local(p), !tree.in_subtree(p, g));
            prop_assert!(!occ.is_mixed(p));
        }
    }

    /// Two groups share a term where exactly one of them is below the cut,
    /// and a term built from both is mixed there
    #[test]
    fn two_group_occurrence(
        tree in tree_strategy(),
        first in any::<usize>(),
        second in any::<usize>(),
    ) {
        let n = tree.num_interpolants();
        let (g, h) = (first % (n + 1), second % (n + 1));
        let mut both = Occurrence::new(n);
        both.occurs_in(Color::Group(g), &tree);
        both.occurs_in(Color::Group(h), &tree);
        let mut only_g = Occurrence::new(n);
        only_g.occurs_in(Color::Group(g), &tree);
        let mut only_h = Occurrence::new(n);
        only_h.occurs_in(Color::Group(h), &tree);
        let combined = only_g.intersect(&only_h);

        for p in 0..n {
            let split = tree.in_subtree(p, g) != tree.in_subtree(p, h);
            prop_assert_eq!(both.is_ab(p), split);
            prop_assert_eq!(combined.is_mixed(p), split);
            prop_assert_eq!(combined.is_a_local(p), tree.in_subtree(p, g) && !split);
        }
    }

    /// Everywhere-visible terms are shared at every cut
    #[test]
    fn everywhere_is_shared(tree in tree_strategy()) {
        let n = tree.num_interpolants();
        let mut occ = Occurrence::new(n);
        occ.occurs_in(Color::Everywhere, &tree);
        prop_assert_eq!(&occ, &Occurrence::full(n));
        for p in 0..n {
            prop_assert!(occ.is_ab(p));
        }
    }
}
