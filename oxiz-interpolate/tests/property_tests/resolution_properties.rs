//! Property-based tests for the proof walk on propositional refutations
//!
//! The refutations are implication chains and ladders with shared
//! sub-proofs whose input clauses are spread over the groups of a sequence
//! tree.

use crate::common::assert_tree_interpolants;
use oxiz_core::ast::{TermId, TermManager};
use oxiz_interpolate::{
    Assertion, Interpolator, NeverCancel, PartitionTree, SymbolChecker, TreeInterpolants,
};
use oxiz_proof::{Proof, ProofNodeId};
use proptest::prelude::*;

/// A refutation with the group of every input clause.
struct Refutation {
    tree: PartitionTree,
    proof: Proof,
    root: ProofNodeId,
    assertions: Vec<Assertion>,
    groups: Vec<Vec<TermId>>,
}

/// Input clauses handed out to groups in order of creation.
struct Builder<'o> {
    tree: PartitionTree,
    owners: &'o [usize],
    proof: Proof,
    assertions: Vec<Assertion>,
    groups: Vec<Vec<TermId>>,
}

fn group_name(g: usize) -> String {
    format!("G{g}")
}

impl<'o> Builder<'o> {
    fn new(num_groups: usize, owners: &'o [usize]) -> Self {
        let names = (0..num_groups).map(|g| vec![group_name(g)]).collect();
        Self {
            tree: PartitionTree::sequence(names).unwrap(),
            owners,
            proof: Proof::new(),
            assertions: Vec::new(),
            groups: vec![Vec::new(); num_groups],
        }
    }

    /// Add the next input clause, owned by the next entry of `owners`.
    fn axiom(&mut self, tm: &mut TermManager, literals: Vec<TermId>) -> ProofNodeId {
        let owner = self.owners[self.assertions.len() % self.owners.len()];
        let name = group_name(owner);
        let term = tm.mk_or(literals.iter().copied());
        self.assertions.push(Assertion::named(name.clone(), term));
        self.groups[owner].push(term);
        self.proof.add_axiom(Some(&name), literals)
    }

    fn finish(self, root: ProofNodeId) -> Refutation {
        Refutation {
            tree: self.tree,
            proof: self.proof,
            root,
            assertions: self.assertions,
            groups: self.groups,
        }
    }
}

/// `p0, p0 → p1, …, ¬pn` with one clause per entry of `owners`.
fn chain(tm: &mut TermManager, num_groups: usize, owners: &[usize]) -> Refutation {
    let boolean = tm.sorts.bool_sort;
    let n = owners.len() - 1;
    let p: Vec<TermId> = (0..n).map(|i| tm.mk_var(&format!("p{i}"), boolean)).collect();
    let mut builder = Builder::new(num_groups, owners);

    let mut acc = builder.axiom(tm, vec![p[0]]);
    for k in 1..n {
        let not_prev = tm.mk_not(p[k - 1]);
        let step = builder.axiom(tm, vec![not_prev, p[k]]);
        acc = builder.proof.resolve(step, p[k - 1], acc).unwrap();
    }
    let not_last = tm.mk_not(p[n - 1]);
    let last = builder.axiom(tm, vec![not_last]);
    let root = builder.proof.resolve(acc, not_last, last).unwrap();
    builder.finish(root)
}

/// Ladder of `rungs` rungs: the proof of `p_k` is used by both clauses
/// `¬p_k ∨ p_{k+1} ∨ ±q_k` before they are resolved on `q_k`.
fn ladder(tm: &mut TermManager, num_groups: usize, owners: &[usize], rungs: usize) -> Refutation {
    let boolean = tm.sorts.bool_sort;
    let p: Vec<TermId> = (0..=rungs).map(|i| tm.mk_var(&format!("p{i}"), boolean)).collect();
    let mut builder = Builder::new(num_groups, owners);

    let mut rung = builder.axiom(tm, vec![p[0]]);
    for k in 0..rungs {
        let q = tm.mk_var(&format!("q{k}"), boolean);
        let not_q = tm.mk_not(q);
        let not_p = tm.mk_not(p[k]);
        let with_q = builder.axiom(tm, vec![not_p, p[k + 1], q]);
        let with_not_q = builder.axiom(tm, vec![not_p, p[k + 1], not_q]);
        let left = builder.proof.resolve(with_q, p[k], rung).unwrap();
        let right = builder.proof.resolve(with_not_q, p[k], rung).unwrap();
        rung = builder.proof.resolve(left, not_q, right).unwrap();
    }
    let not_last = tm.mk_not(p[rungs]);
    let last = builder.axiom(tm, vec![not_last]);
    let root = builder.proof.resolve(rung, not_last, last).unwrap();
    builder.finish(root)
}

fn owners_strategy() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (2usize..5).prop_flat_map(|num_groups| {
        (
            Just(num_groups),
            prop::collection::vec(0..num_groups, 3..9),
        )
    })
}

fn interpolate_checked(tm: &mut TermManager, r: &Refutation) -> TreeInterpolants {
    let checker = SymbolChecker::new(tm, &r.tree, &r.assertions).unwrap();
    Interpolator::default()
        .with_checker(checker)
        .interpolate(tm, &r.proof, r.root, &r.assertions, &r.tree, &NeverCancel)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any spread of the clauses yields valid tree interpolants over shared
    /// symbols
    #[test]
    fn chain_interpolants_are_valid((num_groups, owners) in owners_strategy()) {
        let mut tm = TermManager::new();
        let refutation = chain(&mut tm, num_groups, &owners);
        let result = interpolate_checked(&mut tm, &refutation);
        prop_assert_eq!(result.interpolants.len(), num_groups - 1);
        assert_tree_interpolants(&tm, &refutation.tree, &refutation.groups, &result.interpolants);
        prop_assert_eq!(result.stats.leaves, owners.len() as u64);
        prop_assert_eq!(result.stats.resolutions, owners.len() as u64 - 1);
        prop_assert_eq!(result.stats.cache_hits, 0);
    }

    /// With all clauses in one group, the interpolants are `true` below it
    /// and `false` from it upwards
    #[test]
    fn single_owner_gives_constants(num_groups in 2usize..6, len in 3usize..8, seed in any::<usize>()) {
        let owner = seed % num_groups;
        let owners = vec![owner; len];
        let mut tm = TermManager::new();
        let refutation = chain(&mut tm, num_groups, &owners);
        let r = &refutation;
        let result = Interpolator::default()
            .interpolate(&mut tm, &r.proof, r.root, &r.assertions, &r.tree, &NeverCancel)
            .unwrap();
        for (i, &itp) in result.interpolants.iter().enumerate() {
            prop_assert_eq!(itp, tm.mk_bool(i >= owner));
        }
    }

    /// Shared sub-proofs are interpolated once, whoever owns the clauses
    #[test]
    fn ladder_interpolants_are_valid((num_groups, owners) in owners_strategy(), rungs in 1usize..4) {
        let mut tm = TermManager::new();
        let refutation = ladder(&mut tm, num_groups, &owners, rungs);
        let result = interpolate_checked(&mut tm, &refutation);
        assert_tree_interpolants(&tm, &refutation.tree, &refutation.groups, &result.interpolants);
        let rungs = rungs as u64;
        prop_assert_eq!(result.stats.leaves, 2 * rungs + 2);
        prop_assert_eq!(result.stats.resolutions, 3 * rungs + 1);
        prop_assert_eq!(result.stats.cache_hits, rungs);
    }
}
