//! Coloring of symbols, terms and literals with their groups.
//!
//! Coloring happens in two passes before the proof walk: every symbol of
//! every assertion is colored with the assertion's group, then every
//! literal of every input clause in the proof. Occurrences of compound
//! terms are derived lazily from their symbols and memoized. Literals that
//! never appear in an input clause (theory lemma literals, pivots) get
//! their [`LitInfo`] on first use, together with the auxiliary variable
//! needed when they turn out to be mixed.

use crate::lit_info::{AtomKind, LitInfo};
use crate::occurrence::Occurrence;
use crate::partition::{Color, PartitionTree};
use lasso::Spur;
use oxiz_core::ast::traversal::{children, collect_subterms, expand_definitions, head_symbol, symbols};
use oxiz_core::ast::{TermId, TermKind, TermManager};
use oxiz_core::error::{OxizError, Result};
use oxiz_core::AffineTerm;
use oxiz_proof::{Proof, ProofNodeId, ProofStep};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// An input formula with the name that assigns it to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// Name of the assertion; `None` makes it visible to every group
    pub name: Option<String>,
    /// The formula
    pub term: TermId,
}

impl Assertion {
    /// A named assertion.
    pub fn named(name: impl Into<String>, term: TermId) -> Self {
        Self {
            name: Some(name.into()),
            term,
        }
    }

    /// An unnamed assertion.
    pub fn unnamed(term: TermId) -> Self {
        Self { name: None, term }
    }
}

/// Occurrence information of every symbol, term and atom seen so far.
#[derive(Debug)]
pub struct OccurrenceTracker {
    num_interpolants: usize,
    symbols: FxHashMap<Spur, Occurrence>,
    terms: FxHashMap<TermId, Occurrence>,
    literals: FxHashMap<TermId, LitInfo>,
}

impl OccurrenceTracker {
    /// Empty tracker for the given tree.
    pub fn new(tree: &PartitionTree) -> Self {
        Self {
            num_interpolants: tree.num_interpolants(),
            symbols: FxHashMap::default(),
            terms: FxHashMap::default(),
            literals: FxHashMap::default(),
        }
    }

    /// Color every symbol of every assertion with the assertion's group.
    ///
    /// `define-fun` macros and `let` bindings are expanded first, so the
    /// symbols colored are the ones the proof refers to.
    pub fn color_assertions(
        &mut self,
        tm: &mut TermManager,
        tree: &PartitionTree,
        assertions: &[Assertion],
    ) -> Result<()> {
        for assertion in assertions {
            let color = tree.color_of(assertion.name.as_deref());
            let expanded = expand_definitions(tm, assertion.term)?;
            trace!(name = ?assertion.name, ?color, "coloring assertion");
            self.color_symbols(tm, tree, expanded, color);
        }
        Ok(())
    }

    /// Color the atoms of every input clause reachable from `root`.
    pub fn color_literals(
        &mut self,
        tm: &TermManager,
        tree: &PartitionTree,
        proof: &Proof,
        root: ProofNodeId,
    ) -> Result<()> {
        let mut seen = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            match &proof.node(id)?.step {
                ProofStep::Resolution {
                    primary,
                    antecedents,
                } => {
                    stack.push(*primary);
                    stack.extend(antecedents.iter().map(|a| a.node));
                }
                ProofStep::Axiom { source, literals } => {
                    let color = tree.color_of(source.as_deref());
                    for &lit in literals {
                        let atom = tm.atom_of(lit);
                        let n = self.num_interpolants;
                        let info = self
                            .literals
                            .entry(atom)
                            .or_insert_with(|| LitInfo::new(Occurrence::new(n)));
                        if !info.occurrence().contains(color, tree) {
                            info.occurrence_mut().occurs_in(color, tree);
                        }
                        self.color_symbols(tm, tree, atom, color);
                    }
                }
                ProofStep::Lemma { .. } => {}
            }
        }
        Ok(())
    }

    fn color_symbols(&mut self, tm: &TermManager, tree: &PartitionTree, root: TermId, color: Color) {
        for id in collect_subterms(tm, root) {
            if let Some(sym) = head_symbol(tm, id) {
                self.add_symbol_occurrence(sym, color, tree);
            }
        }
    }

    fn add_symbol_occurrence(&mut self, sym: Spur, color: Color, tree: &PartitionTree) {
        let n = self.num_interpolants;
        let occ = self.symbols.entry(sym).or_insert_with(|| Occurrence::new(n));
        if !occ.contains(color, tree) {
            occ.occurs_in(color, tree);
        }
    }

    /// Occurrence of a symbol. Symbols never colored are visible to the root
    /// group only.
    #[must_use]
    pub fn symbol_occurrence(&self, sym: Spur) -> Occurrence {
        self.symbols
            .get(&sym)
            .cloned()
            .unwrap_or_else(|| Occurrence::new(self.num_interpolants))
    }

    /// Occurrence of a term.
    ///
    /// Literals and bound variables are shared by every group. Builtin
    /// operations are visible wherever all their arguments are. An
    /// uninterpreted application is visible wherever all its symbols are;
    /// where that leaves it mixed, it takes the side of its outermost
    /// symbol and is flagged as containing a mixed sub-term.
    pub fn occurrence(&mut self, tm: &TermManager, term: TermId) -> Occurrence {
        let n = self.num_interpolants;
        let mut stack = vec![(term, false)];
        while let Some((id, expanded)) = stack.pop() {
            if self.terms.contains_key(&id) {
                continue;
            }
            let kind = tm.kind(id);
            let occ = match kind {
                k if k.is_constant() => Occurrence::full(n),
                TermKind::BoundVar(_) => Occurrence::full(n),
                TermKind::Var(_) | TermKind::Apply { .. } => self.application_occurrence(tm, id),
                _ => {
                    let args = children(kind);
                    if !expanded {
                        stack.push((id, true));
                        stack.extend(
                            args.iter()
                                .filter(|a| !self.terms.contains_key(a))
                                .map(|&a| (a, false)),
                        );
                        continue;
                    }
                    let mut occ = Occurrence::full(n);
                    for arg in &args {
                        if let Some(arg_occ) = self.terms.get(arg) {
                            occ.intersect_with(arg_occ);
                        }
                    }
                    occ
                }
            };
            self.terms.insert(id, occ);
        }
        self.terms
            .get(&term)
            .cloned()
            .unwrap_or_else(|| Occurrence::full(n))
    }

    fn application_occurrence(&mut self, tm: &TermManager, id: TermId) -> Occurrence {
        let n = self.num_interpolants;
        let mut occ = Occurrence::full(n);
        let mut syms: Vec<Spur> = symbols(tm, id).into_iter().collect();
        syms.sort_unstable();
        for sym in syms {
            let sym_occ = self.symbols.entry(sym).or_insert_with(|| Occurrence::new(n));
            occ.intersect_with(sym_occ);
        }
        if let Some(outer) = head_symbol(tm, id).and_then(|s| self.symbols.get(&s)) {
            for p in 0..n {
                if occ.is_mixed(p) {
                    occ.recolor_mixed(p, outer);
                }
            }
        }
        occ
    }

    /// Interpolation data of an atom, creating it on first use.
    pub fn lit_info(&mut self, tm: &mut TermManager, atom: TermId) -> Result<&LitInfo> {
        if !self.literals.contains_key(&atom) {
            let info = self.color_mixed_literal(tm, atom)?;
            self.literals.insert(atom, info);
        }
        self.literals
            .get(&atom)
            .ok_or_else(|| OxizError::internal("literal info vanished"))
    }

    /// Build the [`LitInfo`] of an atom that no input clause contains.
    ///
    /// The atom is visible wherever all its immediate operands are: both
    /// sides of a congruence equality, or the summands of an arithmetic
    /// atom. If that leaves some non-root group on neither side, a fresh
    /// `litaux` variable is allocated to stand for the shared value.
    fn color_mixed_literal(&mut self, tm: &mut TermManager, atom: TermId) -> Result<LitInfo> {
        let n = self.num_interpolants;
        let kind = AtomKind::classify(tm, atom);
        let (operands, aux_sort) = match &kind {
            AtomKind::CcEquality { lhs, rhs } => {
                let (lhs_sort, rhs_sort) = (tm.sort_of(*lhs), tm.sort_of(*rhs));
                if lhs_sort != rhs_sort {
                    return Err(OxizError::SortMismatch {
                        expected: tm.sort_name(lhs_sort),
                        found: tm.sort_name(rhs_sort),
                    });
                }
                (vec![*lhs, *rhs], Some(lhs_sort))
            }
            AtomKind::LaEquality { affine, sort } | AtomKind::Bound { affine, sort } => {
                let aux_sort = if *sort == tm.sorts.int_sort {
                    tm.sorts.int_sort
                } else {
                    tm.sorts.real_sort
                };
                (affine.summands().map(|(t, _)| t).collect(), Some(aux_sort))
            }
            AtomKind::Other => (vec![atom], None),
        };

        let mut occ = Occurrence::full(n);
        for &operand in &operands {
            let operand_occ = self.occurrence(tm, operand);
            occ.intersect_with(&operand_occ);
        }

        let mut shared = occ.in_a().clone();
        shared.union_with(occ.in_b());
        let mut info = LitInfo::new(occ.clone());
        let needs_aux = shared.first_clear().is_some_and(|p| p < n);
        let Some(sort) = aux_sort.filter(|_| needs_aux) else {
            return Ok(info);
        };

        let var = tm.mk_fresh_var("litaux", sort);
        info.set_mixed_var(var);
        match &kind {
            AtomKind::CcEquality { lhs, .. } => {
                let lhs_occ = self.occurrence(tm, *lhs);
                info.set_lhs_occurrence(lhs_occ);
            }
            AtomKind::LaEquality { affine, .. } | AtomKind::Bound { affine, .. } => {
                for p in (0..n).filter(|&p| occ.is_mixed(p)) {
                    let mut part = AffineTerm::new();
                    for (term, coeff) in affine.summands() {
                        if self.occurrence(tm, term).is_a_local(p) {
                            part.add_term(coeff, term);
                        }
                    }
                    info.set_a_part(p, part);
                }
            }
            AtomKind::Other => {}
        }
        trace!(atom = %tm.display(atom), %occ, aux = %tm.display(var), "mixed literal");
        Ok(info)
    }

    /// Number of interpolants `N`.
    #[must_use]
    pub fn num_interpolants(&self) -> usize {
        self.num_interpolants
    }
}
