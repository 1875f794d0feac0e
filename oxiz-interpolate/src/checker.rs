//! Optional sanity checks on computed interpolants.
//!
//! The engine does not re-verify interpolants semantically. A caller that
//! wants to can plug in an [`InterpolantChecker`], for example one backed by
//! an SMT solver; [`SymbolChecker`] is a cheap syntactic one.

use crate::coloring::{Assertion, OccurrenceTracker};
use crate::partition::PartitionTree;
use lasso::Spur;
use oxiz_core::ast::traversal::symbols;
use oxiz_core::ast::{TermId, TermManager};
use oxiz_core::error::Result;
use rustc_hash::FxHashSet;

/// Hook for checking interpolants while and after they are computed.
pub trait InterpolantChecker {
    /// Check the partial interpolants of one proof node proving `clause`.
    ///
    /// Only called when deep checking is enabled. A failure is logged and
    /// does not abort the computation.
    fn check_inductivity(
        &self,
        _tm: &TermManager,
        _clause: &[TermId],
        _interpolants: &[TermId],
    ) -> bool {
        true
    }

    /// Check the final interpolants. A failure aborts the call with
    /// [`OxizError::SanityCheckFailed`](oxiz_core::error::OxizError::SanityCheckFailed).
    fn check_final(&self, tm: &TermManager, interpolants: &[TermId]) -> bool;
}

/// Checks that interpolant `i` only mentions symbols shared at group `i`.
#[derive(Debug)]
pub struct SymbolChecker {
    tracker: OccurrenceTracker,
}

impl SymbolChecker {
    /// Build the checker from the same assertions the interpolator sees.
    pub fn new(
        tm: &mut TermManager,
        tree: &PartitionTree,
        assertions: &[Assertion],
    ) -> Result<Self> {
        let mut tracker = OccurrenceTracker::new(tree);
        tracker.color_assertions(tm, tree, assertions)?;
        Ok(Self { tracker })
    }

    fn shared_at(&self, tm: &TermManager, term: TermId, i: usize, allowed: &FxHashSet<Spur>) -> bool {
        symbols(tm, term)
            .into_iter()
            .all(|sym| allowed.contains(&sym) || self.tracker.symbol_occurrence(sym).is_ab(i))
    }
}

impl InterpolantChecker for SymbolChecker {
    /// Partial interpolants may additionally mention the symbols of the
    /// clause they belong to.
    fn check_inductivity(
        &self,
        tm: &TermManager,
        clause: &[TermId],
        interpolants: &[TermId],
    ) -> bool {
        let mut allowed = FxHashSet::default();
        for &lit in clause {
            allowed.extend(symbols(tm, lit));
        }
        interpolants
            .iter()
            .enumerate()
            .all(|(i, &itp)| self.shared_at(tm, itp, i, &allowed))
    }

    fn check_final(&self, tm: &TermManager, interpolants: &[TermId]) -> bool {
        let allowed = FxHashSet::default();
        interpolants
            .iter()
            .enumerate()
            .all(|(i, &itp)| self.shared_at(tm, itp, i, &allowed))
    }
}
