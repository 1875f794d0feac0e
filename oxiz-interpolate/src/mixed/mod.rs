//! Elimination of mixed pivots.
//!
//! A mixed literal has symbols on both sides of the cut of some group. The
//! leaf generators stand its shared value in with an auxiliary variable
//! `x` and leave markers in the partial interpolants:
//!
//! - mixed equalities leave `EqMarker(x, s)` in the interpolant of the
//!   clause containing the equality, and plain occurrences of `x` in the
//!   interpolant of the clause containing the disequality;
//! - mixed bounds leave `LaAnnot(s, k, F)` wrappers whose `s` mentions `x`
//!   on both sides, with coefficients of opposite sign.
//!
//! Resolving on the literal removes `x` again: [`mixed_eq_interpolate`]
//! substitutes, [`mixed_pivot_la`] combines every pair of wrappers by
//! Fourier-Motzkin style elimination ([`real`]) or by a bounded case split
//! over the integer values `x` can take ([`int`]).

pub mod eq;
pub mod int;
pub mod real;

pub use eq::mixed_eq_interpolate;

use crate::cancel::TerminationRequest;
use crate::stats::InterpolationStats;
use oxiz_core::ast::traversal::{rewrite, Visit};
use oxiz_core::ast::{LaAnnotation, TermId, TermKind, TermManager};
use oxiz_core::error::{OxizError, Result};
use oxiz_core::SortId;

/// Settings and counters for eliminating one auxiliary variable.
pub struct LaElimination<'c> {
    /// The auxiliary variable `x`
    pub var: TermId,
    /// Cancellation predicate, polled once per integer case
    pub cancel: &'c dyn TerminationRequest,
    /// Upper bound on integer case-split disjuncts
    pub max_case_split: Option<usize>,
    /// Counters to update
    pub stats: &'c mut InterpolationStats,
}

impl LaElimination<'_> {
    /// Combine two wrappers whose `s` both mention the variable.
    pub fn combine(
        &mut self,
        tm: &mut TermManager,
        la1: &LaAnnotation,
        la2: &LaAnnotation,
    ) -> Result<TermId> {
        let sort = tm.sort_of(self.var);
        if sort == tm.sorts.int_sort {
            int::combine(tm, self, la1, la2)
        } else if sort == tm.sorts.real_sort {
            real::combine(tm, self.var, la1, la2).inspect(|_| self.stats.real_eliminations += 1)
        } else {
            Err(OxizError::internal(format!(
                "auxiliary variable {} of bound is not numeric",
                tm.display(self.var)
            )))
        }
    }
}

/// `I1[I2[LA3]]` for antecedent interpolant `I1[LA1]` and primary
/// interpolant `I2[LA2]`.
///
/// Every wrapper of `I1` mentioning the variable is replaced by a copy of
/// `I2` in which every wrapper mentioning the variable is replaced by the
/// combination of the two.
pub fn mixed_pivot_la(
    tm: &mut TermManager,
    antecedent: TermId,
    primary: TermId,
    elim: &mut LaElimination<'_>,
) -> Result<TermId> {
    let var = elim.var;
    rewrite(tm, antecedent, |tm, id| {
        let Some(la1) = la_with_var(tm, id, var) else {
            return Ok(Visit::Descend);
        };
        let inner = rewrite(tm, primary, |tm, id| {
            let Some(la2) = la_with_var(tm, id, var) else {
                return Ok(Visit::Descend);
            };
            elim.combine(tm, &la1, &la2).map(Visit::Replace)
        })?;
        Ok(Visit::Replace(inner))
    })
}

/// The annotation of `id` if it is a wrapper whose `s` mentions `var`.
fn la_with_var(tm: &TermManager, id: TermId, var: TermId) -> Option<LaAnnotation> {
    match tm.kind(id) {
        TermKind::LaAnnot(la) if la.s.coefficient(var).is_some() => Some((**la).clone()),
        _ => None,
    }
}

/// `(c1, c2)`, the coefficients of `var` in both wrappers, which must have
/// opposite signs.
pub(crate) fn opposite_coefficients(
    var: TermId,
    la1: &LaAnnotation,
    la2: &LaAnnotation,
) -> Result<(num_rational::BigRational, num_rational::BigRational)> {
    use num_traits::Signed;

    let (Some(c1), Some(c2)) = (la1.s.coefficient(var), la2.s.coefficient(var)) else {
        return Err(OxizError::internal("bound wrapper without auxiliary variable"));
    };
    if c1.is_positive() == c2.is_positive() {
        return Err(OxizError::internal(format!(
            "auxiliary variable has coefficients {c1} and {c2} of equal sign"
        )));
    }
    Ok((c1.clone(), c2.clone()))
}

/// `-s'/c` as a term, where `s'` is `s` without `var` and `c` the
/// coefficient of `var`.
pub(crate) fn solve_for(
    tm: &mut TermManager,
    s: &oxiz_core::AffineTerm,
    var: TermId,
    coeff: &num_rational::BigRational,
    sort: SortId,
) -> TermId {
    let mut rest = s.clone();
    rest.remove(var);
    rest.mul(&-coeff.recip());
    rest.to_term(tm, sort)
}
