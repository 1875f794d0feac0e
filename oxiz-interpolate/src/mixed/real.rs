//! Mixed bounds over the reals.
//!
//! For `LA(c1·x + s1, k1, F1)` and `LA(c2·x + s2, k2, F2)` with `c1`, `c2`
//! of opposite sign, the sum `|c1|·s2 + |c2|·s1` does not mention `x`. The
//! combined wrapper keeps that sum as its `s` and picks `F` and `k` by
//! which of the two inputs is strict or already has a negative bound.

use super::{opposite_coefficients, solve_for};
use num_traits::Signed;
use oxiz_core::ast::traversal::substitute_one;
use oxiz_core::ast::{LaAnnotation, TermId, TermManager};
use oxiz_core::error::Result;
use oxiz_core::{AffineTerm, DeltaRational};

/// Combine two wrappers over the real auxiliary variable `var`.
pub fn combine(
    tm: &mut TermManager,
    var: TermId,
    la1: &LaAnnotation,
    la2: &LaAnnotation,
) -> Result<TermId> {
    let real = tm.sorts.real_sort;
    let (c1, c2) = opposite_coefficients(var, la1, la2)?;
    let (s1, s2) = (&la1.s, &la2.s);

    let mut sum = AffineTerm::new();
    sum.add(&c1.abs(), s2);
    sum.add(&c2.abs(), s1);

    let (formula, k) = if s1.constant().eps > 0 || s2.constant().eps > 0 {
        // The sum is strict as well and can never be zero.
        (sum.to_leq0(tm, real), -&DeltaRational::epsilon())
    } else if la1.k.is_negative() {
        let value = solve_for(tm, s1, var, &c1, real);
        (substitute_one(tm, la2.formula, var, value), la2.k.clone())
    } else if la2.k.is_negative() {
        let value = solve_for(tm, s2, var, &c2, real);
        (substitute_one(tm, la1.formula, var, value), la1.k.clone())
    } else {
        let value = solve_for(tm, s1, var, &c1, real);
        let f1 = substitute_one(tm, la1.formula, var, value);
        let f2 = substitute_one(tm, la2.formula, var, value);
        let mut formula = tm.mk_and([f1, f2]);
        if sum.is_constant() {
            if sum.constant().is_negative() {
                formula = tm.mk_true();
            }
        } else {
            let mut strict = sum.clone();
            strict.add_constant(&DeltaRational::epsilon());
            let lt = strict.to_leq0(tm, real);
            formula = tm.mk_or([lt, formula]);
        }
        (formula, DeltaRational::zero())
    };
    Ok(tm.mk_la_annot(sum, k, formula))
}
