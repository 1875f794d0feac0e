//! Mixed bounds over the integers.
//!
//! Over the integers the real shadow is too weak: `|c1|·s2 + |c2|·s1 ≤ 0`
//! may hold although no integer `x` fits between the two bounds. Instead
//! the side with fewer candidate values is enumerated. `x` is written as
//! `div(±s' + offset, |c|)` for every offset up to the bound `kc`, and the
//! disjunction of both formulas under each candidate is the new `F`.

use super::{opposite_coefficients, LaElimination};
use crate::cancel::TerminationRequest;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive};
use oxiz_core::ast::traversal::substitute_one;
use oxiz_core::ast::{LaAnnotation, TermId, TermManager};
use oxiz_core::error::{OxizError, Result};
use oxiz_core::{AffineTerm, DeltaRational};
use tracing::trace;

/// Combine two wrappers over the integer auxiliary variable of `elim`.
pub fn combine(
    tm: &mut TermManager,
    elim: &mut LaElimination<'_>,
    la1: &LaAnnotation,
    la2: &LaAnnotation,
) -> Result<TermId> {
    let var = elim.var;
    let int = tm.sorts.int_sort;
    let (c1, c2) = opposite_coefficients(var, la1, la2)?;
    if !c1.is_integer() || !c2.is_integer() {
        return Err(OxizError::internal(format!(
            "integer auxiliary variable with coefficients {c1} and {c2}"
        )));
    }
    let (abs_c1, abs_c2) = (c1.abs(), c2.abs());
    let (s1, s2) = (&la1.s, &la2.s);

    let mut sum = AffineTerm::new();
    sum.add(&abs_c1, s2);
    sum.add(&abs_c2, s1);

    let c1c2 = DeltaRational::from_rational(&abs_c1 * &abs_c2);
    let new_k = &(&la1.k.mul_rational(&abs_c2) + &la2.k.mul_rational(&abs_c1)) + &c1c2;

    let k1c1 = la1.k.ceil_successor_div(&abs_c1);
    let k2c2 = la2.k.ceil_successor_div(&abs_c2);
    let (the_c, the_s, kc, first) = if k1c1 < k2c2 {
        (&c1, s1, k1c1, true)
    } else {
        (&c2, s2, k2c2, false)
    };
    let the_c_abs = the_c.abs();

    let last = kc.to_integer();
    let cases = (&last + BigInt::one()).max(BigInt::from(0));
    if let Some(limit) = elim.max_case_split {
        if cases.to_usize().is_none_or(|count| count > limit) {
            return Err(OxizError::unsupported(format!(
                "integer case split into {cases} disjuncts exceeds limit {limit}"
            )));
        }
    }

    // Start from -s/c, rounded towards the bound.
    let mut offset = AffineTerm::new();
    let sign = if the_c.is_positive() {
        -BigRational::one()
    } else {
        BigRational::one()
    };
    offset.add(&sign, the_s);
    offset.remove(var);
    if the_c.is_negative() {
        offset.add_constant(&DeltaRational::from_rational(&the_c_abs - BigRational::one()));
    }
    let step = DeltaRational::from_rational(-the_c);
    let divisor = (!the_c_abs.is_one()).then(|| tm.mk_rational(&the_c_abs, int));

    let mut disjuncts = Vec::new();
    let mut i = BigInt::from(0);
    while i <= last {
        if elim.cancel.should_stop() {
            return Err(OxizError::Timeout);
        }
        let mut x = offset.to_term(tm, int);
        if let Some(divisor) = divisor {
            x = tm.mk_div(x, divisor);
        }
        let mut f1 = substitute_one(tm, la1.formula, var, x);
        let mut f2 = substitute_one(tm, la2.formula, var, x);
        if i == last {
            if first {
                f1 = tm.mk_true();
            } else {
                f2 = tm.mk_true();
            }
        }
        disjuncts.push(tm.mk_and([f1, f2]));
        offset.add_constant(&step);
        i += 1;
    }
    trace!(cases = %cases, "integer case split");
    elim.stats.int_eliminations += 1;
    elim.stats.case_split_disjuncts += disjuncts.len() as u64;

    let formula = tm.mk_or(disjuncts);
    Ok(tm.mk_la_annot(sum, new_k, formula))
}
