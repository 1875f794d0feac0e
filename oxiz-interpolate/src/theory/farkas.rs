//! Linear arithmetic lemmas with Farkas certificates.
//!
//! ## Farkas Lemma
//!
//! A linear arithmetic lemma `ℓ₁ ∨ … ∨ ℓₘ` is valid because the negated
//! literals `¬ℓᵢ`, each read as `sᵢ ≤ 0`, are inconsistent: there are
//! multipliers `λᵢ` (non-negative for bounds) such that `Σ λᵢ·sᵢ` is a
//! positive constant.
//!
//! For group `p`, summing only the negated literals that are A-local at `p`
//! gives `Σ_A λᵢ·sᵢ ≤ 0`, which follows from the A-part and together with
//! the remaining literals sums to the contradiction. All symbols that do not
//! cancel inside the A-part also occur in the B-part, so the sum only
//! mentions shared symbols.

use super::{Lemma, LemmaInterpolator};
use crate::context::InterpolationContext;
use crate::lit_info::AtomKind;
use crate::occurrence::Occurrence;
use num_rational::BigRational;
use num_traits::{One, Signed};
use oxiz_core::ast::TermId;
use oxiz_core::error::{OxizError, Result};
use oxiz_core::{AffineTerm, DeltaRational, SortId};
use oxiz_proof::LemmaAnnotation;

/// Interpolates [`LemmaKind::LinearArith`](oxiz_proof::LemmaKind) lemmas
/// whose literals are not mixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FarkasInterpolator;

/// One negated lemma literal, scaled by its multiplier.
struct Constraint {
    scaled: AffineTerm,
    sort: SortId,
    occurrence: Occurrence,
}

impl LemmaInterpolator for FarkasInterpolator {
    fn interpolate(
        &self,
        ctx: &mut InterpolationContext<'_>,
        lemma: &Lemma<'_>,
    ) -> Result<Vec<TermId>> {
        let LemmaAnnotation::Farkas(coeffs) = lemma.annotation else {
            return Err(OxizError::invalid_proof(
                "linear arithmetic lemma without Farkas coefficients",
            ));
        };
        if coeffs.len() != lemma.literals.len() {
            return Err(OxizError::invalid_proof(format!(
                "{} Farkas coefficients for {} literals",
                coeffs.len(),
                lemma.literals.len()
            )));
        }

        let mut constraints = Vec::with_capacity(coeffs.len());
        let mut total = AffineTerm::new();
        for (&lit, coeff) in lemma.literals.iter().zip(coeffs) {
            let constraint = negated_constraint(ctx, lit, coeff)?;
            total.add(&BigRational::one(), &constraint.scaled);
            constraints.push(constraint);
        }
        if !total.is_constant() || total.constant() <= &DeltaRational::zero() {
            return Err(OxizError::invalid_proof(
                "Farkas coefficients do not sum to a contradiction",
            ));
        }

        let n = ctx.num_interpolants();
        let mut interpolants = Vec::with_capacity(n);
        for p in 0..n {
            let mut sum = AffineTerm::new();
            let mut sort = ctx.tm().sorts.real_sort;
            for constraint in &constraints {
                if constraint.occurrence.is_mixed(p) {
                    return Err(OxizError::unsupported(
                        "mixed literal in linear arithmetic lemma",
                    ));
                }
                if constraint.occurrence.is_a_local(p) {
                    sum.add(&BigRational::one(), &constraint.scaled);
                    sort = constraint.sort;
                }
            }
            interpolants.push(sum.to_leq0(ctx.tm_mut(), sort));
        }
        Ok(interpolants)
    }
}

/// `λ·s` where `s ≤ 0` is the negation of `lit`.
fn negated_constraint(
    ctx: &mut InterpolationContext<'_>,
    lit: TermId,
    coeff: &BigRational,
) -> Result<Constraint> {
    let tm = ctx.tm();
    let atom = tm.atom_of(lit);
    let positive = !tm.is_negated(lit);
    let (mut scaled, sort) = match AtomKind::classify(tm, atom) {
        AtomKind::Bound { affine, sort } => {
            if coeff.is_negative() {
                return Err(OxizError::invalid_proof(
                    "negative Farkas coefficient on a bound",
                ));
            }
            if positive {
                // ¬(s ≤ 0) is -s < 0.
                let mut negated = AffineTerm::new();
                negated.add(&-BigRational::one(), &affine);
                let integral = sort == tm.sorts.int_sort
                    && negated.has_integral_coefficients()
                    && negated.constant().is_integral();
                if integral {
                    negated.add_constant(&DeltaRational::from_integer(1));
                } else {
                    negated.add_constant(&DeltaRational::epsilon());
                }
                (negated, sort)
            } else {
                (affine, sort)
            }
        }
        AtomKind::LaEquality { affine, sort } if !positive => (affine, sort),
        _ => {
            return Err(OxizError::unsupported(format!(
                "literal {} in linear arithmetic lemma",
                tm.display(lit)
            )));
        }
    };
    scaled.mul(coeff);
    let occurrence = ctx.lit_info(atom)?.occurrence().clone();
    Ok(Constraint {
        scaled,
        sort,
        occurrence,
    })
}
