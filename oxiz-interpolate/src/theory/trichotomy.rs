//! Trichotomy lemmas `s < 0 ∨ s = 0 ∨ s > 0`.

use super::{Lemma, LemmaInterpolator};
use crate::context::InterpolationContext;
use oxiz_core::ast::TermId;
use oxiz_core::error::{OxizError, Result};

/// Interpolates [`LemmaKind::Trichotomy`](oxiz_proof::LemmaKind) lemmas
/// whose literals are not mixed.
///
/// All three literals talk about the same term, so whenever one of them is
/// A-local and another is not, that term is shared. The conjunction of the
/// negated A-local literals is then an interpolant; it collapses to `false`
/// when every literal is A-local and to `true` when none is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrichotomyInterpolator;

impl LemmaInterpolator for TrichotomyInterpolator {
    fn interpolate(
        &self,
        ctx: &mut InterpolationContext<'_>,
        lemma: &Lemma<'_>,
    ) -> Result<Vec<TermId>> {
        if lemma.literals.len() != 3 {
            return Err(OxizError::invalid_proof(format!(
                "trichotomy lemma with {} literals",
                lemma.literals.len()
            )));
        }
        let mut occurrences = Vec::with_capacity(3);
        for &lit in lemma.literals {
            let atom = ctx.tm().atom_of(lit);
            occurrences.push(ctx.lit_info(atom)?.occurrence().clone());
        }

        let n = ctx.num_interpolants();
        let mut interpolants = Vec::with_capacity(n);
        for p in 0..n {
            if occurrences.iter().any(|occ| occ.is_mixed(p)) {
                return Err(OxizError::unsupported("mixed literal in trichotomy lemma"));
            }
            let a_local: Vec<TermId> = lemma
                .literals
                .iter()
                .zip(&occurrences)
                .filter(|(_, occ)| occ.is_a_local(p))
                .map(|(&lit, _)| lit)
                .collect();
            let tm = ctx.tm_mut();
            let interpolant = if a_local.len() == lemma.literals.len() {
                tm.mk_false()
            } else {
                let negated: Vec<TermId> = a_local.iter().map(|&lit| tm.mk_not(lit)).collect();
                tm.mk_and(negated)
            };
            interpolants.push(interpolant);
        }
        Ok(interpolants)
    }
}
