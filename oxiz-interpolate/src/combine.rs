//! Combination of partial interpolants at a resolution step.

use crate::context::InterpolationContext;
use crate::leaf::DisplayAll;
use crate::lit_info::AtomKind;
use crate::mixed::{mixed_eq_interpolate, mixed_pivot_la, LaElimination};
use oxiz_core::ast::TermId;
use oxiz_core::error::{OxizError, Result};
use tracing::debug;

/// Interpolants of the resolvent of `primary` and `antecedent` on `pivot`.
///
/// `pivot` is the literal as it occurs in the antecedent's clause. For each
/// group the pivot atom decides the rule: A-local pivots are disjoined,
/// B-local pivots conjoined, shared pivots select with `ite`, and mixed
/// pivots have their auxiliary variable eliminated.
pub(crate) fn combine(
    ctx: &mut InterpolationContext<'_>,
    pivot: TermId,
    primary: &[TermId],
    antecedent: &[TermId],
) -> Result<Vec<TermId>> {
    let n = ctx.num_interpolants();
    if primary.len() != n || antecedent.len() != n {
        return Err(OxizError::internal(format!(
            "combining interpolant vectors of length {} and {} for {} groups",
            primary.len(),
            antecedent.len(),
            n
        )));
    }
    let atom = ctx.tm().atom_of(pivot);
    let info = ctx.lit_info(atom)?;
    let occurrence = info.occurrence().clone();
    let mixed_var = info.mixed_var();

    let mut result = Vec::with_capacity(n);
    for i in 0..n {
        let (prim, ante) = (primary[i], antecedent[i]);
        let combined = if occurrence.is_a_local(i) {
            ctx.tm_mut().mk_or([prim, ante])
        } else if occurrence.is_b_local(i) {
            ctx.tm_mut().mk_and([prim, ante])
        } else if occurrence.is_ab(i) {
            ctx.tm_mut().mk_ite(pivot, prim, ante)
        } else {
            combine_mixed(ctx, pivot, atom, mixed_var, prim, ante)?
        };
        result.push(combined);
    }
    ctx.stats.combines += 1;
    debug!(
        pivot = %ctx.tm().display(pivot),
        %occurrence,
        interpolants = ?DisplayAll(&*ctx, &result),
        "combined"
    );
    Ok(result)
}

fn combine_mixed(
    ctx: &mut InterpolationContext<'_>,
    pivot: TermId,
    atom: TermId,
    mixed_var: Option<TermId>,
    prim: TermId,
    ante: TermId,
) -> Result<TermId> {
    let Some(var) = mixed_var else {
        return Err(OxizError::internal(format!(
            "mixed pivot {} without auxiliary variable",
            ctx.tm().display(pivot)
        )));
    };
    match AtomKind::classify(ctx.tm(), atom) {
        AtomKind::CcEquality { .. } | AtomKind::LaEquality { .. } => {
            let (eq, neq) = if pivot == atom {
                (ante, prim)
            } else {
                (prim, ante)
            };
            ctx.stats.eq_eliminations += 1;
            mixed_eq_interpolate(ctx.tm, eq, neq, var)
        }
        AtomKind::Bound { .. } => {
            let mut elim = LaElimination {
                var,
                cancel: ctx.cancel,
                max_case_split: ctx.config.max_case_split,
                stats: &mut ctx.stats,
            };
            mixed_pivot_la(ctx.tm, ante, prim, &mut elim)
        }
        AtomKind::Other => Err(OxizError::unsupported(format!(
            "cannot handle mixed literal {}",
            ctx.tm().display(pivot)
        ))),
    }
}
