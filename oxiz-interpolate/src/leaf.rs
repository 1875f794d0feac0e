//! Base cases of the proof walk.

use crate::context::InterpolationContext;
use crate::postprocess::replace_nonshared_symbols;
use crate::theory::{Lemma, TheoryInterpolators};
use oxiz_core::ast::traversal::symbols;
use oxiz_core::ast::TermId;
use oxiz_core::error::{OxizError, Result};
use oxiz_proof::{LemmaKind, ProofNode, ProofStep};
use tracing::debug;

/// Interpolants of a leaf node, one per group.
pub(crate) fn interpolate_leaf(
    ctx: &mut InterpolationContext<'_>,
    theories: &TheoryInterpolators,
    node: &ProofNode,
) -> Result<Vec<TermId>> {
    ctx.stats.leaves += 1;
    let interpolants = match &node.step {
        ProofStep::Axiom { source, literals } => {
            reject_skolems(ctx, literals)?;
            axiom_interpolants(ctx, source.as_deref())
        }
        ProofStep::Lemma {
            kind,
            literals,
            annotation,
        } => {
            let lemma = Lemma {
                kind: *kind,
                literals,
                annotation,
            };
            lemma_interpolants(ctx, theories, &lemma)?
        }
        ProofStep::Resolution { .. } => {
            return Err(OxizError::internal(format!(
                "proof node {} is not a leaf",
                node.id
            )));
        }
    };
    debug!(
        node = %node.id,
        interpolants = ?DisplayAll(ctx, &interpolants),
        "leaf interpolated"
    );
    Ok(interpolants)
}

/// `false` for every group whose subtree contains the source group, `true`
/// elsewhere.
fn axiom_interpolants(ctx: &InterpolationContext<'_>, source: Option<&str>) -> Vec<TermId> {
    let tree = ctx.tree();
    let p = tree.leaf_group(source);
    (0..tree.num_interpolants())
        .map(|i| ctx.tm().mk_bool(!tree.in_subtree(i, p)))
        .collect()
}

fn lemma_interpolants(
    ctx: &mut InterpolationContext<'_>,
    theories: &TheoryInterpolators,
    lemma: &Lemma<'_>,
) -> Result<Vec<TermId>> {
    let generator = theories.generator(lemma.kind)?;
    let mut interpolants = generator.interpolate(ctx, lemma)?;
    let n = ctx.num_interpolants();
    if interpolants.len() != n {
        return Err(OxizError::internal(format!(
            "{} generator returned {} interpolants for {} groups",
            lemma.kind.name(),
            interpolants.len(),
            n
        )));
    }
    if lemma.kind == LemmaKind::CongTrans && ctx.config().replace_nonshared {
        replace_nonshared_symbols(ctx, &mut interpolants)?;
    }
    Ok(interpolants)
}

/// Skolem functions are introduced by the solver and belong to no group.
fn reject_skolems(ctx: &InterpolationContext<'_>, literals: &[TermId]) -> Result<()> {
    let tm = ctx.tm();
    for &lit in literals {
        for sym in symbols(tm, lit) {
            let name = tm.resolve(sym);
            if name.starts_with('@') && name.contains("skolem") {
                return Err(OxizError::unsupported(format!(
                    "skolem symbol {name} in input clause"
                )));
            }
        }
    }
    Ok(())
}

/// Lazily formatted interpolant vector for log lines.
pub(crate) struct DisplayAll<'c, 'a>(pub &'c InterpolationContext<'a>, pub &'c [TermId]);

impl std::fmt::Debug for DisplayAll<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tm = self.0.tm();
        f.debug_list()
            .entries(self.1.iter().map(|&t| tm.display(t).to_string()))
            .finish()
    }
}
