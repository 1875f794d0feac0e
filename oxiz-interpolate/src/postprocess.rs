//! Clean-up passes over partial and final interpolants.
//!
//! - [`unfold_las`] erases the `LaAnnot` wrappers that only carry data for
//!   mixed bound elimination.
//! - [`replace_nonshared_symbols`] purifies congruence lemma interpolants
//!   by replacing terms over non-shared symbols with `purAux` variables.
//! - [`add_quantifier`] binds the `purAux` variables that the final clause
//!   does not account for.

use crate::context::InterpolationContext;
use oxiz_core::ast::traversal::{
    children, collect_subterms, contains, head_symbol, heights, rebuild, substitute_one, symbols,
};
use oxiz_core::ast::{TermId, TermKind, TermManager};
use oxiz_core::error::{OxizError, Result};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

/// Replace every `LaAnnot` wrapper by its formula, in place.
pub fn unfold_las(tm: &mut TermManager, interpolants: &mut [TermId]) {
    let mut done: FxHashMap<TermId, TermId> = FxHashMap::default();
    for interpolant in interpolants.iter_mut() {
        *interpolant = unfold(tm, *interpolant, &mut done);
    }
}

fn unfold(tm: &mut TermManager, root: TermId, done: &mut FxHashMap<TermId, TermId>) -> TermId {
    let mut stack = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if done.contains_key(&id) {
            continue;
        }
        // Only the formula of a wrapper can contain further wrappers.
        let kids: SmallVec<[TermId; 4]> = match tm.kind(id) {
            TermKind::LaAnnot(la) => smallvec::smallvec![la.formula],
            kind => children(kind),
        };
        if !expanded && !kids.is_empty() {
            stack.push((id, true));
            stack.extend(
                kids.iter()
                    .filter(|k| !done.contains_key(k))
                    .map(|&k| (k, false)),
            );
            continue;
        }
        let new_kids: SmallVec<[TermId; 4]> = kids
            .iter()
            .map(|k| done.get(k).copied().unwrap_or(*k))
            .collect();
        let result = match tm.kind(id) {
            TermKind::LaAnnot(_) => new_kids[0],
            _ => rebuild(tm, id, &new_kids),
        };
        done.insert(id, result);
    }
    done.get(&root).copied().unwrap_or(root)
}

/// Replace, for every group `i`, each sub-term whose outermost symbol is
/// not shared at `i` by the registry variable of that sub-term.
///
/// Terms are replaced outermost first, so nested non-shared terms vanish
/// together with their context.
pub fn replace_nonshared_symbols(
    ctx: &mut InterpolationContext<'_>,
    interpolants: &mut [TermId],
) -> Result<()> {
    for (i, interpolant) in interpolants.iter_mut().enumerate() {
        let replacements = {
            let tm = ctx.tm();
            let nonshared: FxHashSet<_> = symbols(tm, *interpolant)
                .into_iter()
                .filter(|&sym| !ctx.symbol_occurrence(sym).is_ab(i))
                .collect();
            if nonshared.is_empty() {
                continue;
            }
            let height = heights(tm, *interpolant);
            let mut terms: Vec<TermId> = height
                .keys()
                .copied()
                .filter(|&t| head_symbol(tm, t).is_some_and(|sym| nonshared.contains(&sym)))
                .collect();
            terms.sort_by(|a, b| height[b].cmp(&height[a]).then(a.cmp(b)));
            terms
        };
        for term in replacements {
            if !contains(ctx.tm(), *interpolant, term) {
                continue;
            }
            let var = ctx.registry.get_or_create(ctx.tm, term);
            trace!(group = i, term = %ctx.tm().display(term), "purified");
            *interpolant = substitute_one(ctx.tm, *interpolant, term, var);
            ctx.stats.symbols_replaced += 1;
        }
    }
    Ok(())
}

/// Quantify the registry variables whose origin is not a sub-term of
/// `clause`.
///
/// Variables are bound in dependency order, outermost the ones whose
/// origin occurs inside other origins. A variable is bound existentially
/// in group `i` when the outermost symbol of its origin is A-local there,
/// universally otherwise. Interpolants not mentioning a variable are left
/// alone.
pub fn add_quantifier(
    ctx: &mut InterpolationContext<'_>,
    interpolants: &mut [TermId],
    clause: &[TermId],
) -> Result<()> {
    if ctx.registry().is_empty() {
        return Ok(());
    }
    let mut clause_terms = FxHashSet::default();
    for &lit in clause {
        clause_terms.extend(collect_subterms(ctx.tm(), lit));
    }
    let unsupported: Vec<(TermId, TermId)> = ctx
        .registry()
        .entries()
        .iter()
        .copied()
        .filter(|(origin, _)| !clause_terms.contains(origin))
        .collect();
    if unsupported.is_empty() {
        return Ok(());
    }

    let below: Vec<FxHashSet<TermId>> = unsupported
        .iter()
        .map(|&(origin, _)| collect_subterms(ctx.tm(), origin))
        .collect();
    let order = dependency_order(unsupported.len(), |a, b| {
        a != b && below[a].contains(&unsupported[b].0)
    })?;

    for (i, interpolant) in interpolants.iter_mut().enumerate() {
        for &j in order.iter().rev() {
            let (origin, var) = unsupported[j];
            if !contains(ctx.tm(), *interpolant, var) {
                continue;
            }
            let universal = head_symbol(ctx.tm(), origin)
                .is_none_or(|sym| !ctx.symbol_occurrence(sym).is_a_local(i));
            *interpolant = ctx.tm_mut().mk_quantified_over(universal, var, *interpolant);
            ctx.stats.quantifiers_added += 1;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    Active,
    Done,
}

/// Indices `0..count` ordered so that every index comes after all indices
/// it depends on.
///
/// Fails with [`OxizError::Internal`] if the dependencies contain a cycle.
pub fn dependency_order(
    count: usize,
    depends_on: impl Fn(usize, usize) -> bool,
) -> Result<Vec<usize>> {
    let mut marks = vec![Mark::New; count];
    let mut order = Vec::with_capacity(count);
    for start in 0..count {
        if marks[start] != Mark::New {
            continue;
        }
        marks[start] = Mark::Active;
        // (node, next candidate dependency)
        let mut stack = vec![(start, 0usize)];
        while let Some(&(node, mut next)) = stack.last() {
            let mut descend = None;
            while next < count {
                let dep = next;
                next += 1;
                if !depends_on(node, dep) {
                    continue;
                }
                match marks[dep] {
                    Mark::New => {
                        descend = Some(dep);
                        break;
                    }
                    Mark::Active => {
                        return Err(OxizError::internal(
                            "auxiliary variable dependencies contain a cycle",
                        ));
                    }
                    Mark::Done => {}
                }
            }
            if let Some(top) = stack.last_mut() {
                top.1 = next;
            }
            match descend {
                Some(dep) => {
                    marks[dep] = Mark::Active;
                    stack.push((dep, 0));
                }
                None => {
                    marks[node] = Mark::Done;
                    order.push(node);
                    stack.pop();
                }
            }
        }
    }
    Ok(order)
}
