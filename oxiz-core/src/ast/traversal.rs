//! Iterative term traversal and rewriting.
//!
//! All walks use an explicit stack, so arbitrarily deep terms do not grow
//! the call stack.

use super::{TermId, TermKind, TermManager};
use crate::affine::AffineTerm;
use crate::error::{OxizError, Result};
use lasso::Spur;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Immediate sub-terms of a term kind, in a fixed order.
///
/// For `LaAnnot` these are the summand terms of `s` followed by the wrapped
/// formula; for `Let` the bound values followed by the body.
#[must_use]
pub fn children(kind: &TermKind) -> SmallVec<[TermId; 4]> {
    match kind {
        TermKind::True
        | TermKind::False
        | TermKind::IntConst(_)
        | TermKind::RealConst(_)
        | TermKind::Var(_)
        | TermKind::BoundVar(_) => SmallVec::new(),
        TermKind::Not(a) | TermKind::Neg(a) => smallvec::smallvec![*a],
        TermKind::And(args) | TermKind::Or(args) | TermKind::Add(args) | TermKind::Mul(args) => {
            args.clone()
        }
        TermKind::Apply { args, .. } => args.clone(),
        TermKind::Implies(a, b)
        | TermKind::Eq(a, b)
        | TermKind::Sub(a, b)
        | TermKind::Div(a, b)
        | TermKind::Le(a, b)
        | TermKind::Lt(a, b)
        | TermKind::Ge(a, b)
        | TermKind::Gt(a, b)
        | TermKind::Select(a, b)
        | TermKind::EqMarker(a, b) => smallvec::smallvec![*a, *b],
        TermKind::Ite(a, b, c) | TermKind::Store(a, b, c) => smallvec::smallvec![*a, *b, *c],
        TermKind::Let { bindings, body } => {
            let mut out: SmallVec<[TermId; 4]> = bindings.iter().map(|(_, v)| *v).collect();
            out.push(*body);
            out
        }
        TermKind::Forall { body, .. } | TermKind::Exists { body, .. } => smallvec::smallvec![*body],
        TermKind::LaAnnot(la) => {
            let mut out: SmallVec<[TermId; 4]> = la.s.summands().map(|(t, _)| t).collect();
            out.push(la.formula);
            out
        }
    }
}

/// Rebuild `id` with new immediate sub-terms (same order as [`children`]).
///
/// Connectives go through the simplifying constructors. Rebuilding an
/// `LaAnnot` re-reads each new summand as an affine term, so substituting an
/// arithmetic term for a summand keeps `s` normalized.
pub fn rebuild(tm: &mut TermManager, id: TermId, new_children: &[TermId]) -> TermId {
    let kind = tm.kind(id).clone();
    if children(&kind).as_slice() == new_children {
        return id;
    }
    let sort = tm.sort_of(id);
    let c = new_children;
    match kind {
        TermKind::True
        | TermKind::False
        | TermKind::IntConst(_)
        | TermKind::RealConst(_)
        | TermKind::Var(_)
        | TermKind::BoundVar(_) => id,
        TermKind::Not(_) => tm.mk_not(c[0]),
        TermKind::Neg(_) => tm.mk_neg(c[0]),
        TermKind::And(_) => tm.mk_and(c.iter().copied()),
        TermKind::Or(_) => tm.mk_or(c.iter().copied()),
        TermKind::Add(_) => tm.mk_add(c.iter().copied()),
        TermKind::Mul(_) => tm.mk_mul(c.iter().copied()),
        TermKind::Apply { func, .. } => tm.mk_apply_spur(func, c.iter().copied(), sort),
        TermKind::Implies(..) => tm.mk_implies(c[0], c[1]),
        TermKind::Eq(..) => tm.mk_eq(c[0], c[1]),
        TermKind::Sub(..) => tm.mk_sub(c[0], c[1]),
        TermKind::Div(..) => tm.mk_div(c[0], c[1]),
        TermKind::Le(..) => tm.mk_le(c[0], c[1]),
        TermKind::Lt(..) => tm.mk_lt(c[0], c[1]),
        TermKind::Ge(..) => tm.mk_ge(c[0], c[1]),
        TermKind::Gt(..) => tm.mk_gt(c[0], c[1]),
        TermKind::Select(..) => tm.mk_select(c[0], c[1]),
        TermKind::EqMarker(..) => tm.mk_eq_marker(c[0], c[1]),
        TermKind::Ite(..) => tm.mk_ite(c[0], c[1], c[2]),
        TermKind::Store(..) => tm.mk_store(c[0], c[1], c[2]),
        TermKind::Let { bindings, .. } => {
            let body = c[c.len() - 1];
            let bindings = bindings
                .iter()
                .zip(c.iter())
                .map(|((name, _), &value)| (*name, value))
                .collect();
            tm.mk_let_spur(bindings, body)
        }
        TermKind::Forall { vars, .. } => tm.mk_quantifier_spur(true, vars, c[0]),
        TermKind::Exists { vars, .. } => tm.mk_quantifier_spur(false, vars, c[0]),
        TermKind::LaAnnot(la) => {
            let formula = c[c.len() - 1];
            let mut s = AffineTerm::from_constant(la.s.constant().clone());
            for ((_, coeff), &new_summand) in la.s.summands().zip(c.iter()) {
                s.add(coeff, &AffineTerm::from_term(tm, new_summand));
            }
            tm.mk_la_annot(s, la.k.clone(), formula)
        }
    }
}

/// Decision of a [`rewrite`] visitor for one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Use this term instead; do not look inside the original.
    Replace(TermId),
    /// Rewrite the children and rebuild.
    Descend,
}

/// Bottom-up rewrite of the DAG below `root`.
///
/// `visit` is called once per distinct reachable term, top-down. Terms it
/// replaces are not entered; the others are rebuilt from their rewritten
/// children. Results are shared across the DAG.
pub fn rewrite<F>(tm: &mut TermManager, root: TermId, mut visit: F) -> Result<TermId>
where
    F: FnMut(&mut TermManager, TermId) -> Result<Visit>,
{
    let mut done: FxHashMap<TermId, TermId> = FxHashMap::default();
    let mut stack = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if done.contains_key(&id) {
            continue;
        }
        if expanded {
            let new_children: SmallVec<[TermId; 4]> = children(tm.kind(id))
                .iter()
                .map(|c| done.get(c).copied().unwrap_or(*c))
                .collect();
            let rebuilt = rebuild(tm, id, &new_children);
            done.insert(id, rebuilt);
            continue;
        }
        match visit(tm, id)? {
            Visit::Replace(replacement) => {
                done.insert(id, replacement);
            }
            Visit::Descend => {
                stack.push((id, true));
                for child in children(tm.kind(id)) {
                    if !done.contains_key(&child) {
                        stack.push((child, false));
                    }
                }
            }
        }
    }
    Ok(done.get(&root).copied().unwrap_or(root))
}

/// Simultaneously replace the keys of `map` by their values.
///
/// Binders are respected: a `let` or quantifier that rebinds a key hides it
/// in its body, and a bound variable that would capture a free variable of
/// some value is renamed first. Only binder nesting recurses.
pub fn substitute(tm: &mut TermManager, root: TermId, map: &FxHashMap<TermId, TermId>) -> TermId {
    if map.is_empty() {
        return root;
    }
    let result = rewrite(tm, root, |tm, id| {
        if let Some(&replacement) = map.get(&id) {
            return Ok(Visit::Replace(replacement));
        }
        Ok(match substitute_under_binder(tm, id, map) {
            Some(replacement) => Visit::Replace(replacement),
            None => Visit::Descend,
        })
    });
    // The visitor never fails.
    result.unwrap_or(root)
}

/// Replace a single term.
pub fn substitute_one(tm: &mut TermManager, root: TermId, from: TermId, to: TermId) -> TermId {
    let mut map = FxHashMap::default();
    map.insert(from, to);
    substitute(tm, root, &map)
}

/// Names and bound-variable terms introduced by a binder, or `None` if `id`
/// binds nothing.
fn bound_vars(tm: &mut TermManager, id: TermId) -> Option<SmallVec<[(Spur, TermId); 2]>> {
    match tm.kind(id).clone() {
        TermKind::Let { bindings, .. } => Some(
            bindings
                .iter()
                .map(|&(name, value)| {
                    let sort = tm.sort_of(value);
                    (name, tm.mk_bound_var_spur(name, sort))
                })
                .collect(),
        ),
        TermKind::Forall { vars, .. } | TermKind::Exists { vars, .. } => Some(
            vars.iter()
                .map(|&(name, sort)| (name, tm.mk_bound_var_spur(name, sort)))
                .collect(),
        ),
        _ => None,
    }
}

/// Substitution below a binder that shadows a key of `map` or captures a
/// variable of one of its values. `None` if plain descent is correct.
fn substitute_under_binder(
    tm: &mut TermManager,
    id: TermId,
    map: &FxHashMap<TermId, TermId>,
) -> Option<TermId> {
    let bound = bound_vars(tm, id)?;
    let captures = |tm: &TermManager, var: TermId| map.values().any(|&v| contains(tm, v, var));
    if !bound
        .iter()
        .any(|&(_, var)| map.contains_key(&var) || captures(tm, var))
    {
        return None;
    }

    let mut inner = map.clone();
    let mut names: SmallVec<[Spur; 2]> = SmallVec::new();
    for (name, var) in bound {
        inner.remove(&var);
        if captures(tm, var) {
            let prefix = tm.resolve(name).to_owned();
            let sort = tm.sort_of(var);
            let fresh = tm.mk_fresh_var(&prefix, sort);
            inner.insert(var, fresh);
            names.push(match tm.kind(fresh) {
                TermKind::BoundVar(fresh_name) => *fresh_name,
                _ => name,
            });
        } else {
            names.push(name);
        }
    }

    Some(match tm.kind(id).clone() {
        TermKind::Let { bindings, body } => {
            // Bound values lie outside the scope of the binding.
            let values: Vec<TermId> = bindings
                .iter()
                .map(|&(_, value)| substitute(tm, value, map))
                .collect();
            let body = substitute(tm, body, &inner);
            tm.mk_let_spur(names.into_iter().zip(values).collect(), body)
        }
        TermKind::Forall { vars, body } => {
            let body = substitute(tm, body, &inner);
            let vars = names.into_iter().zip(vars.iter().map(|&(_, sort)| sort)).collect();
            tm.mk_quantifier_spur(true, vars, body)
        }
        TermKind::Exists { vars, body } => {
            let body = substitute(tm, body, &inner);
            let vars = names.into_iter().zip(vars.iter().map(|&(_, sort)| sort)).collect();
            tm.mk_quantifier_spur(false, vars, body)
        }
        _ => return None,
    })
}

/// Expand `let` bindings and `define-fun` macros.
///
/// Expansion runs bottom-up, so an inner `let` is gone before the binding
/// around it is substituted. Fails with [`OxizError::Unsupported`] on a
/// macro whose expansion refers back to itself.
pub fn expand_definitions(tm: &mut TermManager, root: TermId) -> Result<TermId> {
    Expander::default().expand(tm, root)
}

#[derive(Default)]
struct Expander {
    /// Fully expanded macro bodies.
    bodies: FxHashMap<Spur, TermId>,
    /// Macros whose bodies are being expanded.
    active: Vec<Spur>,
}

impl Expander {
    fn expand(&mut self, tm: &mut TermManager, root: TermId) -> Result<TermId> {
        let mut done: FxHashMap<TermId, TermId> = FxHashMap::default();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if done.contains_key(&id) {
                continue;
            }
            if !expanded {
                stack.push((id, true));
                for child in children(tm.kind(id)) {
                    if !done.contains_key(&child) {
                        stack.push((child, false));
                    }
                }
                continue;
            }
            let new_children: SmallVec<[TermId; 4]> = children(tm.kind(id))
                .iter()
                .map(|c| done.get(c).copied().unwrap_or(*c))
                .collect();
            let result = match tm.kind(id).clone() {
                TermKind::Let { bindings, .. } => {
                    let body = new_children[new_children.len() - 1];
                    let mut map = FxHashMap::default();
                    for (&(name, _), &value) in bindings.iter().zip(&new_children) {
                        let sort = tm.sort_of(value);
                        let var = tm.mk_bound_var_spur(name, sort);
                        map.insert(var, value);
                    }
                    substitute(tm, body, &map)
                }
                TermKind::Apply { func, .. } if tm.definition(func).is_some() => {
                    let (params, body) = self.definition(tm, func)?;
                    let map: FxHashMap<TermId, TermId> =
                        params.into_iter().zip(new_children).collect();
                    substitute(tm, body, &map)
                }
                TermKind::Var(name) if tm.definition(name).is_some_and(|d| d.params.is_empty()) => {
                    self.definition(tm, name)?.1
                }
                _ => rebuild(tm, id, &new_children),
            };
            done.insert(id, result);
        }
        Ok(done.get(&root).copied().unwrap_or(root))
    }

    /// Parameters and expanded body of macro `name`.
    fn definition(&mut self, tm: &mut TermManager, name: Spur) -> Result<(Vec<TermId>, TermId)> {
        let Some(def) = tm.definition(name).cloned() else {
            return Err(OxizError::internal(format!(
                "{} is not a macro",
                tm.resolve(name)
            )));
        };
        if let Some(&body) = self.bodies.get(&name) {
            return Ok((def.params, body));
        }
        if self.active.contains(&name) {
            return Err(OxizError::unsupported(format!(
                "recursive definition of {}",
                tm.resolve(name)
            )));
        }
        self.active.push(name);
        let body = self.expand(tm, def.body);
        self.active.pop();
        let body = body?;
        self.bodies.insert(name, body);
        Ok((def.params, body))
    }
}

/// All distinct terms reachable from `root`, including `root`.
#[must_use]
pub fn collect_subterms(tm: &TermManager, root: TermId) -> FxHashSet<TermId> {
    let mut seen = FxHashSet::default();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            stack.extend(children(tm.kind(id)));
        }
    }
    seen
}

/// Whether `needle` occurs in `root`.
#[must_use]
pub fn contains(tm: &TermManager, root: TermId, needle: TermId) -> bool {
    let mut seen = FxHashSet::default();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if id == needle {
            return true;
        }
        if seen.insert(id) {
            stack.extend(children(tm.kind(id)));
        }
    }
    false
}

/// Function and constant symbols occurring in `root`. Bound variables are
/// not symbols.
#[must_use]
pub fn symbols(tm: &TermManager, root: TermId) -> FxHashSet<Spur> {
    let mut out = FxHashSet::default();
    for id in collect_subterms(tm, root) {
        if let Some(sym) = head_symbol(tm, id) {
            out.insert(sym);
        }
    }
    out
}

/// The outermost uninterpreted symbol of a term, if it has one.
#[must_use]
pub fn head_symbol(tm: &TermManager, id: TermId) -> Option<Spur> {
    match tm.kind(id) {
        TermKind::Var(name) => Some(*name),
        TermKind::Apply { func, .. } => Some(*func),
        _ => None,
    }
}

/// Height of every term below `root`: leaves have height 0.
#[must_use]
pub fn heights(tm: &TermManager, root: TermId) -> FxHashMap<TermId, usize> {
    let mut height: FxHashMap<TermId, usize> = FxHashMap::default();
    let mut stack = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if height.contains_key(&id) {
            continue;
        }
        let kids = children(tm.kind(id));
        if expanded || kids.is_empty() {
            let h = kids
                .iter()
                .filter_map(|c| height.get(c))
                .max()
                .map_or(0, |m| m + 1);
            height.insert(id, h);
        } else {
            stack.push((id, true));
            stack.extend(kids.iter().map(|&c| (c, false)));
        }
    }
    height
}

impl TermManager {
    pub(crate) fn mk_bound_var_spur(&mut self, name: Spur, sort: crate::sort::SortId) -> TermId {
        let name = self.resolve(name).to_owned();
        self.mk_bound_var(&name, sort)
    }
}
