//! Shared helpers for the integration tests: a brute-force evaluator over
//! small integer domains and a checker for the tree interpolation laws.

#![allow(dead_code)]

use lasso::Spur;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use oxiz_core::ast::traversal::collect_subterms;
use oxiz_core::ast::{TermId, TermKind, TermManager};
use oxiz_interpolate::PartitionTree;
use std::collections::HashMap;

/// Route engine logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Values of the variables during evaluation.
pub type Env = HashMap<Spur, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Num(BigRational),
}

impl Value {
    fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Num(_) => None,
        }
    }

    fn as_num(&self) -> Option<&BigRational> {
        match self {
            Value::Num(n) => Some(n),
            Value::Bool(_) => None,
        }
    }
}

/// Integer domain used for variables and quantifiers.
pub const RANGE: i64 = 5;

fn domain(tm: &TermManager, sort: oxiz_core::SortId) -> Vec<Value> {
    if sort == tm.sorts.bool_sort {
        vec![Value::Bool(false), Value::Bool(true)]
    } else {
        (-RANGE..=RANGE)
            .map(|n| Value::Num(BigRational::from_integer(BigInt::from(n))))
            .collect()
    }
}

/// Evaluate `id` under `env`. Returns `None` for terms the evaluator does
/// not interpret (uninterpreted functions, arrays, markers).
pub fn eval(tm: &TermManager, id: TermId, env: &mut Env) -> Option<Value> {
    let num = |tm: &TermManager, t: TermId, env: &mut Env| -> Option<BigRational> {
        eval(tm, t, env)?.as_num().cloned()
    };
    let boolean = |tm: &TermManager, t: TermId, env: &mut Env| -> Option<bool> {
        eval(tm, t, env)?.as_bool()
    };
    let value = match tm.kind(id) {
        TermKind::True => Value::Bool(true),
        TermKind::False => Value::Bool(false),
        TermKind::IntConst(n) => Value::Num(BigRational::from_integer(n.clone())),
        TermKind::RealConst(r) => Value::Num(r.clone()),
        TermKind::Var(name) | TermKind::BoundVar(name) => env.get(name)?.clone(),
        TermKind::Not(a) => Value::Bool(!boolean(tm, *a, env)?),
        TermKind::And(args) => {
            let mut all = true;
            for &a in args {
                all &= boolean(tm, a, env)?;
            }
            Value::Bool(all)
        }
        TermKind::Or(args) => {
            let mut any = false;
            for &a in args {
                any |= boolean(tm, a, env)?;
            }
            Value::Bool(any)
        }
        TermKind::Implies(a, b) => Value::Bool(!boolean(tm, *a, env)? || boolean(tm, *b, env)?),
        TermKind::Ite(c, t, e) => {
            if boolean(tm, *c, env)? {
                eval(tm, *t, env)?
            } else {
                eval(tm, *e, env)?
            }
        }
        TermKind::Eq(a, b) => Value::Bool(eval(tm, *a, env)? == eval(tm, *b, env)?),
        TermKind::Add(args) => {
            let mut sum = BigRational::zero();
            for &a in args {
                sum += num(tm, a, env)?;
            }
            Value::Num(sum)
        }
        TermKind::Mul(args) => {
            let mut product = BigRational::from_integer(BigInt::from(1));
            for &a in args {
                product *= num(tm, a, env)?;
            }
            Value::Num(product)
        }
        TermKind::Sub(a, b) => Value::Num(num(tm, *a, env)? - num(tm, *b, env)?),
        TermKind::Neg(a) => Value::Num(-num(tm, *a, env)?),
        TermKind::Div(a, b) => {
            let (a, b) = (num(tm, *a, env)?, num(tm, *b, env)?);
            if b.is_zero() {
                return None;
            }
            let q = a / &b;
            if tm.sort_of(id) == tm.sorts.int_sort {
                // SMT-LIB div rounds towards -∞ for positive divisors
                let q = if b.is_positive() { q.floor() } else { q.ceil() };
                Value::Num(q)
            } else {
                Value::Num(q)
            }
        }
        TermKind::Le(a, b) => Value::Bool(num(tm, *a, env)? <= num(tm, *b, env)?),
        TermKind::Lt(a, b) => Value::Bool(num(tm, *a, env)? < num(tm, *b, env)?),
        TermKind::Ge(a, b) => Value::Bool(num(tm, *a, env)? >= num(tm, *b, env)?),
        TermKind::Gt(a, b) => Value::Bool(num(tm, *a, env)? > num(tm, *b, env)?),
        TermKind::Let { bindings, body } => {
            let mut saved = Vec::with_capacity(bindings.len());
            let mut values = Vec::with_capacity(bindings.len());
            for (_, value) in bindings {
                values.push(eval(tm, *value, env)?);
            }
            for ((name, _), value) in bindings.iter().zip(values) {
                saved.push((*name, env.insert(*name, value)));
            }
            let result = eval(tm, *body, env);
            restore(env, saved);
            result?
        }
        TermKind::Forall { vars, body } | TermKind::Exists { vars, body } => {
            let universal = matches!(tm.kind(id), TermKind::Forall { .. });
            let vars: Vec<_> = vars.iter().copied().collect();
            let body = *body;
            let mut result = universal;
            let domains: Vec<Vec<Value>> = vars.iter().map(|&(_, s)| domain(tm, s)).collect();
            let names: Vec<Spur> = vars.iter().map(|&(n, _)| n).collect();
            for assignment in product(&domains) {
                let saved: Vec<_> = names
                    .iter()
                    .zip(assignment)
                    .map(|(&n, v)| (n, env.insert(n, v)))
                    .collect();
                let holds = boolean(tm, body, env);
                restore(env, saved);
                if holds? != universal {
                    result = !universal;
                    break;
                }
            }
            Value::Bool(result)
        }
        TermKind::Select(..)
        | TermKind::Store(..)
        | TermKind::Apply { .. }
        | TermKind::EqMarker(..)
        | TermKind::LaAnnot(_) => return None,
    };
    Some(value)
}

fn restore(env: &mut Env, saved: Vec<(Spur, Option<Value>)>) {
    for (name, previous) in saved.into_iter().rev() {
        match previous {
            Some(v) => env.insert(name, v),
            None => env.remove(&name),
        };
    }
}

/// Cartesian product of the domains.
fn product(domains: &[Vec<Value>]) -> Vec<Vec<Value>> {
    let mut out = vec![Vec::new()];
    for domain in domains {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                domain.iter().map(move |v| {
                    let mut next = prefix.clone();
                    next.push(v.clone());
                    next
                })
            })
            .collect();
    }
    out
}

/// Free constants of the given terms with their sorts.
pub fn free_vars(tm: &TermManager, terms: &[TermId]) -> Vec<(Spur, oxiz_core::SortId)> {
    let mut vars = Vec::new();
    for &t in terms {
        for id in collect_subterms(tm, t) {
            if let TermKind::Var(name) = tm.kind(id) {
                let entry = (*name, tm.sort_of(id));
                if !vars.contains(&entry) {
                    vars.push(entry);
                }
            }
        }
    }
    vars
}

/// Check the tree interpolation laws by enumerating all assignments.
///
/// `groups[i]` holds the assertions of group `i`, the last entry being the
/// root group. For every group `i` with children `c`, the conjunction of
/// `groups[i]` and the interpolants of `c` must imply interpolant `i`; for
/// the root it must be unsatisfiable.
pub fn assert_tree_interpolants(
    tm: &TermManager,
    tree: &PartitionTree,
    groups: &[Vec<TermId>],
    interpolants: &[TermId],
) {
    assert_eq!(groups.len(), tree.num_interpolants() + 1);
    assert_eq!(interpolants.len(), tree.num_interpolants());
    let mut all: Vec<TermId> = groups.iter().flatten().copied().collect();
    all.extend_from_slice(interpolants);
    let vars = free_vars(tm, &all);
    let domains: Vec<Vec<Value>> = vars.iter().map(|&(_, s)| domain(tm, s)).collect();

    for assignment in product(&domains) {
        let mut env: Env = vars.iter().map(|&(n, _)| n).zip(assignment).collect();
        let mut value = |t: TermId| -> bool {
            eval(tm, t, &mut env)
                .and_then(|v| v.as_bool())
                .unwrap_or_else(|| panic!("cannot evaluate {}", tm.display(t)))
        };
        for i in 0..=tree.num_interpolants() {
            let premises = groups[i].iter().all(|&a| value(a))
                && tree.children(i).all(|c| value(interpolants[c]));
            let conclusion = i < tree.num_interpolants() && value(interpolants[i]);
            assert!(
                !premises || conclusion,
                "interpolant {} fails at group {i}",
                interpolants
                    .get(i)
                    .map_or_else(|| "false".to_string(), |&t| tm.display(t).to_string())
            );
        }
    }
}

/// Binary partition with one assertion name per side.
pub fn binary() -> PartitionTree {
    PartitionTree::binary(vec!["A".to_string()], vec!["B".to_string()]).unwrap()
}

/// Integer constant as a rational.
pub fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}
