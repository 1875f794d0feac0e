//! Property-based tests for AST operations
//!
//! This module tests fundamental properties of the AST such as:
//! - Term construction and uniqueness
//! - Semantics preserved by the simplifying builders
//! - Substitution and traversal consistency

use num_bigint::BigInt;
use oxiz_core::ast::{TermId, TermKind, TermManager, traversal};
use proptest::prelude::*;

/// Number of propositional variables in generated formulas
const VARS: usize = 3;

/// Strategy for generating small integers
fn small_int_strategy() -> impl Strategy<Value = i64> {
    -100i64..100i64
}

/// Strategy for generating variable names
fn var_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][0-9]?".prop_map(|s| s.to_string())
}

/// Propositional formula over `v0 … v{VARS-1}`, independent of any term
/// manager.
#[derive(Debug, Clone)]
enum Formula {
    Const(bool),
    Var(usize),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Ite(Box<Formula>, Box<Formula>, Box<Formula>),
}

fn formula_strategy() -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![
        proptest::bool::ANY.prop_map(Formula::Const),
        (0..VARS).prop_map(Formula::Var),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|f| Formula::Not(Box::new(f))),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Formula::And),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Formula::Or),
            (inner.clone(), inner.clone())
                .prop_map(|(a, b)| Formula::Implies(Box::new(a), Box::new(b))),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(c, t, e)| Formula::Ite(Box::new(c), Box::new(t), Box::new(e))),
        ]
    })
}

impl Formula {
    fn eval(&self, env: &[bool]) -> bool {
        match self {
            Formula::Const(b) => *b,
            Formula::Var(i) => env[*i],
            Formula::Not(f) => !f.eval(env),
            Formula::And(args) => args.iter().all(|f| f.eval(env)),
            Formula::Or(args) => args.iter().any(|f| f.eval(env)),
            Formula::Implies(a, b) => !a.eval(env) || b.eval(env),
            Formula::Ite(c, t, e) => {
                if c.eval(env) {
                    t.eval(env)
                } else {
                    e.eval(env)
                }
            }
        }
    }

    fn build(&self, tm: &mut TermManager, vars: &[TermId]) -> TermId {
        match self {
            Formula::Const(b) => tm.mk_bool(*b),
            Formula::Var(i) => vars[*i],
            Formula::Not(f) => {
                let f = f.build(tm, vars);
                tm.mk_not(f)
            }
            Formula::And(args) => {
                let args: Vec<TermId> = args.iter().map(|f| f.build(tm, vars)).collect();
                tm.mk_and(args)
            }
            Formula::Or(args) => {
                let args: Vec<TermId> = args.iter().map(|f| f.build(tm, vars)).collect();
                tm.mk_or(args)
            }
            Formula::Implies(a, b) => {
                let (a, b) = (a.build(tm, vars), b.build(tm, vars));
                tm.mk_implies(a, b)
            }
            Formula::Ite(c, t, e) => {
                let (c, t, e) = (c.build(tm, vars), t.build(tm, vars), e.build(tm, vars));
                tm.mk_ite(c, t, e)
            }
        }
    }
}

/// Evaluate a propositional term under an assignment of `vars`.
fn eval_term(tm: &TermManager, id: TermId, vars: &[TermId], env: &[bool]) -> bool {
    if let Some(i) = vars.iter().position(|&v| v == id) {
        return env[i];
    }
    match tm.kind(id) {
        TermKind::True => true,
        TermKind::False => false,
        TermKind::Not(a) => !eval_term(tm, *a, vars, env),
        TermKind::And(args) => args.iter().all(|&a| eval_term(tm, a, vars, env)),
        TermKind::Or(args) => args.iter().any(|&a| eval_term(tm, a, vars, env)),
        TermKind::Implies(a, b) => !eval_term(tm, *a, vars, env) || eval_term(tm, *b, vars, env),
        TermKind::Ite(c, t, e) => {
            if eval_term(tm, *c, vars, env) {
                eval_term(tm, *t, vars, env)
            } else {
                eval_term(tm, *e, vars, env)
            }
        }
        other => panic!("unexpected term {other:?}"),
    }
}

fn assignments() -> impl Iterator<Item = Vec<bool>> {
    (0..1u32 << VARS).map(|bits| (0..VARS).map(|i| bits & (1 << i) != 0).collect())
}

fn mk_vars(tm: &mut TermManager) -> Vec<TermId> {
    let sort = tm.sorts.bool_sort;
    (0..VARS).map(|i| tm.mk_var(&format!("v{i}"), sort)).collect()
}

proptest! {
    // =====================================
    // Term Construction Properties
    // =====================================

    /// Test that creating the same integer constant twice yields the same TermId
    #[test]
    fn integer_constant_uniqueness(n in small_int_strategy()) {
        let mut tm = TermManager::new();
        let t1 = tm.mk_int(BigInt::from(n));
        let t2 = tm.mk_int(BigInt::from(n));
        prop_assert_eq!(t1, t2);
    }

    /// Test that variables with the same name have the same TermId
    #[test]
    fn variable_uniqueness(name in var_name_strategy()) {
        let mut tm = TermManager::new();
        let sort = tm.sorts.int_sort;
        let v1 = tm.mk_var(&name, sort);
        let v2 = tm.mk_var(&name, sort);
        prop_assert_eq!(v1, v2);
        prop_assert_eq!(tm.display(v1).to_string(), name);
    }

    /// Test that fresh variables never collide with each other
    #[test]
    fn fresh_variables_are_distinct(count in 1usize..20) {
        let mut tm = TermManager::new();
        let sort = tm.sorts.int_sort;
        let vars: Vec<TermId> = (0..count).map(|_| tm.mk_fresh_var("aux", sort)).collect();
        for (i, a) in vars.iter().enumerate() {
            prop_assert!(vars[i + 1..].iter().all(|b| a != b));
        }
    }

    // =====================================
    // Simplification Properties
    // =====================================

    /// Test that the folding builders never change the meaning of a formula
    #[test]
    fn builders_preserve_semantics(f in formula_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let term = f.build(&mut tm, &vars);
        for env in assignments() {
            prop_assert_eq!(eval_term(&tm, term, &vars, &env), f.eval(&env));
        }
    }

    /// Test that double negation is removed
    #[test]
    fn double_negation_folds(f in formula_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let term = f.build(&mut tm, &vars);
        let not_term = tm.mk_not(term);
        prop_assert_eq!(tm.mk_not(not_term), term);
    }

    /// Test that conjunctions are flattened and deduplicated
    #[test]
    fn conjunction_is_flat(f in formula_strategy(), g in formula_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let (a, b) = (f.build(&mut tm, &vars), g.build(&mut tm, &vars));
        let inner = tm.mk_and([a, b]);
        let outer = tm.mk_and([a, inner, b]);
        prop_assert_eq!(outer, inner);
        if let TermKind::And(args) = tm.kind(inner) {
            prop_assert!(args.iter().all(|&arg| !matches!(tm.kind(arg), TermKind::And(_))));
        }
    }

    // =====================================
    // Comparison Properties
    // =====================================

    /// Test that comparisons between numerals fold to their truth value
    #[test]
    fn numeral_comparisons_fold(a in small_int_strategy(), b in small_int_strategy()) {
        let mut tm = TermManager::new();
        let ta = tm.mk_int(BigInt::from(a));
        let tb = tm.mk_int(BigInt::from(b));
        let neg_b = tm.mk_neg(tb);

        let le = tm.mk_le(ta, tb);
        let lt = tm.mk_lt(ta, tb);
        let gt = tm.mk_gt(ta, neg_b);
        prop_assert_eq!(le, tm.mk_bool(a <= b));
        prop_assert_eq!(lt, tm.mk_bool(a < b));
        prop_assert_eq!(gt, tm.mk_bool(a > -b));
    }

    /// Test that x = x is always true
    #[test]
    fn equality_reflexive(name in var_name_strategy()) {
        let mut tm = TermManager::new();
        let sort = tm.sorts.int_sort;
        let x = tm.mk_var(&name, sort);
        prop_assert_eq!(tm.mk_eq(x, x), tm.mk_bool(true));
    }

    // =====================================
    // Substitution Properties
    // =====================================

    /// Test that substituting a variable with itself yields the original term
    #[test]
    fn identity_substitution(f in formula_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let term = f.build(&mut tm, &vars);
        prop_assert_eq!(traversal::substitute_one(&mut tm, term, vars[0], vars[0]), term);
    }

    /// Test that substituting a constant fixes the variable
    #[test]
    fn constant_substitution(f in formula_strategy(), value in proptest::bool::ANY) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let term = f.build(&mut tm, &vars);
        let constant = tm.mk_bool(value);
        let fixed = traversal::substitute_one(&mut tm, term, vars[0], constant);
        prop_assert!(!traversal::contains(&tm, fixed, vars[0]));
        for mut env in assignments() {
            let actual = eval_term(&tm, fixed, &vars, &env);
            env[0] = value;
            prop_assert_eq!(actual, f.eval(&env));
        }
    }

    // =====================================
    // Traversal Properties
    // =====================================

    /// Test that every collected subterm is contained in the root and the
    /// root is the highest of them
    #[test]
    fn subterms_are_contained(f in formula_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let term = f.build(&mut tm, &vars);
        let subterms = traversal::collect_subterms(&tm, term);
        prop_assert!(subterms.contains(&term));
        let heights = traversal::heights(&tm, term);
        for &sub in &subterms {
            prop_assert!(traversal::contains(&tm, term, sub));
            prop_assert!(heights[&sub] <= heights[&term]);
        }
    }

    /// Test that the symbols of a formula are exactly its free variables
    #[test]
    fn symbols_are_free_variables(f in formula_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let term = f.build(&mut tm, &vars);
        let symbols = traversal::symbols(&tm, term);
        for &v in &vars {
            let TermKind::Var(name) = tm.kind(v) else {
                unreachable!()
            };
            prop_assert_eq!(symbols.contains(name), traversal::contains(&tm, term, v));
        }
    }
}
