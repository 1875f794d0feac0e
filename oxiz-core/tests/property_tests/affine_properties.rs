//! Property-based tests for affine terms and delta-rationals
//!
//! Affine terms are evaluated at random integer points and compared with
//! the arithmetic they are supposed to represent.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use oxiz_core::ast::{TermId, TermManager};
use oxiz_core::{AffineTerm, DeltaRational};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

/// Number of variables in generated affine terms
const VARS: usize = 3;

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

/// Strategy for generating small integers
fn small_int_strategy() -> impl Strategy<Value = i64> {
    -20i64..20i64
}

/// Coefficients for `x0 … x{VARS-1}` followed by the constant.
fn coeffs_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(small_int_strategy(), VARS + 1)
}

fn point_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(small_int_strategy(), VARS)
}

fn mk_vars(tm: &mut TermManager) -> Vec<TermId> {
    let sort = tm.sorts.int_sort;
    (0..VARS).map(|i| tm.mk_var(&format!("x{i}"), sort)).collect()
}

fn affine(vars: &[TermId], coeffs: &[i64]) -> AffineTerm {
    let mut term = AffineTerm::from_constant(DeltaRational::from_integer(coeffs[VARS]));
    for (&var, &c) in vars.iter().zip(coeffs) {
        term.add_term(&rat(c), var);
    }
    term
}

/// Real part of the value of `term` at `point`.
fn value(term: &AffineTerm, vars: &[TermId], point: &[i64]) -> BigRational {
    let env: FxHashMap<TermId, BigRational> =
        vars.iter().zip(point).map(|(&v, &x)| (v, rat(x))).collect();
    let mut sum = term.constant().real.clone();
    for (t, c) in term.summands() {
        sum += c * &env[&t];
    }
    sum
}

proptest! {
    // =====================================
    // Affine Term Properties
    // =====================================

    /// Test that zero coefficients are never stored
    #[test]
    fn no_zero_coefficients(coeffs in coeffs_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let term = affine(&vars, &coeffs);
        prop_assert!(term.summands().all(|(_, c)| !c.is_zero()));
        prop_assert_eq!(term.is_constant(), coeffs[..VARS].iter().all(|&c| c == 0));
    }

    /// Test that `add` is linear
    #[test]
    fn add_is_linear(
        a in coeffs_strategy(),
        b in coeffs_strategy(),
        factor in small_int_strategy(),
        point in point_strategy(),
    ) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let (ta, tb) = (affine(&vars, &a), affine(&vars, &b));
        let mut sum = ta.clone();
        sum.add(&rat(factor), &tb);
        prop_assert_eq!(
            value(&sum, &vars, &point),
            value(&ta, &vars, &point) + rat(factor) * value(&tb, &vars, &point)
        );
    }

    /// Test that `mul` scales the value
    #[test]
    fn mul_scales(a in coeffs_strategy(), factor in small_int_strategy(), point in point_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let ta = affine(&vars, &a);
        let mut scaled = ta.clone();
        scaled.mul(&rat(factor));
        prop_assert_eq!(value(&scaled, &vars, &point), rat(factor) * value(&ta, &vars, &point));
        if factor == 0 {
            prop_assert_eq!(scaled, AffineTerm::new());
        }
    }

    /// Test that reading back a built term gives the same affine term
    #[test]
    fn term_reads_back(a in coeffs_strategy()) {
        let mut tm = TermManager::new();
        let vars = mk_vars(&mut tm);
        let ta = affine(&vars, &a);
        let int = tm.sorts.int_sort;
        let term = ta.to_term(&mut tm, int);
        prop_assert_eq!(AffineTerm::from_term(&tm, term), ta);
    }

    /// Test that constant bounds fold to their truth value
    #[test]
    fn constant_bounds_fold(k in small_int_strategy(), strict in proptest::bool::ANY) {
        let mut tm = TermManager::new();
        let eps = i32::from(strict);
        let term = AffineTerm::from_constant(DeltaRational::new(rat(k), eps));
        let int = tm.sorts.int_sort;
        let folded = term.to_leq0(&mut tm, int);
        prop_assert_eq!(folded, tm.mk_bool(k < 0 || (k == 0 && !strict)));
    }

    // =====================================
    // Delta-Rational Properties
    // =====================================

    /// Test that the order is lexicographic in the real and ε parts
    #[test]
    fn delta_order_is_lexicographic(
        a in small_int_strategy(),
        b in small_int_strategy(),
        ea in -2i32..3,
        eb in -2i32..3,
    ) {
        let (x, y) = (DeltaRational::new(rat(a), ea), DeltaRational::new(rat(b), eb));
        prop_assert_eq!(x.cmp(&y), a.cmp(&b).then(ea.cmp(&eb)));
        prop_assert_eq!((-&x).cmp(&-&y), y.cmp(&x));
    }

    /// Test that scaling by a positive factor preserves the order
    #[test]
    fn positive_scaling_is_monotone(
        a in small_int_strategy(),
        b in small_int_strategy(),
        ea in -2i32..3,
        eb in -2i32..3,
        factor in 1i64..10,
    ) {
        let (x, y) = (DeltaRational::new(rat(a), ea), DeltaRational::new(rat(b), eb));
        let f = rat(factor);
        prop_assert_eq!(x.mul_rational(&f).cmp(&y.mul_rational(&f)), x.cmp(&y));
        let sum = &x + &y;
        prop_assert_eq!(sum, DeltaRational::new(rat(a + b), ea + eb));
    }

    /// Test the bounds of `ceil_successor_div`
    #[test]
    fn ceil_successor_div_bounds(k in small_int_strategy(), divisor in 1i64..10) {
        let d = rat(divisor);
        let q = DeltaRational::from_integer(k).ceil_successor_div(&d);
        let target = rat(k + 1);
        prop_assert!(q.is_integer());
        prop_assert!(&q * &d >= target);
        prop_assert!((&q - rat(1)) * &d < target);
    }
}
