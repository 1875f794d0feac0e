//! Affine combinations of terms.

use crate::ast::{TermId, TermKind, TermManager};
use crate::delta::DeltaRational;
use crate::sort::SortId;
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::collections::BTreeMap;

/// `Σ cᵢ·tᵢ + c` with rational coefficients and a [`DeltaRational`] constant.
///
/// Summands are kept sorted by term id, so two affine terms with the same
/// content compare and hash equal. Zero coefficients are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AffineTerm {
    summands: BTreeMap<TermId, BigRational>,
    constant: DeltaRational,
}

impl AffineTerm {
    /// The zero term.
    pub fn new() -> Self {
        Self::default()
    }

    /// A constant.
    pub fn from_constant(constant: DeltaRational) -> Self {
        Self {
            summands: BTreeMap::new(),
            constant,
        }
    }

    /// Read an arithmetic term as an affine combination.
    ///
    /// Sums, differences, negations, products with a single non-constant
    /// factor and real division by a literal are flattened. Everything else
    /// becomes an opaque summand.
    pub fn from_term(tm: &TermManager, term: TermId) -> Self {
        let mut result = Self::new();
        let mut stack = vec![(term, BigRational::one())];
        while let Some((id, factor)) = stack.pop() {
            match tm.kind(id) {
                TermKind::IntConst(_) | TermKind::RealConst(_) => {
                    if let Some(value) = tm.numeral(id) {
                        result.add_constant(&DeltaRational::from_rational(value * &factor));
                    }
                }
                TermKind::Add(args) => {
                    stack.extend(args.iter().map(|&a| (a, factor.clone())));
                }
                TermKind::Sub(lhs, rhs) => {
                    stack.push((*lhs, factor.clone()));
                    stack.push((*rhs, -factor));
                }
                TermKind::Neg(arg) => stack.push((*arg, -factor)),
                TermKind::Mul(args) => {
                    let mut product = factor.clone();
                    let mut opaque = Vec::new();
                    for &arg in args {
                        match tm.numeral(arg) {
                            Some(value) => product *= value,
                            None => opaque.push(arg),
                        }
                    }
                    match opaque.as_slice() {
                        [] => result.add_constant(&DeltaRational::from_rational(product)),
                        [single] => stack.push((*single, product)),
                        _ => result.add_term(&factor, id),
                    }
                }
                TermKind::Div(lhs, rhs) if tm.sort_of(id) == tm.sorts.real_sort => {
                    match tm.numeral(*rhs).filter(|d| !d.is_zero()) {
                        Some(divisor) => stack.push((*lhs, factor / divisor)),
                        None => result.add_term(&factor, id),
                    }
                }
                _ => result.add_term(&factor, id),
            }
        }
        result
    }

    /// Add `coeff·term`.
    pub fn add_term(&mut self, coeff: &BigRational, term: TermId) {
        let entry = self.summands.entry(term).or_insert_with(BigRational::zero);
        *entry += coeff;
        if entry.is_zero() {
            self.summands.remove(&term);
        }
    }

    /// Add `coeff·other`.
    pub fn add(&mut self, coeff: &BigRational, other: &AffineTerm) {
        for (&term, c) in &other.summands {
            self.add_term(&(c * coeff), term);
        }
        self.constant = &self.constant + &other.constant.mul_rational(coeff);
    }

    /// Add a constant.
    pub fn add_constant(&mut self, value: &DeltaRational) {
        self.constant = &self.constant + value;
    }

    /// Multiply every coefficient and the constant by `factor`.
    pub fn mul(&mut self, factor: &BigRational) {
        if factor.is_zero() {
            self.summands.clear();
            self.constant = DeltaRational::zero();
            return;
        }
        for coeff in self.summands.values_mut() {
            *coeff *= factor;
        }
        self.constant = self.constant.mul_rational(factor);
    }

    /// Remove a summand, returning its coefficient.
    pub fn remove(&mut self, term: TermId) -> Option<BigRational> {
        self.summands.remove(&term)
    }

    /// Coefficient of `term`, if it occurs.
    #[must_use]
    pub fn coefficient(&self, term: TermId) -> Option<&BigRational> {
        self.summands.get(&term)
    }

    /// Summands in term-id order.
    pub fn summands(&self) -> impl Iterator<Item = (TermId, &BigRational)> + '_ {
        self.summands.iter().map(|(&t, c)| (t, c))
    }

    /// The constant part.
    #[must_use]
    pub fn constant(&self) -> &DeltaRational {
        &self.constant
    }

    /// Whether there are no summands.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.summands.is_empty()
    }

    /// Whether every coefficient is an integer.
    #[must_use]
    pub fn has_integral_coefficients(&self) -> bool {
        self.summands.values().all(|c| c.is_integer())
    }

    /// Build the term `Σ cᵢ·tᵢ + c` of the given numeric sort. The ε part of
    /// the constant is dropped.
    pub fn to_term(&self, tm: &mut TermManager, sort: SortId) -> TermId {
        let mut parts = Vec::with_capacity(self.summands.len() + 1);
        for (&term, coeff) in &self.summands {
            if coeff.is_one() {
                parts.push(term);
            } else if (-coeff).is_one() {
                parts.push(tm.mk_neg(term));
            } else {
                let c = tm.mk_rational(coeff, sort);
                parts.push(tm.mk_mul([c, term]));
            }
        }
        if !self.constant.real.is_zero() || parts.is_empty() {
            parts.push(tm.mk_rational(&self.constant.real, sort));
        }
        tm.mk_add(parts)
    }

    /// Build `self ≤ 0`, or `self < 0` when the constant carries a positive
    /// ε part. Constant terms fold to `true` or `false`.
    pub fn to_leq0(&self, tm: &mut TermManager, sort: SortId) -> TermId {
        if self.is_constant() {
            return tm.mk_bool(self.constant <= DeltaRational::zero());
        }
        let mut lhs = self.clone();
        let constant = lhs.constant.real.clone();
        lhs.constant = DeltaRational::zero();
        let lhs_term = lhs.to_term(tm, sort);
        let rhs = tm.mk_rational(&-constant, sort);
        if self.constant.eps > 0 {
            tm.mk_lt(lhs_term, rhs)
        } else {
            tm.mk_le(lhs_term, rhs)
        }
    }
}
