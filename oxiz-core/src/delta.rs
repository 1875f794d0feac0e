//! Rationals extended with an infinitesimal.
//!
//! A [`DeltaRational`] `r + k·ε` stands for a value that is infinitesimally
//! larger (`k > 0`) or smaller (`k < 0`) than `r`. Strict bounds are encoded
//! with it: `s < 0` is the same as `s + ε ≤ 0`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg};

/// A rational number plus an integer multiple of ε.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeltaRational {
    /// Real part
    pub real: BigRational,
    /// Coefficient of ε
    pub eps: i32,
}

impl DeltaRational {
    /// Create `real + eps·ε`.
    pub fn new(real: BigRational, eps: i32) -> Self {
        Self { real, eps }
    }

    /// Zero.
    pub fn zero() -> Self {
        Self::new(BigRational::zero(), 0)
    }

    /// The infinitesimal ε itself.
    pub fn epsilon() -> Self {
        Self::new(BigRational::zero(), 1)
    }

    /// An integer with no infinitesimal part.
    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self::new(BigRational::from_integer(n.into()), 0)
    }

    /// A rational with no infinitesimal part.
    pub fn from_rational(real: BigRational) -> Self {
        Self::new(real, 0)
    }

    /// Multiply by a rational. The ε coefficient only follows the sign.
    #[must_use]
    pub fn mul_rational(&self, factor: &BigRational) -> Self {
        let sign = if factor.is_positive() {
            1
        } else if factor.is_negative() {
            -1
        } else {
            0
        };
        Self::new(&self.real * factor, self.eps * sign)
    }

    /// Whether this is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.real.is_zero() && self.eps == 0
    }

    /// Whether this is an integer without infinitesimal part.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.eps == 0 && self.real.is_integer()
    }

    /// Whether this is strictly below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        *self < Self::zero()
    }

    /// `⌈(real + 1) / divisor⌉`, used to bound integer case splits.
    #[must_use]
    pub fn ceil_successor_div(&self, divisor: &BigRational) -> BigRational {
        ((&self.real + BigRational::one()) / divisor).ceil()
    }
}

impl Add for &DeltaRational {
    type Output = DeltaRational;

    fn add(self, rhs: &DeltaRational) -> DeltaRational {
        DeltaRational::new(&self.real + &rhs.real, self.eps + rhs.eps)
    }
}

impl Neg for &DeltaRational {
    type Output = DeltaRational;

    fn neg(self) -> DeltaRational {
        DeltaRational::new(-&self.real, -self.eps)
    }
}

impl PartialOrd for DeltaRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeltaRational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.real
            .cmp(&other.real)
            .then_with(|| self.eps.cmp(&other.eps))
    }
}

impl Default for DeltaRational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for DeltaRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.eps {
            0 => write!(f, "{}", self.real),
            1 => write!(f, "{}+eps", self.real),
            -1 => write!(f, "{}-eps", self.real),
            k => write!(f, "{}{:+}eps", self.real, k),
        }
    }
}
