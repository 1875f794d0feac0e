//! Atom classification and per-atom interpolation data.

use crate::occurrence::Occurrence;
use num_rational::BigRational;
use num_traits::One;
use oxiz_core::ast::{TermId, TermKind, TermManager};
use oxiz_core::{AffineTerm, DeltaRational, SortId};

/// How an atom takes part in mixed-literal elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomKind {
    /// Equality between two terms of an uninterpreted or array sort, or
    /// between plain numeric symbols
    CcEquality {
        /// Left-hand side
        lhs: TermId,
        /// Right-hand side
        rhs: TermId,
    },
    /// Arithmetic equality `affine = 0`
    LaEquality {
        /// `lhs - rhs`
        affine: AffineTerm,
        /// `Int` or `Real`
        sort: SortId,
    },
    /// Arithmetic bound `affine ≤ 0`; strictness lives in the ε part of the
    /// constant (integer bounds are tightened instead)
    Bound {
        /// Normalized bound term
        affine: AffineTerm,
        /// `Int` or `Real`
        sort: SortId,
    },
    /// Anything else (Boolean atoms, predicates)
    Other,
}

impl AtomKind {
    /// Classify an atom.
    pub fn classify(tm: &TermManager, atom: TermId) -> Self {
        match tm.kind(atom) {
            TermKind::Eq(lhs, rhs) => {
                let sort = tm.sort_of(*lhs);
                if tm.sorts.is_numeric(sort) && (is_arithmetic(tm, *lhs) || is_arithmetic(tm, *rhs))
                {
                    let mut affine = AffineTerm::from_term(tm, *lhs);
                    affine.add(&-BigRational::one(), &AffineTerm::from_term(tm, *rhs));
                    AtomKind::LaEquality { affine, sort }
                } else {
                    AtomKind::CcEquality {
                        lhs: *lhs,
                        rhs: *rhs,
                    }
                }
            }
            TermKind::Le(lhs, rhs) => bound(tm, *lhs, *rhs, false),
            TermKind::Lt(lhs, rhs) => bound(tm, *lhs, *rhs, true),
            TermKind::Ge(lhs, rhs) => bound(tm, *rhs, *lhs, false),
            TermKind::Gt(lhs, rhs) => bound(tm, *rhs, *lhs, true),
            _ => AtomKind::Other,
        }
    }

    /// The affine part of an arithmetic atom.
    #[must_use]
    pub fn affine(&self) -> Option<&AffineTerm> {
        match self {
            AtomKind::LaEquality { affine, .. } | AtomKind::Bound { affine, .. } => Some(affine),
            _ => None,
        }
    }
}

fn is_arithmetic(tm: &TermManager, id: TermId) -> bool {
    matches!(
        tm.kind(id),
        TermKind::IntConst(_)
            | TermKind::RealConst(_)
            | TermKind::Add(_)
            | TermKind::Sub(..)
            | TermKind::Neg(_)
            | TermKind::Mul(_)
            | TermKind::Div(..)
    )
}

/// `lhs ≤ rhs` (or `<`) as `lhs - rhs (+ε) ≤ 0`.
fn bound(tm: &TermManager, lhs: TermId, rhs: TermId, strict: bool) -> AtomKind {
    let sort = tm.sort_of(lhs);
    let mut affine = AffineTerm::from_term(tm, lhs);
    affine.add(&-BigRational::one(), &AffineTerm::from_term(tm, rhs));
    if strict {
        let integral = sort == tm.sorts.int_sort
            && affine.has_integral_coefficients()
            && affine.constant().is_integral();
        if integral {
            affine.add_constant(&DeltaRational::from_integer(1));
        } else {
            affine.add_constant(&DeltaRational::epsilon());
        }
    }
    AtomKind::Bound { affine, sort }
}

/// Interpolation data of one atom.
#[derive(Debug, Clone)]
pub struct LitInfo {
    occurrence: Occurrence,
    mixed_var: Option<TermId>,
    lhs_occurrence: Option<Occurrence>,
    a_part: Vec<Option<AffineTerm>>,
}

impl LitInfo {
    /// Info for an atom with the given occurrence and no auxiliary data.
    #[must_use]
    pub fn new(occurrence: Occurrence) -> Self {
        Self {
            occurrence,
            mixed_var: None,
            lhs_occurrence: None,
            a_part: Vec::new(),
        }
    }

    /// Where the atom is visible.
    #[must_use]
    pub fn occurrence(&self) -> &Occurrence {
        &self.occurrence
    }

    pub(crate) fn occurrence_mut(&mut self) -> &mut Occurrence {
        &mut self.occurrence
    }

    /// Auxiliary variable standing for the shared value of a mixed atom.
    #[must_use]
    pub fn mixed_var(&self) -> Option<TermId> {
        self.mixed_var
    }

    /// For a mixed congruence equality: where its left-hand side is visible.
    #[must_use]
    pub fn lhs_occurrence(&self) -> Option<&Occurrence> {
        self.lhs_occurrence.as_ref()
    }

    /// For a mixed arithmetic atom: its A-local summands at group `p`.
    #[must_use]
    pub fn a_part(&self, p: usize) -> Option<&AffineTerm> {
        self.a_part.get(p).and_then(Option::as_ref)
    }

    /// Whether the atom is mixed at `p`.
    #[must_use]
    pub fn is_mixed(&self, p: usize) -> bool {
        self.occurrence.is_mixed(p)
    }

    pub(crate) fn set_mixed_var(&mut self, var: TermId) {
        self.mixed_var = Some(var);
    }

    pub(crate) fn set_lhs_occurrence(&mut self, occ: Occurrence) {
        self.lhs_occurrence = Some(occ);
    }

    pub(crate) fn set_a_part(&mut self, p: usize, part: AffineTerm) {
        if self.a_part.len() <= p {
            self.a_part.resize(p + 1, None);
        }
        self.a_part[p] = Some(part);
    }
}
