//! Theory lemma interpolation.
//!
//! Every theory lemma kind has at most one registered generator. The proof
//! walk hands each lemma leaf to the generator of its kind and expects one
//! partial interpolant per group back.

pub mod farkas;
pub mod trichotomy;

pub use farkas::FarkasInterpolator;
pub use trichotomy::TrichotomyInterpolator;

use crate::context::InterpolationContext;
use oxiz_core::ast::TermId;
use oxiz_core::error::{OxizError, Result};
use oxiz_proof::{LemmaAnnotation, LemmaKind};
use std::fmt;

/// A theory lemma leaf as seen by a generator.
#[derive(Debug, Clone, Copy)]
pub struct Lemma<'a> {
    /// Lemma kind
    pub kind: LemmaKind,
    /// The valid clause
    pub literals: &'a [TermId],
    /// Theory certificate
    pub annotation: &'a LemmaAnnotation,
}

/// Computes partial interpolants for theory lemmas of one kind.
///
/// The result must hold one formula per group `0..N`. For group `i`, the
/// formula must follow from the negated lemma literals that are A-local at
/// `i` and be inconsistent with the remaining negated literals, and it may
/// only mention symbols shared at `i`, auxiliary variables of mixed
/// literals, and `EqMarker`/`LaAnnot` terms over them.
pub trait LemmaInterpolator {
    /// Interpolants of one lemma.
    fn interpolate(
        &self,
        ctx: &mut InterpolationContext<'_>,
        lemma: &Lemma<'_>,
    ) -> Result<Vec<TermId>>;
}

/// The generators registered per lemma kind.
#[derive(Default)]
pub struct TheoryInterpolators {
    equality: Option<Box<dyn LemmaInterpolator>>,
    congruence: Option<Box<dyn LemmaInterpolator>>,
    linear_arith: Option<Box<dyn LemmaInterpolator>>,
    trichotomy: Option<Box<dyn LemmaInterpolator>>,
    array_weak: Option<Box<dyn LemmaInterpolator>>,
    array_const: Option<Box<dyn LemmaInterpolator>>,
    array_read_const: Option<Box<dyn LemmaInterpolator>>,
}

impl TheoryInterpolators {
    /// The built-in generators: Farkas for linear arithmetic and the
    /// trichotomy generator.
    pub fn new() -> Self {
        Self::empty()
            .with(LemmaKind::LinearArith, FarkasInterpolator)
            .with(LemmaKind::Trichotomy, TrichotomyInterpolator)
    }

    /// No generators at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register `generator` for `kind`, replacing any previous one.
    ///
    /// Quantifier instantiation lemmas cannot be interpolated; registering a
    /// generator for them has no effect.
    #[must_use]
    pub fn with(mut self, kind: LemmaKind, generator: impl LemmaInterpolator + 'static) -> Self {
        match self.slot_mut(kind) {
            Some(slot) => *slot = Some(Box::new(generator)),
            None => tracing::warn!(kind = kind.name(), "ignoring generator for lemma kind"),
        }
        self
    }

    /// Whether a generator is registered for `kind`.
    #[must_use]
    pub fn has(&self, kind: LemmaKind) -> bool {
        self.generator(kind).is_ok()
    }

    /// The generator for `kind`.
    pub fn generator(&self, kind: LemmaKind) -> Result<&dyn LemmaInterpolator> {
        let slot = match kind {
            LemmaKind::Eq => &self.equality,
            LemmaKind::CongTrans => &self.congruence,
            LemmaKind::LinearArith => &self.linear_arith,
            LemmaKind::Trichotomy => &self.trichotomy,
            LemmaKind::ArrayWeak => &self.array_weak,
            LemmaKind::ArrayConst => &self.array_const,
            LemmaKind::ArrayReadConst => &self.array_read_const,
            LemmaKind::Instantiation => {
                return Err(OxizError::unsupported(
                    "quantifier instantiation lemmas cannot be interpolated",
                ));
            }
        };
        slot.as_deref().ok_or_else(|| {
            OxizError::unsupported(format!("no interpolator for lemma kind {}", kind.name()))
        })
    }

    fn slot_mut(&mut self, kind: LemmaKind) -> Option<&mut Option<Box<dyn LemmaInterpolator>>> {
        match kind {
            LemmaKind::Eq => Some(&mut self.equality),
            LemmaKind::CongTrans => Some(&mut self.congruence),
            LemmaKind::LinearArith => Some(&mut self.linear_arith),
            LemmaKind::Trichotomy => Some(&mut self.trichotomy),
            LemmaKind::ArrayWeak => Some(&mut self.array_weak),
            LemmaKind::ArrayConst => Some(&mut self.array_const),
            LemmaKind::ArrayReadConst => Some(&mut self.array_read_const),
            LemmaKind::Instantiation => None,
        }
    }
}

impl fmt::Debug for TheoryInterpolators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds = [
            LemmaKind::Eq,
            LemmaKind::CongTrans,
            LemmaKind::LinearArith,
            LemmaKind::Trichotomy,
            LemmaKind::ArrayWeak,
            LemmaKind::ArrayConst,
            LemmaKind::ArrayReadConst,
        ];
        f.debug_set()
            .entries(kinds.iter().filter(|k| self.has(**k)).map(|k| k.name()))
            .finish()
    }
}
