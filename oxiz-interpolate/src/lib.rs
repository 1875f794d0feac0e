//! OxiZ Interpolate - Tree Interpolation from Resolution Refutations
//!
//! Given a refutation of a set of assertions and a tree over named groups
//! of those assertions, this crate computes one Craig interpolant per
//! non-root group: a formula implied by the assertions in the group's
//! subtree, inconsistent with all other assertions, and mentioning only
//! symbols visible on both sides.
//!
//! The walk over the proof is iterative and memoized per proof node, so
//! deep and heavily shared proofs are processed in linear time. Theory
//! lemmas are handed to [`LemmaInterpolator`] plug-ins; generators for
//! Farkas-annotated linear arithmetic and trichotomy lemmas are built in.
//! Mixed literals, whose symbols straddle a cut, are eliminated by
//! equality substitution, real shadows, or integer case splits.
//!
//! # Example
//!
//! ```
//! use oxiz_core::ast::TermManager;
//! use oxiz_interpolate::{Assertion, Interpolator, NeverCancel, PartitionTree};
//! use oxiz_proof::Proof;
//!
//! let mut tm = TermManager::new();
//! let boolean = tm.sorts.bool_sort;
//! let a = tm.mk_var("a", boolean);
//! let s = tm.mk_var("s", boolean);
//! let not_a = tm.mk_not(a);
//! let not_s = tm.mk_not(s);
//! let a_implies_s = tm.mk_or([not_a, s]);
//!
//! // A = { a, ¬a ∨ s }, B = { ¬s }
//! let mut proof = Proof::new();
//! let a1 = proof.add_axiom(Some("A"), vec![a]);
//! let a2 = proof.add_axiom(Some("A"), vec![not_a, s]);
//! let b1 = proof.add_axiom(Some("B"), vec![not_s]);
//! let r = proof.resolve(a2, a, a1).unwrap();
//! let root = proof.resolve(r, not_s, b1).unwrap();
//!
//! let tree = PartitionTree::binary(vec!["A".into()], vec!["B".into()]).unwrap();
//! let assertions = [
//!     Assertion::named("A", a),
//!     Assertion::named("A", a_implies_s),
//!     Assertion::named("B", not_s),
//! ];
//! let result = Interpolator::default()
//!     .interpolate(&mut tm, &proof, root, &assertions, &tree, &NeverCancel)
//!     .unwrap();
//! assert_eq!(result.interpolants, vec![s]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cancel;
pub mod checker;
pub mod coloring;
mod combine;
pub mod config;
pub mod context;
pub mod engine;
mod leaf;
pub mod lit_info;
pub mod mixed;
pub mod occurrence;
pub mod partition;
pub mod postprocess;
pub mod stats;
pub mod theory;

pub use cancel::{NeverCancel, TerminationRequest};
pub use checker::{InterpolantChecker, SymbolChecker};
pub use coloring::{Assertion, OccurrenceTracker};
pub use config::InterpolationConfig;
pub use context::{InterpolationContext, MixedTermRegistry};
pub use engine::{Interpolator, TreeInterpolants};
pub use lit_info::{AtomKind, LitInfo};
pub use occurrence::{GroupSet, Occurrence};
pub use partition::{Color, PartitionTree};
pub use stats::InterpolationStats;
pub use theory::{
    FarkasInterpolator, Lemma, LemmaInterpolator, TheoryInterpolators, TrichotomyInterpolator,
};

pub use oxiz_core::error::{OxizError, Result};
