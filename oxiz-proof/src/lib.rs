//! OxiZ Proof - Resolution Refutations
//!
//! Refutation DAGs as produced by the OxiZ proof-search engine: input
//! clauses, theory lemmas and hyper-resolution steps. Consumers such as the
//! interpolation engine walk these DAGs and use [`Proof::clause`] to
//! recover the clause proved at any node.
//!
//! # Example
//!
//! ```
//! use oxiz_core::ast::TermManager;
//! use oxiz_proof::Proof;
//!
//! let mut tm = TermManager::new();
//! let p = tm.mk_var("p", tm.sorts.bool_sort);
//! let not_p = tm.mk_not(p);
//!
//! let mut proof = Proof::new();
//! let a = proof.add_axiom(Some("A"), vec![p]);
//! let b = proof.add_axiom(Some("B"), vec![not_p]);
//! let root = proof.resolve(a, not_p, b).unwrap();
//! assert!(proof.clause(&tm, root).unwrap().is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod proof;

pub use proof::{
    Antecedent, LemmaAnnotation, LemmaKind, Proof, ProofNode, ProofNodeId, ProofStep,
};
