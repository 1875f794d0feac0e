//! OxiZ Core - Terms, Sorts, and Errors
//!
//! This crate provides the foundational types shared by the OxiZ crates:
//! - Hash-consed terms with efficient [`TermId`] references
//! - Sort system
//! - Affine terms and delta-rationals for linear arithmetic
//! - Iterative traversal and rewriting
//! - The common error type
//!
//! # Examples
//!
//! ```
//! use oxiz_core::ast::TermManager;
//! use num_bigint::BigInt;
//!
//! let mut tm = TermManager::new();
//!
//! // Boolean terms
//! let p = tm.mk_var("p", tm.sorts.bool_sort);
//! let q = tm.mk_var("q", tm.sorts.bool_sort);
//! let and_pq = tm.mk_and(vec![p, q]);
//!
//! // Integer terms
//! let x = tm.mk_var("x", tm.sorts.int_sort);
//! let five = tm.mk_int(BigInt::from(5));
//! let ge = tm.mk_ge(x, five);
//! assert_eq!(tm.display(ge).to_string(), "(>= x 5)");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod affine;
pub mod ast;
pub mod delta;
pub mod error;
pub mod sort;

pub use affine::AffineTerm;
pub use ast::{LaAnnotation, Term, TermId, TermKind, TermManager};
pub use delta::DeltaRational;
pub use error::{OxizError, Result};
pub use sort::{SortId, SortKind, SortManager};
