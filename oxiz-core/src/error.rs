//! Error types shared by the OxiZ crates.
//!
//! Every failure of the interpolation pipeline is fatal for the call that
//! produced it: nothing is retried internally, so callers only need to tell
//! the categories apart to decide whether a different proof, a different
//! partitioning, or a larger resource budget might help.

use thiserror::Error;

/// Errors produced by term construction, proof handling and interpolation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OxizError {
    /// The proof uses a shape the interpolator does not cover
    /// (quantifier instantiation, Skolem symbols, unknown lemma or atom kind).
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The cancellation predicate was observed to be set.
    #[error("timeout exceeded")]
    Timeout,

    /// An internal invariant was violated. This is a programming error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Two terms that must agree on their sort do not.
    #[error("sort mismatch: expected {expected}, found {found}")]
    SortMismatch {
        /// Expected sort
        expected: String,
        /// Actual sort
        found: String,
    },

    /// The partition tree is not a valid post-order bracket encoding.
    #[error("invalid partition tree: {0}")]
    InvalidPartition(String),

    /// The refutation DAG is malformed (dangling node, bad pivot).
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// The external checker rejected the computed interpolants.
    #[error("generated interpolants did not pass sanity check")]
    SanityCheckFailed,

    /// A symbol was referenced that was never declared.
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),
}

impl OxizError {
    /// Create an [`OxizError::Unsupported`] error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create an [`OxizError::Internal`] error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an [`OxizError::InvalidProof`] error.
    pub fn invalid_proof(msg: impl Into<String>) -> Self {
        Self::InvalidProof(msg.into())
    }

    /// Create an [`OxizError::InvalidPartition`] error.
    pub fn invalid_partition(msg: impl Into<String>) -> Self {
        Self::InvalidPartition(msg.into())
    }

    /// Whether a caller could reasonably re-run the whole pipeline with
    /// different resource limits.
    #[must_use]
    pub fn is_resource_limit(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Result alias used throughout OxiZ.
pub type Result<T> = std::result::Result<T, OxizError>;
