//! Configuration for interpolant computation.

use serde::{Deserialize, Serialize};

/// Options of one [`Interpolator`](crate::Interpolator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Check inductivity of every leaf and resolution vector with the
    /// registered checker
    pub deep_check: bool,
    /// Quantify auxiliary variables that survive to the final interpolants
    pub quantify_aux_vars: bool,
    /// Purify interpolants of congruence lemmas from non-shared symbols
    pub replace_nonshared: bool,
    /// Upper bound on the disjuncts of one integer case split
    pub max_case_split: Option<usize>,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            deep_check: false,
            quantify_aux_vars: true,
            replace_nonshared: true,
            max_case_split: None,
        }
    }
}

impl InterpolationConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable inductivity checks.
    #[must_use]
    pub fn with_deep_check(mut self, enabled: bool) -> Self {
        self.deep_check = enabled;
        self
    }

    /// Enable or disable quantification of auxiliary variables.
    #[must_use]
    pub fn with_quantify_aux_vars(mut self, enabled: bool) -> Self {
        self.quantify_aux_vars = enabled;
        self
    }

    /// Enable or disable purification of congruence interpolants.
    #[must_use]
    pub fn with_replace_nonshared(mut self, enabled: bool) -> Self {
        self.replace_nonshared = enabled;
        self
    }

    /// Bound the size of integer case splits.
    #[must_use]
    pub fn with_max_case_split(mut self, limit: usize) -> Self {
        self.max_case_split = Some(limit);
        self
    }
}
