//! Counters collected during one interpolation call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistics for one interpolation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationStats {
    /// Leaves (axioms and lemmas) interpolated
    pub leaves: u64,
    /// Resolution nodes expanded
    pub resolutions: u64,
    /// Pivot combinations
    pub combines: u64,
    /// Proof nodes answered from the memo
    pub cache_hits: u64,
    /// Mixed equality pivots eliminated
    pub eq_eliminations: u64,
    /// Mixed real bounds eliminated
    pub real_eliminations: u64,
    /// Mixed integer bounds eliminated
    pub int_eliminations: u64,
    /// Disjuncts produced by integer case splits
    pub case_split_disjuncts: u64,
    /// Non-shared sub-terms replaced by auxiliary variables
    pub symbols_replaced: u64,
    /// Quantifiers added around final interpolants
    pub quantifiers_added: u64,
}

impl InterpolationStats {
    /// Proof nodes visited, counting memo hits.
    #[must_use]
    pub fn nodes_walked(&self) -> u64 {
        self.leaves + self.resolutions + self.cache_hits
    }

    /// Mixed pivots eliminated of any kind.
    #[must_use]
    pub fn mixed_eliminations(&self) -> u64 {
        self.eq_eliminations + self.real_eliminations + self.int_eliminations
    }
}

impl fmt::Display for InterpolationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "leaves:            {}", self.leaves)?;
        writeln!(f, "resolutions:       {}", self.resolutions)?;
        writeln!(f, "combines:          {}", self.combines)?;
        writeln!(f, "cache hits:        {}", self.cache_hits)?;
        writeln!(
            f,
            "mixed eliminated:  {} (eq {}, real {}, int {})",
            self.mixed_eliminations(),
            self.eq_eliminations,
            self.real_eliminations,
            self.int_eliminations
        )?;
        writeln!(f, "case-split disj.:  {}", self.case_split_disjuncts)?;
        writeln!(f, "symbols replaced:  {}", self.symbols_replaced)?;
        write!(f, "quantifiers added: {}", self.quantifiers_added)
    }
}
