//! Per-call state shared by the proof walk and the theory generators.

use crate::cancel::TerminationRequest;
use crate::coloring::OccurrenceTracker;
use crate::config::InterpolationConfig;
use crate::lit_info::LitInfo;
use crate::occurrence::Occurrence;
use crate::partition::PartitionTree;
use crate::stats::InterpolationStats;
use lasso::Spur;
use oxiz_core::ast::{TermId, TermManager};
use oxiz_core::error::{OxizError, Result};
use rustc_hash::FxHashMap;

/// Auxiliary `purAux` variables introduced for non-shared sub-terms.
///
/// Each origin term is assigned one variable for the whole call, so the
/// same term purified in two interpolants is replaced by the same variable.
#[derive(Debug, Default)]
pub struct MixedTermRegistry {
    by_origin: FxHashMap<TermId, TermId>,
    entries: Vec<(TermId, TermId)>,
}

impl MixedTermRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Variable standing for `origin`, created on first request.
    pub fn get_or_create(&mut self, tm: &mut TermManager, origin: TermId) -> TermId {
        if let Some(&var) = self.by_origin.get(&origin) {
            return var;
        }
        let sort = tm.sort_of(origin);
        let var = tm.mk_fresh_var("purAux", sort);
        self.by_origin.insert(origin, var);
        self.entries.push((origin, var));
        var
    }

    /// Variable already assigned to `origin`.
    #[must_use]
    pub fn get(&self, origin: TermId) -> Option<TermId> {
        self.by_origin.get(&origin).copied()
    }

    /// `(origin, variable)` pairs in creation order.
    #[must_use]
    pub fn entries(&self) -> &[(TermId, TermId)] {
        &self.entries
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no variable was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything one interpolation call reads and writes besides the proof.
pub struct InterpolationContext<'a> {
    pub(crate) tm: &'a mut TermManager,
    pub(crate) tree: &'a PartitionTree,
    pub(crate) tracker: OccurrenceTracker,
    pub(crate) registry: MixedTermRegistry,
    pub(crate) config: &'a InterpolationConfig,
    pub(crate) cancel: &'a dyn TerminationRequest,
    pub(crate) stats: InterpolationStats,
}

impl<'a> InterpolationContext<'a> {
    /// Fresh context with nothing colored yet.
    pub fn new(
        tm: &'a mut TermManager,
        tree: &'a PartitionTree,
        config: &'a InterpolationConfig,
        cancel: &'a dyn TerminationRequest,
    ) -> Self {
        Self {
            tm,
            tree,
            tracker: OccurrenceTracker::new(tree),
            registry: MixedTermRegistry::new(),
            config,
            cancel,
            stats: InterpolationStats::default(),
        }
    }

    /// The term manager.
    #[must_use]
    pub fn tm(&self) -> &TermManager {
        &*self.tm
    }

    /// The term manager, mutably.
    pub fn tm_mut(&mut self) -> &mut TermManager {
        &mut *self.tm
    }

    /// The partition tree.
    #[must_use]
    pub fn tree(&self) -> &PartitionTree {
        self.tree
    }

    /// Number of interpolants `N`.
    #[must_use]
    pub fn num_interpolants(&self) -> usize {
        self.tree.num_interpolants()
    }

    /// Interpolation data of an atom.
    pub fn lit_info(&mut self, atom: TermId) -> Result<&LitInfo> {
        self.tracker.lit_info(&mut *self.tm, atom)
    }

    /// Occurrence of a term.
    pub fn occurrence(&mut self, term: TermId) -> Occurrence {
        self.tracker.occurrence(&*self.tm, term)
    }

    /// Occurrence of a symbol.
    #[must_use]
    pub fn symbol_occurrence(&self, sym: Spur) -> Occurrence {
        self.tracker.symbol_occurrence(sym)
    }

    /// The occurrence tracker.
    #[must_use]
    pub fn tracker(&self) -> &OccurrenceTracker {
        &self.tracker
    }

    /// Auxiliary variables created so far.
    #[must_use]
    pub fn registry(&self) -> &MixedTermRegistry {
        &self.registry
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> &InterpolationStats {
        &self.stats
    }

    /// Options of this call.
    #[must_use]
    pub fn config(&self) -> &InterpolationConfig {
        self.config
    }

    /// Fail with [`OxizError::Timeout`] if cancellation was requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.should_stop() {
            return Err(OxizError::Timeout);
        }
        Ok(())
    }
}
