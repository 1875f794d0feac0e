//! The proof walk.
//!
//! Proofs produced by the solver are DAGs with heavy sharing and can be
//! deeper than any native stack. The walk therefore runs on an explicit
//! task stack and computes one interpolant vector per proof node, never
//! more than once.
//!
//! A resolution node `R(primary, [(p1, n1), ..., (pk, nk)])` is expanded
//! into
//!
//! ```text
//! Walk(primary) Walk(n1) Combine(p1) ... Walk(nk) Combine(pk) Summarize(R)
//! ```
//!
//! executed left to right. Every `Walk` pushes exactly one vector onto the
//! result stack, every `Combine` replaces the top two by one, and
//! `Summarize` records the vector left on top as the result of `R`.

use crate::cancel::TerminationRequest;
use crate::checker::InterpolantChecker;
use crate::coloring::Assertion;
use crate::combine::combine;
use crate::config::InterpolationConfig;
use crate::context::InterpolationContext;
use crate::leaf::interpolate_leaf;
use crate::partition::PartitionTree;
use crate::postprocess::{add_quantifier, unfold_las};
use crate::stats::InterpolationStats;
use crate::theory::TheoryInterpolators;
use oxiz_core::ast::{TermId, TermManager};
use oxiz_core::error::{OxizError, Result};
use oxiz_proof::{Proof, ProofNodeId, ProofStep};
use rustc_hash::FxHashMap;
use tracing::{info, warn};

/// Result of one interpolation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeInterpolants {
    /// One interpolant per non-root group, in group order
    pub interpolants: Vec<TermId>,
    /// Counters of the call
    pub stats: InterpolationStats,
}

/// Tree interpolation engine.
///
/// An interpolator holds no per-call state and can be reused for any number
/// of proofs.
pub struct Interpolator {
    config: InterpolationConfig,
    theories: TheoryInterpolators,
    checker: Option<Box<dyn InterpolantChecker>>,
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new(InterpolationConfig::default())
    }
}

impl Interpolator {
    /// Interpolator with the built-in lemma generators.
    pub fn new(config: InterpolationConfig) -> Self {
        Self {
            config,
            theories: TheoryInterpolators::new(),
            checker: None,
        }
    }

    /// Replace the lemma generators.
    #[must_use]
    pub fn with_theories(mut self, theories: TheoryInterpolators) -> Self {
        self.theories = theories;
        self
    }

    /// Install a checker for the final (and, with deep checking, every
    /// partial) interpolant vector.
    #[must_use]
    pub fn with_checker(mut self, checker: impl InterpolantChecker + 'static) -> Self {
        self.checker = Some(Box::new(checker));
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Compute tree interpolants from the refutation rooted at `root`.
    ///
    /// `assertions` are the named input formulas; their names select the
    /// groups of `tree`. The proof node `root` must prove the empty clause.
    /// Interpolant `i` is implied by the assertions in the subtree of `i`
    /// and inconsistent with all others.
    ///
    /// # Errors
    ///
    /// - [`OxizError::Timeout`] when `cancel` fires
    /// - [`OxizError::Unsupported`] for lemmas or mixed literals no
    ///   generator handles
    /// - [`OxizError::SanityCheckFailed`] when the installed checker
    ///   rejects the result
    /// - [`OxizError::InvalidProof`] for dangling node references
    pub fn interpolate(
        &self,
        tm: &mut TermManager,
        proof: &Proof,
        root: ProofNodeId,
        assertions: &[Assertion],
        tree: &PartitionTree,
        cancel: &dyn TerminationRequest,
    ) -> Result<TreeInterpolants> {
        let mut ctx = InterpolationContext::new(tm, tree, &self.config, cancel);
        ctx.tracker.color_assertions(ctx.tm, tree, assertions)?;
        ctx.tracker.color_literals(ctx.tm, tree, proof, root)?;

        let mut walk = ProofWalk::new(self, proof);
        let mut interpolants = walk.run(&mut ctx, root)?;

        if self.config.quantify_aux_vars {
            let clause = proof.clause(ctx.tm(), root)?;
            add_quantifier(&mut ctx, &mut interpolants, &clause)?;
        }
        unfold_las(ctx.tm_mut(), &mut interpolants);

        if let Some(checker) = &self.checker {
            if !checker.check_final(ctx.tm(), &interpolants) {
                return Err(OxizError::SanityCheckFailed);
            }
        }

        let stats = ctx.stats;
        info!(
            groups = interpolants.len(),
            nodes = stats.nodes_walked(),
            cache_hits = stats.cache_hits,
            aux_vars = ctx.registry.len(),
            "interpolation finished"
        );
        Ok(TreeInterpolants {
            interpolants,
            stats,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Task {
    Walk(ProofNodeId),
    Combine(TermId),
    Summarize(ProofNodeId),
}

struct ProofWalk<'i, 'p> {
    interpolator: &'i Interpolator,
    proof: &'p Proof,
    memo: FxHashMap<ProofNodeId, Vec<TermId>>,
    tasks: Vec<Task>,
    results: Vec<Vec<TermId>>,
}

impl<'i, 'p> ProofWalk<'i, 'p> {
    fn new(interpolator: &'i Interpolator, proof: &'p Proof) -> Self {
        Self {
            interpolator,
            proof,
            memo: FxHashMap::default(),
            tasks: Vec::new(),
            results: Vec::new(),
        }
    }

    fn run(&mut self, ctx: &mut InterpolationContext<'_>, root: ProofNodeId) -> Result<Vec<TermId>> {
        self.tasks.push(Task::Walk(root));
        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Walk(id) => self.walk(ctx, id)?,
                Task::Combine(pivot) => {
                    let antecedent = self.pop()?;
                    let primary = self.pop()?;
                    let combined = combine(ctx, pivot, &primary, &antecedent)?;
                    self.results.push(combined);
                }
                Task::Summarize(id) => {
                    let top = self
                        .results
                        .last()
                        .ok_or_else(|| OxizError::internal("summarize on empty result stack"))?
                        .clone();
                    self.check_inductivity(ctx, id, &top)?;
                    self.memo.insert(id, top);
                }
            }
        }
        let result = self.pop()?;
        if !self.results.is_empty() {
            return Err(OxizError::internal(format!(
                "{} interpolant vectors left after the proof walk",
                self.results.len() + 1
            )));
        }
        Ok(result)
    }

    fn walk(&mut self, ctx: &mut InterpolationContext<'_>, id: ProofNodeId) -> Result<()> {
        if let Some(cached) = self.memo.get(&id) {
            ctx.stats.cache_hits += 1;
            self.results.push(cached.clone());
            return Ok(());
        }
        let node = self.proof.node(id)?;
        match &node.step {
            ProofStep::Resolution {
                primary,
                antecedents,
            } => {
                ctx.check_cancelled()?;
                ctx.stats.resolutions += 1;
                self.tasks.push(Task::Summarize(id));
                for antecedent in antecedents.iter().rev() {
                    self.tasks.push(Task::Combine(antecedent.pivot));
                    self.tasks.push(Task::Walk(antecedent.node));
                }
                self.tasks.push(Task::Walk(*primary));
            }
            ProofStep::Axiom { .. } | ProofStep::Lemma { .. } => {
                ctx.check_cancelled()?;
                let interpolants = interpolate_leaf(ctx, &self.interpolator.theories, node)?;
                self.check_inductivity(ctx, id, &interpolants)?;
                self.memo.insert(id, interpolants.clone());
                self.results.push(interpolants);
            }
        }
        Ok(())
    }

    fn pop(&mut self) -> Result<Vec<TermId>> {
        self.results
            .pop()
            .ok_or_else(|| OxizError::internal("interpolant result stack underflow"))
    }

    fn check_inductivity(
        &self,
        ctx: &InterpolationContext<'_>,
        id: ProofNodeId,
        interpolants: &[TermId],
    ) -> Result<()> {
        if !ctx.config().deep_check {
            return Ok(());
        }
        let Some(checker) = &self.interpolator.checker else {
            return Ok(());
        };
        let clause = self.proof.clause(ctx.tm(), id)?;
        if !checker.check_inductivity(ctx.tm(), &clause, interpolants) {
            warn!(node = %id, "partial interpolants are not inductive");
        }
        Ok(())
    }
}
