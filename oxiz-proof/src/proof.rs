//! Resolution refutation DAG.
//!
//! A [`Proof`] is an append-only arena of [`ProofNode`]s. Nodes can only
//! refer to nodes added before them, so the arena is acyclic by
//! construction and sub-proofs may be shared freely.

use num_rational::BigRational;
use oxiz_core::ast::{TermId, TermManager};
use oxiz_core::error::{OxizError, Result};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Identifier of a proof node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProofNodeId(pub u32);

impl std::fmt::Display for ProofNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Theory lemma kinds that can occur as proof leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LemmaKind {
    /// Pure equality lemma
    Eq,
    /// Congruence closure / transitivity lemma
    CongTrans,
    /// Linear arithmetic bound lemma
    LinearArith,
    /// Trichotomy lemma `x < c ∨ x = c ∨ x > c`
    Trichotomy,
    /// Array weak-equivalence lemma
    ArrayWeak,
    /// Constant array lemma
    ArrayConst,
    /// Read from a constant array
    ArrayReadConst,
    /// Quantifier instantiation
    Instantiation,
}

impl LemmaKind {
    /// SMT-LIB annotation name of this lemma kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LemmaKind::Eq => ":EQ",
            LemmaKind::CongTrans => ":CC",
            LemmaKind::LinearArith => ":LA",
            LemmaKind::Trichotomy => ":trichotomy",
            LemmaKind::ArrayWeak => ":weakeq-ext",
            LemmaKind::ArrayConst => ":const-weakeq",
            LemmaKind::ArrayReadConst => ":read-const-weakeq",
            LemmaKind::Instantiation => ":inst",
        }
    }
}

/// Theory payload attached to a lemma.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LemmaAnnotation {
    /// No payload
    #[default]
    None,
    /// Farkas coefficients, one per literal of the lemma
    Farkas(Vec<BigRational>),
    /// Congruence or array path
    Path(Vec<TermId>),
}

/// One resolution premise: the sub-proof and the pivot literal as it occurs
/// in that sub-proof's clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Antecedent {
    /// Pivot literal (the primary side carries its negation)
    pub pivot: TermId,
    /// Sub-proof
    pub node: ProofNodeId,
}

/// Proof step of a node.
#[derive(Debug, Clone)]
pub enum ProofStep {
    /// Input clause from a (possibly named) assertion
    Axiom {
        /// Name of the assertion this clause comes from
        source: Option<String>,
        /// Clause literals
        literals: Vec<TermId>,
    },
    /// Theory lemma
    Lemma {
        /// Lemma kind
        kind: LemmaKind,
        /// Clause literals
        literals: Vec<TermId>,
        /// Theory payload
        annotation: LemmaAnnotation,
    },
    /// Hyper-resolution of `primary` with each antecedent in order
    Resolution {
        /// First premise
        primary: ProofNodeId,
        /// Remaining premises with their pivots
        antecedents: Vec<Antecedent>,
    },
}

/// A node of the proof DAG.
#[derive(Debug, Clone)]
pub struct ProofNode {
    /// Its id
    pub id: ProofNodeId,
    /// Its step
    pub step: ProofStep,
}

impl ProofNode {
    /// Whether this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self.step, ProofStep::Resolution { .. })
    }

    /// Literals of a leaf; `None` for resolution nodes.
    #[must_use]
    pub fn leaf_literals(&self) -> Option<&[TermId]> {
        match &self.step {
            ProofStep::Axiom { literals, .. } | ProofStep::Lemma { literals, .. } => {
                Some(literals)
            }
            ProofStep::Resolution { .. } => None,
        }
    }
}

/// Append-only proof arena.
#[derive(Debug, Clone, Default)]
pub struct Proof {
    nodes: Vec<ProofNode>,
    root: Option<ProofNodeId>,
}

impl Proof {
    /// Create an empty proof.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, step: ProofStep) -> ProofNodeId {
        let id = ProofNodeId(self.nodes.len() as u32);
        self.nodes.push(ProofNode { id, step });
        self.root = Some(id);
        id
    }

    /// Add an input clause. `source` is the name of the originating
    /// assertion, if it has one.
    pub fn add_axiom(&mut self, source: Option<&str>, literals: Vec<TermId>) -> ProofNodeId {
        self.push(ProofStep::Axiom {
            source: source.map(str::to_owned),
            literals,
        })
    }

    /// Add a theory lemma.
    pub fn add_lemma(
        &mut self,
        kind: LemmaKind,
        literals: Vec<TermId>,
        annotation: LemmaAnnotation,
    ) -> ProofNodeId {
        self.push(ProofStep::Lemma {
            kind,
            literals,
            annotation,
        })
    }

    /// Add a hyper-resolution step. Premises must already be in the proof.
    pub fn add_resolution(
        &mut self,
        primary: ProofNodeId,
        antecedents: Vec<Antecedent>,
    ) -> Result<ProofNodeId> {
        self.check_id(primary)?;
        for ante in &antecedents {
            self.check_id(ante.node)?;
        }
        if antecedents.is_empty() {
            return Err(OxizError::invalid_proof(format!(
                "resolution on {primary} without antecedents"
            )));
        }
        Ok(self.push(ProofStep::Resolution {
            primary,
            antecedents,
        }))
    }

    /// Binary resolution shorthand.
    pub fn resolve(
        &mut self,
        primary: ProofNodeId,
        pivot: TermId,
        antecedent: ProofNodeId,
    ) -> Result<ProofNodeId> {
        self.add_resolution(
            primary,
            vec![Antecedent {
                pivot,
                node: antecedent,
            }],
        )
    }

    fn check_id(&self, id: ProofNodeId) -> Result<()> {
        if (id.0 as usize) < self.nodes.len() {
            Ok(())
        } else {
            Err(OxizError::invalid_proof(format!("dangling proof node {id}")))
        }
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, id: ProofNodeId) -> Option<&ProofNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Look up a node, failing on unknown ids.
    pub fn node(&self, id: ProofNodeId) -> Result<&ProofNode> {
        self.get(id)
            .ok_or_else(|| OxizError::invalid_proof(format!("dangling proof node {id}")))
    }

    /// All nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[ProofNode] {
        &self.nodes
    }

    /// The most recently added node, or the explicitly set root.
    #[must_use]
    pub fn root(&self) -> Option<ProofNodeId> {
        self.root
    }

    /// Set the root node.
    pub fn set_root(&mut self, root: ProofNodeId) -> Result<()> {
        self.check_id(root)?;
        self.root = Some(root);
        Ok(())
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the proof has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The clause proved by `id`.
    ///
    /// Resolvents are computed bottom-up with an explicit stack and shared
    /// between the nodes of the DAG. Fails with
    /// [`OxizError::InvalidProof`] if a pivot does not occur with the
    /// expected polarity on both sides.
    pub fn clause(&self, tm: &TermManager, id: ProofNodeId) -> Result<Vec<TermId>> {
        let mut done: FxHashMap<ProofNodeId, Vec<TermId>> = FxHashMap::default();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if done.contains_key(&current) {
                continue;
            }
            let node = self.node(current)?;
            match &node.step {
                ProofStep::Axiom { literals, .. } | ProofStep::Lemma { literals, .. } => {
                    done.insert(current, dedup(literals.iter().copied()));
                }
                ProofStep::Resolution {
                    primary,
                    antecedents,
                } => {
                    if expanded {
                        let resolvent = resolvent(tm, current, &done, *primary, antecedents)?;
                        done.insert(current, resolvent);
                    } else {
                        stack.push((current, true));
                        stack.push((*primary, false));
                        stack.extend(antecedents.iter().map(|a| (a.node, false)));
                    }
                }
            }
        }
        done.remove(&id)
            .ok_or_else(|| OxizError::internal(format!("clause of {id} was not computed")))
    }
}

fn resolvent(
    tm: &TermManager,
    node: ProofNodeId,
    done: &FxHashMap<ProofNodeId, Vec<TermId>>,
    primary: ProofNodeId,
    antecedents: &[Antecedent],
) -> Result<Vec<TermId>> {
    let premise = |id: ProofNodeId| {
        done.get(&id)
            .ok_or_else(|| OxizError::internal(format!("premise {id} of {node} missing")))
    };
    let mut clause = premise(primary)?.clone();
    for ante in antecedents {
        let pivot_atom = tm.atom_of(ante.pivot);
        let pivot_negated = tm.is_negated(ante.pivot);
        let before = clause.len();
        clause.retain(|&lit| !(tm.atom_of(lit) == pivot_atom && tm.is_negated(lit) != pivot_negated));
        if clause.len() == before {
            return Err(OxizError::invalid_proof(format!(
                "negated pivot {} missing in resolution {node}",
                tm.display(ante.pivot)
            )));
        }
        let side = premise(ante.node)?;
        if !side.contains(&ante.pivot) {
            return Err(OxizError::invalid_proof(format!(
                "pivot {} missing in antecedent {}",
                tm.display(ante.pivot),
                ante.node
            )));
        }
        for &lit in side {
            if lit != ante.pivot && !clause.contains(&lit) {
                clause.push(lit);
            }
        }
    }
    trace!(%node, literals = clause.len(), "resolvent");
    Ok(clause)
}

fn dedup(literals: impl Iterator<Item = TermId>) -> Vec<TermId> {
    let mut out: Vec<TermId> = Vec::new();
    for lit in literals {
        if !out.contains(&lit) {
            out.push(lit);
        }
    }
    out
}
