//! Hash-consed terms.
//!
//! Terms live in an arena owned by [`TermManager`] and are referred to by
//! [`TermId`]. Structurally equal terms of the same sort share one id, so
//! identity comparison is structural comparison. Terms are never mutated;
//! every rewrite builds new terms.

mod display;
pub mod traversal;

pub use display::TermDisplay;

use crate::affine::AffineTerm;
use crate::delta::DeltaRational;
use crate::sort::{SortId, SortManager};
use lasso::{Rodeo, Spur};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Reference to a term in a [`TermManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(u32);

impl TermId {
    /// Create a term id from its raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index of this term.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Linear-arithmetic annotation carried through interpolation.
///
/// `LA(s, k, F)` wraps the formula `F` together with the affine term `s`
/// (read as `s ≤ 0`, strict if the constant has a positive ε part) and the
/// bound `k`. The wrapper is only meaningful while mixed bounds are being
/// eliminated; its logical content is `F`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LaAnnotation {
    /// The affine term `s`
    pub s: AffineTerm,
    /// The bound `k`
    pub k: DeltaRational,
    /// The wrapped formula `F`
    pub formula: TermId,
}

/// The kind of a term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Boolean true
    True,
    /// Boolean false
    False,
    /// Integer literal
    IntConst(BigInt),
    /// Rational literal
    RealConst(BigRational),
    /// Declared constant (a nullary uninterpreted symbol)
    Var(Spur),
    /// Bound or auxiliary variable
    BoundVar(Spur),
    /// Negation
    Not(TermId),
    /// Conjunction
    And(SmallVec<[TermId; 4]>),
    /// Disjunction
    Or(SmallVec<[TermId; 4]>),
    /// Implication
    Implies(TermId, TermId),
    /// If-then-else
    Ite(TermId, TermId, TermId),
    /// Equality
    Eq(TermId, TermId),
    /// Addition
    Add(SmallVec<[TermId; 4]>),
    /// Subtraction
    Sub(TermId, TermId),
    /// Arithmetic negation
    Neg(TermId),
    /// Multiplication
    Mul(SmallVec<[TermId; 4]>),
    /// Division: `div` on integers, `/` on reals
    Div(TermId, TermId),
    /// `<=`
    Le(TermId, TermId),
    /// `<`
    Lt(TermId, TermId),
    /// `>=`
    Ge(TermId, TermId),
    /// `>`
    Gt(TermId, TermId),
    /// Array read
    Select(TermId, TermId),
    /// Array write
    Store(TermId, TermId, TermId),
    /// Application of an uninterpreted or defined function
    Apply {
        /// Function symbol
        func: Spur,
        /// Arguments
        args: SmallVec<[TermId; 4]>,
    },
    /// Parallel let binding of bound variables
    Let {
        /// Bound names and their values
        bindings: Vec<(Spur, TermId)>,
        /// Body
        body: TermId,
    },
    /// Universal quantifier
    Forall {
        /// Bound variables
        vars: SmallVec<[(Spur, SortId); 2]>,
        /// Body
        body: TermId,
    },
    /// Existential quantifier
    Exists {
        /// Bound variables
        vars: SmallVec<[(Spur, SortId); 2]>,
        /// Body
        body: TermId,
    },
    /// Equality marker `EQ(aux, replacement)` emitted by congruence
    /// interpolation for mixed equalities
    EqMarker(TermId, TermId),
    /// Linear-arithmetic annotation
    LaAnnot(Box<LaAnnotation>),
}

impl TermKind {
    /// Whether this is a numeric or Boolean literal.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            TermKind::True | TermKind::False | TermKind::IntConst(_) | TermKind::RealConst(_)
        )
    }
}

/// A term stored in the arena.
#[derive(Debug, Clone)]
pub struct Term {
    /// Its id
    pub id: TermId,
    /// Its kind
    pub kind: TermKind,
    /// Its sort
    pub sort: SortId,
}

/// A `define-fun` macro.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Parameters, as bound variables
    pub params: Vec<TermId>,
    /// Body over the parameters
    pub body: TermId,
}

/// Arena and hash-consing table for terms.
#[derive(Debug)]
pub struct TermManager {
    terms: Vec<Term>,
    cache: FxHashMap<(TermKind, SortId), TermId>,
    names: Rodeo,
    definitions: FxHashMap<Spur, FunctionDef>,
    fresh_counter: u32,
    true_id: TermId,
    false_id: TermId,
    /// Sort table
    pub sorts: SortManager,
}

impl TermManager {
    /// Create an empty term manager.
    pub fn new() -> Self {
        let sorts = SortManager::new();
        let bool_sort = sorts.bool_sort;
        let mut tm = Self {
            terms: Vec::new(),
            cache: FxHashMap::default(),
            names: Rodeo::default(),
            definitions: FxHashMap::default(),
            fresh_counter: 0,
            true_id: TermId(0),
            false_id: TermId(0),
            sorts,
        };
        tm.true_id = tm.intern(TermKind::True, bool_sort);
        tm.false_id = tm.intern(TermKind::False, bool_sort);
        tm
    }

    fn intern(&mut self, kind: TermKind, sort: SortId) -> TermId {
        let key = (kind, sort);
        if let Some(&id) = self.cache.get(&key) {
            return id;
        }
        let id = TermId(self.terms.len() as u32);
        self.terms.push(Term {
            id,
            kind: key.0.clone(),
            sort,
        });
        self.cache.insert(key, id);
        id
    }

    /// Look up a term.
    #[must_use]
    pub fn get(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.0 as usize)
    }

    /// The kind of a term created by this manager.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this manager.
    #[must_use]
    pub fn kind(&self, id: TermId) -> &TermKind {
        &self.terms[id.0 as usize].kind
    }

    /// The sort of a term created by this manager.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this manager.
    #[must_use]
    pub fn sort_of(&self, id: TermId) -> SortId {
        self.terms[id.0 as usize].sort
    }

    /// Number of terms in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the arena is empty (never true after [`TermManager::new`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Resolve an interned name.
    #[must_use]
    pub fn resolve(&self, name: Spur) -> &str {
        self.names.resolve(&name)
    }

    /// Intern a name.
    pub fn intern_str(&mut self, name: &str) -> Spur {
        self.names.get_or_intern(name)
    }

    /// Look up an already interned name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Spur> {
        self.names.get(name)
    }

    // ----- Boolean structure -----

    /// `true`
    #[must_use]
    pub fn mk_true(&self) -> TermId {
        self.true_id
    }

    /// `false`
    #[must_use]
    pub fn mk_false(&self) -> TermId {
        self.false_id
    }

    /// `true` or `false`.
    #[must_use]
    pub fn mk_bool(&self, value: bool) -> TermId {
        if value { self.true_id } else { self.false_id }
    }

    /// Negation, folding constants and double negation.
    pub fn mk_not(&mut self, arg: TermId) -> TermId {
        match self.kind(arg) {
            TermKind::True => self.false_id,
            TermKind::False => self.true_id,
            TermKind::Not(inner) => *inner,
            _ => {
                let sort = self.sorts.bool_sort;
                self.intern(TermKind::Not(arg), sort)
            }
        }
    }

    /// Conjunction. Flattens nested conjunctions, drops `true` and duplicate
    /// conjuncts, and collapses to `false` if any conjunct is `false`.
    pub fn mk_and(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        match self.flatten_junction(args, true) {
            Junction::Absorbed => self.false_id,
            Junction::Args(flat) => match flat.len() {
                0 => self.true_id,
                1 => flat[0],
                _ => {
                    let sort = self.sorts.bool_sort;
                    self.intern(TermKind::And(flat), sort)
                }
            },
        }
    }

    /// Disjunction. Flattens nested disjunctions, drops `false` and duplicate
    /// disjuncts, and collapses to `true` if any disjunct is `true`.
    pub fn mk_or(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        match self.flatten_junction(args, false) {
            Junction::Absorbed => self.true_id,
            Junction::Args(flat) => match flat.len() {
                0 => self.false_id,
                1 => flat[0],
                _ => {
                    let sort = self.sorts.bool_sort;
                    self.intern(TermKind::Or(flat), sort)
                }
            },
        }
    }

    fn flatten_junction(&self, args: impl IntoIterator<Item = TermId>, conj: bool) -> Junction {
        let (neutral, absorbing) = if conj {
            (self.true_id, self.false_id)
        } else {
            (self.false_id, self.true_id)
        };
        let mut flat: SmallVec<[TermId; 4]> = SmallVec::new();
        let mut stack: Vec<TermId> = args.into_iter().collect();
        stack.reverse();
        while let Some(arg) = stack.pop() {
            if arg == absorbing {
                return Junction::Absorbed;
            }
            if arg == neutral {
                continue;
            }
            match (conj, self.kind(arg)) {
                (true, TermKind::And(inner)) | (false, TermKind::Or(inner)) => {
                    stack.extend(inner.iter().rev().copied());
                }
                _ => {
                    if !flat.contains(&arg) {
                        flat.push(arg);
                    }
                }
            }
        }
        Junction::Args(flat)
    }

    /// Implication.
    pub fn mk_implies(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Implies(lhs, rhs), sort)
    }

    /// If-then-else. Boolean branches are simplified into connectives where
    /// one branch is a constant.
    pub fn mk_ite(&mut self, cond: TermId, then_t: TermId, else_t: TermId) -> TermId {
        if cond == self.true_id || then_t == else_t {
            return then_t;
        }
        if cond == self.false_id {
            return else_t;
        }
        let (t, f) = (self.true_id, self.false_id);
        if then_t == t && else_t == f {
            return cond;
        }
        if then_t == f && else_t == t {
            return self.mk_not(cond);
        }
        if then_t == t {
            return self.mk_or([cond, else_t]);
        }
        if else_t == f {
            return self.mk_and([cond, then_t]);
        }
        if then_t == f {
            let not_cond = self.mk_not(cond);
            return self.mk_and([not_cond, else_t]);
        }
        if else_t == t {
            let not_cond = self.mk_not(cond);
            return self.mk_or([not_cond, then_t]);
        }
        let sort = self.sort_of(then_t);
        self.intern(TermKind::Ite(cond, then_t, else_t), sort)
    }

    /// Equality. Syntactically equal sides give `true`.
    pub fn mk_eq(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        if lhs == rhs {
            return self.true_id;
        }
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Eq(lhs, rhs), sort)
    }

    // ----- Symbols and variables -----

    /// A declared constant.
    pub fn mk_var(&mut self, name: &str, sort: SortId) -> TermId {
        let name = self.names.get_or_intern(name);
        self.intern(TermKind::Var(name), sort)
    }

    /// A bound variable.
    pub fn mk_bound_var(&mut self, name: &str, sort: SortId) -> TermId {
        let name = self.names.get_or_intern(name);
        self.intern(TermKind::BoundVar(name), sort)
    }

    /// A bound variable whose name was never used before, named `prefix!n`.
    pub fn mk_fresh_var(&mut self, prefix: &str, sort: SortId) -> TermId {
        loop {
            let name = format!("{prefix}!{}", self.fresh_counter);
            self.fresh_counter += 1;
            if !self.names.contains(&name) {
                return self.mk_bound_var(&name, sort);
            }
        }
    }

    /// Application of a function symbol.
    pub fn mk_apply(
        &mut self,
        func: &str,
        args: impl IntoIterator<Item = TermId>,
        sort: SortId,
    ) -> TermId {
        let func = self.names.get_or_intern(func);
        self.mk_apply_spur(func, args, sort)
    }

    /// Application of an already interned function symbol.
    pub fn mk_apply_spur(
        &mut self,
        func: Spur,
        args: impl IntoIterator<Item = TermId>,
        sort: SortId,
    ) -> TermId {
        let args: SmallVec<[TermId; 4]> = args.into_iter().collect();
        if args.is_empty() {
            return self.intern(TermKind::Var(func), sort);
        }
        self.intern(TermKind::Apply { func, args }, sort)
    }

    /// Register a `define-fun` macro. `params` must be bound variables
    /// occurring in `body`.
    pub fn define_fun(&mut self, name: &str, params: Vec<TermId>, body: TermId) -> Spur {
        let name = self.names.get_or_intern(name);
        self.definitions.insert(name, FunctionDef { params, body });
        name
    }

    /// The definition of a macro, if `name` is one.
    #[must_use]
    pub fn definition(&self, name: Spur) -> Option<&FunctionDef> {
        self.definitions.get(&name)
    }

    /// A parallel `let`.
    pub fn mk_let(&mut self, bindings: Vec<(&str, TermId)>, body: TermId) -> TermId {
        if bindings.is_empty() {
            return body;
        }
        let bindings: Vec<(Spur, TermId)> = bindings
            .into_iter()
            .map(|(name, value)| (self.names.get_or_intern(name), value))
            .collect();
        self.mk_let_spur(bindings, body)
    }

    pub(crate) fn mk_let_spur(&mut self, bindings: Vec<(Spur, TermId)>, body: TermId) -> TermId {
        let sort = self.sort_of(body);
        self.intern(TermKind::Let { bindings, body }, sort)
    }

    /// Universal quantification over `vars`.
    pub fn mk_forall(&mut self, vars: Vec<(&str, SortId)>, body: TermId) -> TermId {
        let vars = self.intern_vars(vars);
        self.mk_quantifier_spur(true, vars, body)
    }

    /// Existential quantification over `vars`.
    pub fn mk_exists(&mut self, vars: Vec<(&str, SortId)>, body: TermId) -> TermId {
        let vars = self.intern_vars(vars);
        self.mk_quantifier_spur(false, vars, body)
    }

    fn intern_vars(&mut self, vars: Vec<(&str, SortId)>) -> SmallVec<[(Spur, SortId); 2]> {
        vars.into_iter()
            .map(|(name, sort)| (self.names.get_or_intern(name), sort))
            .collect()
    }

    pub(crate) fn mk_quantifier_spur(
        &mut self,
        universal: bool,
        vars: SmallVec<[(Spur, SortId); 2]>,
        body: TermId,
    ) -> TermId {
        if vars.is_empty() || body == self.true_id || body == self.false_id {
            return body;
        }
        let sort = self.sorts.bool_sort;
        let kind = if universal {
            TermKind::Forall { vars, body }
        } else {
            TermKind::Exists { vars, body }
        };
        self.intern(kind, sort)
    }

    /// Quantify a single bound variable term. Returns `body` unchanged if
    /// `var` is not a bound variable.
    pub fn mk_quantified_over(&mut self, universal: bool, var: TermId, body: TermId) -> TermId {
        let sort = self.sort_of(var);
        match self.kind(var) {
            TermKind::BoundVar(name) => {
                let vars = smallvec::smallvec![(*name, sort)];
                self.mk_quantifier_spur(universal, vars, body)
            }
            _ => body,
        }
    }

    // ----- Arithmetic -----

    /// Integer literal.
    pub fn mk_int(&mut self, value: impl Into<BigInt>) -> TermId {
        let sort = self.sorts.int_sort;
        self.intern(TermKind::IntConst(value.into()), sort)
    }

    /// Real literal.
    pub fn mk_real(&mut self, value: BigRational) -> TermId {
        let sort = self.sorts.real_sort;
        self.intern(TermKind::RealConst(value), sort)
    }

    /// Numeric literal of the given sort. Non-integral values always
    /// produce a real literal.
    pub fn mk_rational(&mut self, value: &BigRational, sort: SortId) -> TermId {
        if sort == self.sorts.int_sort && value.is_integer() {
            self.mk_int(value.to_integer())
        } else {
            self.mk_real(value.clone())
        }
    }

    /// Sum of the arguments. No arguments give `0`.
    pub fn mk_add(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: SmallVec<[TermId; 4]> = args.into_iter().collect();
        match args.len() {
            0 => self.mk_int(0),
            1 => args[0],
            _ => {
                let sort = self.sort_of(args[0]);
                self.intern(TermKind::Add(args), sort)
            }
        }
    }

    /// Product of the arguments. No arguments give `1`.
    pub fn mk_mul(&mut self, args: impl IntoIterator<Item = TermId>) -> TermId {
        let args: SmallVec<[TermId; 4]> = args.into_iter().collect();
        match args.len() {
            0 => self.mk_int(1),
            1 => args[0],
            _ => {
                let sort = if args.iter().any(|&a| self.sort_of(a) == self.sorts.real_sort) {
                    self.sorts.real_sort
                } else {
                    self.sort_of(args[0])
                };
                self.intern(TermKind::Mul(args), sort)
            }
        }
    }

    /// `lhs - rhs`
    pub fn mk_sub(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sort_of(lhs);
        self.intern(TermKind::Sub(lhs, rhs), sort)
    }

    /// `-arg`
    pub fn mk_neg(&mut self, arg: TermId) -> TermId {
        let sort = self.sort_of(arg);
        self.intern(TermKind::Neg(arg), sort)
    }

    /// `div` on integers, `/` on reals.
    pub fn mk_div(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        let sort = self.sort_of(lhs);
        self.intern(TermKind::Div(lhs, rhs), sort)
    }

    /// `lhs <= rhs`
    pub fn mk_le(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.mk_comparison(lhs, rhs, TermKind::Le)
    }

    /// `lhs < rhs`
    pub fn mk_lt(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.mk_comparison(lhs, rhs, TermKind::Lt)
    }

    /// `lhs >= rhs`
    pub fn mk_ge(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.mk_comparison(lhs, rhs, TermKind::Ge)
    }

    /// `lhs > rhs`
    pub fn mk_gt(&mut self, lhs: TermId, rhs: TermId) -> TermId {
        self.mk_comparison(lhs, rhs, TermKind::Gt)
    }

    fn mk_comparison(
        &mut self,
        lhs: TermId,
        rhs: TermId,
        make: fn(TermId, TermId) -> TermKind,
    ) -> TermId {
        let kind = make(lhs, rhs);
        if let (Some(l), Some(r)) = (self.numeral(lhs), self.numeral(rhs)) {
            let holds = match &kind {
                TermKind::Le(..) => l <= r,
                TermKind::Lt(..) => l < r,
                TermKind::Ge(..) => l >= r,
                _ => l > r,
            };
            return self.mk_bool(holds);
        }
        let sort = self.sorts.bool_sort;
        self.intern(kind, sort)
    }

    /// The value of a numeric literal.
    #[must_use]
    pub fn numeral(&self, id: TermId) -> Option<BigRational> {
        match self.kind(id) {
            TermKind::IntConst(n) => Some(BigRational::from_integer(n.clone())),
            TermKind::RealConst(r) => Some(r.clone()),
            TermKind::Neg(inner) => self.numeral(*inner).map(|v| -v),
            _ => None,
        }
    }

    // ----- Arrays -----

    /// `select(array, index)`
    pub fn mk_select(&mut self, array: TermId, index: TermId) -> TermId {
        let array_sort = self.sort_of(array);
        let sort = self.sorts.array_range(array_sort).unwrap_or(array_sort);
        self.intern(TermKind::Select(array, index), sort)
    }

    /// `store(array, index, value)`
    pub fn mk_store(&mut self, array: TermId, index: TermId, value: TermId) -> TermId {
        let sort = self.sort_of(array);
        self.intern(TermKind::Store(array, index, value), sort)
    }

    // ----- Interpolation-only terms -----

    /// Equality marker `EQ(aux, replacement)`.
    pub fn mk_eq_marker(&mut self, aux: TermId, replacement: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::EqMarker(aux, replacement), sort)
    }

    /// Linear-arithmetic annotation `LA(s, k, F)`.
    pub fn mk_la_annot(&mut self, s: AffineTerm, k: DeltaRational, formula: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(
            TermKind::LaAnnot(Box::new(LaAnnotation { s, k, formula })),
            sort,
        )
    }

    // ----- Literals -----

    /// Whether `lit` is a negation.
    #[must_use]
    pub fn is_negated(&self, lit: TermId) -> bool {
        matches!(self.kind(lit), TermKind::Not(_))
    }

    /// The atom of a literal.
    #[must_use]
    pub fn atom_of(&self, lit: TermId) -> TermId {
        match self.kind(lit) {
            TermKind::Not(atom) => *atom,
            _ => lit,
        }
    }

    /// The literal with the given atom and polarity.
    pub fn mk_literal(&mut self, atom: TermId, positive: bool) -> TermId {
        if positive { atom } else { self.mk_not(atom) }
    }

    /// Whether `id` is the literal `0`.
    #[must_use]
    pub fn is_zero(&self, id: TermId) -> bool {
        self.numeral(id).is_some_and(|v| v.is_zero())
    }

    /// Whether `id` is the literal `1`.
    #[must_use]
    pub fn is_one(&self, id: TermId) -> bool {
        self.numeral(id).is_some_and(|v| v.is_one())
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

enum Junction {
    Absorbed,
    Args(SmallVec<[TermId; 4]>),
}
