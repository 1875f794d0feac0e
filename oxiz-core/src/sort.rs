//! Sort system.

use lasso::Spur;
use rustc_hash::FxHashMap;

/// Identifier of an interned sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortId(u32);

impl SortId {
    /// Create a sort id from its raw index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw index of this sort.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// The shape of a sort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Booleans
    Bool,
    /// Mathematical integers
    Int,
    /// Reals
    Real,
    /// Arrays from `domain` to `range`
    Array {
        /// Index sort
        domain: SortId,
        /// Element sort
        range: SortId,
    },
    /// A user-declared sort
    Uninterpreted(Spur),
}

/// An interned sort.
#[derive(Debug, Clone)]
pub struct Sort {
    /// Id of this sort
    pub id: SortId,
    /// Its shape
    pub kind: SortKind,
}

/// Interning table for sorts.
#[derive(Debug)]
pub struct SortManager {
    sorts: Vec<Sort>,
    cache: FxHashMap<SortKind, SortId>,
    /// The Boolean sort
    pub bool_sort: SortId,
    /// The integer sort
    pub int_sort: SortId,
    /// The real sort
    pub real_sort: SortId,
}

impl SortManager {
    /// Create a sort table with the builtin sorts.
    pub fn new() -> Self {
        let mut manager = Self {
            sorts: Vec::new(),
            cache: FxHashMap::default(),
            bool_sort: SortId(0),
            int_sort: SortId(0),
            real_sort: SortId(0),
        };
        manager.bool_sort = manager.intern(SortKind::Bool);
        manager.int_sort = manager.intern(SortKind::Int);
        manager.real_sort = manager.intern(SortKind::Real);
        manager
    }

    /// Intern a sort, returning the existing id if it was seen before.
    pub fn intern(&mut self, kind: SortKind) -> SortId {
        if let Some(&id) = self.cache.get(&kind) {
            return id;
        }
        let id = SortId(self.sorts.len() as u32);
        self.sorts.push(Sort {
            id,
            kind: kind.clone(),
        });
        self.cache.insert(kind, id);
        id
    }

    /// Intern an array sort.
    pub fn mk_array(&mut self, domain: SortId, range: SortId) -> SortId {
        self.intern(SortKind::Array { domain, range })
    }

    /// Look up a sort.
    #[must_use]
    pub fn get(&self, id: SortId) -> Option<&Sort> {
        self.sorts.get(id.0 as usize)
    }

    /// Whether the sort is `Int` or `Real`.
    #[must_use]
    pub fn is_numeric(&self, id: SortId) -> bool {
        id == self.int_sort || id == self.real_sort
    }

    /// Element sort of an array sort.
    #[must_use]
    pub fn array_range(&self, id: SortId) -> Option<SortId> {
        match self.get(id).map(|s| &s.kind) {
            Some(SortKind::Array { range, .. }) => Some(*range),
            _ => None,
        }
    }

    /// Number of interned sorts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorts.len()
    }

    /// Whether no sort is interned (never true after [`SortManager::new`]).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }
}

impl Default for SortManager {
    fn default() -> Self {
        Self::new()
    }
}
