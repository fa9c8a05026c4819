//! Thread-safe type interning.
//!
//! A model is shared by every resolver working on it, possibly from several
//! threads at once, so the interner uses `DashMap` for deduplication and an
//! append-only vector guarded by a `RwLock` for `TypeId -> TypeData` lookup.

use crate::types::{IntrinsicKind, TypeData, TypeId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::{PoisonError, RwLock};
use tracing::trace;

pub struct TypeInterner {
    /// `TypeData` -> `TypeId` deduplication
    map: DashMap<TypeData, TypeId, FxBuildHasher>,
    /// `TypeId` -> `TypeData`, indexed by `TypeId.0`
    types: RwLock<Vec<TypeData>>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with every intrinsic pre-interned at its
    /// well-known `TypeId`.
    pub fn new() -> Self {
        let interner = Self {
            map: DashMap::with_hasher(FxBuildHasher),
            types: RwLock::new(Vec::with_capacity(64)),
        };
        for kind in IntrinsicKind::ALL {
            let id = interner.intern(TypeData::Intrinsic(kind));
            debug_assert_eq!(id, kind.type_id());
        }
        interner
    }

    /// Intern `data`, returning the existing id when already known.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.map.get(&data) {
            return *id;
        }
        match self.map.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(types.len() as u32);
                types.push(entry.key().clone());
                trace!(type_id = id.0, data = ?entry.key(), "TypeInterner::intern");
                entry.insert(id);
                id
            }
        }
    }

    /// Structure of an interned type.
    ///
    /// Returns `None` only for ids that were not produced by this interner.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types.get(id.0 as usize).cloned()
    }

    /// Number of distinct types interned so far.
    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
