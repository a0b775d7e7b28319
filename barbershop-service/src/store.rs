use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};
use uuid::Uuid;

/// Resolves a path segment to a record key. Keys are compared in their
/// canonical hyphenated form, so any other spelling names no record.
pub fn parse_record_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw)
        .ok()
        .filter(|id| id.hyphenated().to_string() == raw)
}

/// A value kept in a [`Store`], keyed by a generated id.
pub trait Record: Clone + Send + Sync + 'static {
    /// Every field except the id.
    type Input;

    fn assemble(id: Uuid, input: Self::Input) -> Self;
}

/// In-memory keyed collection with CRUD semantics.
///
/// Each operation holds the lock for its whole read-modify-write, so `add`,
/// `update` and `delete` are atomic with respect to `list` and `get`.
/// Clones share the same collection.
pub struct Store<T> {
    inner: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Store<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every record, in no particular order.
    pub fn list(&self) -> Vec<T> {
        self.read().values().cloned().collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.read().values().filter(|value| predicate(value)).cloned().collect()
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.read().get(id).cloned()
    }

    pub fn add(&self, input: T::Input) -> T {
        let mut guard = self.write();
        let mut id = Uuid::new_v4();
        while guard.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let record = T::assemble(id, input);
        guard.insert(id, record.clone());
        debug!(%id, total = guard.len(), "record added");
        record
    }

    /// Replace every field of the record stored under `id`. The id itself
    /// is kept.
    pub fn update(&self, id: &Uuid, replacement: T::Input) -> Option<T> {
        let mut guard = self.write();
        let Some(slot) = guard.get_mut(id) else {
            warn!(%id, "update on missing record");
            return None;
        };
        *slot = T::assemble(*id, replacement);
        Some(slot.clone())
    }

    pub fn delete(&self, id: &Uuid) -> bool {
        let removed = self.write().remove(id).is_some();
        if !removed {
            warn!(%id, "delete on missing record");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
