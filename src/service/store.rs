//! Per-key locked storage.
//!
//! Every entry sits behind its own mutex. Updates run against a copy of the
//! entry and replace it only on success, so a failed update never leaves a
//! partial write behind. Creation of a missing entry happens under the map's
//! write lock, so two callers can never create the same key twice.

use parking_lot::{Mutex, RwLock};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::EngineResult;

type Handle<V> = Arc<Mutex<V>>;

#[derive(Debug)]
pub(crate) struct KeyedStore<K, V> {
    entries: RwLock<HashMap<K, Handle<V>>>,
}

impl<K, V> Default for KeyedStore<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> KeyedStore<K, V> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of an entry.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handle(key).map(|handle| handle.lock().clone())
    }

    /// Returns snapshots of every entry accepted by `filter`.
    pub(crate) fn snapshot(&self, mut filter: impl FnMut(&K) -> bool) -> Vec<V> {
        let handles: Vec<Handle<V>> = self
            .entries
            .read()
            .iter()
            .filter(|(key, _)| filter(key))
            .map(|(_, handle)| handle.clone())
            .collect();
        handles.iter().map(|handle| handle.lock().clone()).collect()
    }

    /// Returns the lock for a key, creating the entry if missing.
    pub(crate) fn handle_or_insert(&self, key: K, create: impl FnOnce() -> V) -> Handle<V> {
        if let Some(handle) = self.handle(&key) {
            return handle;
        }
        self.entries
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(create())))
            .clone()
    }

    /// Inserts a new entry; returns false if the key already exists.
    pub(crate) fn insert(&self, key: K, value: V) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, Arc::new(Mutex::new(value)));
        true
    }

    /// Updates an existing entry. Returns `None` when the key is missing.
    pub(crate) fn modify<Q, R>(
        &self,
        key: &Q,
        op: impl FnOnce(&mut V) -> EngineResult<R>,
    ) -> Option<EngineResult<(R, V)>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.handle(key).map(|handle| Self::apply(&handle, op))
    }

    /// Updates an entry, creating it first when missing. A created entry is
    /// stored only if `op` succeeds.
    pub(crate) fn upsert<R>(
        &self,
        key: K,
        create: impl FnOnce() -> V,
        op: impl FnOnce(&mut V) -> EngineResult<R>,
    ) -> EngineResult<(R, V)> {
        let handle = match self.handle(&key) {
            Some(handle) => handle,
            None => {
                let mut entries = self.entries.write();
                let existing = entries.get(&key).cloned();
                match existing {
                    Some(handle) => handle,
                    None => {
                        let mut fresh = create();
                        let out = op(&mut fresh)?;
                        entries.insert(key, Arc::new(Mutex::new(fresh.clone())));
                        return Ok((out, fresh));
                    }
                }
            }
        };
        Self::apply(&handle, op)
    }

    fn apply<R>(
        handle: &Handle<V>,
        op: impl FnOnce(&mut V) -> EngineResult<R>,
    ) -> EngineResult<(R, V)> {
        let mut guard = handle.lock();
        let mut next = guard.clone();
        let out = op(&mut next)?;
        *guard = next.clone();
        Ok((out, next))
    }

    fn handle<Q>(&self, key: &Q) -> Option<Handle<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.read().get(key).cloned()
    }
}
