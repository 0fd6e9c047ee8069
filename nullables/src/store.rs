//! Nullable store: thread-safe in-memory hook state for testing.

use govern_store::{StateScope, StateStore, StateWrite, StoreError};
use govern_types::StateKey;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory hook state store.
pub struct NullStateStore {
    entries: Mutex<BTreeMap<(StateScope, StateKey), Vec<u8>>>,
}

impl NullStateStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Total number of entries across every scope.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for NullStateStore {
    fn get_state(&self, scope: &StateScope, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(&(*scope, *key)).cloned())
    }

    fn put_state(&self, scope: &StateScope, key: &StateKey, data: &[u8]) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert((*scope, *key), data.to_vec());
        Ok(())
    }

    fn delete_state(&self, scope: &StateScope, key: &StateKey) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(&(*scope, *key));
        Ok(())
    }

    fn namespace_entries(&self, scope: &StateScope) -> Result<Vec<(StateKey, Vec<u8>)>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|((s, _), _)| s == scope)
            .map(|((_, key), data)| (*key, data.clone()))
            .collect())
    }

    fn clear_namespace(&self, scope: &StateScope) -> Result<usize, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|(s, _), _| s != scope);
        Ok(before - entries.len())
    }

    fn apply_writes(&self, writes: &[StateWrite]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        for write in writes {
            match &write.data {
                Some(data) => entries.insert((write.scope, write.key), data.clone()),
                None => entries.remove(&(write.scope, write.key)),
            };
        }
        Ok(())
    }
}
