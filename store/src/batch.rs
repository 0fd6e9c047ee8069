//! Write batching: a transaction-scoped overlay over a [`StateStore`].
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = StateBatch::new(&store);
//! let mut state = batch.scope(scope);
//! state.set(&key, &value)?;
//! batch.commit()?;
//! ```
//!
//! Reads through the batch see its own pending writes. If the batch is
//! dropped without calling [`StateBatch::commit`], every write is discarded,
//! which is how a rolled-back hook leaves no trace.

use std::collections::BTreeMap;

use govern_types::StateKey;

use crate::state::{StateScope, StateStore, MAX_STATE_DATA};
use crate::StoreError;

/// One pending write: `Some(data)` stores, `None` deletes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateWrite {
    pub scope: StateScope,
    pub key: StateKey,
    pub data: Option<Vec<u8>>,
}

pub struct StateBatch<'a> {
    store: &'a dyn StateStore,
    writes: BTreeMap<(StateScope, StateKey), Option<Vec<u8>>>,
}

impl<'a> StateBatch<'a> {
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self {
            store,
            writes: BTreeMap::new(),
        }
    }

    pub fn get(&self, scope: &StateScope, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        match self.writes.get(&(*scope, *key)) {
            Some(pending) => Ok(pending.clone()),
            None => self.store.get_state(scope, key),
        }
    }

    pub fn set(&mut self, scope: &StateScope, key: &StateKey, data: &[u8]) -> Result<(), StoreError> {
        if data.len() > MAX_STATE_DATA {
            return Err(StoreError::ValueTooLarge {
                size: data.len(),
                max: MAX_STATE_DATA,
            });
        }
        self.writes.insert((*scope, *key), Some(data.to_vec()));
        Ok(())
    }

    pub fn delete(&mut self, scope: &StateScope, key: &StateKey) {
        self.writes.insert((*scope, *key), None);
    }

    /// Bind the batch to one scope, giving a hook its view of state.
    pub fn scope(&mut self, scope: StateScope) -> HookState<'_, 'a> {
        HookState { batch: self, scope }
    }

    /// Namespace listing with pending writes merged in.
    pub fn namespace_entries(&self, scope: &StateScope) -> Result<Vec<(StateKey, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<StateKey, Vec<u8>> =
            self.store.namespace_entries(scope)?.into_iter().collect();
        for ((s, key), data) in &self.writes {
            if s != scope {
                continue;
            }
            match data {
                Some(data) => merged.insert(*key, data.clone()),
                None => merged.remove(key),
            };
        }
        Ok(merged.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> Vec<StateWrite> {
        self.writes
            .into_iter()
            .map(|((scope, key), data)| StateWrite { scope, key, data })
            .collect()
    }

    /// Apply every pending write to the underlying store.
    pub fn commit(self) -> Result<usize, StoreError> {
        let store = self.store;
        let writes = self.into_writes();
        store.apply_writes(&writes)?;
        tracing::debug!(writes = writes.len(), "state batch committed");
        Ok(writes.len())
    }
}

/// A batch bound to one account namespace: the `state` / `state_set`
/// surface a hook sees.
pub struct HookState<'b, 'a> {
    batch: &'b mut StateBatch<'a>,
    scope: StateScope,
}

impl HookState<'_, '_> {
    pub fn scope(&self) -> &StateScope {
        &self.scope
    }

    pub fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        self.batch.get(&self.scope, key)
    }

    pub fn set(&mut self, key: &StateKey, data: &[u8]) -> Result<(), StoreError> {
        self.batch.set(&self.scope, key, data)
    }

    pub fn delete(&mut self, key: &StateKey) {
        self.batch.delete(&self.scope, key)
    }

    pub fn entries(&self) -> Result<Vec<(StateKey, Vec<u8>)>, StoreError> {
        self.batch.namespace_entries(&self.scope)
    }
}
