//! Hook state storage trait.

use serde::{Deserialize, Serialize};
use std::fmt;

use govern_types::{AccountId, Namespace, StateKey};

use crate::batch::StateWrite;
use crate::StoreError;

/// Largest value a single hook state entry may hold.
pub const MAX_STATE_DATA: usize = 256;

/// Hook state is owned by an account and partitioned by namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateScope {
    pub account: AccountId,
    pub namespace: Namespace,
}

impl StateScope {
    pub fn new(account: AccountId, namespace: Namespace) -> Self {
        Self { account, namespace }
    }
}

impl fmt::Display for StateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.namespace)
    }
}

/// Trait for persisting hook state entries.
pub trait StateStore {
    /// Read one entry.
    fn get_state(&self, scope: &StateScope, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Create or overwrite one entry.
    fn put_state(&self, scope: &StateScope, key: &StateKey, data: &[u8]) -> Result<(), StoreError>;

    /// Delete one entry. Deleting a missing entry is not an error.
    fn delete_state(&self, scope: &StateScope, key: &StateKey) -> Result<(), StoreError>;

    /// All entries of a namespace, in key order.
    fn namespace_entries(&self, scope: &StateScope) -> Result<Vec<(StateKey, Vec<u8>)>, StoreError>;

    /// Delete every entry of a namespace, returning how many were removed.
    fn clear_namespace(&self, scope: &StateScope) -> Result<usize, StoreError>;

    /// Apply a set of writes. Backends with real transactions override this
    /// so the whole set lands atomically.
    fn apply_writes(&self, writes: &[StateWrite]) -> Result<(), StoreError> {
        for write in writes {
            match &write.data {
                Some(data) => self.put_state(&write.scope, &write.key, data)?,
                None => self.delete_state(&write.scope, &write.key)?,
            }
        }
        Ok(())
    }
}
