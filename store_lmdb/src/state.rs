//! LMDB implementation of StateStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RwTxn};

use govern_store::{StateScope, StateStore, StateWrite, StoreError};
use govern_types::StateKey;

use crate::LmdbError;

const SCOPE_LEN: usize = 20 + 32;

pub struct LmdbStateStore {
    pub(crate) env: Arc<Env>,
    pub(crate) hook_state_db: Database<Bytes, Bytes>,
}

fn scope_prefix(scope: &StateScope) -> [u8; SCOPE_LEN] {
    let mut prefix = [0u8; SCOPE_LEN];
    prefix[..20].copy_from_slice(scope.account.as_bytes());
    prefix[20..].copy_from_slice(scope.namespace.as_bytes());
    prefix
}

fn entry_key(scope: &StateScope, key: &StateKey) -> [u8; SCOPE_LEN + 32] {
    let mut full = [0u8; SCOPE_LEN + 32];
    full[..SCOPE_LEN].copy_from_slice(&scope_prefix(scope));
    full[SCOPE_LEN..].copy_from_slice(key.as_bytes());
    full
}

impl LmdbStateStore {
    fn write(&self, wtxn: &mut RwTxn<'_>, write: &StateWrite) -> Result<(), LmdbError> {
        let key = entry_key(&write.scope, &write.key);
        match &write.data {
            Some(data) => self.hook_state_db.put(wtxn, &key, data)?,
            None => {
                self.hook_state_db.delete(wtxn, &key)?;
            }
        }
        Ok(())
    }
}

impl StateStore for LmdbStateStore {
    fn get_state(&self, scope: &StateScope, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .hook_state_db
            .get(&rtxn, &entry_key(scope, key))
            .map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }

    fn put_state(&self, scope: &StateScope, key: &StateKey, data: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.hook_state_db
            .put(&mut wtxn, &entry_key(scope, key), data)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn delete_state(&self, scope: &StateScope, key: &StateKey) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.hook_state_db
            .delete(&mut wtxn, &entry_key(scope, key))
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn namespace_entries(&self, scope: &StateScope) -> Result<Vec<(StateKey, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self
            .hook_state_db
            .prefix_iter(&rtxn, &scope_prefix(scope))
            .map_err(LmdbError::from)?;
        let mut result = Vec::new();
        for entry in iter {
            let (key, val) = entry.map_err(LmdbError::from)?;
            let state_key: [u8; 32] = key[SCOPE_LEN..].try_into().map_err(|_| {
                LmdbError::Corruption(format!("hook state key of {} bytes", key.len()))
            })?;
            result.push((StateKey::new(state_key), val.to_vec()));
        }
        Ok(result)
    }

    fn clear_namespace(&self, scope: &StateScope) -> Result<usize, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let mut to_delete = Vec::new();
        {
            let iter = self
                .hook_state_db
                .prefix_iter(&wtxn, &scope_prefix(scope))
                .map_err(LmdbError::from)?;
            for entry in iter {
                let (key, _) = entry.map_err(LmdbError::from)?;
                to_delete.push(key.to_vec());
            }
        }
        for key in &to_delete {
            self.hook_state_db
                .delete(&mut wtxn, key)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(%scope, deleted = to_delete.len(), "cleared hook namespace");
        Ok(to_delete.len())
    }

    fn apply_writes(&self, writes: &[StateWrite]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        for write in writes {
            self.write(&mut wtxn, write)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
