//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::state::LmdbStateStore;
use crate::LmdbError;

const HOOK_STATE_DB: &str = "hook_state";

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    hook_state_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the environment directory is owned by this process; no other
        // code opens the same path with different flags.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(4)
                .open(path)?
        };
        let mut wtxn = env.write_txn()?;
        let hook_state_db = env.create_database(&mut wtxn, Some(HOOK_STATE_DB))?;
        wtxn.commit()?;
        tracing::info!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env: Arc::new(env),
            hook_state_db,
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// A hook state store sharing this environment.
    pub fn state_store(&self) -> LmdbStateStore {
        LmdbStateStore {
            env: Arc::clone(&self.env),
            hook_state_db: self.hook_state_db,
        }
    }
}
