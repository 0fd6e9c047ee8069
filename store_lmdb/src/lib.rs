//! LMDB storage backend for hook state.
//!
//! Implements [`govern_store::StateStore`] using the `heed` LMDB bindings.
//! All namespaces of all accounts live in a single `hook_state` database
//! keyed by `account || namespace || state key`.

pub mod environment;
pub mod error;
pub mod state;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use state::LmdbStateStore;
