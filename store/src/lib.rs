//! Abstract storage traits for hook state.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`StateStore`]. The rest of the codebase depends only on the traits.
//! Hook executions never write to a store directly: they write into a
//! [`StateBatch`] that the host commits only when the whole transaction
//! succeeds.

pub mod batch;
pub mod error;
pub mod ledger;
pub mod state;

pub use batch::{HookState, StateBatch, StateWrite};
pub use error::StoreError;
pub use ledger::LedgerView;
pub use state::{StateScope, StateStore, MAX_STATE_DATA};
