//! Single-process ledger host for the governance hooks.
//!
//! Holds hook definitions and per-account hook installs, applies Invoke and
//! Payment transactions by running the hooks they trigger, and carries out
//! what the hooks ask for afterwards (emitted votes, hook reinstalls). Hook
//! state lives behind a [`govern_store::StateStore`], either in memory or in
//! LMDB.

pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod logging;
pub mod transaction;

pub use config::{NodeConfig, StorageBackend};
pub use error::NodeError;
pub use hooks::{sha512_half, HookDefinition, HookKind, InstalledHook, SetHookEntry, TxType};
pub use host::{Ledger, NamespaceEntry};
pub use logging::{init_logging, LogFormat};
pub use transaction::{HookExecution, Transaction, TransactionKind, TxReceipt, TxResult};
