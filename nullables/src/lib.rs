//! Nullable infrastructure for deterministic testing.
//!
//! Hook state and ledger lookups are abstracted behind traits in
//! `govern-store`. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod ledger;
pub mod store;

pub use ledger::NullLedgerView;
pub use store::NullStateStore;
