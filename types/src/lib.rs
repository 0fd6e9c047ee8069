//! Fundamental types for the governance hook.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account IDs, hashes, hook state keys, the XFL decimal float, payment amounts and
//! transaction parameters.

pub mod account;
pub mod amount;
pub mod error;
pub mod hash;
mod hex_serde;
pub mod params;
pub mod state_key;
pub mod xfl;

pub use account::AccountId;
pub use amount::Amount;
pub use error::TypesError;
pub use hash::{HookHash, Namespace, TxHash};
pub use params::HookParams;
pub use state_key::StateKey;
pub use xfl::Xfl;
