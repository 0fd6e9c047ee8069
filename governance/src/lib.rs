//! Two-layer table governance for hook accounts.
//!
//! A table is a set of up to twenty seats on an account. Members vote on
//! seat membership, on the hook installed at each of the ten hook slots, and
//! on the reward rate and delay. Votes are counted per value, and a value that
//! reaches its threshold is actioned exactly once.
//!
//! The table on the genesis account is the primary table. Every other table
//! decides its own layer 2 topics and forwards layer 1 votes to the primary
//! table once its own members agree on them.
//!
//! All state lives in the table account's hook namespace and is read and
//! written through a [`govern_store::HookState`]; the host discards those
//! writes when an execution rolls back.

pub mod ballot;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod keys;
pub mod outcome;
pub mod params;
pub mod quorum;
pub mod rescue;
pub mod seats;
pub mod topic;
pub mod votes;

pub use ballot::{Ballot, VoteValue};
pub use config::{GovernanceConfig, GENESIS_ACCOUNT};
pub use context::{HookContext, TableRole, TxKind};
pub use engine::GovernanceEngine;
pub use error::GovernanceError;
pub use outcome::{Effect, HookOutcome, Tally, Verdict};
pub use params::RewardParams;
pub use quorum::{Route, ThresholdPolicy};
pub use rescue::{GateState, RescueGate, RescueWindow};
pub use seats::{SeatChange, SeatZeroPolicy};
pub use topic::{classify, InvalidTopic, Layer, Topic, TopicClass};
