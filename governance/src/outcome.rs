//! The result of one hook execution.

use serde::{Deserialize, Serialize};

use govern_types::{AccountId, HookHash};

use crate::error::GovernanceError;
use crate::topic::Topic;

pub const SETUP_COMPLETE: &str = "Governance: Setup completed successfully.";
pub const NOT_YET_L1: &str = "Governance: Not yet enough votes to action L1 vote...";
pub const NOT_YET: &str = "Governance: Vote record. Not yet enough votes to action.";
pub const L1_EMITTED: &str = "Governance: Successfully emitted L1 vote.";
pub const L1_EMIT_FAILED: &str = "Governance: L1 vote emission failed.";
pub const L1_ALREADY_EMITTED: &str = "Governance: This L1 vote has already been emitted.";
pub const HOOK_ACTIONED: &str = "Governance: Hook actioned.";
pub const HOOK_RECORDED: &str =
    "Governance: Hook hash recorded. Awaiting ratification on the other layer.";
pub const HOOK_ALREADY: &str = "Governance: Target hook is already the same as actioned hook.";
pub const SEAT_ASSIGNED: &str = "Governance: Seat assigned.";
pub const SEAT_MOVED: &str = "Governance: Member moved to a new seat.";
pub const SEAT_VACATED: &str = "Governance: Seat vacated.";
pub const SEAT_ALREADY: &str = "Governance: Seat already holds the voted value.";
pub const REWARD_RATE_SET: &str = "Governance: Reward rate changed.";
pub const REWARD_DELAY_SET: &str = "Governance: Reward delay changed.";
pub const REWARD_ALREADY: &str = "Governance: Reward parameter already has the voted value.";
pub const PASS_OUTGOING: &str = "Governance: Passing outgoing txn.";
pub const PASS_NON_INVOKE: &str = "Governance: Passing non-Invoke txn.";
pub const PASS_NON_PAYMENT: &str =
    "Governance Rescue: Passing non-Payment txn. HookOn should be changed to avoid this.";

/// Accept keeps the transaction and the state it wrote; rollback discards
/// both.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accept,
    Rollback,
}

/// Something the host must do after the transaction commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Send an Invoke carrying `T`/`V` to `destination`.
    EmitVote {
        destination: AccountId,
        topic: Topic,
        value: Vec<u8>,
    },
    /// Reinstall hook `slot` on the table account. `None` deletes it.
    SetHook { slot: u8, hash: Option<HookHash> },
}

/// Vote count against the threshold it was measured by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub votes: u8,
    pub required: u8,
    pub members: u8,
}

impl Tally {
    pub fn reached(&self) -> bool {
        self.votes >= self.required
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutcome {
    pub verdict: Verdict,
    /// The hook return string.
    pub message: String,
    pub effects: Vec<Effect>,
    pub tally: Option<Tally>,
}

impl HookOutcome {
    pub fn accept(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Accept,
            message: message.into(),
            effects: Vec::new(),
            tally: None,
        }
    }

    pub fn rollback(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Rollback,
            message: message.into(),
            effects: Vec::new(),
            tally: None,
        }
    }

    pub fn from_error(err: &GovernanceError) -> Self {
        if err.is_passing() {
            Self::accept(err.to_string())
        } else {
            Self::rollback(err.to_string())
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_tally(mut self, tally: Tally) -> Self {
        self.tally = Some(tally);
        self
    }

    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accept
    }
}
