//! Rescue mode: a payment hook that keeps hook hash voting alive while
//! refusing to move value.
//!
//! The gate sits in `Normal` state until the rescue window flag is opened in
//! the table's namespace. While the window is open, native payments of at
//! most the cap are treated as votes and passed to the governance engine,
//! restricted to hook hash topics. Everything else passes untouched.

use govern_store::HookState;

use crate::ballot::Ballot;
use crate::config::GovernanceConfig;
use crate::context::{HookContext, TxKind};
use crate::engine::GovernanceEngine;
use crate::error::GovernanceError;
use crate::keys;
use crate::outcome::{self, HookOutcome};
use crate::seats;
use crate::topic::Topic;

const WINDOW_OPEN: &[u8] = &[1];

/// The rescue window flag.
pub struct RescueWindow;

impl RescueWindow {
    pub fn open(state: &mut HookState<'_, '_>) -> Result<(), GovernanceError> {
        Ok(state.set(&keys::rescue_window(), WINDOW_OPEN)?)
    }

    pub fn close(state: &mut HookState<'_, '_>) {
        state.delete(&keys::rescue_window());
    }

    pub fn is_open(state: &HookState<'_, '_>) -> Result<bool, GovernanceError> {
        Ok(state.get(&keys::rescue_window())?.is_some())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Normal,
    RescueActive,
}

pub struct RescueGate {
    engine: GovernanceEngine,
}

impl RescueGate {
    pub fn new(config: GovernanceConfig) -> Self {
        Self {
            engine: GovernanceEngine::new(config),
        }
    }

    pub fn state(state: &HookState<'_, '_>) -> Result<GateState, GovernanceError> {
        if RescueWindow::is_open(state)? {
            Ok(GateState::RescueActive)
        } else {
            Ok(GateState::Normal)
        }
    }

    pub fn execute(&self, ctx: &HookContext<'_>, state: &mut HookState<'_, '_>) -> HookOutcome {
        match self.run(ctx, state) {
            Ok(outcome) => outcome,
            Err(err) => {
                let outcome = HookOutcome::from_error(&err);
                tracing::info!(
                    table = %ctx.hook_account,
                    from = %ctx.originator,
                    verdict = ?outcome.verdict,
                    %err,
                    "rescue gate refused payment vote"
                );
                outcome
            }
        }
    }

    fn run(
        &self,
        ctx: &HookContext<'_>,
        state: &mut HookState<'_, '_>,
    ) -> Result<HookOutcome, GovernanceError> {
        let TxKind::Payment(amount) = ctx.kind else {
            return Ok(HookOutcome::accept(outcome::PASS_NON_PAYMENT));
        };
        if Self::state(state)? == GateState::Normal {
            return Err(GovernanceError::RescueWindowClosed);
        }
        let drops = amount.drops().ok_or(GovernanceError::NonNativeAmount)?;
        if drops > self.engine.config().rescue_payment_cap_drops {
            return Err(GovernanceError::PaymentCapExceeded);
        }
        if ctx.is_outgoing() {
            return Ok(HookOutcome::accept(outcome::PASS_OUTGOING));
        }
        if seats::member_count(state)?.is_none() {
            return Err(GovernanceError::SetupNotDone);
        }
        if seats::seat_of(state, &ctx.originator)?.is_none() {
            return Err(GovernanceError::NotMember);
        }

        let topic = Ballot::topic(ctx.params)?;
        match topic {
            Topic::Seat(_) => return Err(GovernanceError::SeatTopicInRescue),
            Topic::RewardRate | Topic::RewardDelay => {
                return Err(GovernanceError::RewardTopicInRescue)
            }
            Topic::HookHash(_) => {}
        }
        let role = self.engine.role(&ctx.hook_account);
        let ballot = Ballot::for_topic(topic, ctx.params, role)?;
        self.engine.cast_vote(ctx, state, &ballot)
    }
}
