//! The governance hook: setup, vote recording, quorum and actioning.

use govern_store::HookState;
use govern_types::{AccountId, HookHash, HookParams, Xfl};

use crate::ballot::{self, Ballot};
use crate::config::GovernanceConfig;
use crate::context::{HookContext, TableRole, TxKind};
use crate::error::GovernanceError;
use crate::keys;
use crate::outcome::{self, Effect, HookOutcome, Tally};
use crate::params;
use crate::quorum::Route;
use crate::seats::{self, SeatChange};
use crate::topic::{Layer, Topic, SEAT_COUNT};
use crate::votes;

const PARAM_INITIAL_MEMBER_COUNT: &[u8] = b"IMC";
const PARAM_INITIAL_REWARD_RATE: &[u8] = b"IRR";
const PARAM_INITIAL_REWARD_DELAY: &[u8] = b"IRD";

fn initial_seat_param(seat: u8) -> [u8; 3] {
    [b'I', b'S', seat]
}

pub struct GovernanceEngine {
    config: GovernanceConfig,
}

impl GovernanceEngine {
    pub fn new(config: GovernanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn role(&self, hook_account: &AccountId) -> TableRole {
        TableRole::of(hook_account, &self.config.genesis)
    }

    /// Run the hook for one transaction.
    ///
    /// A `Rollback` outcome means the caller must discard everything written
    /// to `state` during this transaction.
    pub fn execute(&self, ctx: &HookContext<'_>, state: &mut HookState<'_, '_>) -> HookOutcome {
        match self.run(ctx, state) {
            Ok(outcome) => {
                tracing::debug!(
                    table = %ctx.hook_account,
                    from = %ctx.originator,
                    message = %outcome.message,
                    "governance hook accepted"
                );
                outcome
            }
            Err(err) => {
                let outcome = HookOutcome::from_error(&err);
                tracing::info!(
                    table = %ctx.hook_account,
                    from = %ctx.originator,
                    verdict = ?outcome.verdict,
                    %err,
                    "governance hook refused transaction"
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
        if ctx.kind != TxKind::Invoke {
            return Ok(HookOutcome::accept(outcome::PASS_NON_INVOKE));
        }
        if ctx.is_outgoing() {
            return Ok(HookOutcome::accept(outcome::PASS_OUTGOING));
        }
        if seats::member_count(state)?.is_none() {
            return self.setup(ctx.install_params, state);
        }
        if seats::seat_of(state, &ctx.originator)?.is_none() {
            return Err(GovernanceError::NotMember);
        }
        let ballot = Ballot::parse(ctx.params, self.role(&ctx.hook_account))?;
        self.record_and_tally(ctx, state, &ballot)
    }

    /// Seat the initial members named by the install parameters.
    pub fn setup(
        &self,
        install: &HookParams,
        state: &mut HookState<'_, '_>,
    ) -> Result<HookOutcome, GovernanceError> {
        let count = match install.get(PARAM_INITIAL_MEMBER_COUNT) {
            Some([n]) if (1..=SEAT_COUNT).contains(n) => *n,
            _ => return Err(GovernanceError::SetupMemberCount),
        };

        let mut initial: Vec<AccountId> = Vec::with_capacity(count as usize);
        for seat in 0..count {
            let member = install
                .get(&initial_seat_param(seat))
                .and_then(|raw| AccountId::from_slice(raw).ok())
                .filter(|a| !a.is_zero())
                .ok_or(GovernanceError::SetupSeat(seat))?;
            if initial.contains(&member) {
                return Err(GovernanceError::SetupDuplicateMember(member));
            }
            initial.push(member);
        }
        seats::seat_initial(state, &initial)?;

        if let Some(raw) = install.get(PARAM_INITIAL_REWARD_RATE) {
            let rate = initial_xfl(raw)
                .and_then(ballot::validate_rate)
                .map_err(|_| GovernanceError::SetupReward)?;
            params::set_reward_rate(state, rate)?;
        }
        if let Some(raw) = install.get(PARAM_INITIAL_REWARD_DELAY) {
            let secs = initial_xfl(raw)
                .and_then(ballot::delay_seconds)
                .map_err(|_| GovernanceError::SetupReward)?;
            params::set_reward_delay(state, secs)?;
        }

        tracing::info!(members = count, scope = %state.scope(), "governance table set up");
        Ok(HookOutcome::accept(outcome::SETUP_COMPLETE))
    }

    /// Record a member's ballot and action it if it reaches its threshold.
    pub fn cast_vote(
        &self,
        ctx: &HookContext<'_>,
        state: &mut HookState<'_, '_>,
        ballot: &Ballot,
    ) -> Result<HookOutcome, GovernanceError> {
        if seats::seat_of(state, &ctx.originator)?.is_none() {
            return Err(GovernanceError::NotMember);
        }
        self.record_and_tally(ctx, state, ballot)
    }

    fn record_and_tally(
        &self,
        ctx: &HookContext<'_>,
        state: &mut HookState<'_, '_>,
        ballot: &Ballot,
    ) -> Result<HookOutcome, GovernanceError> {
        let role = self.role(&ctx.hook_account);
        let votes = votes::record(state, &ctx.originator, ballot)?;
        let members = seats::member_count(state)?.ok_or(GovernanceError::SetupNotDone)?;

        let route = match (role, ballot.layer) {
            (TableRole::Secondary, Layer::One) => Route::Forward,
            _ => Route::Local,
        };
        let tally = Tally {
            votes,
            required: self.config.threshold.required(route, ballot.topic, members),
            members,
        };
        tracing::debug!(
            topic = %ballot.topic,
            layer = %ballot.layer,
            votes,
            required = tally.required,
            members,
            "vote recorded"
        );

        if !tally.reached() {
            let message = match route {
                Route::Forward => outcome::NOT_YET_L1,
                Route::Local => outcome::NOT_YET,
            };
            return Ok(HookOutcome::accept(message).with_tally(tally));
        }

        let result = match route {
            Route::Forward => self.forward(ctx, state, ballot)?,
            Route::Local => self.action(ctx, state, role, ballot)?,
        };
        Ok(result.with_tally(tally))
    }

    /// Emit a layer 1 vote from this table to the primary table.
    fn forward(
        &self,
        ctx: &HookContext<'_>,
        state: &mut HookState<'_, '_>,
        ballot: &Ballot,
    ) -> Result<HookOutcome, GovernanceError> {
        let key = keys::actioned(ballot.topic, Layer::One);
        if state.get(&key)?.as_deref() == Some(ballot.value.as_bytes()) {
            return Ok(HookOutcome::accept(outcome::L1_ALREADY_EMITTED));
        }
        state.set(&key, ballot.value.as_bytes())?;

        let mut result = HookOutcome::accept(outcome::L1_EMITTED).with_effect(Effect::EmitVote {
            destination: self.config.genesis,
            topic: ballot.topic,
            value: ballot.value.as_bytes().to_vec(),
        });
        // The layer 2 half of a hook hash may already be in place.
        if let Topic::HookHash(slot) = ballot.topic {
            let hash = ballot.value.to_hook_hash()?;
            let installable = hash.is_zero() || ctx.ledger.hook_definition_exists(&hash);
            if installable
                && both_layers_agree(state, slot, &hash)?
                && !self.installed_matches(ctx, slot, &hash)
            {
                result = result.with_effect(hook_effect(slot, hash));
            }
        }
        tracing::info!(topic = %ballot.topic, to = %self.config.genesis, "emitting L1 vote");
        Ok(result)
    }

    /// Apply a vote that reached its threshold on this table.
    fn action(
        &self,
        ctx: &HookContext<'_>,
        state: &mut HookState<'_, '_>,
        role: TableRole,
        ballot: &Ballot,
    ) -> Result<HookOutcome, GovernanceError> {
        match ballot.topic {
            Topic::Seat(seat) => {
                let member = ballot.value.to_account()?;
                let change = seats::commit(state, seat, member, self.config.seat_zero)?;
                tracing::info!(seat, ?change, "seat vote actioned");
                let message = match change {
                    SeatChange::Assigned { .. } => outcome::SEAT_ASSIGNED,
                    SeatChange::Moved { .. } => outcome::SEAT_MOVED,
                    SeatChange::Vacated { .. } => outcome::SEAT_VACATED,
                    SeatChange::Unchanged => outcome::SEAT_ALREADY,
                };
                Ok(HookOutcome::accept(message))
            }
            Topic::HookHash(slot) => {
                let hash = ballot.value.to_hook_hash()?;
                if !hash.is_zero() && !ctx.ledger.hook_definition_exists(&hash) {
                    return Err(GovernanceError::HookNotOnLedger);
                }
                state.set(&keys::actioned(ballot.topic, ballot.layer), hash.as_bytes())?;
                if self.installed_matches(ctx, slot, &hash) {
                    return Ok(HookOutcome::accept(outcome::HOOK_ALREADY));
                }
                let ratified = match role {
                    TableRole::Primary => true,
                    TableRole::Secondary => both_layers_agree(state, slot, &hash)?,
                };
                if !ratified {
                    return Ok(HookOutcome::accept(outcome::HOOK_RECORDED));
                }
                tracing::info!(slot, %hash, "hook actioned");
                Ok(HookOutcome::accept(outcome::HOOK_ACTIONED).with_effect(hook_effect(slot, hash)))
            }
            Topic::RewardRate => {
                let rate = ballot::validate_rate(ballot.value.to_xfl()?)?;
                if params::set_reward_rate(state, rate)? {
                    tracing::info!(%rate, "reward rate changed");
                    Ok(HookOutcome::accept(outcome::REWARD_RATE_SET))
                } else {
                    Ok(HookOutcome::accept(outcome::REWARD_ALREADY))
                }
            }
            Topic::RewardDelay => {
                let secs = ballot::delay_seconds(ballot.value.to_xfl()?)?;
                if params::set_reward_delay(state, secs)? {
                    tracing::info!(secs, "reward delay changed");
                    Ok(HookOutcome::accept(outcome::REWARD_DELAY_SET))
                } else {
                    Ok(HookOutcome::accept(outcome::REWARD_ALREADY))
                }
            }
        }
    }

    fn installed_matches(&self, ctx: &HookContext<'_>, slot: u8, hash: &HookHash) -> bool {
        match ctx.ledger.installed_hook(&ctx.hook_account, slot) {
            Some(installed) => &installed == hash,
            None => hash.is_zero(),
        }
    }
}

/// A secondary table ratifies a hook hash once both layers hold the same
/// record for the slot.
fn both_layers_agree(
    state: &HookState<'_, '_>,
    slot: u8,
    hash: &HookHash,
) -> Result<bool, GovernanceError> {
    let topic = Topic::HookHash(slot);
    for layer in Layer::ALL {
        let record = state.get(&keys::actioned(topic, layer))?;
        if record.as_deref() != Some(hash.as_bytes().as_slice()) {
            return Ok(false);
        }
    }
    Ok(true)
}

fn hook_effect(slot: u8, hash: HookHash) -> Effect {
    Effect::SetHook {
        slot,
        hash: (!hash.is_zero()).then_some(hash),
    }
}

fn initial_xfl(raw: &[u8]) -> Result<Xfl, GovernanceError> {
    let bytes: [u8; 8] = raw.try_into().map_err(|_| GovernanceError::SetupReward)?;
    Xfl::from_le_bytes(bytes).map_err(|_| GovernanceError::SetupReward)
}
