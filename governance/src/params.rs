//! Reward parameters decided at layer 1.

use serde::{Deserialize, Serialize};

use govern_store::HookState;
use govern_types::Xfl;

use crate::error::GovernanceError;
use crate::keys;

/// The reward rate and delay currently in force, if set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardParams {
    pub rate: Option<Xfl>,
    pub delay_secs: Option<u64>,
}

impl RewardParams {
    pub fn load(state: &HookState<'_, '_>) -> Result<Self, GovernanceError> {
        Ok(Self {
            rate: reward_rate(state)?,
            delay_secs: reward_delay(state)?,
        })
    }
}

pub fn reward_rate(state: &HookState<'_, '_>) -> Result<Option<Xfl>, GovernanceError> {
    let Some(raw) = state.get(&keys::reward_rate())? else {
        return Ok(None);
    };
    let bytes: [u8; 8] = raw
        .as_slice()
        .try_into()
        .map_err(|_| GovernanceError::Internal("malformed reward rate entry"))?;
    Xfl::from_le_bytes(bytes)
        .map(Some)
        .map_err(|_| GovernanceError::Internal("malformed reward rate entry"))
}

pub fn reward_delay(state: &HookState<'_, '_>) -> Result<Option<u64>, GovernanceError> {
    let Some(raw) = state.get(&keys::reward_delay())? else {
        return Ok(None);
    };
    let bytes: [u8; 8] = raw
        .as_slice()
        .try_into()
        .map_err(|_| GovernanceError::Internal("malformed reward delay entry"))?;
    Ok(Some(u64::from_le_bytes(bytes)))
}

/// Store a new rate. Returns false when it was already in force.
pub fn set_reward_rate(state: &mut HookState<'_, '_>, rate: Xfl) -> Result<bool, GovernanceError> {
    if reward_rate(state)? == Some(rate) {
        return Ok(false);
    }
    state.set(&keys::reward_rate(), &rate.to_le_bytes())?;
    Ok(true)
}

/// Store a new delay. Returns false when it was already in force.
pub fn set_reward_delay(state: &mut HookState<'_, '_>, secs: u64) -> Result<bool, GovernanceError> {
    if reward_delay(state)? == Some(secs) {
        return Ok(false);
    }
    state.set(&keys::reward_delay(), &secs.to_le_bytes())?;
    Ok(true)
}
