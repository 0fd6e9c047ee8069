//! Parsing of the `L`/`T`/`V` vote parameters into a [`Ballot`].

use govern_types::{AccountId, HookHash, HookParams, Xfl};

use crate::context::TableRole;
use crate::error::GovernanceError;
use crate::topic::{classify, Layer, Topic};

pub const PARAM_LAYER: &[u8] = b"L";
pub const PARAM_TOPIC: &[u8] = b"T";
pub const PARAM_VALUE: &[u8] = b"V";

/// A vote value, right-aligned in 32 bytes the way it is laid out in
/// hook state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoteValue {
    padded: [u8; 32],
    len: u8,
}

impl VoteValue {
    /// Accepts exactly the width the topic calls for.
    pub fn from_slice(topic: Topic, bytes: &[u8]) -> Result<Self, GovernanceError> {
        let len = topic.value_len();
        if bytes.len() != len {
            return Err(GovernanceError::MalformedValue);
        }
        let mut padded = [0u8; 32];
        padded[32 - len..].copy_from_slice(bytes);
        Ok(Self {
            padded,
            len: len as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.padded[32 - self.len as usize..]
    }

    pub fn padded(&self) -> &[u8; 32] {
        &self.padded
    }

    pub fn is_zero(&self) -> bool {
        self.padded.iter().all(|&b| b == 0)
    }

    pub fn to_account(&self) -> Result<AccountId, GovernanceError> {
        AccountId::from_slice(self.as_bytes()).map_err(|_| GovernanceError::MalformedValue)
    }

    pub fn to_hook_hash(&self) -> Result<HookHash, GovernanceError> {
        HookHash::from_slice(self.as_bytes()).map_err(|_| GovernanceError::MalformedValue)
    }

    pub fn to_xfl(&self) -> Result<Xfl, GovernanceError> {
        let bytes: [u8; 8] = self
            .as_bytes()
            .try_into()
            .map_err(|_| GovernanceError::MalformedValue)?;
        Xfl::from_le_bytes(bytes).map_err(|_| GovernanceError::MalformedValue)
    }
}

/// One member's vote as carried by a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ballot {
    pub layer: Layer,
    pub topic: Topic,
    pub value: VoteValue,
}

impl Ballot {
    /// Read the `T` parameter.
    pub fn topic(params: &HookParams) -> Result<Topic, GovernanceError> {
        let code = params.get(PARAM_TOPIC).unwrap_or_default();
        Ok(classify(code).topic()?)
    }

    pub fn parse(params: &HookParams, role: TableRole) -> Result<Self, GovernanceError> {
        let topic = Self::topic(params)?;
        Self::for_topic(topic, params, role)
    }

    /// Read `L` and `V` for an already classified topic.
    ///
    /// A primary table defaults to layer 1 when `L` is absent; a secondary
    /// table requires it.
    pub fn for_topic(
        topic: Topic,
        params: &HookParams,
        role: TableRole,
    ) -> Result<Self, GovernanceError> {
        let layer = match (params.get(PARAM_LAYER), role) {
            (None, TableRole::Primary) => Layer::One,
            (None, TableRole::Secondary) => return Err(GovernanceError::MissingLayer),
            (Some([b]), _) => Layer::from_byte(*b).ok_or(GovernanceError::InvalidLayer)?,
            (Some(_), _) => return Err(GovernanceError::InvalidLayer),
        };
        if !topic.allowed_on(layer) {
            return Err(GovernanceError::RewardOnLayerTwo);
        }

        let raw = params.get(PARAM_VALUE).ok_or(GovernanceError::MalformedValue)?;
        let value = VoteValue::from_slice(topic, raw)?;
        match topic {
            Topic::RewardRate => {
                validate_rate(value.to_xfl()?)?;
            }
            Topic::RewardDelay => {
                delay_seconds(value.to_xfl()?)?;
            }
            Topic::Seat(_) | Topic::HookHash(_) => {}
        }

        Ok(Self {
            layer,
            topic,
            value,
        })
    }

    /// The parameters that carry this ballot, as a member would submit it.
    pub fn to_params(&self) -> HookParams {
        HookParams::new()
            .with(PARAM_LAYER, [self.layer.as_byte()])
            .with(PARAM_TOPIC, self.topic.code())
            .with(PARAM_VALUE, self.value.as_bytes())
    }
}

/// A reward rate is a fraction in `[0, 1]`.
pub fn validate_rate(rate: Xfl) -> Result<Xfl, GovernanceError> {
    let one = Xfl::from_int(1).map_err(|_| GovernanceError::InvalidRewardRate)?;
    if rate.is_negative() || rate > one {
        return Err(GovernanceError::InvalidRewardRate);
    }
    Ok(rate)
}

/// A reward delay is a positive number of whole seconds.
pub fn delay_seconds(delay: Xfl) -> Result<u64, GovernanceError> {
    match delay.to_int(0) {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(GovernanceError::InvalidRewardDelay),
    }
}
