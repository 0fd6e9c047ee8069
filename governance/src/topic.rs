//! Topic resolution: turns the two-byte `T` parameter into a typed topic.
//!
//! | Code         | Topic             | Vote value            |
//! |--------------|-------------------|-----------------------|
//! | `'S'`, 0..19 | seat membership   | 20-byte account ID    |
//! | `'H'`, 0..9  | hook hash at slot | 32-byte hook hash     |
//! | `'R'`, `'R'` | reward rate       | 8-byte LE XFL         |
//! | `'R'`, `'D'` | reward delay      | 8-byte LE XFL seconds |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of seats at a governance table.
pub const SEAT_COUNT: u8 = 20;

/// Number of hook slots on an account.
pub const HOOK_SLOTS: u8 = 10;

/// Which layer a vote addresses.
///
/// Layer 1 topics are decided at the primary table; layer 2 topics are
/// decided at the table the vote was cast on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    One,
    Two,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::One, Layer::Two];

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Layer::One),
            2 => Some(Layer::Two),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Layer::One => 1,
            Layer::Two => 2,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Layer::One => Layer::Two,
            Layer::Two => Layer::One,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.as_byte())
    }
}

/// A valid governance topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Topic {
    Seat(u8),
    HookHash(u8),
    RewardRate,
    RewardDelay,
}

/// Why a topic code was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidTopic {
    UnknownType,
    SeatOutOfRange(u8),
    HookSlotOutOfRange(u8),
    UnknownReward(u8),
}

impl fmt::Display for InvalidTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidTopic::UnknownType => {
                f.write_str("Governance: Valid TOPIC must be specified as otxn parameter.")
            }
            InvalidTopic::SeatOutOfRange(_) => {
                f.write_str("Governance: Valid seat topics are 0 through 19.")
            }
            InvalidTopic::HookSlotOutOfRange(_) => {
                f.write_str("Governance: Valid hook topics are 0 through 9.")
            }
            InvalidTopic::UnknownReward(_) => {
                f.write_str("Governance: Valid reward topics are RR (rate) and RD (delay).")
            }
        }
    }
}

/// Result of classifying a raw topic code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopicClass {
    Seat(u8),
    HookHash(u8),
    RewardRate,
    RewardDelay,
    Invalid(InvalidTopic),
}

impl TopicClass {
    pub fn topic(self) -> Result<Topic, InvalidTopic> {
        match self {
            TopicClass::Seat(n) => Ok(Topic::Seat(n)),
            TopicClass::HookHash(n) => Ok(Topic::HookHash(n)),
            TopicClass::RewardRate => Ok(Topic::RewardRate),
            TopicClass::RewardDelay => Ok(Topic::RewardDelay),
            TopicClass::Invalid(why) => Err(why),
        }
    }
}

/// Classify a topic code. Pure; never touches state.
pub fn classify(code: &[u8]) -> TopicClass {
    let [t, n] = match code {
        [t, n] => [*t, *n],
        _ => return TopicClass::Invalid(InvalidTopic::UnknownType),
    };
    match t {
        b'S' if n < SEAT_COUNT => TopicClass::Seat(n),
        b'S' => TopicClass::Invalid(InvalidTopic::SeatOutOfRange(n)),
        b'H' if n < HOOK_SLOTS => TopicClass::HookHash(n),
        b'H' => TopicClass::Invalid(InvalidTopic::HookSlotOutOfRange(n)),
        b'R' if n == b'R' => TopicClass::RewardRate,
        b'R' if n == b'D' => TopicClass::RewardDelay,
        b'R' => TopicClass::Invalid(InvalidTopic::UnknownReward(n)),
        _ => TopicClass::Invalid(InvalidTopic::UnknownType),
    }
}

impl Topic {
    /// The two-byte code carried in the `T` parameter.
    pub fn code(self) -> [u8; 2] {
        match self {
            Topic::Seat(n) => [b'S', n],
            Topic::HookHash(n) => [b'H', n],
            Topic::RewardRate => [b'R', b'R'],
            Topic::RewardDelay => [b'R', b'D'],
        }
    }

    /// Width of the `V` parameter for this topic.
    pub fn value_len(self) -> usize {
        match self {
            Topic::Seat(_) => 20,
            Topic::HookHash(_) => 32,
            Topic::RewardRate | Topic::RewardDelay => 8,
        }
    }

    pub fn is_reward(self) -> bool {
        matches!(self, Topic::RewardRate | Topic::RewardDelay)
    }

    /// Reward topics are decided only at layer 1.
    pub fn allowed_on(self, layer: Layer) -> bool {
        !(self.is_reward() && layer == Layer::Two)
    }

    /// Every topic a table can hold votes for.
    pub fn all() -> impl Iterator<Item = Topic> {
        (0..SEAT_COUNT)
            .map(Topic::Seat)
            .chain((0..HOOK_SLOTS).map(Topic::HookHash))
            .chain([Topic::RewardRate, Topic::RewardDelay])
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Seat(n) => write!(f, "S{n}"),
            Topic::HookHash(n) => write!(f, "H{n}"),
            Topic::RewardRate => f.write_str("RR"),
            Topic::RewardDelay => f.write_str("RD"),
        }
    }
}
