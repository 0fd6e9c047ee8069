//! Hook state key layout.
//!
//! All keys are 32 bytes. Short keys are right-aligned, so `MC` is thirty
//! zero bytes followed by `M` `C`.
//!
//! | Key                                   | Data                        |
//! |---------------------------------------|-----------------------------|
//! | `MC`                                  | member count, 1 byte        |
//! | `<account>`                           | seat index, 1 byte          |
//! | `<seat>`                              | occupant account, 20 bytes  |
//! | `V t n l 0.. <account>`               | that member's vote value    |
//! | `C t n l <padded value [4..32]>`      | votes for that value, 1 byte|
//! | `A t n l 0..`                         | value actioned or forwarded |
//! | `RR`                                  | reward rate, LE XFL         |
//! | `RD`                                  | reward delay, LE u64 seconds|
//! | `RW`                                  | rescue window flag          |

use govern_types::{AccountId, StateKey};

use crate::ballot::VoteValue;
use crate::topic::{classify, Layer, Topic};

const VOTE_TAG: u8 = b'V';
const COUNT_TAG: u8 = b'C';
const ACTIONED_TAG: u8 = b'A';

pub fn member_count() -> StateKey {
    StateKey::right_aligned(b"MC")
}

pub fn member(account: &AccountId) -> StateKey {
    StateKey::right_aligned(account.as_bytes())
}

pub fn seat(seat: u8) -> StateKey {
    StateKey::right_aligned(&[seat])
}

pub fn reward_rate() -> StateKey {
    StateKey::right_aligned(b"RR")
}

pub fn reward_delay() -> StateKey {
    StateKey::right_aligned(b"RD")
}

pub fn rescue_window() -> StateKey {
    StateKey::right_aligned(b"RW")
}

fn tagged(tag: u8, topic: Topic, layer: Layer) -> [u8; 32] {
    let [t, n] = topic.code();
    let mut key = [0u8; 32];
    key[0] = tag;
    key[1] = t;
    key[2] = n;
    key[3] = layer.as_byte();
    key
}

pub fn vote(topic: Topic, layer: Layer, voter: &AccountId) -> StateKey {
    let mut key = tagged(VOTE_TAG, topic, layer);
    key[12..].copy_from_slice(voter.as_bytes());
    StateKey::new(key)
}

/// The counter for one proposed value. The first four bytes of the padded
/// value are overwritten by the tag, so hook hashes sharing a 28-byte tail
/// share a counter.
pub fn count(topic: Topic, layer: Layer, value: &VoteValue) -> StateKey {
    let mut key = tagged(COUNT_TAG, topic, layer);
    key[4..].copy_from_slice(&value.padded()[4..]);
    StateKey::new(key)
}

pub fn actioned(topic: Topic, layer: Layer) -> StateKey {
    StateKey::new(tagged(ACTIONED_TAG, topic, layer))
}

/// A decoded `V` key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoteKey {
    pub topic: Topic,
    pub layer: Layer,
    pub voter: AccountId,
}

pub fn parse_vote(key: &StateKey) -> Option<VoteKey> {
    let b = key.as_bytes();
    if b[0] != VOTE_TAG || b[4..12].iter().any(|&x| x != 0) {
        return None;
    }
    let topic = classify(&b[1..3]).topic().ok()?;
    let layer = Layer::from_byte(b[3])?;
    let voter = AccountId::from_slice(&b[12..]).ok()?;
    Some(VoteKey {
        topic,
        layer,
        voter,
    })
}

/// Topic and layer of an `A` key.
pub fn parse_actioned(key: &StateKey) -> Option<(Topic, Layer)> {
    let b = key.as_bytes();
    if b[0] != ACTIONED_TAG || b[4..].iter().any(|&x| x != 0) {
        return None;
    }
    let topic = classify(&b[1..3]).topic().ok()?;
    Some((topic, Layer::from_byte(b[3])?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::new([0xA1; 20])
    }

    #[test]
    fn test_short_keys_are_right_aligned() {
        let mc = member_count();
        assert_eq!(&mc.as_bytes()[30..], b"MC");
        assert!(mc.as_bytes()[..30].iter().all(|&b| b == 0));
        assert_eq!(seat(0).as_bytes(), &[0u8; 32]);
        assert_eq!(seat(7).as_bytes()[31], 7);
        assert_eq!(&member(&alice()).as_bytes()[12..], alice().as_bytes());
    }

    #[test]
    fn test_vote_key_layout_and_parse() {
        let key = vote(Topic::Seat(1), Layer::Two, &alice());
        let b = key.as_bytes();
        assert_eq!(&b[..4], &[b'V', b'S', 1, 2]);
        assert_eq!(&b[12..], alice().as_bytes());
        assert_eq!(
            parse_vote(&key),
            Some(VoteKey {
                topic: Topic::Seat(1),
                layer: Layer::Two,
                voter: alice(),
            })
        );
        assert_eq!(parse_vote(&member_count()), None);
        assert_eq!(parse_vote(&member(&alice())), None);
    }

    #[test]
    fn test_count_key_truncates_value_head() {
        let value = VoteValue::from_slice(Topic::HookHash(1), &[0xEE; 32]).unwrap();
        let key = count(Topic::HookHash(1), Layer::One, &value);
        assert_eq!(&key.as_bytes()[..4], &[b'C', b'H', 1, 1]);
        assert_eq!(&key.as_bytes()[4..], &[0xEE; 28]);

        let seat_value = VoteValue::from_slice(Topic::Seat(0), alice().as_bytes()).unwrap();
        let key = count(Topic::Seat(0), Layer::Two, &seat_value);
        assert_eq!(&key.as_bytes()[12..], alice().as_bytes());
    }

    #[test]
    fn test_actioned_key_parse() {
        let key = actioned(Topic::RewardDelay, Layer::One);
        assert_eq!(parse_actioned(&key), Some((Topic::RewardDelay, Layer::One)));
        assert_eq!(parse_actioned(&vote(Topic::RewardDelay, Layer::One, &alice())), None);
    }
}
