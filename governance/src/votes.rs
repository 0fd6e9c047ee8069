//! Vote records and per-value counters.
//!
//! Each member holds at most one vote per (topic, layer). Recasting replaces
//! the old vote and moves one count from the old value to the new one, so
//! the counters always equal a recount of the live vote keys.

use govern_store::HookState;
use govern_types::AccountId;

use crate::ballot::{Ballot, VoteValue};
use crate::error::GovernanceError;
use crate::keys;
use crate::topic::{Layer, Topic};

/// Votes currently cast for `value`.
pub fn count(
    state: &HookState<'_, '_>,
    topic: Topic,
    layer: Layer,
    value: &VoteValue,
) -> Result<u8, GovernanceError> {
    let raw = state.get(&keys::count(topic, layer, value))?;
    Ok(raw.and_then(|v| v.first().copied()).unwrap_or(0))
}

/// A member's current vote on (topic, layer).
pub fn vote_of(
    state: &HookState<'_, '_>,
    topic: Topic,
    layer: Layer,
    voter: &AccountId,
) -> Result<Option<VoteValue>, GovernanceError> {
    match state.get(&keys::vote(topic, layer, voter))? {
        Some(raw) => Ok(Some(VoteValue::from_slice(topic, &raw)?)),
        None => Ok(None),
    }
}

/// Upsert `voter`'s ballot and return the new count for its value.
///
/// An identical recast is refused before anything is written.
pub fn record(
    state: &mut HookState<'_, '_>,
    voter: &AccountId,
    ballot: &Ballot,
) -> Result<u8, GovernanceError> {
    let previous = vote_of(state, ballot.topic, ballot.layer, voter)?;
    if previous == Some(ballot.value) {
        return Err(GovernanceError::DuplicateVote);
    }

    state.set(
        &keys::vote(ballot.topic, ballot.layer, voter),
        ballot.value.as_bytes(),
    )?;
    if let Some(old) = previous {
        decrement(state, ballot.topic, ballot.layer, &old)?;
    }

    let key = keys::count(ballot.topic, ballot.layer, &ballot.value);
    let votes = count(state, ballot.topic, ballot.layer, &ballot.value)?
        .checked_add(1)
        .ok_or(GovernanceError::Internal("vote counter overflow"))?;
    state.set(&key, &[votes])?;
    Ok(votes)
}

/// Remove `voter`'s vote on (topic, layer), if any.
pub fn withdraw(
    state: &mut HookState<'_, '_>,
    topic: Topic,
    layer: Layer,
    voter: &AccountId,
) -> Result<Option<VoteValue>, GovernanceError> {
    let Some(old) = vote_of(state, topic, layer, voter)? else {
        return Ok(None);
    };
    state.delete(&keys::vote(topic, layer, voter));
    decrement(state, topic, layer, &old)?;
    Ok(Some(old))
}

/// Drop one count from `value`, deleting the counter when it reaches zero.
fn decrement(
    state: &mut HookState<'_, '_>,
    topic: Topic,
    layer: Layer,
    value: &VoteValue,
) -> Result<(), GovernanceError> {
    let key = keys::count(topic, layer, value);
    match count(state, topic, layer, value)? {
        0 => Err(GovernanceError::Internal("vote counter underflow")),
        1 => {
            state.delete(&key);
            Ok(())
        }
        n => Ok(state.set(&key, &[n - 1])?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govern_nullables::NullStateStore;
    use govern_store::{StateBatch, StateScope};
    use govern_types::Namespace;

    fn scope() -> StateScope {
        StateScope::new(AccountId::new([0x77; 20]), Namespace::ZERO)
    }

    fn ballot(value: u8) -> Ballot {
        Ballot {
            layer: Layer::Two,
            topic: Topic::HookHash(1),
            value: VoteValue::from_slice(Topic::HookHash(1), &[value; 32]).unwrap(),
        }
    }

    #[test]
    fn test_recast_moves_count() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        let a = AccountId::new([1; 20]);
        let b = AccountId::new([2; 20]);

        assert_eq!(record(&mut state, &a, &ballot(1)).unwrap(), 1);
        assert_eq!(record(&mut state, &b, &ballot(1)).unwrap(), 2);
        assert_eq!(record(&mut state, &a, &ballot(2)).unwrap(), 1);

        let b1 = ballot(1);
        assert_eq!(count(&state, b1.topic, b1.layer, &b1.value).unwrap(), 1);
        assert_eq!(vote_of(&state, b1.topic, b1.layer, &a).unwrap(), Some(ballot(2).value));
    }

    #[test]
    fn test_identical_recast_is_refused() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        let a = AccountId::new([1; 20]);

        record(&mut state, &a, &ballot(1)).unwrap();
        assert!(matches!(
            record(&mut state, &a, &ballot(1)),
            Err(GovernanceError::DuplicateVote)
        ));
        let b1 = ballot(1);
        assert_eq!(count(&state, b1.topic, b1.layer, &b1.value).unwrap(), 1);
    }

    #[test]
    fn test_withdraw_deletes_empty_counter() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        let a = AccountId::new([1; 20]);
        let b1 = ballot(1);

        record(&mut state, &a, &b1).unwrap();
        assert_eq!(
            withdraw(&mut state, b1.topic, b1.layer, &a).unwrap(),
            Some(b1.value)
        );
        assert!(state.entries().unwrap().is_empty());
        assert_eq!(withdraw(&mut state, b1.topic, b1.layer, &a).unwrap(), None);
    }
}
