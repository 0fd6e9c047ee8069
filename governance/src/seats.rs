//! The seat table: seat index to member, member to seat, and the member
//! count. One table serves both layers.

use serde::{Deserialize, Serialize};

use govern_store::HookState;
use govern_types::AccountId;

use crate::error::GovernanceError;
use crate::keys;
use crate::topic::{Layer, Topic, SEAT_COUNT};
use crate::votes;

/// What may happen to seat 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeatZeroPolicy {
    /// Seat 0 can be voted empty like any other seat.
    #[default]
    AllowVacancy,
    /// Seat 0 can only be reassigned while other members remain.
    RequireOccupied,
}

/// Outcome of committing a seat vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatChange {
    Assigned {
        seat: u8,
        member: AccountId,
        replaced: Option<AccountId>,
    },
    Moved {
        member: AccountId,
        from: u8,
        to: u8,
        replaced: Option<AccountId>,
    },
    Vacated {
        seat: u8,
        removed: AccountId,
    },
    Unchanged,
}

pub fn member_count(state: &HookState<'_, '_>) -> Result<Option<u8>, GovernanceError> {
    Ok(state
        .get(&keys::member_count())?
        .and_then(|v| v.first().copied()))
}

pub fn seat_of(
    state: &HookState<'_, '_>,
    account: &AccountId,
) -> Result<Option<u8>, GovernanceError> {
    Ok(state
        .get(&keys::member(account))?
        .and_then(|v| v.first().copied()))
}

pub fn occupant(state: &HookState<'_, '_>, seat: u8) -> Result<Option<AccountId>, GovernanceError> {
    match state.get(&keys::seat(seat))? {
        Some(raw) => AccountId::from_slice(&raw)
            .map(Some)
            .map_err(|_| GovernanceError::Internal("malformed seat entry")),
        None => Ok(None),
    }
}

/// Occupied seats in seat order.
pub fn members(state: &HookState<'_, '_>) -> Result<Vec<(u8, AccountId)>, GovernanceError> {
    let mut out = Vec::new();
    for seat in 0..SEAT_COUNT {
        if let Some(member) = occupant(state, seat)? {
            out.push((seat, member));
        }
    }
    Ok(out)
}

fn set_member_count(state: &mut HookState<'_, '_>, count: u8) -> Result<(), GovernanceError> {
    Ok(state.set(&keys::member_count(), &[count])?)
}

fn seat_member(
    state: &mut HookState<'_, '_>,
    seat: u8,
    member: &AccountId,
) -> Result<(), GovernanceError> {
    state.set(&keys::seat(seat), member.as_bytes())?;
    state.set(&keys::member(member), &[seat])?;
    Ok(())
}

/// Seat the initial members. Only used by setup.
pub fn seat_initial(
    state: &mut HookState<'_, '_>,
    initial: &[AccountId],
) -> Result<(), GovernanceError> {
    for (seat, member) in initial.iter().enumerate() {
        seat_member(state, seat as u8, member)?;
    }
    set_member_count(state, initial.len() as u8)
}

/// Apply a committed seat vote: a zero value empties the seat, anything else
/// puts that account in it.
pub fn commit(
    state: &mut HookState<'_, '_>,
    seat: u8,
    value: AccountId,
    policy: SeatZeroPolicy,
) -> Result<SeatChange, GovernanceError> {
    let current = occupant(state, seat)?;
    let mut count = member_count(state)?.ok_or(GovernanceError::SetupNotDone)?;

    if value.is_zero() {
        let Some(removed) = current else {
            return Ok(SeatChange::Unchanged);
        };
        if count <= 1 {
            return Err(GovernanceError::LastMember);
        }
        if seat == 0 && policy == SeatZeroPolicy::RequireOccupied {
            return Err(GovernanceError::SeatZeroVacancy);
        }
        purge(state, &removed)?;
        return Ok(SeatChange::Vacated { seat, removed });
    }

    if current == Some(value) {
        return Ok(SeatChange::Unchanged);
    }

    let replaced = match current {
        Some(old) => {
            purge(state, &old)?;
            count = count.saturating_sub(1);
            Some(old)
        }
        None => None,
    };

    match seat_of(state, &value)? {
        Some(from) => {
            state.delete(&keys::seat(from));
            seat_member(state, seat, &value)?;
            Ok(SeatChange::Moved {
                member: value,
                from,
                to: seat,
                replaced,
            })
        }
        None => {
            seat_member(state, seat, &value)?;
            set_member_count(state, count + 1)?;
            Ok(SeatChange::Assigned {
                seat,
                member: value,
                replaced,
            })
        }
    }
}

/// Remove `member` from the table and erase every trace of them: their seat,
/// every vote they cast on any topic or layer, and any seat vote or
/// forwarded seat record that names them.
pub fn purge(state: &mut HookState<'_, '_>, member: &AccountId) -> Result<(), GovernanceError> {
    for topic in Topic::all() {
        for layer in Layer::ALL {
            votes::withdraw(state, topic, layer, member)?;
        }
    }

    for (key, data) in state.entries()? {
        if let Some(vote) = keys::parse_vote(&key) {
            if matches!(vote.topic, Topic::Seat(_)) && data.as_slice() == member.as_bytes() {
                votes::withdraw(state, vote.topic, vote.layer, &vote.voter)?;
            }
        } else if let Some((Topic::Seat(_), _)) = keys::parse_actioned(&key) {
            if data.as_slice() == member.as_bytes() {
                state.delete(&key);
            }
        }
    }

    if let Some(seat) = seat_of(state, member)? {
        state.delete(&keys::seat(seat));
        state.delete(&keys::member(member));
        let count = member_count(state)?.unwrap_or(0);
        set_member_count(state, count.saturating_sub(1))?;
    }
    tracing::debug!(%member, "member purged from table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballot::{Ballot, VoteValue};
    use govern_nullables::NullStateStore;
    use govern_store::{StateBatch, StateScope};
    use govern_types::Namespace;

    fn acct(b: u8) -> AccountId {
        AccountId::new([b; 20])
    }

    fn scope() -> StateScope {
        StateScope::new(acct(0xEE), Namespace::ZERO)
    }

    fn seat_ballot(seat: u8, layer: Layer, who: AccountId) -> Ballot {
        Ballot {
            layer,
            topic: Topic::Seat(seat),
            value: VoteValue::from_slice(Topic::Seat(seat), who.as_bytes()).unwrap(),
        }
    }

    fn mentions(state: &HookState<'_, '_>, who: &AccountId) -> bool {
        let needle = who.to_hex();
        state.entries().unwrap().iter().any(|(k, v)| {
            k.to_hex().contains(&needle) || hex_upper(v).contains(&needle)
        })
    }

    fn hex_upper(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02X}")).collect()
    }

    #[test]
    fn test_seat_initial_and_lookup() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1), acct(2), acct(3)]).unwrap();

        assert_eq!(member_count(&state).unwrap(), Some(3));
        assert_eq!(seat_of(&state, &acct(2)).unwrap(), Some(1));
        assert_eq!(occupant(&state, 2).unwrap(), Some(acct(3)));
        assert_eq!(occupant(&state, 3).unwrap(), None);
        assert_eq!(members(&state).unwrap().len(), 3);
    }

    #[test]
    fn test_assign_empty_seat_adds_member() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1), acct(2)]).unwrap();

        let change = commit(&mut state, 5, acct(9), SeatZeroPolicy::AllowVacancy).unwrap();
        assert_eq!(
            change,
            SeatChange::Assigned {
                seat: 5,
                member: acct(9),
                replaced: None
            }
        );
        assert_eq!(member_count(&state).unwrap(), Some(3));
        assert_eq!(seat_of(&state, &acct(9)).unwrap(), Some(5));
    }

    #[test]
    fn test_assign_existing_member_moves_them() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1), acct(2)]).unwrap();
        votes::record(&mut state, &acct(2), &seat_ballot(7, Layer::Two, acct(2))).unwrap();

        let change = commit(&mut state, 7, acct(2), SeatZeroPolicy::AllowVacancy).unwrap();
        assert!(matches!(change, SeatChange::Moved { from: 1, to: 7, .. }));
        assert_eq!(occupant(&state, 1).unwrap(), None);
        assert_eq!(seat_of(&state, &acct(2)).unwrap(), Some(7));
        assert_eq!(member_count(&state).unwrap(), Some(2));
        // moving keeps the member's votes
        assert!(votes::vote_of(&state, Topic::Seat(7), Layer::Two, &acct(2))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_replacing_occupant_purges_them() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1), acct(2)]).unwrap();
        votes::record(&mut state, &acct(1), &seat_ballot(1, Layer::One, acct(1))).unwrap();

        let change = commit(&mut state, 0, acct(3), SeatZeroPolicy::AllowVacancy).unwrap();
        assert_eq!(
            change,
            SeatChange::Assigned {
                seat: 0,
                member: acct(3),
                replaced: Some(acct(1))
            }
        );
        assert_eq!(member_count(&state).unwrap(), Some(2));
        assert!(!mentions(&state, &acct(1)));
    }

    #[test]
    fn test_vacate_purges_votes_and_mentions() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1), acct(2), acct(3)]).unwrap();
        for layer in Layer::ALL {
            votes::record(&mut state, &acct(1), &seat_ballot(1, layer, acct(1))).unwrap();
        }
        // another member voting for the removed account
        votes::record(&mut state, &acct(3), &seat_ballot(4, Layer::Two, acct(1))).unwrap();
        state
            .set(&keys::actioned(Topic::Seat(4), Layer::One), acct(1).as_bytes())
            .unwrap();

        let change = commit(&mut state, 0, AccountId::ZERO, SeatZeroPolicy::AllowVacancy).unwrap();
        assert_eq!(
            change,
            SeatChange::Vacated {
                seat: 0,
                removed: acct(1)
            }
        );
        assert_eq!(member_count(&state).unwrap(), Some(2));
        assert!(!mentions(&state, &acct(1)));
        assert_eq!(
            votes::vote_of(&state, Topic::Seat(4), Layer::Two, &acct(3)).unwrap(),
            None
        );
    }

    #[test]
    fn test_vacating_empty_seat_is_unchanged() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1), acct(2)]).unwrap();
        assert_eq!(
            commit(&mut state, 9, AccountId::ZERO, SeatZeroPolicy::AllowVacancy).unwrap(),
            SeatChange::Unchanged
        );
        assert_eq!(
            commit(&mut state, 1, acct(2), SeatZeroPolicy::AllowVacancy).unwrap(),
            SeatChange::Unchanged
        );
    }

    #[test]
    fn test_last_member_cannot_be_removed() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1)]).unwrap();
        assert!(matches!(
            commit(&mut state, 0, AccountId::ZERO, SeatZeroPolicy::AllowVacancy),
            Err(GovernanceError::LastMember)
        ));
    }

    #[test]
    fn test_seat_zero_policy() {
        let store = NullStateStore::new();
        let mut batch = StateBatch::new(&store);
        let mut state = batch.scope(scope());
        seat_initial(&mut state, &[acct(1), acct(2)]).unwrap();
        assert!(matches!(
            commit(&mut state, 0, AccountId::ZERO, SeatZeroPolicy::RequireOccupied),
            Err(GovernanceError::SeatZeroVacancy)
        ));
        // reassignment is still allowed
        assert!(commit(&mut state, 0, acct(5), SeatZeroPolicy::RequireOccupied).is_ok());
        assert_eq!(occupant(&state, 0).unwrap(), Some(acct(5)));
    }
}
