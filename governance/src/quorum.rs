//! Vote thresholds.

use serde::{Deserialize, Serialize};

use crate::topic::Topic;

/// Where a vote that reaches its threshold takes effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Actioned by this table.
    Local,
    /// Emitted as a vote to the primary table.
    Forward,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdPolicy {
    /// Strictly more than half the members. A split down the middle never
    /// commits.
    #[default]
    Majority,
    /// 80% of members for seats, every member for other local topics, 51%
    /// for votes forwarded to the primary table. Never below two votes.
    Supermajority,
}

impl ThresholdPolicy {
    /// Votes needed for one value of `topic` given `members` seated members.
    pub fn required(self, route: Route, topic: Topic, members: u8) -> u8 {
        match self {
            ThresholdPolicy::Majority => members / 2 + 1,
            ThresholdPolicy::Supermajority => {
                let pct: u16 = match (route, topic) {
                    (Route::Forward, _) => 51,
                    (Route::Local, Topic::Seat(_)) => 80,
                    (Route::Local, _) => 100,
                };
                let need = (members as u16 * pct / 100).max(2);
                need.min(members as u16) as u8
            }
        }
    }
}
