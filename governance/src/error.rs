use govern_store::StoreError;
use govern_types::AccountId;
use thiserror::Error;

use crate::topic::InvalidTopic;

/// Every way a governance execution can end without doing what was asked.
///
/// The `Display` text is the hook return string reported for the
/// transaction.
#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("Governance: You are not currently a governance member at this table.")]
    NotMember,

    #[error("{0}")]
    InvalidTopic(InvalidTopic),

    #[error("Governance: Missing L parameter. Which layer are you voting for?")]
    MissingLayer,

    #[error("Governance: Layer parameter must be '1' or '2'.")]
    InvalidLayer,

    #[error("Governance: L2s cannot vote on RR/RD at L2, did you mean to set L=1?")]
    RewardOnLayerTwo,

    #[error("Governance: Missing or incorrect size of VOTE data for TOPIC type.")]
    MalformedValue,

    #[error("Governance: Reward rate must be an XFL between 0 and 1.")]
    InvalidRewardRate,

    #[error("Governance: Reward delay must be a positive XFL number of seconds.")]
    InvalidRewardDelay,

    #[error("Governance: Your vote is already cast this way for this topic.")]
    DuplicateVote,

    #[error("Governance: Initial member count IMC must be between 1 and 20.")]
    SetupMemberCount,

    #[error("Governance: Initial seat IS{0} is missing or not a valid account.")]
    SetupSeat(u8),

    #[error("Governance: Account {0} appears in more than one initial seat.")]
    SetupDuplicateMember(AccountId),

    #[error("Governance: Initial reward parameters IRR/IRD are malformed.")]
    SetupReward,

    #[error("Governance: The last member of a table cannot be removed.")]
    LastMember,

    #[error("Governance: Seat 0 cannot be vacated while other members remain.")]
    SeatZeroVacancy,

    #[error("Governance: Hook Hash doesn't exist on ledger while actioning hook.")]
    HookNotOnLedger,

    #[error("Only 1 drop allowed. Passing.")]
    PaymentCapExceeded,

    #[error("Non-native currency. Passing.")]
    NonNativeAmount,

    #[error("Governance: Seat topics are not allowed.")]
    SeatTopicInRescue,

    #[error("Governance: Reward topics are not allowed")]
    RewardTopicInRescue,

    #[error("Governance: Setup has not been done.")]
    SetupNotDone,

    #[error("Governance Rescue: Rescue window is not active. Passing.")]
    RescueWindowClosed,

    #[error("Governance: Internal logic error. {0}")]
    Internal(&'static str),

    #[error("Governance: State access failed. {0}")]
    Store(#[from] StoreError),
}

impl GovernanceError {
    /// Refusals that let the transaction through untouched instead of
    /// rolling it back.
    pub fn is_passing(&self) -> bool {
        matches!(
            self,
            GovernanceError::DuplicateVote
                | GovernanceError::PaymentCapExceeded
                | GovernanceError::NonNativeAmount
                | GovernanceError::SeatTopicInRescue
                | GovernanceError::RewardTopicInRescue
                | GovernanceError::SetupNotDone
                | GovernanceError::RescueWindowClosed
        )
    }
}

impl From<InvalidTopic> for GovernanceError {
    fn from(why: InvalidTopic) -> Self {
        GovernanceError::InvalidTopic(why)
    }
}
