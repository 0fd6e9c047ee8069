use govern_types::HookHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("store error: {0}")]
    Store(#[from] govern_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] govern_store_lmdb::LmdbError),

    #[error("governance error: {0}")]
    Governance(#[from] govern_governance::GovernanceError),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("hook definition {0} does not exist")]
    UnknownHookDefinition(HookHash),

    #[error("hook slot {0} is out of range (0..=9)")]
    InvalidHookSlot(usize),
}
