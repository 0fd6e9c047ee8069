//! Transactions the host applies, and the receipts it keeps for them.

use serde::{Deserialize, Serialize};

use govern_governance::Verdict;
use govern_types::{AccountId, Amount, HookHash, HookParams, TxHash};

use crate::hooks::{sha512_half, TxType};
use crate::NodeError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Invoke,
    Payment { amount: Amount },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub account: AccountId,
    pub destination: Option<AccountId>,
    pub kind: TransactionKind,
    pub params: HookParams,
    /// Assigned by the host on submission.
    pub sequence: u32,
    /// Hash of the transaction whose hook emitted this one.
    pub emit_parent: Option<TxHash>,
}

impl Transaction {
    pub fn invoke(account: AccountId, destination: Option<AccountId>, params: HookParams) -> Self {
        Self {
            account,
            destination,
            kind: TransactionKind::Invoke,
            params,
            sequence: 0,
            emit_parent: None,
        }
    }

    pub fn payment(
        account: AccountId,
        destination: AccountId,
        amount: Amount,
        params: HookParams,
    ) -> Self {
        Self {
            account,
            destination: Some(destination),
            kind: TransactionKind::Payment { amount },
            params,
            sequence: 0,
            emit_parent: None,
        }
    }

    pub fn tx_type(&self) -> TxType {
        match self.kind {
            TransactionKind::Invoke => TxType::Invoke,
            TransactionKind::Payment { .. } => TxType::Payment,
        }
    }

    /// SHA-512Half of the canonical bincode encoding.
    pub fn hash(&self) -> Result<TxHash, NodeError> {
        let bytes =
            bincode::serialize(self).map_err(|e| NodeError::Serialization(e.to_string()))?;
        Ok(TxHash::new(sha512_half(&bytes)))
    }
}

/// Final disposition of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxResult {
    Success,
    /// A hook rolled the transaction back; no state was written.
    HookRejected,
}

/// One hook execution recorded against a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookExecution {
    pub account: AccountId,
    pub slot: u8,
    pub hook_hash: HookHash,
    pub verdict: Verdict,
    pub return_string: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub result: TxResult,
    pub executions: Vec<HookExecution>,
    /// Receipts of transactions emitted by this one's hooks, in order.
    pub emitted: Vec<TxReceipt>,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.result == TxResult::Success
    }

    /// Return strings of this transaction's executions, in execution order.
    pub fn return_strings(&self) -> Vec<&str> {
        self.executions
            .iter()
            .map(|e| e.return_string.as_str())
            .collect()
    }
}
