//! What a hook sees of the transaction that triggered it.

use govern_store::LedgerView;
use govern_types::{AccountId, Amount, HookParams};

/// Transaction type, as far as the governance hooks care.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxKind {
    Invoke,
    Payment(Amount),
    Other,
}

pub struct HookContext<'a> {
    /// Account the hook is installed on.
    pub hook_account: AccountId,
    /// Account that sent the transaction.
    pub originator: AccountId,
    pub destination: Option<AccountId>,
    pub kind: TxKind,
    /// Parameters attached to the transaction.
    pub params: &'a HookParams,
    /// Parameters given when the hook was installed.
    pub install_params: &'a HookParams,
    pub ledger: &'a dyn LedgerView,
}

impl HookContext<'_> {
    /// A transaction the table account sends to someone else.
    pub fn is_outgoing(&self) -> bool {
        self.originator == self.hook_account
            && self.destination.is_some_and(|d| d != self.hook_account)
    }
}

/// Where a table sits in the two-layer hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableRole {
    /// The table on the genesis account, where layer 1 is decided.
    Primary,
    /// Any other table. Decides its own layer 2 topics and forwards
    /// layer 1 votes to the primary table.
    Secondary,
}

impl TableRole {
    pub fn of(hook_account: &AccountId, genesis: &AccountId) -> Self {
        if hook_account == genesis {
            TableRole::Primary
        } else {
            TableRole::Secondary
        }
    }
}
