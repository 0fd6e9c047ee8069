//! Read-only ledger objects visible to a hook while it executes.

use govern_types::{AccountId, HookHash};

/// The slice of ledger state a hook may inspect besides its own namespace.
pub trait LedgerView {
    /// Whether a hook definition with this hash exists on the ledger.
    fn hook_definition_exists(&self, hash: &HookHash) -> bool;

    /// The hook currently installed on `account` at `slot`, if any.
    fn installed_hook(&self, account: &AccountId, slot: u8) -> Option<HookHash>;
}
