//! Nullable ledger view with programmable hook definitions and installs.

use govern_store::LedgerView;
use govern_types::{AccountId, HookHash};
use std::collections::{HashMap, HashSet};

/// A ledger view whose contents are set directly by the test.
#[derive(Default)]
pub struct NullLedgerView {
    definitions: HashSet<HookHash>,
    installed: HashMap<(AccountId, u8), HookHash>,
}

impl NullLedgerView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a hook definition exist on the ledger.
    pub fn add_definition(&mut self, hash: HookHash) {
        self.definitions.insert(hash);
    }

    /// Pretend `hash` is installed at `slot` on `account`.
    pub fn install(&mut self, account: AccountId, slot: u8, hash: HookHash) {
        self.installed.insert((account, slot), hash);
    }
}

impl LedgerView for NullLedgerView {
    fn hook_definition_exists(&self, hash: &HookHash) -> bool {
        self.definitions.contains(hash)
    }

    fn installed_hook(&self, account: &AccountId, slot: u8) -> Option<HookHash> {
        self.installed.get(&(*account, slot)).copied()
    }
}
