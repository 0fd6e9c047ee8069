//! Hook definitions and per-account hook installs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use govern_types::{HookHash, HookParams, Namespace};

/// Number of hook slots on an account.
pub const HOOK_SLOT_COUNT: usize = 10;

/// First 32 bytes of SHA-512, the ledger's hash for definitions and
/// transactions.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut half = [0u8; 32];
    half.copy_from_slice(&digest[..32]);
    half
}

/// Which hook program a definition runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    /// Invoke-driven governance table.
    Govern,
    /// Payment-driven rescue gate.
    GovernRescue,
}

/// A hook definition object on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDefinition {
    pub kind: HookKind,
    pub code: Vec<u8>,
}

impl HookDefinition {
    pub fn new(kind: HookKind, code: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            code: code.into(),
        }
    }

    pub fn hash(&self) -> HookHash {
        HookHash::new(sha512_half(&self.code))
    }
}

/// Transaction types a hook can be set to fire on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    Invoke,
    Payment,
}

/// One occupied hook slot on an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledHook {
    pub hash: HookHash,
    pub namespace: Namespace,
    pub params: HookParams,
    pub hook_on: Vec<TxType>,
}

impl InstalledHook {
    pub fn fires_on(&self, tx_type: TxType) -> bool {
        self.hook_on.contains(&tx_type)
    }
}

/// One slot's worth of a `SetHook` transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetHookEntry {
    Unchanged,
    Install {
        hash: HookHash,
        #[serde(default)]
        namespace: Namespace,
        #[serde(default)]
        params: HookParams,
        hook_on: Vec<TxType>,
    },
    Delete,
    /// Wipe this account's state in the given namespace, leaving the slot as is.
    ClearNamespace(Namespace),
}

/// The hook slots of one account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HookSlots([Option<InstalledHook>; HOOK_SLOT_COUNT]);

impl HookSlots {
    pub fn get(&self, slot: usize) -> Option<&InstalledHook> {
        self.0.get(slot).and_then(Option::as_ref)
    }

    /// Replace a slot, returning what it held. Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, hook: Option<InstalledHook>) -> Option<InstalledHook> {
        match self.0.get_mut(slot) {
            Some(entry) => std::mem::replace(entry, hook),
            None => None,
        }
    }

    pub fn clear(&mut self) {
        self.0 = Default::default();
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    /// Occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &InstalledHook)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(slot, hook)| hook.as_ref().map(|h| (slot, h)))
    }
}
