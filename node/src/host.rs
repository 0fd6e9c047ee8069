//! The ledger host: hook definitions, hook installs and transaction
//! application.
//!
//! The host stands in for the ledger around the governance hooks. It runs
//! one transaction at a time. Every hook that fires on a transaction writes
//! into one shared [`StateBatch`]; the batch is committed only if every
//! hook accepts, so a rollback anywhere leaves no state behind. Effects the
//! hooks ask for are carried out after the commit, and emitted votes are
//! submitted as follow-up transactions. A hook that would emit past the
//! configured depth is rolled back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use govern_governance::{
    ballot, outcome, Effect, GovernanceEngine, HookContext, HookOutcome, RescueGate, RescueWindow,
    TxKind, Verdict,
};
use govern_store::{LedgerView, StateBatch, StateScope, StateStore};
use govern_store_lmdb::{LmdbEnvironment, LmdbStateStore};
use govern_types::{AccountId, HookHash, HookParams, Namespace, TxHash};

use crate::config::NodeConfig;
use crate::hooks::{
    HookDefinition, HookKind, HookSlots, InstalledHook, SetHookEntry, TxType, HOOK_SLOT_COUNT,
};
use crate::transaction::{HookExecution, Transaction, TransactionKind, TxReceipt, TxResult};
use crate::NodeError;

/// One hook state entry as returned by a namespace query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NamespaceEntry {
    pub hook_state_key: String,
    pub hook_state_data: String,
}

/// Result of running one transaction's hooks, before effects are applied.
struct Applied {
    result: TxResult,
    executions: Vec<HookExecution>,
    effects: Vec<(AccountId, Effect)>,
}

pub struct Ledger<S: StateStore> {
    store: S,
    engine: GovernanceEngine,
    rescue: RescueGate,
    max_emission_depth: u32,
    definitions: HashMap<HookHash, HookDefinition>,
    hooks: HashMap<AccountId, HookSlots>,
    sequences: HashMap<AccountId, u32>,
    executions: HashMap<TxHash, Vec<HookExecution>>,
}

impl<S: StateStore> Ledger<S> {
    pub fn new(store: S, config: &NodeConfig) -> Self {
        Self {
            store,
            engine: GovernanceEngine::new(config.governance.clone()),
            rescue: RescueGate::new(config.governance.clone()),
            max_emission_depth: config.max_emission_depth,
            definitions: HashMap::new(),
            hooks: HashMap::new(),
            sequences: HashMap::new(),
            executions: HashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Hook definitions and installs ───────────────────────────────────

    /// Register a hook definition, returning its hash.
    pub fn create_hook(&mut self, kind: HookKind, code: impl Into<Vec<u8>>) -> HookHash {
        let definition = HookDefinition::new(kind, code);
        let hash = definition.hash();
        tracing::info!(%hash, ?kind, "hook definition created");
        self.definitions.insert(hash, definition);
        hash
    }

    pub fn definition(&self, hash: &HookHash) -> Option<&HookDefinition> {
        self.definitions.get(hash)
    }

    pub fn installed(&self, account: &AccountId, slot: usize) -> Option<&InstalledHook> {
        self.hooks.get(account).and_then(|slots| slots.get(slot))
    }

    /// Apply a `SetHook` transaction: one entry per slot, starting at slot 0.
    pub fn set_hooks(
        &mut self,
        account: AccountId,
        entries: Vec<SetHookEntry>,
    ) -> Result<(), NodeError> {
        if entries.len() > HOOK_SLOT_COUNT {
            return Err(NodeError::InvalidHookSlot(entries.len() - 1));
        }
        for entry in &entries {
            if let SetHookEntry::Install { hash, .. } = entry {
                if !self.definitions.contains_key(hash) {
                    return Err(NodeError::UnknownHookDefinition(*hash));
                }
            }
        }

        for (slot, entry) in entries.into_iter().enumerate() {
            match entry {
                SetHookEntry::Unchanged => {}
                SetHookEntry::Install {
                    hash,
                    namespace,
                    params,
                    hook_on,
                } => {
                    let hook = InstalledHook {
                        hash,
                        namespace,
                        params,
                        hook_on,
                    };
                    self.install(account, slot, Some(hook))?;
                }
                SetHookEntry::Delete => self.install(account, slot, None)?,
                SetHookEntry::ClearNamespace(namespace) => {
                    self.clear_namespace(account, namespace)?;
                }
            }
        }
        Ok(())
    }

    /// Remove every hook installed on `account`.
    pub fn clear_all_hooks(&mut self, account: AccountId) -> Result<(), NodeError> {
        for slot in 0..HOOK_SLOT_COUNT {
            self.install(account, slot, None)?;
        }
        self.hooks.remove(&account);
        Ok(())
    }

    /// Delete every state entry `account` holds in `namespace`.
    pub fn clear_namespace(
        &mut self,
        account: AccountId,
        namespace: Namespace,
    ) -> Result<usize, NodeError> {
        let removed = self
            .store
            .clear_namespace(&StateScope::new(account, namespace))?;
        tracing::info!(%account, %namespace, removed, "namespace cleared");
        Ok(removed)
    }

    /// Occupy or empty one slot, keeping the rescue window in step with
    /// whether a rescue hook is installed.
    fn install(
        &mut self,
        account: AccountId,
        slot: usize,
        hook: Option<InstalledHook>,
    ) -> Result<(), NodeError> {
        if slot >= HOOK_SLOT_COUNT {
            return Err(NodeError::InvalidHookSlot(slot));
        }
        let opens = hook
            .as_ref()
            .filter(|h| self.kind_of(&h.hash) == Some(HookKind::GovernRescue))
            .map(|h| StateScope::new(account, h.namespace));

        let previous = self.hooks.entry(account).or_default().set(slot, hook);
        let Some(previous) = previous else {
            if let Some(scope) = opens {
                self.set_rescue_window(scope, true)?;
            }
            return Ok(());
        };

        tracing::debug!(%account, slot, hash = %previous.hash, "hook slot replaced");
        if self.kind_of(&previous.hash) == Some(HookKind::GovernRescue) {
            let scope = StateScope::new(account, previous.namespace);
            if opens != Some(scope) {
                self.set_rescue_window(scope, false)?;
            }
        }
        if let Some(scope) = opens {
            self.set_rescue_window(scope, true)?;
        }
        Ok(())
    }

    fn kind_of(&self, hash: &HookHash) -> Option<HookKind> {
        self.definitions.get(hash).map(|d| d.kind)
    }

    fn set_rescue_window(&self, scope: StateScope, open: bool) -> Result<(), NodeError> {
        let mut batch = StateBatch::new(&self.store);
        {
            let mut state = batch.scope(scope);
            if open {
                RescueWindow::open(&mut state)?;
            } else {
                RescueWindow::close(&mut state);
            }
        }
        batch.commit()?;
        tracing::info!(%scope, open, "rescue window changed");
        Ok(())
    }

    // ── Transactions ────────────────────────────────────────────────────

    /// Apply a transaction and every transaction its hooks emit.
    pub fn submit(&mut self, tx: Transaction) -> Result<TxReceipt, NodeError> {
        self.submit_at_depth(tx, 0)
    }

    fn submit_at_depth(&mut self, mut tx: Transaction, depth: u32) -> Result<TxReceipt, NodeError> {
        let sequence = self.sequences.entry(tx.account).or_default();
        tx.sequence = *sequence;
        *sequence += 1;
        let hash = tx.hash()?;

        let applied = self.apply(&tx, depth < self.max_emission_depth)?;
        tracing::info!(
            tx = %hash,
            from = %tx.account,
            result = ?applied.result,
            hooks = applied.executions.len(),
            "transaction applied"
        );
        self.executions.insert(hash, applied.executions.clone());

        let mut emitted = Vec::new();
        for (table, effect) in applied.effects {
            match effect {
                Effect::SetHook { slot, hash } => self.apply_set_hook(table, slot, hash)?,
                Effect::EmitVote {
                    destination,
                    topic,
                    value,
                } => {
                    let params = HookParams::new()
                        .with(ballot::PARAM_TOPIC, topic.code())
                        .with(ballot::PARAM_VALUE, value);
                    let mut vote = Transaction::invoke(table, Some(destination), params);
                    vote.emit_parent = Some(hash);
                    emitted.push(vote);
                }
            }
        }

        let mut receipt = TxReceipt {
            hash,
            result: applied.result,
            executions: applied.executions,
            emitted: Vec::new(),
        };
        for vote in emitted {
            receipt.emitted.push(self.submit_at_depth(vote, depth + 1)?);
        }
        Ok(receipt)
    }

    /// Run every hook the transaction triggers against one batch. A hook
    /// that emits a vote when `can_emit` is false is rolled back.
    fn apply(&self, tx: &Transaction, can_emit: bool) -> Result<Applied, NodeError> {
        let kind = match &tx.kind {
            TransactionKind::Invoke => TxKind::Invoke,
            TransactionKind::Payment { amount } => TxKind::Payment(*amount),
        };
        let tx_type = tx.tx_type();

        let mut accounts = vec![tx.account];
        if let Some(destination) = tx.destination.filter(|d| *d != tx.account) {
            accounts.push(destination);
        }

        let mut batch = StateBatch::new(&self.store);
        let mut executions = Vec::new();
        let mut effects = Vec::new();
        for account in accounts {
            let Some(slots) = self.hooks.get(&account) else {
                continue;
            };
            for (slot, hook) in slots.iter().filter(|(_, h)| h.fires_on(tx_type)) {
                let definition = self
                    .definitions
                    .get(&hook.hash)
                    .ok_or(NodeError::UnknownHookDefinition(hook.hash))?;
                let ctx = HookContext {
                    hook_account: account,
                    originator: tx.account,
                    destination: tx.destination,
                    kind,
                    params: &tx.params,
                    install_params: &hook.params,
                    ledger: self,
                };
                let mut state = batch.scope(StateScope::new(account, hook.namespace));
                let mut outcome = match definition.kind {
                    HookKind::Govern => self.engine.execute(&ctx, &mut state),
                    HookKind::GovernRescue => self.rescue.execute(&ctx, &mut state),
                };
                let emits = outcome
                    .effects
                    .iter()
                    .any(|e| matches!(e, Effect::EmitVote { .. }));
                if emits && !can_emit {
                    tracing::warn!(%account, slot, "emission depth reached, rolling back vote");
                    outcome = HookOutcome::rollback(outcome::L1_EMIT_FAILED);
                }

                executions.push(HookExecution {
                    account,
                    slot: slot as u8,
                    hook_hash: hook.hash,
                    verdict: outcome.verdict,
                    return_string: outcome.message,
                });
                if outcome.verdict == Verdict::Rollback {
                    return Ok(Applied {
                        result: TxResult::HookRejected,
                        executions,
                        effects: Vec::new(),
                    });
                }
                effects.extend(outcome.effects.into_iter().map(|e| (account, e)));
            }
        }

        batch.commit()?;
        Ok(Applied {
            result: TxResult::Success,
            executions,
            effects,
        })
    }

    /// Carry out a ratified hook hash on the table account. The slot keeps
    /// its namespace; triggers follow the new definition's kind.
    fn apply_set_hook(
        &mut self,
        account: AccountId,
        slot: u8,
        hash: Option<HookHash>,
    ) -> Result<(), NodeError> {
        let slot = usize::from(slot);
        let Some(hash) = hash else {
            tracing::info!(%account, slot, "governance removed hook");
            return self.install(account, slot, None);
        };
        let kind = self
            .kind_of(&hash)
            .ok_or(NodeError::UnknownHookDefinition(hash))?;
        let namespace = self
            .installed(&account, slot)
            .map_or(Namespace::ZERO, |current| current.namespace);
        let hook = InstalledHook {
            hash,
            namespace,
            params: HookParams::new(),
            hook_on: vec![match kind {
                HookKind::Govern => TxType::Invoke,
                HookKind::GovernRescue => TxType::Payment,
            }],
        };
        tracing::info!(%account, slot, %hash, "governance installed hook");
        self.install(account, slot, Some(hook))
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Hook executions recorded for a transaction.
    pub fn executions(&self, hash: &TxHash) -> Option<&[HookExecution]> {
        self.executions.get(hash).map(Vec::as_slice)
    }

    /// Every state entry of one namespace, in key order.
    pub fn account_namespace(
        &self,
        account: AccountId,
        namespace: Namespace,
    ) -> Result<Vec<NamespaceEntry>, NodeError> {
        let entries = self
            .store
            .namespace_entries(&StateScope::new(account, namespace))?;
        Ok(entries
            .into_iter()
            .map(|(key, data)| NamespaceEntry {
                hook_state_key: key.to_hex(),
                hook_state_data: hex::encode_upper(data),
            })
            .collect())
    }
}

impl Ledger<LmdbStateStore> {
    /// A ledger whose hook state lives in the LMDB environment under
    /// `config.data_dir`. Hook definitions and installs are not persisted.
    pub fn open_lmdb(config: &NodeConfig) -> Result<Self, NodeError> {
        let env = LmdbEnvironment::open(&config.data_dir, config.lmdb_map_size)?;
        Ok(Self::new(env.state_store(), config))
    }
}

impl<S: StateStore> LedgerView for Ledger<S> {
    fn hook_definition_exists(&self, hash: &HookHash) -> bool {
        self.definitions.contains_key(hash)
    }

    fn installed_hook(&self, account: &AccountId, slot: u8) -> Option<HookHash> {
        self.installed(account, usize::from(slot)).map(|h| h.hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govern_nullables::NullStateStore;
    use govern_types::Amount;

    const TABLE: AccountId = AccountId::new([0x11; 20]);
    const MEMBER: AccountId = AccountId::new([0x22; 20]);

    fn ledger() -> Ledger<NullStateStore> {
        Ledger::new(NullStateStore::new(), &NodeConfig::default())
    }

    fn govern_install(hash: HookHash) -> SetHookEntry {
        SetHookEntry::Install {
            hash,
            namespace: Namespace::ZERO,
            params: HookParams::new()
                .with(*b"IMC", [1u8])
                .with(*b"IS\0", *MEMBER.as_bytes()),
            hook_on: vec![TxType::Invoke],
        }
    }

    #[test]
    fn test_install_requires_definition() {
        let mut ledger = ledger();
        let err = ledger
            .set_hooks(TABLE, vec![govern_install(HookHash::new([9u8; 32]))])
            .unwrap_err();
        assert!(matches!(err, NodeError::UnknownHookDefinition(_)));
        assert!(ledger.installed(&TABLE, 0).is_none());
    }

    #[test]
    fn test_too_many_entries_rejected() {
        let mut ledger = ledger();
        let err = ledger
            .set_hooks(TABLE, vec![SetHookEntry::Unchanged; HOOK_SLOT_COUNT + 1])
            .unwrap_err();
        assert!(matches!(err, NodeError::InvalidHookSlot(10)));
    }

    #[test]
    fn test_setup_invoke_commits_state() {
        let mut ledger = ledger();
        let hash = ledger.create_hook(HookKind::Govern, b"govern".to_vec());
        ledger.set_hooks(TABLE, vec![govern_install(hash)]).unwrap();
        assert!(ledger.hook_definition_exists(&hash));
        assert_eq!(ledger.installed_hook(&TABLE, 0), Some(hash));

        let receipt = ledger
            .submit(Transaction::invoke(TABLE, None, HookParams::new()))
            .unwrap();
        assert!(receipt.is_success());
        assert_eq!(
            receipt.return_strings(),
            vec!["Governance: Setup completed successfully."]
        );
        assert_eq!(ledger.executions(&receipt.hash).unwrap().len(), 1);
        // MC, member key, seat key
        assert_eq!(ledger.account_namespace(TABLE, Namespace::ZERO).unwrap().len(), 3);
    }

    #[test]
    fn test_rollback_writes_nothing() {
        let mut ledger = ledger();
        let hash = ledger.create_hook(HookKind::Govern, b"govern".to_vec());
        let bad = SetHookEntry::Install {
            hash,
            namespace: Namespace::ZERO,
            params: HookParams::new().with(*b"IMC", [0u8]),
            hook_on: vec![TxType::Invoke],
        };
        ledger.set_hooks(TABLE, vec![bad]).unwrap();
        let receipt = ledger
            .submit(Transaction::invoke(TABLE, None, HookParams::new()))
            .unwrap();
        assert_eq!(receipt.result, TxResult::HookRejected);
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn test_rescue_install_toggles_window() {
        let mut ledger = ledger();
        let rescue = ledger.create_hook(HookKind::GovernRescue, b"rescue".to_vec());
        let entry = SetHookEntry::Install {
            hash: rescue,
            namespace: Namespace::ZERO,
            params: HookParams::new(),
            hook_on: vec![TxType::Payment],
        };
        ledger
            .set_hooks(TABLE, vec![SetHookEntry::Unchanged, entry])
            .unwrap();
        assert_eq!(ledger.account_namespace(TABLE, Namespace::ZERO).unwrap().len(), 1);

        ledger.clear_all_hooks(TABLE).unwrap();
        assert!(ledger.store().is_empty());
        assert!(ledger.installed(&TABLE, 1).is_none());
    }

    #[test]
    fn test_hooks_skip_other_tx_types() {
        let mut ledger = ledger();
        let hash = ledger.create_hook(HookKind::Govern, b"govern".to_vec());
        ledger.set_hooks(TABLE, vec![govern_install(hash)]).unwrap();
        let receipt = ledger
            .submit(Transaction::payment(
                MEMBER,
                TABLE,
                Amount::Native(10),
                HookParams::new(),
            ))
            .unwrap();
        assert!(receipt.is_success());
        assert!(receipt.executions.is_empty());
    }
}
