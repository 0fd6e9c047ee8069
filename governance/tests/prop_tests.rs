//! Property tests: however votes arrive, the per-value counters equal a
//! recount of the live vote records and never exceed the member count.

use std::collections::BTreeMap;

use proptest::prelude::*;

use govern_governance::{
    keys, seats, Ballot, GovernanceConfig, GovernanceEngine, HookContext, Layer, Topic, TxKind,
    Verdict, VoteValue,
};
use govern_nullables::{NullLedgerView, NullStateStore};
use govern_store::{StateBatch, StateScope, StateStore};
use govern_types::{AccountId, HookParams, Namespace, StateKey};

const TABLE: AccountId = AccountId::new([0x70; 20]);

fn account(i: u8) -> AccountId {
    AccountId::new([0xB0 + i; 20])
}

#[derive(Clone, Debug)]
struct Cast {
    voter: u8,
    layer: Layer,
    topic: Topic,
    value: u8,
}

fn arb_cast() -> impl Strategy<Value = Cast> {
    (
        0u8..8,
        prop_oneof![Just(Layer::One), Just(Layer::Two)],
        prop_oneof![
            Just(Topic::Seat(1)),
            Just(Topic::Seat(6)),
            Just(Topic::HookHash(0))
        ],
        0u8..4,
    )
        .prop_map(|(voter, layer, topic, value)| Cast {
            voter,
            layer,
            topic,
            value,
        })
}

fn value_bytes(topic: Topic, v: u8) -> Vec<u8> {
    match topic {
        // value 0 votes a seat empty
        Topic::Seat(_) if v == 0 => vec![0u8; 20],
        Topic::Seat(_) => account(v + 3).as_bytes().to_vec(),
        _ => vec![v; 32],
    }
}

fn run(store: &NullStateStore, engine: &GovernanceEngine, install: &HookParams, from: AccountId, params: HookParams) {
    let ledger = NullLedgerView::new();
    let ctx = HookContext {
        hook_account: TABLE,
        originator: from,
        destination: Some(TABLE),
        kind: TxKind::Invoke,
        params: &params,
        install_params: install,
        ledger: &ledger,
    };
    let mut batch = StateBatch::new(store);
    let out = engine.execute(&ctx, &mut batch.scope(StateScope::new(TABLE, Namespace::ZERO)));
    if out.verdict == Verdict::Accept {
        batch.commit().unwrap();
    }
}

proptest! {
    #[test]
    fn counters_match_recount(casts in prop::collection::vec(arb_cast(), 1..60)) {
        let store = NullStateStore::new();
        let engine = GovernanceEngine::new(GovernanceConfig::default());
        let mut install = HookParams::new().with(*b"IMC", [5u8]);
        for i in 0..5 {
            install.insert([b'I', b'S', i], account(i).as_bytes());
        }
        run(&store, &engine, &install, account(0), HookParams::new());

        for cast in casts {
            let params = Ballot {
                layer: cast.layer,
                topic: cast.topic,
                value: VoteValue::from_slice(cast.topic, &value_bytes(cast.topic, cast.value)).unwrap(),
            }
            .to_params();
            run(&store, &engine, &install, account(cast.voter), params);

            let scope = StateScope::new(TABLE, Namespace::ZERO);
            let entries = store.namespace_entries(&scope).unwrap();
            let mut batch = StateBatch::new(&store);
            let state = batch.scope(scope);
            let members = seats::member_count(&state).unwrap().unwrap();

            let mut recount: BTreeMap<StateKey, u8> = BTreeMap::new();
            let mut per_topic: BTreeMap<(Topic, Layer), u8> = BTreeMap::new();
            for (key, data) in &entries {
                if let Some(vote) = keys::parse_vote(key) {
                    prop_assert!(seats::seat_of(&state, &vote.voter).unwrap().is_some());
                    let value = VoteValue::from_slice(vote.topic, data).unwrap();
                    *recount.entry(keys::count(vote.topic, vote.layer, &value)).or_default() += 1;
                    *per_topic.entry((vote.topic, vote.layer)).or_default() += 1;
                }
            }
            let counters: BTreeMap<StateKey, u8> = entries
                .iter()
                .filter(|(k, _)| k.as_bytes()[0] == b'C')
                .map(|(k, v)| (*k, v[0]))
                .collect();

            prop_assert_eq!(&counters, &recount);
            for n in per_topic.values() {
                prop_assert!(*n <= members);
            }
        }
    }
}
