//! Strategies and helpers shared by the backend tests

use proptest::prelude::*;
use serde_json::Value;
use std::future::Future;

/// Drive a future on a fresh single-threaded runtime
pub fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

/// Arbitrary JSON without floats
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 :/]{0,8}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Distinct ids in random order, and the subset to remove afterwards
pub fn ids_and_removals() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::btree_set("[a-z0-9]{1,6}", 0..10)
        .prop_flat_map(|ids| {
            let len = ids.len();
            let ids: Vec<String> = ids.into_iter().collect();
            (Just(ids).prop_shuffle(), prop::collection::vec(any::<bool>(), len))
        })
        .prop_map(|(ids, mask)| {
            let removed = ids
                .iter()
                .zip(mask)
                .filter(|(_, remove)| *remove)
                .map(|(id, _)| id.clone())
                .collect();
            (ids, removed)
        })
}
