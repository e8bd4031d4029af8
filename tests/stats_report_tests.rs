//! Stats aggregation over the degrading client.

mod common;

use common::MockStore;
use modelcache_core::cache::{CacheError, DegradingClient, ReadFailurePolicy};
use modelcache_core::profile::TypeKey;
use modelcache_core::stats::{StatsAggregator, MEMBERSHIP_KEY};

fn aggregator(store: MockStore, degrade: bool) -> StatsAggregator<MockStore> {
    StatsAggregator::new(DegradingClient::new(
        store,
        ReadFailurePolicy::from_flag(degrade),
    ))
}

/// Counters for three types; the third type's counters are unreachable.
fn seeded_store() -> MockStore {
    MockStore::new()
        .with_set(MEMBERSHIP_KEY, &["app.post", "app.comment", "shop.order"])
        .with_hash("cache_stats:app.post:0", &[("app.post:get", "2")])
        .with_hash(
            "cache_stats:app.post:1",
            &[("app.post:get", "1"), ("app.post:fetch", "2")],
        )
        .with_hash("cache_stats:app.comment:2", &[("app.comment", "1")])
}

#[tokio::test]
async fn report_sums_per_type_and_grand_totals() {
    let store = seeded_store();
    store.fail_keys_with_prefix("cache_stats:shop.order:");
    let aggregator = aggregator(store, true);

    let report = aggregator.build_full_report().await.unwrap();

    let post = &report.types["app.post"];
    assert_eq!(post.totals.uncached, 2);
    assert_eq!(post.totals.cached, 3);
    assert_eq!(post.totals.invalidated, 0);
    assert_eq!(post.totals.total, 5);

    let comment = &report.types["app.comment"];
    assert_eq!(comment.totals.invalidated, 1);
    assert_eq!(comment.totals.total, 1);

    // The unreachable type zero-fills instead of failing the report.
    let order = &report.types["shop.order"];
    assert_eq!(order.totals.total, 0);
    assert!(order.data.is_empty());

    assert_eq!(report.totals.uncached, 2);
    assert_eq!(report.totals.cached, 3);
    assert_eq!(report.totals.invalidated, 1);
    assert_eq!(report.totals.total, 6);
}

#[tokio::test]
async fn report_keeps_raw_sub_key_counts() {
    let aggregator = aggregator(seeded_store(), true);

    let report = aggregator.build_full_report().await.unwrap();

    let cached = &report.types["app.post"].data["cached"];
    assert_eq!(cached["app.post:get"], 1);
    assert_eq!(cached["app.post:fetch"], 2);
    // Kinds without data are omitted from the raw section.
    assert!(!report.types["app.post"].data.contains_key("invalidated"));
}

#[tokio::test]
async fn whole_backend_outage_yields_empty_report() {
    let store = seeded_store();
    store.set_unreachable(true);
    let aggregator = aggregator(store, true);

    let report = aggregator.build_full_report().await.unwrap();
    assert!(report.types.is_empty());
    assert_eq!(report.totals.total, 0);
}

#[tokio::test]
async fn outage_without_degradation_propagates() {
    let store = seeded_store();
    store.set_unreachable(true);
    let aggregator = aggregator(store, false);

    let error = aggregator.build_full_report().await.unwrap_err();
    assert!(matches!(error, CacheError::ConnectionError(_)));
}

#[tokio::test]
async fn membership_entries_without_separator_are_skipped() {
    let store = MockStore::new().with_set(MEMBERSHIP_KEY, &["app.post", "not-a-key"]);
    let aggregator = aggregator(store, true);

    let keys = aggregator.participating_type_keys().await.unwrap();
    assert_eq!(keys, vec![TypeKey::new("app", "post")]);
}

#[tokio::test]
async fn non_numeric_counter_value_is_a_value_error() {
    let store = MockStore::new()
        .with_hash("cache_stats:app.post:0", &[("app.post:get", "garbage")]);
    let aggregator = aggregator(store, true);

    // Degradation covers outages, not corrupted data.
    let error = aggregator
        .build_report(&[TypeKey::new("app", "post")])
        .await
        .unwrap_err();
    assert!(matches!(error, CacheError::SerializationError(_)));
}

#[tokio::test]
async fn report_for_explicit_key_list_ignores_membership() {
    let aggregator = aggregator(seeded_store(), true);

    let report = aggregator
        .build_report(&[TypeKey::new("app", "post")])
        .await
        .unwrap();

    assert_eq!(report.types.len(), 1);
    assert_eq!(report.totals.total, 5);
}
