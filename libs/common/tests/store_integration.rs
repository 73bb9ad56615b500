//! Integration tests for the session store
//!
//! These tests exercise the store the way the HTTP service does: several
//! sessions working at once, sessions idling past their lifetime, and
//! concurrent writers competing for the global id counters.

use chrono::{Duration, TimeZone, Utc};
use common::clock::ManualClock;
use common::models::{NewForecast, NewSale};
use common::store::{DEFAULT_SESSION_TTL_SECS, SessionStore};
use rust_decimal::Decimal;
use std::sync::Arc;

fn new_sale(month: u32, day: u32, amount: i64) -> NewSale {
    NewSale {
        date: Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap(),
        amount: Decimal::from(amount),
        product_category: "Electronics".to_string(),
        region: "EU".to_string(),
    }
}

fn new_forecast(month: u32, amount: i64) -> NewForecast {
    NewForecast {
        forecast_date: Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap(),
        predicted_amount: Decimal::from(amount),
        model_name: "Seasonal Naive".to_string(),
    }
}

/// Clock frozen at a fixed instant plus a store watching it
fn store_with_manual_clock() -> (Arc<ManualClock>, SessionStore) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    ));
    let store = SessionStore::with_clock(
        Duration::seconds(DEFAULT_SESSION_TTL_SECS),
        clock.clone(),
    );
    (clock, store)
}

#[tokio::test]
async fn sessions_do_not_see_each_other() {
    let store = SessionStore::new(Duration::seconds(DEFAULT_SESSION_TTL_SECS));

    store.create_sale("alpha", new_sale(1, 5, 100)).await;
    store.create_sale("alpha", new_sale(2, 5, 200)).await;
    store.create_sale("beta", new_sale(3, 5, 999)).await;
    store
        .create_forecasts("beta", vec![new_forecast(4, 250)])
        .await;

    let alpha_sales = store.get_sales("alpha").await;
    let beta_sales = store.get_sales("beta").await;
    assert_eq!(alpha_sales.len(), 2);
    assert_eq!(beta_sales.len(), 1);
    assert!(alpha_sales.iter().all(|s| s.amount <= Decimal::from(200)));

    assert!(store.get_forecasts("alpha").await.is_empty());
    assert_eq!(store.get_forecasts("beta").await.len(), 1);

    // Clearing one session leaves the other alone
    store.clear_sales("alpha").await;
    assert!(store.get_sales("alpha").await.is_empty());
    assert_eq!(store.get_sales("beta").await.len(), 1);
    assert_eq!(store.get_forecasts("beta").await.len(), 1);
}

#[tokio::test]
async fn idle_session_expires_after_its_ttl() {
    let (clock, store) = store_with_manual_clock();

    store.create_sale("idle", new_sale(1, 5, 100)).await;
    assert_eq!(store.session_count().await, 1);

    // A full day of silence runs the lifetime out exactly
    clock.advance(Duration::seconds(DEFAULT_SESSION_TTL_SECS));
    assert_eq!(store.session_count().await, 0);

    // Touching the expired id yields a fresh empty session, not an error
    assert!(store.get_sales("idle").await.is_empty());
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn activity_slides_the_expiry_window() {
    let (clock, store) = store_with_manual_clock();

    store.create_sale("busy", new_sale(1, 5, 100)).await;

    // Reads refresh the lifetime just like writes do
    clock.advance(Duration::hours(20));
    assert_eq!(store.get_sales("busy").await.len(), 1);

    clock.advance(Duration::hours(20));
    assert_eq!(
        store.get_sales("busy").await.len(),
        1,
        "session idled 20h since its last touch and must survive"
    );

    clock.advance(Duration::hours(25));
    assert!(
        store.get_sales("busy").await.is_empty(),
        "session idled past the TTL and must come back empty"
    );
}

#[tokio::test]
async fn sweep_on_any_touch_evicts_other_idle_sessions() {
    let (clock, store) = store_with_manual_clock();

    store.create_sale("a", new_sale(1, 5, 100)).await;
    store.create_sale("b", new_sale(1, 6, 110)).await;

    clock.advance(Duration::hours(25));

    // Touching an unrelated session sweeps the two idle ones
    store.create_sale("c", new_sale(1, 7, 120)).await;
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn expired_ids_are_not_reused_after_resurrection() {
    let (clock, store) = store_with_manual_clock();

    let before = store.create_sale("ghost", new_sale(1, 5, 100)).await;
    clock.advance(Duration::hours(25));

    let after = store.create_sale("ghost", new_sale(2, 5, 200)).await;
    assert!(after.id > before.id);

    let sales = store.get_sales("ghost").await;
    assert_eq!(sales.len(), 1, "only the post-expiry sale may remain");
    assert_eq!(sales[0].id, after.id);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_never_reuse_an_id() {
    let store = SessionStore::new(Duration::seconds(DEFAULT_SESSION_TTL_SECS));

    let mut handles = Vec::new();
    for task in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let session = format!("session-{}", task % 3);
            let mut ids = Vec::new();
            for i in 0..50i64 {
                let sale = store
                    .create_sale(&session, new_sale(1 + (i % 12) as u32, 1, i))
                    .await;
                ids.push(sale.id);
            }
            ids
        }));
    }

    let mut all_ids = Vec::new();
    for handle in handles {
        all_ids.extend(handle.await.expect("writer task panicked"));
    }

    let total = all_ids.len();
    all_ids.sort_unstable();
    all_ids.dedup();
    assert_eq!(all_ids.len(), total, "sale ids must be globally unique");
}

#[tokio::test]
async fn bulk_import_is_a_clean_slate_for_the_session() {
    let store = SessionStore::new(Duration::seconds(DEFAULT_SESSION_TTL_SECS));

    store.create_sale("s", new_sale(1, 5, 100)).await;
    store.create_sale("s", new_sale(2, 5, 200)).await;
    store
        .create_forecasts("s", vec![new_forecast(3, 150), new_forecast(4, 160)])
        .await;

    let imported = store
        .create_sales_bulk(
            "s",
            vec![new_sale(5, 1, 10), new_sale(6, 1, 20), new_sale(7, 1, 30)],
        )
        .await;

    assert_eq!(imported, 3);
    assert_eq!(store.get_sales("s").await.len(), 3);
    assert!(
        store.get_forecasts("s").await.is_empty(),
        "an import invalidates forecasts built on the old sales"
    );
}
