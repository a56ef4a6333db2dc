//! End-to-end check of the local store driven by a realtime change feed.
//!
//! Drives the synchronizer through an injected channel transport and
//! asserts the exact snapshot sequence a dashboard subscriber observes.

use serde_json::json;
use tokio_util::sync::CancellationToken;

use comptoir_client::models::Product;
use comptoir_client::{ChangeEvent, ChannelTransport, StoreHandle, Synchronizer};

fn product(id: &str, sku: &str, name: &str, stock: i64) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "sku": sku,
        "name": name,
        "current_stock": stock,
        "min_stock_threshold": 2,
    }))
    .unwrap()
}

fn update_event(row: &Product) -> ChangeEvent {
    serde_json::from_value(json!({
        "eventType": "UPDATE",
        "schema": "public",
        "table": "products",
        "old": {"id": row.id.as_str()},
        "new": serde_json::to_value(row).unwrap(),
    }))
    .unwrap()
}

fn delete_event(id: &str) -> ChangeEvent {
    serde_json::from_value(json!({
        "eventType": "DELETE",
        "schema": "public",
        "table": "products",
        "old": {"id": id},
    }))
    .unwrap()
}

#[tokio::test]
async fn feed_updates_are_observed_as_ordered_snapshots() {
    let store = StoreHandle::new();
    store.products.replace(vec![
        product("p1", "SAV-001", "Savon noir", 12),
        product("p2", "HUI-002", "Huile d'argan", 5),
        product("p3", "THE-003", "Thé à la menthe", 30),
    ]);

    let mut subscription = store.products.subscribe();
    // Replay of the loaded list.
    let initial = subscription.recv().await.unwrap();
    assert_eq!(initial.len(), 3);

    let (tx, transport) = ChannelTransport::pair();
    let cancel = CancellationToken::new();
    let task = Synchronizer::spawn(store.clone(), transport, cancel.clone());

    // A remote edit of the second row replaces it in place.
    let renamed = product("p2", "HUI-002", "Huile d'argan bio", 5);
    tx.send(update_event(&renamed)).unwrap();

    let after_update = subscription.recv().await.unwrap();
    assert_eq!(after_update.len(), 3);
    assert_eq!(after_update[0], initial[0]);
    assert_eq!(after_update[1], renamed);
    assert_eq!(after_update[2], initial[2]);

    // A remote delete of the first row shrinks the snapshot, keeping the
    // earlier edit.
    tx.send(delete_event("p1")).unwrap();

    let after_delete = subscription.recv().await.unwrap();
    assert_eq!(after_delete.len(), 2);
    assert_eq!(after_delete[0], renamed);
    assert_eq!(after_delete[1], initial[2]);

    cancel.cancel();
    task.await.unwrap();
}

#[tokio::test]
async fn events_for_other_tables_leave_the_store_untouched() {
    let store = StoreHandle::new();
    store
        .products
        .replace(vec![product("p1", "SAV-001", "Savon noir", 12)]);

    let (tx, transport) = ChannelTransport::pair();
    let cancel = CancellationToken::new();
    let task = Synchronizer::spawn(store.clone(), transport, cancel.clone());

    let foreign: ChangeEvent = serde_json::from_value(json!({
        "eventType": "DELETE",
        "schema": "public",
        "table": "ventes",
        "old": {"id": "p1"},
    }))
    .unwrap();
    tx.send(foreign).unwrap();

    // Closing the channel drains the feed before we look at the store.
    drop(tx);
    task.await.unwrap();
    cancel.cancel();

    assert_eq!(store.products.snapshot().len(), 1);
}

#[tokio::test]
async fn late_subscriber_catches_up_from_the_current_snapshot() {
    let store = StoreHandle::new();
    let (tx, transport) = ChannelTransport::pair();
    let cancel = CancellationToken::new();
    let task = Synchronizer::spawn(store.clone(), transport, cancel.clone());

    let inserted = product("p9", "BOU-009", "Bougie ambre", 8);
    let event: ChangeEvent = serde_json::from_value(json!({
        "eventType": "INSERT",
        "schema": "public",
        "table": "products",
        "new": serde_json::to_value(&inserted).unwrap(),
    }))
    .unwrap();
    tx.send(event).unwrap();
    drop(tx);
    task.await.unwrap();
    cancel.cancel();

    // Subscribing after the fact still yields the latest state first.
    let mut subscription = store.products.subscribe();
    let snapshot = subscription.recv().await.unwrap();
    assert_eq!(snapshot.as_ref(), &vec![inserted]);
}
