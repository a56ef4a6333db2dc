//! Realtime synchronizer
//!
//! Subscribes once per session to the backend's row-level change feed for
//! the products collection and applies every event to the local reactive
//! store in arrival order, with no reordering or deduplication. The task's
//! lifetime is bound to a cancellation token owned by the session.

mod transport;
mod ws;

pub use transport::{ChannelTransport, RealtimeTransport};
pub use ws::WsTransport;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use shared::models::Product;
use shared::realtime::{ChangeEvent, ChangeKind};

use crate::store::StoreHandle;

/// Schema watched by the feed.
pub const SCHEMA: &str = "public";
/// Table watched by the feed.
pub const PRODUCTS_TABLE: &str = "products";

/// Applies change events from a transport to the store.
pub struct Synchronizer;

impl Synchronizer {
    /// Spawn the feed task. It runs until the token is cancelled, the
    /// transport reports end-of-stream, or an unrecoverable feed error.
    pub fn spawn<T>(
        store: Arc<StoreHandle>,
        mut transport: T,
        cancel: CancellationToken,
    ) -> JoinHandle<()>
    where
        T: RealtimeTransport + 'static,
    {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        if let Err(e) = transport.close().await {
                            tracing::debug!(error = %e, "realtime close failed");
                        }
                        tracing::info!("realtime feed stopped");
                        break;
                    }
                    event = transport.next_event() => match event {
                        Ok(Some(event)) => Self::apply(&store, event),
                        Ok(None) => {
                            tracing::info!("realtime feed closed by transport");
                            break;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "realtime feed error");
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Apply one event to the store.
    ///
    /// Insert and update both go through upsert; an update whose row is not
    /// cached yet is appended as a new row (the feed carries the full row,
    /// so nothing is lost, but a missed insert can surface out of place).
    pub fn apply(store: &StoreHandle, event: ChangeEvent) {
        if !event.is_for(SCHEMA, PRODUCTS_TABLE) {
            tracing::trace!(table = %event.table, "ignoring event for unwatched table");
            return;
        }

        match event.kind {
            ChangeKind::Insert | ChangeKind::Update => match event.new_row::<Product>() {
                Ok(Some(product)) => {
                    tracing::debug!(id = %product.id, kind = ?event.kind, "applying row change");
                    store.products.upsert(product);
                }
                Ok(None) => tracing::warn!(kind = ?event.kind, "change event without new row"),
                Err(e) => tracing::warn!(error = %e, "undecodable product row, event skipped"),
            },
            ChangeKind::Delete => match event.old_id() {
                Some(id) => {
                    tracing::debug!(%id, "applying row delete");
                    store.products.remove(&id);
                }
                None => tracing::warn!("delete event without old row id"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "sku": format!("SKU-{id}"),
            "name": name,
            "current_stock": 1,
            "min_stock_threshold": 5,
        })
    }

    fn event(kind: ChangeKind, old: Option<serde_json::Value>, new: Option<serde_json::Value>) -> ChangeEvent {
        ChangeEvent {
            kind,
            schema: SCHEMA.into(),
            table: PRODUCTS_TABLE.into(),
            old,
            new,
        }
    }

    #[test]
    fn insert_event_appends_row() {
        let store = StoreHandle::new();
        Synchronizer::apply(
            &store,
            event(ChangeKind::Insert, None, Some(product_json("p1", "Un"))),
        );
        assert_eq!(store.products.snapshot().len(), 1);
    }

    #[test]
    fn update_before_insert_appends_row() {
        // A missed INSERT means the UPDATE's row is not cached; upsert's
        // not-found rule appends it instead of dropping the event.
        let store = StoreHandle::new();
        Synchronizer::apply(
            &store,
            event(
                ChangeKind::Update,
                Some(json!({"id": "p9"})),
                Some(product_json("p9", "Neuf")),
            ),
        );
        let snapshot = store.products.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "p9");
    }

    #[test]
    fn events_for_other_tables_are_ignored() {
        let store = StoreHandle::new();
        let mut foreign = event(ChangeKind::Insert, None, Some(product_json("p1", "Un")));
        foreign.table = "suppliers".into();
        Synchronizer::apply(&store, foreign);
        assert!(store.products.snapshot().is_empty());
    }

    #[test]
    fn undecodable_row_is_skipped_without_panic() {
        let store = StoreHandle::new();
        Synchronizer::apply(
            &store,
            event(ChangeKind::Insert, None, Some(json!({"id": "p1"}))),
        );
        assert!(store.products.snapshot().is_empty());
    }

    #[tokio::test]
    async fn cancellation_stops_the_feed_task() {
        let store = StoreHandle::new();
        let (tx, transport) = ChannelTransport::pair();
        let cancel = CancellationToken::new();

        let mut sub = store.products.subscribe();
        let handle = Synchronizer::spawn(store.clone(), transport, cancel.clone());

        tx.send(event(ChangeKind::Insert, None, Some(product_json("p1", "Un"))))
            .unwrap();
        // Wait until the feed task has applied the insert, then cancel.
        loop {
            let snapshot = sub.recv().await.unwrap();
            if snapshot.len() == 1 {
                break;
            }
        }

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(store.products.snapshot().len(), 1);
    }
}
