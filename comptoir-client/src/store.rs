//! Local reactive store
//!
//! In-memory observable copies of the two collections shared across views:
//! products and suppliers. One [`StoreHandle`] is constructed per session
//! and passed to whoever needs it; there is no ambient global.
//!
//! Each collection holds an immutable snapshot (`Arc<Vec<T>>`) and a list
//! of subscribers. Mutation happens only through three primitives —
//! [`Collection::replace`], [`Collection::upsert`], [`Collection::remove`]
//! — each of which installs a fresh snapshot and notifies every subscriber
//! synchronously, in subscription order. Subscribers receive the current
//! snapshot immediately on subscribe and every snapshot after that,
//! lossless and in emission order.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use shared::models::{Product, Supplier};
use shared::types::Keyed;

/// One observable collection of keyed rows.
#[derive(Debug)]
pub struct Collection<T> {
    inner: Mutex<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    snapshot: Arc<Vec<T>>,
    subscribers: Vec<mpsc::UnboundedSender<Arc<Vec<T>>>>,
}

/// Receiving side of a collection subscription.
///
/// The first value is the snapshot current at subscribe time
/// (replay-latest); dropping the subscription detaches it.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<Arc<Vec<T>>>,
}

impl<T> Subscription<T> {
    /// Next snapshot, `None` once the store is gone.
    pub async fn recv(&mut self) -> Option<Arc<Vec<T>>> {
        self.rx.recv().await
    }

    /// Already-emitted snapshot without waiting, if any.
    pub fn try_recv(&mut self) -> Option<Arc<Vec<T>>> {
        self.rx.try_recv().ok()
    }
}

impl<T: Keyed + Clone> Collection<T> {
    fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                snapshot: Arc::new(Vec::new()),
                subscribers: Vec::new(),
            }),
        }
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.inner.lock().expect("store lock poisoned").snapshot.clone()
    }

    /// Subscribe with replay-latest semantics.
    pub fn subscribe(&self) -> Subscription<T> {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let (tx, rx) = mpsc::unbounded_channel();
        // Replay the current value before the sender joins the list, so
        // the subscriber's first observation is the present snapshot.
        let _ = tx.send(inner.snapshot.clone());
        inner.subscribers.push(tx);
        Subscription { rx }
    }

    /// Replace the whole collection (used after a full reload).
    pub fn replace(&self, rows: Vec<T>) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        inner.publish(Arc::new(rows));
    }

    /// Insert-or-replace by id: a matching row is replaced in place,
    /// keeping its position; otherwise the row is appended.
    pub fn upsert(&self, row: T) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        let mut rows: Vec<T> = inner.snapshot.as_ref().clone();
        match rows.iter().position(|r| r.key() == row.key()) {
            Some(at) => rows[at] = row,
            None => rows.push(row),
        }
        inner.publish(Arc::new(rows));
    }

    /// Remove by id. Removing an id that is not present is a no-op and
    /// emits nothing.
    pub fn remove(&self, id: &str) {
        let mut inner = self.inner.lock().expect("store lock poisoned");
        if !inner.snapshot.iter().any(|r| r.key() == id) {
            return;
        }
        let rows: Vec<T> = inner
            .snapshot
            .iter()
            .filter(|r| r.key() != id)
            .cloned()
            .collect();
        inner.publish(Arc::new(rows));
    }
}

impl<T> Inner<T> {
    /// Install the snapshot and notify subscribers in subscription order,
    /// dropping the ones whose receiving side is gone.
    fn publish(&mut self, snapshot: Arc<Vec<T>>) {
        self.snapshot = snapshot.clone();
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

/// The shared in-memory state of a dashboard session.
///
/// Created once per session and torn down with it; the realtime
/// synchronizer writes into `products`, views read both collections.
#[derive(Debug)]
pub struct StoreHandle {
    pub products: Collection<Product>,
    pub suppliers: Collection<Supplier>,
}

impl StoreHandle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            products: Collection::new(),
            suppliers: Collection::new(),
        })
    }
}
