//! KanbanContext - access to storage, events, and the rebalance queue
//!
//! The context provides access, not logic: a handle to the backing store,
//! the domain event bus, and the queue feeding the rebalance worker.
//! Commands do all the work.

use crate::events::EventBus;
use crate::ordering::rebalance::{self, RebalanceTarget};
use crate::store::{MemoryStore, Store};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Context passed to every command
#[derive(Clone)]
pub struct KanbanContext {
    store: Arc<dyn Store>,
    events: EventBus,
    rebalance_tx: mpsc::UnboundedSender<RebalanceTarget>,
    rebalance_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<RebalanceTarget>>>>,
}

impl KanbanContext {
    /// Create a context over the given store.
    ///
    /// Rebalance requests queue up until [`spawn_rebalance_worker`] is
    /// called; a long-running process should spawn the worker once at
    /// startup.
    ///
    /// [`spawn_rebalance_worker`]: KanbanContext::spawn_rebalance_worker
    pub fn new(store: Arc<dyn Store>) -> Self {
        let (rebalance_tx, rebalance_rx) = mpsc::unbounded_channel();
        Self {
            store,
            events: EventBus::default(),
            rebalance_tx,
            rebalance_rx: Arc::new(Mutex::new(Some(rebalance_rx))),
        }
    }

    /// Context over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The backing store
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// The domain event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Queue a rebalance pass for a container. Never blocks; if the worker
    /// is gone the request is dropped (the next over-long key re-triggers).
    pub fn enqueue_rebalance(&self, target: RebalanceTarget) {
        if self.rebalance_tx.send(target).is_err() {
            tracing::debug!("rebalance worker gone, dropping request");
        }
    }

    /// Start the rebalance worker. Returns `None` if it was already
    /// started for this context family.
    pub fn spawn_rebalance_worker(&self) -> Option<JoinHandle<()>> {
        let rx = self
            .rebalance_rx
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())?;
        let store = Arc::clone(&self.store);
        let bus = self.events.clone();
        Some(tokio::spawn(rebalance::run_worker(store, bus, rx)))
    }
}
