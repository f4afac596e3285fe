use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use review_summary_core::{Result, SummaryError};

type Inflight<K, V> = DashMap<K, broadcast::Sender<Result<V>>>;

/// Registry of in-flight computations, one per key
///
/// Each entry holds the broadcast sender that resolves every caller
/// waiting on that key.
pub(crate) struct Coalescer<K, V> {
    inflight: Arc<Inflight<K, V>>,
}

/// What a caller has to do after [`Coalescer::join_or_lead`]
pub(crate) enum Role<K, V>
where
    K: Hash + Eq,
{
    /// No computation was running; this caller must run it and complete the flight
    Leader(Flight<K, V>),
    /// A computation is already running; wait for its outcome
    Follower(Waiter<V>),
}

impl<K, V> Coalescer<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            inflight: Arc::new(DashMap::new()),
        }
    }

    /// Join the computation running for `key`, or register a new one.
    ///
    /// Check and register happen under the same shard lock, so two callers
    /// can never both become leader for one key.
    pub(crate) fn join_or_lead(&self, key: K) -> Role<K, V> {
        match self.inflight.entry(key.clone()) {
            Entry::Occupied(o) => Role::Follower(Waiter {
                rx: o.get().subscribe(),
            }),
            Entry::Vacant(v) => {
                let (tx, _rx) = broadcast::channel(1);
                v.insert(tx.clone());
                Role::Leader(Flight {
                    key,
                    tx,
                    inflight: self.inflight.clone(),
                    completed: false,
                })
            }
        }
    }

    /// Number of computations currently running
    pub(crate) fn len(&self) -> usize {
        self.inflight.len()
    }

    pub(crate) fn is_in_flight(&self, key: &K) -> bool {
        self.inflight.contains_key(key)
    }
}

impl<K, V> Clone for Coalescer<K, V> {
    fn clone(&self) -> Self {
        Self {
            inflight: self.inflight.clone(),
        }
    }
}

/// Leader's handle on a registered computation
///
/// The registry entry is removed when the flight completes or, failing
/// that, when the flight is dropped.
pub(crate) struct Flight<K, V>
where
    K: Hash + Eq,
{
    key: K,
    tx: broadcast::Sender<Result<V>>,
    inflight: Arc<Inflight<K, V>>,
    completed: bool,
}

impl<K, V> Flight<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Receiver for this flight's outcome, used by the leader's own caller
    pub(crate) fn subscribe(&self) -> Waiter<V> {
        Waiter {
            rx: self.tx.subscribe(),
        }
    }

    /// Deregister, then resolve every waiter with `outcome`.
    ///
    /// Waiters subscribe only while the entry exists, so every one of them
    /// is subscribed before the send below.
    pub(crate) fn complete(mut self, outcome: Result<V>) {
        self.inflight.remove(&self.key);
        self.completed = true;
        // No receivers left means every caller gave up; nothing to deliver
        let _ = self.tx.send(outcome);
    }
}

impl<K, V> Drop for Flight<K, V>
where
    K: Hash + Eq,
{
    fn drop(&mut self) {
        if !self.completed {
            // Leader task died (panic or abort); dropping `tx` wakes waiters
            self.inflight.remove(&self.key);
        }
    }
}

/// A caller suspended on an in-flight computation
pub(crate) struct Waiter<V> {
    rx: broadcast::Receiver<Result<V>>,
}

impl<V: Clone> Waiter<V> {
    pub(crate) async fn wait(mut self) -> Result<V> {
        match self.rx.recv().await {
            Ok(outcome) => outcome,
            Err(RecvError::Closed) => Err(SummaryError::Internal(
                "computation ended without a result".to_string(),
            )),
            Err(RecvError::Lagged(_)) => Err(SummaryError::Internal(
                "computation result was overwritten".to_string(),
            )),
        }
    }
}
