//! Pending Set Module
//!
//! Tracks keys whose value has been announced but not yet stored, and the
//! waiters queued on each of them.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::error::{CacheError, Result};

// == Waiter ==
/// Receives the value stored for a pending key.
///
/// Awaiting yields the value once `set` stores it, or
/// `CacheError::Discarded` if the key was deleted or cleared first.
#[derive(Debug)]
pub struct Waiter<V> {
    key: String,
    rx: oneshot::Receiver<V>,
}

impl<V> Waiter<V> {
    /// Creates a waiter that already holds `value`.
    pub(crate) fn resolved(key: &str, value: V) -> Self {
        let (tx, rx) = oneshot::channel();
        // The receiver is alive, so this cannot fail
        let _ = tx.send(value);
        Self {
            key: key.to_string(),
            rx,
        }
    }

    /// Canonical key this waiter listens on.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Takes the value without blocking.
    ///
    /// Returns `Ok(None)` while the key is still pending. A value is handed
    /// out once; later calls report `Discarded`.
    pub fn try_value(&mut self) -> Result<Option<V>> {
        match self.rx.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => Err(CacheError::Discarded(self.key.clone())),
        }
    }
}

impl<V> Future for Waiter<V> {
    type Output = Result<V>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.rx)
            .poll(cx)
            .map(|received| received.map_err(|_| CacheError::Discarded(this.key.clone())))
    }
}

// == Pending Set ==
/// Minimum number of markers before `register` sweeps closed waiters.
const MIN_SWEEP_THRESHOLD: usize = 64;

/// One pending key: whether a fetcher claimed it, and who is waiting.
#[derive(Debug)]
struct Marker<V> {
    announced: bool,
    /// Kept in registration order
    senders: Vec<oneshot::Sender<V>>,
}

impl<V> Marker<V> {
    fn new(announced: bool) -> Self {
        Self {
            announced,
            senders: Vec::new(),
        }
    }

    /// A marker matters while a fetcher owns it or someone still listens.
    fn is_live(&self) -> bool {
        self.announced || self.senders.iter().any(|tx| !tx.is_closed())
    }
}

/// Pending markers keyed by canonical URL.
///
/// A marker is created either by `announce`, which hands the fetch to the
/// caller, or by `register`, which only queues a waiter. Markers whose
/// waiters have all gone away and that nobody announced are swept.
#[derive(Debug)]
pub struct PendingSet<V> {
    markers: HashMap<String, Marker<V>>,
    /// Marker count at which the next `register` sweeps
    sweep_at: usize,
}

impl<V> Default for PendingSet<V> {
    fn default() -> Self {
        Self {
            markers: HashMap::new(),
            sweep_at: MIN_SWEEP_THRESHOLD,
        }
    }
}

impl<V> PendingSet<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the fetch for `key`.
    ///
    /// Returns true if nobody announced the key yet, even when waiters are
    /// already queued on it; false otherwise.
    pub fn announce(&mut self, key: &str) -> bool {
        match self.markers.get_mut(key) {
            Some(marker) if marker.announced => false,
            Some(marker) => {
                marker.announced = true;
                true
            }
            None => {
                self.markers.insert(key.to_string(), Marker::new(true));
                true
            }
        }
    }

    /// Queues a new waiter on `key`, creating an unannounced marker if
    /// needed.
    pub fn register(&mut self, key: &str) -> Waiter<V> {
        if self.markers.len() >= self.sweep_at {
            self.prune();
        }

        let (tx, rx) = oneshot::channel();
        self.markers
            .entry(key.to_string())
            .or_insert_with(|| Marker::new(false))
            .senders
            .push(tx);
        Waiter {
            key: key.to_string(),
            rx,
        }
    }

    /// Removes the marker for `key`, sending `value` to each waiter in the
    /// order they registered. Returns how many waiters received it.
    pub fn resolve(&mut self, key: &str, value: &V) -> usize
    where
        V: Clone,
    {
        let Some(marker) = self.markers.remove(key) else {
            return 0;
        };

        marker
            .senders
            .into_iter()
            .filter(|tx| !tx.is_closed())
            .map(|tx| tx.send(value.clone()).is_ok())
            .filter(|delivered| *delivered)
            .count()
    }

    /// Drops the marker for `key` without sending anything. Returns the
    /// number of waiters discarded.
    pub fn discard(&mut self, key: &str) -> usize {
        self.markers.remove(key).map_or(0, |marker| marker.senders.len())
    }

    /// Drops every marker. Returns the number of waiters discarded.
    pub fn clear(&mut self) -> usize {
        self.sweep_at = MIN_SWEEP_THRESHOLD;
        self.markers.drain().map(|(_, marker)| marker.senders.len()).sum()
    }

    /// Forgets waiters that were dropped, then removes markers left with
    /// no waiter and no announcer. Returns the number of markers removed.
    pub fn prune(&mut self) -> usize {
        let before = self.markers.len();
        self.markers.retain(|_, marker| {
            marker.senders.retain(|tx| !tx.is_closed());
            marker.announced || !marker.senders.is_empty()
        });
        self.sweep_at = MIN_SWEEP_THRESHOLD.max(self.markers.len() * 2);
        before - self.markers.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.markers.get(key).is_some_and(Marker::is_live)
    }

    /// Number of pending keys that are announced or still have a waiter.
    pub fn len(&self) -> usize {
        self.markers.values().filter(|marker| marker.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
