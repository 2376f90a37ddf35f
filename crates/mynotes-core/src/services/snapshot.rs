//! Note-list snapshots pushed to every subscriber.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::models::Note;

/// One published note list
pub type Snapshot = Arc<Vec<Note>>;

/// Default number of unread snapshots a subscriber may fall behind by
pub const DEFAULT_CAPACITY: usize = 64;

/// Broadcast channel that remembers the last value it sent.
///
/// A new subscriber first sees the latest snapshot (empty before anything was
/// published), then every later snapshot in publish order.
pub struct SnapshotBroadcaster {
    latest: Mutex<Snapshot>,
    tx: broadcast::Sender<Snapshot>,
}

impl SnapshotBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            latest: Mutex::new(Arc::new(Vec::new())),
            tx,
        }
    }

    /// Replace the latest snapshot and push it to current subscribers
    pub fn publish(&self, notes: Vec<Note>) {
        let snapshot = Arc::new(notes);
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = Arc::clone(&snapshot);
        // No receivers is fine; late subscribers read `latest`.
        let receivers = self.tx.send(snapshot).unwrap_or(0);
        tracing::debug!("Published {} notes to {receivers} subscribers", latest.len());
    }

    pub fn latest(&self) -> Snapshot {
        Arc::clone(&self.latest.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn subscribe(&self) -> SnapshotSubscription {
        // Hold the slot while subscribing so no publish slips between the two.
        let latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        SnapshotSubscription {
            pending: Some(Arc::clone(&latest)),
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SnapshotBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Receiving end of a [`SnapshotBroadcaster`]
pub struct SnapshotSubscription {
    pending: Option<Snapshot>,
    rx: broadcast::Receiver<Snapshot>,
}

impl SnapshotSubscription {
    /// Wait for the next snapshot; `None` once the broadcaster is gone
    pub async fn recv(&mut self) -> Option<Snapshot> {
        if let Some(snapshot) = self.pending.take() {
            return Some(snapshot);
        }

        loop {
            match self.rx.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Snapshot subscriber lagged; skipped {skipped} snapshots");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next snapshot if one is already waiting
    pub fn try_recv(&mut self) -> Option<Snapshot> {
        if let Some(snapshot) = self.pending.take() {
            return Some(snapshot);
        }

        loop {
            match self.rx.try_recv() {
                Ok(snapshot) => return Some(snapshot),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Snapshot subscriber lagged; skipped {skipped} snapshots");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::note_row;
    use pretty_assertions::assert_eq;

    fn note(id: i64) -> Note {
        Note::from_row(&note_row(id, 1, "", true)).unwrap()
    }

    fn ids(snapshot: &Snapshot) -> Vec<i64> {
        snapshot.iter().map(Note::id).collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_new_subscriber_gets_empty_default() {
        let broadcaster = SnapshotBroadcaster::default();
        let mut sub = broadcaster.subscribe();
        assert!(sub.recv().await.unwrap().is_empty());
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_late_subscriber_gets_latest_only() {
        let broadcaster = SnapshotBroadcaster::default();
        broadcaster.publish(vec![note(1)]);
        broadcaster.publish(vec![note(1), note(2)]);

        let mut sub = broadcaster.subscribe();
        assert_eq!(ids(&sub.recv().await.unwrap()), vec![1, 2]);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_every_subscriber_sees_every_publish_in_order() {
        let broadcaster = SnapshotBroadcaster::default();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        broadcaster.publish(vec![note(1)]);
        broadcaster.publish(vec![]);

        for sub in [&mut first, &mut second] {
            assert!(sub.recv().await.unwrap().is_empty());
            assert_eq!(ids(&sub.recv().await.unwrap()), vec![1]);
            assert!(sub.recv().await.unwrap().is_empty());
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_lagging_subscriber_skips_ahead() {
        let broadcaster = SnapshotBroadcaster::new(2);
        let mut sub = broadcaster.subscribe();
        sub.recv().await.unwrap();

        for id in 1..=5 {
            broadcaster.publish(vec![note(id)]);
        }

        assert_eq!(ids(&sub.recv().await.unwrap()), vec![4]);
        assert_eq!(ids(&sub.recv().await.unwrap()), vec![5]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_closed_when_broadcaster_dropped() {
        let broadcaster = SnapshotBroadcaster::default();
        let mut sub = broadcaster.subscribe();
        drop(broadcaster);

        assert!(sub.recv().await.is_some());
        assert!(sub.recv().await.is_none());
    }
}
