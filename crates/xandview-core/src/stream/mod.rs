// ── Reactive snapshot streams ──
//
// Subscription types for consuming snapshot changes from the DataStore.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to one snapshot held by the [`DataStore`](crate::DataStore).
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct SnapshotStream<T: Clone + Send + Sync + 'static> {
    current: T,
    receiver: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> SnapshotStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<T>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> T {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<T> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream`. Yields the current value first, then
    /// every subsequent change.
    pub fn into_stream(self) -> SnapshotWatchStream<T> {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SnapshotWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<T>,
}

impl<T: Clone + Send + Sync + 'static> Stream for SnapshotWatchStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    #[tokio::test]
    async fn changed_tracks_the_latest_value() {
        let (tx, rx) = watch::channel(1_u32);
        let mut sub = SnapshotStream::new(rx);
        assert_eq!(*sub.current(), 1);

        tx.send_replace(2);
        assert_eq!(sub.latest(), 2);
        assert_eq!(*sub.current(), 1);
        assert_eq!(sub.changed().await, Some(2));
        assert_eq!(*sub.current(), 2);

        drop(tx);
        assert_eq!(sub.changed().await, None);
    }

    #[test]
    fn stream_yields_current_then_changes() {
        let (tx, rx) = watch::channel("a");
        let mut stream = task::spawn(SnapshotStream::new(rx).into_stream());

        assert_ready_eq!(stream.poll_next(), Some("a"));
        assert_pending!(stream.poll_next());

        tx.send_replace("b");
        assert!(stream.is_woken());
        assert_ready_eq!(stream.poll_next(), Some("b"));
    }
}
