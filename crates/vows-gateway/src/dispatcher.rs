use std::sync::Arc;

use tokio::sync::broadcast;

use vows_types::events::FeedEvent;

/// Fans change-feed events out to every connected client.
///
/// Handlers publish after a successful write; clients use the events only to
/// invalidate what they have cached, so a dropped event costs one stale read,
/// never correctness.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    broadcast_tx: broadcast::Sender<FeedEvent>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    /// Subscribe to feed events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event to all connected clients.
    pub fn broadcast(&self, event: FeedEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.inner.broadcast_tx.receiver_count()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn subscribers_see_broadcast_events() {
        let dispatcher = Dispatcher::new();
        let mut rx = dispatcher.subscribe();

        let media_id = Uuid::new_v4();
        dispatcher.broadcast(FeedEvent::LikeToggled {
            media_id,
            liked: true,
            likes_count: 3,
        });

        match rx.recv().await.unwrap() {
            FeedEvent::LikeToggled {
                media_id: got,
                liked,
                likes_count,
            } => {
                assert_eq!(got, media_id);
                assert!(liked);
                assert_eq!(likes_count, 3);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn broadcast_without_subscribers_is_fine() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.receiver_count(), 0);
        dispatcher.broadcast(FeedEvent::InvitationUpdated);
    }
}
