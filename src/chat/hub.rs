use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;

use super::events::ChatEvent;

/// Registry of active chat connections. Every open connection holds an
/// unbounded sender; broadcast iterates the registry and prunes entries
/// whose receiving task has gone away.
#[derive(Clone)]
pub struct ChatHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    next_conn_id: AtomicU64,
    connections: RwLock<HashMap<u64, mpsc::UnboundedSender<ChatEvent>>>,
}

impl ChatHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                next_conn_id: AtomicU64::new(1),
                connections: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Adds a connection to the fan-out set. Returns its id and the receiving
    /// end the connection's send task drains.
    pub async fn register(&self) -> (u64, mpsc::UnboundedReceiver<ChatEvent>) {
        let conn_id = self.inner.next_conn_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.connections.write().await.insert(conn_id, tx);
        debug!(conn_id, "chat connection registered");
        (conn_id, rx)
    }

    /// Removes a connection; it receives nothing after this returns.
    pub async fn unregister(&self, conn_id: u64) {
        self.inner.connections.write().await.remove(&conn_id);
        debug!(conn_id, "chat connection unregistered");
    }

    /// Delivers an event to every active connection, the sender included.
    pub async fn broadcast(&self, event: ChatEvent) {
        let mut dead = Vec::new();
        {
            let connections = self.inner.connections.read().await;
            for (&conn_id, tx) in connections.iter() {
                if tx.send(event.clone()).is_err() {
                    dead.push(conn_id);
                }
            }
        }
        if !dead.is_empty() {
            let mut connections = self.inner.connections.write().await;
            for conn_id in dead {
                connections.remove(&conn_id);
            }
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.connections.read().await.len()
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::repo::ChatMessage;

    fn event(id: i64) -> ChatEvent {
        ChatEvent::ChatMessage(ChatMessage {
            id,
            sender_id: 1,
            receiver_id: None,
            message: "ping".into(),
            created_at: 0,
        })
    }

    fn message_id(event: &ChatEvent) -> i64 {
        match event {
            ChatEvent::ChatMessage(m) => m.id,
            ChatEvent::PastMessages(_) => panic!("unexpected backfill"),
        }
    }

    #[tokio::test]
    async fn broadcast_reaches_all_connections_including_sender() {
        let hub = ChatHub::new();
        let (_id_a, mut rx_a) = hub.register().await;
        let (_id_b, mut rx_b) = hub.register().await;

        hub.broadcast(event(5)).await;

        assert_eq!(message_id(&rx_a.recv().await.unwrap()), 5);
        assert_eq!(message_id(&rx_b.recv().await.unwrap()), 5);
    }

    #[tokio::test]
    async fn unregistered_connection_receives_nothing() {
        let hub = ChatHub::new();
        let (id_a, mut rx_a) = hub.register().await;
        let (_id_b, mut rx_b) = hub.register().await;

        hub.unregister(id_a).await;
        hub.broadcast(event(6)).await;

        assert_eq!(message_id(&rx_b.recv().await.unwrap()), 6);
        // The channel is closed, not just empty.
        assert!(rx_a.recv().await.is_none());
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn dropped_receiver_is_pruned_on_broadcast() {
        let hub = ChatHub::new();
        let (_id_a, rx_a) = hub.register().await;
        drop(rx_a);

        hub.broadcast(event(7)).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn broadcasts_arrive_in_order() {
        let hub = ChatHub::new();
        let (_id, mut rx) = hub.register().await;

        hub.broadcast(event(1)).await;
        hub.broadcast(event(2)).await;
        hub.broadcast(event(3)).await;

        assert_eq!(message_id(&rx.recv().await.unwrap()), 1);
        assert_eq!(message_id(&rx.recv().await.unwrap()), 2);
        assert_eq!(message_id(&rx.recv().await.unwrap()), 3);
    }
}
