//! Real-time refresh events.
//!
//! State changes are broadcast to connected WebSocket clients so they can
//! refresh their views reactively. Publishing is fire-and-forget: a closed
//! or lagging channel never blocks or fails the owning request, and the
//! checkout path publishes only after its transaction has committed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use lotus_core::OrderId;

/// Capacity of the broadcast channel. Slow clients that fall further behind
/// than this miss events and simply refresh on the next one.
const CHANNEL_CAPACITY: usize = 64;

/// An event pushed to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoreEvent {
    /// A product was created, updated, or deleted.
    #[serde(rename = "REFRESH_DATA")]
    RefreshData,

    /// A category was created, updated, or deleted.
    #[serde(rename = "REFRESH_CATEGORIES")]
    RefreshCategories,

    /// A checkout committed.
    #[serde(rename = "NEW_ORDER")]
    NewOrder {
        order_id: OrderId,
        total: Decimal,
        customer_name: String,
    },
}

/// Broadcast bus for [`StoreEvent`]s.
///
/// Cheap to clone; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a new event bus.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event to all current subscribers, best-effort.
    ///
    /// With zero subscribers this is a no-op, not an error.
    pub fn publish(&self, event: StoreEvent) {
        match self.tx.send(event) {
            Ok(receivers) => tracing::debug!(receivers, "event published"),
            Err(_) => tracing::trace!("event dropped: no subscribers"),
        }
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(StoreEvent::RefreshData);

        assert_eq!(rx.recv().await.unwrap(), StoreEvent::RefreshData);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let bus = EventBus::new();
        // Must not panic or error
        bus.publish(StoreEvent::RefreshCategories);
    }

    #[tokio::test]
    async fn test_all_subscribers_receive() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(StoreEvent::RefreshCategories);

        assert_eq!(rx1.recv().await.unwrap(), StoreEvent::RefreshCategories);
        assert_eq!(rx2.recv().await.unwrap(), StoreEvent::RefreshCategories);
    }

    #[test]
    fn test_event_json_shape() {
        let event = StoreEvent::NewOrder {
            order_id: OrderId::new(12),
            total: Decimal::new(15000, 2),
            customer_name: "Linh".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "NEW_ORDER");
        assert_eq!(json["order_id"], 12);
        assert_eq!(json["customer_name"], "Linh");

        assert_eq!(
            serde_json::to_value(&StoreEvent::RefreshData).unwrap()["type"],
            "REFRESH_DATA"
        );
    }
}
