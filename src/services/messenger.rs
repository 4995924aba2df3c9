use std::{sync::Arc, time::Duration};

use futures::future::{self, BoxFuture};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dto::sse::{GameFinishedEvent, ProductAnnouncedEvent, ServerEvent},
    state::{SseHub, game::GameReport},
};

const EVENT_PRODUCT_ANNOUNCED: &str = "product.announced";
const EVENT_GAME_FINISHED: &str = "game.finished";

/// Result alias for messenger operations.
pub type MessengerResult<T> = Result<T, MessengerError>;

/// Error raised when a chat message cannot be delivered.
#[derive(Debug, Error)]
pub enum MessengerError {
    /// Transport towards the chat platform is not available.
    #[error("messenger unavailable: {0}")]
    Unavailable(String),
    /// Message payload could not be encoded.
    #[error("failed to encode message: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Opening message of a round. The price is deliberately absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAnnouncement {
    /// Round being announced.
    pub game_id: Uuid,
    /// Name of the product to price.
    pub product_name: String,
    /// How long participants have to answer.
    pub timeout: Duration,
}

/// Outbound side of the chat platform.
pub trait Messenger: Send + Sync {
    /// Tell `channel_id` which product is up for guessing.
    fn announce_product(
        &self,
        channel_id: &str,
        announcement: ProductAnnouncement,
    ) -> BoxFuture<'static, MessengerResult<()>>;

    /// Tell `channel_id` how the round ended.
    fn announce_result(
        &self,
        channel_id: &str,
        report: GameReport,
    ) -> BoxFuture<'static, MessengerResult<()>>;
}

/// Messenger that publishes every channel message on the public SSE stream.
pub struct SseMessenger {
    hub: Arc<SseHub>,
}

impl SseMessenger {
    /// Publish through `hub`.
    pub fn new(hub: Arc<SseHub>) -> Self {
        Self { hub }
    }

    fn publish(&self, event: &str, payload: &impl serde::Serialize) -> MessengerResult<()> {
        let event = ServerEvent::json(Some(event.to_string()), payload)?;
        self.hub.broadcast(event);
        Ok(())
    }
}

impl Messenger for SseMessenger {
    fn announce_product(
        &self,
        channel_id: &str,
        announcement: ProductAnnouncement,
    ) -> BoxFuture<'static, MessengerResult<()>> {
        let payload = ProductAnnouncedEvent::new(channel_id, announcement);
        Box::pin(future::ready(
            self.publish(EVENT_PRODUCT_ANNOUNCED, &payload),
        ))
    }

    fn announce_result(
        &self,
        _channel_id: &str,
        report: GameReport,
    ) -> BoxFuture<'static, MessengerResult<()>> {
        let payload = GameFinishedEvent::from(report);
        Box::pin(future::ready(self.publish(EVENT_GAME_FINISHED, &payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn product_announcement_is_broadcast_without_price() {
        let hub = Arc::new(SseHub::new(4));
        let mut receiver = hub.subscribe();
        let messenger = SseMessenger::new(hub);

        messenger
            .announce_product(
                "general",
                ProductAnnouncement {
                    game_id: Uuid::new_v4(),
                    product_name: "Desk lamp".into(),
                    timeout: Duration::from_secs(30),
                },
            )
            .await
            .unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_PRODUCT_ANNOUNCED));
        let body: serde_json::Value = serde_json::from_str(&event.data).unwrap();
        assert_eq!(body["channel_id"], "general");
        assert_eq!(body["product_name"], "Desk lamp");
        assert_eq!(body["timeout_ms"], 30_000);
        assert!(body.get("price").is_none());
    }

    #[tokio::test]
    async fn publishing_without_subscribers_succeeds() {
        let messenger = SseMessenger::new(Arc::new(SseHub::new(4)));
        let result = messenger
            .announce_product(
                "general",
                ProductAnnouncement {
                    game_id: Uuid::new_v4(),
                    product_name: "Desk lamp".into(),
                    timeout: Duration::from_secs(1),
                },
            )
            .await;
        assert!(result.is_ok());
    }
}
