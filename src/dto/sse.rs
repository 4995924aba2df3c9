use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{duration_millis, format_system_time, game::ProductView},
    services::messenger::ProductAnnouncement,
    state::{game::GameReport, outcome::FinishStatus},
};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name.
    pub event: Option<String>,
    /// Serialized payload.
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already serialized payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Published when a round opens in a channel.
pub struct ProductAnnouncedEvent {
    pub game_id: Uuid,
    pub channel_id: String,
    pub product_name: String,
    /// Length of the guessing window in milliseconds.
    pub timeout_ms: u64,
}

impl ProductAnnouncedEvent {
    /// Build the payload announcing `announcement` in `channel_id`.
    pub fn new(channel_id: &str, announcement: ProductAnnouncement) -> Self {
        Self {
            game_id: announcement.game_id,
            channel_id: channel_id.to_string(),
            product_name: announcement.product_name,
            timeout_ms: duration_millis(announcement.timeout),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Published when a round is resolved.
pub struct GameFinishedEvent {
    pub game_id: Uuid,
    pub channel_id: String,
    pub status: FinishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_guess: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductView>,
    /// Every accepted guess keyed by participant.
    #[schema(value_type = std::collections::HashMap<String, f64>)]
    pub answers: IndexMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl From<GameReport> for GameFinishedEvent {
    fn from(report: GameReport) -> Self {
        Self {
            game_id: report.game_id,
            channel_id: report.channel_id,
            status: report.resolution.status,
            winner: report.resolution.winner,
            winning_guess: report.resolution.winning_guess,
            product: report.product.map(Into::into),
            answers: report.answers,
            finished_at: report.finished_at.map(format_system_time),
        }
    }
}
