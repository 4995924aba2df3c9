use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok").
    pub status: String,
    /// Number of rounds currently collecting guesses.
    pub active_games: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(active_games: usize) -> Self {
        Self {
            status: "ok".to_string(),
            active_games,
        }
    }
}
