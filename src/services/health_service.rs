use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload including the number of running rounds.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.games().len())
}
