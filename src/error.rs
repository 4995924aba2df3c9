use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::state::game::GameError;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A collaborator (catalog, messenger) could not serve the request.
    #[error("unavailable: {0}")]
    Unavailable(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<GameError> for ServiceError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::Transition(invalid) => ServiceError::InvalidState(invalid.to_string()),
            GameError::Catalog(source) => ServiceError::Unavailable(source.to_string()),
            GameError::Messenger(source) => ServiceError::Unavailable(source.to_string()),
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(message) => AppError::ServiceUnavailable(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{catalog::CatalogError, messenger::MessengerError},
        state::state_machine::{GameEvent, GameState, InvalidTransition},
    };

    fn status_of(err: GameError) -> StatusCode {
        AppError::from(ServiceError::from(err))
            .into_response()
            .status()
    }

    #[test]
    fn game_errors_map_to_http_statuses() {
        assert_eq!(
            status_of(GameError::Transition(InvalidTransition {
                from: GameState::Finished,
                event: GameEvent::Start,
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(GameError::Catalog(CatalogError::Empty)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(GameError::Messenger(MessengerError::Unavailable(
                "offline".into()
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
