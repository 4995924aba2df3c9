use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        game::GameSnapshot,
        message::{AnswerResponse, IncomingMessage},
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes driving the round of a chat channel.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/channels/{channel_id}/game",
            get(current_game).post(start_game),
        )
        .route("/channels/{channel_id}/game/finish", post(finish_game))
        .route("/channels/{channel_id}/game/result", get(last_result))
        .route("/channels/{channel_id}/messages", post(post_message))
}

/// Open a round: pick a product, announce it and start the countdown.
#[utoipa::path(
    post,
    path = "/channels/{channel_id}/game",
    tag = "channels",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    responses(
        (status = 200, description = "Round started", body = GameSnapshot),
        (status = 409, description = "A round is already running in this channel"),
        (status = 503, description = "Catalog or messenger unavailable")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::start_game(&state, &channel_id).await?;
    Ok(Json(snapshot))
}

/// Inspect the round currently running in a channel.
#[utoipa::path(
    get,
    path = "/channels/{channel_id}/game",
    tag = "channels",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    responses(
        (status = 200, description = "Running round", body = GameSnapshot),
        (status = 404, description = "No round is running")
    )
)]
pub async fn current_game(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::current_game(&state, &channel_id)?))
}

/// Stop the running round now and announce its result.
#[utoipa::path(
    post,
    path = "/channels/{channel_id}/game/finish",
    tag = "channels",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    responses(
        (status = 200, description = "Round finished", body = GameSnapshot),
        (status = 404, description = "No round is running")
    )
)]
pub async fn finish_game(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    let snapshot = game_service::finish_game(&state, &channel_id).await?;
    Ok(Json(snapshot))
}

/// Result of the latest finished round of a channel.
#[utoipa::path(
    get,
    path = "/channels/{channel_id}/game/result",
    tag = "channels",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    responses(
        (status = 200, description = "Latest finished round", body = GameSnapshot),
        (status = 404, description = "No round has finished in this channel")
    )
)]
pub async fn last_result(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::last_result(&state, &channel_id)?))
}

/// Chat event ingress: a participant wrote a message in the channel.
#[utoipa::path(
    post,
    path = "/channels/{channel_id}/messages",
    tag = "channels",
    params(("channel_id" = String, Path, description = "Chat channel identifier")),
    request_body = IncomingMessage,
    responses(
        (status = 202, description = "Message handled", body = AnswerResponse),
        (status = 400, description = "Malformed message"),
        (status = 404, description = "No round is running")
    )
)]
pub async fn post_message(
    State(state): State<SharedState>,
    Path(channel_id): Path<String>,
    Valid(Json(message)): Valid<Json<IncomingMessage>>,
) -> Result<(StatusCode, Json<AnswerResponse>), AppError> {
    let outcome = game_service::submit_answer(&state, &channel_id, message)?;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}
