use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    dto::{
        game::GameSnapshot,
        message::{AnswerResponse, IncomingMessage},
        validation::validate_chat_id,
    },
    error::ServiceError,
    state::{
        SharedState,
        game::{FinishCallback, Game},
    },
};

/// Open a new round in `channel_id`.
///
/// Only one round may run per channel; the round unregisters itself when it
/// finishes, whether by timeout or by [`finish_game`].
pub async fn start_game(
    state: &SharedState,
    channel_id: &str,
) -> Result<GameSnapshot, ServiceError> {
    ensure_channel_id(channel_id)?;

    let game = match state.games().entry(channel_id.to_string()) {
        Entry::Occupied(_) => {
            return Err(ServiceError::InvalidState(format!(
                "a round is already running in channel `{channel_id}`"
            )));
        }
        Entry::Vacant(slot) => {
            let game = Game::new(state, channel_id, Some(release_on_finish(state)));
            slot.insert(game.clone());
            game
        }
    };

    if let Err(err) = game.start().await {
        state
            .games()
            .remove_if(channel_id, |_, current| current.id() == game.id());
        warn!(channel_id, error = %err, "failed to start round");
        return Err(err.into());
    }

    Ok(game.report().into())
}

/// Route a chat message to the round running in `channel_id`.
pub fn submit_answer(
    state: &SharedState,
    channel_id: &str,
    message: IncomingMessage,
) -> Result<AnswerResponse, ServiceError> {
    let game = require_game(state, channel_id)?;
    let outcome = game.handle_event(&message.user_id, &message.text);
    Ok(outcome.into())
}

/// Stop the round running in `channel_id` early and return its final state.
pub async fn finish_game(
    state: &SharedState,
    channel_id: &str,
) -> Result<GameSnapshot, ServiceError> {
    let game = require_game(state, channel_id)?;
    info!(channel_id, game_id = %game.id(), "round stopped on request");
    game.finish().await;
    Ok(game.report().into())
}

/// Snapshot of the round running in `channel_id`.
pub fn current_game(state: &SharedState, channel_id: &str) -> Result<GameSnapshot, ServiceError> {
    let game = require_game(state, channel_id)?;
    Ok(game.report().into())
}

/// Final snapshot of the latest finished round in `channel_id`.
pub fn last_result(state: &SharedState, channel_id: &str) -> Result<GameSnapshot, ServiceError> {
    state
        .results()
        .get(channel_id)
        .map(|entry| entry.value().clone().into())
        .ok_or_else(|| {
            ServiceError::NotFound(format!("no finished round in channel `{channel_id}`"))
        })
}

fn require_game(state: &SharedState, channel_id: &str) -> Result<Arc<Game>, ServiceError> {
    state.game(channel_id).ok_or_else(|| {
        ServiceError::NotFound(format!("no round is running in channel `{channel_id}`"))
    })
}

fn ensure_channel_id(channel_id: &str) -> Result<(), ServiceError> {
    validate_chat_id(channel_id).map_err(|err| {
        ServiceError::InvalidInput(format!("invalid channel id `{channel_id}`: {err}"))
    })
}

/// Completion callback: free the channel and keep the final report.
fn release_on_finish(state: &SharedState) -> FinishCallback {
    let workspace = Arc::downgrade(state);
    Box::new(move |game: &Game| {
        let Some(workspace) = workspace.upgrade() else {
            return;
        };

        workspace
            .results()
            .insert(game.channel_id().to_string(), game.report());
        workspace
            .games()
            .remove_if(game.channel_id(), |_, current| current.id() == game.id());
    })
}
