use axum::Router;

use crate::state::SharedState;

pub mod channels;
pub mod docs;
pub mod health;
pub mod sse;

/// Compose all route trees and wire in the shared state.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(channels::router())
        .merge(docs::router());

    api_router.with_state(state)
}
