use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt, future};
use tokio::sync::broadcast;
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use tracing::debug;

use crate::{
    dto::sse::ServerEvent,
    state::SharedState,
};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Subscribe to the channel-wide message feed.
pub fn subscribe_public(state: &SharedState) -> broadcast::Receiver<ServerEvent> {
    state.public_sse().subscribe()
}

/// Turn a hub subscription into an SSE response.
///
/// Subscribers that fall behind skip the missed messages instead of
/// disconnecting; the subscription ends when the client goes away.
pub fn to_sse_stream(
    receiver: broadcast::Receiver<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(receiver).filter_map(|message| {
        future::ready(match message {
            Ok(payload) => Some(Ok(to_event(payload))),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                debug!(skipped, "SSE subscriber lagging; dropping messages");
                None
            }
        })
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    let event = Event::default().data(payload.data);
    match payload.event {
        Some(name) => event.event(name),
        None => event,
    }
}
