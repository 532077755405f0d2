//! Server-Sent Events streaming for the candidate console's activity feed.
//!
//! Every broadcast `AppEvent` goes out as a named SSE event (the name equals
//! the JSON `type` tag), so the page attaches one listener per variant. Each
//! stream opens with a `connected` hello event so the feed can show the
//! subscription is live before the first candidate run.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::state::SharedState;

/// SSE endpoint — clients subscribe here for real-time run updates.
pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let hello = tokio_stream::once(Ok::<Event, Infallible>(
        Event::default()
            .event("connected")
            .data(r#"{"type":"connected"}"#),
    ));

    let events = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().and_then(|event| {
            serde_json::to_string(&event)
                .ok()
                .map(|data| Ok(Event::default().event(event.name()).data(data)))
        })
    });

    Sse::new(hello.chain(events)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
