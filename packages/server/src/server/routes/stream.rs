//! SSE streaming endpoint.
//!
//! GET /api/streams/:topic
//!
//! Generic SSE endpoint. Subscribes to StreamHub by topic string and forwards
//! JSON values as SSE events.

use std::convert::Infallible;

use axum::extract::{Extension, Path};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::server::app::AppState;

/// SSE handler - subscribes to a StreamHub topic and streams events.
pub async fn stream_handler(
    Extension(state): Extension<AppState>,
    Path(topic): Path<String>,
) -> impl IntoResponse {
    let rx = state.deps.stream_hub.subscribe(&topic).await;

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(value) => {
            let event_type = value
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("message");

            Some(Ok::<_, Infallible>(
                Event::default().event(event_type).data(value.to_string()),
            ))
        }
        Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(_)) => {
            Some(Ok(Event::default().event("lagged").data("{}")))
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
