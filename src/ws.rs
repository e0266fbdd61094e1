//! WebSocket upgrade handler and health endpoint.

use axum::Json;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt, future};
use tracing::info;

use pinpost_core::types::id::UserId;
use pinpost_realtime::{IncomingFrame, MetricsSnapshot, OutgoingFrame, run_session};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws/notifications/{user_id}: WebSocket upgrade
pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    // Resolve before upgrade
    let user_id = state.identity.resolve(&user_id).await?;

    Ok(ws.on_upgrade(move |socket| handle_ws_connection(state, user_id, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, user_id: UserId, socket: WebSocket) {
    info!(user_id = %user_id, "WebSocket connection established");

    let (ws_tx, ws_rx) = socket.split();

    let sink = ws_tx.with(|frame: OutgoingFrame| {
        future::ready(Ok::<_, axum::Error>(match frame {
            OutgoingFrame::Text(text) => Message::Text(text.into()),
            OutgoingFrame::Ping => Message::Ping(Default::default()),
        }))
    });
    let stream = ws_rx.filter_map(|result| {
        future::ready(match result {
            Ok(Message::Text(text)) => Some(Ok(IncomingFrame::Text(text.as_str().to_owned()))),
            Ok(Message::Pong(_)) => Some(Ok(IncomingFrame::Pong)),
            Ok(Message::Close(_)) => Some(Ok(IncomingFrame::Close)),
            // Ping is answered by axum automatically
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
    });

    run_session(
        state.engine.clone(),
        user_id,
        Box::pin(sink),
        Box::pin(stream),
    )
    .await;

    info!(user_id = %user_id, "WebSocket connection closed");
}

/// GET /health: liveness plus engine counters
pub async fn health(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.engine.metrics.snapshot())
}
