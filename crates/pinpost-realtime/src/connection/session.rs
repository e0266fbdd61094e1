//! Session loop for one live connection.
//!
//! Transport-agnostic: the caller adapts its socket into a [`Sink`] of
//! [`OutgoingFrame`] and a [`Stream`] of [`IncomingFrame`].

use std::fmt::Display;
use std::sync::Arc;

use futures::{Sink, SinkExt, Stream, StreamExt};

use pinpost_core::types::id::UserId;

use super::handle::ConnectionHandle;
use super::heartbeat::HeartbeatConfig;
use crate::message::serializer::{deserialize_inbound, serialize_outbound};
use crate::message::types::{InboundMessage, OutboundEvent};
use crate::server::RealtimeEngine;

/// A frame received from the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingFrame {
    /// JSON text frame.
    Text(String),
    /// Transport-level pong.
    Pong,
    /// Peer closed the connection.
    Close,
}

/// A frame to send to the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingFrame {
    /// JSON text frame.
    Text(String),
    /// Transport-level ping.
    Ping,
}

/// Releases the registry entry however the session ends.
///
/// The normal path calls [`SessionGuard::release`]; if the session future
/// is dropped or panics first, `Drop` spawns the release instead.
struct SessionGuard {
    engine: RealtimeEngine,
    handle: Option<Arc<ConnectionHandle>>,
}

impl SessionGuard {
    fn new(engine: RealtimeEngine, handle: Arc<ConnectionHandle>) -> Self {
        Self {
            engine,
            handle: Some(handle),
        }
    }

    async fn release(mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.release(&handle).await;
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        handle.mark_dead();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let engine = self.engine.clone();
                runtime.spawn(async move {
                    engine.release(&handle).await;
                });
            }
            Err(_) => {
                // No runtime left to broadcast from; update the registry only.
                let _ = self.engine.registry.release(&handle);
            }
        }
    }
}

/// Drive one connection for `user_id` until the peer goes away, the
/// heartbeat expires, or the handle is closed.
///
/// The user is registered on entry and released on every exit path.
pub async fn run_session<S, R, E>(engine: RealtimeEngine, user_id: UserId, mut sink: S, mut stream: R)
where
    S: Sink<OutgoingFrame> + Unpin,
    S::Error: Display,
    R: Stream<Item = Result<IncomingFrame, E>> + Unpin,
    E: Display,
{
    let (handle, mut outbound) = engine.connect(user_id).await;
    let guard = SessionGuard::new(engine.clone(), handle.clone());
    let heartbeat = HeartbeatConfig::from_config(engine.config());
    let mut ticker = heartbeat.ticker();

    loop {
        tokio::select! {
            _ = handle.closed() => {
                tracing::debug!(user_id = %user_id, connection_id = %handle.id, "Connection closed by server");
                break;
            }
            event = outbound.recv() => {
                let Some(event) = event else { break };
                let text = match serialize_outbound(&event) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::error!(kind = event.kind(), error = %e, "Failed to serialize event");
                        continue;
                    }
                };
                if let Err(e) = sink.send(OutgoingFrame::Text(text)).await {
                    tracing::debug!(user_id = %user_id, error = %e, "Send failed, ending session");
                    break;
                }
            }
            frame = stream.next() => match frame {
                Some(Ok(IncomingFrame::Text(text))) => {
                    handle.touch().await;
                    handle_inbound(&engine, &handle, &text).await;
                }
                Some(Ok(IncomingFrame::Pong)) => handle.touch().await,
                Some(Ok(IncomingFrame::Close)) | None => break,
                Some(Err(e)) => {
                    tracing::warn!(user_id = %user_id, error = %e, "Receive error, ending session");
                    break;
                }
            },
            _ = ticker.tick() => {
                if heartbeat.is_expired(&handle).await {
                    tracing::warn!(
                        user_id = %user_id,
                        connection_id = %handle.id,
                        deadline = ?heartbeat.deadline(),
                        "Heartbeat timeout"
                    );
                    break;
                }
                if sink.send(OutgoingFrame::Ping).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = sink.close().await;
    guard.release().await;
}

/// Handle one JSON frame from the client.
async fn handle_inbound(engine: &RealtimeEngine, handle: &ConnectionHandle, text: &str) {
    let message = match deserialize_inbound(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(user_id = %handle.user_id, error = %e, "Invalid inbound message");
            let _ = handle
                .push(OutboundEvent::Error {
                    code: "INVALID_MESSAGE".to_string(),
                    message: e.to_string(),
                })
                .await;
            return;
        }
    };

    match message {
        InboundMessage::Ping => {
            let _ = handle.push(OutboundEvent::Pong).await;
        }
        InboundMessage::Typing {
            conversation_id,
            typing,
        } => {
            if let Err(e) = engine
                .typing
                .set_typing(handle.user_id, conversation_id, typing)
                .await
            {
                tracing::warn!(
                    user_id = %handle.user_id,
                    conversation_id = %conversation_id,
                    error = %e,
                    "Typing update failed"
                );
            }
        }
    }
}
