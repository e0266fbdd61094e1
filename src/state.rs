//! Shared handler state.

use std::sync::Arc;

use pinpost_core::traits::IdentityResolver;
use pinpost_realtime::RealtimeEngine;

/// State handed to every axum handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Real-time engine.
    pub engine: RealtimeEngine,
    /// Maps the connection credential to a user.
    pub identity: Arc<dyn IdentityResolver>,
}
