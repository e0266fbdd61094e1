//! Real-time delivery configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound buffer size of each delivery channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Upper bound on a single push before the channel is considered broken.
    #[serde(default = "default_push_timeout")]
    pub push_timeout_ms: u64,
    /// WebSocket ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Time without a pong after which the connection is reclaimed.
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_seconds: u64,
    /// Number of characters kept from a text message as conversation preview.
    #[serde(default = "default_preview_chars")]
    pub preview_max_chars: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            push_timeout_ms: default_push_timeout(),
            ping_interval_seconds: default_ping_interval(),
            ping_timeout_seconds: default_ping_timeout(),
            preview_max_chars: default_preview_chars(),
        }
    }
}

impl RealtimeConfig {
    /// Push timeout as a [`Duration`].
    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }

    /// Ping interval as a [`Duration`].
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_seconds)
    }

    /// Pong timeout as a [`Duration`].
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_seconds)
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_push_timeout() -> u64 {
    2000
}

fn default_ping_interval() -> u64 {
    30
}

fn default_ping_timeout() -> u64 {
    10
}

fn default_preview_chars() -> usize {
    50
}
