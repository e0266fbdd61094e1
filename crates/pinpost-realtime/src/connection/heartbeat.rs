//! Heartbeat timing for live connections.
//!
//! The session loop sends a transport-level ping every `ping_interval`. A
//! connection that has sent nothing (pongs included) for longer than
//! `ping_interval + ping_timeout` is considered dead.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use pinpost_core::config::realtime::RealtimeConfig;

use super::handle::ConnectionHandle;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Grace period for the peer to answer a ping
    pub ping_timeout: Duration,
}

impl HeartbeatConfig {
    /// Read the heartbeat settings from the realtime config.
    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            ping_timeout: config.ping_timeout(),
        }
    }

    /// Longest silence tolerated before the connection is dropped.
    pub fn deadline(&self) -> Duration {
        self.ping_interval + self.ping_timeout
    }

    /// Ping ticker whose first tick fires one interval from now.
    pub fn ticker(&self) -> Interval {
        let period = self.ping_interval.max(Duration::from_millis(1));
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Whether the peer has been silent past the deadline.
    pub async fn is_expired(&self, handle: &ConnectionHandle) -> bool {
        handle.last_activity().await.elapsed() > self.deadline()
    }
}

#[cfg(test)]
mod tests {
    use pinpost_core::types::id::UserId;

    use super::*;

    fn config() -> HeartbeatConfig {
        HeartbeatConfig {
            ping_interval: Duration::from_secs(30),
            ping_timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_silence_past_deadline_expires() {
        let (handle, _rx) = ConnectionHandle::new(UserId::new(), 1, Duration::from_millis(10));
        let heartbeat = config();

        time::advance(Duration::from_secs(35)).await;
        assert!(!heartbeat.is_expired(&handle).await);

        time::advance(Duration::from_secs(10)).await;
        assert!(heartbeat.is_expired(&handle).await);

        handle.touch().await;
        assert!(!heartbeat.is_expired(&handle).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_skips_immediate_tick() {
        let heartbeat = config();
        let start = Instant::now();
        let mut ticker = heartbeat.ticker();
        ticker.tick().await;
        assert!(start.elapsed() >= heartbeat.ping_interval);
    }
}
