//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional `config/default` and `config/{env}` files overlaid with
//! `PINPOST__`-prefixed environment variables.

pub mod app;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::logging::LoggingConfig;
use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP / WebSocket listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Real-time delivery settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `PINPOST__`. Every source is
    /// optional; missing values fall back to the serde defaults.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("PINPOST")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
