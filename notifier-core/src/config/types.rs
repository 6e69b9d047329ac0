//! Configuration Data Structures.
//!
//! These structs are populated by deserializing `config.toml`. Missing fields
//! fall back to the functions in [`super::defaults`]; unknown fields are rejected
//! via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration settings for the logging subsystem.
///
/// ```
/// use notifier_core::config::LoggingConfig;
///
/// let log_config: LoggingConfig = toml::from_str(r#"
/// level = "debug"
/// format = "json"
/// "#).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, None);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the app state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Where the notification REST endpoints live.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the notification endpoints, e.g. `https://shop.example/api/notifications`.
    #[serde(default = "defaults::default_api_base_url")]
    pub base_url: String,
    #[serde(default = "defaults::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        defaults::default_api_config()
    }
}

/// Tuning of the notification poller and its toast display.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollerConfig {
    /// Seconds between two poll ticks.
    #[serde(default = "defaults::default_poll_interval_secs")]
    pub interval_secs: u64,
    /// How many notifications the dropdown list requests.
    #[serde(default = "defaults::default_recent_limit")]
    pub recent_limit: u32,
    /// Maximum number of simultaneously visible toasts.
    #[serde(default = "defaults::default_max_toasts")]
    pub max_toasts: usize,
    /// Auto-dismiss delay of a toast.
    #[serde(default = "defaults::default_toast_timeout_ms")]
    pub toast_timeout_ms: u64,
    /// How many already-toasted notification IDs are remembered.
    #[serde(default = "defaults::default_shown_registry_capacity")]
    pub shown_registry_capacity: usize,
    #[serde(default = "defaults::default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn toast_timeout(&self) -> Duration {
        Duration::from_millis(self.toast_timeout_ms)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        defaults::default_poller_config()
    }
}

/// Location of the persisted client key/value storage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// `None` places the file in the application data directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        defaults::default_storage_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use notifier_core::config::CoreConfig;
///
/// let loaded: CoreConfig = toml::from_str(r#"
/// [poller]
/// interval_secs = 10
/// "#).unwrap();
/// assert_eq!(loaded.poller.interval_secs, 10);
/// assert_eq!(loaded.poller.max_toasts, 3);
/// assert_eq!(loaded.logging.level, "info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_api_config")]
    pub api: ApiConfig,
    #[serde(default = "defaults::default_poller_config")]
    pub poller: PollerConfig,
    #[serde(default = "defaults::default_storage_config")]
    pub storage: StorageConfig,
}
