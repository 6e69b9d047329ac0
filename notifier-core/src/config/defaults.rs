//! Default configuration values.
//!
//! These functions are used by `serde`'s `default` attribute in the configuration
//! structures so that an empty or partial `config.toml` still yields a complete
//! configuration.

use crate::config::{ApiConfig, LoggingConfig, PollerConfig, StorageConfig};
use std::path::PathBuf;

pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

pub(crate) fn default_api_config() -> ApiConfig {
    ApiConfig {
        base_url: default_api_base_url(),
        request_timeout_ms: default_request_timeout_ms(),
    }
}

/// Base path of the notification endpoints, without a trailing slash.
pub(crate) fn default_api_base_url() -> String {
    "http://127.0.0.1:8000/api/notifications".to_string()
}

pub(crate) fn default_request_timeout_ms() -> u64 {
    10_000
}

pub(crate) fn default_poller_config() -> PollerConfig {
    PollerConfig {
        interval_secs: default_poll_interval_secs(),
        recent_limit: default_recent_limit(),
        max_toasts: default_max_toasts(),
        toast_timeout_ms: default_toast_timeout_ms(),
        shown_registry_capacity: default_shown_registry_capacity(),
        event_channel_capacity: default_event_channel_capacity(),
    }
}

pub(crate) fn default_poll_interval_secs() -> u64 {
    30
}

pub(crate) fn default_recent_limit() -> u32 {
    10
}

pub(crate) fn default_max_toasts() -> usize {
    3
}

pub(crate) fn default_toast_timeout_ms() -> u64 {
    5_000
}

pub(crate) fn default_shown_registry_capacity() -> usize {
    100
}

pub(crate) fn default_event_channel_capacity() -> usize {
    64
}

pub(crate) fn default_storage_config() -> StorageConfig {
    StorageConfig { path: None }
}
