//! Configuration Management.
//!
//! - [`types`]: the configuration schema ([`CoreConfig`] and its sections).
//! - [`defaults`]: default values used when a file or a field is missing.
//! - [`loader`]: [`ConfigLoader`], which locates, parses and validates `config.toml`.
//!
//! Loading order: `$NOTIFIER_CONFIG` if set, otherwise `config.toml` in the
//! application configuration directory. A missing file yields the defaults.

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, CONFIG_PATH_ENV};
pub use types::{ApiConfig, CoreConfig, LoggingConfig, PollerConfig, StorageConfig};
