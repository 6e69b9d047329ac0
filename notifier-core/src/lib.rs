//! # Notifier Core Library (`notifier-core`)
//!
//! `notifier-core` is the foundational layer of the storefront notifier workspace.
//! It carries the concerns every other crate shares:
//!
//! - **Error Handling**: the [`CoreError`] enum and its specific error types
//!   [`ConfigError`] and [`LoggingError`].
//! - **Configuration Management**: TOML configuration with defaults and validation,
//!   loaded through [`ConfigLoader`] into a [`CoreConfig`].
//! - **Logging**: a `tracing` based setup with console and optional rolling file output.
//! - **Utility Functions**: filesystem helpers (`utils::fs`) and application
//!   directory resolution (`utils::paths`).
//!
//! ```rust,ignore
//! use notifier_core::config::ConfigLoader;
//! use notifier_core::logging::init_logging;
//! use notifier_core::error::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("Notifier core initialized.");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ApiConfig, ConfigLoader, CoreConfig, LoggingConfig, PollerConfig, StorageConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
