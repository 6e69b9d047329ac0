//! Configuration Loading.
//!
//! [`ConfigLoader`] locates `config.toml`, deserializes it, applies defaults and
//! validates the result.
//!
//! ## Configuration File Location
//!
//! 1. The path in `$NOTIFIER_CONFIG`, if set. The file must exist.
//! 2. Otherwise `config.toml` in the application configuration directory
//!    (see [`crate::utils::paths::get_app_config_dir`]). A missing file there
//!    yields the default configuration.
//!
//! ## Validation
//!
//! - Log level and format are normalized to lowercase and checked.
//! - Relative log file paths are resolved against the application state directory.
//! - Poller and API values are range checked.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::paths::{get_app_config_dir, get_app_state_dir};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "NOTIFIER_CONFIG";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_LOG_FORMATS: [&str; 2] = ["text", "json"];
/// Upper bound the server applies to `/recent/?limit=`.
const MAX_RECENT_LIMIT: u32 = 50;

/// Namespace for configuration loading logic.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the configuration from the default locations.
    pub fn load() -> Result<CoreConfig, CoreError> {
        if let Ok(explicit) = env::var(CONFIG_PATH_ENV) {
            if !explicit.trim().is_empty() {
                return Self::load_from_path(Path::new(&explicit));
            }
        }

        let user_config_path = get_app_config_dir()?.join("config.toml");
        match fs::read_to_string(&user_config_path) {
            Ok(content) => Self::load_from_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {:?}, using defaults", user_config_path);
                let mut config = CoreConfig::default();
                Self::validate_config(&mut config)?;
                Ok(config)
            }
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: user_config_path,
                source: e,
            })),
        }
    }

    /// Loads and validates the configuration from an explicit file, which must exist.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::load_from_str(&content)
    }

    /// Parses and validates TOML text. Empty text yields the defaults.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = if content.trim().is_empty() {
            CoreConfig::default()
        } else {
            toml::from_str(content).map_err(ConfigError::ParseError)?
        };
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Normalizes and range checks a configuration in place.
    pub fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level = config.logging.level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(validation(format!("Invalid log level: {}", config.logging.level)));
        }
        config.logging.level = level;

        let format = config.logging.format.to_lowercase();
        if !VALID_LOG_FORMATS.contains(&format.as_str()) {
            return Err(validation(format!("Invalid log format: {}", config.logging.format)));
        }
        config.logging.format = format;

        if let Some(file_path) = &config.logging.file_path {
            if file_path.as_os_str().is_empty() {
                return Err(validation("logging.file_path must not be empty".to_string()));
            }
            if file_path.is_relative() {
                config.logging.file_path = Some(resolve_against(get_app_state_dir()?, file_path));
            }
        }

        let base_url = config.api.base_url.trim_end_matches('/').to_string();
        match Url::parse(&base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(validation(format!("api.base_url must use http or https, got '{}'", url.scheme())));
            }
            Err(e) => return Err(validation(format!("api.base_url '{}' is not a valid URL: {}", base_url, e))),
        }
        config.api.base_url = base_url;

        if config.api.request_timeout_ms == 0 {
            return Err(validation("api.request_timeout_ms must be > 0".to_string()));
        }

        let poller = &config.poller;
        if poller.interval_secs == 0 {
            return Err(validation("poller.interval_secs must be > 0".to_string()));
        }
        if poller.recent_limit == 0 || poller.recent_limit > MAX_RECENT_LIMIT {
            return Err(validation(format!(
                "poller.recent_limit must be between 1 and {}, got {}",
                MAX_RECENT_LIMIT, poller.recent_limit
            )));
        }
        if poller.max_toasts == 0 {
            return Err(validation("poller.max_toasts must be > 0".to_string()));
        }
        if poller.toast_timeout_ms == 0 {
            return Err(validation("poller.toast_timeout_ms must be > 0".to_string()));
        }
        if poller.shown_registry_capacity == 0 {
            return Err(validation("poller.shown_registry_capacity must be > 0".to_string()));
        }
        if poller.event_channel_capacity == 0 {
            return Err(validation("poller.event_channel_capacity must be > 0".to_string()));
        }

        Ok(())
    }
}

fn validation(message: String) -> CoreError {
    CoreError::Config(ConfigError::ValidationError(message))
}

fn resolve_against(base: PathBuf, relative: &Path) -> PathBuf {
    base.join(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn validation_message(result: Result<CoreConfig, CoreError>) -> String {
        match result {
            Err(CoreError::Config(ConfigError::ValidationError(msg))) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_str_empty_yields_defaults() {
        let config = ConfigLoader::load_from_str("   \n").unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_load_from_str_normalizes_level_and_format() {
        let config = ConfigLoader::load_from_str("[logging]\nlevel = \"DEBUG\"\nformat = \"Json\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_trailing_slash_is_stripped_from_base_url() {
        let config = ConfigLoader::load_from_str("[api]\nbase_url = \"https://shop.example/api/notifications/\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://shop.example/api/notifications");
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let msg = validation_message(ConfigLoader::load_from_str("[logging]\nlevel = \"loud\"\n"));
        assert!(msg.contains("Invalid log level"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let msg = validation_message(ConfigLoader::load_from_str("[api]\nbase_url = \"not a url\"\n"));
        assert!(msg.contains("api.base_url"));

        let msg = validation_message(ConfigLoader::load_from_str("[api]\nbase_url = \"ftp://shop.example/api\"\n"));
        assert!(msg.contains("http or https"));
    }

    #[test]
    fn test_poller_ranges_are_checked() {
        let msg = validation_message(ConfigLoader::load_from_str("[poller]\ninterval_secs = 0\n"));
        assert!(msg.contains("interval_secs"));

        let msg = validation_message(ConfigLoader::load_from_str("[poller]\nrecent_limit = 51\n"));
        assert!(msg.contains("recent_limit"));

        let msg = validation_message(ConfigLoader::load_from_str("[poller]\nmax_toasts = 0\n"));
        assert!(msg.contains("max_toasts"));

        let msg = validation_message(ConfigLoader::load_from_str("[poller]\ntoast_timeout_ms = 0\n"));
        assert!(msg.contains("toast_timeout_ms"));

        let msg = validation_message(ConfigLoader::load_from_str("[poller]\nshown_registry_capacity = 0\n"));
        assert!(msg.contains("shown_registry_capacity"));
    }

    #[test]
    fn test_absolute_log_path_is_kept() {
        let config = ConfigLoader::load_from_str("[logging]\nfile_path = \"/var/log/notifier.log\"\n").unwrap();
        assert_eq!(config.logging.file_path, Some(PathBuf::from("/var/log/notifier.log")));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result = ConfigLoader::load_from_str("this is = = not toml");
        assert!(matches!(result, Err(CoreError::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_load_from_path_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[poller]\ninterval_secs = 45").unwrap();
        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.poller.interval_secs, 45);
    }

    #[test]
    fn test_load_from_missing_path_is_read_error() {
        let result = ConfigLoader::load_from_path(Path::new("/definitely/not/here/config.toml"));
        assert!(matches!(result, Err(CoreError::Config(ConfigError::ReadError { .. }))));
    }
}
