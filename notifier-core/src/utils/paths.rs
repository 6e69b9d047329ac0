//! Application-specific directory resolution.
//!
//! Relies on `directories-next`; on Linux the results follow the XDG base
//! directory layout (e.g. `~/.config/notifier`, `~/.local/share/notifier`).

use crate::error::{ConfigError, CoreError};
use directories_next::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "Storefront";
const APPLICATION: &str = "notifier";

fn project_dirs(dir_type: &str) -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: dir_type.to_string(),
        })
    })
}

/// Directory holding `config.toml`.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Config").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Directory holding the persisted client storage.
pub fn get_app_data_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App Data").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory for log files. `directories-next` has no state directory, so this
/// is the local (non-roaming) data directory.
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    project_dirs("App State").map(|dirs| dirs.data_local_dir().to_path_buf())
}
