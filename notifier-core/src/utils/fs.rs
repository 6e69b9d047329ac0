//! Filesystem Utilities.
//!
//! Thin wrappers around `std::fs` that map I/O failures to [`CoreError::Filesystem`]
//! with the offending path attached.

use crate::error::CoreError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Ensures that a directory exists at the given path, creating parents as needed.
///
/// Fails if the path exists but is not a directory.
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if path.is_dir() {
            Ok(())
        } else {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "Path exists but is not a directory"),
            })
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Reads the entire contents of a file into a string.
pub fn read_to_string(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to read file to string".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes `content` to `path` by writing a sibling temp file and renaming it over
/// the target, so readers never observe a half-written file.
///
/// Parent directories are created if missing.
pub fn write_string_atomically(path: &Path, content: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| CoreError::InvalidInput(format!("Path has no file name: {:?}", path)))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let write_tmp = || -> std::io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()
    };
    write_tmp().map_err(|e| CoreError::Filesystem {
        message: "Failed to write temporary file".to_string(),
        path: tmp_path.clone(),
        source: e,
    })?;

    fs::rename(&tmp_path, path).map_err(|e| CoreError::Filesystem {
        message: "Failed to move temporary file into place".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}
