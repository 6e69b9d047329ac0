//! Utility functions shared across the workspace.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_to_string, write_string_atomically};
