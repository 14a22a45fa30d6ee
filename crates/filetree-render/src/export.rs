//! Writing rendered trees to disk.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use thiserror::Error;

const FILE_NAME_PREFIX: &str = "file_tree_";
const TEXT_EXTENSION: &str = "txt";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Errors from saving a rendered tree.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Parent directory could not be created.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Default name for a saved tree, e.g. `file_tree_2024-05-01_13-45-09.txt`.
pub fn default_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamped_file_name(at, TEXT_EXTENSION)
}

/// Timestamped name with a caller-chosen extension (without the dot).
pub fn timestamped_file_name<Tz>(at: &DateTime<Tz>, extension: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{FILE_NAME_PREFIX}{}.{extension}",
        at.format(TIMESTAMP_FORMAT)
    )
}

/// Write rendered text to `path`, creating missing parent directories.
pub fn save(path: impl AsRef<Path>, text: &str) -> Result<(), ExportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
