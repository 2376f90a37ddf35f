//! Store configuration.
//!
//! Decides where `notes.db` lives. Front ends build a `StoreConfig` and hand it
//! to the notes service; nothing is opened until the service needs it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::normalize_text_option;

/// Default database file name
pub const DB_FILE_NAME: &str = "notes.db";

/// Environment override for the documents directory
pub const DATA_DIR_ENV: &str = "MYNOTES_DATA_DIR";

/// Where the database file is kept
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum StoreLocation {
    /// The platform documents directory (or `MYNOTES_DATA_DIR` when set)
    #[default]
    Documents,
    /// An explicit directory
    Directory(PathBuf),
    /// A private in-memory database (tests, throwaway sessions)
    InMemory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub location: StoreLocation,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    DB_FILE_NAME.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            location: StoreLocation::Documents,
            file_name: default_file_name(),
        }
    }
}

impl StoreConfig {
    /// Keep the database under `dir`
    pub fn in_directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::Directory(dir.into()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::InMemory,
            ..Self::default()
        }
    }

    /// Resolve the database file path, creating its directory.
    ///
    /// Returns `None` for in-memory stores.
    pub fn resolve_db_path(&self) -> Result<Option<PathBuf>> {
        let dir = match &self.location {
            StoreLocation::InMemory => return Ok(None),
            StoreLocation::Directory(dir) => dir.clone(),
            StoreLocation::Documents => documents_dir().ok_or_else(|| {
                Error::DirectoryUnavailable("no documents directory on this platform".into())
            })?,
        };

        ensure_dir(&dir)?;
        Ok(Some(dir.join(&self.file_name)))
    }
}

fn documents_dir() -> Option<PathBuf> {
    if let Some(dir) = normalize_text_option(std::env::var(DATA_DIR_ENV).ok()) {
        return Some(PathBuf::from(dir));
    }
    dirs::document_dir()
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|error| Error::DirectoryUnavailable(format!("{}: {error}", dir.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_documents_notes_db() {
        let config = StoreConfig::default();
        assert_eq!(config.location, StoreLocation::Documents);
        assert_eq!(config.file_name, "notes.db");
    }

    #[test]
    fn test_in_memory_has_no_path() {
        assert_eq!(StoreConfig::in_memory().resolve_db_path().unwrap(), None);
    }

    #[test]
    fn test_directory_is_created() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("nested").join("store");
        let path = StoreConfig::in_directory(&dir)
            .resolve_db_path()
            .unwrap()
            .unwrap();
        assert!(dir.is_dir());
        assert_eq!(path, dir.join("notes.db"));
    }

    #[test]
    fn test_unusable_directory_is_unavailable() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let result = StoreConfig::in_directory(blocker.join("sub")).resolve_db_path();
        assert!(matches!(result, Err(Error::DirectoryUnavailable(_))));
    }

    #[test]
    fn test_config_json_defaults() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"location":{"kind":"directory","path":"/tmp/n"}}"#).unwrap();
        assert_eq!(config, StoreConfig::in_directory("/tmp/n"));
    }
}
