//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use mynotes_core::util::normalize_text_option;
use mynotes_core::StoreConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    /// Email of the signed-in user
    #[serde(default)]
    pub email: Option<String>,
    /// Directory holding notes.db
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("mynotes").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

impl CliConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self {
                version: default_config_version(),
                ..Self::default()
            });
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Email to act as: explicit flag, then `MYNOTES_EMAIL`, then the saved login
    pub fn resolve_email(&self, explicit: Option<&str>) -> Option<String> {
        normalize_text_option(explicit.map(str::to_string))
            .or_else(|| normalize_text_option(std::env::var("MYNOTES_EMAIL").ok()))
            .or_else(|| self.email.clone())
    }

    /// Store location: explicit flag, then the saved directory, then the documents dir
    pub fn store_config(&self, explicit_dir: Option<&Path>) -> StoreConfig {
        explicit_dir
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .map_or_else(StoreConfig::default, StoreConfig::in_directory)
    }

    fn normalize(&mut self) {
        self.email = normalize_text_option(self.email.take()).map(|email| email.to_lowercase());
        self.data_dir = self
            .data_dir
            .take()
            .filter(|dir| !dir.as_os_str().is_empty());
    }
}
