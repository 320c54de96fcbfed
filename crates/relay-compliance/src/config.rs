use crate::error::{ComplianceError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Registry bootstrap settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON blacklist whose EVM wallets form the always-checked supplementary list.
    pub blacklist_path: Option<PathBuf>,
    /// Binary registry snapshot merged over the built-in lists at startup.
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ComplianceError::ConfigError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content).map_err(ComplianceError::TomlError)
    }

    pub fn from_env() -> Result<Self> {
        let default_paths = [
            "config/compliance.toml",
            "compliance.toml",
            ".compliance.toml",
        ];

        for path in &default_paths {
            if std::path::Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }
}
