use thiserror::Error;

use crate::codec::CodecError;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Failed to load compliance list: {0}")]
    ListLoadError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to decode compliance registry: {0}")]
    DecodeError(#[from] CodecError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ComplianceError>;
