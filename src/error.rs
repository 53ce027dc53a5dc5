//! Error types
//!
//! Only construction-time work can fail. Per-frame simulation never returns
//! an error; the end of a run is a game phase, not a failure.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A config value is out of range or inconsistent with another
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// A required model could not be loaded by the scene backend
    #[error("failed to load asset `{path}`: {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Serialising output for the host failed
    #[error("failed to encode output: {0}")]
    Encode(#[source] serde_json::Error),
}

impl GameError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GameError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_is_not_reported_as_parse() {
        let inner = serde_json::from_str::<u32>("x").unwrap_err();
        let message = GameError::Encode(inner).to_string();
        assert!(message.starts_with("failed to encode output"), "{message}");
    }
}
