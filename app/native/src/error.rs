//! Error types for Trellis.
//!
//! `TrellisError` is what CLI commands return. Subsystems keep their own
//! error enums and convert into it at the command boundary.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::tiling::TilingError;

/// Errors that can occur during command execution.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum TrellisError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Replay script could not be read or parsed.
    #[error("Script error: {0}")]
    ScriptError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Tiling operation failed.
    #[error("Tiling error: {0}")]
    TilingError(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for TrellisError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for TrellisError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<ConfigError> for TrellisError {
    fn from(err: ConfigError) -> Self { Self::ConfigError(err.to_string()) }
}

impl From<TilingError> for TrellisError {
    fn from(err: TilingError) -> Self { Self::TilingError(err.to_string()) }
}

impl From<String> for TrellisError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for TrellisError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::WindowId;

    #[test]
    fn test_invalid_arguments_display() {
        let err = TrellisError::InvalidArguments("Config file not found: x".to_string());
        assert_eq!(err.to_string(), "Config file not found: x");
    }

    #[test]
    fn test_script_error_display() {
        let err = TrellisError::ScriptError("expected value at line 1".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Script error"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: TrellisError = io_err.into();
        assert!(matches!(err, TrellisError::IoError(_)));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_config_error_from_conversion() {
        let err: TrellisError = ConfigError::NotFound.into();
        assert!(matches!(err, TrellisError::ConfigError(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_tiling_error_from_conversion() {
        let err: TrellisError = TilingError::WindowNotFound(WindowId(7)).into();
        assert!(matches!(err, TrellisError::TilingError(_)));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_string_conversions() {
        let from_string: TrellisError = String::from("boom").into();
        let from_str: TrellisError = "boom".into();
        assert_eq!(from_string.to_string(), from_str.to_string());
    }

    #[test]
    fn test_error_serializes_with_kind() {
        let json = serde_json::to_value(TrellisError::TilingError("x".to_string())).unwrap();
        assert_eq!(json["kind"], "TilingError");
        assert_eq!(json["message"], "x");
    }
}
