//! Error types for trailrecorder.
//!
//! The trail recorder itself never fails: every anomaly on the event path
//! degrades to a no-op. The errors here belong to the surfaces around it,
//! namely configuration, replay files and event sources.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for trailrecorder operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Replay Errors ===
    /// Failed to read a replay file.
    #[error("failed to read replay file {}: {source}", path.display())]
    ReplayRead {
        /// Path to the replay file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A line of a replay file is not a valid trail event.
    #[error("invalid trail event on line {line}: {source}")]
    ReplayParse {
        /// One-based line number.
        line: usize,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Event Source Errors ===
    /// An event source failed while delivering events.
    #[error("event source '{name}' failed: {message}")]
    EventSource {
        /// Name of the event source.
        name: &'static str,
        /// Description of what went wrong.
        message: String,
    },
}

/// A specialized Result type for trailrecorder operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an event source error.
    #[must_use]
    pub fn event_source(name: &'static str, message: impl Into<String>) -> Self {
        Self::EventSource {
            name,
            message: message.into(),
        }
    }

    /// Check if this error came from parsing replay input.
    #[must_use]
    pub fn is_replay_error(&self) -> bool {
        matches!(self, Self::ReplayRead { .. } | Self::ReplayParse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::config_validation("capacity must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: capacity must be greater than 0"
        );
    }

    #[test]
    fn test_event_source_error() {
        let err = Error::event_source("replay", "channel closed");
        let msg = err.to_string();
        assert!(msg.contains("replay"));
        assert!(msg.contains("channel closed"));
        assert!(!err.is_replay_error());
    }

    #[test]
    fn test_replay_read_error_display() {
        let err = Error::ReplayRead {
            path: PathBuf::from("/tmp/walk.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/tmp/walk.jsonl"));
        assert!(err.is_replay_error());
    }

    #[test]
    fn test_replay_parse_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err = Error::ReplayParse { line: 7, source };
        assert!(err.to_string().contains("line 7"));
        assert!(err.is_replay_error());
    }

    #[test]
    fn test_from_figment_error() {
        let err: Error = figment::Error::from("bad value".to_string()).into();
        assert!(matches!(err, Error::ConfigLoad(_)));
        assert!(err.to_string().contains("bad value"));
    }
}
