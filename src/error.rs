//! Error types for the surfaces around the triage engine.
//!
//! The engine itself is total: extraction, classification, scoring and
//! narrative synthesis never fail. Errors only arise at the edges, when
//! configuration or record files are read and parsed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or record input.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse {what}: {message}")]
    Parse { what: &'static str, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Usage: {0}")]
    Usage(String),
}

impl TriageError {
    pub fn parse(what: &'static str, err: serde_json::Error) -> Self {
        TriageError::Parse {
            what,
            message: err.to_string(),
        }
    }

    /// Returns true if the caller can proceed with default configuration.
    pub fn falls_back_to_defaults(&self) -> bool {
        matches!(self, TriageError::ConfigNotFound(_))
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TriageError::Io(_) => "Check file permissions and that the path exists.",
            TriageError::ConfigNotFound(_) => {
                "Create ~/.dispatch/config.json or pass --config <path>."
            }
            TriageError::Parse { .. } => "Check the file is valid JSON in the expected shape.",
            TriageError::InvalidConfig(_) => {
                "Archetype base scores must be strictly descending and caps positive."
            }
            TriageError::Usage(_) => {
                "Run: dispatch-triage <records.json> [--config <path>] [--now <rfc3339>]"
            }
        }
    }
}

impl From<std::io::Error> for TriageError {
    fn from(err: std::io::Error) -> Self {
        TriageError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: TriageError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, TriageError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn only_missing_config_falls_back() {
        assert!(TriageError::ConfigNotFound(PathBuf::from("/x")).falls_back_to_defaults());
        assert!(!TriageError::InvalidConfig("bad".into()).falls_back_to_defaults());
    }

    #[test]
    fn parse_error_names_its_source() {
        let raw = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = TriageError::parse("records", raw);
        assert!(err.to_string().starts_with("Failed to parse records"));
    }
}
