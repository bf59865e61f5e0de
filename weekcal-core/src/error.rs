//! Error types for weekcal.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while importing or exporting occurrences.
#[derive(Error, Debug)]
pub enum WeekcalError {
    #[error("Error opening calendar file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing calendar file: {0}")]
    FormatParse(String),

    #[error("Event '{uid}' has no usable start time")]
    TimeExtraction { uid: String },

    #[error("Failed to parse RRULE for event '{uid}': {message}")]
    RuleParse { uid: String, message: String },

    #[error("Failed to build RRULE for event '{uid}': {message}")]
    RuleConstruction { uid: String, message: String },

    #[error("Error parsing timestamp '{value}': {source}")]
    TimestampParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Could not determine home directory")]
    HomeDirectory,

    #[error("Error writing calendar file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeekcalError {
    /// Rule errors only affect the event that carries the rule; the import
    /// skips that event and carries on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WeekcalError::RuleParse { .. } | WeekcalError::RuleConstruction { .. }
        )
    }
}

/// Result type alias for weekcal operations.
pub type WeekcalResult<T> = Result<T, WeekcalError>;
