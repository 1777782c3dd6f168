//! Error types shared by the source clients and configuration.

use std::fmt;
use thiserror::Error;

/// The three external services a note is enriched from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SourceKind {
    Dictionary,
    Concordance,
    Collocation,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [
        SourceKind::Dictionary,
        SourceKind::Concordance,
        SourceKind::Collocation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Dictionary => "dictionary",
            SourceKind::Concordance => "concordance",
            SourceKind::Collocation => "collocation",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source could not produce a usable result for the requested word.
#[derive(Debug, Error)]
#[error("{origin} source unavailable: {reason}")]
pub struct SourceUnavailable {
    pub origin: SourceKind,
    pub reason: FailureReason,
}

impl SourceUnavailable {
    pub fn new(origin: SourceKind, reason: FailureReason) -> Self {
        Self { origin, reason }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    /// Body did not have the expected shape
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// Structurally valid payload without any results
    #[error("empty result set")]
    Empty,
}

impl From<reqwest::Error> for FailureReason {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FailureReason::Timeout
        } else if let Some(status) = err.status() {
            FailureReason::Status(status.as_u16())
        } else {
            FailureReason::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FailureReason {
    fn from(err: serde_json::Error) -> Self {
        FailureReason::Malformed(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {message}")]
    InvalidValue {
        key: &'static str,
        value: String,
        message: String,
    },
}
