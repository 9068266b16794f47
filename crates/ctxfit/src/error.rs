//! Crate-level error type.
//!
//! The retention algorithm itself is total: the only input it rejects is an
//! invalid [`EngineConfig`](crate::config::EngineConfig). The I/O variants are
//! produced solely by the JSONL loader in [`input`](crate::input).

use thiserror::Error;

/// Errors produced by `ctxfit`.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value is out of range (e.g. a zero token budget).
    #[error("invalid configuration: `{field}` {reason}")]
    Configuration {
        field: &'static str,
        reason: String,
    },

    /// Reading the input history failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A line of the input history is not a valid message record.
    #[error("invalid message record on line {line}: {source}")]
    Input {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn configuration(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
