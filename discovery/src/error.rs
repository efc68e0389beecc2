//! Error types for completion item generation.
//!
//! Covers the failure modes of the generation pipeline: missing tools,
//! process failures and timeouts, serialization, and extraction results that
//! callers should not silently accept.

use std::time::Duration;

use thiserror::Error;

use flag_completions_core::ValidationError;

/// Errors that can occur while generating completion items.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// One or more required executables are not on `PATH`.
    #[error("{} required on PATH", describe_missing(.0))]
    NotInstalled(Vec<String>),

    /// A process could not be started.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A process did not exit within the configured timeout.
    #[error("'{command}' timed out after {}ms", .timeout.as_millis())]
    Timeout { command: String, timeout: Duration },

    /// A process exited unsuccessfully.
    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The rendered document has no target section heading.
    #[error("section '{0}' not found in rendered markdown")]
    SectionNotFound(String),

    /// The target section exists but yielded no completion items.
    #[error("section '{0}' contains no flags")]
    NoCompletionItems(String),

    /// Extracted items failed validation.
    #[error("{} invalid completion item(s): {}", .0.len(), join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

/// Convenience alias for results with [`DiscoveryError`].
pub type Result<T> = std::result::Result<T, DiscoveryError>;

fn describe_missing(names: &[String]) -> String {
    match names {
        [one] => format!("{one} is"),
        many => format!("{} are", many.join(", ")),
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
