//! Core error types for peon-core.
//!
//! Almost everything in this crate fails open: unreadable config, state and
//! manifests degrade to defaults and are only logged. The errors below are the
//! few that are allowed to reach the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for peon-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// State persistence errors
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// State-file errors.
#[derive(Error, Debug)]
pub enum StateError {
    /// Failed to write the state file or create its directory
    #[error("Failed to write state to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize state
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while launching an external effect.
///
/// Adapters log these and carry on; they never abort an invocation.
#[derive(Error, Debug)]
pub enum EffectError {
    /// The helper process could not be started
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// A helper ran but produced unusable output
    #[error("'{program}' returned unusable output: {message}")]
    BadOutput { program: String, message: String },

    /// Writing to the title sink or action log failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding an action log line failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
