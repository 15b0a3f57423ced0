//! Error types for the stub generation engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a stub generation run
#[derive(Debug, Error)]
pub enum StubgenError {
    #[error("Module '{0}' not found")]
    ModuleNotFound(String),

    #[error("Stub generation for '{module}' failed with exit code {code:?}: {command}")]
    ProcessFailed {
        module: String,
        command: String,
        code: Option<i32>,
    },

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to relocate {origin:?} to {target:?}: {source}")]
    RelocationFailed {
        origin: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Relocated to {target:?} but failed to remove backup {backup:?}: {source}")]
    BackupNotRemoved {
        backup: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dispatch task failed: {0}")]
    TaskFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for StubgenError {
    fn from(err: config::ConfigError) -> Self {
        StubgenError::ConfigError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for StubgenError {
    fn from(err: tokio::task::JoinError) -> Self {
        StubgenError::TaskFailed(err.to_string())
    }
}
