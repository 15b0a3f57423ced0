//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::StubgenError;

/// Map domain errors to a diagnostic line for CLI output.
pub fn map_error(e: &StubgenError) -> String {
    match e {
        StubgenError::ModuleNotFound(name) => format!(
            "error: module '{}' not found (is it importable by the configured interpreter?)",
            name
        ),
        StubgenError::ProcessFailed { module, code, .. } => format!(
            "error: stub generation for '{}' failed (exit code {}); rerun with --ignore-error to continue past failures",
            module,
            code.map_or_else(|| "none".to_string(), |c| c.to_string())
        ),
        other => format!("error: {}", other),
    }
}

/// Process exit code for a failed run
pub fn exit_code(e: &StubgenError) -> i32 {
    match e {
        StubgenError::ModuleNotFound(_) => 2,
        StubgenError::ProcessFailed { .. } => 3,
        StubgenError::RelocationFailed { .. } | StubgenError::BackupNotRemoved { .. } => 4,
        StubgenError::ConfigError(_) => 5,
        _ => 1,
    }
}
