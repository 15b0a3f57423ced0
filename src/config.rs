//! Configuration System
//!
//! Layered configuration for stub generation runs: built-in defaults, a user-level file,
//! a workspace file and environment overrides. CLI flags are applied on top by the caller.

use crate::error::StubgenError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Default number of stub tool processes allowed to run at once
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubgenConfig {
    /// Run defaults (overridable per invocation)
    #[serde(default)]
    pub run: RunConfig,

    /// How module names are mapped to files
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// pyright integration settings
    #[serde(default)]
    pub pyright: IntegrationConfig,

    /// mypy stubgen integration settings
    #[serde(default)]
    pub mypy: IntegrationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Run defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub ignore_error: bool,

    #[serde(default)]
    pub verbose: bool,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            ignore_error: false,
            verbose: false,
        }
    }
}

/// Resolver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolverKind {
    /// Ask the Python interpreter (`importlib.util.find_spec`)
    Interpreter,
    /// Probe search paths on disk without an interpreter
    SearchPath,
}

/// Resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_resolver_kind")]
    pub kind: ResolverKind,

    /// Interpreter used for resolution and to locate stub tools
    #[serde(default = "default_python")]
    pub python: String,

    /// Extra search paths, probed before PYTHONPATH and the current directory
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

fn default_resolver_kind() -> ResolverKind {
    ResolverKind::Interpreter
}

fn default_python() -> String {
    "python3".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: default_resolver_kind(),
            python: default_python(),
            search_paths: Vec::new(),
        }
    }
}

/// Per-integration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Requested output directory when `--out` is not given
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
}

impl StubgenConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), StubgenError> {
        let mut errors = Vec::new();

        if self.run.concurrency == 0 {
            errors.push("run.concurrency must be at least 1".to_string());
        }
        if self.resolver.python.trim().is_empty() {
            errors.push("resolver.python cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(StubgenError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }
}
