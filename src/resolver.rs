//! Module resolution
//!
//! Maps a dotted module name to the file or package directory it is imported from. The
//! engine only consumes the `ModuleResolver` capability; two implementations are provided.

use crate::error::StubgenError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const INIT_FILE: &str = "__init__.py";

/// Where a module name was found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Requested name, possibly dotted
    pub name: String,
    /// Top-level package: the requested name up to the first dot
    pub package: String,
    /// Import origin (a source file)
    pub origin: PathBuf,
    /// Directory to enumerate for a package, the origin itself for a plain module
    pub root: PathBuf,
}

impl Resolution {
    pub fn from_origin(name: &str, origin: PathBuf) -> Self {
        let root = match (origin.file_name(), origin.parent()) {
            (Some(file_name), Some(parent)) if file_name == INIT_FILE => parent.to_path_buf(),
            _ => origin.clone(),
        };
        Self {
            name: name.to_string(),
            package: package_name(name).to_string(),
            origin,
            root,
        }
    }

    /// Whether the root is a package directory rather than a single module file
    pub fn is_package(&self) -> bool {
        self.root != self.origin
    }
}

/// Top-level package of a dotted name
pub fn package_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

fn validate_name(name: &str) -> Result<(), StubgenError> {
    if name.is_empty() || name.split('.').any(str::is_empty) {
        return Err(StubgenError::ModuleNotFound(name.to_string()));
    }
    Ok(())
}

/// Resolves module names to their on-disk origin
#[async_trait]
pub trait ModuleResolver: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<Resolution, StubgenError>;
}

/// Asks a Python interpreter where a module would be imported from
#[derive(Debug, Clone)]
pub struct InterpreterResolver {
    python: String,
}

const FIND_SPEC_SCRIPT: &str = "\
import sys
from importlib.util import find_spec
name = sys.argv[1]
spec = find_spec(name, name.split('.', 1)[0])
print(spec.origin if spec is not None and spec.origin else '')
";

impl InterpreterResolver {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

#[async_trait]
impl ModuleResolver for InterpreterResolver {
    async fn resolve(&self, name: &str) -> Result<Resolution, StubgenError> {
        validate_name(name)?;

        let output = tokio::process::Command::new(&self.python)
            .args(["-c", FIND_SPEC_SCRIPT, name])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| StubgenError::Spawn {
                program: self.python.clone(),
                source,
            })?;

        if !output.status.success() {
            debug!(
                module = %name,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "find_spec raised"
            );
            return Err(StubgenError::ModuleNotFound(name.to_string()));
        }

        let origin = String::from_utf8_lossy(&output.stdout).trim().to_string();
        // Builtin and frozen modules have no file to generate stubs from.
        if origin.is_empty() || origin == "built-in" || origin == "frozen" {
            return Err(StubgenError::ModuleNotFound(name.to_string()));
        }

        let origin = PathBuf::from(origin);
        let origin = dunce::canonicalize(&origin).unwrap_or(origin);
        debug!(module = %name, origin = %origin.display(), "Resolved module");
        Ok(Resolution::from_origin(name, origin))
    }
}

/// Probes a list of directories the way the import system's path finder does,
/// without running an interpreter
#[derive(Debug, Clone)]
pub struct SearchPathResolver {
    search_paths: Vec<PathBuf>,
}

impl SearchPathResolver {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// `extra` first, then `PYTHONPATH`, then the current directory
    pub fn from_environment(extra: &[PathBuf]) -> Self {
        let mut search_paths = extra.to_vec();
        if let Some(python_path) = std::env::var_os("PYTHONPATH") {
            search_paths.extend(std::env::split_paths(&python_path).filter(|p| !p.as_os_str().is_empty()));
        }
        search_paths.push(PathBuf::from("."));
        Self { search_paths }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    async fn probe(dir: &Path, segments: &[&str]) -> Option<PathBuf> {
        let (last, parents) = segments.split_last()?;
        let mut base = dir.to_path_buf();
        for segment in parents {
            base.push(segment);
        }

        let package_init = base.join(last).join(INIT_FILE);
        if is_file(&package_init).await {
            return Some(package_init);
        }

        let module_file = base.join(format!("{}.py", last));
        if is_file(&module_file).await {
            return Some(module_file);
        }

        None
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[async_trait]
impl ModuleResolver for SearchPathResolver {
    async fn resolve(&self, name: &str) -> Result<Resolution, StubgenError> {
        validate_name(name)?;
        let segments: Vec<&str> = name.split('.').collect();

        for dir in &self.search_paths {
            if let Some(origin) = Self::probe(dir, &segments).await {
                let origin = dunce::canonicalize(&origin).unwrap_or(origin);
                debug!(module = %name, origin = %origin.display(), "Resolved module");
                return Ok(Resolution::from_origin(name, origin));
            }
        }

        Err(StubgenError::ModuleNotFound(name.to_string()))
    }
}
