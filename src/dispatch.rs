//! Discovery and dispatch
//!
//! Walks the resolution root for source (`.py`) and stub (`.pyi`) files and fans out one
//! dispatch unit per file on a `JoinSet`. Every unit first records where its stub is
//! expected (a `PendingTarget`), then either skips because the stub already exists or runs
//! the stub tool for the file's module. The whole requested module is always generated
//! once before the fan-out starts.
//!
//! The first fatal unit error aborts every sibling still in flight; the set is then drained
//! so each unit is accounted for as completed or cancelled before the error is returned.

use crate::error::StubgenError;
use crate::integration::Integration;
use crate::options::StrictOptions;
use crate::resolver::Resolution;
use crate::runner::{run_process, InvocationOutcome, ProcessRunner};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Implementation sources, then already materialized stubs
const DISCOVERY_EXTENSIONS: [&str; 2] = ["py", "pyi"];

/// Expected output location for one discovered file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTarget {
    /// Discovered source or stub file
    pub source: PathBuf,
    /// Output path without extension: the stub is `<path>.pyi`, a package is `<path>/`
    pub path: PathBuf,
}

impl PendingTarget {
    pub fn stub_path(&self) -> PathBuf {
        self.path.with_extension("pyi")
    }
}

/// Counters for one dispatch pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Files found under the resolution root
    pub discovered: usize,
    /// Stub tool processes that ran, including the whole-module one
    pub invoked: usize,
    /// Files whose stub already existed
    pub skipped: usize,
    /// Invocations that failed while `ignore_error` was set
    pub failed_ignored: usize,
}

/// Result of a completed dispatch pass
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub summary: DispatchSummary,
    /// One entry per discovered file, in enqueue order
    pub targets: Vec<PendingTarget>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitOutcome {
    Invoked(InvocationOutcome),
    Skipped,
}

struct DispatchContext {
    integration: Arc<Integration>,
    runner: Arc<dyn ProcessRunner>,
    options: StrictOptions,
}

impl DispatchContext {
    async fn invoke(&self, module: &str) -> Result<InvocationOutcome, StubgenError> {
        let command = self.integration.command(module, &self.options);
        run_process(self.runner.as_ref(), module, &command, &self.options).await
    }
}

/// Schedules stub tool invocations for a resolved module
pub struct Scheduler {
    context: Arc<DispatchContext>,
}

impl Scheduler {
    pub fn new(
        integration: Arc<Integration>,
        runner: Arc<dyn ProcessRunner>,
        options: StrictOptions,
    ) -> Self {
        Self {
            context: Arc::new(DispatchContext {
                integration,
                runner,
                options,
            }),
        }
    }

    /// Generate stubs for the whole module, then for every file below its root.
    ///
    /// Returns once every dispatch unit has finished.
    pub async fn dispatch(&self, resolution: &Resolution) -> Result<Dispatched, StubgenError> {
        let mut summary = DispatchSummary::default();

        let outcome = self.context.invoke(&resolution.name).await?;
        record_invocation(&mut summary, outcome);

        let root = dunce::canonicalize(&resolution.root)?;
        let files = discover(&root)?;
        summary.discovered = files.len();
        debug!(root = %root.display(), files = files.len(), "Discovered files");

        let root = Arc::new(root);
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut units = JoinSet::new();
        for path in files {
            let context = Arc::clone(&self.context);
            let root = Arc::clone(&root);
            let sender = sender.clone();
            units.spawn(async move { run_unit(&context, path, &root, &sender).await });
        }
        drop(sender);

        let mut first_error: Option<StubgenError> = None;
        let mut completed = 0usize;
        let mut cancelled = 0usize;
        while let Some(joined) = units.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(join_error) if join_error.is_cancelled() => {
                    cancelled += 1;
                    continue;
                }
                Err(join_error) => Err(StubgenError::from(join_error)),
            };

            match result {
                Ok(UnitOutcome::Skipped) => {
                    completed += 1;
                    summary.skipped += 1;
                }
                Ok(UnitOutcome::Invoked(outcome)) => {
                    completed += 1;
                    record_invocation(&mut summary, outcome);
                }
                Err(err) if first_error.is_none() => {
                    units.abort_all();
                    first_error = Some(err);
                }
                Err(err) => {
                    completed += 1;
                    debug!(error = %err, "Sibling failure after abort");
                }
            }
        }

        if let Some(err) = first_error {
            warn!(completed, cancelled, "Dispatch aborted");
            return Err(err);
        }

        let mut targets = Vec::with_capacity(summary.discovered);
        while let Some(target) = receiver.recv().await {
            targets.push(target);
        }

        Ok(Dispatched { summary, targets })
    }
}

fn record_invocation(summary: &mut DispatchSummary, outcome: InvocationOutcome) {
    summary.invoked += 1;
    if let InvocationOutcome::FailedIgnored { .. } = outcome {
        summary.failed_ignored += 1;
    }
}

async fn run_unit(
    context: &DispatchContext,
    path: PathBuf,
    root: &Path,
    sender: &mpsc::UnboundedSender<PendingTarget>,
) -> Result<UnitOutcome, StubgenError> {
    let target = PendingTarget {
        path: expected_target(context.integration.default_out_dir(), &path, root)?,
        source: path,
    };
    let stub = target.stub_path();
    let module = module_path(&target.source, root)?;
    // The pruning pass must see this path even if the unit skips or fails below.
    let _ = sender.send(target);

    let exists = match tokio::fs::try_exists(&stub).await {
        Ok(exists) => exists,
        Err(e) => {
            warn!(stub = %stub.display(), error = %e, "Cannot check for existing stub, regenerating");
            false
        }
    };
    if exists {
        info!(stub = %stub.display(), "Already generated stub");
        return Ok(UnitOutcome::Skipped);
    }

    context.invoke(&module).await.map(UnitOutcome::Invoked)
}

/// Every `.py` file under `root`, then every `.pyi` file, each pass sorted by path.
///
/// A root that is a single module file has nothing below it. Symlinked files are
/// included; symlinked directories are not descended into.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, StubgenError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for extension in DISCOVERY_EXTENSIONS {
        let mut pass = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(|e| {
                StubgenError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk {}: {}", root.display(), e),
                ))
            })?;
            // `Path::is_file` follows a symlinked module to its file.
            if entry.path().extension() == Some(OsStr::new(extension)) && entry.path().is_file() {
                pass.push(entry.into_path());
            }
        }
        pass.sort();
        files.extend(pass);
    }
    Ok(files)
}

fn relative_to_root_parent<'a>(path: &'a Path, root: &Path) -> Result<&'a Path, StubgenError> {
    let base = root.parent().unwrap_or(root);
    path.strip_prefix(base).map_err(|_| {
        StubgenError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not below {}", path.display(), base.display()),
        ))
    })
}

/// Dotted module name of `path`, relative to the parent of `root`
pub fn module_path(path: &Path, root: &Path) -> Result<String, StubgenError> {
    let relative = relative_to_root_parent(path, root)?.with_extension("");
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Ok(segments.join("."))
}

/// Where the integration's tool writes the stub for `path`, without extension
pub fn expected_target(default_out_dir: &Path, path: &Path, root: &Path) -> Result<PathBuf, StubgenError> {
    let relative = relative_to_root_parent(path, root)?;
    Ok(default_out_dir.join(relative).with_extension(""))
}
