//! Run options
//!
//! `Options` is what callers build: every field optional. `Options::normalize` turns it into
//! `StrictOptions`, the immutable value the engine works with for the whole run. The
//! concurrency bound becomes a shared `ConcurrencyLimiter` during normalization, so a
//! caller may also hand in an existing limiter to share one bound across several runs.

use crate::config::{RunConfig, DEFAULT_CONCURRENCY};
use crate::error::StubgenError;
use crate::integration::Integration;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Counting permit bounding the number of stub tool processes running at once
#[derive(Debug, Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyLimiter {
    /// Create a limiter allowing `capacity` concurrent holders
    pub fn new(capacity: usize) -> Result<Self, StubgenError> {
        if capacity == 0 {
            return Err(StubgenError::ConfigError(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        })
    }

    /// Wait for a permit. The permit is released when dropped.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, StubgenError> {
        self.semaphore
            .acquire()
            .await
            .map_err(|_| StubgenError::TaskFailed("concurrency limiter closed".to_string()))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Concurrency bound as supplied by a caller
#[derive(Debug, Clone)]
pub enum Concurrency {
    /// Build a fresh limiter of this size
    Limit(usize),
    /// Use an existing limiter
    Shared(ConcurrencyLimiter),
}

impl From<usize> for Concurrency {
    fn from(limit: usize) -> Self {
        Concurrency::Limit(limit)
    }
}

impl From<ConcurrencyLimiter> for Concurrency {
    fn from(limiter: ConcurrencyLimiter) -> Self {
        Concurrency::Shared(limiter)
    }
}

/// Caller-supplied, partial run options
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub ignore_error: Option<bool>,
    pub verbose: Option<bool>,
    pub concurrency: Option<Concurrency>,
    pub out_dir: Option<PathBuf>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed options from configured run defaults
    pub fn from_run_config(run: &RunConfig) -> Self {
        Self {
            ignore_error: Some(run.ignore_error),
            verbose: Some(run.verbose),
            concurrency: Some(Concurrency::Limit(run.concurrency)),
            out_dir: None,
        }
    }

    pub fn ignore_error(mut self, ignore_error: bool) -> Self {
        self.ignore_error = Some(ignore_error);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn concurrency(mut self, concurrency: impl Into<Concurrency>) -> Self {
        self.concurrency = Some(concurrency.into());
        self
    }

    pub fn out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(out_dir.into());
        self
    }

    /// Fill defaults for `integration` and build the immutable run configuration
    pub fn normalize(self, integration: &Integration) -> Result<StrictOptions, StubgenError> {
        let limiter = match self
            .concurrency
            .unwrap_or(Concurrency::Limit(DEFAULT_CONCURRENCY))
        {
            Concurrency::Limit(limit) => ConcurrencyLimiter::new(limit)?,
            Concurrency::Shared(limiter) => limiter,
        };

        Ok(StrictOptions {
            ignore_error: self.ignore_error.unwrap_or(false),
            verbose: self.verbose.unwrap_or(false),
            limiter,
            out_dir: self
                .out_dir
                .unwrap_or_else(|| integration.default_out_dir().to_path_buf()),
            default_out_dir: integration.default_out_dir().to_path_buf(),
        })
    }
}

/// Normalized options, fixed for the duration of one run
#[derive(Debug, Clone)]
pub struct StrictOptions {
    ignore_error: bool,
    verbose: bool,
    limiter: ConcurrencyLimiter,
    out_dir: PathBuf,
    default_out_dir: PathBuf,
}

impl StrictOptions {
    pub fn ignore_error(&self) -> bool {
        self.ignore_error
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Requested output directory
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Whether the generated tree must be moved out of the integration's default root
    pub fn relocates(&self) -> bool {
        !same_location(&self.out_dir, &self.default_out_dir)
    }
}

/// Absolute form of `path` with `.` dropped and `..` folded lexically; nothing is read
/// from disk, so the path need not exist yet.
pub fn absolute_location(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut location = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !location.pop() {
                    location.push(component);
                }
            }
            other => location.push(other),
        }
    }
    location
}

/// Whether two paths name the same location (`./typings` and `typings` do)
pub fn same_location(a: &Path, b: &Path) -> bool {
    a == b || absolute_location(a) == absolute_location(b)
}
