//! Stub generation engine
//!
//! One run: normalize options, resolve the module, dispatch the stub tool over it, prune
//! incomplete output, and relocate the result when a non-default output directory was
//! requested. Each phase starts only after the previous one has fully finished.

use crate::dispatch::{DispatchSummary, Scheduler};
use crate::error::StubgenError;
use crate::integration::Integration;
use crate::options::Options;
use crate::reconcile::{prune_targets, relocate, FileMover, FsMover, RelocationPlan};
use crate::resolver::{ModuleResolver, Resolution};
use crate::runner::ProcessRunner;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// What a successful run did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub resolution: Resolution,
    pub summary: DispatchSummary,
    /// Directories removed by the pruning pass
    pub pruned: Vec<PathBuf>,
    /// Final location of the generated subtree when it was relocated
    pub relocated_to: Option<PathBuf>,
}

/// Drives stub generation for one integration
pub struct Stubgen {
    integration: Arc<Integration>,
    resolver: Arc<dyn ModuleResolver>,
    runner: Arc<dyn ProcessRunner>,
    mover: Arc<dyn FileMover>,
}

impl Stubgen {
    pub fn new(
        integration: Integration,
        resolver: Arc<dyn ModuleResolver>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            integration: Arc::new(integration),
            resolver,
            runner,
            mover: Arc::new(FsMover),
        }
    }

    /// Replace the filesystem mover used for relocation
    pub fn with_mover(mut self, mover: Arc<dyn FileMover>) -> Self {
        self.mover = mover;
        self
    }

    pub fn integration(&self) -> &Integration {
        &self.integration
    }

    /// Generate stubs for `name`
    pub async fn run(&self, name: &str, options: Options) -> Result<RunReport, StubgenError> {
        let options = options.normalize(&self.integration)?;
        let resolution = self.resolver.resolve(name).await?;
        info!(
            module = %name,
            root = %resolution.root.display(),
            integration = %self.integration.name(),
            "Generating stubs"
        );

        let scheduler = Scheduler::new(
            Arc::clone(&self.integration),
            Arc::clone(&self.runner),
            options.clone(),
        );
        let dispatched = scheduler.dispatch(&resolution).await?;
        debug!(summary = ?dispatched.summary, "Dispatch finished");

        let targets = dispatched.targets;
        let pruned = tokio::task::spawn_blocking(move || prune_targets(targets)).await??;

        let relocated_to = if options.relocates() {
            let plan = RelocationPlan::new(&self.integration, &resolution, options.out_dir());
            let mover = Arc::clone(&self.mover);
            let target = plan.target.clone();
            tokio::task::spawn_blocking(move || relocate(&plan, mover.as_ref())).await??;
            Some(target)
        } else {
            None
        };

        Ok(RunReport {
            resolution,
            summary: dispatched.summary,
            pruned,
            relocated_to,
        })
    }
}
