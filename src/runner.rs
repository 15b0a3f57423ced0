//! Process runner
//!
//! Runs one stub tool invocation to completion with its output captured. `run_process` is
//! the single entry the scheduler uses: it holds a limiter permit for exactly the lifetime
//! of the process, relays the captured output to the log and applies the failure policy.

use crate::command::Command;
use crate::error::StubgenError;
use crate::options::StrictOptions;
use async_trait::async_trait;
use std::process::Stdio;
use tracing::{debug, error, info, warn};

/// Fully captured result of one process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes commands
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: &Command) -> Result<CapturedOutput, StubgenError>;
}

/// Runs commands as child processes via tokio
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &Command) -> Result<CapturedOutput, StubgenError> {
        debug!(command = %command, "Spawning stub tool");
        let output = tokio::process::Command::new(command.program())
            .args(command.get_args())
            .stdin(Stdio::null())
            // A cancelled dispatch unit must not leave its child running.
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| StubgenError::Spawn {
                program: command.program().to_string(),
                source,
            })?;

        Ok(CapturedOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// How one invocation ended, when it did not abort the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationOutcome {
    Succeeded,
    /// Failed, but `ignore_error` was set
    FailedIgnored { code: Option<i32> },
}

/// Run `command` for `module` under the options' concurrency bound.
///
/// stdout is always logged at INFO and non-empty stderr at ERROR, whatever the exit code.
/// A non-zero exit (or a spawn failure) is an error unless `ignore_error` is set.
pub async fn run_process(
    runner: &dyn ProcessRunner,
    module: &str,
    command: &Command,
    options: &StrictOptions,
) -> Result<InvocationOutcome, StubgenError> {
    let result = {
        let _permit = options.limiter().acquire().await?;
        runner.run(command).await
    };

    let captured = match result {
        Ok(captured) => captured,
        Err(err @ StubgenError::Spawn { .. }) if options.ignore_error() => {
            error!(module = %module, error = %err, "Stub tool could not be started");
            return Ok(InvocationOutcome::FailedIgnored { code: None });
        }
        Err(err) => return Err(err),
    };

    info!(module = %module, "{}", String::from_utf8_lossy(&captured.stdout).trim_end());
    if !captured.stderr.is_empty() {
        error!(module = %module, "{}", String::from_utf8_lossy(&captured.stderr).trim_end());
    }

    if captured.success() {
        return Ok(InvocationOutcome::Succeeded);
    }

    if options.ignore_error() {
        warn!(module = %module, code = ?captured.code, "Stub generation failed, continuing");
        return Ok(InvocationOutcome::FailedIgnored {
            code: captured.code,
        });
    }

    Err(StubgenError::ProcessFailed {
        module: module.to_string(),
        command: command.to_string(),
        code: captured.code,
    })
}
