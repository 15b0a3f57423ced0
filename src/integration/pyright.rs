//! pyright integration: `python -m pyright --createstub <module>`, output under `typings/`.

use super::{Integration, OutputKeying};
use crate::command::{Command, CommandFactory};
use crate::options::StrictOptions;
use std::sync::Arc;

/// Directory pyright writes stubs into, relative to the working directory
pub const DEFAULT_OUT_DIR: &str = "typings";

/// Builds pyright `--createstub` invocations
#[derive(Debug, Clone)]
pub struct PyrightFactory {
    python: String,
}

impl PyrightFactory {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }
}

impl CommandFactory for PyrightFactory {
    fn create(&self, module: &str, options: &StrictOptions) -> Command {
        let command = Command::new(&self.python).args(["-m", "pyright", "--createstub", module]);
        if options.verbose() {
            command.arg("--verbose")
        } else {
            command
        }
    }
}

/// The pyright integration using `python` to launch pyright
pub fn integration(python: &str) -> Integration {
    Integration::new("pyright", DEFAULT_OUT_DIR, Arc::new(PyrightFactory::new(python)))
        .with_keying(OutputKeying::ResolutionRootWhenTopLevel)
}
