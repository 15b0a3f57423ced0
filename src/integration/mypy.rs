//! mypy integration: the `stubgen` executable installed next to the interpreter,
//! output under `out/`.

use super::Integration;
use crate::command::{Command, CommandFactory};
use crate::options::StrictOptions;
use std::path::Path;
use std::sync::Arc;

/// Directory mypy's stubgen writes stubs into, relative to the working directory
pub const DEFAULT_OUT_DIR: &str = "out";

/// Passthrough flags forwarded verbatim to `stubgen`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MypyFlags {
    pub no_analysis: bool,
    pub inspect_mode: bool,
    pub include_private: bool,
    pub include_docstrings: bool,
}

/// Builds `stubgen -m <module>` invocations
#[derive(Debug, Clone)]
pub struct MypyFactory {
    stubgen: String,
    flags: MypyFlags,
}

impl MypyFactory {
    pub fn new(python: &str, flags: MypyFlags) -> Self {
        Self {
            stubgen: stubgen_path(python),
            flags,
        }
    }

    pub fn stubgen(&self) -> &str {
        &self.stubgen
    }
}

/// `stubgen` lives beside the interpreter; a bare interpreter name means look it up on PATH
fn stubgen_path(python: &str) -> String {
    let python = Path::new(python);
    match python.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            dir.join("stubgen").to_string_lossy().into_owned()
        }
        _ => "stubgen".to_string(),
    }
}

impl CommandFactory for MypyFactory {
    fn create(&self, module: &str, options: &StrictOptions) -> Command {
        let mut args = vec!["-m".to_string(), module.to_string()];
        if self.flags.no_analysis {
            args.push("--no-analysis".to_string());
        }
        if self.flags.inspect_mode {
            args.push("--inspect-mode".to_string());
        }
        if self.flags.include_private {
            args.push("--include-private".to_string());
        }
        if self.flags.include_docstrings {
            args.push("--include-docstrings".to_string());
        }
        if options.verbose() {
            args.push("--verbose".to_string());
        }
        Command::new(&self.stubgen).args(args)
    }
}

/// The mypy integration for the interpreter at `python`
pub fn integration(python: &str, flags: MypyFlags) -> Integration {
    Integration::new("mypy", DEFAULT_OUT_DIR, Arc::new(MypyFactory::new(python, flags)))
}
