//! Stub tool integrations
//!
//! An integration bundles what differs between stub tools: where the tool writes its
//! output by default, how its command line is built, and how the generated subtree is
//! keyed when it is relocated.

pub mod mypy;
pub mod pyright;

use crate::command::{Command, CommandFactory};
use crate::options::StrictOptions;
use crate::resolver::Resolution;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How the generated subtree is named under the default and requested output roots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKeying {
    /// Always `<root>/<package>`
    Package,
    /// `<root>/<file name of the resolution root>` when the requested name is the
    /// top-level package itself, `<root>/<package>` otherwise
    ResolutionRootWhenTopLevel,
}

/// One stub tool integration
#[derive(Clone)]
pub struct Integration {
    name: String,
    default_out_dir: PathBuf,
    factory: Arc<dyn CommandFactory>,
    keying: OutputKeying,
}

impl Integration {
    pub fn new(
        name: impl Into<String>,
        default_out_dir: impl Into<PathBuf>,
        factory: Arc<dyn CommandFactory>,
    ) -> Self {
        Self {
            name: name.into(),
            default_out_dir: default_out_dir.into(),
            factory,
            keying: OutputKeying::Package,
        }
    }

    pub fn with_keying(mut self, keying: OutputKeying) -> Self {
        self.keying = keying;
        self
    }

    /// Point the tool's default output root elsewhere (the tool must agree)
    pub fn with_default_out_dir(mut self, default_out_dir: impl Into<PathBuf>) -> Self {
        self.default_out_dir = default_out_dir.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_out_dir(&self) -> &Path {
        &self.default_out_dir
    }

    pub fn keying(&self) -> OutputKeying {
        self.keying
    }

    /// Build the command generating stubs for `module`
    pub fn command(&self, module: &str, options: &StrictOptions) -> Command {
        self.factory.create(module, options)
    }

    /// Directory name the generated subtree lives under, below either output root
    pub fn output_key(&self, resolution: &Resolution) -> OsString {
        match self.keying {
            OutputKeying::ResolutionRootWhenTopLevel if resolution.name == resolution.package => {
                resolution
                    .root
                    .file_name()
                    .map(|name| name.to_os_string())
                    .unwrap_or_else(|| OsString::from(&resolution.package))
            }
            _ => OsString::from(&resolution.package),
        }
    }
}

impl fmt::Debug for Integration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integration")
            .field("name", &self.name)
            .field("default_out_dir", &self.default_out_dir)
            .field("keying", &self.keying)
            .finish_non_exhaustive()
    }
}
