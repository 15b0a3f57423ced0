//! CLI parse: clap types for both binaries. No behavior; definitions only.

use crate::integration::mypy::MypyFlags;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Flags shared by every stub tool integration
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Module or package to generate stubs for (dotted name)
    #[arg(short = 'm', long)]
    pub module: String,

    /// Verbose logging; also forwarded to the stub tool
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Keep going when the stub tool exits with an error
    #[arg(long)]
    pub ignore_error: bool,

    /// Maximum number of stub tool processes running at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Output directory (default: the stub tool's own output directory)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Workspace root used to find pystubgen.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Python interpreter used for module resolution and to locate the stub tool
    #[arg(long)]
    pub python: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Generate type stubs for a module and its submodules with pyright
#[derive(Parser, Debug)]
#[command(name = "pyright-stubgen")]
#[command(about = "Generate type stubs recursively using pyright --createstub")]
pub struct PyrightCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Generate type stubs for a module and its submodules with mypy's stubgen
#[derive(Parser, Debug)]
#[command(name = "mypy-stubgen")]
#[command(about = "Generate type stubs recursively using mypy stubgen")]
pub struct MypyCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Don't perform semantic analysis of sources
    #[arg(long)]
    pub no_analysis: bool,

    /// Import and inspect modules instead of parsing source
    #[arg(long)]
    pub inspect_mode: bool,

    /// Include private definitions
    #[arg(long)]
    pub include_private: bool,

    /// Include docstrings in stubs
    #[arg(long)]
    pub include_docstrings: bool,
}

impl MypyCli {
    pub fn flags(&self) -> MypyFlags {
        MypyFlags {
            no_analysis: self.no_analysis,
            inspect_mode: self.inspect_mode,
            include_private: self.include_private,
            include_docstrings: self.include_docstrings,
        }
    }
}
