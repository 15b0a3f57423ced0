//! pyright-stubgen binary
//!
//! Generates stubs for a module and all its submodules with `pyright --createstub`.

use clap::Parser;
use pystubgen::cli::{run_main, PyrightCli};
use pystubgen::integration::pyright;
use std::process;

fn main() {
    let cli = PyrightCli::parse();
    let code = run_main(cli.common, pyright::integration);
    process::exit(code);
}
