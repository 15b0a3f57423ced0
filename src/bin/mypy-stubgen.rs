//! mypy-stubgen binary
//!
//! Generates stubs for a module and all its submodules with mypy's `stubgen`.

use clap::Parser;
use pystubgen::cli::{run_main, MypyCli};
use pystubgen::integration::mypy;
use std::process;

fn main() {
    let cli = MypyCli::parse();
    let flags = cli.flags();
    let code = run_main(cli.common, |python| mypy::integration(python, flags));
    process::exit(code);
}
