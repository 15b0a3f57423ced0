//! CLI domain: parse, route, output and presentation only.
//! The binaries are thin wrappers around `run_main`.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::{exit_code, map_error};
pub use parse::{CommonArgs, MypyCli, PyrightCli};
pub use presentation::{format_report_json, format_report_text};
pub use route::{run_main, RunContext};
