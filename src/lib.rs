//! pystubgen: recursive type-stub generation
//!
//! Drives an external stub tool (pyright, mypy's stubgen) over every file of a Python
//! module concurrently, prunes the incomplete output some tools leave behind, and moves
//! the generated tree to the requested output directory.

pub mod cli;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod integration;
pub mod logging;
pub mod options;
pub mod reconcile;
pub mod resolver;
pub mod runner;

pub use engine::{RunReport, Stubgen};
pub use error::StubgenError;
pub use options::{Concurrency, ConcurrencyLimiter, Options, StrictOptions};
