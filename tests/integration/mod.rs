//! Integration tests for the stub generation engine

mod relocation;
mod scheduler;
