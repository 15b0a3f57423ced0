//! Output reconciliation: runs after every dispatch unit has finished.
//!
//! First the pending targets are pruned of directories the stub tool left without any
//! stub inside, then, if the caller asked for a different output directory, the generated
//! subtree is moved there with backup and rollback.

pub mod prune;
pub mod relocate;

pub use prune::{prune_empty_dirs, prune_targets};
pub use relocate::{backup_path, relocate, FileMover, FsMover, RelocationPlan};
