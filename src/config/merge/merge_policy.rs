//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("run.concurrency", crate::config::DEFAULT_CONCURRENCY as i64)?
        .set_default("run.ignore_error", false)?
        .set_default("run.verbose", false)?
        .set_default("resolver.kind", "interpreter")?
        .set_default("resolver.python", "python3")
}
