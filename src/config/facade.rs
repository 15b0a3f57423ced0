//! Config loader: assembles the layered sources into a validated `StubgenConfig`.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::StubgenConfig;
use crate::error::StubgenError;
use config::File;
use std::path::Path;

/// Loads configuration from defaults, files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, user-level file,
    /// `<workspace>/pystubgen.toml`, `PYSTUBGEN__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<StubgenConfig, StubgenError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: StubgenConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file (defaults still apply underneath).
    pub fn load_from_file(path: &Path) -> Result<StubgenConfig, StubgenError> {
        if !path.exists() {
            return Err(StubgenError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder);

        let config: StubgenConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
