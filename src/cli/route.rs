//! CLI route: run context built from flags and configuration, and the shared entry point
//! both binaries call.

use crate::cli::output::{exit_code, map_error};
use crate::cli::parse::CommonArgs;
use crate::cli::presentation::{format_report_json, format_report_text};
use crate::config::{ConfigLoader, IntegrationConfig, ResolverKind, StubgenConfig};
use crate::engine::{RunReport, Stubgen};
use crate::error::StubgenError;
use crate::integration::Integration;
use crate::logging::{init_logging, LoggingConfig};
use crate::options::Options;
use crate::resolver::{InterpreterResolver, ModuleResolver, SearchPathResolver};
use crate::runner::TokioProcessRunner;
use std::sync::Arc;
use tracing::{error, info};

/// Runtime context for CLI execution: parsed flags layered over loaded configuration.
pub struct RunContext {
    args: CommonArgs,
    config: StubgenConfig,
}

impl RunContext {
    /// Load configuration (explicit file, or workspace discovery) for the given flags.
    pub fn new(args: CommonArgs) -> Result<Self, StubgenError> {
        let config = if let Some(ref path) = args.config {
            ConfigLoader::load_from_file(path)?
        } else {
            ConfigLoader::load(&args.workspace)?
        };
        Ok(Self { args, config })
    }

    pub fn from_parts(args: CommonArgs, config: StubgenConfig) -> Self {
        Self { args, config }
    }

    pub fn args(&self) -> &CommonArgs {
        &self.args
    }

    /// Logging configuration with CLI flags applied over the config file.
    pub fn logging_config(&self) -> LoggingConfig {
        let mut config = self.config.logging.clone();
        if self.args.verbose || self.config.run.verbose {
            config.level = "debug".to_string();
        }
        if let Some(ref level) = self.args.log_level {
            config.level = level.clone();
        }
        if let Some(ref format) = self.args.log_format {
            config.format = format.clone();
        }
        config
    }

    /// Interpreter from `--python`, else configuration
    pub fn python(&self) -> &str {
        self.args
            .python
            .as_deref()
            .unwrap_or(&self.config.resolver.python)
    }

    pub fn resolver(&self) -> Arc<dyn ModuleResolver> {
        match self.config.resolver.kind {
            ResolverKind::Interpreter => Arc::new(InterpreterResolver::new(self.python())),
            ResolverKind::SearchPath => Arc::new(SearchPathResolver::from_environment(
                &self.config.resolver.search_paths,
            )),
        }
    }

    fn integration_config(&self, integration: &Integration) -> IntegrationConfig {
        match integration.name() {
            "mypy" => self.config.mypy.clone(),
            "pyright" => self.config.pyright.clone(),
            _ => IntegrationConfig::default(),
        }
    }

    /// Run options: CLI flags over the configured run defaults.
    pub fn options(&self, integration: &Integration) -> Options {
        let mut options = Options::from_run_config(&self.config.run)
            .ignore_error(self.args.ignore_error || self.config.run.ignore_error)
            .verbose(self.args.verbose || self.config.run.verbose);
        if let Some(limit) = self.args.concurrency {
            options = options.concurrency(limit);
        }
        let out_dir = self
            .args
            .out
            .clone()
            .or_else(|| self.integration_config(integration).out_dir);
        if let Some(out_dir) = out_dir {
            options = options.out_dir(out_dir);
        }
        options
    }

    /// Generate stubs for the requested module with `integration`.
    pub async fn execute(&self, integration: Integration) -> Result<RunReport, StubgenError> {
        let options = self.options(&integration);
        let engine = Stubgen::new(integration, self.resolver(), Arc::new(TokioProcessRunner));
        engine.run(&self.args.module, options).await
    }
}

/// Shared binary entry point; returns the process exit code.
///
/// `build` receives the configured interpreter and returns the integration to run.
pub fn run_main(args: CommonArgs, build: impl FnOnce(&str) -> Integration) -> i32 {
    let context = match RunContext::new(args) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            return exit_code(&e);
        }
    };

    if let Err(e) = init_logging(Some(&context.logging_config())) {
        eprintln!("{}", map_error(&e));
        return exit_code(&e);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let e = StubgenError::from(e);
            eprintln!("{}", map_error(&e));
            return exit_code(&e);
        }
    };

    let integration = build(context.python());
    info!(integration = %integration.name(), module = %context.args().module, "Starting");

    match runtime.block_on(context.execute(integration)) {
        Ok(report) => {
            let rendered = if context.args().json {
                format_report_json(&report)
            } else {
                Ok(format_report_text(&report))
            };
            match rendered {
                Ok(text) => {
                    println!("{}", text);
                    0
                }
                Err(e) => {
                    eprintln!("{}", map_error(&e));
                    exit_code(&e)
                }
            }
        }
        Err(e) => {
            error!(error = %e, "Stub generation failed");
            eprintln!("{}", map_error(&e));
            exit_code(&e)
        }
    }
}
