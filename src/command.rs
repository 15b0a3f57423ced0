//! Stub tool command lines and the factory capability that builds them.

use crate::options::StrictOptions;
use serde::Serialize;
use std::fmt;

/// One external process invocation: program followed by its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    program: String,
    args: Vec<String>,
}

impl Command {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Builds the command line that generates stubs for one module.
///
/// Implementations must be pure: the same module and options always yield the same command.
pub trait CommandFactory: Send + Sync {
    fn create(&self, module: &str, options: &StrictOptions) -> Command;
}

impl<F> CommandFactory for F
where
    F: Fn(&str, &StrictOptions) -> Command + Send + Sync,
{
    fn create(&self, module: &str, options: &StrictOptions) -> Command {
        self(module, options)
    }
}
