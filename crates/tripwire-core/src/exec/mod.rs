//! Process boundary for deployment commands.
//!
//! Commands are described as an [`Invocation`] (program, argument list and
//! working directory) and handed to a [`CommandRunner`]. Nothing is routed
//! through a shell, and the process working directory is never changed.

mod runner;

pub use runner::{CommandRunner, ProcessRunner};

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single external command with its execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments passed verbatim, one per element
    pub args: Vec<OsString>,
    /// Working directory for the child process
    pub cwd: PathBuf,
}

impl Invocation {
    /// Create an invocation of `program` running in `cwd`.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
