//! Command runners.

use std::process::Command;

use crate::error::CommandError;

use super::Invocation;

/// Executes invocations on behalf of a project workflow.
pub trait CommandRunner {
    /// Run the invocation to completion.
    fn run(&self, invocation: &Invocation) -> Result<(), CommandError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        (**self).run(invocation)
    }
}

/// Runs invocations as child processes.
///
/// Output streams are inherited so tool output lands next to the log. Calls
/// block until the child exits; there is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        tracing::debug!(
            cwd = %invocation.cwd.display(),
            "Running {}",
            invocation
        );

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|source| CommandError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(CommandError::ExitStatus {
                program: invocation.program.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
