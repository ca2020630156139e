//! Error types for project construction and command execution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up a project for deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The configured language has no known project file type.
    #[error("Project language {language} not supported")]
    UnsupportedLanguage {
        /// Language value as written in the configuration.
        language: String,
    },

    /// The trigger file was present but could not be removed.
    #[error("failed to remove trigger file: {}", .path.display())]
    TriggerCleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started (missing executable, bad working directory).
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but did not exit successfully.
    #[error("{program} exited with {}", describe_exit(.code))]
    ExitStatus {
        program: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
    },
}

impl CommandError {
    /// Short name of the failure, used in log lines instead of the full message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Spawn { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => "NotFound",
                std::io::ErrorKind::PermissionDenied => "PermissionDenied",
                _ => "SpawnError",
            },
            Self::ExitStatus { .. } => "ExitStatus",
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
