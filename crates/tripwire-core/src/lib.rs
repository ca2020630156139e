//! Tripwire Core Library
//!
//! Polls configured projects for a `deploy.txt` trigger file and, when one is
//! present, pulls the project's branch, builds and publishes it if its
//! language needs that, then removes the trigger and logs the outcome.

pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod project;
pub mod report;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, LoggingConfig, ProjectProperties, TripwireConfig};

    // Workflow
    pub use crate::commands::{RunOptions, collect_status, run_deployments};
    pub use crate::project::{DEPLOY_FILE, Language, Project};

    // Execution
    pub use crate::exec::{CommandRunner, Invocation, ProcessRunner};

    // Errors and reports
    pub use crate::error::{CommandError, DeployError};
    pub use crate::report::{DeployOutcome, DeployReport, DeployStage, ProjectStatus, RunSummary};
}
