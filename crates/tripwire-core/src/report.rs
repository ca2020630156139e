//! Deployment outcomes and project status records.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::project::Language;

/// Step of the deployment pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    Pull,
    Build,
    Publish,
}

impl fmt::Display for DeployStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pull => write!(f, "pull"),
            Self::Build => write!(f, "build"),
            Self::Publish => write!(f, "publish"),
        }
    }
}

/// Result of one deployment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeployOutcome {
    /// No trigger file, nothing was done
    Idle,
    Succeeded,
    /// Stopped at the first failing step
    Failed { stage: DeployStage },
}

impl DeployOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployReport {
    pub project: String,
    pub outcome: DeployOutcome,
    pub finished_at: DateTime<Utc>,
}

impl DeployReport {
    pub fn new(project: impl Into<String>, outcome: DeployOutcome) -> Self {
        Self {
            project: project.into(),
            outcome,
            finished_at: Utc::now(),
        }
    }
}

/// Aggregate of one pass over all configured projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub reports: Vec<DeployReport>,
    pub idle: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: DeployReport) {
        match report.outcome {
            DeployOutcome::Idle => self.idle += 1,
            DeployOutcome::Succeeded => self.succeeded += 1,
            DeployOutcome::Failed { .. } => self.failed += 1,
        }
        self.reports.push(report);
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Read-only view of a project, as reported by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectStatus {
    pub name: String,
    pub directory: PathBuf,
    pub branch: String,
    pub language: Language,
    pub do_build: bool,
    pub trigger_pending: bool,
}
