//! Passes over the configured projects.
//!
//! Projects are handled one at a time, in configuration order. Errors while
//! setting up a project (an unsupported language) or removing its trigger
//! file stop the pass; deployment step failures do not.

use anyhow::Context;

use crate::config::TripwireConfig;
use crate::exec::{CommandRunner, ProcessRunner};
use crate::project::Project;
use crate::report::{DeployReport, ProjectStatus, RunSummary};

/// Options for a deployment pass.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Restrict the pass to these project names (empty means all)
    pub projects: Vec<String>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_projects(mut self, projects: &[String]) -> Self {
        self.projects = projects.to_vec();
        self
    }

    fn includes(&self, name: &str) -> bool {
        self.projects.is_empty() || self.projects.iter().any(|p| p == name)
    }

    fn check_known(&self, config: &TripwireConfig) -> anyhow::Result<()> {
        for name in &self.projects {
            if !config.projects.contains_key(name) {
                anyhow::bail!("Unknown project: {}", name);
            }
        }
        Ok(())
    }
}

/// Deploy every triggered project using real child processes.
pub fn run_deployments(config: &TripwireConfig, options: &RunOptions) -> anyhow::Result<RunSummary> {
    run_deployments_with(config, options, &ProcessRunner::new())
}

/// Deploy every triggered project with the given command runner.
pub fn run_deployments_with<R: CommandRunner>(
    config: &TripwireConfig,
    options: &RunOptions,
    runner: &R,
) -> anyhow::Result<RunSummary> {
    options.check_known(config)?;

    let mut summary = RunSummary::new();
    for (name, properties) in &config.projects {
        if !options.includes(name) {
            continue;
        }
        let project = Project::with_runner(name.as_str(), properties, runner)
            .with_context(|| format!("Failed to set up project '{}'", name))?;
        let outcome = project
            .deploy_application()
            .with_context(|| format!("Failed to finish deployment of '{}'", name))?;
        summary.record(DeployReport::new(name.as_str(), outcome));
    }

    tracing::debug!(
        idle = summary.idle,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Deployment pass complete"
    );
    Ok(summary)
}

/// Describe every configured project without running anything.
pub fn collect_status(config: &TripwireConfig) -> anyhow::Result<Vec<ProjectStatus>> {
    config
        .projects
        .iter()
        .map(|(name, properties)| {
            Project::new(name.as_str(), properties)
                .map(|project| project.status())
                .with_context(|| format!("Failed to set up project '{}'", name))
        })
        .collect()
}
