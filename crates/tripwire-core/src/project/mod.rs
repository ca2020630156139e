//! Deployable projects and their trigger-file workflow.
//!
//! A [`Project`] is built from one configuration entry and drives a single
//! deployment attempt: pull the branch, build and publish when the language
//! needs it, then remove the trigger file and log the result.

mod language;

pub use language::Language;

use std::path::{Path, PathBuf};

use crate::config::ProjectProperties;
use crate::error::DeployError;
use crate::exec::{CommandRunner, Invocation, ProcessRunner};
use crate::report::{DeployOutcome, DeployStage, ProjectStatus};

/// Name of the trigger file checked inside each project directory.
pub const DEPLOY_FILE: &str = "deploy.txt";

/// One deployable project.
///
/// `do_build` and the project extension are computed once in the constructor.
/// The publish directory is resolved against the project directory (the
/// working directory of `dotnet publish`) and checked only at that point;
/// later changes to the filesystem do not re-enable or disable the build.
#[derive(Debug)]
pub struct Project<R = ProcessRunner> {
    name: String,
    directory: PathBuf,
    branch: String,
    language: Language,
    publish_dir: Option<PathBuf>,
    do_build: bool,
    runner: R,
}

impl Project<ProcessRunner> {
    /// Create a project that runs its commands as child processes.
    pub fn new(
        name: impl Into<String>,
        properties: &ProjectProperties,
    ) -> Result<Self, DeployError> {
        Self::with_runner(name, properties, ProcessRunner::new())
    }
}

impl<R: CommandRunner> Project<R> {
    /// Create a project with a custom command runner.
    pub fn with_runner(
        name: impl Into<String>,
        properties: &ProjectProperties,
        runner: R,
    ) -> Result<Self, DeployError> {
        let name = name.into();
        let language = Language::parse(&properties.language)?;
        let publish_dir = properties
            .publish_location
            .as_ref()
            .map(|location| properties.directory.join(location));
        let do_build = Self::resolve_do_build(&name, language, publish_dir.as_deref());

        Ok(Self {
            name,
            directory: properties.directory.clone(),
            branch: properties.branch.clone(),
            language,
            publish_dir,
            do_build,
            runner,
        })
    }

    fn resolve_do_build(name: &str, language: Language, publish_dir: Option<&Path>) -> bool {
        if !language.is_buildable() {
            return false;
        }
        match publish_dir {
            Some(dir) if dir.exists() => true,
            Some(dir) => {
                tracing::warn!(
                    "Project '{}' has an invalid publish directory '{}'",
                    name,
                    dir.display()
                );
                false
            }
            None => {
                tracing::warn!("Project '{}' has an invalid publish directory ''", name);
                false
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn publish_dir(&self) -> Option<&Path> {
        self.publish_dir.as_deref()
    }

    pub fn do_build(&self) -> bool {
        self.do_build
    }

    pub fn project_extension(&self) -> &'static str {
        self.language.project_extension()
    }

    /// Path of the trigger file for this project.
    pub fn deploy_file(&self) -> PathBuf {
        self.directory.join(DEPLOY_FILE)
    }

    /// `git pull origin <branch>`
    pub fn pull_invocation(&self) -> Invocation {
        Invocation::new("git", &self.directory).args(["pull", "origin", self.branch.as_str()])
    }

    /// `dotnet build -c Release`
    pub fn build_invocation(&self) -> Invocation {
        Invocation::new("dotnet", &self.directory).args(["build", "-c", "Release"])
    }

    /// `dotnet publish <name>.<ext> -c Release --no-build -o <publish_dir>`
    pub fn publish_invocation(&self) -> Invocation {
        let project_file = format!("{}.{}", self.name, self.project_extension());
        let publish_dir = self.publish_dir.as_deref().unwrap_or(Path::new(""));
        Invocation::new("dotnet", &self.directory)
            .arg("publish")
            .arg(project_file)
            .args(["-c", "Release", "--no-build", "-o"])
            .arg(publish_dir.as_os_str())
    }

    /// Pull the configured branch. Failures are logged and reported as `false`.
    pub fn pull(&self) -> bool {
        self.run_step(&self.pull_invocation(), "Git pull failed")
    }

    /// Build the project in release mode.
    pub fn build(&self) -> bool {
        self.run_step(&self.build_invocation(), "Build failed")
    }

    /// Publish the built project into the publish directory.
    pub fn publish(&self) -> bool {
        self.run_step(&self.publish_invocation(), "Publish failed")
    }

    fn run_step(&self, invocation: &Invocation, failure: &str) -> bool {
        match self.runner.run(invocation) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!("{}: {}", failure, err.kind());
                false
            }
        }
    }

    /// Deploy the project if its trigger file is present.
    ///
    /// Without a trigger file nothing runs and nothing is logged. Once
    /// triggered, the trigger file is removed whatever the outcome. Step
    /// failures are folded into the returned outcome; only a failure to
    /// remove the trigger file is returned as an error.
    pub fn deploy_application(&self) -> Result<DeployOutcome, DeployError> {
        let deploy_file = self.deploy_file();
        if !deploy_file.exists() {
            return Ok(DeployOutcome::Idle);
        }

        tracing::info!("Deploying application '{}'", self.name);
        let outcome = self.run_pipeline();

        std::fs::remove_file(&deploy_file).map_err(|source| DeployError::TriggerCleanup {
            path: deploy_file.clone(),
            source,
        })?;

        match outcome {
            DeployOutcome::Succeeded => {
                tracing::info!("Project '{}' deployment succeeded", self.name);
            }
            DeployOutcome::Failed { stage } => {
                tracing::warn!(stage = %stage, "Project '{}' deployment failed", self.name);
            }
            DeployOutcome::Idle => {}
        }

        Ok(outcome)
    }

    fn run_pipeline(&self) -> DeployOutcome {
        if !self.pull() {
            return DeployOutcome::Failed {
                stage: DeployStage::Pull,
            };
        }
        if !self.do_build {
            return DeployOutcome::Succeeded;
        }
        if !self.build() {
            return DeployOutcome::Failed {
                stage: DeployStage::Build,
            };
        }
        if !self.publish() {
            return DeployOutcome::Failed {
                stage: DeployStage::Publish,
            };
        }
        DeployOutcome::Succeeded
    }

    /// Current status without running anything or touching the trigger file.
    pub fn status(&self) -> ProjectStatus {
        ProjectStatus {
            name: self.name.clone(),
            directory: self.directory.clone(),
            branch: self.branch.clone(),
            language: self.language,
            do_build: self.do_build,
            trigger_pending: self.deploy_file().exists(),
        }
    }
}

#[cfg(test)]
mod tests;
