//! Tests for the project workflow.

use super::*;
use crate::error::CommandError;
use std::cell::RefCell;
use std::io;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Records every invocation and fails the first one whose subcommand matches.
#[derive(Debug, Default)]
struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    fail_on: Option<&'static str>,
}

impl RecordingRunner {
    fn failing_on(subcommand: &'static str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(subcommand),
        }
    }

    fn subcommands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|inv| format!("{} {}", inv.program, inv.args[0].to_string_lossy()))
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
        self.calls.borrow_mut().push(invocation.clone());
        let subcommand = invocation.args[0].to_string_lossy();
        if self.fail_on == Some(subcommand.as_ref()) {
            return Err(CommandError::ExitStatus {
                program: invocation.program.clone(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber capturing log output as plain text.
fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

struct Fixture {
    _temp: TempDir,
    repo: PathBuf,
    publish: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let repo = temp.path().join("svc");
        let publish = temp.path().join("publish");
        std::fs::create_dir_all(&repo).expect("Failed to create repo dir");
        std::fs::create_dir_all(&publish).expect("Failed to create publish dir");
        Self {
            _temp: temp,
            repo,
            publish,
        }
    }

    fn properties(&self, language: &str) -> ProjectProperties {
        ProjectProperties::new(&self.repo, "main", language).with_publish_location(&self.publish)
    }

    fn trigger(&self) {
        std::fs::write(self.repo.join(DEPLOY_FILE), "").expect("Failed to write trigger file");
    }

    fn trigger_exists(&self) -> bool {
        self.repo.join(DEPLOY_FILE).exists()
    }
}

mod construction {
    use super::*;

    #[test]
    fn buildable_languages_build_with_existing_publish_dir() {
        let fixture = Fixture::new();
        for language in ["VB", "C#"] {
            let project =
                Project::with_runner("svc", &fixture.properties(language), RecordingRunner::default())
                    .unwrap();
            assert!(project.do_build(), "{language} should build");
        }
    }

    #[test]
    fn python_never_builds() {
        let fixture = Fixture::new();
        let project =
            Project::with_runner("svc", &fixture.properties("Python"), RecordingRunner::default())
                .unwrap();
        assert!(!project.do_build());
        assert_eq!(project.project_extension(), "pyproj");
    }

    #[test]
    fn missing_publish_dir_disables_build_with_warning() {
        let fixture = Fixture::new();
        let properties = ProjectProperties::new(&fixture.repo, "main", "C#")
            .with_publish_location(fixture.repo.join("nonexistent"));

        let (project, logs) = capture_logs(|| {
            Project::with_runner("svc", &properties, RecordingRunner::default()).unwrap()
        });

        assert!(!project.do_build());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Project 'svc' has an invalid publish directory"));
    }

    #[test]
    fn absent_publish_location_disables_build() {
        let fixture = Fixture::new();
        let properties = ProjectProperties::new(&fixture.repo, "main", "VB");
        let (project, logs) = capture_logs(|| {
            Project::with_runner("svc", &properties, RecordingRunner::default()).unwrap()
        });
        assert!(!project.do_build());
        assert!(logs.contains("invalid publish directory"));
    }

    #[test]
    fn relative_publish_location_resolves_against_project_directory() {
        let fixture = Fixture::new();
        std::fs::create_dir_all(fixture.repo.join("out")).unwrap();
        let properties =
            ProjectProperties::new(&fixture.repo, "main", "C#").with_publish_location("out");

        let project =
            Project::with_runner("svc", &properties, RecordingRunner::default()).unwrap();

        assert!(project.do_build());
        assert_eq!(project.publish_dir(), Some(fixture.repo.join("out").as_path()));
        let publish = project.publish_invocation();
        assert_eq!(publish.cwd, fixture.repo);
        assert_eq!(
            publish.args.last().cloned(),
            Some(fixture.repo.join("out").into_os_string())
        );
    }

    #[test]
    fn relative_publish_location_outside_project_disables_build() {
        let fixture = Fixture::new();
        let properties = ProjectProperties::new(&fixture.repo, "main", "VB")
            .with_publish_location("missing-out");

        let (project, logs) = capture_logs(|| {
            Project::with_runner("svc", &properties, RecordingRunner::default()).unwrap()
        });

        assert!(!project.do_build());
        assert!(logs.contains(&fixture.repo.join("missing-out").display().to_string()));
    }

    #[test]
    fn do_build_is_a_construction_snapshot() {
        let fixture = Fixture::new();
        let project =
            Project::with_runner("svc", &fixture.properties("C#"), RecordingRunner::default())
                .unwrap();
        std::fs::remove_dir_all(&fixture.publish).unwrap();
        assert!(project.do_build());
    }

    #[test]
    fn project_extensions() {
        let fixture = Fixture::new();
        let cases = [("Python", "pyproj"), ("VB", "vbproj"), ("C#", "csproj")];
        for (language, extension) in cases {
            let project = Project::with_runner(
                "svc",
                &fixture.properties(language),
                RecordingRunner::default(),
            )
            .unwrap();
            assert_eq!(project.project_extension(), extension);
        }
    }

    #[test]
    fn unsupported_language_fails() {
        let fixture = Fixture::new();
        let err = Project::with_runner("svc", &fixture.properties("Go"), RecordingRunner::default())
            .unwrap_err();
        assert!(matches!(err, DeployError::UnsupportedLanguage { ref language } if language == "Go"));
        assert_eq!(err.to_string(), "Project language Go not supported");
    }

    #[test]
    fn language_match_is_case_sensitive() {
        let fixture = Fixture::new();
        for language in ["python", "vb", "c#", "PYTHON"] {
            let result = Project::with_runner(
                "svc",
                &fixture.properties(language),
                RecordingRunner::default(),
            );
            assert!(result.is_err(), "{language} should be rejected");
        }
    }
}

mod invocations {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn pull_runs_in_project_directory() {
        let fixture = Fixture::new();
        let project =
            Project::with_runner("svc", &fixture.properties("Python"), RecordingRunner::default())
                .unwrap();
        let pull = project.pull_invocation();
        assert_eq!(pull.program, "git");
        assert_eq!(pull.args, vec!["pull", "origin", "main"]);
        assert_eq!(pull.cwd, fixture.repo);
    }

    #[test]
    fn build_is_release_mode() {
        let fixture = Fixture::new();
        let project =
            Project::with_runner("svc", &fixture.properties("C#"), RecordingRunner::default())
                .unwrap();
        let build = project.build_invocation();
        assert_eq!(build.program, "dotnet");
        assert_eq!(build.args, vec!["build", "-c", "Release"]);
        assert_eq!(build.cwd, fixture.repo);
    }

    #[test]
    fn publish_targets_project_file_and_publish_dir() {
        let fixture = Fixture::new();
        let project =
            Project::with_runner("svc", &fixture.properties("VB"), RecordingRunner::default())
                .unwrap();
        let publish = project.publish_invocation();
        assert_eq!(publish.program, "dotnet");
        assert_eq!(
            publish.args,
            vec![
                OsString::from("publish"),
                OsString::from("svc.vbproj"),
                OsString::from("-c"),
                OsString::from("Release"),
                OsString::from("--no-build"),
                OsString::from("-o"),
                fixture.publish.clone().into_os_string(),
            ]
        );
        assert_eq!(publish.cwd, fixture.repo);
    }

    #[test]
    fn branch_is_a_single_argument() {
        let fixture = Fixture::new();
        let properties = ProjectProperties::new(&fixture.repo, "main; rm -rf /", "Python");
        let project =
            Project::with_runner("svc", &properties, RecordingRunner::default()).unwrap();
        let pull = project.pull_invocation();
        assert_eq!(pull.args.len(), 3);
        assert_eq!(pull.args[2], OsString::from("main; rm -rf /"));
    }
}

mod deploy {
    use super::*;

    #[test]
    fn no_trigger_does_nothing_silently() {
        let fixture = Fixture::new();
        let runner = RecordingRunner::default();
        let project = Project::with_runner("svc", &fixture.properties("C#"), &runner).unwrap();

        let (outcome, logs) = capture_logs(|| project.deploy_application().unwrap());

        assert_eq!(outcome, DeployOutcome::Idle);
        assert!(runner.calls.borrow().is_empty());
        assert!(logs.is_empty(), "expected no log output, got: {logs}");
    }

    #[test]
    fn python_deploy_pulls_only() {
        let fixture = Fixture::new();
        fixture.trigger();
        let runner = RecordingRunner::default();
        let project = Project::with_runner("svc", &fixture.properties("Python"), &runner).unwrap();

        let (outcome, logs) = capture_logs(|| project.deploy_application().unwrap());

        assert_eq!(outcome, DeployOutcome::Succeeded);
        assert_eq!(runner.subcommands(), vec!["git pull"]);
        assert!(!fixture.trigger_exists());

        let start = logs
            .find("Deploying application 'svc'")
            .expect("missing start line");
        let done = logs
            .find("Project 'svc' deployment succeeded")
            .expect("missing success line");
        assert!(start < done);
    }

    #[test]
    fn buildable_deploy_runs_full_pipeline() {
        let fixture = Fixture::new();
        fixture.trigger();
        let runner = RecordingRunner::default();
        let project = Project::with_runner("svc", &fixture.properties("C#"), &runner).unwrap();

        let outcome = project.deploy_application().unwrap();

        assert_eq!(outcome, DeployOutcome::Succeeded);
        assert_eq!(
            runner.subcommands(),
            vec!["git pull", "dotnet build", "dotnet publish"]
        );
        assert!(!fixture.trigger_exists());
    }

    #[test]
    fn pull_failure_skips_build_and_removes_trigger() {
        let fixture = Fixture::new();
        fixture.trigger();
        let runner = RecordingRunner::failing_on("pull");
        let project = Project::with_runner("svc", &fixture.properties("C#"), &runner).unwrap();

        let (outcome, logs) = capture_logs(|| project.deploy_application().unwrap());

        assert_eq!(
            outcome,
            DeployOutcome::Failed {
                stage: DeployStage::Pull
            }
        );
        assert_eq!(runner.subcommands(), vec!["git pull"]);
        assert!(!fixture.trigger_exists());
        assert!(logs.contains("Git pull failed: ExitStatus"));
        assert!(logs.contains("Project 'svc' deployment failed"));
    }

    #[test]
    fn build_failure_skips_publish() {
        let fixture = Fixture::new();
        fixture.trigger();
        let runner = RecordingRunner::failing_on("build");
        let project = Project::with_runner("svc", &fixture.properties("VB"), &runner).unwrap();

        let (outcome, logs) = capture_logs(|| project.deploy_application().unwrap());

        assert_eq!(
            outcome,
            DeployOutcome::Failed {
                stage: DeployStage::Build
            }
        );
        assert_eq!(runner.subcommands(), vec!["git pull", "dotnet build"]);
        assert!(logs.contains("Build failed: ExitStatus"));
        assert!(!fixture.trigger_exists());
    }

    #[test]
    fn publish_failure_fails_deployment() {
        let fixture = Fixture::new();
        fixture.trigger();
        let runner = RecordingRunner::failing_on("publish");
        let project = Project::with_runner("svc", &fixture.properties("C#"), &runner).unwrap();

        let (outcome, logs) = capture_logs(|| project.deploy_application().unwrap());

        assert_eq!(
            outcome,
            DeployOutcome::Failed {
                stage: DeployStage::Publish
            }
        );
        assert!(outcome.is_failure());
        assert!(logs.contains("Publish failed: ExitStatus"));
        assert!(logs.contains("WARN"));
        assert!(!fixture.trigger_exists());
    }

    #[test]
    fn csharp_without_publish_dir_succeeds_after_pull() {
        let fixture = Fixture::new();
        fixture.trigger();
        let properties = ProjectProperties::new(&fixture.repo, "main", "C#")
            .with_publish_location("/nonexistent/tripwire/publish");
        let runner = RecordingRunner::default();
        let project = Project::with_runner("svc", &properties, &runner).unwrap();
        assert!(!project.do_build());

        let outcome = project.deploy_application().unwrap();

        assert_eq!(outcome, DeployOutcome::Succeeded);
        assert_eq!(runner.subcommands(), vec!["git pull"]);
    }

    #[test]
    fn failure_log_carries_kind_not_message() {
        struct MissingTool;
        impl CommandRunner for MissingTool {
            fn run(&self, invocation: &Invocation) -> Result<(), CommandError> {
                Err(CommandError::Spawn {
                    program: invocation.program.clone(),
                    source: io::Error::new(io::ErrorKind::NotFound, "secret detail"),
                })
            }
        }

        let fixture = Fixture::new();
        fixture.trigger();
        let project =
            Project::with_runner("svc", &fixture.properties("Python"), MissingTool).unwrap();

        let (outcome, logs) = capture_logs(|| project.deploy_application().unwrap());

        assert!(outcome.is_failure());
        assert!(logs.contains("Git pull failed: NotFound"));
        assert!(!logs.contains("secret detail"));
    }

    #[test]
    fn trigger_that_cannot_be_removed_is_an_error() {
        let fixture = Fixture::new();
        std::fs::create_dir_all(fixture.repo.join(DEPLOY_FILE)).unwrap();
        let runner = RecordingRunner::default();
        let project = Project::with_runner("svc", &fixture.properties("Python"), &runner).unwrap();

        let (result, logs) = capture_logs(|| project.deploy_application());

        let err = result.unwrap_err();
        assert!(
            matches!(err, DeployError::TriggerCleanup { ref path, .. } if path == &fixture.repo.join(DEPLOY_FILE))
        );
        assert_eq!(runner.subcommands(), vec!["git pull"]);
        assert!(logs.contains("Deploying application 'svc'"));
        assert!(!logs.contains("deployment succeeded"));
        assert!(!logs.contains("deployment failed"));
    }

    #[test]
    fn status_reports_pending_trigger_without_consuming_it() {
        let fixture = Fixture::new();
        let runner = RecordingRunner::default();
        let project = Project::with_runner("svc", &fixture.properties("C#"), &runner).unwrap();

        assert!(!project.status().trigger_pending);
        fixture.trigger();

        let status = project.status();
        assert!(status.trigger_pending);
        assert!(status.do_build);
        assert_eq!(status.language, Language::CSharp);
        assert_eq!(status.branch, "main");
        assert!(fixture.trigger_exists());
        assert!(runner.calls.borrow().is_empty());
    }
}
