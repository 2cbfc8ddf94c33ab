//! BDD test world: owns a temporary home, the coordinator and its recording
//! collaborators for step functions.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use tempfile::TempDir;

use kindle_config::{Config, HomeLayout, RequiredDirectory};

use crate::coordinator::LifecycleCoordinator;
use crate::environment::PropertyEnvironment;
use crate::error::LifecycleError;
use crate::heartbeat::{DEFAULT_HEARTBEAT_PERIOD, HeartbeatScheduler};
use crate::listener::StartupListener;

use super::{ManualClock, RecordingContext, RecordingHealthReporter};

/// Scenario world shared across BDD steps.
pub struct TestWorld {
    home_dir: TempDir,
    pub reporter: Arc<RecordingHealthReporter>,
    pub clock: Arc<ManualClock>,
    pub context: RecordingContext,
    pub coordinator: LifecycleCoordinator,
    pub environment: PropertyEnvironment,
    errors: Vec<LifecycleError>,
}

impl TestWorld {
    /// Builds a world for a cluster node with an empty temporary home.
    #[must_use]
    pub fn new() -> Self {
        let home_dir = TempDir::new().expect("failed to create temporary home");
        let reporter = Arc::new(RecordingHealthReporter::default());
        let clock = Arc::new(ManualClock::new());
        let heartbeat = HeartbeatScheduler::new(DEFAULT_HEARTBEAT_PERIOD, clock.clone());
        let coordinator = LifecycleCoordinator::with_heartbeat(reporter.clone(), heartbeat);
        let mut world = Self {
            home_dir,
            reporter,
            clock,
            context: RecordingContext::default(),
            coordinator,
            environment: PropertyEnvironment::default(),
            errors: Vec::new(),
        };
        world.configure(false);
        world
    }

    /// Home directory used by the node.
    #[must_use]
    pub fn home(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.home_dir.path().join("kindle"))
            .expect("temporary home was not valid UTF-8")
    }

    /// Filesystem layout below [`TestWorld::home`].
    #[must_use]
    pub fn layout(&self) -> HomeLayout {
        HomeLayout::new(self.home())
    }

    /// Selects standalone or cluster mode for the next startup.
    pub fn configure(&mut self, standalone: bool) {
        self.environment = PropertyEnvironment::new(Config {
            home: Some(self.home()),
            standalone: Some(standalone),
            local_address: Some("10.0.0.9".to_owned()),
            ..Config::default()
        });
    }

    /// Writes the cluster membership file.
    pub fn write_members(&self, members: &[&str]) {
        let path = self.layout().cluster_conf_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create conf directory");
        }
        let mut contents = members.join("\n");
        contents.push('\n');
        fs::write(path, contents).expect("failed to write membership file");
    }

    /// Blocks provisioning of `directory` by placing a file at its path.
    pub fn block_directory(&self, directory: RequiredDirectory) {
        fs::create_dir_all(self.home()).expect("failed to create home");
        fs::write(self.layout().directory(directory), "occupied")
            .expect("failed to write blocking file");
    }

    /// Delivers every callback up to and including `context_loaded`.
    pub fn begin_startup(&mut self) {
        let outcome = self
            .coordinator
            .starting()
            .and_then(|()| self.coordinator.environment_prepared(&mut self.environment))
            .and_then(|()| self.coordinator.context_prepared())
            .and_then(|()| self.coordinator.context_loaded());
        self.keep(outcome);
    }

    /// Lets virtual time pass.
    pub fn wait(&self, duration: Duration) {
        self.clock.advance(duration);
    }

    /// Delivers `started` followed by `running`.
    pub fn complete_startup(&mut self) {
        let outcome = self
            .coordinator
            .started()
            .and_then(|()| self.coordinator.running());
        self.keep(outcome);
    }

    /// Delivers `failed` with an IO error carrying `message`.
    pub fn fail_startup(&mut self, message: &str) {
        let cause = io::Error::other(message.to_owned());
        let outcome = self.coordinator.failed(&self.context, &cause);
        self.keep(outcome);
    }

    /// Errors returned by callbacks so far.
    #[must_use]
    pub fn errors(&self) -> &[LifecycleError] {
        &self.errors
    }

    fn keep(&mut self, outcome: Result<(), LifecycleError>) {
        if let Err(error) = outcome {
            self.errors.push(error);
        }
    }
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Default test world fixture.
#[must_use]
pub fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::new())
}
