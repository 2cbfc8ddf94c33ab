//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::error::Error;
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};

use kindle_config::{DeploymentMode, RequiredDirectory};

use crate::cluster::ClusterConfigError;
use crate::environment::ResolvedEnvironment;
use crate::health::HealthReporter;
use crate::provision::ProvisioningError;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    EnvironmentResolved(DeploymentMode),
    ClusterMembers(Vec<String>),
    ClusterMembersUnavailable(String),
    StillStarting,
    DirectoryResolved {
        directory: RequiredDirectory,
        path: Utf8PathBuf,
    },
    ProvisioningFailed(String),
    StartupSucceeded(DeploymentMode),
    StartupFailed {
        cause: String,
        log_file: Utf8PathBuf,
    },
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// Number of heartbeat signals recorded so far.
    #[must_use]
    pub fn heartbeats(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == HealthEvent::StillStarting)
            .count()
    }

    pub fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn environment_resolved(&self, environment: &ResolvedEnvironment) {
        self.record(HealthEvent::EnvironmentResolved(
            environment.deployment_mode(),
        ));
    }

    fn cluster_members(&self, members: &[String]) {
        self.record(HealthEvent::ClusterMembers(members.to_vec()));
    }

    fn cluster_members_unavailable(&self, error: &ClusterConfigError) {
        self.record(HealthEvent::ClusterMembersUnavailable(error.to_string()));
    }

    fn still_starting(&self) {
        self.record(HealthEvent::StillStarting);
    }

    fn directory_resolved(&self, directory: RequiredDirectory, path: &Utf8Path) {
        self.record(HealthEvent::DirectoryResolved {
            directory,
            path: path.to_path_buf(),
        });
    }

    fn provisioning_failed(&self, error: &ProvisioningError) {
        self.record(HealthEvent::ProvisioningFailed(error.to_string()));
    }

    fn startup_succeeded(&self, mode: DeploymentMode) {
        self.record(HealthEvent::StartupSucceeded(mode));
    }

    fn startup_failed(&self, cause: &(dyn Error + 'static), log_file: &Utf8Path) {
        self.record(HealthEvent::StartupFailed {
            cause: cause.to_string(),
            log_file: log_file.to_path_buf(),
        });
    }
}
