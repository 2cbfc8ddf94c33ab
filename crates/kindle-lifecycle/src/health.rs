//! Structured health reporting for startup lifecycle events.

use std::error::Error;
use std::sync::Arc;

use camino::Utf8Path;

use kindle_config::{DeploymentMode, RequiredDirectory};

use crate::cluster::ClusterConfigError;
use crate::environment::ResolvedEnvironment;
use crate::provision::ProvisioningError;

pub(crate) const HEALTH_TARGET: &str = "kindle::lifecycle";

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked once the environment has been resolved and published.
    fn environment_resolved(&self, environment: &ResolvedEnvironment);

    /// Invoked with the cluster members read during context preparation.
    fn cluster_members(&self, members: &[String]);

    /// Invoked when the cluster membership file could not be read.
    fn cluster_members_unavailable(&self, error: &ClusterConfigError);

    /// Invoked on every heartbeat firing while startup is in progress.
    fn still_starting(&self);

    /// Invoked for each required directory before it is provisioned.
    fn directory_resolved(&self, directory: RequiredDirectory, path: &Utf8Path);

    /// Invoked when provisioning fails during failure handling.
    fn provisioning_failed(&self, error: &ProvisioningError);

    /// Invoked after startup completes successfully.
    fn startup_succeeded(&self, mode: DeploymentMode);

    /// Invoked when startup fails, with the location of the detailed log.
    fn startup_failed(&self, cause: &(dyn Error + 'static), log_file: &Utf8Path);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn environment_resolved(&self, environment: &ResolvedEnvironment) {
        (**self).environment_resolved(environment);
    }

    fn cluster_members(&self, members: &[String]) {
        (**self).cluster_members(members);
    }

    fn cluster_members_unavailable(&self, error: &ClusterConfigError) {
        (**self).cluster_members_unavailable(error);
    }

    fn still_starting(&self) {
        (**self).still_starting();
    }

    fn directory_resolved(&self, directory: RequiredDirectory, path: &Utf8Path) {
        (**self).directory_resolved(directory, path);
    }

    fn provisioning_failed(&self, error: &ProvisioningError) {
        (**self).provisioning_failed(error);
    }

    fn startup_succeeded(&self, mode: DeploymentMode) {
        (**self).startup_succeeded(mode);
    }

    fn startup_failed(&self, cause: &(dyn Error + 'static), log_file: &Utf8Path) {
        (**self).startup_failed(cause, log_file);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn environment_resolved(&self, environment: &ResolvedEnvironment) {
        tracing::debug!(
            target: HEALTH_TARGET,
            event = "environment_resolved",
            mode = %environment.deployment_mode(),
            function_mode = %environment.function_mode(),
            local_address = environment.local_address(),
            home = %environment.layout().home(),
            "startup environment resolved"
        );
    }

    fn cluster_members(&self, members: &[String]) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "cluster_members",
            members = ?members,
            "cluster member addresses: {members:?}"
        );
    }

    fn cluster_members_unavailable(&self, error: &ClusterConfigError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "cluster_members_unavailable",
            error = %error,
            "failed to read cluster membership"
        );
    }

    fn still_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "still_starting",
            "server is starting..."
        );
    }

    fn directory_resolved(&self, directory: RequiredDirectory, path: &Utf8Path) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "directory_resolved",
            directory = %directory,
            path = %path,
            "working directory: {path}"
        );
    }

    fn provisioning_failed(&self, error: &ProvisioningError) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "provisioning_failed",
            error = %error,
            "failed to provision working directories"
        );
    }

    fn startup_succeeded(&self, mode: DeploymentMode) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "startup_succeeded",
            mode = %mode,
            "server started successfully in {mode} mode"
        );
    }

    fn startup_failed(&self, cause: &(dyn Error + 'static), log_file: &Utf8Path) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "startup_failed",
            error = %cause,
            error_chain = ?cause,
            "startup failed"
        );
        tracing::error!(
            target: HEALTH_TARGET,
            event = "startup_log_location",
            log_file = %log_file,
            "server failed to start, see {log_file} for details"
        );
    }
}
