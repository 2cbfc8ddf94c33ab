//! Startup lifecycle state machine.
//!
//! [`LifecycleCoordinator`] reacts to the framework callbacks: it publishes
//! the resolved environment, logs cluster membership and runs the startup
//! heartbeat in cluster mode, then provisions the working directories and
//! reports the outcome once startup ends. Callbacks that arrive out of order
//! are rejected without touching any state.

mod state;

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use tracing::warn;

use kindle_config::{DeploymentMode, HomeLayout, default_home};

use crate::cluster::ClusterConfigReader;
use crate::environment::{EnvironmentConfigurator, EnvironmentSource, ResolvedEnvironment};
use crate::error::LifecycleError;
use crate::health::{HEALTH_TARGET, HealthReporter};
use crate::heartbeat::{HeartbeatScheduler, StartingFlag};
use crate::listener::{ApplicationContext, HIGHEST_PRECEDENCE, StartupListener};
use crate::provision::DirectoryProvisioner;

pub use state::{Callback, LifecycleState};

/// Drives startup bookkeeping from framework callbacks.
pub struct LifecycleCoordinator {
    state: LifecycleState,
    starting: StartingFlag,
    heartbeat: HeartbeatScheduler,
    reporter: Arc<dyn HealthReporter>,
    configurator: EnvironmentConfigurator,
    environment: Option<ResolvedEnvironment>,
    cluster_members: Vec<String>,
}

impl LifecycleCoordinator {
    /// Builds a coordinator with the default one-second heartbeat.
    #[must_use]
    pub fn new(reporter: Arc<dyn HealthReporter>) -> Self {
        Self::with_heartbeat(reporter, HeartbeatScheduler::default())
    }

    /// Builds a coordinator around a preconfigured heartbeat scheduler.
    #[must_use]
    pub fn with_heartbeat(reporter: Arc<dyn HealthReporter>, heartbeat: HeartbeatScheduler) -> Self {
        Self {
            state: LifecycleState::Idle,
            starting: StartingFlag::new(),
            heartbeat,
            reporter,
            configurator: EnvironmentConfigurator::new(),
            environment: None,
            cluster_members: Vec::new(),
        }
    }

    /// Current bookkeeping state.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether startup is in progress.
    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.starting.is_raised()
    }

    /// Environment resolved by `environment_prepared`.
    #[must_use]
    pub const fn environment(&self) -> Option<&ResolvedEnvironment> {
        self.environment.as_ref()
    }

    /// Deployment mode, once resolved.
    #[must_use]
    pub fn deployment_mode(&self) -> Option<DeploymentMode> {
        self.environment.as_ref().map(ResolvedEnvironment::deployment_mode)
    }

    /// Members read during `context_prepared`; empty when standalone or
    /// when the membership file was unreadable.
    #[must_use]
    pub fn cluster_members(&self) -> &[String] {
        &self.cluster_members
    }

    /// Whether the startup heartbeat is running.
    #[must_use]
    pub const fn heartbeat_running(&self) -> bool {
        self.heartbeat.is_running()
    }

    fn accept(&self, callback: Callback) -> Result<LifecycleState, LifecycleError> {
        self.state.next(callback).ok_or_else(|| {
            warn!(
                target: HEALTH_TARGET,
                event = "unexpected_callback",
                callback = %callback,
                state = %self.state,
                "ignoring out-of-order lifecycle callback"
            );
            LifecycleError::UnexpectedCallback {
                callback,
                state: self.state,
            }
        })
    }

    fn layout(&self) -> HomeLayout {
        self.environment.as_ref().map_or_else(
            || HomeLayout::new(default_home()),
            |environment| environment.layout().clone(),
        )
    }

    fn finish_starting(&mut self) {
        self.starting.lower();
        self.heartbeat.stop();
    }

    fn read_cluster_members(&self, layout: &HomeLayout) -> Vec<String> {
        match ClusterConfigReader::for_layout(layout).read() {
            Ok(members) => {
                self.reporter.cluster_members(&members);
                members
            }
            Err(error) => {
                self.reporter.cluster_members_unavailable(&error);
                Vec::new()
            }
        }
    }
}

impl StartupListener for LifecycleCoordinator {
    fn order(&self) -> i32 {
        HIGHEST_PRECEDENCE
    }

    fn starting(&mut self) -> Result<(), LifecycleError> {
        let next = self.accept(Callback::Starting)?;
        self.starting.raise();
        self.state = next;
        Ok(())
    }

    fn environment_prepared(
        &mut self,
        environment: &mut dyn EnvironmentSource,
    ) -> Result<(), LifecycleError> {
        let next = self.accept(Callback::EnvironmentPrepared)?;
        let resolved = self.configurator.configure(environment);
        self.reporter.environment_resolved(&resolved);
        self.environment = Some(resolved);
        self.state = next;
        Ok(())
    }

    fn context_prepared(&mut self) -> Result<(), LifecycleError> {
        let next = self.accept(Callback::ContextPrepared)?;
        let Some(environment) = self.environment.as_ref() else {
            return Err(LifecycleError::EnvironmentNotPrepared);
        };

        if environment.deployment_mode().is_cluster() {
            let layout = environment.layout().clone();
            self.cluster_members = self.read_cluster_members(&layout);
            self.heartbeat
                .start(self.starting.clone(), Arc::clone(&self.reporter))
                .map_err(|source| LifecycleError::Heartbeat { source })?;
        }

        self.state = next;
        Ok(())
    }

    fn context_loaded(&mut self) -> Result<(), LifecycleError> {
        self.accept(Callback::ContextLoaded)?;
        Ok(())
    }

    fn started(&mut self) -> Result<(), LifecycleError> {
        let next = self.accept(Callback::Started)?;
        self.finish_starting();

        let Some(mode) = self.deployment_mode() else {
            return Err(LifecycleError::EnvironmentNotPrepared);
        };
        DirectoryProvisioner::new(self.layout())
            .provision(&*self.reporter)
            .map_err(|source| LifecycleError::Provisioning { source })?;

        self.state = next;
        self.reporter.startup_succeeded(mode);
        Ok(())
    }

    fn running(&mut self) -> Result<(), LifecycleError> {
        self.accept(Callback::Running)?;
        Ok(())
    }

    fn failed(
        &mut self,
        context: &dyn ApplicationContext,
        cause: &(dyn Error + 'static),
    ) -> Result<(), LifecycleError> {
        let next = self.accept(Callback::Failed)?;
        self.finish_starting();

        let layout = self.layout();
        if let Err(error) = DirectoryProvisioner::new(layout.clone()).provision(&*self.reporter) {
            self.reporter.provisioning_failed(&error);
        }
        self.reporter.startup_failed(cause, &layout.log_file_path());

        self.state = next;
        context.close();
        Ok(())
    }
}

impl fmt::Debug for LifecycleCoordinator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LifecycleCoordinator")
            .field("state", &self.state)
            .field("starting", &self.is_starting())
            .field("heartbeat", &self.heartbeat)
            .field("environment", &self.environment)
            .field("cluster_members", &self.cluster_members)
            .finish_non_exhaustive()
    }
}
