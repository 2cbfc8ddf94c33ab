//! Bootstrap lifecycle coordination for a clustered server process.
//!
//! The hosting application framework owns startup and invokes the
//! [`StartupListener`] callbacks in a fixed order. [`LifecycleCoordinator`]
//! listens ahead of every other listener and:
//!
//! - resolves the deployment and function modes and the local address,
//!   publishing them as process-wide properties and keeping them in a
//!   [`ResolvedEnvironment`] for later callbacks;
//! - in cluster mode, logs the members listed in `<home>/conf/cluster.conf`
//!   and runs a one-second "still starting" heartbeat until startup ends;
//! - provisions `<home>/logs`, `<home>/conf` and `<home>/data` when startup
//!   ends, either way;
//! - reports success with the deployment mode, or failure with its cause
//!   and the log location, after which it asks the framework to close the
//!   application context.
//!
//! Every observable line goes through a [`HealthReporter`];
//! [`StructuredHealthReporter`] emits them via `tracing`, and
//! [`telemetry::initialise`] installs the subscriber that renders them.
//!
//! ## Startup flag and heartbeat
//!
//! The only state shared across threads is the [`StartingFlag`]. It is
//! raised by `starting` and lowered by `started` or `failed`, and the
//! heartbeat worker reads it before every emission. Both terminal callbacks
//! also stop the [`HeartbeatScheduler`] synchronously, so no heartbeat is
//! emitted once they return.

mod cluster;
mod coordinator;
mod environment;
mod error;
mod health;
pub mod heartbeat;
mod listener;
mod provision;
pub mod telemetry;

pub use cluster::{ClusterConfigError, ClusterConfigReader};
pub use coordinator::{Callback, LifecycleCoordinator, LifecycleState};
pub use environment::{
    EnvironmentConfigurator, EnvironmentSource, FUNCTION_MODE_PROPERTY_KEY,
    LOCAL_ADDRESS_PROPERTY_KEY, MODE_PROPERTY_KEY, PropertyEnvironment, ResolvedEnvironment,
    detected_local_address,
};
pub use error::LifecycleError;
pub use health::{HealthReporter, StructuredHealthReporter};
pub use heartbeat::{
    Clock, DEFAULT_HEARTBEAT_PERIOD, HeartbeatError, HeartbeatScheduler, StartingFlag,
    SystemClock,
};
pub use listener::{ApplicationContext, DEFAULT_ORDER, HIGHEST_PRECEDENCE, StartupListener};
pub use provision::{DirectoryProvisioner, ProvisioningError};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
