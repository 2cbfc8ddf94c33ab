//! Errors surfaced by the lifecycle coordinator.

use thiserror::Error;

use crate::coordinator::{Callback, LifecycleState};
use crate::heartbeat::HeartbeatError;
use crate::provision::ProvisioningError;

/// Errors returned from lifecycle callbacks.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A callback arrived in a state that does not accept it.
    #[error("unexpected {callback} callback in {state} state")]
    UnexpectedCallback {
        /// Callback that was rejected.
        callback: Callback,
        /// State the coordinator was in.
        state: LifecycleState,
    },
    /// The context was prepared before the environment was resolved.
    #[error("context prepared before the environment was resolved")]
    EnvironmentNotPrepared,
    /// Required directories could not be created.
    #[error("failed to provision working directories: {source}")]
    Provisioning {
        /// Underlying provisioning error.
        #[source]
        source: ProvisioningError,
    },
    /// The heartbeat worker could not be started.
    #[error("failed to start startup heartbeat: {source}")]
    Heartbeat {
        /// Underlying scheduler error.
        #[source]
        source: HeartbeatError,
    },
}
