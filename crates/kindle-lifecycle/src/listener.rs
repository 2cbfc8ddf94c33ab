//! Callback surface invoked by the hosting application framework.
//!
//! The framework owns the process lifecycle and guarantees that callbacks
//! arrive sequentially, in the order `starting`, `environment_prepared`,
//! `context_prepared`, `context_loaded`, then `started` or `failed`,
//! then `running`. Listeners with a lower [`StartupListener::order`] run
//! first.

use std::error::Error;

use crate::environment::EnvironmentSource;
use crate::error::LifecycleError;

/// Order of a listener that must run before every other listener.
pub const HIGHEST_PRECEDENCE: i32 = i32::MIN;

/// Order of the framework's own event-publishing listener.
pub const DEFAULT_ORDER: i32 = 0;

/// Shutdown mechanism of the application context being started.
pub trait ApplicationContext {
    /// Asks the framework to close the context and terminate startup.
    fn close(&self);
}

/// Receiver of startup lifecycle callbacks.
pub trait StartupListener {
    /// Position relative to other listeners; lower runs earlier.
    fn order(&self) -> i32 {
        DEFAULT_ORDER
    }

    /// Startup has begun.
    fn starting(&mut self) -> Result<(), LifecycleError>;

    /// Configuration sources are available.
    fn environment_prepared(
        &mut self,
        environment: &mut dyn EnvironmentSource,
    ) -> Result<(), LifecycleError>;

    /// The application context has been created.
    fn context_prepared(&mut self) -> Result<(), LifecycleError>;

    /// The application context has been loaded.
    fn context_loaded(&mut self) -> Result<(), LifecycleError>;

    /// Startup finished successfully.
    fn started(&mut self) -> Result<(), LifecycleError>;

    /// The application is running.
    fn running(&mut self) -> Result<(), LifecycleError>;

    /// Startup failed with `cause`.
    fn failed(
        &mut self,
        context: &dyn ApplicationContext,
        cause: &(dyn Error + 'static),
    ) -> Result<(), LifecycleError>;
}
