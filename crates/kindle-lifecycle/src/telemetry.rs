//! Tracing subscriber setup for startup logs.
//!
//! Lifecycle lines carry the `kindle::lifecycle` target and heartbeat
//! bookkeeping carries `kindle::heartbeat`; thread names are kept so lines
//! from the `kindle-starting` worker stand apart from callback lines.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, MakeWriter, time::UtcTime};

use kindle_config::{Config, LogFormat};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Boxed subscriber as installed globally or scoped by the host.
pub type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Proof that the global subscriber is in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber was already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Builds the stderr subscriber described by `config` without installing it.
///
/// Hosts that manage their own dispatch can scope it with
/// [`tracing::subscriber::with_default`].
pub fn subscriber(config: &Config) -> Result<BoxedSubscriber, TelemetryError> {
    build_subscriber(config, io::stderr, io::stderr().is_terminal())
}

/// Installs the subscriber from [`subscriber`] as the global default.
///
/// Only the first call installs anything; later calls return a handle
/// without touching global state, whatever configuration they pass.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED
        .get_or_try_init(|| {
            let subscriber = subscriber(config)?;
            tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
        })
        .map(|_| TelemetryHandle)
}

fn build_subscriber<W>(
    config: &Config,
    writer: W,
    ansi: bool,
) -> Result<BoxedSubscriber, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(UtcTime::rfc_3339());

    let subscriber: BoxedSubscriber = match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    };
    Ok(subscriber)
}
