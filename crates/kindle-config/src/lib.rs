//! Shared configuration for the kindle bootstrap lifecycle.
//!
//! [`Config`] layers defaults, an optional TOML file, `KINDLE_*` environment
//! variables and command-line flags through `ortho_config`. The remaining
//! types describe the topology and layout values that the lifecycle
//! coordinator resolves during startup and that later stages of the process
//! read back: [`DeploymentMode`], [`FunctionMode`], and the home-rooted
//! [`HomeLayout`].

mod defaults;
mod layout;
mod logging;
mod mode;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    CLUSTER_CONF_FILE_NAME, DEFAULT_LOG_FILTER, LOG_FILE_NAME, default_home, default_log_filter,
    default_log_format,
};
pub use layout::{HomeLayout, RequiredDirectory};
pub use logging::{LogFormat, LogFormatParseError};
pub use mode::{DeploymentMode, FunctionMode};

/// Process configuration consumed by the bootstrap lifecycle.
///
/// Every field is optional on the wire; the accessor methods supply the
/// defaults so that partially specified files stay valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "KINDLE")]
pub struct Config {
    /// Root directory holding `logs`, `conf` and `data`.
    pub home: Option<Utf8PathBuf>,
    /// Runs the server as a single node when `true`.
    ///
    /// An absent `--standalone` flag leaves the file and environment
    /// layers in charge.
    #[ortho_config(cli_default_as_absent)]
    pub standalone: Option<bool>,
    /// Raw function-mode selector (`config` or `naming`); unset means all.
    pub function_mode: Option<String>,
    /// Overrides the detected local network address.
    pub local_address: Option<String>,
    /// `tracing` filter expression.
    pub log_filter: Option<String>,
    /// Output format for structured logs.
    pub log_format: Option<LogFormat>,
}

impl Config {
    /// Home directory, falling back to [`default_home`].
    #[must_use]
    pub fn home(&self) -> Utf8PathBuf {
        self.home.clone().unwrap_or_else(default_home)
    }

    /// Whether the server runs as a single node.
    #[must_use]
    pub fn is_standalone(&self) -> bool {
        self.standalone.unwrap_or(false)
    }

    /// Deployment mode derived from the standalone flag.
    #[must_use]
    pub fn deployment_mode(&self) -> DeploymentMode {
        DeploymentMode::from_standalone(self.is_standalone())
    }

    /// Raw function-mode value as configured.
    #[must_use]
    pub fn function_mode(&self) -> Option<&str> {
        self.function_mode.as_deref()
    }

    /// Configured local address override, if any.
    #[must_use]
    pub fn local_address(&self) -> Option<&str> {
        self.local_address.as_deref().filter(|value| !value.is_empty())
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format.unwrap_or_else(default_log_format)
    }

    /// Filesystem layout rooted at [`Config::home`].
    #[must_use]
    pub fn layout(&self) -> HomeLayout {
        HomeLayout::new(self.home())
    }
}
