//! Resolution and publication of the startup environment.
//!
//! The configurator turns the raw configuration source into a
//! [`ResolvedEnvironment`] that the coordinator hands to later callbacks,
//! and registers the derived values back into the source under fixed
//! property keys so the rest of the process can read them.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use camino::Utf8PathBuf;
use once_cell::sync::OnceCell;

use kindle_config::{Config, DeploymentMode, FunctionMode, HomeLayout};

/// Property key carrying the published deployment mode.
pub const MODE_PROPERTY_KEY: &str = "kindle.mode";

/// Property key carrying the published function mode.
pub const FUNCTION_MODE_PROPERTY_KEY: &str = "kindle.function.mode";

/// Property key carrying the published local address.
pub const LOCAL_ADDRESS_PROPERTY_KEY: &str = "kindle.local.ip";

const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
// Documentation range; connecting a UDP socket selects a route without
// sending any datagram.
const PROBE_TARGET: (Ipv4Addr, u16) = (Ipv4Addr::new(192, 0, 2, 1), 9);

static DETECTED_ADDRESS: OnceCell<String> = OnceCell::new();

/// Configuration source consumed while the environment is prepared.
pub trait EnvironmentSource {
    /// Whether the server runs as a single node.
    fn is_standalone(&self) -> bool;

    /// Raw function-mode value, if configured.
    fn function_mode(&self) -> Option<&str>;

    /// Explicit local address, if configured.
    fn local_address(&self) -> Option<&str>;

    /// Home directory of the server.
    fn home(&self) -> Utf8PathBuf;

    /// Registers a derived value for the rest of the process.
    fn publish(&mut self, key: &str, value: String);
}

/// [`EnvironmentSource`] backed by a loaded [`Config`] and a property map.
#[derive(Debug, Clone, Default)]
pub struct PropertyEnvironment {
    config: Config,
    properties: BTreeMap<String, String>,
}

impl PropertyEnvironment {
    /// Wraps a configuration with an empty property map.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            properties: BTreeMap::new(),
        }
    }

    /// Seeds a property, as if published by an earlier stage.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Underlying configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Looks up a published property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// All published properties, ordered by key.
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

impl EnvironmentSource for PropertyEnvironment {
    fn is_standalone(&self) -> bool {
        self.config.is_standalone()
    }

    fn function_mode(&self) -> Option<&str> {
        self.config.function_mode()
    }

    fn local_address(&self) -> Option<&str> {
        self.config.local_address()
    }

    fn home(&self) -> Utf8PathBuf {
        self.config.home()
    }

    fn publish(&mut self, key: &str, value: String) {
        self.properties.insert(key.to_owned(), value);
    }
}

/// Environment values resolved once during `environment_prepared`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    deployment_mode: DeploymentMode,
    function_mode: FunctionMode,
    local_address: String,
    layout: HomeLayout,
}

impl ResolvedEnvironment {
    /// Builds a resolved environment from its parts.
    #[must_use]
    pub const fn new(
        deployment_mode: DeploymentMode,
        function_mode: FunctionMode,
        local_address: String,
        layout: HomeLayout,
    ) -> Self {
        Self {
            deployment_mode,
            function_mode,
            local_address,
            layout,
        }
    }

    /// Standalone or cluster topology.
    #[must_use]
    pub const fn deployment_mode(&self) -> DeploymentMode {
        self.deployment_mode
    }

    /// Enabled function subset; unrecognised values resolve to `All`.
    #[must_use]
    pub const fn function_mode(&self) -> FunctionMode {
        self.function_mode
    }

    /// Local network address of this process.
    #[must_use]
    pub fn local_address(&self) -> &str {
        &self.local_address
    }

    /// Paths below the home directory.
    #[must_use]
    pub const fn layout(&self) -> &HomeLayout {
        &self.layout
    }
}

/// Derives deployment and function modes and publishes them.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentConfigurator;

impl EnvironmentConfigurator {
    /// Builds a configurator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolves the environment and registers the derived properties.
    ///
    /// An unrecognised function mode is not published, leaving whatever
    /// value the source already carried.
    pub fn configure(&self, source: &mut dyn EnvironmentSource) -> ResolvedEnvironment {
        let deployment_mode = DeploymentMode::from_standalone(source.is_standalone());
        source.publish(
            MODE_PROPERTY_KEY,
            deployment_mode.published_value().to_owned(),
        );

        let recognised = FunctionMode::recognise(source.function_mode());
        if let Some(mode) = recognised {
            source.publish(FUNCTION_MODE_PROPERTY_KEY, mode.published_value().to_owned());
        }

        let local_address = source
            .local_address()
            .map_or_else(|| detected_local_address().to_owned(), str::to_owned);
        source.publish(LOCAL_ADDRESS_PROPERTY_KEY, local_address.clone());

        ResolvedEnvironment::new(
            deployment_mode,
            recognised.unwrap_or_default(),
            local_address,
            HomeLayout::new(source.home()),
        )
    }
}

/// Address of the outbound interface, probed once per process.
pub fn detected_local_address() -> &'static str {
    DETECTED_ADDRESS
        .get_or_init(|| probe_local_address().unwrap_or(LOOPBACK).to_string())
        .as_str()
}

fn probe_local_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(PROBE_TARGET).ok()?;
    let address = socket.local_addr().ok()?.ip();
    (!address.is_unspecified()).then_some(address)
}
