//! Topology and feature-set selectors resolved during startup.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Whether the server runs alone or as a member of a cluster.
///
/// Resolved once while the environment is prepared and never changed
/// afterwards. The [`Display`](std::fmt::Display) form is the published
/// property value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// Single node; no membership file and no startup heartbeat.
    #[strum(serialize = "stand alone")]
    Standalone,
    /// Member of a cluster described by the membership file.
    #[strum(serialize = "cluster")]
    Cluster,
}

impl DeploymentMode {
    /// Maps the standalone indicator onto a mode.
    #[must_use]
    pub const fn from_standalone(standalone: bool) -> Self {
        if standalone {
            Self::Standalone
        } else {
            Self::Cluster
        }
    }

    /// Value published under the deployment-mode property.
    #[must_use]
    pub fn published_value(self) -> &'static str {
        self.into()
    }

    /// Returns `true` for [`DeploymentMode::Cluster`].
    #[must_use]
    pub const fn is_cluster(self) -> bool {
        matches!(self, Self::Cluster)
    }
}

/// Subset of server functions enabled for this process.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    Display,
    IntoStaticStr,
)]
pub enum FunctionMode {
    /// Every function is enabled.
    #[default]
    #[strum(serialize = "All")]
    All,
    /// Only configuration management.
    #[strum(serialize = "config")]
    ConfigOnly,
    /// Only service naming and discovery.
    #[strum(serialize = "naming")]
    NamingOnly,
}

impl FunctionMode {
    /// Interprets a raw function-mode value.
    ///
    /// An unset value selects [`FunctionMode::All`]. Only the exact strings
    /// `config` and `naming` are recognised; anything else, the empty string
    /// included, yields `None` and callers leave the published value alone.
    #[must_use]
    pub fn recognise(raw: Option<&str>) -> Option<Self> {
        match raw {
            None => Some(Self::All),
            Some("config") => Some(Self::ConfigOnly),
            Some("naming") => Some(Self::NamingOnly),
            Some(_) => None,
        }
    }

    /// Value published under the function-mode property.
    #[must_use]
    pub fn published_value(self) -> &'static str {
        self.into()
    }
}
