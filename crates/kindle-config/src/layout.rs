//! Derives the home-rooted paths shared by the lifecycle and the server.
//!
//! Startup provisions the working directories and reads the membership file
//! from these locations; the rest of the process writes logs and data into
//! the same tree, so every consumer derives its paths from one
//! [`HomeLayout`].

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::defaults::{CLUSTER_CONF_FILE_NAME, LOG_FILE_NAME};

/// Working directories that must exist under the home path.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequiredDirectory {
    /// Log files.
    Logs,
    /// Configuration, including the cluster membership file.
    Conf,
    /// Persistent data.
    Data,
}

impl RequiredDirectory {
    /// Every required directory, in provisioning order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Directory name below the home path.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        self.into()
    }
}

/// Canonical paths below the configured home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    home: Utf8PathBuf,
}

impl HomeLayout {
    /// Builds a layout rooted at `home`.
    #[must_use]
    pub fn new(home: impl Into<Utf8PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Home directory.
    #[must_use]
    pub fn home(&self) -> &Utf8Path {
        self.home.as_path()
    }

    /// Path of one required directory.
    #[must_use]
    pub fn directory(&self, directory: RequiredDirectory) -> Utf8PathBuf {
        self.home.join(directory.dir_name())
    }

    /// Every required directory paired with its resolved path.
    pub fn required_directories(&self) -> impl Iterator<Item = (RequiredDirectory, Utf8PathBuf)> {
        RequiredDirectory::all().map(|directory| (directory, self.directory(directory)))
    }

    /// Path to the cluster membership file.
    #[must_use]
    pub fn cluster_conf_path(&self) -> Utf8PathBuf {
        self.directory(RequiredDirectory::Conf)
            .join(CLUSTER_CONF_FILE_NAME)
    }

    /// Path to the primary log file.
    #[must_use]
    pub fn log_file_path(&self) -> Utf8PathBuf {
        self.directory(RequiredDirectory::Logs).join(LOG_FILE_NAME)
    }
}
