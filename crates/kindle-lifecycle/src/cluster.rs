//! Cluster membership file reader.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use kindle_config::HomeLayout;

/// Errors raised while reading the cluster membership file.
#[derive(Debug, Error)]
pub enum ClusterConfigError {
    /// The file could not be opened or read.
    #[error("failed to read cluster membership file '{path}': {source}")]
    Read {
        /// Path of the membership file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl ClusterConfigError {
    /// Kind of the underlying IO failure.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Read { source, .. } => source.kind(),
        }
    }
}

/// Reads the ordered list of member addresses, one per line.
///
/// Lines are returned exactly as written: no trimming, comment stripping or
/// deduplication. The membership file belongs to the deployment.
#[derive(Debug, Clone)]
pub struct ClusterConfigReader {
    path: Utf8PathBuf,
}

impl ClusterConfigReader {
    /// Reader for an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reader for the membership file of a home layout.
    #[must_use]
    pub fn for_layout(layout: &HomeLayout) -> Self {
        Self::new(layout.cluster_conf_path())
    }

    /// Path this reader consumes.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        self.path.as_path()
    }

    /// Reads the file fresh on every call.
    pub fn read(&self) -> Result<Vec<String>, ClusterConfigError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| ClusterConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        Ok(contents.lines().map(str::to_owned).collect())
    }
}
