//! Working directory provisioning under the home path.

use std::fs::DirBuilder;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use kindle_config::{HomeLayout, RequiredDirectory};

use crate::health::HealthReporter;

/// Errors raised when a required directory cannot be created.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// Creating the directory (or one of its parents) failed.
    #[error("failed to create {directory} directory '{path}': {source}")]
    CreateDirectory {
        /// Which required directory failed.
        directory: RequiredDirectory,
        /// Resolved path of the directory.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Ensures `logs`, `conf` and `data` exist below the home path.
///
/// Directories are created with default permissions, parents included, and
/// never removed. Provisioning an already complete layout is a no-op.
#[derive(Debug, Clone)]
pub struct DirectoryProvisioner {
    layout: HomeLayout,
}

impl DirectoryProvisioner {
    /// Provisioner for the given layout.
    #[must_use]
    pub const fn new(layout: HomeLayout) -> Self {
        Self { layout }
    }

    /// Home directory being provisioned.
    #[must_use]
    pub fn home(&self) -> &Utf8Path {
        self.layout.home()
    }

    /// Creates every required directory, reporting each resolved path first.
    ///
    /// Stops at the first directory that cannot be created.
    pub fn provision(
        &self,
        reporter: &dyn HealthReporter,
    ) -> Result<Vec<Utf8PathBuf>, ProvisioningError> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);

        self.layout
            .required_directories()
            .map(|(directory, path)| {
                reporter.directory_resolved(directory, &path);
                match builder.create(path.as_std_path()) {
                    Ok(()) => Ok(path),
                    Err(source) => Err(ProvisioningError::CreateDirectory {
                        directory,
                        path,
                        source,
                    }),
                }
            })
            .collect()
    }
}
