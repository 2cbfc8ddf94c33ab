use std::env;

use camino::Utf8PathBuf;
use dirs::home_dir;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Name of the cluster membership file inside `<home>/conf`.
pub const CLUSTER_CONF_FILE_NAME: &str = "cluster.conf";

/// Name of the primary log file inside `<home>/logs`.
pub const LOG_FILE_NAME: &str = "kindle.log";

const HOME_DIR_NAME: &str = "kindle";

/// Default log filter expression.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Computes the default home directory: `<user home>/kindle`.
///
/// Hosts without a resolvable (or non UTF-8) user home fall back to the
/// temporary directory so startup can still provision its layout.
#[must_use]
pub fn default_home() -> Utf8PathBuf {
    let mut base = home_dir()
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
        .unwrap_or_else(fallback_base_directory);
    base.push(HOME_DIR_NAME);
    base
}

fn fallback_base_directory() -> Utf8PathBuf {
    let candidate = env::temp_dir();
    Utf8PathBuf::from_path_buf(candidate).unwrap_or_else(|_| Utf8PathBuf::from("/tmp"))
}
