//! Error types for configuration operations

use std::path::PathBuf;
use thiserror::Error;

use crate::profile::ProfileError;

/// Errors while loading the config file or activating a profile
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to locate the configuration file")]
    Locate(#[source] confy::ConfyError),

    #[error("failed to load configuration from {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("the configuration must have at least one profile")]
    NoProfiles,

    #[error("profile '{name}' not found (available: {available})")]
    ProfileNotFound { name: String, available: String },

    #[error("profile '{name}' is invalid")]
    InvalidProfile {
        name: String,
        #[source]
        source: ProfileError,
    },
}
