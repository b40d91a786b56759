//! Configuration file
//!
//! This module re-exports the shared types from matchcue-types and provides
//! persistence and profile activation for [`MatchCueConfig`].

mod error;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use error::ConfigError;
pub use matchcue_types::{
    AudioSettings, DEFAULT_PROFILE, EventConfig, MatchCueConfig, ProfileConfig,
};

use crate::profile::Profile;

const APP_NAME: &str = "matchcue";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// MatchCueConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for config persistence and profile activation
pub trait MatchCueConfigExt: Sized {
    /// Path of the config file: `path` if given, else the platform default.
    fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError>;

    /// Load the config file, writing the default configuration first if the
    /// file does not exist yet.
    fn load_from(path: Option<&Path>) -> Result<Self, ConfigError>;

    fn profile_names(&self) -> Vec<String>;

    /// Resolve and validate the named profile.
    fn activate_profile(&self, name: &str) -> Result<Profile, ConfigError>;
}

impl MatchCueConfigExt for MatchCueConfig {
    fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
                .map_err(ConfigError::Locate),
        }
    }

    fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::resolve_path(path)?;
        let existed = path.exists();

        let config: MatchCueConfig =
            confy::load_path(&path).map_err(|source| ConfigError::Load {
                path: path.clone(),
                source,
            })?;

        if existed {
            debug!(path = %path.display(), "Configuration loaded");
        } else {
            info!(path = %path.display(), "Default configuration written");
        }

        if config.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }
        Ok(config)
    }

    fn profile_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    fn activate_profile(&self, name: &str) -> Result<Profile, ConfigError> {
        let config = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
                available: self.profile_names().join(", "),
            })?;

        Profile::from_config(config).map_err(|source| ConfigError::InvalidProfile {
            name: name.to_string(),
            source,
        })
    }
}
