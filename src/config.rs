//! Startup configuration loaded from an optional JSON file.
//!
//! Every section and field is optional; anything left out keeps the default
//! from the matching settings resource.
//!
//! ```json
//! {
//!   "navigation": { "step": 0.08 },
//!   "proximity": { "zone": { "half_extent": 2.0 } },
//!   "tween": { "overwrite": "overlap" }
//! }
//! ```
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[cfg(feature = "render")]
use crate::model::ModelSettings;
use crate::navigation::NavigationSettings;
use crate::proximity::ProximitySettings;
use crate::tween::TweenSettings;

/// A configuration file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not valid configuration JSON.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that was requested.
        path: PathBuf,
        /// Underlying parse failure, with line and column.
        source: serde_json::Error,
    },
}

/// All runtime settings, as read from a config file.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StrollConfig {
    /// Walking step and arrival tolerance.
    pub navigation: NavigationSettings,
    /// House trigger zone and transitions.
    pub proximity: ProximitySettings,
    /// Tween overwrite policy.
    pub tween: TweenSettings,
    /// Model asset paths and clip keys.
    #[cfg(feature = "render")]
    pub models: ModelSettings,
}

impl StrollConfig {
    /// Parses configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the parser error when `json` is malformed or has unknown
    /// sections.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses the JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if its contents are invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Installs every section as a resource.
    ///
    /// Call before adding the plugins; they only insert defaults for
    /// resources that are still missing.
    pub fn apply(self, app: &mut App) {
        app.insert_resource(self.navigation)
            .insert_resource(self.proximity)
            .insert_resource(self.tween);
        #[cfg(feature = "render")]
        app.insert_resource(self.models);
    }
}
