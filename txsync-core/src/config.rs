//! Sync settings.
//!
//! # Storage layout
//!
//! ```text
//! ~/.txsync/
//!   config.yaml   (optional: every field falls back to its default)
//! ```
//!
//! # API pattern
//!
//! - `load_at(home: &Path)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `load_at`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};
use crate::types::ProjectSlug;

/// Placeholder substituted in [`SyncSettings::release_project_template`].
pub const RELEASE_NAME_PLACEHOLDER: &str = "{release_name}";

/// Where the main and release projects live and how to reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub organization: String,
    pub main_project: ProjectSlug,
    /// Release project slug, with `{release_name}` replaced by the release.
    pub release_project_template: String,
    pub api_base_url: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            organization: "open-edx".to_string(),
            main_project: ProjectSlug::from("openedx-translations"),
            release_project_template: format!("openedx-translations-{RELEASE_NAME_PLACEHOLDER}"),
            api_base_url: "https://rest.api.transifex.com".to_string(),
        }
    }
}

impl SyncSettings {
    /// Release project slug for `release_name` (lower-cased, e.g. `redwood`).
    pub fn release_project(&self, release_name: &str) -> ProjectSlug {
        ProjectSlug::from(
            self.release_project_template
                .replace(RELEASE_NAME_PLACEHOLDER, &release_name.to_lowercase()),
        )
    }
}

/// `<home>/.txsync/config.yaml`: pure, no I/O.
pub fn settings_path_at(home: &Path) -> PathBuf {
    home.join(".txsync").join("config.yaml")
}

/// Load settings from `<home>/.txsync/config.yaml`, or defaults when absent.
///
/// Returns `ConfigError::Parse` (with path) if the file is malformed.
pub fn load_at(home: &Path) -> Result<SyncSettings, ConfigError> {
    let path = settings_path_at(home);
    if !path.exists() {
        return Ok(SyncSettings::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    if contents.trim().is_empty() {
        return Ok(SyncSettings::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<SyncSettings, ConfigError> {
    load_at(&home()?)
}

pub(crate) fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}
