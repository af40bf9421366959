//! File-backed [`ConfigStore`] and config file discovery.
//!
//! The file holds a single JSON object, `{"baseUrl": "..."}`. A missing file
//! means the client has never been configured.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tasklist_core::config::{BaseUrl, ConfigError, ConfigStore};

/// File name under the per-user config directory
const CONFIG_FILE: &str = "config.json";

/// Directory name under `$XDG_CONFIG_HOME` / `~/.config`
const APP_DIR: &str = "tasklist";

/// Fallback when no home directory is known
const LOCAL_CONFIG_FILE: &str = "tasklist.json";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<BaseUrl>,
}

/// Base URL persisted as JSON on disk
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store backed by the file at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Option<BaseUrl>, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::Storage(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            },
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        let stored: StoredConfig = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Malformed(format!("{}: {e}", self.path.display())))?;
        Ok(stored.base_url)
    }

    fn save(&self, base_url: &BaseUrl) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Storage(format!("{}: {e}", parent.display())))?;
        }

        let stored = StoredConfig {
            base_url: Some(base_url.clone()),
        };
        let mut json = serde_json::to_string_pretty(&stored)
            .map_err(|e| ConfigError::Storage(e.to_string()))?;
        json.push('\n');

        std::fs::write(&self.path, json)
            .map_err(|e| ConfigError::Storage(format!("{}: {e}", self.path.display())))?;
        tracing::debug!(path = %self.path.display(), "base URL saved");
        Ok(())
    }
}

/// Pick the config file location.
///
/// An explicit path wins; otherwise `$XDG_CONFIG_HOME/tasklist/config.json`,
/// then `$HOME/.config/tasklist/config.json`, then `./tasklist.json`. Empty
/// values count as unset.
#[must_use]
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    let non_empty = |path: Option<PathBuf>| path.filter(|p| !p.as_os_str().is_empty());

    if let Some(path) = non_empty(explicit) {
        return path;
    }
    if let Some(dir) = non_empty(xdg_config_home) {
        return dir.join(APP_DIR).join(CONFIG_FILE);
    }
    if let Some(home) = non_empty(home) {
        return home.join(".config").join(APP_DIR).join(CONFIG_FILE);
    }
    PathBuf::from(LOCAL_CONFIG_FILE)
}
