//! Base URL handling and the persisted configuration contract.
//!
//! The client is unusable until the user supplies the root address of the
//! backend. The address is normalised once, on entry, and from then on every
//! request path is built from the normalised [`BaseUrl`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path of the todo collection relative to the base URL
pub const TODOS_PATH: &str = "/api/todos";

/// Errors raised while entering, loading or persisting the base URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The submitted URL was empty after trimming.
    #[error("Base URL cannot be empty")]
    EmptyBaseUrl,

    /// An operation needing the backend was issued before a base URL was set.
    #[error("Base URL is not configured")]
    NotConfigured,

    /// Reading or writing the persisted configuration failed.
    #[error("Configuration storage error: {0}")]
    Storage(String),

    /// The persisted configuration could not be decoded.
    #[error("Configuration is malformed: {0}")]
    Malformed(String),
}

/// Normalised root address of the backend API.
///
/// Surrounding whitespace and every trailing `/` are removed, so
/// `"https://api.example.com/"` and `"https://api.example.com"` are the same
/// base URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Normalise user input into a base URL
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBaseUrl`] if nothing but whitespace and
    /// slashes was entered.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let cleaned = input.trim().trim_end_matches('/');
        if cleaned.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        Ok(Self(cleaned.to_string()))
    }

    /// The normalised URL
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{base}/api/todos`
    #[must_use]
    pub fn todos_url(&self) -> String {
        format!("{}{TODOS_PATH}", self.0)
    }

    /// `{base}/api/todos/{id}`
    #[must_use]
    pub fn todo_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}{TODOS_PATH}/{id}", self.0)
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BaseUrl {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BaseUrl> for String {
    fn from(url: BaseUrl) -> Self {
        url.0
    }
}

/// Persisted client configuration.
///
/// Holds a single value that survives across sessions until the user
/// replaces it.
///
/// # Implementations
///
/// - `FileConfigStore` (in the `tasklist` crate): JSON file on disk
/// - `MemoryConfigStore` (in `tasklist-testing`): in-memory, for tests
pub trait ConfigStore: Send + Sync {
    /// Load the stored base URL, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] or [`ConfigError::Malformed`] when
    /// the backing storage exists but cannot be read.
    fn load(&self) -> Result<Option<BaseUrl>, ConfigError>;

    /// Persist the base URL, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] if the value could not be written.
    fn save(&self, base_url: &BaseUrl) -> Result<(), ConfigError>;
}
