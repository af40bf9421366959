//! The `{status, message, data}` envelope wrapping every API response

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tasklist_core::remote::{RemoteError, RemoteOperation};

/// Outcome reported inside the envelope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The call succeeded
    Success,
    /// The call failed; `message` says why
    Error,
}

/// Wire envelope
///
/// `data` is kept as raw JSON: depending on the call it holds a list, a
/// single todo, or nothing at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Success or error
    pub status: ResponseStatus,
    /// Human-readable message, empty when the server sent none
    #[serde(default)]
    pub message: String,
    /// Payload
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiResponse {
    /// Whether the server reported success
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Server message, or the operation's fallback when blank
    #[must_use]
    pub fn message_or(&self, operation: RemoteOperation) -> String {
        if self.message.trim().is_empty() {
            operation.fallback_message().to_string()
        } else {
            self.message.clone()
        }
    }

    /// Keeps a successful envelope, turning an error envelope into
    /// [`RemoteError::Server`]
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Server`] when the status is `error`.
    pub fn into_success(self, operation: RemoteOperation) -> Result<Self, RemoteError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RemoteError::Server {
                message: self.message_or(operation),
            })
        }
    }
}
