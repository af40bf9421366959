//! reqwest implementation of [`TodoApi`]

use crate::envelope::ApiResponse;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tasklist_core::config::BaseUrl;
use tasklist_core::remote::{ApiFuture, RemoteError, RemoteOperation, TodoApi};
use tasklist_core::todo::{NewTodo, Todo, TodoId};

/// Longest raw body quoted back in an error message
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the todo backend
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Clone, Debug, Default)]
pub struct HttpTodoApi {
    client: Client,
}

impl HttpTodoApi {
    /// Create a client with reqwest defaults (no request timeout)
    #[must_use]
    pub fn new() -> Self {
        Self::from_client(Client::new())
    }

    /// Create a client whose requests give up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::RequestFailed` if the TLS backend cannot be
    /// initialised.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::RequestFailed(e.to_string()))?;
        Ok(Self::from_client(client))
    }

    /// Wrap an already configured reqwest client
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_list(&self, base_url: &BaseUrl) -> Result<Vec<Todo>, RemoteError> {
        let operation = RemoteOperation::List;
        let envelope = Self::execute(self.client.get(base_url.todos_url()), operation).await?;
        let message = envelope.message_or(operation);

        match envelope.data {
            Some(items @ Value::Array(_)) => serde_json::from_value(items)
                .map_err(|e| RemoteError::ResponseParseFailed(e.to_string())),
            _ => Err(RemoteError::Server { message }),
        }
    }

    async fn send_write(
        &self,
        request: RequestBuilder,
        operation: RemoteOperation,
    ) -> Result<(), RemoteError> {
        // The body of a successful write is ignored; callers re-list
        Self::execute(request, operation).await.map(|_| ())
    }

    /// Send a request and decode a successful envelope
    async fn execute(
        request: RequestBuilder,
        operation: RemoteOperation,
    ) -> Result<ApiResponse, RemoteError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = operation.method(), error = %e, "Request failed");
            RemoteError::RequestFailed(e.to_string())
        })?;

        let status = response.status();
        tracing::debug!(
            method = operation.method(),
            url = %response.url(),
            status = status.as_u16(),
            "Response received"
        );

        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::RequestFailed(e.to_string()))?;

        let result = decode(status, &body, operation);
        if let Err(error) = &result {
            tracing::warn!(method = operation.method(), %error, "Request rejected");
        }
        result
    }
}

/// Apply the envelope rules to a raw response
fn decode(
    status: StatusCode,
    body: &str,
    operation: RemoteOperation,
) -> Result<ApiResponse, RemoteError> {
    match serde_json::from_str::<ApiResponse>(body) {
        Ok(envelope) if status.is_success() || !envelope.is_success() => {
            envelope.into_success(operation)
        },
        Ok(envelope) => Err(RemoteError::Http {
            status: status.as_u16(),
            message: if envelope.message.trim().is_empty() {
                reason(status)
            } else {
                envelope.message
            },
        }),
        Err(error) if status.is_success() => {
            Err(RemoteError::ResponseParseFailed(error.to_string()))
        },
        Err(_) => Err(RemoteError::Http {
            status: status.as_u16(),
            message: if body.trim().is_empty() {
                reason(status)
            } else {
                body.trim().chars().take(MAX_ERROR_BODY).collect()
            },
        }),
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

impl TodoApi for HttpTodoApi {
    fn list<'a>(&'a self, base_url: &'a BaseUrl) -> ApiFuture<'a, Vec<Todo>> {
        Box::pin(self.fetch_list(base_url))
    }

    fn create<'a>(&'a self, base_url: &'a BaseUrl, todo: &'a NewTodo) -> ApiFuture<'a, ()> {
        let request = self.client.post(base_url.todos_url()).json(todo);
        Box::pin(self.send_write(request, RemoteOperation::Create))
    }

    fn update<'a>(&'a self, base_url: &'a BaseUrl, todo: &'a Todo) -> ApiFuture<'a, ()> {
        let request = self.client.put(base_url.todo_url(todo.id)).json(todo);
        Box::pin(self.send_write(request, RemoteOperation::Update))
    }

    fn delete<'a>(&'a self, base_url: &'a BaseUrl, id: TodoId) -> ApiFuture<'a, ()> {
        let request = self.client.delete(base_url.todo_url(id));
        Box::pin(self.send_write(request, RemoteOperation::Delete))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success() {
        let envelope = decode(
            StatusCode::OK,
            r#"{"status":"success","message":"ok","data":[]}"#,
            RemoteOperation::List,
        )
        .unwrap();
        assert_eq!(envelope.data, Some(Value::Array(vec![])));
    }

    #[test]
    fn test_decode_error_envelope_on_ok_status() {
        let err = decode(
            StatusCode::OK,
            r#"{"status":"error","message":"Title is required"}"#,
            RemoteOperation::Create,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RemoteError::Server {
                message: "Title is required".into()
            }
        );
    }

    #[test]
    fn test_decode_error_envelope_on_404() {
        let err = decode(
            StatusCode::NOT_FOUND,
            r#"{"status":"error","message":""}"#,
            RemoteOperation::Update,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RemoteError::Server {
                message: "Failed to update todo".into()
            }
        );
    }

    #[test]
    fn test_decode_plain_text_failure() {
        let err = decode(
            StatusCode::BAD_GATEWAY,
            "upstream unavailable",
            RemoteOperation::List,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RemoteError::Http {
                status: 502,
                message: "upstream unavailable".into()
            }
        );

        let err = decode(StatusCode::SERVICE_UNAVAILABLE, "", RemoteOperation::List).unwrap_err();
        assert_eq!(
            err,
            RemoteError::Http {
                status: 503,
                message: "Service Unavailable".into()
            }
        );
    }

    #[test]
    fn test_decode_garbage_on_ok_status() {
        let err = decode(StatusCode::OK, "<html>", RemoteOperation::List).unwrap_err();
        assert!(matches!(err, RemoteError::ResponseParseFailed(_)));
    }
}
