//! The remote todo store contract.
//!
//! The backend is externally owned; this module only describes the four calls
//! the client depends on and the errors they can end in.
//!
//! # Implementations
//!
//! - `HttpTodoApi` (in `tasklist-rest`): reqwest client speaking the JSON envelope
//! - `InMemoryTodoApi` (in `tasklist-testing`): deterministic stand-in for tests

use crate::config::BaseUrl;
use crate::todo::{NewTodo, Todo, TodoId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by [`TodoApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

/// The four calls of the REST contract
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    /// `GET /api/todos`
    List,
    /// `POST /api/todos`
    Create,
    /// `PUT /api/todos/:id`
    Update,
    /// `DELETE /api/todos/:id`
    Delete,
}

impl RemoteOperation {
    /// Message used when the server reports an error without one
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch todos",
            Self::Create => "Failed to add todo",
            Self::Update => "Failed to update todo",
            Self::Delete => "Failed to delete todo",
        }
    }

    /// HTTP method of the call
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::List => "GET",
            Self::Create => "POST",
            Self::Update => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Transport and server failures.
///
/// Every variant carries plain strings so results can travel inside
/// cloneable actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced a response (DNS, refused connection, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with an error envelope
    #[error("{message}")]
    Server {
        /// Message from the envelope, or the operation's fallback
        message: String,
    },

    /// The server answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http {
        /// Status code
        status: u16,
        /// Envelope message or raw body
        message: String,
    },

    /// The response body was not a valid envelope
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),
}

/// Client side of the remote todo store.
///
/// Every call takes the base URL explicitly: the URL belongs to the
/// application state and may change at runtime, the transport does not.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures instead of using `async fn` so the API can
/// be held as `Arc<dyn TodoApi>` and captured by effects.
pub trait TodoApi: Send + Sync {
    /// Fetch the full list, in server order.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`] on transport failure, a non-success status,
    /// an error envelope, or a payload that is not a list of todos.
    fn list<'a>(&'a self, base_url: &'a BaseUrl) -> ApiFuture<'a, Vec<Todo>>;

    /// Create a todo. The response body is not trusted; callers re-list.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TodoApi::list`].
    fn create<'a>(&'a self, base_url: &'a BaseUrl, todo: &'a NewTodo) -> ApiFuture<'a, ()>;

    /// Replace a todo with the complete record.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TodoApi::list`].
    fn update<'a>(&'a self, base_url: &'a BaseUrl, todo: &'a Todo) -> ApiFuture<'a, ()>;

    /// Delete a todo.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TodoApi::list`].
    fn delete<'a>(&'a self, base_url: &'a BaseUrl, id: TodoId) -> ApiFuture<'a, ()>;
}
