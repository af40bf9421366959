//! In-memory stand-in for the remote todo store.
//!
//! Behaves like the real backend (assigns ids, replaces records, deletes)
//! and records every request so tests can assert on what went over the wire
//! and in which order.

use chrono::{DateTime, Utc};
use serde_json::Map;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tasklist_core::config::BaseUrl;
use tasklist_core::remote::{ApiFuture, RemoteError, RemoteOperation, TodoApi};
use tasklist_core::todo::{NewTodo, Todo, TodoId};

/// One call made against [`InMemoryTodoApi`]
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedRequest {
    /// `GET /api/todos`
    List {
        /// Base URL the request was addressed to
        base_url: BaseUrl,
    },
    /// `POST /api/todos`
    Create {
        /// Base URL the request was addressed to
        base_url: BaseUrl,
        /// Request body
        body: NewTodo,
    },
    /// `PUT /api/todos/:id`
    Update {
        /// Base URL the request was addressed to
        base_url: BaseUrl,
        /// Request body, the complete record
        body: Todo,
    },
    /// `DELETE /api/todos/:id`
    Delete {
        /// Base URL the request was addressed to
        base_url: BaseUrl,
        /// Path id
        id: TodoId,
    },
}

impl RecordedRequest {
    /// Which of the four calls this was
    #[must_use]
    pub const fn operation(&self) -> RemoteOperation {
        match self {
            Self::List { .. } => RemoteOperation::List,
            Self::Create { .. } => RemoteOperation::Create,
            Self::Update { .. } => RemoteOperation::Update,
            Self::Delete { .. } => RemoteOperation::Delete,
        }
    }

    /// Base URL the request was addressed to
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        match self {
            Self::List { base_url }
            | Self::Create { base_url, .. }
            | Self::Update { base_url, .. }
            | Self::Delete { base_url, .. } => base_url,
        }
    }
}

#[derive(Debug, Default)]
struct Backend {
    todos: Vec<Todo>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    failures: VecDeque<(RemoteOperation, RemoteError)>,
    in_flight: usize,
    max_in_flight: usize,
}

/// In-memory [`TodoApi`]
///
/// # Example
///
/// ```
/// use tasklist_testing::InMemoryTodoApi;
/// use tasklist_core::remote::{RemoteError, RemoteOperation};
///
/// let api = InMemoryTodoApi::new();
/// api.fail_next(RemoteOperation::List, RemoteError::RequestFailed("offline".into()));
/// assert!(api.requests().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTodoApi {
    backend: Mutex<Backend>,
    latency: Option<Duration>,
}

impl InMemoryTodoApi {
    /// Empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with `todos`, in this order
    #[must_use]
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let api = Self::new();
        {
            let mut backend = api.backend();
            backend.next_id = todos.iter().map(|t| t.id.get()).max().unwrap_or(0);
            backend.todos = todos;
        }
        api
    }

    /// Delay every response by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next call of `operation` fail with `error`
    ///
    /// Failures are consumed in the order they were queued.
    pub fn fail_next(&self, operation: RemoteOperation, error: RemoteError) {
        self.backend().failures.push_back((operation, error));
    }

    /// Every request received so far, in arrival order
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.backend().requests.clone()
    }

    /// Operations received so far, in arrival order
    #[must_use]
    pub fn operations(&self) -> Vec<RemoteOperation> {
        self.backend()
            .requests
            .iter()
            .map(RecordedRequest::operation)
            .collect()
    }

    /// Current server-side records
    #[must_use]
    pub fn todos(&self) -> Vec<Todo> {
        self.backend().todos.clone()
    }

    /// Highest number of requests that were in progress at the same time
    #[must_use]
    pub fn max_concurrent_requests(&self) -> usize {
        self.backend().max_in_flight
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn call<T, F>(&self, request: RecordedRequest, apply: F) -> Result<T, RemoteError>
    where
        F: FnOnce(&mut Backend) -> Result<T, RemoteError>,
    {
        let operation = request.operation();
        {
            let mut backend = self.backend();
            backend.requests.push(request);
            backend.in_flight += 1;
            backend.max_in_flight = backend.max_in_flight.max(backend.in_flight);
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut backend = self.backend();
        backend.in_flight -= 1;
        if let Some(index) = backend.failures.iter().position(|(op, _)| *op == operation) {
            if let Some((_, error)) = backend.failures.remove(index) {
                return Err(error);
            }
        }
        apply(&mut backend)
    }
}

fn not_found() -> RemoteError {
    RemoteError::Server {
        message: "Todo not found".into(),
    }
}

fn stamp(body: &NewTodo, id: i64) -> Todo {
    Todo {
        id: TodoId::new(id),
        title: body.title.clone(),
        description: body.description.clone(),
        completed: body.completed,
        due_date: body.due_date.clone(),
        created_at: body.created_at.clone(),
        extra: Map::new(),
    }
}

impl TodoApi for InMemoryTodoApi {
    fn list<'a>(&'a self, base_url: &'a BaseUrl) -> ApiFuture<'a, Vec<Todo>> {
        let request = RecordedRequest::List {
            base_url: base_url.clone(),
        };
        Box::pin(self.call(request, |backend| Ok(backend.todos.clone())))
    }

    fn create<'a>(&'a self, base_url: &'a BaseUrl, todo: &'a NewTodo) -> ApiFuture<'a, ()> {
        let request = RecordedRequest::Create {
            base_url: base_url.clone(),
            body: todo.clone(),
        };
        Box::pin(self.call(request, move |backend| {
            backend.next_id += 1;
            let record = stamp(todo, backend.next_id);
            backend.todos.push(record);
            Ok(())
        }))
    }

    fn update<'a>(&'a self, base_url: &'a BaseUrl, todo: &'a Todo) -> ApiFuture<'a, ()> {
        let request = RecordedRequest::Update {
            base_url: base_url.clone(),
            body: todo.clone(),
        };
        Box::pin(self.call(request, move |backend| {
            let slot = backend
                .todos
                .iter_mut()
                .find(|existing| existing.id == todo.id)
                .ok_or_else(not_found)?;
            *slot = todo.clone();
            Ok(())
        }))
    }

    fn delete<'a>(&'a self, base_url: &'a BaseUrl, id: TodoId) -> ApiFuture<'a, ()> {
        let request = RecordedRequest::Delete {
            base_url: base_url.clone(),
            id,
        };
        Box::pin(self.call(request, move |backend| {
            let index = backend
                .todos
                .iter()
                .position(|existing| existing.id == id)
                .ok_or_else(not_found)?;
            backend.todos.remove(index);
            Ok(())
        }))
    }
}

/// Build a todo for fixtures
///
/// Due and creation dates are derived from `now` so fixtures stay stable
/// under a fixed clock.
#[must_use]
pub fn todo_fixture(id: i64, title: &str, completed: bool, now: DateTime<Utc>) -> Todo {
    Todo {
        id: TodoId::new(id),
        title: title.to_string(),
        description: String::new(),
        completed,
        due_date: now.date_naive().format("%Y-%m-%d").to_string(),
        created_at: now.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        extra: Map::new(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_clock;
    use tasklist_core::environment::Clock;
    use tasklist_core::todo::TodoDraft;

    fn url() -> BaseUrl {
        BaseUrl::parse("http://localhost:3000").unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_lists_in_order() {
        let now = test_clock().now();
        let api = InMemoryTodoApi::with_todos(vec![todo_fixture(4, "Existing", false, now)]);

        let body = TodoDraft::titled("New").into_new_todo(now);
        api.create(&url(), &body).await.unwrap();

        let todos = api.list(&url()).await.unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[1].id, TodoId::new(5));
        assert_eq!(todos[1].title, "New");
        assert_eq!(
            api.operations(),
            vec![RemoteOperation::Create, RemoteOperation::List]
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_record() {
        let api = InMemoryTodoApi::new();
        let ghost = todo_fixture(1, "Ghost", false, test_clock().now());

        assert_eq!(api.update(&url(), &ghost).await, Err(not_found()));
        assert_eq!(api.delete(&url(), ghost.id).await, Err(not_found()));
        assert_eq!(api.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_queued_failure_applies_once() {
        let api = InMemoryTodoApi::new();
        let offline = RemoteError::RequestFailed("offline".into());
        api.fail_next(RemoteOperation::List, offline.clone());

        assert_eq!(api.list(&url()).await, Err(offline));
        assert_eq!(api.list(&url()).await, Ok(Vec::new()));
    }
}
