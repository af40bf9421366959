//! Application state and actions for the tasklist client.
//!
//! [`TodoState`] is the only place the client keeps anything: the backend
//! address, the last list the server returned, the active filter, the
//! request chain in flight and its queue, and transient notifications.

use std::collections::VecDeque;
use std::sync::Arc;
use tasklist_core::config::{BaseUrl, ConfigError};
use tasklist_core::remote::{RemoteError, RemoteOperation};
use tasklist_core::todo::{Filter, NewTodo, Todo, TodoDraft, TodoId, TodoStats};
use tasklist_core::{DateTime, Utc};
use tokio::sync::watch;

/// Whether a backend address is known
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Connection {
    /// No base URL yet; everything but configuration is blocked
    #[default]
    Unconfigured,
    /// Requests go to this base URL
    Configured(BaseUrl),
}

/// Identifier of one request chain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw token value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of write a chain started with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    /// `POST`
    Create,
    /// `PUT` of an edited record
    Update,
    /// `PUT` with `completed` flipped to the given value
    Toggle {
        /// New completion state
        completed: bool,
    },
    /// `DELETE`
    Delete,
}

impl MutationKind {
    /// Remote call this mutation maps to
    #[must_use]
    pub const fn operation(self) -> RemoteOperation {
        match self {
            Self::Create => RemoteOperation::Create,
            Self::Update | Self::Toggle { .. } => RemoteOperation::Update,
            Self::Delete => RemoteOperation::Delete,
        }
    }

    /// Notification shown once the write and its refresh have settled
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Create => "Todo added",
            Self::Update => "Todo updated",
            Self::Toggle { completed: true } => "Todo completed",
            Self::Toggle { completed: false } => "Todo reopened",
            Self::Delete => "Todo deleted",
        }
    }

    /// Prefix of the failure notification
    #[must_use]
    pub const fn failure_context(self) -> &'static str {
        match self {
            Self::Toggle { .. } => "Failed to change status",
            other => other.operation().fallback_message(),
        }
    }
}

/// Highest token whose chain has finished
///
/// Chains run in token order, so every token at or below the watermark is
/// done. Clones of the state share the same watermark.
#[derive(Clone, Debug)]
struct Watermark(Arc<watch::Sender<u64>>);

impl Default for Watermark {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self(Arc::new(tx))
    }
}

impl Watermark {
    fn advance(&self, to: u64) {
        self.0.send_modify(|settled| *settled = (*settled).max(to));
    }
}

/// Where the chain in flight currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the write itself
    Mutating(MutationKind),
    /// Waiting for the list, optionally following a successful write
    Refreshing {
        /// The write this refresh follows, if any
        after: Option<MutationKind>,
    },
}

/// The single request chain allowed in flight
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InFlight {
    /// Token every result of this chain must carry
    pub token: RequestToken,
    /// Current step
    pub phase: Phase,
}

/// A request waiting for its turn
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    /// Re-fetch the list
    Refresh,
    /// Create from a prepared body
    Create(NewTodo),
    /// Replace with an edited record
    Update(Todo),
    /// Flip completion of whatever the server last said about this id
    Toggle(TodoId),
    /// Delete by id
    Delete(TodoId),
}

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// Something worked
    Success,
    /// Something failed
    Error,
}

/// Transient user feedback
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    /// Identifier used to dismiss it
    pub id: u64,
    /// Severity
    pub level: Level,
    /// Short heading
    pub title: String,
    /// Body text
    pub message: String,
}

impl Notification {
    /// Whether this reports a failure
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.level, Level::Error)
    }
}

/// State of the client
#[derive(Clone, Debug, Default)]
pub struct TodoState {
    /// Backend address, if known
    pub connection: Connection,
    /// Last list returned by the server, in server order
    pub todos: Vec<Todo>,
    /// Active filter
    pub filter: Filter,
    /// Chain currently awaiting the server
    pub in_flight: Option<InFlight>,
    /// Requests issued while a chain was in flight, with the token each
    /// will run under
    pub queue: VecDeque<(RequestToken, Request)>,
    /// Feedback not yet dismissed, oldest first
    pub notifications: Vec<Notification>,
    next_token: u64,
    next_notification_id: u64,
    settled: Watermark,
}

impl TodoState {
    /// Creates an unconfigured, empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state already pointing at `base_url`
    #[must_use]
    pub fn configured(base_url: BaseUrl) -> Self {
        Self {
            connection: Connection::Configured(base_url),
            ..Self::default()
        }
    }

    /// The configured base URL
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        match &self.connection {
            Connection::Configured(url) => Some(url),
            Connection::Unconfigured => None,
        }
    }

    /// Whether a base URL is set
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        matches!(self.connection, Connection::Configured(_))
    }

    /// Whether a chain is in flight or waiting
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || !self.queue.is_empty()
    }

    /// Todos selected by the active filter, in server order
    #[must_use]
    pub fn filtered_todos(&self) -> Vec<&Todo> {
        self.filter.apply(&self.todos).collect()
    }

    /// Counts over the whole list
    #[must_use]
    pub fn stats(&self) -> TodoStats {
        TodoStats::of(&self.todos)
    }

    /// Number of open todos past their due date
    #[must_use]
    pub fn overdue_count(&self, now: DateTime<Utc>) -> usize {
        self.todos.iter().filter(|todo| todo.is_overdue(now)).count()
    }

    /// Todo with this id in the last fetched list
    #[must_use]
    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    /// Whether any pending notification reports a failure
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.notifications.iter().any(Notification::is_error)
    }

    /// Whether the chain carrying `token` has finished or been discarded
    #[must_use]
    pub fn is_settled(&self, token: RequestToken) -> bool {
        *self.settled.0.borrow() >= token.0
    }

    pub(crate) fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }

    pub(crate) fn settle(&self, token: RequestToken) {
        self.settled.advance(token.0);
    }

    /// Marks every token issued so far as finished
    pub(crate) fn settle_all(&self) {
        self.settle(RequestToken(self.next_token));
    }

    /// Resolves once the chain carrying `token` has finished
    pub(crate) fn until_settled(
        &self,
        token: RequestToken,
    ) -> impl Future<Output = ()> + Send + use<> {
        let mut settled = self.settled.0.subscribe();
        async move {
            loop {
                let current = *settled.borrow_and_update();
                if current >= token.0 || settled.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    pub(crate) fn push_notification(&mut self, level: Level, message: impl Into<String>) -> u64 {
        self.next_notification_id += 1;
        let title = match level {
            Level::Success => "Success",
            Level::Error => "Error",
        };
        self.notifications.push(Notification {
            id: self.next_notification_id,
            level,
            title: title.to_string(),
            message: message.into(),
        });
        self.next_notification_id
    }
}

/// Everything the reducer reacts to
#[derive(Clone, Debug)]
pub enum TodoAction {
    // ========== Configuration ==========
    /// Load the stored base URL
    Start,

    /// Result of loading the stored base URL
    ConfigLoaded {
        /// Stored value, if any
        result: Result<Option<BaseUrl>, ConfigError>,
    },

    /// User submitted a base URL (first-run prompt or settings)
    SaveBaseUrl {
        /// Raw input
        input: String,
    },

    /// Persisting the base URL failed
    ConfigPersistFailed {
        /// Storage error
        error: ConfigError,
    },

    // ========== User commands ==========
    /// Change the active filter
    SetFilter {
        /// New filter
        filter: Filter,
    },

    /// Re-fetch the list
    Refresh,

    /// Create a todo
    CreateTodo {
        /// User input
        draft: TodoDraft,
    },

    /// Replace a todo with an edited copy
    UpdateTodo {
        /// Complete record, including unchanged fields
        todo: Todo,
    },

    /// Flip completion
    ToggleComplete {
        /// Todo to flip
        id: TodoId,
    },

    /// Delete a todo
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    /// Remove one notification
    DismissNotification {
        /// Notification id
        id: u64,
    },

    /// Remove all notifications
    DismissNotifications,

    // ========== Request results ==========
    /// A write finished
    MutationCompleted {
        /// Chain the write belonged to
        token: RequestToken,
        /// Outcome
        result: Result<(), RemoteError>,
    },

    /// A list fetch finished
    TodosLoaded {
        /// Chain the fetch belonged to
        token: RequestToken,
        /// Outcome
        result: Result<Vec<Todo>, RemoteError>,
    },
}
