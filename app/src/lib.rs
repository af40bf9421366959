//! Task-list client that keeps a local view in sync with a remote todo API.
//!
//! The client owns no data of its own. Every write goes to the backend and
//! is followed by a full re-list; the local list is always the server's.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklist::{FileConfigStore, TodoAction, TodoEnvironment, TodoReducer, TodoState};
//! use tasklist_core::environment::SystemClock;
//! use tasklist_core::todo::TodoDraft;
//! use tasklist_rest::HttpTodoApi;
//! use tasklist_runtime::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::new(
//!     Arc::new(HttpTodoApi::new()),
//!     Arc::new(FileConfigStore::new("tasklist.json")),
//!     Arc::new(SystemClock),
//! );
//! let store = Store::new(TodoState::new(), TodoReducer::new(), env);
//!
//! // Point the client at a backend; this also fetches the list
//! store
//!     .send(TodoAction::SaveBaseUrl {
//!         input: "http://localhost:3000/".to_string(),
//!     })
//!     .await?
//!     .wait()
//!     .await;
//!
//! // Create a todo; the list is re-fetched once the server accepts it
//! store
//!     .send(TodoAction::CreateTodo {
//!         draft: TodoDraft::titled("Buy milk"),
//!     })
//!     .await?
//!     .wait()
//!     .await;
//!
//! let stats = store.state(TodoState::stats).await;
//! println!("{} todos, {} pending", stats.total, stats.pending);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::{FileConfigStore, resolve_config_path};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use types::{
    Connection, InFlight, Level, MutationKind, Notification, Phase, Request, RequestToken,
    TodoAction, TodoState,
};
