//! # Tasklist REST client
//!
//! reqwest implementation of the [`TodoApi`](tasklist_core::remote::TodoApi)
//! contract against a backend exposing `/api/todos`.
//!
//! ## Example
//!
//! ```no_run
//! use tasklist_core::config::BaseUrl;
//! use tasklist_core::remote::TodoApi;
//! use tasklist_rest::HttpTodoApi;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = HttpTodoApi::new();
//!     let base_url = BaseUrl::parse("http://localhost:3000/")?;
//!
//!     for todo in api.list(&base_url).await? {
//!         println!("#{} {}", todo.id, todo.title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every response is expected to be wrapped in an
//! [`ApiResponse`](envelope::ApiResponse) envelope. Transport errors,
//! non-success statuses and `status: "error"` envelopes all surface as
//! [`RemoteError`](tasklist_core::remote::RemoteError).

pub mod client;
pub mod envelope;

pub use client::HttpTodoApi;
pub use envelope::{ApiResponse, ResponseStatus};
