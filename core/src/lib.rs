//! # Tasklist Core
//!
//! Core traits and domain types for the tasklist client.
//!
//! The client is built as a unidirectional data flow: a pure reducer owns the
//! application state, side effects are returned as values and executed by the
//! runtime, and every result is fed back into the reducer as a new action.
//!
//! ## Core Concepts
//!
//! - **State**: The client-side view of the remote todo store
//! - **Action**: All possible inputs to a reducer (user commands and request results)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits ([`environment::Clock`],
//!   [`remote::TodoApi`], [`config::ConfigStore`])
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_core::*;
//!
//! impl Reducer for TodoReducer {
//!     type State = TodoState;
//!     type Action = TodoAction;
//!     type Environment = TodoEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodoState,
//!         action: TodoAction,
//!         env: &TodoEnvironment,
//!     ) -> SmallVec<[Effect<TodoAction>; 4]> {
//!         // Synchronization logic goes here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDate, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Base URL handling and the persisted configuration contract
pub mod config;

/// Declarative macros for building effects
pub mod effect_macros;

/// The remote todo store contract and its error type
pub mod remote;

/// Todo records, filters and derived view values
pub mod todo;

/// Reducer module - The core trait for client logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all synchronization logic and are deterministic and testable.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for client logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce zero or one effect, so the result is kept
        /// inline in a `SmallVec`.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution).
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Delayed action (notification expiry)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation (HTTP calls, config persistence)
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Whether this effect does nothing when executed
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter. The remote store and configuration
/// contracts live in [`crate::remote`] and [`crate::config`].
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Used to stamp `createdAt`, to default `dueDate` to today, and to
    /// decide whether a todo is overdue.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`]
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

/// Error taxonomy shared by every layer of the client
pub mod error {
    use crate::config::ConfigError;
    use crate::remote::RemoteError;
    use thiserror::Error;

    /// Input rejected locally before any request is issued
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ValidationError {
        /// Todo title is empty or whitespace only
        #[error("Todo title cannot be empty")]
        EmptyTitle,
    }

    /// Any failure a user action can end in
    ///
    /// None of these are fatal: the reducer turns each into a transient
    /// notification and returns to an interactive state.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ClientError {
        /// Configuration missing, empty, or not persistable
        #[error(transparent)]
        Config(#[from] ConfigError),

        /// Local validation failed
        #[error(transparent)]
        Validation(#[from] ValidationError),

        /// Transport or server failure
        #[error(transparent)]
        Remote(#[from] RemoteError),
    }
}
