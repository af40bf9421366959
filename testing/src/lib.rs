//! # Tasklist Testing
//!
//! Testing utilities and helpers for the tasklist client.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - An in-memory stand-in for the remote todo store
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::{InMemoryTodoApi, MemoryConfigStore, test_clock};
//!
//! #[tokio::test]
//! async fn test_create_then_list() {
//!     let api = Arc::new(InMemoryTodoApi::new());
//!     let config = Arc::new(MemoryConfigStore::new());
//!     let env = TodoEnvironment::new(api.clone(), config, Arc::new(test_clock()));
//!     let store = Store::new(TodoState::default(), TodoReducer::new(), env);
//!     // ...
//!     assert_eq!(api.todos().len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use tasklist_core::environment::Clock;

/// In-memory remote todo store
pub mod remote;

/// Given-When-Then harness for reducers
pub mod reducer_test;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Mutex, MutexGuard, PoisonError};
    use tasklist_core::config::{BaseUrl, ConfigError, ConfigStore};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making `createdAt` stamps, default due
    /// dates and overdue checks reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::FixedClock;
    /// use tasklist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-06-15 09:30:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-06-15T09:30:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    #[derive(Debug, Default)]
    struct ConfigSlot {
        stored: Option<BaseUrl>,
        saves: usize,
        fail_saves: bool,
        fail_loads: bool,
    }

    /// In-memory [`ConfigStore`]
    #[derive(Debug, Default)]
    pub struct MemoryConfigStore {
        slot: Mutex<ConfigSlot>,
    }

    impl MemoryConfigStore {
        /// Empty store: the client starts unconfigured
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Store that already holds a base URL
        #[must_use]
        pub fn with_base_url(base_url: BaseUrl) -> Self {
            let store = Self::new();
            store.slot().stored = Some(base_url);
            store
        }

        /// Make every `save` fail with a storage error
        #[must_use]
        pub fn failing_saves(self) -> Self {
            self.slot().fail_saves = true;
            self
        }

        /// Make every `load` fail with a storage error
        #[must_use]
        pub fn failing_loads(self) -> Self {
            self.slot().fail_loads = true;
            self
        }

        /// What is currently persisted
        #[must_use]
        pub fn stored(&self) -> Option<BaseUrl> {
            self.slot().stored.clone()
        }

        /// How many successful saves happened
        #[must_use]
        pub fn save_count(&self) -> usize {
            self.slot().saves
        }

        fn slot(&self) -> MutexGuard<'_, ConfigSlot> {
            self.slot.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl ConfigStore for MemoryConfigStore {
        fn load(&self) -> Result<Option<BaseUrl>, ConfigError> {
            let slot = self.slot();
            if slot.fail_loads {
                return Err(ConfigError::Storage("simulated load failure".into()));
            }
            Ok(slot.stored.clone())
        }

        fn save(&self, base_url: &BaseUrl) -> Result<(), ConfigError> {
            let mut slot = self.slot();
            if slot.fail_saves {
                return Err(ConfigError::Storage("simulated save failure".into()));
            }
            slot.stored = Some(base_url.clone());
            slot.saves += 1;
            Ok(())
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, MemoryConfigStore, test_clock};
pub use reducer_test::{ReducerTest, assertions, resolve_effects};
pub use remote::{InMemoryTodoApi, RecordedRequest, todo_fixture};
