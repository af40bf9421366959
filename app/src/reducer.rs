//! The synchronization protocol between local state and the remote store.
//!
//! Every write is followed by a full re-list and the local list is only ever
//! replaced by what the server returned. One request chain runs at a time:
//! anything issued while a chain is in flight waits in a FIFO queue, and
//! results carrying a token other than the current one are dropped.

use crate::types::{
    Connection, InFlight, Level, MutationKind, Phase, Request, RequestToken, TodoAction,
    TodoState,
};
use std::sync::Arc;
use std::time::Duration;
use tasklist_core::config::{BaseUrl, ConfigError, ConfigStore};
use tasklist_core::environment::Clock;
use tasklist_core::error::{ClientError, ValidationError};
use tasklist_core::remote::{RemoteError, TodoApi};
use tasklist_core::todo::{Todo, TodoId};
use tasklist_core::{SmallVec, async_effect, delay, effect::Effect, reducer::Reducer};

type Effects = SmallVec<[Effect<TodoAction>; 4]>;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Remote todo store
    pub api: Arc<dyn TodoApi>,
    /// Persisted base URL
    pub config: Arc<dyn ConfigStore>,
    /// Clock for `createdAt` stamps and default due dates
    pub clock: Arc<dyn Clock>,
    /// Auto-dismiss notifications after this long; kept until dismissed when `None`
    pub notification_ttl: Option<Duration>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(
        api: Arc<dyn TodoApi>,
        config: Arc<dyn ConfigStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            config,
            clock,
            notification_ttl: None,
        }
    }

    /// Auto-dismiss notifications after `ttl`
    #[must_use]
    pub const fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = Some(ttl);
        self
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("notification_ttl", &self.notification_ttl)
            .finish_non_exhaustive()
    }
}

/// Reducer for the tasklist client
#[derive(Clone, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn notify(
        state: &mut TodoState,
        env: &TodoEnvironment,
        level: Level,
        message: String,
        effects: &mut Effects,
    ) {
        let id = state.push_notification(level, message);
        if let Some(ttl) = env.notification_ttl {
            effects.push(delay! {
                duration: ttl,
                action: TodoAction::DismissNotification { id }
            });
        }
    }

    fn fail(
        state: &mut TodoState,
        env: &TodoEnvironment,
        context: Option<&str>,
        error: impl Into<ClientError>,
        effects: &mut Effects,
    ) {
        let error = error.into();
        let message = match context {
            Some(context) => format!("{context}: {error}"),
            None => error.to_string(),
        };
        tracing::warn!(%message, "action failed");
        Self::notify(state, env, Level::Error, message, effects);
    }

    /// Switch to `base_url`, dropping everything tied to the previous one
    fn configure(
        state: &mut TodoState,
        env: &TodoEnvironment,
        base_url: BaseUrl,
        effects: &mut Effects,
    ) {
        tracing::info!(base_url = %base_url, "backend configured");
        state.connection = Connection::Configured(base_url);
        state.todos.clear();
        state.queue.clear();
        state.in_flight = None;
        state.settle_all();
        Self::enqueue(state, env, Request::Refresh, effects);
    }

    /// Run `request` now if idle, otherwise queue it
    ///
    /// A queued request runs inside the effects of the chain ahead of it, so
    /// the action that queued it gets an effect that lasts until its own
    /// chain has settled.
    fn enqueue(
        state: &mut TodoState,
        env: &TodoEnvironment,
        request: Request,
        effects: &mut Effects,
    ) {
        if !state.is_configured() {
            Self::fail(state, env, None, ConfigError::NotConfigured, effects);
            return;
        }
        let token = state.issue_token();
        if state.in_flight.is_some() {
            tracing::debug!(
                %token,
                queued = state.queue.len() + 1,
                "request queued behind chain in flight"
            );
            state.queue.push_back((token, request));
            let settled = state.until_settled(token);
            effects.push(async_effect! {
                settled.await;
                None
            });
            return;
        }
        Self::dispatch(state, env, token, request, effects);
    }

    /// Start the next queued request, skipping any that resolve to nothing
    fn dispatch_next(state: &mut TodoState, env: &TodoEnvironment, effects: &mut Effects) {
        while state.in_flight.is_none() {
            let Some((token, request)) = state.queue.pop_front() else {
                return;
            };
            Self::dispatch(state, env, token, request, effects);
        }
    }

    fn dispatch(
        state: &mut TodoState,
        env: &TodoEnvironment,
        token: RequestToken,
        request: Request,
        effects: &mut Effects,
    ) {
        let Some(base_url) = state.base_url().cloned() else {
            state.settle(token);
            Self::fail(state, env, None, ConfigError::NotConfigured, effects);
            return;
        };

        let api = Arc::clone(&env.api);
        let (phase, effect) = match request {
            Request::Refresh => (
                Phase::Refreshing { after: None },
                Self::list_effect(api, base_url, token),
            ),
            Request::Create(body) => (
                Phase::Mutating(MutationKind::Create),
                async_effect! {
                    let result = api.create(&base_url, &body).await;
                    Some(TodoAction::MutationCompleted { token, result })
                },
            ),
            Request::Update(todo) => (
                Phase::Mutating(MutationKind::Update),
                Self::update_effect(api, base_url, todo, token),
            ),
            Request::Toggle(id) => {
                // Resolved against the latest fetched list, not the list at issue time
                let Some(current) = state.find(id) else {
                    state.settle(token);
                    let context = MutationKind::Toggle { completed: true }.failure_context();
                    Self::fail(state, env, Some(context), not_found(id), effects);
                    return;
                };
                let todo = current.toggled();
                (
                    Phase::Mutating(MutationKind::Toggle {
                        completed: todo.completed,
                    }),
                    Self::update_effect(api, base_url, todo, token),
                )
            },
            Request::Delete(id) => (
                Phase::Mutating(MutationKind::Delete),
                async_effect! {
                    let result = api.delete(&base_url, id).await;
                    Some(TodoAction::MutationCompleted { token, result })
                },
            ),
        };

        tracing::debug!(%token, ?phase, "dispatching request");
        state.in_flight = Some(InFlight { token, phase });
        effects.push(effect);
    }

    fn list_effect(
        api: Arc<dyn TodoApi>,
        base_url: BaseUrl,
        token: RequestToken,
    ) -> Effect<TodoAction> {
        async_effect! {
            let result = api.list(&base_url).await;
            Some(TodoAction::TodosLoaded { token, result })
        }
    }

    fn update_effect(
        api: Arc<dyn TodoApi>,
        base_url: BaseUrl,
        todo: Todo,
        token: RequestToken,
    ) -> Effect<TodoAction> {
        async_effect! {
            let result = api.update(&base_url, &todo).await;
            Some(TodoAction::MutationCompleted { token, result })
        }
    }

    /// The chain in flight if `token` is its token
    fn current_chain(state: &TodoState, token: RequestToken) -> Option<InFlight> {
        let in_flight = state.in_flight.filter(|chain| chain.token == token);
        if in_flight.is_none() {
            tracing::debug!(%token, "ignoring stale result");
        }
        in_flight
    }
}

fn not_found(id: TodoId) -> RemoteError {
    RemoteError::Server {
        message: format!("Todo #{id} not found"),
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let mut effects = Effects::new();

        match action {
            // ========== Configuration ==========
            TodoAction::Start => {
                let config = Arc::clone(&env.config);
                effects.push(async_effect! {
                    Some(TodoAction::ConfigLoaded { result: config.load() })
                });
            },

            TodoAction::ConfigLoaded { result } => match result {
                Ok(Some(base_url)) => Self::configure(state, env, base_url, &mut effects),
                Ok(None) => tracing::info!("no stored base URL"),
                Err(error) => Self::fail(
                    state,
                    env,
                    Some("Failed to load configuration"),
                    error,
                    &mut effects,
                ),
            },

            TodoAction::SaveBaseUrl { input } => match BaseUrl::parse(&input) {
                Ok(base_url) => {
                    let config = Arc::clone(&env.config);
                    let persisted = base_url.clone();
                    effects.push(async_effect! {
                        config
                            .save(&persisted)
                            .err()
                            .map(|error| TodoAction::ConfigPersistFailed { error })
                    });
                    Self::configure(state, env, base_url, &mut effects);
                },
                Err(error) => Self::fail(state, env, None, error, &mut effects),
            },

            TodoAction::ConfigPersistFailed { error } => {
                // The address stays in effect for this session
                Self::fail(
                    state,
                    env,
                    Some("Failed to save base URL"),
                    error,
                    &mut effects,
                );
            },

            // ========== User commands ==========
            TodoAction::SetFilter { filter } => {
                state.filter = filter;
            },

            TodoAction::Refresh => Self::enqueue(state, env, Request::Refresh, &mut effects),

            TodoAction::CreateTodo { draft } => {
                if draft.has_blank_title() {
                    Self::fail(state, env, None, ValidationError::EmptyTitle, &mut effects);
                } else {
                    let body = draft.into_new_todo(env.clock.now());
                    Self::enqueue(state, env, Request::Create(body), &mut effects);
                }
            },

            TodoAction::UpdateTodo { todo } => {
                if todo.title.trim().is_empty() {
                    Self::fail(state, env, None, ValidationError::EmptyTitle, &mut effects);
                } else {
                    Self::enqueue(state, env, Request::Update(todo), &mut effects);
                }
            },

            TodoAction::ToggleComplete { id } => {
                Self::enqueue(state, env, Request::Toggle(id), &mut effects);
            },

            TodoAction::DeleteTodo { id } => {
                Self::enqueue(state, env, Request::Delete(id), &mut effects);
            },

            TodoAction::DismissNotification { id } => {
                state.notifications.retain(|notification| notification.id != id);
            },

            TodoAction::DismissNotifications => state.notifications.clear(),

            // ========== Request results ==========
            TodoAction::MutationCompleted { token, result } => {
                let Some(chain) = Self::current_chain(state, token) else {
                    return effects;
                };
                let Phase::Mutating(kind) = chain.phase else {
                    tracing::warn!(%token, "write result while not writing");
                    return effects;
                };

                match result {
                    Ok(()) => {
                        let Some(base_url) = state.base_url().cloned() else {
                            return effects;
                        };
                        state.in_flight = Some(InFlight {
                            token,
                            phase: Phase::Refreshing { after: Some(kind) },
                        });
                        effects.push(Self::list_effect(Arc::clone(&env.api), base_url, token));
                    },
                    Err(error) => {
                        state.in_flight = None;
                        state.settle(token);
                        Self::fail(state, env, Some(kind.failure_context()), error, &mut effects);
                        Self::dispatch_next(state, env, &mut effects);
                    },
                }
            },

            TodoAction::TodosLoaded { token, result } => {
                let Some(chain) = Self::current_chain(state, token) else {
                    return effects;
                };
                let Phase::Refreshing { after } = chain.phase else {
                    tracing::warn!(%token, "list result while not refreshing");
                    return effects;
                };

                match result {
                    Ok(todos) => {
                        tracing::debug!(count = todos.len(), "todos replaced with server list");
                        state.todos = todos;
                    },
                    Err(error) => {
                        Self::fail(state, env, Some("Failed to fetch todos"), error, &mut effects);
                    },
                }
                if let Some(kind) = after {
                    Self::notify(
                        state,
                        env,
                        Level::Success,
                        kind.success_message().to_string(),
                        &mut effects,
                    );
                }
                state.in_flight = None;
                state.settle(token);
                Self::dispatch_next(state, env, &mut effects);
            },
        }

        effects
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Notification;
    use tasklist_core::environment::Clock;
    use tasklist_core::remote::RemoteOperation;
    use tasklist_core::todo::{Filter, TodoDraft};
    use tasklist_testing::{
        InMemoryTodoApi, MemoryConfigStore, RecordedRequest, ReducerTest, assertions,
        resolve_effects, test_clock, todo_fixture,
    };

    fn url() -> BaseUrl {
        BaseUrl::parse("http://localhost:3000").unwrap()
    }

    fn env_with(api: Arc<InMemoryTodoApi>) -> TodoEnvironment {
        TodoEnvironment::new(api, Arc::new(MemoryConfigStore::new()), Arc::new(test_clock()))
    }

    fn test_env() -> TodoEnvironment {
        env_with(Arc::new(InMemoryTodoApi::new()))
    }

    fn fixture(id: i64, title: &str, completed: bool) -> Todo {
        todo_fixture(id, title, completed, test_clock().now())
    }

    fn loaded_state(todos: Vec<Todo>) -> TodoState {
        let mut state = TodoState::configured(url());
        state.todos = todos;
        state
    }

    fn messages(state: &TodoState) -> Vec<&str> {
        state
            .notifications
            .iter()
            .map(|n: &Notification| n.message.as_str())
            .collect()
    }

    #[test]
    fn test_set_filter_is_local() {
        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(loaded_state(vec![fixture(1, "A", true), fixture(2, "B", false)]))
            .when_action(TodoAction::SetFilter {
                filter: Filter::Active,
            })
            .then_state(|state| {
                assert_eq!(state.filter, Filter::Active);
                let titles: Vec<_> = state
                    .filtered_todos()
                    .iter()
                    .map(|t| t.title.clone())
                    .collect();
                assert_eq!(titles, vec!["B".to_string()]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_empty_title_rejected_without_request() {
        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(loaded_state(Vec::new()))
            .when_action(TodoAction::CreateTodo {
                draft: TodoDraft::titled("   "),
            })
            .then_state(|state| {
                assert!(state.in_flight.is_none());
                assert_eq!(messages(state), vec!["Todo title cannot be empty"]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_edit_to_empty_title_rejected() {
        let mut edited = fixture(1, "Report", false);
        edited.title = String::new();

        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(loaded_state(vec![fixture(1, "Report", false)]))
            .when_action(TodoAction::UpdateTodo { todo: edited })
            .then_state(|state| {
                assert!(state.has_errors());
                assert!(state.in_flight.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_commands_blocked_while_unconfigured() {
        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::DeleteTodo { id: TodoId::new(1) })
            .then_state(|state| {
                assert!(state.queue.is_empty());
                assert_eq!(messages(state), vec!["Base URL is not configured"]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_empty_base_url_rejected() {
        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::SaveBaseUrl {
                input: "  / ".to_string(),
            })
            .then_state(|state| {
                assert!(!state.is_configured());
                assert_eq!(messages(state), vec!["Base URL cannot be empty"]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_save_base_url_strips_and_refreshes() {
        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(TodoState::new())
            .when_action(TodoAction::SaveBaseUrl {
                input: "https://api.example.com/".to_string(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.base_url().map(BaseUrl::as_str),
                    Some("https://api.example.com")
                );
                assert!(matches!(
                    state.in_flight,
                    Some(InFlight {
                        phase: Phase::Refreshing { after: None },
                        ..
                    })
                ));
            })
            .then_effects(|effects| {
                // Persist and refresh
                assertions::assert_effects_count(effects, 2);
            })
            .run();
    }

    #[test]
    fn test_reconfigure_drops_chain_and_queue() {
        let mut state = loaded_state(vec![fixture(1, "Old", false)]);
        let old = state.issue_token();
        state.in_flight = Some(InFlight {
            token: old,
            phase: Phase::Mutating(MutationKind::Delete),
        });
        let queued = state.issue_token();
        state.queue.push_back((queued, Request::Toggle(TodoId::new(1))));

        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::SaveBaseUrl {
                input: "http://other:8080".to_string(),
            })
            .when_action(TodoAction::MutationCompleted {
                token: old,
                result: Ok(()),
            })
            .then_state(move |state| {
                assert!(state.todos.is_empty());
                assert!(state.queue.is_empty());
                assert!(state.is_settled(queued));
                let chain = state.in_flight.unwrap();
                assert_ne!(chain.token, old);
                assert!(!state.is_settled(chain.token));
                assert_eq!(chain.phase, Phase::Refreshing { after: None });
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_requests_queue_while_busy() {
        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(loaded_state(vec![fixture(1, "A", false)]))
            .when_action(TodoAction::ToggleComplete { id: TodoId::new(1) })
            .when_action(TodoAction::DeleteTodo { id: TodoId::new(1) })
            .then_state(|state| {
                assert!(matches!(
                    state.in_flight.unwrap().phase,
                    Phase::Mutating(MutationKind::Toggle { completed: true })
                ));
                assert_eq!(state.queue.len(), 1);
                let (token, request) = &state.queue[0];
                assert_eq!(*request, Request::Delete(TodoId::new(1)));
                assert!(!state.is_settled(*token));
            })
            .then_effects(|effects| {
                // Waits for the queued delete's own chain
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_stale_list_result_ignored() {
        let mut state = loaded_state(vec![fixture(1, "Kept", false)]);
        let stale = state.issue_token();
        let current = state.issue_token();
        state.in_flight = Some(InFlight {
            token: current,
            phase: Phase::Refreshing { after: None },
        });

        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::TodosLoaded {
                token: stale,
                result: Ok(Vec::new()),
            })
            .then_state(move |state| {
                assert_eq!(state.todos.len(), 1);
                assert_eq!(state.in_flight.unwrap().token, current);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_write_failure_clears_chain_and_starts_next() {
        let mut state = loaded_state(Vec::new());
        let token = state.issue_token();
        state.in_flight = Some(InFlight {
            token,
            phase: Phase::Mutating(MutationKind::Create),
        });
        let queued = state.issue_token();
        state.queue.push_back((queued, Request::Refresh));

        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::MutationCompleted {
                token,
                result: Err(RemoteError::Server {
                    message: "Database unavailable".into(),
                }),
            })
            .then_state(move |state| {
                assert_eq!(
                    messages(state),
                    vec!["Failed to add todo: Database unavailable"]
                );
                assert!(state.is_settled(token));
                let next = state.in_flight.unwrap();
                assert_eq!(next.token, queued);
                assert_eq!(next.phase, Phase::Refreshing { after: None });
                assert!(state.queue.is_empty());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_refresh_failure_keeps_list_and_reports_both() {
        let mut state = loaded_state(vec![fixture(1, "Kept", false)]);
        let token = state.issue_token();
        state.in_flight = Some(InFlight {
            token,
            phase: Phase::Refreshing {
                after: Some(MutationKind::Delete),
            },
        });

        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::TodosLoaded {
                token,
                result: Err(RemoteError::RequestFailed("connection refused".into())),
            })
            .then_state(|state| {
                assert_eq!(state.todos.len(), 1);
                assert!(state.in_flight.is_none());
                assert_eq!(
                    messages(state),
                    vec![
                        "Failed to fetch todos: Request failed: connection refused",
                        "Todo deleted",
                    ]
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_notification_ttl_schedules_dismissal() {
        ReducerTest::new(TodoReducer::new())
            .with_env(test_env().with_notification_ttl(Duration::from_secs(5)))
            .given_state(loaded_state(Vec::new()))
            .when_action(TodoAction::CreateTodo {
                draft: TodoDraft::default(),
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_dismiss_notification() {
        let mut state = TodoState::new();
        let first = state.push_notification(Level::Success, "one");
        state.push_notification(Level::Error, "two");

        ReducerTest::new(TodoReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(TodoAction::DismissNotification { id: first })
            .then_state(|state| {
                assert_eq!(messages(state), vec!["two"]);
            })
            .run();
    }

    #[tokio::test]
    async fn test_toggle_resolved_from_latest_list() {
        let now = test_clock().now();
        let done = todo_fixture(3, "Report", true, now);
        let api = Arc::new(InMemoryTodoApi::with_todos(vec![done.clone()]));
        let env = env_with(Arc::clone(&api));
        let reducer = TodoReducer::new();

        // Queued while the list still showed the todo as open
        let mut state = loaded_state(vec![todo_fixture(3, "Report", false, now)]);
        let token = state.issue_token();
        state.in_flight = Some(InFlight {
            token,
            phase: Phase::Refreshing { after: None },
        });
        reducer.reduce(&mut state, TodoAction::ToggleComplete { id: done.id }, &env);

        let effects = reducer.reduce(
            &mut state,
            TodoAction::TodosLoaded {
                token,
                result: Ok(vec![done.clone()]),
            },
            &env,
        );
        let feedback = resolve_effects(effects).await;
        assert_eq!(feedback.len(), 1);

        let expected = Todo {
            completed: false,
            ..done
        };
        assert_eq!(
            api.requests(),
            vec![RecordedRequest::Update {
                base_url: url(),
                body: expected,
            }]
        );
        assert_eq!(
            state.in_flight.unwrap().phase,
            Phase::Mutating(MutationKind::Toggle { completed: false })
        );
    }

    #[tokio::test]
    async fn test_create_chain_refreshes_after_write() {
        let api = Arc::new(InMemoryTodoApi::new());
        let env = env_with(Arc::clone(&api));
        let reducer = TodoReducer::new();
        let mut state = loaded_state(Vec::new());

        let mut pending = reducer
            .reduce(
                &mut state,
                TodoAction::CreateTodo {
                    draft: TodoDraft::titled("Buy milk"),
                },
                &env,
            )
            .into_vec();
        loop {
            let actions = resolve_effects(std::mem::take(&mut pending)).await;
            if actions.is_empty() {
                break;
            }
            for action in actions {
                pending.extend(reducer.reduce(&mut state, action, &env));
            }
        }

        assert_eq!(
            api.operations(),
            vec![RemoteOperation::Create, RemoteOperation::List]
        );
        assert_eq!(state.todos.len(), 1);
        assert_eq!(state.todos[0].title, "Buy milk");
        assert_eq!(state.todos[0].due_date, "2025-06-15");
        assert_eq!(messages(&state), vec!["Todo added"]);
        assert!(state.in_flight.is_none());
    }
}
