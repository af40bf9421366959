//! Todo records, filters and derived view values.
//!
//! Records mirror the backend's JSON shape (camelCase field names). Dates are
//! kept exactly as the server sent them so that an update writes back the
//! fetched values untouched; the typed accessors parse them on demand.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Date format used on the wire for `dueDate`
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Server-assigned identifier of a todo.
///
/// The client never generates one; it only echoes ids it received.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Wraps a raw id received from the server
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw id
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A todo as stored by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Server-assigned identifier
    pub id: TodoId,
    /// Title (required, non-empty)
    pub title: String,
    /// Free-form description, empty when absent
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Whether the todo is done
    #[serde(default)]
    pub completed: bool,
    /// Due date as sent by the server
    #[serde(default, deserialize_with = "null_as_empty")]
    pub due_date: String,
    /// Creation timestamp as sent by the server
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    /// Fields this client does not know about, sent back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Todo {
    /// Parses `due_date` as a point in time.
    ///
    /// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, and naive
    /// `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` read as UTC.
    #[must_use]
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.due_date)
    }

    /// Calendar day the todo is due on
    #[must_use]
    pub fn due_on(&self) -> Option<NaiveDate> {
        self.due_at().map(|at| at.date_naive())
    }

    /// Parses `created_at` as a point in time
    #[must_use]
    pub fn created_at_time(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.created_at)
    }

    /// A todo is overdue when it is still open and its due time has passed.
    ///
    /// Completed todos are never overdue; neither are todos whose due date
    /// cannot be parsed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        if self.completed {
            return false;
        }
        self.due_at().is_some_and(|due| due < now)
    }

    /// Copy of this record with `completed` flipped and nothing else changed
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DUE_DATE_FORMAT) {
        return Some(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// User input for a new todo, before defaults are applied
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoDraft {
    /// Title as typed
    pub title: String,
    /// Description as typed (may be empty)
    pub description: String,
    /// Chosen due date; today when `None`
    pub due_date: Option<NaiveDate>,
}

impl TodoDraft {
    /// Draft with only a title
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether the title is missing
    #[must_use]
    pub fn has_blank_title(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Body of the create request.
    ///
    /// `completed` starts false, a missing due date becomes the UTC date of
    /// `now`, and `createdAt` is stamped with `now`.
    #[must_use]
    pub fn into_new_todo(self, now: DateTime<Utc>) -> NewTodo {
        let due = self.due_date.unwrap_or_else(|| now.date_naive());
        NewTodo {
            title: self.title,
            description: self.description,
            completed: false,
            due_date: due.format(DUE_DATE_FORMAT).to_string(),
            created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Create request body: a todo without its id
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    /// Title
    pub title: String,
    /// Description, empty string when not given
    pub description: String,
    /// Always false on creation
    pub completed: bool,
    /// `YYYY-MM-DD`
    pub due_date: String,
    /// RFC 3339 with milliseconds
    pub created_at: String,
}

/// Which slice of the todo list is shown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Everything
    #[default]
    All,
    /// `completed == false`
    Active,
    /// `completed == true`
    Completed,
}

impl Filter {
    /// All filters in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Whether `todo` belongs to this slice
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }

    /// Todos in this slice, in server order
    pub fn apply(self, todos: &[Todo]) -> impl Iterator<Item = &Todo> {
        todos.iter().filter(move |todo| self.matches(todo))
    }

    /// Lower-case name, as accepted by [`std::str::FromStr`]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!(
                "unknown filter `{other}` (expected all, active or completed)"
            )),
        }
    }
}

/// Counts shown above the list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoStats {
    /// All todos
    pub total: usize,
    /// Completed todos
    pub completed: usize,
    /// Open todos
    pub pending: usize,
}

impl TodoStats {
    /// Counts over the whole set
    #[must_use]
    pub fn of(todos: &[Todo]) -> Self {
        let completed = todos.iter().filter(|todo| todo.completed).count();
        Self {
            total: todos.len(),
            completed,
            pending: todos.len() - completed,
        }
    }

    /// Size of the slice a filter selects
    #[must_use]
    pub const fn count_for(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.total,
            Filter::Active => self.pending,
            Filter::Completed => self.completed,
        }
    }
}
