//! Plain-text rendering of [`TodoState`].
//!
//! Everything shown here is derived on each render: stats, filter counts,
//! the filtered list and the overdue markers.

use crate::types::{Level, Notification, TodoState};
use std::fmt::Write;
use tasklist_core::todo::{Filter, Todo};
use tasklist_core::{DateTime, Utc};

/// Display format for dates, e.g. `15 Jun 2025`
pub const DISPLAY_DATE_FORMAT: &str = "%-d %b %Y";

/// Message shown when the active filter selects nothing
#[must_use]
pub const fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "No todos yet",
        Filter::Active => "No active todos",
        Filter::Completed => "No completed todos",
    }
}

/// Render a due or creation date for display.
///
/// Falls back to the raw value when it cannot be parsed.
#[must_use]
pub fn format_date(raw: &str, parsed: Option<DateTime<Utc>>) -> String {
    parsed.map_or_else(
        || raw.to_string(),
        |at| at.format(DISPLAY_DATE_FORMAT).to_string(),
    )
}

/// One notification line
#[must_use]
pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.level {
        Level::Success => "+",
        Level::Error => "!",
    };
    format!(
        "{marker} {}: {}",
        notification.title, notification.message
    )
}

/// The three filter tabs with counts; the active one is bracketed
#[must_use]
pub fn render_filter_tabs(state: &TodoState) -> String {
    let stats = state.stats();
    Filter::ALL
        .iter()
        .map(|&filter| {
            let label = format!("{filter} ({})", stats.count_for(filter));
            if filter == state.filter {
                format!("[{label}]")
            } else {
                label
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Lines for a single todo
#[must_use]
pub fn render_todo(todo: &Todo, now: DateTime<Utc>) -> String {
    let check = if todo.completed { "x" } else { " " };
    let mut out = format!("#{:<4} [{check}] {}", todo.id.get(), todo.title);
    if todo.is_overdue(now) {
        out.push_str("  (overdue)");
    }

    let mut details = Vec::new();
    if !todo.due_date.is_empty() {
        details.push(format!("due {}", format_date(&todo.due_date, todo.due_at())));
    }
    if !todo.created_at.is_empty() {
        details.push(format!(
            "created {}",
            format_date(&todo.created_at, todo.created_at_time())
        ));
    }
    if !details.is_empty() {
        let _ = write!(out, "\n           {}", details.join(", "));
    }
    if !todo.description.trim().is_empty() {
        let _ = write!(out, "\n           {}", todo.description.trim());
    }
    out
}

/// Full screen: notifications, backend, stats, tabs and the filtered list
#[must_use]
pub fn render(state: &TodoState, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    for notification in &state.notifications {
        let _ = writeln!(out, "{}", render_notification(notification));
    }
    if !state.notifications.is_empty() {
        out.push('\n');
    }

    let Some(base_url) = state.base_url() else {
        out.push_str("No backend configured. Run `tasklist config set <URL>` first.\n");
        return out;
    };

    let _ = writeln!(out, "Backend: {base_url}");
    if state.is_busy() {
        out.push_str("Syncing...\n");
    }

    let stats = state.stats();
    let _ = write!(
        out,
        "Total: {}  Completed: {}  Pending: {}",
        stats.total, stats.completed, stats.pending
    );
    let overdue = state.overdue_count(now);
    if overdue > 0 {
        let _ = write!(out, "  Overdue: {overdue}");
    }
    out.push('\n');
    let _ = writeln!(out, "{}\n", render_filter_tabs(state));

    let todos = state.filtered_todos();
    if todos.is_empty() {
        let _ = writeln!(out, "{}", empty_message(state.filter));
    }
    for todo in todos {
        let _ = writeln!(out, "{}", render_todo(todo, now));
    }
    out
}
