//! Filter pipeline over the active task set.
//!
//! Applied in fixed order: time filter, then single-project focus, then
//! the multi-project allow-list. Focus is exclusive and bypasses the
//! allow-list entirely.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

use crate::task::Task;

/// Which time window done tasks must fall into to stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    /// Since today's midnight, minus a configurable lookback.
    #[default]
    Today,
    /// A plain rolling 24-hour window.
    Rolling24h,
}

/// Options for one pass of the filter pipeline.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub time: TimeFilter,
    /// When set, only this project's tasks pass and the allow-list is
    /// skipped.
    pub focus_project: Option<String>,
    /// Per-project enabled flags; a project that is unlisted passes.
    pub project_toggles: HashMap<String, bool>,
    /// Extra slack behind today's midnight for the `Today` filter.
    pub done_lookback: Duration,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            time: TimeFilter::Today,
            focus_project: None,
            project_toggles: HashMap::new(),
            done_lookback: Duration::zero(),
        }
    }
}

/// Run the pipeline over the active set.
pub fn apply_filters(tasks: &[Task], options: &FilterOptions, now: NaiveDateTime) -> Vec<Task> {
    let mut filtered: Vec<Task> = tasks
        .iter()
        .filter(|t| passes_time_filter(t, options, now))
        .cloned()
        .collect();

    if let Some(focus) = &options.focus_project {
        filtered.retain(|t| &t.project.id == focus);
        return filtered;
    }

    if options.project_toggles.values().any(|enabled| !enabled) {
        filtered.retain(|t| {
            options
                .project_toggles
                .get(&t.project.id)
                .copied()
                .unwrap_or(true)
        });
    }

    filtered
}

/// Not-done tasks always pass; done tasks must have been worked on (or,
/// for recurring tasks, completed) recently enough.
fn passes_time_filter(task: &Task, options: &FilterOptions, now: NaiveDateTime) -> bool {
    if !task.is_done() {
        return true;
    }

    let cutoff = match options.time {
        TimeFilter::Today => now.date().and_time(NaiveTime::MIN) - options.done_lookback,
        TimeFilter::Rolling24h => now - Duration::hours(24),
    };

    if task
        .last_session()
        .is_some_and(|session| session.start >= cutoff)
    {
        return true;
    }

    task.is_recurring() && task.completion_for_date(now.date()).is_some()
}
