//! Active-task selection and ordering.
//!
//! Out of every task across every node, decide what belongs on the
//! "today" list and in which order. Selection applies the candidate
//! criteria in precedence order per task; the comparator is a strict
//! lexicographic key so the resulting order is total and deterministic
//! regardless of input order.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::task::reward::RewardPolicy;
use crate::task::Task;
use crate::task::TaskStatus;

/// Priority at or above which a task pins to the top of the list.
pub const STICKY_PRIORITY: u32 = 100;

/// Why a task was selected into the active set; the variants are checked
/// in this order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveReason {
    /// Explicitly marked in-progress with `[-]`.
    Marked,
    /// Done, with a session started inside the lookback window.
    DoneRecently,
    /// Open task scheduled for today.
    ScheduledToday,
    /// One-off schedule in the past, carried forward until handled.
    Overdue,
    /// Recurring schedule that fires today.
    DueToday,
}

/// Decide whether a task is a candidate for the active list right now.
pub fn classify(task: &Task, now: NaiveDateTime) -> Option<ActiveReason> {
    if task.status == TaskStatus::Cancelled {
        return None;
    }
    if task.status == TaskStatus::Active {
        return Some(ActiveReason::Marked);
    }

    let today = now.date().and_time(NaiveTime::MIN);
    let lookback_start = today - Duration::hours(24);
    if task.is_done()
        && task
            .sessions
            .iter()
            .any(|s| s.start >= lookback_start && s.start <= now)
    {
        return Some(ActiveReason::DoneRecently);
    }

    let schedule = task.schedule.as_ref()?;
    if task.status == TaskStatus::Default && schedule.start.date() == now.date() {
        return Some(ActiveReason::ScheduledToday);
    }
    if !task.is_done() && !schedule.is_recurring() && schedule.start < today {
        return Some(ActiveReason::Overdue);
    }
    if !task.is_done() && schedule.is_recurring() && schedule.is_due_today(now) {
        return Some(ActiveReason::DueToday);
    }

    None
}

/// Select and sort the active set out of all parsed tasks.
pub fn select_active(tasks: &[Task], now: NaiveDateTime) -> Vec<Task> {
    let mut active: Vec<Task> = tasks
        .iter()
        .filter(|t| classify(t, now).is_some())
        .cloned()
        .collect();
    active.sort_by(compare_active);
    active
}

/// Total order over active tasks.
///
/// Keys, most significant first: sticky priority, done after not-done,
/// priority descending, scheduled time of day (midnight meaning "no
/// specific time" sorts after any set time), scheduled before
/// unscheduled, project name, path, line, text.
pub fn compare_active(a: &Task, b: &Task) -> Ordering {
    let not_sticky = |t: &Task| t.priority < STICKY_PRIORITY;
    not_sticky(a)
        .cmp(&not_sticky(b))
        .then_with(|| a.is_done().cmp(&b.is_done()))
        .then_with(|| b.priority.cmp(&a.priority))
        .then_with(|| schedule_key(a).cmp(&schedule_key(b)))
        .then_with(|| a.project.name.cmp(&b.project.name))
        .then_with(|| a.project.path.cmp(&b.project.path))
        .then_with(|| a.line.cmp(&b.line))
        .then_with(|| a.text.cmp(&b.text))
}

/// Scheduled tasks sort before unscheduled ones; among scheduled tasks,
/// a set time of day sorts before the 00:00 placeholder.
fn schedule_key(task: &Task) -> (u8, NaiveTime) {
    match &task.schedule {
        Some(s) if s.start.time() != NaiveTime::MIN => (0, s.start.time()),
        Some(_) => (1, NaiveTime::MIN),
        None => (2, NaiveTime::MIN),
    }
}

/// First in-progress task across all nodes, in document/walk order.
pub fn current_task<'a>(tasks: &'a [Task], now: NaiveDateTime) -> Option<&'a Task> {
    tasks.iter().find(|t| t.is_in_progress(now))
}

/// Header totals over the active set: time worked today and reward
/// points collected from completed tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSummary {
    pub work_time: Duration,
    pub reward_points: u32,
}

pub fn summarize(active: &[Task], now: NaiveDateTime, policy: &dyn RewardPolicy) -> ActiveSummary {
    let mut work_time = Duration::zero();
    let mut reward_points = 0;
    for task in active {
        work_time = work_time + task.total_session_time_for_date(now.date(), now);
        if task.is_done() {
            reward_points += policy.reward(task);
        }
    }
    ActiveSummary {
        work_time,
        reward_points,
    }
}
