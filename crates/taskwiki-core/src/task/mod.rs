//! Task types parsed out of wiki node documents.
//!
//! A task is one checkbox-marked line plus the metadata lines nested
//! under it: work sessions, an optional schedule, and per-date completion
//! markers for recurring tasks. All of it is reconstructed from text on
//! every parse; line numbers are only valid until the backing document is
//! rewritten, after which the owning node must be re-parsed.

pub mod reward;
pub mod schedule;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use schedule::TaskSchedule;

/// The two-space indent unit used by the markup.
pub const INDENT_UNIT: &str = "  ";

/// Task status as encoded by the checkbox glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// `[ ]` - open, unscheduled or future
    Default,
    /// `[-]` - explicitly marked in-progress
    Active,
    /// `[x]` - done
    Done,
    /// `[_]` - cancelled
    Cancelled,
}

impl TaskStatus {
    /// The checkbox glyph for this status, brackets included.
    pub fn glyph(&self) -> &'static str {
        match self {
            TaskStatus::Default => "[ ]",
            TaskStatus::Active => "[-]",
            TaskStatus::Done => "[x]",
            TaskStatus::Cancelled => "[_]",
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            ' ' => Some(TaskStatus::Default),
            '-' => Some(TaskStatus::Active),
            'x' => Some(TaskStatus::Done),
            '_' => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

/// A recorded start/end interval of work on a task.
///
/// An absent end means the session is currently open. The mutation
/// protocol keeps at most one session open per task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSession {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    /// Zero-based line number of the `Session:` line.
    pub line: usize,
}

impl TaskSession {
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Elapsed time: `end - start` when closed, `now - start` while open.
    pub fn duration(&self, now: NaiveDateTime) -> Duration {
        self.end.unwrap_or(now) - self.start
    }

    /// Whether the session start equals `when` to the minute.
    pub fn starts_at_minute(&self, when: NaiveDateTime) -> bool {
        self.start.date() == when.date()
            && self.start.hour() == when.hour()
            && self.start.minute() == when.minute()
    }
}

/// A per-calendar-date marker that a recurring task was done on that date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub timestamp: NaiveDateTime,
    /// Zero-based line number of the `Done:` line.
    pub line: usize,
}

/// Back-reference from a task to the node that owns it.
///
/// Carries exactly what the engine needs for sorting, filtering and
/// display; storage capabilities live on the `Node` trait instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

/// One checkbox-marked line plus its associated metadata lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub project: ProjectRef,
    /// Display text, with markup tokens stripped.
    pub text: String,
    pub status: TaskStatus,
    pub priority: u32,
    /// Zero-based line number of the checkbox line.
    pub line: usize,
    /// Verbatim text of the checkbox line, used to detect indentation
    /// and stale parses.
    pub line_text: String,
    /// Sessions in document order, which mutation keeps chronological.
    pub sessions: Vec<TaskSession>,
    pub schedule: Option<TaskSchedule>,
    /// Completions in document order.
    pub completions: Vec<TaskCompletion>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    /// Whether the task is being worked on right now.
    ///
    /// True when a session is open, or when a one-off schedule's window
    /// covers `now`. Recurring schedules never contribute here; they only
    /// feed due-today selection.
    pub fn is_in_progress(&self, now: NaiveDateTime) -> bool {
        if self.sessions.iter().any(TaskSession::is_open) {
            return true;
        }
        match &self.schedule {
            Some(s) if !s.is_recurring() => s.is_in_progress(now),
            _ => false,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.schedule.as_ref().is_some_and(TaskSchedule::is_recurring)
    }

    /// The currently open session, if any.
    pub fn open_session(&self) -> Option<&TaskSession> {
        self.sessions.iter().find(|s| s.is_open())
    }

    /// Last session by document order.
    pub fn last_session(&self) -> Option<&TaskSession> {
        self.sessions.last()
    }

    /// Last completion by document order.
    pub fn last_completion(&self) -> Option<&TaskCompletion> {
        self.completions.last()
    }

    /// First completion falling on `date`; duplicates are tolerated and
    /// the first match wins.
    pub fn completion_for_date(&self, date: NaiveDate) -> Option<&TaskCompletion> {
        self.completions
            .iter()
            .find(|c| c.timestamp.date() == date)
    }

    /// Total worked time across all sessions.
    pub fn work_time(&self, now: NaiveDateTime) -> Duration {
        self.sessions
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration(now))
    }

    /// Total worked time attributed to `date`.
    ///
    /// A session counts iff its start falls within the date; a session
    /// crossing midnight is attributed entirely to its start date, and an
    /// open session is measured up to `now`.
    pub fn total_session_time_for_date(&self, date: NaiveDate, now: NaiveDateTime) -> Duration {
        self.sessions
            .iter()
            .filter(|s| s.start.date() == date)
            .fold(Duration::zero(), |acc, s| acc + s.duration(now))
    }

    /// How many indent units prefix the checkbox line.
    pub fn indent_level(&self) -> usize {
        let mut level = 0;
        let mut rest = self.line_text.as_str();
        while let Some(stripped) = rest.strip_prefix(INDENT_UNIT) {
            level += 1;
            rest = stripped;
        }
        level
    }
}
