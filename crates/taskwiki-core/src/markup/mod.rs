//! Parser for the line-oriented task markup.
//!
//! The convention:
//!
//! ```text
//! # Node Title
//!
//! [ ] open task !2
//!   Schedule: 2024.03.04 09:00 | mon,wed,fri
//!   Session: 2024.03.04 09:00-09:45
//!   Done: 2024.03.04 09:45
//! ```
//!
//! Checkbox glyphs: `[ ]` default, `[-]` active, `[x]` done, `[_]`
//! cancelled. A trailing `!N` token sets the priority and is stripped
//! from the display text. Metadata lines (`Session:` / `Schedule:` /
//! `Done:`) attach to the closest preceding task line; the two-space
//! indent nests them visually one level deeper.
//!
//! Parsing is tolerant: lines that match no pattern are ignored, and
//! malformed timestamps drop the single metadata line rather than the
//! document. Everything is rebuilt from text on each call; returned line
//! numbers are valid only until the document is rewritten.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

use crate::task::{ProjectRef, Task, TaskCompletion, TaskSchedule, TaskSession, TaskStatus};

static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[([ x_-])\] (.*)$").expect("task pattern"));
static PRIORITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+!(\d+)\s*$").expect("priority pattern"));
static SESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Session:\s*(.+?)\s*$").expect("session pattern"));
static SCHEDULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Schedule:\s*(.+?)\s*$").expect("schedule pattern"));
static DONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Done:\s*(.+?)\s*$").expect("done pattern"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# (.+?)\s*$").expect("title pattern"));

const DATETIME_FMT: &str = "%Y.%m.%d %H:%M";
const DATE_FMT: &str = "%Y.%m.%d";
const TIME_FMT: &str = "%H:%M";

/// The document title, taken from the first `# ...` heading line.
pub fn document_title(text: &str) -> Option<String> {
    text.split('\n')
        .find_map(|line| TITLE_RE.captures(line))
        .map(|caps| caps[1].to_string())
}

/// Parse every task in a document, metadata attached, in document order.
///
/// The returned tasks carry a default [`ProjectRef`]; the node layer
/// stamps the owning node's identity onto them.
pub fn parse_tasks(text: &str) -> Vec<Task> {
    let mut tasks: Vec<Task> = Vec::new();

    for (line_number, line) in text.split('\n').enumerate() {
        if let Some(caps) = TASK_RE.captures(line) {
            let marker = caps[1].chars().next().unwrap_or(' ');
            let Some(status) = TaskStatus::from_marker(marker) else {
                continue;
            };
            let (text, priority) = split_priority(&caps[2]);
            tasks.push(Task {
                project: ProjectRef::default(),
                text,
                status,
                priority,
                line: line_number,
                line_text: line.to_string(),
                sessions: Vec::new(),
                schedule: None,
                completions: Vec::new(),
            });
            continue;
        }

        let Some(owner) = tasks.last_mut() else {
            continue;
        };

        if let Some(caps) = SESSION_RE.captures(line) {
            if let Some((start, end)) = parse_interval(&caps[1]) {
                owner.sessions.push(TaskSession {
                    start,
                    end,
                    line: line_number,
                });
            }
        } else if let Some(caps) = SCHEDULE_RE.captures(line) {
            if let Some(schedule) = parse_schedule(&caps[1], line_number) {
                owner.schedule = Some(schedule);
            }
        } else if let Some(caps) = DONE_RE.captures(line) {
            if let Some(timestamp) = parse_stamp(&caps[1]) {
                owner.completions.push(TaskCompletion {
                    timestamp,
                    line: line_number,
                });
            }
        }
    }

    tasks
}

fn split_priority(raw: &str) -> (String, u32) {
    if let Some(caps) = PRIORITY_RE.captures(raw) {
        if let Ok(priority) = caps[1].parse() {
            let text = raw[..caps.get(0).map_or(raw.len(), |m| m.start())].to_string();
            return (text, priority);
        }
    }
    (raw.trim_end().to_string(), 0)
}

/// `YYYY.MM.DD HH:MM` with an optional `-HH:MM` end on the same day.
fn parse_interval(value: &str) -> Option<(NaiveDateTime, Option<NaiveDateTime>)> {
    match value.split_once('-') {
        Some((start, end)) => {
            let start = parse_stamp(start.trim())?;
            let end = NaiveTime::parse_from_str(end.trim(), TIME_FMT).ok()?;
            Some((start, Some(start.date().and_time(end))))
        }
        None => Some((parse_stamp(value)?, None)),
    }
}

/// `YYYY.MM.DD [HH:MM[-HH:MM]] [| repeat]`.
fn parse_schedule(value: &str, line: usize) -> Option<TaskSchedule> {
    let (when, repeat) = match value.split_once('|') {
        Some((when, repeat)) => (when.trim(), repeat.trim().to_string()),
        None => (value.trim(), String::new()),
    };
    let (start, end) = parse_interval(when)?;
    Some(TaskSchedule {
        start,
        end,
        repeat,
        line,
    })
}

/// A timestamp with or without a time of day; a bare date means 00:00.
fn parse_stamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(stamp) = NaiveDateTime::parse_from_str(value, DATETIME_FMT) {
        return Some(stamp);
    }
    NaiveDate::parse_from_str(value, DATE_FMT)
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}
