//! Text-mutation protocol for toggling task state.
//!
//! Every operation is a bounded set of line edits over a snapshot of the
//! owning document: replace the checkbox line, rewrite a `Session:` line,
//! splice a metadata line in or out. Nothing here renumbers other tasks;
//! renumbering is implicit in the rewritten text and becomes visible when
//! the caller re-parses. A task parsed before a rewrite must never be
//! mutated again afterwards; the protocol detects that case by comparing
//! the checkbox line against the parsed snapshot before touching anything.

use chrono::NaiveDateTime;

use crate::document::LineBuffer;
use crate::error::{CoreError, Result};
use crate::node::Node;
use crate::task::{Task, TaskSchedule, TaskStatus, INDENT_UNIT};

/// A state-toggling operation on a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOp {
    /// Open a work session, or close the currently open one.
    ToggleInProgress,
    /// Flip done state: completion markers for recurring tasks, checkbox
    /// glyphs otherwise.
    ToggleDone,
    /// Drop an accidental `[-]` marker without recording a session.
    Deactivate,
}

/// Apply `op` to `task` over the document text, returning the rewritten
/// document. Pure: the caller owns the write and the re-parse.
pub fn render_mutation(
    document: &str,
    task: &Task,
    op: TaskOp,
    now: NaiveDateTime,
) -> Result<String> {
    let mut buf = LineBuffer::from_text(document);

    // precondition: the checkbox line must still match the parsed snapshot
    match buf.get(task.line) {
        Some(line) if line == task.line_text => {}
        _ => return Err(CoreError::StaleTask { line: task.line }),
    }

    match op {
        TaskOp::ToggleInProgress => toggle_in_progress(&mut buf, task, now)?,
        TaskOp::ToggleDone => toggle_done(&mut buf, task, now)?,
        TaskOp::Deactivate => deactivate(&mut buf, task)?,
    }

    Ok(buf.to_text())
}

/// Read the node's document, apply `op`, and write the result back in one
/// whole-file overwrite. The caller must re-parse the node before using
/// any of its tasks again.
pub fn apply_mutation(
    node: &dyn Node,
    task: &Task,
    op: TaskOp,
    now: NaiveDateTime,
) -> Result<String> {
    let text = node.text()?;
    let updated = render_mutation(&text, task, op, now)?;
    node.write_text(&updated)?;
    tracing::debug!(node = %node.id(), line = task.line, ?op, "rewrote node document");
    Ok(updated)
}

fn toggle_in_progress(buf: &mut LineBuffer, task: &Task, now: NaiveDateTime) -> Result<()> {
    if let Some(open) = task.open_session() {
        buf.replace_at(open.line, closed_session_line(task, open.start, now))?;

        // rapid start/stop leaves a same-minute closed session just above
        let previous = task.sessions.iter().take_while(|s| !s.is_open()).last();
        if let Some(prev) = previous {
            if prev.starts_at_minute(now) {
                buf.remove_at(prev.line)?;
            }
        }
        return Ok(());
    }

    let at = task
        .last_session()
        .map(|s| s.line + 1)
        .or_else(|| task.schedule.as_ref().map(|s| s.line + 1))
        .unwrap_or(task.line + 1);
    buf.insert_at(at, open_session_line(task, now))
}

fn toggle_done(buf: &mut LineBuffer, task: &Task, now: NaiveDateTime) -> Result<()> {
    match &task.schedule {
        Some(schedule) if schedule.is_recurring() => {
            toggle_done_recurring(buf, task, schedule, now)
        }
        _ => toggle_done_plain(buf, task, now),
    }
}

/// Recurring tasks track done state with per-date `Done:` markers; the
/// checkbox line is left alone.
fn toggle_done_recurring(
    buf: &mut LineBuffer,
    task: &Task,
    schedule: &TaskSchedule,
    now: NaiveDateTime,
) -> Result<()> {
    // un-complete: a marker for today already exists
    if let Some(completion) = task.completion_for_date(now.date()) {
        buf.remove_at(completion.line)?;
        return Ok(());
    }

    if let Some(open) = task.open_session() {
        buf.replace_at(open.line, closed_session_line(task, open.start, now))?;
    }

    let at = task
        .last_completion()
        .map(|c| c.line + 1)
        .or_else(|| task.last_session().map(|s| s.line + 1))
        .unwrap_or(schedule.line + 1);
    buf.insert_at(at, done_line(task, now))
}

fn toggle_done_plain(buf: &mut LineBuffer, task: &Task, now: NaiveDateTime) -> Result<()> {
    if task.status == TaskStatus::Cancelled {
        return Ok(());
    }

    // glyph cycle; unscheduled tasks bounce between [x] and [-],
    // scheduled ones reset to [ ] so the next occurrence starts clean
    let updated = match (task.schedule.is_some(), task.status) {
        (false, TaskStatus::Done) => task.line_text.replacen("[x]", "[-]", 1),
        (true, TaskStatus::Done) => task.line_text.replacen("[x]", "[ ]", 1),
        (_, status) => task.line_text.replacen(status.glyph(), "[x]", 1),
    };
    buf.replace_at(task.line, updated)?;

    if let Some(open) = task.open_session() {
        buf.replace_at(open.line, closed_session_line(task, open.start, now))?;
    }

    // never-touched task: record a zero-duration session as the touch
    if task.sessions.is_empty() && !task.is_done() {
        buf.insert_at(task.line + 1, bracket_session_line(task, now))?;
    }

    Ok(())
}

fn deactivate(buf: &mut LineBuffer, task: &Task) -> Result<()> {
    buf.replace_at(task.line, task.line_text.replacen("[-]", "[ ]", 1))
}

fn meta_indent(task: &Task) -> String {
    INDENT_UNIT.repeat(task.indent_level() + 1)
}

fn open_session_line(task: &Task, start: NaiveDateTime) -> String {
    format!(
        "{}Session: {}",
        meta_indent(task),
        start.format("%Y.%m.%d %H:%M")
    )
}

fn closed_session_line(task: &Task, start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "{}Session: {}-{}",
        meta_indent(task),
        start.format("%Y.%m.%d %H:%M"),
        end.format("%H:%M")
    )
}

fn bracket_session_line(task: &Task, now: NaiveDateTime) -> String {
    closed_session_line(task, now, now)
}

fn done_line(task: &Task, now: NaiveDateTime) -> String {
    format!(
        "{}Done: {}",
        meta_indent(task),
        now.format("%Y.%m.%d %H:%M")
    )
}
