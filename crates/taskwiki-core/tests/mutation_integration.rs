//! Integration tests for the mutation protocol against real files.
//!
//! These drive the full loop the front end relies on: walk a temp wiki,
//! parse a node, rewrite it through the engine, re-parse, repeat.

use chrono::{NaiveDate, NaiveDateTime};
use indoc::indoc;
use proptest::prelude::*;
use std::fs;

use taskwiki_core::markup::parse_tasks;
use taskwiki_core::{apply_mutation, render_mutation, CoreError, TaskOp, Wiki, WikiConfig};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[test]
fn start_stop_workflow_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project-site.txt");
    fs::write(
        &path,
        indoc! {"
            # project-site

            [ ] write spec !2
            [ ] later thing
        "},
    )
    .unwrap();

    let wiki = Wiki::open(WikiConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();
    let node = wiki.find_node_by_id("project-site").unwrap();

    // start working
    let tasks = node.tasks().unwrap();
    let task = tasks.iter().find(|t| t.text == "write spec").unwrap();
    apply_mutation(node, task, TaskOp::ToggleInProgress, at(2024, 3, 1, 9, 0)).unwrap();

    // fresh parse sees the open session
    let tasks = node.tasks().unwrap();
    let task = tasks.iter().find(|t| t.text == "write spec").unwrap();
    assert!(task.is_in_progress(at(2024, 3, 1, 9, 30)));

    // finish
    apply_mutation(node, task, TaskOp::ToggleDone, at(2024, 3, 1, 10, 30)).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        indoc! {"
            # project-site

            [x] write spec !2
              Session: 2024.03.01 09:00-10:30
            [ ] later thing
        "}
    );
}

#[test]
fn recurring_toggle_twice_restores_file_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chores.txt");
    let original = indoc! {"
        # chores

        [ ] water plants
          Schedule: 2024.03.01 | daily
    "};
    fs::write(&path, original).unwrap();

    let wiki = Wiki::open(WikiConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();
    let node = wiki.find_node_by_id("chores").unwrap();

    let tasks = node.tasks().unwrap();
    apply_mutation(node, &tasks[0], TaskOp::ToggleDone, at(2024, 3, 5, 18, 0)).unwrap();
    assert!(fs::read_to_string(&path)
        .unwrap()
        .contains("  Done: 2024.03.05 18:00"));

    let tasks = node.tasks().unwrap();
    apply_mutation(node, &tasks[0], TaskOp::ToggleDone, at(2024, 3, 5, 19, 0)).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn concurrent_edit_is_detected_and_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inbox.txt");
    fs::write(&path, "[ ] original task").unwrap();

    let wiki = Wiki::open(WikiConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();
    let node = wiki.find_node_by_id("inbox").unwrap();
    let tasks = node.tasks().unwrap();

    // someone else rewrites the document between parse and toggle
    let edited = "[ ] something entirely different";
    fs::write(&path, edited).unwrap();

    let err = apply_mutation(node, &tasks[0], TaskOp::ToggleDone, at(2024, 3, 1, 9, 0))
        .unwrap_err();
    assert!(matches!(err, CoreError::StaleTask { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), edited);
}

#[test]
fn deactivate_then_list_drops_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("focus.txt");
    fs::write(&path, "[-] accidental").unwrap();

    let wiki = Wiki::open(WikiConfig {
        root: dir.path().to_path_buf(),
    })
    .unwrap();
    let node = wiki.find_node_by_id("focus").unwrap();
    let tasks = node.tasks().unwrap();

    apply_mutation(node, &tasks[0], TaskOp::Deactivate, at(2024, 3, 1, 9, 0)).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "[ ] accidental");

    // no session record was created
    let tasks = node.tasks().unwrap();
    assert!(tasks[0].sessions.is_empty());
}

proptest! {
    /// Starting then stopping a session, at any two moments of the same
    /// day, leaves exactly one closed session line.
    #[test]
    fn start_stop_yields_exactly_one_closed_session(
        hour in 0u32..23,
        minute in 0u32..60,
        delta in 0i64..60,
    ) {
        let doc = "[ ] fuzzed task";
        let start = at(2024, 3, 1, hour, minute);
        let stop = start + chrono::Duration::minutes(delta);

        let tasks = parse_tasks(doc);
        let once = render_mutation(doc, &tasks[0], TaskOp::ToggleInProgress, start).unwrap();

        let tasks = parse_tasks(&once);
        let twice = render_mutation(&once, &tasks[0], TaskOp::ToggleInProgress, stop).unwrap();

        let sessions: Vec<&str> = twice
            .split('\n')
            .filter(|l| l.contains("Session:"))
            .collect();
        prop_assert_eq!(sessions.len(), 1);
        // the surviving session is closed
        let parsed = parse_tasks(&twice);
        prop_assert_eq!(parsed[0].sessions.len(), 1);
        prop_assert!(!parsed[0].sessions[0].is_open());
    }

    /// Recurring toggle-done twice within a day is a no-op on the line
    /// count no matter when it happens.
    #[test]
    fn recurring_double_toggle_preserves_line_count(
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let doc = "[ ] routine\n  Schedule: 2024.03.01 | daily";
        let now = at(2024, 3, 8, hour, minute);

        let tasks = parse_tasks(doc);
        let once = render_mutation(doc, &tasks[0], TaskOp::ToggleDone, now).unwrap();
        prop_assert_eq!(once.split('\n').count(), 3);

        let tasks = parse_tasks(&once);
        let twice = render_mutation(&once, &tasks[0], TaskOp::ToggleDone, now).unwrap();
        prop_assert_eq!(twice, doc);
    }
}
