//! Task commands: queries over the active set and the three toggles.

use chrono::{Local, NaiveDateTime};
use clap::Subcommand;
use std::collections::HashMap;

use taskwiki_core::{
    apply_filters, apply_mutation, compute_task_reward, current_task, summarize, CoreError,
    DefaultRewardPolicy, FilterOptions, Node, TaskOp, TimeFilter, Wiki,
};

use super::common;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Show the first in-progress task
    Current {
        /// Include elapsed time of the running session
        #[arg(short, long)]
        elapsed: bool,
    },
    /// List active tasks, sorted
    List {
        /// Time window: today or rolling
        #[arg(long, default_value = "today")]
        time: String,
        /// Only show tasks of this project
        #[arg(long)]
        focus: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Start or stop a work session on the task at <node>:<line>
    Start {
        /// Node ID
        node: String,
        /// One-based line number of the checkbox line
        line: usize,
    },
    /// Toggle the done state of the task at <node>:<line>
    Done {
        /// Node ID
        node: String,
        /// One-based line number of the checkbox line
        line: usize,
    },
    /// Drop the in-progress marker without recording a session
    Deactivate {
        /// Node ID
        node: String,
        /// One-based line number of the checkbox line
        line: usize,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let (config, wiki) = common::open_wiki()?;
    let now = Local::now().naive_local();

    match action {
        TaskAction::Current { elapsed } => {
            let tasks = wiki.tasks()?;
            if let Some(task) = current_task(&tasks, now) {
                if elapsed {
                    let running = task
                        .last_session()
                        .map(|s| common::format_duration(s.duration(now)))
                        .unwrap_or_default();
                    println!("{} - {} ({running})", task.project.name, task.text);
                } else {
                    println!("{} - {}", task.project.name, task.text);
                }
            }
        }
        TaskAction::List { time, focus, json } => {
            let set = wiki.get_tasks(now)?;
            let options = FilterOptions {
                time: match time.as_str() {
                    "rolling" | "24h" => TimeFilter::Rolling24h,
                    _ => TimeFilter::Today,
                },
                focus_project: focus,
                project_toggles: HashMap::new(),
                done_lookback: config.done_lookback(),
            };
            let filtered = apply_filters(&set.active, &options, now);

            if json {
                println!("{}", serde_json::to_string_pretty(&filtered)?);
            } else {
                print_task_list(&filtered, now);
            }
        }
        TaskAction::Start { node, line } => {
            mutate(&wiki, &node, line, TaskOp::ToggleInProgress, now)?;
        }
        TaskAction::Done { node, line } => {
            mutate(&wiki, &node, line, TaskOp::ToggleDone, now)?;
        }
        TaskAction::Deactivate { node, line } => {
            mutate(&wiki, &node, line, TaskOp::Deactivate, now)?;
        }
    }

    Ok(())
}

fn print_task_list(tasks: &[taskwiki_core::Task], now: NaiveDateTime) {
    for task in tasks {
        let mut extras = Vec::new();
        let worked = task.total_session_time_for_date(now.date(), now);
        if worked > chrono::Duration::zero() {
            extras.push(common::format_duration(worked));
        }
        extras.push(format!("{}pt", compute_task_reward(task)));

        println!(
            "{} {} - {} ({})",
            task.status.glyph(),
            task.project.name,
            task.text,
            extras.join(", ")
        );
    }

    let summary = summarize(tasks, now, &DefaultRewardPolicy);
    println!(
        "-- {} worked, {} points",
        common::format_duration(summary.work_time),
        summary.reward_points
    );
}

fn mutate(
    wiki: &Wiki,
    node_id: &str,
    line: usize,
    op: TaskOp,
    now: NaiveDateTime,
) -> Result<(), Box<dyn std::error::Error>> {
    let node = wiki
        .find_node_by_id(node_id)
        .ok_or_else(|| CoreError::NodeNotFound(node_id.to_string()))?;
    let tasks = node.tasks()?;
    let task = tasks
        .iter()
        .find(|t| t.line + 1 == line)
        .ok_or_else(|| format!("no task at {node_id}:{line}"))?;
    apply_mutation(node, task, op, now)?;
    println!("updated {}", node.path().display());
    Ok(())
}
