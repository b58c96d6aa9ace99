//! # taskwiki Core Library
//!
//! Task engine over plain-text wiki nodes. Tasks live as checkbox-marked
//! lines inside ordinary documents; the engine classifies them, decides
//! what is active today, accounts worked time, and toggles state by
//! rewriting the exact source lines. There is no database: every mutation
//! is a whole-file rewrite followed by a fresh parse.
//!
//! ## Architecture
//!
//! - **Markup**: line-oriented parser producing tasks with their source
//!   positions
//! - **Task model**: status, priority, sessions, schedule, completions,
//!   plus the accounting over them
//! - **Mutation protocol**: bounded line edits implementing the three
//!   toggles, precondition-checked against stale parses
//! - **Selector & filters**: the "what to work on today" list, totally
//!   ordered, narrowed by time window and project filters
//! - **Wiki**: the node tree on disk, walked and re-parsed on demand
//!
//! ## Key Components
//!
//! - [`Wiki`]: node collection rooted at a directory
//! - [`Task`]: one parsed checkbox line plus its metadata
//! - [`TaskOp`]: the editor-free state toggles
//! - [`Config`]: TOML configuration management

pub mod document;
pub mod error;
pub mod filter;
pub mod markup;
pub mod mutation;
pub mod node;
pub mod selector;
pub mod storage;
pub mod task;
pub mod wiki;

pub use document::LineBuffer;
pub use error::{ConfigError, CoreError, Result};
pub use filter::{apply_filters, FilterOptions, TimeFilter};
pub use mutation::{apply_mutation, render_mutation, TaskOp};
pub use node::{LocalNode, Node};
pub use selector::{
    classify, compare_active, current_task, select_active, summarize, ActiveReason, ActiveSummary,
    STICKY_PRIORITY,
};
pub use storage::Config;
pub use task::reward::{compute_task_reward, DefaultRewardPolicy, RewardPolicy};
pub use task::{ProjectRef, Task, TaskCompletion, TaskSchedule, TaskSession, TaskStatus};
pub use wiki::{TaskSet, Wiki, WikiConfig};
