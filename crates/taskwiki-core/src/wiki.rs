//! The wiki: a tree of nodes under one root directory.
//!
//! Walking the tree and parsing nodes is read-only and independent per
//! node; a node's document must be re-parsed after any mutation of that
//! same document. Node IDs must be unique across the tree and the walk
//! fails on the first collision.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{CoreError, Result};
use crate::node::{LocalNode, Node};
use crate::selector;
use crate::task::Task;

#[derive(Debug, Clone)]
pub struct WikiConfig {
    pub root: PathBuf,
}

/// All parsed tasks plus the selected, sorted active set.
#[derive(Debug, Clone)]
pub struct TaskSet {
    pub tasks: Vec<Task>,
    pub active: Vec<Task>,
}

#[derive(Debug)]
pub struct Wiki {
    config: WikiConfig,
    nodes: Vec<LocalNode>,
}

impl Wiki {
    /// Walk the root and build the node collection.
    pub fn open(config: WikiConfig) -> Result<Self> {
        let mut wiki = Self {
            config,
            nodes: Vec::new(),
        };
        wiki.refresh()?;
        Ok(wiki)
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn nodes(&self) -> &[LocalNode] {
        &self.nodes
    }

    pub fn find_node_by_id(&self, id: &str) -> Option<&LocalNode> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn find_node_by_path(&self, path: &Path) -> Option<&LocalNode> {
        self.nodes.iter().find(|n| n.path() == path)
    }

    /// Re-walk the whole tree, failing on the first node ID collision.
    pub fn refresh(&mut self) -> Result<()> {
        let mut nodes = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        let walker = WalkDir::new(&self.config.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker.filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let node = LocalNode::open(entry.path())?;
            let id = node.id();
            if let Some(first) = seen.insert(id.clone(), node.path().to_path_buf()) {
                return Err(CoreError::NodeCollision {
                    id,
                    first,
                    second: node.path().to_path_buf(),
                });
            }
            nodes.push(node);
        }

        tracing::debug!(count = nodes.len(), root = %self.config.root.display(), "refreshed wiki nodes");
        self.nodes = nodes;
        Ok(())
    }

    /// Re-open a single node after its document changed, or pick up a
    /// freshly created one.
    pub fn refresh_path(&mut self, path: &Path) -> Result<()> {
        let node = LocalNode::open(path)?;
        match self.nodes.iter().position(|n| n.path() == path) {
            Some(index) => self.nodes[index] = node,
            None => self.nodes.push(node),
        }
        Ok(())
    }

    /// Every task in every node, in walk order.
    pub fn tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        for node in &self.nodes {
            tasks.extend(node.tasks()?);
        }
        Ok(tasks)
    }

    /// The full task list together with the active set for `now`.
    pub fn get_tasks(&self, now: NaiveDateTime) -> Result<TaskSet> {
        let tasks = self.tasks()?;
        let active = selector::select_active(&tasks, now);
        Ok(TaskSet { tasks, active })
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
