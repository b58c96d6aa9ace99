//! Node storage capability and its file-backed implementation.
//!
//! The engine never depends on a concrete storage type; everything it
//! needs from a node is the capability surface below. `LocalNode` backs
//! it with a plain file, writing via temp-then-rename so a crashed write
//! leaves the previous content intact.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};
use crate::markup;
use crate::task::{ProjectRef, Task};

/// Capability surface a node exposes to the task engine.
pub trait Node {
    /// Stable identity: the document title when present, else the file name.
    fn id(&self) -> String;
    /// Display name, derived from the file name.
    fn name(&self) -> String;
    fn path(&self) -> &Path;
    fn text(&self) -> Result<String>;
    /// Whole-file overwrite of the document.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// A node backed by a file on local storage.
#[derive(Debug, Clone)]
pub struct LocalNode {
    path: PathBuf,
    title: Option<String>,
}

impl LocalNode {
    /// Open a node, reading the document once to extract its title.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|e| CoreError::io(&path, e))?;
        let title = markup::document_title(&text);
        Ok(Self { path, title })
    }

    /// Parse the document into tasks, each stamped with this node's
    /// identity. Line numbers are valid until the next write.
    pub fn tasks(&self) -> Result<Vec<Task>> {
        let text = self.text()?;
        let project = ProjectRef {
            id: self.id(),
            name: self.name(),
            path: self.path.clone(),
        };
        let mut tasks = markup::parse_tasks(&text);
        for task in &mut tasks {
            task.project = project.clone();
        }
        Ok(tasks)
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Node for LocalNode {
    fn id(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.stem())
    }

    fn name(&self) -> String {
        self.stem()
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn text(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| CoreError::io(&self.path, e))
    }

    fn write_text(&self, text: &str) -> Result<()> {
        // temp-then-rename in the same directory; a crash mid-write
        // leaves the original document untouched
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = self.path.with_file_name(format!(".{file_name}.tmp"));
        fs::write(&tmp, text).map_err(|e| CoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| CoreError::io(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn id_prefers_title_over_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "# project-website\n\n[ ] task").unwrap();

        let node = LocalNode::open(&path).unwrap();
        assert_eq!(node.id(), "project-website");
        assert_eq!(node.name(), "notes");
    }

    #[test]
    fn id_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inbox.txt");
        fs::write(&path, "[ ] task").unwrap();

        let node = LocalNode::open(&path).unwrap();
        assert_eq!(node.id(), "inbox");
    }

    #[test]
    fn tasks_are_stamped_with_project() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chores.txt");
        fs::write(&path, "# chores\n[ ] sweep\n[ ] mop").unwrap();

        let node = LocalNode::open(&path).unwrap();
        let tasks = node.tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.project.id == "chores"));
        assert!(tasks.iter().all(|t| t.project.path == path));
    }

    #[test]
    fn write_text_replaces_content_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "before").unwrap();

        let node = LocalNode::open(&path).unwrap();
        node.write_text("after").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "after");

        // no temp file left behind
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn open_missing_file_is_an_io_error() {
        let err = LocalNode::open("/nonexistent/never/doc.txt").unwrap_err();
        assert!(matches!(err, CoreError::Io { .. }));
    }
}
