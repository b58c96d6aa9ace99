//! Line-buffer abstraction over a node document.
//!
//! Mutation is expressed as bounded edits on an ordered sequence of
//! lines: replace one line, splice one in, splice one out. Every edit is
//! index-checked up front so a stale line number surfaces as an error
//! instead of a panic or silent corruption. The split/join pair is
//! lossless, trailing newline included.

use crate::error::{CoreError, Result};

/// An ordered sequence of document lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Replace the line at `index`.
    pub fn replace_at(&mut self, index: usize, line: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.lines[index] = line.into();
        Ok(())
    }

    /// Insert a line before `index`; `index == len` appends.
    pub fn insert_at(&mut self, index: usize, line: impl Into<String>) -> Result<()> {
        if index > self.lines.len() {
            return Err(CoreError::LineOutOfBounds {
                index,
                len: self.lines.len(),
            });
        }
        self.lines.insert(index, line.into());
        Ok(())
    }

    /// Remove and return the line at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<String> {
        self.check_index(index)?;
        Ok(self.lines.remove(index))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.lines.len() {
            return Err(CoreError::LineOutOfBounds {
                index,
                len: self.lines.len(),
            });
        }
        Ok(())
    }
}
