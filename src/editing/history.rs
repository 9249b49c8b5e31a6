//! Snapshot undo/redo over whole projects.
//!
//! Entries hold the project as it was *before* a labelled edit. A drag that issues
//! many small edits can be grouped with [`History::begin_batch`] / [`History::end_batch`]
//! so it undoes in one step.

use crate::timeline::project::TimelineProject;

#[derive(Clone, Debug)]
struct Entry {
    label: String,
    snapshot: TimelineProject,
}

#[derive(Clone, Debug)]
pub struct History {
    undo: Vec<Entry>,
    redo: Vec<Entry>,
    depth: usize,
    batch: Option<Entry>,
}

impl History {
    /// `depth` of zero disables history.
    pub fn new(depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            depth,
            batch: None,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo.last().map(|e| e.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo.last().map(|e| e.label.as_str())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Record the state before an edit. Clears redo. Ignored inside a batch.
    pub fn record(&mut self, label: &str, before: &TimelineProject) {
        if self.depth == 0 || self.batch.is_some() {
            return;
        }
        self.redo.clear();
        self.undo.push(Entry {
            label: label.to_string(),
            snapshot: before.clone(),
        });
        if self.undo.len() > self.depth {
            let excess = self.undo.len() - self.depth;
            self.undo.drain(..excess);
        }
        tracing::debug!(label, undo_depth = self.undo.len(), "history entry recorded");
    }

    pub fn begin_batch(&mut self, label: &str, before: &TimelineProject) {
        if self.batch.is_some() {
            tracing::warn!(label, "batch already open; keeping the first one");
            return;
        }
        self.batch = Some(Entry {
            label: label.to_string(),
            snapshot: before.clone(),
        });
    }

    /// Close the open batch. A batch whose project did not change records nothing.
    pub fn end_batch(&mut self, current: &TimelineProject) {
        let Some(entry) = self.batch.take() else {
            return;
        };
        if entry.snapshot != *current {
            self.record(&entry.label, &entry.snapshot);
        }
    }

    /// Step back. `current` goes onto the redo stack; returns the project to restore.
    pub fn undo(&mut self, current: &TimelineProject) -> Option<TimelineProject> {
        self.batch = None;
        let entry = self.undo.pop()?;
        tracing::debug!(label = %entry.label, "undo");
        self.redo.push(Entry {
            label: entry.label.clone(),
            snapshot: current.clone(),
        });
        Some(entry.snapshot)
    }

    pub fn redo(&mut self, current: &TimelineProject) -> Option<TimelineProject> {
        self.batch = None;
        let entry = self.redo.pop()?;
        tracing::debug!(label = %entry.label, "redo");
        self.undo.push(Entry {
            label: entry.label.clone(),
            snapshot: current.clone(),
        });
        Some(entry.snapshot)
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.batch = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editing/history.rs"]
mod tests;
