use crate::{
    foundation::error::{ReelcutError, ReelcutResult},
    placement::engine::insert_group,
    placement::ripple::EditMode,
    timeline::asset::{TimelineAsset, new_asset_id},
    timeline::project::TimelineProject,
};

/// Deep copies of assets waiting to be pasted.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    items: Vec<TimelineAsset>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TimelineAsset] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Copy the listed assets. Unknown ids are skipped; if none resolve the buffer is
    /// left as it was. Returns the number copied.
    pub fn copy<S: AsRef<str>>(&mut self, project: &TimelineProject, ids: &[S]) -> usize {
        let mut copied: Vec<TimelineAsset> = ids
            .iter()
            .filter_map(|id| project.asset(id.as_ref()))
            .cloned()
            .collect();
        if copied.is_empty() {
            return 0;
        }
        copied.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        copied.dedup_by(|a, b| a.id == b.id);
        self.items = copied;
        tracing::debug!(count = self.items.len(), "copied to clipboard");
        self.items.len()
    }

    /// Insert a fresh copy of the buffer with its earliest asset at `playhead`.
    ///
    /// Relative start offsets and lanes are kept; collisions are resolved like any
    /// other group insert. The buffer is untouched, so pasting again yields another
    /// independent copy. Returns the new ids.
    pub fn paste(
        &self,
        project: &mut TimelineProject,
        playhead: f64,
        mode: EditMode,
    ) -> ReelcutResult<Vec<String>> {
        if !playhead.is_finite() {
            return Err(ReelcutError::validation("paste position must be a finite time"));
        }
        if self.items.is_empty() {
            return Ok(Vec::new());
        }
        let anchor = self
            .items
            .iter()
            .map(|a| a.start_time)
            .fold(f64::INFINITY, f64::min);
        let at = playhead.max(0.0);
        let group = self
            .items
            .iter()
            .map(|item| {
                let mut copy = item.clone();
                copy.id = new_asset_id();
                copy.start_time = at + (item.start_time - anchor);
                copy
            })
            .collect();
        insert_group(project, group, mode)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editing/clipboard.rs"]
mod tests;
