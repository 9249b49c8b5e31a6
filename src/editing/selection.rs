use crate::timeline::project::TimelineProject;

/// Rectangle dragged over the timeline: display rows by time range.
///
/// Rows count video lanes top-down, then audio lanes (see
/// [`TrackConfig::display_row`](crate::timeline::project::TrackConfig::display_row)).
/// Bounds may be given in either order.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectionBox {
    pub first_row: usize,
    pub last_row: usize,
    pub start: f64,
    pub end: f64,
}

impl SelectionBox {
    fn rows(&self) -> (usize, usize) {
        (
            self.first_row.min(self.last_row),
            self.first_row.max(self.last_row),
        )
    }

    fn span(&self) -> (f64, f64) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

/// Selected asset ids in the order they were picked.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Selection {
    ids: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// The selected id when exactly one asset is selected.
    pub fn single(&self) -> Option<&str> {
        match self.ids.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Plain click: the selection becomes just `id`.
    pub fn click(&mut self, id: &str) {
        self.ids.clear();
        self.ids.push(id.to_string());
    }

    /// Modifier-click. Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.ids.retain(|s| s != id);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn replace<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.clear();
        for id in ids {
            let id = id.into();
            if !self.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Select every asset touched by `area`. Returns how many assets it hit.
    ///
    /// A zero-width box selects assets under that instant.
    pub fn box_select(
        &mut self,
        project: &TimelineProject,
        area: SelectionBox,
        additive: bool,
    ) -> usize {
        let (top, bottom) = area.rows();
        let (start, end) = area.span();
        let mut hits: Vec<(usize, f64, &str)> = project
            .assets
            .iter()
            .filter(|a| {
                let row = project.tracks.display_row(a.lane());
                row >= top && row <= bottom
            })
            .filter(|a| {
                if end > start {
                    a.start_time < end && a.end_time() > start
                } else {
                    a.contains_time(start)
                }
            })
            .map(|a| (project.tracks.display_row(a.lane()), a.start_time, a.id.as_str()))
            .collect();
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

        if !additive {
            self.ids.clear();
        }
        for (_, _, id) in &hits {
            if !self.contains(id) {
                self.ids.push((*id).to_string());
            }
        }
        hits.len()
    }

    /// Drop ids whose asset no longer exists. Returns how many were dropped.
    pub fn retain_existing(&mut self, project: &TimelineProject) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| project.contains(id));
        before - self.ids.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editing/selection.rs"]
mod tests;
