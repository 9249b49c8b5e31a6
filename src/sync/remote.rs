use crate::{
    foundation::error::{ReelcutError, ReelcutResult},
    timeline::project::TimelineProject,
};

pub const SAVE_ENDPOINT: &str = "/api/timeline/save";

/// Body of a save call.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub project_id: String,
    /// Local save counter; increases with every serialized state.
    pub revision: u64,
    /// The serialized [`TimelineProject`].
    pub payload: String,
}

impl SaveRequest {
    pub fn project(&self) -> ReelcutResult<TimelineProject> {
        TimelineProject::from_json(&self.payload)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SaveAck {
    pub revision: u64,
}

/// Primary persistence target.
pub trait RemoteStore {
    fn save(&mut self, request: &SaveRequest) -> ReelcutResult<SaveAck>;
}

/// In-process remote for tests and offline tooling.
#[derive(Debug)]
pub struct MemoryRemote {
    received: Vec<SaveRequest>,
    failures_left: usize,
    reachable: bool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            received: Vec::new(),
            failures_left: 0,
            reachable: true,
        }
    }

    /// Make the next `n` calls fail.
    pub fn fail_next(&mut self, n: usize) {
        self.failures_left = n;
    }

    pub fn set_reachable(&mut self, reachable: bool) {
        self.reachable = reachable;
    }

    /// Requests accepted so far, oldest first.
    pub fn received(&self) -> &[SaveRequest] {
        &self.received
    }

    pub fn last(&self) -> Option<&SaveRequest> {
        self.received.last()
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStore for MemoryRemote {
    fn save(&mut self, request: &SaveRequest) -> ReelcutResult<SaveAck> {
        if !self.reachable {
            return Err(ReelcutError::offline(format!("{SAVE_ENDPOINT} unreachable")));
        }
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(ReelcutError::persistence(format!(
                "{SAVE_ENDPOINT} rejected revision {}",
                request.revision
            )));
        }
        self.received.push(request.clone());
        Ok(SaveAck {
            revision: request.revision,
        })
    }
}

/// Secondary, one-shot export of the project (a repository commit, a bucket object).
pub trait SnapshotTarget {
    /// Returns a reference to the published snapshot (commit id, object key).
    fn publish(&mut self, project_id: &str, payload: &str) -> ReelcutResult<String>;
}

#[derive(Debug, Default)]
pub struct MemorySnapshots {
    pub published: Vec<(String, String)>,
}

impl SnapshotTarget for MemorySnapshots {
    fn publish(&mut self, project_id: &str, payload: &str) -> ReelcutResult<String> {
        self.published
            .push((project_id.to_string(), payload.to_string()));
        Ok(format!("{project_id}@{}", self.published.len()))
    }
}
