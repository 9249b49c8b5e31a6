use std::time::Instant;

/// What the save indicator shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Pending,
    Saving,
    Saved,
    Failed,
    Offline,
}

/// Save state machine position, independent of connectivity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavePhase {
    Pending,
    Saving,
    #[default]
    Saved,
    Failed,
}

/// Snapshot of the pipeline for status displays.
#[derive(Clone, Debug, PartialEq)]
pub struct SyncState {
    pub phase: SavePhase,
    pub online: bool,
    /// Serialized states waiting to be sent (the in-flight one is not counted).
    pub queue_length: usize,
    pub last_saved: Option<Instant>,
    pub last_error: Option<String>,
}

impl SyncState {
    /// `Offline` overlays whatever phase the pipeline is in.
    pub fn status(&self) -> SaveStatus {
        if !self.online {
            return SaveStatus::Offline;
        }
        match self.phase {
            SavePhase::Pending => SaveStatus::Pending,
            SavePhase::Saving => SaveStatus::Saving,
            SavePhase::Saved => SaveStatus::Saved,
            SavePhase::Failed => SaveStatus::Failed,
        }
    }
}
