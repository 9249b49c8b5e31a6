use std::path::Path;

use crate::{
    foundation::error::ReelcutResult,
    placement::ripple::RipplePolicy,
    placement::snap::SnapOpts,
    sync::pipeline::SyncOpts,
};

pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Engine configuration. Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineOpts {
    pub sync: SyncOpts,
    pub ripple: RipplePolicy,
    pub snap: SnapOpts,
    /// Undo steps kept; 0 disables history.
    pub history_depth: usize,
    /// Whether ripple editing starts switched on.
    pub ripple_on_start: bool,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            sync: SyncOpts::default(),
            ripple: RipplePolicy::default(),
            snap: SnapOpts::default(),
            history_depth: DEFAULT_HISTORY_DEPTH,
            ripple_on_start: false,
        }
    }
}

impl EngineOpts {
    pub fn from_json(json: &str) -> ReelcutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> ReelcutResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
