use std::collections::BTreeSet;
use std::path::Path;

use crate::{
    foundation::error::{ReelcutError, ReelcutResult},
    foundation::time::{Fps, intervals_overlap},
    timeline::asset::{Lane, TimelineAsset, TrackKind},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Number of lanes per track kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrackConfig {
    pub video: usize,
    pub audio: usize,
}

impl TrackConfig {
    pub fn count(&self, kind: TrackKind) -> usize {
        match kind {
            TrackKind::Video => self.video,
            TrackKind::Audio => self.audio,
        }
    }

    /// Lanes in display order: video lanes top-down, then audio lanes.
    pub fn lanes(&self) -> Vec<Lane> {
        (0..self.video)
            .map(Lane::video)
            .chain((0..self.audio).map(Lane::audio))
            .collect()
    }

    pub fn display_row(&self, lane: Lane) -> usize {
        match lane.kind {
            TrackKind::Video => lane.index,
            TrackKind::Audio => self.video + lane.index,
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self { video: 2, audio: 2 }
    }
}

/// Root aggregate: everything that is on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    #[serde(default)]
    pub frame_rate: Fps,
    #[serde(default)]
    pub tracks: TrackConfig,
    #[serde(default)]
    pub assets: Vec<TimelineAsset>,
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

impl TimelineProject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resolution: Resolution::default(),
            aspect_ratio: default_aspect_ratio(),
            frame_rate: Fps::default(),
            tracks: TrackConfig::default(),
            assets: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> ReelcutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> ReelcutResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> ReelcutResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Max over assets of `start + duration`; 0 for an empty timeline.
    pub fn duration(&self) -> f64 {
        self.assets
            .iter()
            .map(TimelineAsset::end_time)
            .fold(0.0, f64::max)
    }

    pub fn asset(&self, id: &str) -> Option<&TimelineAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn asset_mut(&mut self, id: &str) -> Option<&mut TimelineAsset> {
        self.assets.iter_mut().find(|a| a.id == id)
    }

    pub(crate) fn require(&self, id: &str) -> ReelcutResult<&TimelineAsset> {
        self.asset(id)
            .ok_or_else(|| ReelcutError::not_found(format!("asset '{id}'")))
    }

    pub(crate) fn require_mut(&mut self, id: &str) -> ReelcutResult<&mut TimelineAsset> {
        self.asset_mut(id)
            .ok_or_else(|| ReelcutError::not_found(format!("asset '{id}'")))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.asset(id).is_some()
    }

    /// Assets on one lane, sorted by start time.
    pub fn lane_assets(&self, lane: Lane) -> Vec<&TimelineAsset> {
        let mut on_lane: Vec<&TimelineAsset> =
            self.assets.iter().filter(|a| a.lane() == lane).collect();
        on_lane.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        on_lane
    }

    /// Assets active at project time `t`.
    pub fn assets_at(&self, t: f64) -> Vec<&TimelineAsset> {
        self.assets.iter().filter(|a| a.contains_time(t)).collect()
    }

    pub fn lane_exists(&self, lane: Lane) -> bool {
        lane.index < self.tracks.count(lane.kind)
    }

    /// Clamp a track index into the valid range for `kind`.
    pub fn clamp_track(&self, kind: TrackKind, track: usize) -> usize {
        track.min(self.tracks.count(kind).saturating_sub(1))
    }

    /// First asset (other than `exclude`) on `lane` overlapping `[start, end)`.
    pub fn first_conflict(
        &self,
        lane: Lane,
        start: f64,
        end: f64,
        exclude: &[&str],
    ) -> Option<&TimelineAsset> {
        self.assets
            .iter()
            .filter(|a| a.lane() == lane && !exclude.contains(&a.id.as_str()))
            .filter(|a| intervals_overlap(start, end, a.start_time, a.end_time()))
            .min_by(|a, b| a.start_time.total_cmp(&b.start_time))
    }

    /// Change lane counts. Lanes that still hold assets cannot be removed.
    pub fn set_track_counts(&mut self, video: usize, audio: usize) -> ReelcutResult<()> {
        if video == 0 && audio == 0 {
            return Err(ReelcutError::validation("a project needs at least one track"));
        }
        let next = TrackConfig { video, audio };
        if let Some(orphan) = self
            .assets
            .iter()
            .find(|a| a.track >= next.count(a.track_kind))
        {
            return Err(ReelcutError::validation(format!(
                "cannot remove {:?} track {} while asset '{}' is on it",
                orphan.track_kind, orphan.track, orphan.id
            )));
        }
        self.tracks = next;
        Ok(())
    }

    /// Check every model invariant, including per-lane non-overlap.
    pub fn validate(&self) -> ReelcutResult<()> {
        if !self.frame_rate.is_valid() {
            return Err(ReelcutError::validation(
                "frame rate must have num>0 and den>0",
            ));
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            return Err(ReelcutError::validation("resolution width/height must be > 0"));
        }

        let mut seen = BTreeSet::new();
        for asset in &self.assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(ReelcutError::validation(format!(
                    "duplicate asset id '{}'",
                    asset.id
                )));
            }
            asset.validate()?;
            if !self.lane_exists(asset.lane()) {
                return Err(ReelcutError::validation(format!(
                    "asset '{}' sits on missing {:?} track {}",
                    asset.id, asset.track_kind, asset.track
                )));
            }
        }

        self.check_overlaps()
    }

    pub(crate) fn check_overlaps(&self) -> ReelcutResult<()> {
        for lane in self.tracks.lanes() {
            let on_lane = self.lane_assets(lane);
            for pair in on_lane.windows(2) {
                if intervals_overlap(
                    pair[0].start_time,
                    pair[0].end_time(),
                    pair[1].start_time,
                    pair[1].end_time(),
                ) {
                    return Err(ReelcutError::validation(format!(
                        "assets '{}' and '{}' overlap on {:?} track {}",
                        pair[0].id, pair[1].id, lane.kind, lane.index
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/project.rs"]
mod tests;
