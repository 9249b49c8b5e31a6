use std::collections::{BTreeMap, BTreeSet};

use crate::{
    foundation::time::TIME_EPSILON,
    timeline::asset::{Lane, TimelineAsset, TrackKind},
    timeline::project::TimelineProject,
};

/// Which lanes ripple together.
///
/// A lane whose kind is linked ripples every lane of that kind; an unlinked lane ripples
/// alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RipplePolicy {
    pub link_video: bool,
    pub link_audio: bool,
}

impl Default for RipplePolicy {
    fn default() -> Self {
        Self {
            link_video: true,
            link_audio: false,
        }
    }
}

impl RipplePolicy {
    pub fn is_linked(&self, kind: TrackKind) -> bool {
        match kind {
            TrackKind::Video => self.link_video,
            TrackKind::Audio => self.link_audio,
        }
    }

    /// Lanes that ripple when `lane` ripples (always includes `lane`).
    pub fn lanes_rippling_with(&self, project: &TimelineProject, lane: Lane) -> Vec<Lane> {
        if !self.is_linked(lane.kind) {
            return vec![lane];
        }
        (0..project.tracks.count(lane.kind))
            .map(|index| Lane::new(lane.kind, index))
            .collect()
    }
}

/// How a placement operation treats collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    /// Collisions reject the edit; gaps are left alone.
    Normal,
    /// Later assets shift to absorb collisions and close gaps.
    Ripple(RipplePolicy),
}

impl EditMode {
    pub fn ripple() -> Self {
        Self::Ripple(RipplePolicy::default())
    }

    pub fn from_toggle(ripple: bool, policy: RipplePolicy) -> Self {
        if ripple {
            Self::Ripple(policy)
        } else {
            Self::Normal
        }
    }

    pub fn is_ripple(&self) -> bool {
        matches!(self, Self::Ripple(_))
    }
}

/// Shift every asset on `lane` starting at or after `pivot` right by `delta`.
///
/// Returns the number of assets moved.
pub(crate) fn push_later(
    project: &mut TimelineProject,
    lane: Lane,
    pivot: f64,
    delta: f64,
    exclude: &BTreeSet<String>,
) -> usize {
    if delta <= TIME_EPSILON {
        return 0;
    }
    let mut moved = 0;
    for asset in project.assets.iter_mut() {
        if asset.lane() == lane
            && !exclude.contains(&asset.id)
            && asset.start_time >= pivot - TIME_EPSILON
        {
            asset.start_time += delta;
            moved += 1;
        }
    }
    moved
}

/// Shift every asset on `lane` starting at or after `pivot` left by up to `delta`.
///
/// The shift is clamped so the moved block never runs into whatever still sits before
/// the pivot. Returns the number of assets moved.
pub(crate) fn pull_later(
    project: &mut TimelineProject,
    lane: Lane,
    pivot: f64,
    delta: f64,
    exclude: &BTreeSet<String>,
) -> usize {
    if delta <= TIME_EPSILON {
        return 0;
    }
    let in_scope = |id: &str, l: Lane| l == lane && !exclude.contains(id);

    let first_after = project
        .assets
        .iter()
        .filter(|a| in_scope(&a.id, a.lane()) && a.start_time >= pivot - TIME_EPSILON)
        .map(|a| a.start_time)
        .fold(f64::INFINITY, f64::min);
    if !first_after.is_finite() {
        return 0;
    }
    let floor = project
        .assets
        .iter()
        .filter(|a| in_scope(&a.id, a.lane()) && a.start_time < pivot - TIME_EPSILON)
        .map(|a| a.end_time())
        .fold(0.0, f64::max);

    let applied = delta.min((first_after - floor).max(0.0));
    if applied <= TIME_EPSILON {
        return 0;
    }
    let mut moved = 0;
    for asset in project.assets.iter_mut() {
        if in_scope(&asset.id, asset.lane()) && asset.start_time >= pivot - TIME_EPSILON {
            asset.start_time = (asset.start_time - applied).max(0.0);
            moved += 1;
        }
    }
    moved
}

/// Close the spans left by `removed`, measured in their pre-removal positions.
///
/// A surviving asset moves left by the total duration of the removed spans that ripple
/// into its lane and end at or before its start. Where something still sits across a
/// gap the lane closes only as far as it can, and everything after keeps its spacing.
/// Returns the number of assets moved.
pub(crate) fn close_removed_spans(
    project: &mut TimelineProject,
    removed: &[TimelineAsset],
    policy: RipplePolicy,
) -> usize {
    let mut spans: BTreeMap<Lane, Vec<(f64, f64)>> = BTreeMap::new();
    for gone in removed {
        for lane in policy.lanes_rippling_with(project, gone.lane()) {
            spans
                .entry(lane)
                .or_default()
                .push((gone.end_time(), gone.duration));
        }
    }

    let mut moved = 0;
    for (lane, spans) in spans {
        let mut order: Vec<usize> = (0..project.assets.len())
            .filter(|&i| project.assets[i].lane() == lane)
            .collect();
        order.sort_by(|&a, &b| {
            project.assets[a]
                .start_time
                .total_cmp(&project.assets[b].start_time)
        });

        let (mut floor, mut owed, mut applied) = (0.0_f64, 0.0_f64, 0.0_f64);
        for idx in order {
            let asset = &mut project.assets[idx];
            let total: f64 = spans
                .iter()
                .filter(|(end, _)| *end <= asset.start_time + TIME_EPSILON)
                .map(|(_, duration)| duration)
                .sum();
            applied = (applied + total - owed)
                .min(asset.start_time - floor)
                .max(0.0);
            owed = total;
            if applied > TIME_EPSILON {
                asset.start_time = (asset.start_time - applied).max(0.0);
                moved += 1;
            }
            floor = asset.end_time();
        }
    }
    moved
}

#[cfg(test)]
#[path = "../../tests/unit/placement/ripple.rs"]
mod tests;
