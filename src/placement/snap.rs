use crate::{
    foundation::time::{TIME_EPSILON, snap_to_frame},
    timeline::asset::Lane,
    timeline::project::TimelineProject,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapOpts {
    pub enabled: bool,
    /// Maximum distance, in seconds, an edge may be pulled to meet a neighbour.
    pub threshold_secs: f64,
}

impl Default for SnapOpts {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_secs: 0.2,
        }
    }
}

/// Start time for an asset dragged so its start sits at `pointer_start` on `lane`.
///
/// Either edge of the dragged asset may snap to an edge of another asset on the lane or
/// to the playhead. Among the candidates within the threshold, the one needing the
/// smallest displacement from the pointer wins; ties keep the earlier candidate.
/// The result is always frame-aligned and never negative.
pub fn snap_drag_start(
    project: &TimelineProject,
    id: &str,
    lane: Lane,
    pointer_start: f64,
    playhead: Option<f64>,
    opts: SnapOpts,
) -> f64 {
    let rate = project.frame_rate.as_f64();
    let pointer_start = if pointer_start.is_finite() {
        pointer_start.max(0.0)
    } else {
        0.0
    };
    if !opts.enabled {
        return snap_to_frame(pointer_start, rate);
    }

    let duration = project.asset(id).map(|a| a.duration).unwrap_or(0.0);
    let edges = project
        .lane_assets(lane)
        .into_iter()
        .filter(|a| a.id != id)
        .flat_map(|a| [a.start_time, a.end_time()])
        .chain(playhead.filter(|t| t.is_finite()));

    let mut best: Option<(f64, f64)> = None;
    for edge in edges {
        // Start edge onto `edge`, then end edge onto `edge`.
        for start in [edge, edge - duration] {
            if start < -TIME_EPSILON {
                continue;
            }
            let displacement = (start - pointer_start).abs();
            if displacement > opts.threshold_secs + TIME_EPSILON {
                continue;
            }
            if best.is_none_or(|(d, _)| displacement < d - TIME_EPSILON) {
                best = Some((displacement, start));
            }
        }
    }

    let chosen = best.map(|(_, start)| start).unwrap_or(pointer_start);
    snap_to_frame(chosen, rate)
}

#[cfg(test)]
#[path = "../../tests/unit/placement/snap.rs"]
mod tests;
