use std::collections::{BTreeMap, BTreeSet};

use crate::{
    animation::keyframe::split_keyframes,
    foundation::error::{ReelcutError, ReelcutResult},
    foundation::time::{TIME_EPSILON, approx_eq, intervals_overlap},
    placement::ripple::{
        EditMode, RipplePolicy, close_removed_spans, pull_later, push_later,
    },
    timeline::asset::{AssetOrigin, Lane, TimelineAsset, new_asset_id},
    timeline::project::TimelineProject,
};

/// Result of [`move_asset`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved {
        track: usize,
        start_time: f64,
        /// Other assets shifted to make room.
        rippled: usize,
    },
    /// The target span is occupied and the edit was not applied.
    Blocked { conflict_with: String },
}

impl MoveOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    Start,
    End,
}

/// Result of [`resize_asset`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResizeOutcome {
    Resized {
        start_time: f64,
        duration: f64,
        rippled: usize,
    },
    Blocked { conflict_with: String },
}

impl ResizeOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Ids of the two halves produced by [`split_asset`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SplitOutcome {
    pub left_id: String,
    pub right_id: String,
}

/// Move an asset to `new_start` on track `new_track` of its own track kind.
///
/// The start is clamped to `>= 0` and the track into range. A collision blocks the move
/// in [`EditMode::Normal`]. In [`EditMode::Ripple`] the asset lands on the nearer edge
/// of anything it would cut in half, and later assets shift right to clear its new end.
#[tracing::instrument(skip(project), fields(project = %project.id))]
pub fn move_asset(
    project: &mut TimelineProject,
    id: &str,
    new_track: usize,
    new_start: f64,
    mode: EditMode,
) -> ReelcutResult<MoveOutcome> {
    if !new_start.is_finite() {
        return Err(ReelcutError::validation("move target must be a finite time"));
    }
    let mut placed = project.require(id)?.clone();
    placed.track = project.clamp_track(placed.track_kind, new_track);
    placed.start_time = new_start.max(0.0);

    let conflict = project
        .first_conflict(
            placed.lane(),
            placed.start_time,
            placed.end_time(),
            &[id],
        )
        .map(|a| a.id.clone());

    let rippled = match (conflict, mode) {
        (None, _) => 0,
        (Some(conflict_with), EditMode::Normal) => {
            tracing::debug!(id, %conflict_with, "move blocked");
            return Ok(MoveOutcome::Blocked { conflict_with });
        }
        (Some(_), EditMode::Ripple(policy)) => {
            let exclude = BTreeSet::from([id.to_string()]);
            ripple_group(
                project,
                std::slice::from_mut(&mut placed),
                policy,
                &exclude,
            )?
        }
    };

    let asset = project.require_mut(id)?;
    asset.track = placed.track;
    asset.start_time = placed.start_time;
    tracing::debug!(
        id,
        track = placed.track,
        start = placed.start_time,
        rippled,
        "asset moved"
    );
    Ok(MoveOutcome::Moved {
        track: placed.track,
        start_time: placed.start_time,
        rippled,
    })
}

/// Change an asset's duration by dragging one of its edges.
///
/// `End` keeps the start; `Start` keeps the end in [`EditMode::Normal`]. Trims follow
/// the edge so the visible window stays anchored to the same source frames. In
/// [`EditMode::Ripple`] the start never moves: later assets on the lane (and linked
/// lanes) shift by the duration delta instead.
#[tracing::instrument(skip(project), fields(project = %project.id))]
pub fn resize_asset(
    project: &mut TimelineProject,
    id: &str,
    edge: ResizeEdge,
    new_duration: f64,
    mode: EditMode,
) -> ReelcutResult<ResizeOutcome> {
    if !new_duration.is_finite() || new_duration <= 0.0 {
        return Err(ReelcutError::validation(format!(
            "cannot resize '{id}' to a duration of {new_duration}"
        )));
    }
    let current = project.require(id)?.clone();
    let delta = new_duration - current.duration;
    let mut next = current.clone();
    next.duration = new_duration;

    if current.kind.is_time_based() {
        // Which end of the source this edge eats into. Reversed playback swaps them.
        let head_side = (edge == ResizeEdge::Start) != current.is_reversed();
        let consumed = delta * current.speed();
        if head_side {
            next.trim_start = current.trim_start - consumed;
            if next.trim_start < -TIME_EPSILON {
                return Err(ReelcutError::validation(format!(
                    "cannot extend '{id}' past the head of its source"
                )));
            }
            next.trim_start = next.trim_start.max(0.0);
        } else {
            next.trim_end = current.trim_end - consumed;
            if next.trim_end < -TIME_EPSILON && current.source_duration.is_some() {
                return Err(ReelcutError::validation(format!(
                    "cannot extend '{id}' past the end of its source"
                )));
            }
            next.trim_end = next.trim_end.max(0.0);
        }
    }

    if edge == ResizeEdge::Start {
        if !mode.is_ripple() {
            next.start_time = current.end_time() - new_duration;
            if next.start_time < -TIME_EPSILON {
                return Err(ReelcutError::validation(format!(
                    "cannot extend '{id}' before the start of the timeline"
                )));
            }
            next.start_time = next.start_time.max(0.0);
        }
        // Keyframes stay attached to the same content.
        for kf in next.keyframes.iter_mut() {
            kf.time += delta;
        }
    }
    next.keyframes
        .retain(|kf| kf.time >= -TIME_EPSILON && kf.time <= new_duration + TIME_EPSILON);
    for kf in next.keyframes.iter_mut() {
        kf.time = kf.time.clamp(0.0, new_duration);
    }
    if let Some(transition) = next.transition.as_mut() {
        transition.duration = transition.duration.min(new_duration);
    }

    let rippled = match mode {
        EditMode::Normal => {
            if let Some(conflict) =
                project.first_conflict(next.lane(), next.start_time, next.end_time(), &[id])
            {
                let conflict_with = conflict.id.clone();
                tracing::debug!(id, %conflict_with, "resize blocked");
                return Ok(ResizeOutcome::Blocked { conflict_with });
            }
            *project.require_mut(id)? = next.clone();
            0
        }
        EditMode::Ripple(policy) => {
            *project.require_mut(id)? = next.clone();
            let pivot = current.end_time();
            let none = BTreeSet::new();
            policy
                .lanes_rippling_with(project, current.lane())
                .into_iter()
                .map(|lane| {
                    if delta > 0.0 {
                        push_later(project, lane, pivot, delta, &none)
                    } else {
                        pull_later(project, lane, pivot, -delta, &none)
                    }
                })
                .sum::<usize>()
        }
    };

    Ok(ResizeOutcome::Resized {
        start_time: next.start_time,
        duration: next.duration,
        rippled,
    })
}

/// Cut an asset in two at project time `at`.
///
/// Both halves get fresh ids and together consume exactly the source frames the
/// original did. Animated properties get a boundary keyframe on each side of the cut;
/// the outgoing transition stays with the left half.
#[tracing::instrument(skip(project), fields(project = %project.id))]
pub fn split_asset(
    project: &mut TimelineProject,
    id: &str,
    at: f64,
) -> ReelcutResult<SplitOutcome> {
    let original = project.require(id)?.clone();
    if !at.is_finite()
        || at <= original.start_time + TIME_EPSILON
        || at >= original.end_time() - TIME_EPSILON
    {
        return Err(ReelcutError::validation(format!(
            "split point {at:.3}s is outside '{id}' ({:.3}s..{:.3}s)",
            original.start_time,
            original.end_time()
        )));
    }

    let cut = at - original.start_time;
    let rest = original.end_time() - at;
    let speed = original.speed();
    let (left_keys, right_keys) = split_keyframes(&original, cut);

    let mut left = original.clone();
    left.id = new_asset_id();
    left.duration = cut;
    left.keyframes = left_keys;
    if let Some(transition) = left.transition.as_mut() {
        transition.duration = transition.duration.min(cut);
    }

    let mut right = original.clone();
    right.id = new_asset_id();
    right.start_time = at;
    right.duration = rest;
    right.keyframes = right_keys;
    right.transition = None;

    if original.is_reversed() {
        left.trim_start = original.trim_start + rest * speed;
        right.trim_end = original.trim_end + cut * speed;
    } else {
        left.trim_end = original.trim_end + rest * speed;
        right.trim_start = original.trim_start + cut * speed;
    }

    let outcome = SplitOutcome {
        left_id: left.id.clone(),
        right_id: right.id.clone(),
    };
    let idx = project
        .assets
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| ReelcutError::not_found(format!("asset '{id}'")))?;
    project.assets[idx] = right;
    project.assets.insert(idx, left);
    tracing::debug!(id, at, left = %outcome.left_id, right = %outcome.right_id, "asset split");
    Ok(outcome)
}

/// Deep-copy an asset to just after itself. Returns the copy's id.
pub fn duplicate_asset(
    project: &mut TimelineProject,
    id: &str,
    mode: EditMode,
) -> ReelcutResult<String> {
    let mut copy = project.require(id)?.clone();
    copy.id = new_asset_id();
    copy.start_time = copy.end_time();
    insert_asset(project, copy, mode)
}

/// Remove assets. In ripple mode each emptied span is closed on its lane and every
/// lane linked to it; linked lanes only close as far as they can without overlapping.
///
/// Every id must exist; otherwise nothing is removed.
#[tracing::instrument(skip(project, ids), fields(project = %project.id, count = ids.len()))]
pub fn delete_assets<S: AsRef<str>>(
    project: &mut TimelineProject,
    ids: &[S],
    mode: EditMode,
) -> ReelcutResult<Vec<TimelineAsset>> {
    let wanted: BTreeSet<&str> = ids.iter().map(AsRef::as_ref).collect();
    if let Some(missing) = wanted.iter().find(|id| !project.contains(id)) {
        return Err(ReelcutError::validation(format!(
            "cannot delete unknown asset '{missing}'"
        )));
    }

    let (mut removed, kept): (Vec<TimelineAsset>, Vec<TimelineAsset>) = project
        .assets
        .drain(..)
        .partition(|a| wanted.contains(a.id.as_str()));
    project.assets = kept;

    if let EditMode::Ripple(policy) = mode {
        let rippled = close_removed_spans(project, &removed, policy);
        tracing::debug!(rippled, "gaps closed");
    }
    removed.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    tracing::debug!(removed = removed.len(), "assets deleted");
    Ok(removed)
}

/// Place a new asset, resolving collisions per `mode`. Returns its id.
///
/// An empty or already-used id is replaced by a fresh one.
pub fn insert_asset(
    project: &mut TimelineProject,
    asset: TimelineAsset,
    mode: EditMode,
) -> ReelcutResult<String> {
    insert_group(project, vec![asset], mode)?
        .into_iter()
        .next()
        .ok_or_else(|| ReelcutError::validation("nothing was inserted"))
}

/// Place several assets as one rigid group (paste, import of a batch).
///
/// Relative offsets and lanes are preserved. In [`EditMode::Normal`] the whole group
/// slides right by the smallest shift that fits every member; in
/// [`EditMode::Ripple`] later assets are pushed instead.
#[tracing::instrument(skip(project, group), fields(project = %project.id, count = group.len()))]
pub fn insert_group(
    project: &mut TimelineProject,
    mut group: Vec<TimelineAsset>,
    mode: EditMode,
) -> ReelcutResult<Vec<String>> {
    if group.is_empty() {
        return Ok(Vec::new());
    }

    let mut taken: BTreeSet<String> = project.assets.iter().map(|a| a.id.clone()).collect();
    for member in group.iter_mut() {
        if member.id.trim().is_empty() || taken.contains(&member.id) {
            member.id = new_asset_id();
        }
        taken.insert(member.id.clone());
        if !member.start_time.is_finite() {
            return Err(ReelcutError::validation(format!(
                "asset '{}' needs a finite start time",
                member.name
            )));
        }
        member.start_time = member.start_time.max(0.0);
        member.track = project.clamp_track(member.track_kind, member.track);
        member.validate()?;
        if !project.lane_exists(member.lane()) {
            return Err(ReelcutError::validation(format!(
                "project has no {:?} track for '{}'",
                member.track_kind, member.name
            )));
        }
    }
    check_group_disjoint(&group)?;

    let none = BTreeSet::new();
    let rippled = match mode {
        EditMode::Normal => {
            settle_group(project, &mut group, &none)?;
            0
        }
        EditMode::Ripple(policy) => ripple_group(project, &mut group, policy, &none)?,
    };

    let ids: Vec<String> = group.iter().map(|a| a.id.clone()).collect();
    project.assets.extend(group);
    tracing::debug!(inserted = ids.len(), rippled, "assets inserted");
    Ok(ids)
}

/// Swap a set of assets for one composition asset.
///
/// The composition lands at the earliest removed start on the first listed asset's
/// lane. Either everything happens or nothing does.
#[tracing::instrument(skip(project, ids, composition), fields(project = %project.id))]
pub fn replace_with_composition<S: AsRef<str>>(
    project: &mut TimelineProject,
    ids: &[S],
    composition: TimelineAsset,
    mode: EditMode,
) -> ReelcutResult<String> {
    let first = ids
        .first()
        .ok_or_else(|| ReelcutError::validation("select assets to replace"))?;
    let anchor = project
        .asset(first.as_ref())
        .ok_or_else(|| {
            ReelcutError::validation(format!("cannot replace unknown asset '{}'", first.as_ref()))
        })?
        .lane();
    let earliest = ids
        .iter()
        .filter_map(|id| project.asset(id.as_ref()))
        .filter(|a| a.lane() == anchor)
        .map(|a| a.start_time)
        .fold(f64::INFINITY, f64::min);

    let snapshot = project.assets.clone();
    delete_assets(project, ids, EditMode::Normal)?;

    let mut composition = composition;
    composition.start_time = earliest;
    if composition.kind.lane_kind() == anchor.kind {
        composition.track = anchor.index;
    }
    if let Some(provenance) = composition.provenance.as_mut() {
        if provenance.origin == AssetOrigin::Composition && provenance.source_asset_ids.is_empty()
        {
            provenance.source_asset_ids = ids.iter().map(|id| id.as_ref().to_string()).collect();
        }
    }

    match insert_asset(project, composition, mode) {
        Ok(id) => Ok(id),
        Err(err) => {
            project.assets = snapshot;
            Err(err)
        }
    }
}

fn check_group_disjoint(group: &[TimelineAsset]) -> ReelcutResult<()> {
    for (i, a) in group.iter().enumerate() {
        for b in &group[i + 1..] {
            if a.lane() == b.lane()
                && intervals_overlap(a.start_time, a.end_time(), b.start_time, b.end_time())
            {
                return Err(ReelcutError::validation(format!(
                    "'{}' and '{}' would overlap each other",
                    a.name, b.name
                )));
            }
        }
    }
    Ok(())
}

fn others<'a>(
    project: &'a TimelineProject,
    lane: Lane,
    exclude: &'a BTreeSet<String>,
) -> impl Iterator<Item = &'a TimelineAsset> + 'a {
    project
        .assets
        .iter()
        .filter(move |a| a.lane() == lane && !exclude.contains(&a.id))
}

/// Per lane: (earliest start, latest end) of the group members on it.
fn group_spans(group: &[TimelineAsset]) -> BTreeMap<Lane, (f64, f64)> {
    let mut spans = BTreeMap::new();
    for m in group {
        spans
            .entry(m.lane())
            .and_modify(|(s, e): &mut (f64, f64)| {
                *s = s.min(m.start_time);
                *e = e.max(m.end_time());
            })
            .or_insert((m.start_time, m.end_time()));
    }
    spans
}

fn group_start(group: &[TimelineAsset]) -> f64 {
    group
        .iter()
        .map(|a| a.start_time)
        .fold(f64::INFINITY, f64::min)
}

fn shift_group(group: &mut [TimelineAsset], delta: f64) {
    for m in group.iter_mut() {
        m.start_time += delta;
    }
}

/// An existing asset that starts before a group lane's insertion point and ends after
/// it. Returns `(start, end, insertion_point)`.
fn find_straddler(
    project: &TimelineProject,
    group: &[TimelineAsset],
    exclude: &BTreeSet<String>,
) -> Option<(f64, f64, f64)> {
    group_spans(group).into_iter().find_map(|(lane, (pivot, _))| {
        others(project, lane, exclude)
            .find(|a| a.start_time < pivot - TIME_EPSILON && a.end_time() > pivot + TIME_EPSILON)
            .map(|a| (a.start_time, a.end_time(), pivot))
    })
}

/// Normal-mode placement: smallest rightward shift `δ >= 0` that fits every member.
fn settle_group(
    project: &TimelineProject,
    group: &mut [TimelineAsset],
    exclude: &BTreeSet<String>,
) -> ReelcutResult<()> {
    // Only shifts that butt a member against an existing end can be minimal.
    let mut candidates = vec![0.0];
    for m in group.iter() {
        for other in others(project, m.lane(), exclude) {
            let d = other.end_time() - m.start_time;
            if d > TIME_EPSILON {
                candidates.push(d);
            }
        }
    }
    candidates.sort_by(f64::total_cmp);
    candidates.dedup_by(|a, b| approx_eq(*a, *b));

    let skip: Vec<&str> = exclude.iter().map(String::as_str).collect();
    let fits = |d: f64| {
        group.iter().all(|m| {
            project
                .first_conflict(m.lane(), m.start_time + d, m.end_time() + d, &skip)
                .is_none()
        })
    };
    let delta = candidates
        .into_iter()
        .find(|d| fits(*d))
        .ok_or_else(|| ReelcutError::validation("no free slot for the inserted assets"))?;
    shift_group(group, delta);
    Ok(())
}

/// Ripple-mode placement of a rigid group.
///
/// First moves the group off any asset it would cut in half: to the nearer edge on the
/// first pass, rightward afterwards. Then pushes everything at or after each lane's
/// insertion point right by one shared delta, on the group's lanes and the lanes linked
/// to them. Returns the number of assets pushed.
pub(crate) fn ripple_group(
    project: &mut TimelineProject,
    group: &mut [TimelineAsset],
    policy: RipplePolicy,
    exclude: &BTreeSet<String>,
) -> ReelcutResult<usize> {
    let dropped_at = group_start(group);
    let budget = (project.assets.len() + 1) * group_spans(group).len().max(1) + 1;
    let mut first_pass = true;
    for _ in 0..budget {
        let Some((s_start, s_end, pivot)) = find_straddler(project, group, exclude) else {
            break;
        };
        let to_left = s_start - pivot;
        let to_right = s_end - pivot;
        let offset = group_start(group) - dropped_at;
        let left_fits = first_pass && group_start(group) + to_left >= -TIME_EPSILON;
        let delta = if left_fits && (offset + to_left).abs() < (offset + to_right).abs() {
            to_left
        } else {
            to_right
        };
        shift_group(group, delta);
        first_pass = false;
    }
    if find_straddler(project, group, exclude).is_some() {
        return Err(ReelcutError::validation(
            "could not find an insertion point for the moved assets",
        ));
    }

    let spans = group_spans(group);
    let mut delta: f64 = 0.0;
    for (lane, (pivot, end)) in &spans {
        let first_after = others(project, *lane, exclude)
            .filter(|a| a.start_time >= pivot - TIME_EPSILON)
            .map(|a| a.start_time)
            .fold(f64::INFINITY, f64::min);
        if first_after.is_finite() {
            delta = delta.max(end - first_after);
        }
    }
    if delta <= TIME_EPSILON {
        return Ok(0);
    }

    // Group lanes push from their own insertion point; a linked lane with no member
    // pushes from the earliest insertion point among the lanes it is linked to.
    let mut pivots: BTreeMap<Lane, f64> = spans.iter().map(|(l, (p, _))| (*l, *p)).collect();
    for (lane, (pivot, _)) in &spans {
        for linked in policy.lanes_rippling_with(project, *lane) {
            if spans.contains_key(&linked) {
                continue;
            }
            pivots
                .entry(linked)
                .and_modify(|p| *p = p.min(*pivot))
                .or_insert(*pivot);
        }
    }

    let pushed = pivots
        .into_iter()
        .map(|(lane, pivot)| push_later(project, lane, pivot, delta, exclude))
        .sum::<usize>();
    Ok(pushed)
}

#[cfg(test)]
#[path = "../../tests/unit/placement/engine.rs"]
mod tests;
