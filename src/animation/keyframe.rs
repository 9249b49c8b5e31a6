//! Per-asset keyframe tracks and interpolation.
//!
//! Keyframes are stored sparsely: one keyframe may carry any subset of the animatable
//! properties. Each property is an independent curve; consumers never assume the `x`
//! keys line up with the `opacity` keys.

use crate::{
    animation::ease::Easing,
    foundation::error::{ReelcutError, ReelcutResult},
    foundation::time::{TIME_EPSILON, approx_eq},
    timeline::asset::TimelineAsset,
};

/// Animatable properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimProperty {
    X,
    Y,
    Scale,
    Rotation,
    Opacity,
    Blur,
    Volume,
}

impl AnimProperty {
    pub const ALL: [AnimProperty; 7] = [
        AnimProperty::X,
        AnimProperty::Y,
        AnimProperty::Scale,
        AnimProperty::Rotation,
        AnimProperty::Opacity,
        AnimProperty::Blur,
        AnimProperty::Volume,
    ];

    /// Value an asset has when no keyframe animates the property.
    pub fn static_value(self, asset: &TimelineAsset) -> f64 {
        match self {
            Self::X | Self::Y | Self::Rotation | Self::Blur => 0.0,
            Self::Scale | Self::Opacity => 1.0,
            Self::Volume => asset.volume,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "scale" => Some(Self::Scale),
            "rotation" => Some(Self::Rotation),
            "opacity" => Some(Self::Opacity),
            "blur" => Some(Self::Blur),
            "volume" => Some(Self::Volume),
            _ => None,
        }
    }
}

/// Sparse set of property values.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PropertyValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PropertyValues {
    pub fn single(property: AnimProperty, value: f64) -> Self {
        let mut values = Self::default();
        values.set(property, Some(value));
        values
    }

    pub fn with(mut self, property: AnimProperty, value: f64) -> Self {
        self.set(property, Some(value));
        self
    }

    pub fn get(&self, property: AnimProperty) -> Option<f64> {
        match property {
            AnimProperty::X => self.x,
            AnimProperty::Y => self.y,
            AnimProperty::Scale => self.scale,
            AnimProperty::Rotation => self.rotation,
            AnimProperty::Opacity => self.opacity,
            AnimProperty::Blur => self.blur,
            AnimProperty::Volume => self.volume,
        }
    }

    pub fn set(&mut self, property: AnimProperty, value: Option<f64>) {
        let slot = match property {
            AnimProperty::X => &mut self.x,
            AnimProperty::Y => &mut self.y,
            AnimProperty::Scale => &mut self.scale,
            AnimProperty::Rotation => &mut self.rotation,
            AnimProperty::Opacity => &mut self.opacity,
            AnimProperty::Blur => &mut self.blur,
            AnimProperty::Volume => &mut self.volume,
        };
        *slot = value;
    }

    /// Properties that carry a value, in [`AnimProperty::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (AnimProperty, f64)> + '_ {
        AnimProperty::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineKeyframe {
    /// Seconds relative to the asset's own start.
    pub time: f64,
    #[serde(flatten)]
    pub values: PropertyValues,
    /// Outgoing easing toward the next keyframe of the same property.
    #[serde(default)]
    pub easing: Easing,
}

impl TimelineKeyframe {
    pub fn new(time: f64, values: PropertyValues, easing: Easing) -> Self {
        Self {
            time,
            values,
            easing,
        }
    }

    pub(crate) fn validate_within(&self, duration: f64) -> ReelcutResult<()> {
        if !self.time.is_finite() || self.time < -TIME_EPSILON || self.time > duration + TIME_EPSILON
        {
            return Err(ReelcutError::validation(format!(
                "keyframe time {:.3}s is outside 0..={duration:.3}s",
                self.time
            )));
        }
        if self.values.iter().any(|(_, v)| !v.is_finite()) {
            return Err(ReelcutError::validation("keyframe values must be finite"));
        }
        Ok(())
    }
}

/// What [`add_keyframe`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyframeChange {
    /// Properties whose existing keyframe value was overwritten.
    pub updated: Vec<AnimProperty>,
    /// Index of the appended keyframe, if any property had no key at that time.
    pub appended: Option<usize>,
}

/// Sets `values` at `time` on the asset.
///
/// A property that already has a keyframe at exactly `time` is overwritten in place;
/// the remaining properties are appended together as one new keyframe.
pub fn add_keyframe(
    asset: &mut TimelineAsset,
    time: f64,
    values: PropertyValues,
    easing: Easing,
) -> ReelcutResult<KeyframeChange> {
    if values.is_empty() {
        return Err(ReelcutError::validation(
            "keyframe must set at least one property",
        ));
    }
    let candidate = TimelineKeyframe::new(time, values, easing);
    candidate.validate_within(asset.duration)?;

    let mut change = KeyframeChange::default();
    let mut remaining = PropertyValues::default();
    for (property, value) in values.iter() {
        let existing = asset
            .keyframes
            .iter_mut()
            .find(|kf| approx_eq(kf.time, time) && kf.values.get(property).is_some());
        match existing {
            Some(kf) => {
                kf.values.set(property, Some(value));
                kf.easing = easing;
                change.updated.push(property);
            }
            None => remaining.set(property, Some(value)),
        }
    }

    if !remaining.is_empty() {
        asset
            .keyframes
            .push(TimelineKeyframe::new(time.max(0.0), remaining, easing));
        change.appended = Some(asset.keyframes.len() - 1);
    }
    Ok(change)
}

/// Removes the keyframe at structural `index`. Indices shift afterwards.
pub fn remove_keyframe(asset: &mut TimelineAsset, index: usize) -> ReelcutResult<TimelineKeyframe> {
    if index >= asset.keyframes.len() {
        return Err(ReelcutError::not_found(format!(
            "asset '{}' has no keyframe #{index} ({} present)",
            asset.id,
            asset.keyframes.len()
        )));
    }
    Ok(asset.keyframes.remove(index))
}

/// Keyframes that carry `property`, sorted by time, as `(time, value, easing)`.
fn property_track(keyframes: &[TimelineKeyframe], property: AnimProperty) -> Vec<(f64, f64, Easing)> {
    let mut track: Vec<(f64, f64, Easing)> = keyframes
        .iter()
        .filter_map(|kf| kf.values.get(property).map(|v| (kf.time, v, kf.easing)))
        .collect();
    track.sort_by(|a, b| a.0.total_cmp(&b.0));
    track
}

fn sample_track(track: &[(f64, f64, Easing)], t: f64) -> Option<f64> {
    let first = track.first()?;
    let last = track.last()?;
    if t <= first.0 {
        return Some(first.1);
    }
    if t >= last.0 {
        return Some(last.1);
    }

    let idx = track.partition_point(|k| k.0 <= t);
    let (t_a, v_a, ease) = track[idx - 1];
    let (t_b, v_b, _) = track[idx];
    let span = t_b - t_a;
    if span <= 0.0 {
        return Some(v_a);
    }
    let te = ease.apply((t - t_a) / span);
    Some(v_a + (v_b - v_a) * te)
}

/// Value of `property` at `relative_time` (seconds from the asset start).
///
/// Clamps to the boundary keys outside the keyed range and falls back to the asset's
/// static value when the property has no keyframes.
pub fn evaluate(asset: &TimelineAsset, property: AnimProperty, relative_time: f64) -> f64 {
    let track = property_track(&asset.keyframes, property);
    sample_track(&track, relative_time).unwrap_or_else(|| property.static_value(asset))
}

/// Every property sampled at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct AnimatedProperties {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub blur: f64,
    pub volume: f64,
}

pub fn evaluate_all(asset: &TimelineAsset, relative_time: f64) -> AnimatedProperties {
    let at = |p| evaluate(asset, p, relative_time);
    AnimatedProperties {
        x: at(AnimProperty::X),
        y: at(AnimProperty::Y),
        scale: at(AnimProperty::Scale),
        rotation: at(AnimProperty::Rotation),
        opacity: at(AnimProperty::Opacity),
        blur: at(AnimProperty::Blur),
        volume: at(AnimProperty::Volume),
    }
}

/// Partition an asset's keyframes at `cut` (relative seconds) for a split.
///
/// Each animated property gets a boundary key at the cut on both halves so the curve
/// is continuous across the seam. Right-half times are rebased to the cut.
pub(crate) fn split_keyframes(
    asset: &TimelineAsset,
    cut: f64,
) -> (Vec<TimelineKeyframe>, Vec<TimelineKeyframe>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for kf in &asset.keyframes {
        if kf.time < cut - TIME_EPSILON {
            left.push(kf.clone());
        } else if kf.time > cut + TIME_EPSILON {
            let mut moved = kf.clone();
            moved.time -= cut;
            right.push(moved);
        }
    }

    let mut boundary = PropertyValues::default();
    for property in AnimProperty::ALL {
        if asset.keyframes.iter().any(|kf| kf.values.get(property).is_some()) {
            boundary.set(property, Some(evaluate(asset, property, cut)));
        }
    }
    if !boundary.is_empty() {
        // The right half continues with the easing of the segment the cut landed in.
        let easing = asset
            .keyframes
            .iter()
            .filter(|kf| kf.time <= cut + TIME_EPSILON)
            .max_by(|a, b| a.time.total_cmp(&b.time))
            .map(|kf| kf.easing)
            .unwrap_or_default();
        left.push(TimelineKeyframe::new(cut, boundary, Easing::Linear));
        right.push(TimelineKeyframe::new(0.0, boundary, easing));
    }
    (left, right)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;
