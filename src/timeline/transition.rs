use crate::{
    animation::ease::Easing,
    foundation::error::{ReelcutError, ReelcutResult},
    foundation::time::TIME_EPSILON,
    timeline::asset::TimelineAsset,
};

/// Identifier of the hard-cut transition (no blending, zero length).
pub const CUT: &str = "cut";

/// Transition played at the seam between an asset and its predecessor on the same lane.
///
/// It lives on the asset that begins after the seam.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionSpec {
    pub kind: String,
    pub duration: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl TransitionSpec {
    pub fn new(kind: impl Into<String>, duration: f64, easing: Easing) -> Self {
        Self {
            kind: kind.into(),
            duration,
            easing,
        }
    }

    pub fn cut() -> Self {
        Self::new(CUT, 0.0, Easing::Linear)
    }

    pub fn is_cut(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case(CUT)
    }

    pub fn validate(&self) -> ReelcutResult<()> {
        if self.kind.trim().is_empty() {
            return Err(ReelcutError::validation("transition kind must be non-empty"));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ReelcutError::validation(
                "transition duration must be a finite value >= 0",
            ));
        }
        if !self.is_cut() && self.duration <= 0.0 {
            return Err(ReelcutError::validation(format!(
                "transition '{}' needs a duration > 0",
                self.kind
            )));
        }
        Ok(())
    }

    /// Validate against the asset that carries the transition.
    pub fn validate_for(&self, asset: &TimelineAsset) -> ReelcutResult<()> {
        self.validate()?;
        if self.duration > asset.duration + TIME_EPSILON {
            return Err(ReelcutError::validation(format!(
                "transition '{}' ({:.3}s) is longer than asset '{}' ({:.3}s)",
                self.kind, self.duration, asset.id, asset.duration
            )));
        }
        Ok(())
    }

    /// Project-time window `[start, end)` the transition plays in.
    pub fn window(&self, asset: &TimelineAsset) -> (f64, f64) {
        if self.is_cut() {
            return (asset.start_time, asset.start_time);
        }
        (
            asset.start_time,
            asset.start_time + self.duration.min(asset.duration),
        )
    }

    /// Eased progress in `[0, 1]` at project time `t`, `None` outside the window.
    pub fn progress_at(&self, asset: &TimelineAsset, t: f64) -> Option<f64> {
        let (start, end) = self.window(asset);
        if end <= start || t < start || t >= end {
            return None;
        }
        Some(self.easing.apply((t - start) / (end - start)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/transition.rs"]
mod tests;
