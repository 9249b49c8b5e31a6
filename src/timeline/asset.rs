use crate::{
    animation::keyframe::TimelineKeyframe,
    foundation::error::{ReelcutError, ReelcutResult},
    foundation::time::TIME_EPSILON,
    timeline::transition::TransitionSpec,
};

/// Fresh identifier for an asset created by an edit (split, paste, duplicate, import).
pub fn new_asset_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// What an asset is. Determines which lane kind it may occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Audio,
    Image,
    Music,
    Text,
}

impl AssetKind {
    pub fn lane_kind(self) -> TrackKind {
        match self {
            Self::Audio | Self::Music => TrackKind::Audio,
            Self::Video | Self::Image | Self::Text => TrackKind::Video,
        }
    }

    /// Still images and text can be stretched freely; time-based media are bounded by
    /// their decoded source length.
    pub fn is_time_based(self) -> bool {
        matches!(self, Self::Video | Self::Audio | Self::Music)
    }
}

/// Coordinate space (lane family) an asset lives in.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// A single lane: track family plus index within that family.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Lane {
    pub kind: TrackKind,
    pub index: usize,
}

impl Lane {
    pub fn new(kind: TrackKind, index: usize) -> Self {
        Self { kind, index }
    }

    pub fn video(index: usize) -> Self {
        Self::new(TrackKind::Video, index)
    }

    pub fn audio(index: usize) -> Self {
        Self::new(TrackKind::Audio, index)
    }
}

/// A placed item on the timeline.
///
/// The first block of fields is the core record every asset has. Everything after
/// `source_duration` is an optional capability; each one is independently present or
/// absent and validated on its own.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineAsset {
    pub id: String,
    pub kind: AssetKind,
    #[serde(default)]
    pub source_url: String,
    pub name: String,
    pub track: usize,
    pub track_kind: TrackKind,
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub trim_start: f64,
    #[serde(default)]
    pub trim_end: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
    /// Decoded length of the source media, when the upload metadata provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_duration: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<TimelineKeyframe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lut: Option<LutSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_grading: Option<ColorGrading>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<EffectInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback: Option<Playback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

fn default_volume() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LutSpec {
    pub id: String,
    /// Blend amount in `[0, 1]`.
    pub intensity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorGrading {
    pub exposure: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub temperature: f64,
    pub tint: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectInstance {
    pub kind: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Playback-rate capability.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Playback {
    pub speed: f64,
    #[serde(default)]
    pub reversed: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            speed: 1.0,
            reversed: false,
        }
    }
}

/// Where an asset came from. Drives the cost calculator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetOrigin {
    #[default]
    Upload,
    Generated,
    Composition,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Provenance {
    pub origin: AssetOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub credits_used: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Upload service key for user-provided media.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    /// Assets folded into a composition.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_asset_ids: Vec<String>,
}

impl TimelineAsset {
    /// Bare asset on the lane its kind belongs to. Capabilities start absent.
    pub fn new(
        id: impl Into<String>,
        kind: AssetKind,
        name: impl Into<String>,
        track: usize,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source_url: String::new(),
            name: name.into(),
            track,
            track_kind: kind.lane_kind(),
            start_time,
            duration,
            trim_start: 0.0,
            trim_end: 0.0,
            volume: 1.0,
            source_duration: None,
            keyframes: Vec::new(),
            transition: None,
            lut: None,
            color_grading: None,
            effects: Vec::new(),
            text: None,
            playback: None,
            provenance: None,
        }
    }

    pub fn with_source(mut self, url: impl Into<String>, source_duration: Option<f64>) -> Self {
        self.source_url = url.into();
        self.source_duration = source_duration;
        if let Some(total) = source_duration {
            self.trim_end = (total - self.trim_start - self.source_span()).max(0.0);
        }
        self
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    pub fn lane(&self) -> Lane {
        Lane::new(self.track_kind, self.track)
    }

    pub fn speed(&self) -> f64 {
        self.playback.map(|p| p.speed).unwrap_or(1.0)
    }

    pub fn is_reversed(&self) -> bool {
        self.playback.map(|p| p.reversed).unwrap_or(false)
    }

    /// Seconds of source media consumed by the visible window.
    pub fn source_span(&self) -> f64 {
        self.duration * self.speed()
    }

    pub fn contains_time(&self, t: f64) -> bool {
        t >= self.start_time && t < self.end_time()
    }

    pub fn origin(&self) -> AssetOrigin {
        self.provenance
            .as_ref()
            .map(|p| p.origin)
            .unwrap_or(AssetOrigin::Upload)
    }

    /// Per-capability checks; lane range and overlap are checked by the project.
    pub fn validate(&self) -> ReelcutResult<()> {
        if self.id.trim().is_empty() {
            return Err(ReelcutError::validation("asset id must be non-empty"));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ReelcutError::validation(format!(
                "asset '{}' duration must be > 0",
                self.id
            )));
        }
        if !self.start_time.is_finite() || self.start_time < 0.0 {
            return Err(ReelcutError::validation(format!(
                "asset '{}' start time must be >= 0",
                self.id
            )));
        }
        if !(self.trim_start >= 0.0 && self.trim_end >= 0.0)
            || !self.trim_start.is_finite()
            || !self.trim_end.is_finite()
        {
            return Err(ReelcutError::validation(format!(
                "asset '{}' trims must be >= 0",
                self.id
            )));
        }
        if let Some(total) = self.source_duration {
            let used = self.trim_start + self.source_span() + self.trim_end;
            if used > total + TIME_EPSILON * 10.0 {
                return Err(ReelcutError::validation(format!(
                    "asset '{}' trims beyond its source length ({used:.3}s > {total:.3}s)",
                    self.id
                )));
            }
        }
        if !(0.0..=2.0).contains(&self.volume) {
            return Err(ReelcutError::validation(format!(
                "asset '{}' volume must be within 0..=2",
                self.id
            )));
        }
        if self.kind.lane_kind() != self.track_kind {
            return Err(ReelcutError::validation(format!(
                "asset '{}' of kind {:?} cannot sit on a {:?} track",
                self.id, self.kind, self.track_kind
            )));
        }
        if self.kind != AssetKind::Text && self.source_url.trim().is_empty() {
            return Err(ReelcutError::validation(format!(
                "asset '{}' needs a source url",
                self.id
            )));
        }
        if let Some(lut) = &self.lut {
            if lut.id.trim().is_empty() || !(0.0..=1.0).contains(&lut.intensity) {
                return Err(ReelcutError::validation(format!(
                    "asset '{}' lut needs an id and intensity within 0..=1",
                    self.id
                )));
            }
        }
        if let Some(playback) = &self.playback {
            if !playback.speed.is_finite() || playback.speed <= 0.0 {
                return Err(ReelcutError::validation(format!(
                    "asset '{}' speed must be > 0",
                    self.id
                )));
            }
        }
        if let Some(transition) = &self.transition {
            transition.validate_for(self)?;
        }
        for kf in &self.keyframes {
            kf.validate_within(self.duration)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/asset.rs"]
mod tests;
