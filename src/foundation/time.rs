use crate::foundation::error::{ReelcutError, ReelcutResult};

/// Tolerance used when comparing timeline positions in seconds.
///
/// Positions are frame-snapped before they reach the engine, so anything closer than a
/// microsecond is the same instant.
pub const TIME_EPSILON: f64 = 1e-6;

/// Rounds `time` to the nearest multiple of `1 / frame_rate`, floored at zero.
///
/// Non-finite input or a non-positive frame rate degrades to `max(time, 0)`.
pub fn snap_to_frame(time: f64, frame_rate: f64) -> f64 {
    if !time.is_finite() || !(frame_rate > 0.0) || !frame_rate.is_finite() {
        return if time > 0.0 && time.is_finite() {
            time
        } else {
            0.0
        };
    }
    let snapped = (time * frame_rate).round() / frame_rate;
    if snapped > 0.0 { snapped } else { 0.0 }
}

/// Converts seconds to the nearest frame index.
pub fn time_to_frame(time: f64, frame_rate: f64) -> u64 {
    if !(frame_rate > 0.0) || !time.is_finite() {
        return 0;
    }
    (time * frame_rate).round().max(0.0) as u64
}

/// Converts a frame index back to seconds.
pub fn frame_to_time(frame: u64, frame_rate: f64) -> f64 {
    if !(frame_rate > 0.0) {
        return 0.0;
    }
    frame as f64 / frame_rate
}

/// Whether two half-open intervals `[a_start, a_end)` and `[b_start, b_end)` overlap by
/// more than [`TIME_EPSILON`].
pub fn intervals_overlap(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start < b_end - TIME_EPSILON && b_start < a_end - TIME_EPSILON
}

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}

/// Rational frame rate (e.g. `30000/1001`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Frames per `den` seconds.
    pub num: u32,
    /// Seconds spanned by `num` frames; never zero.
    pub den: u32,
}

impl Fps {
    /// Checked constructor; both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> ReelcutResult<Self> {
        if den == 0 {
            return Err(ReelcutError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReelcutError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Integer rate shorthand, `Fps::whole(30)` == 30/1.
    pub fn whole(num: u32) -> ReelcutResult<Self> {
        Self::new(num, 1)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Length of a single frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Timeline seconds at which frame `frames` begins.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Index of the frame showing at `secs`. Negative times map to frame 0.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }

    /// Nearest frame boundary to `secs`, as a frame count.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        time_to_frame(secs, self.as_f64())
    }

    /// `secs` moved onto the nearest frame boundary.
    pub fn snap(self, secs: f64) -> f64 {
        snap_to_frame(secs, self.as_f64())
    }

    /// False for a value deserialized with a zero part.
    pub fn is_valid(self) -> bool {
        self.num > 0 && self.den > 0
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
