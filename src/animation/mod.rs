//! Keyframe animation of per-asset properties.

/// Easing curves.
pub mod ease;
/// Sparse keyframe tracks and sampling.
pub mod keyframe;
