//! Edits that move assets through time and across lanes.
//!
//! Every operation here keeps the one hard timeline rule: no two assets on the same lane
//! overlap. In [`EditMode::Normal`] an edit that would collide is refused; in
//! [`EditMode::Ripple`] later assets shift out of the way.

/// Move, resize, split, duplicate, delete and insert.
pub mod engine;
/// Lane linking and shift primitives.
pub mod ripple;
/// Edge snapping for drags.
pub mod snap;

pub use engine::{MoveOutcome, ResizeEdge, ResizeOutcome, SplitOutcome};
pub use ripple::{EditMode, RipplePolicy};
pub use snap::SnapOpts;
