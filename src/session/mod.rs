//! The single owned state container hosts drive.
//!
//! [`TimelineEditor`] is the only mutation surface: it owns the project, selection,
//! clipboard, history and save pipeline. Views read through its accessors and drain
//! [`EditorEvent`]s.

/// Editor state container and its operations.
pub mod editor;
/// Engine configuration.
pub mod opts;

pub use editor::{EditorEvent, TimelineEditor};
pub use opts::EngineOpts;
