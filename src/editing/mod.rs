//! Selection, clipboard and undo history.

/// Copy and repeatable paste at the playhead.
pub mod clipboard;
/// Snapshot undo/redo.
pub mod history;
/// Selected asset ids.
pub mod selection;

pub use clipboard::Clipboard;
pub use history::History;
pub use selection::{Selection, SelectionBox};
