/// Error type shared by every layer.
pub mod error;
/// Seconds-based time helpers and frame rates.
pub mod time;
