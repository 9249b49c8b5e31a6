/// Convenience result type used across reelcut.
pub type ReelcutResult<T> = Result<T, ReelcutError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is recoverable: callers surface the message and keep the current
/// in-memory timeline as the source of truth.
#[derive(thiserror::Error, Debug)]
pub enum ReelcutError {
    /// Rejected user input or inconsistent timeline data. No state was mutated.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset, keyframe or job id that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote save endpoint or local backup rejected a write.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// No connectivity; the attempt was queued instead of sent.
    #[error("offline: {0}")]
    Offline(String),

    /// Errors reported by the external render/export service.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Local filesystem failure (backups, config files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelcutError {
    /// Build a [`ReelcutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelcutError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`ReelcutError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`ReelcutError::Offline`] value.
    pub fn offline(msg: impl Into<String>) -> Self {
        Self::Offline(msg.into())
    }

    /// Build a [`ReelcutError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`ReelcutError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the error was a rejected edit (as opposed to an environment failure).
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

impl From<serde_json::Error> for ReelcutError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
