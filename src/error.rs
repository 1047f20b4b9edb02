//! Error type for the outer surfaces (configuration, file-backed storage)
//!
//! The simulation itself never returns errors: degenerate geometry falls back
//! to fixed results and storage writes are logged and dropped.

/// Errors raised while loading configuration or opening persistent stores
#[derive(Debug, thiserror::Error)]
pub enum ArcadeError {
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ArcadeError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArcadeError>;
