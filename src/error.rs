//! Larder error types

/// Larder error types
#[derive(Debug, thiserror::Error)]
pub enum LarderError {
    // Durable tier errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A meal slot outside `breakfast | lunch | dinner | snack`.
    #[error("unknown meal slot: {0}")]
    UnknownMealSlot(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external generation step failed or produced nothing usable.
    #[error("generation failed: {0}")]
    Generation(String),
}

impl LarderError {
    /// Whether the error may clear up on retry (storage hiccups, I/O).
    ///
    /// Callers inside the cache never retry; this exists so wrapping
    /// services can decide whether to surface or re-attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, LarderError::Storage(_) | LarderError::Io(_))
    }
}

/// Result type alias for Larder operations
pub type Result<T> = std::result::Result<T, LarderError>;
