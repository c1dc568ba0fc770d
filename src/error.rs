//! Error types for the annotation data model.
//!
//! This module defines all error types that can occur while mutating or
//! querying the paged region store.

/// Result type alias for annotation store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during store mutation, hierarchy walks and
/// project persistence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lookup by id or by (page, index) position failed
    #[error("Region not found: {0}")]
    NotFound(String),

    /// Polygon has fewer than 3 vertices or covers a degenerate area
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Parent-pointer walk exceeded the total record count
    #[error("Cycle detected in hierarchy while walking from region {0}")]
    CycleDetected(String),

    /// Uniqueness or contiguity invariant would be broken.
    ///
    /// Defensive check; should not occur as long as the store is only
    /// mutated through the command engine.
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),

    /// Background job failed or its result channel was dropped
    #[error("Worker error: {0}")]
    Worker(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
