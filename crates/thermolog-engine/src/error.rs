//! Error types for thermolog-engine.

use crate::validation::ValidationError;

/// Result type for thermolog-engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in thermolog-engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request parameter failed validation; storage was not touched.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The storage layer failed. Never swallowed: an insert failure means the
    /// reading was not persisted, and a batch read failure fails the whole
    /// batch rather than returning partial results.
    #[error(transparent)]
    Store(#[from] thermolog_store::Error),
}
