//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while preparing documents for storage
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Chunk geometry is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// Title is empty after trimming
    #[error("Document title must not be empty")]
    EmptyTitle,
}
