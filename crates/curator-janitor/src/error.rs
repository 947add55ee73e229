//! Error types for document analysis

use curator_domain::DocumentId;
use curator_gatekeeper::GatekeeperError;
use thiserror::Error;

/// Errors that can occur during document analysis
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// A gatekeeper check failed
    #[error(transparent)]
    Gatekeeper(#[from] GatekeeperError),

    /// Document does not exist
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
