//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Store error: {0}")]
    Store(#[from] curator_store::StoreError),

    /// Chunking or ingest error
    #[error("Ingest error: {0}")]
    Extractor(#[from] curator_extractor::ExtractorError),

    /// Upload review error
    #[error("Review error: {0}")]
    Gatekeeper(#[from] curator_gatekeeper::GatekeeperError),

    /// Analysis error
    #[error("Analysis error: {0}")]
    Analyzer(#[from] curator_janitor::AnalyzerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No such document
    #[error("Document not found: {0}")]
    NotFound(String),
}
