//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur during gatekeeper operations
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Corpus query failed
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
