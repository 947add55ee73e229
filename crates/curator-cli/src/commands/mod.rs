//! Command implementations.

pub mod analyze;
pub mod ingest;
pub mod review;
pub mod search;
pub mod status;

pub use self::analyze::execute_analyze;
pub use self::ingest::execute_ingest;
pub use self::review::execute_review;
pub use self::search::execute_search;
pub use self::status::{execute_approve, execute_obsolete};

use crate::error::{CliError, Result};
use curator_domain::DocumentId;

/// Parse a document id given on the command line.
pub(crate) fn parse_id(input: &str) -> Result<DocumentId> {
    DocumentId::from_string(input.trim()).map_err(CliError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = DocumentId::new();
        assert_eq!(parse_id(&format!(" {} ", id)).unwrap(), id);
        assert!(matches!(parse_id("not-an-id"), Err(CliError::InvalidInput(_))));
    }
}
