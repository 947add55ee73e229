//! Trait definitions for external interactions
//!
//! These traits define the boundary between curation logic and the
//! persistence collaborator. Implementations live in other crates.

use crate::{Document, DocumentId};

/// Trait for reading and updating the document corpus
///
/// Implemented by the infrastructure layer (curator-store)
pub trait CorpusStore {
    /// Error type for store operations
    type Error;

    /// Query documents (with their chunks) matching criteria
    fn query_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, Self::Error>;

    /// Get a document by ID
    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error>;

    /// Insert a new document together with its chunks
    fn insert_document(&mut self, document: Document) -> Result<DocumentId, Self::Error>;

    /// Apply a status change requested by a reviewer
    fn update_status(&mut self, id: DocumentId, update: StatusUpdate) -> Result<(), Self::Error>;
}

/// Query criteria for retrieving documents
///
/// Every `None` filter matches all documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    /// Filter by exact company code
    pub company_code: Option<String>,

    /// Filter by exact product code
    pub product_code: Option<String>,

    /// Leave this document out of the results
    pub exclude_id: Option<DocumentId>,

    /// Filter by approval flag
    pub approved: Option<bool>,

    /// Include documents marked obsolete
    pub include_obsolete: bool,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl DocumentQuery {
    /// Non-obsolete documents related to a company/product pair, excluding one id
    pub fn related(
        company_code: Option<&str>,
        product_code: Option<&str>,
        exclude_id: Option<DocumentId>,
    ) -> Self {
        Self {
            company_code: company_code.map(str::to_string),
            product_code: product_code.map(str::to_string),
            exclude_id,
            ..Default::default()
        }
    }

    /// Check a document against every filter except `limit`
    ///
    /// Stores that cannot push filters down can use this after loading.
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(code) = &self.company_code {
            if &document.company_code != code {
                return false;
            }
        }
        if let Some(code) = &self.product_code {
            if &document.product_code != code {
                return false;
            }
        }
        if self.exclude_id == Some(document.id) {
            return false;
        }
        if let Some(approved) = self.approved {
            if document.approval.is_approved != approved {
                return false;
            }
        }
        self.include_obsolete || !document.obsolescence.is_obsolete
    }
}

/// Field updates the curation surface may request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Approve the document for serving
    Approve {
        /// Reviewer
        by: String,
        /// Unix seconds
        at: u64,
    },

    /// Withdraw a previous approval
    Unapprove,

    /// Mark the document obsolete
    MarkObsolete {
        /// Reviewer
        by: String,
        /// Unix seconds
        at: u64,
    },

    /// Clear the obsolete flag
    Restore,
}
