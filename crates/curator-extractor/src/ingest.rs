//! Turning normalized text into a storable document

use crate::chunking::Chunker;
use crate::error::ExtractorError;
use chrono::Utc;
use curator_domain::{Approval, Chunk, Document, DocumentId, Obsolescence};
use tracing::debug;

/// Company code used when the uploader does not name a carrier
pub const UNKNOWN_COMPANY: &str = "GENERAL";

/// Product code used when the uploader does not name a product
pub const UNKNOWN_PRODUCT: &str = "GENERAL";

/// Already-extracted text plus the metadata supplied with it
#[derive(Debug, Clone, Default)]
pub struct DocumentIngest {
    /// Document title
    pub title: String,

    /// Normalized UTF-8 text
    pub text: String,

    /// Carrier code, kept verbatim
    pub company_code: Option<String>,

    /// Product code, kept verbatim
    pub product_code: Option<String>,

    /// Page the text came from
    pub source_url: Option<String>,

    /// File the text came from
    pub file_url: Option<String>,
}

impl DocumentIngest {
    /// Build a new unapproved document with freshly chunked text
    pub fn into_document(self, chunker: &Chunker) -> Result<Document, ExtractorError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ExtractorError::EmptyTitle);
        }

        let id = DocumentId::new();
        let now = Utc::now();
        let chunks: Vec<Chunk> = chunker
            .chunk(&self.text)
            .into_iter()
            .enumerate()
            .map(|(chunk_idx, text)| Chunk {
                doc_id: id,
                chunk_idx,
                text,
            })
            .collect();

        debug!("Prepared document {} ('{}') with {} chunks", id, title, chunks.len());

        Ok(Document {
            id,
            company_code: self
                .company_code
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            product_code: self
                .product_code
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            title,
            chunks,
            source_url: self.source_url,
            file_url: self.file_url,
            version: now.to_rfc3339(),
            created_at: now.timestamp().max(0) as u64,
            approval: Approval::default(),
            obsolescence: Obsolescence::default(),
        })
    }
}
