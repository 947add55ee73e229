//! Document module - the unit of curation in the corpus

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a document based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, so documents
/// ingested later compare greater than earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(u128);

impl DocumentId {
    /// Generate a new UUIDv7-based DocumentId
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::DocumentId;
    ///
    /// let id = DocumentId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a DocumentId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a DocumentId from its hyphenated UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use curator_domain::DocumentId;
    ///
    /// let id = DocumentId::new();
    /// let parsed = DocumentId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid document id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl std::str::FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_string(&value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.to_string()
    }
}

/// A fixed-size window of a document's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Owning document
    pub doc_id: DocumentId,

    /// Zero-based position of this window in the document
    pub chunk_idx: usize,

    /// Window text (overlaps its predecessor)
    pub text: String,
}

/// Review state of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    /// Whether a reviewer approved the document for serving
    pub is_approved: bool,

    /// When it was approved (Unix seconds)
    pub approved_at: Option<u64>,

    /// Who approved it
    pub approved_by: Option<String>,
}

/// Obsolescence state of a document, independent of its quality score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obsolescence {
    /// Whether the document is no longer current
    pub is_obsolete: bool,

    /// When it was marked obsolete (Unix seconds)
    pub obsolete_at: Option<u64>,

    /// Who marked it obsolete
    pub obsolete_by: Option<String>,
}

/// A document in the insurance knowledge base
///
/// Company and product codes are open vocabularies: unknown codes are kept
/// verbatim. The text itself is stored as ordered chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,

    /// Carrier code (e.g. "SOGAZ")
    pub company_code: String,

    /// Insurance product code (e.g. "OSAGO")
    pub product_code: String,

    /// Human-readable title
    pub title: String,

    /// Ordered text windows
    pub chunks: Vec<Chunk>,

    /// Page the text was scraped from
    pub source_url: Option<String>,

    /// Uploaded file the text was extracted from
    pub file_url: Option<String>,

    /// Free-text version stamp, usually an RFC 3339 timestamp
    pub version: String,

    /// When the document was created (Unix seconds)
    pub created_at: u64,

    /// Review state
    pub approval: Approval,

    /// Obsolescence state
    pub obsolescence: Obsolescence,
}

impl Document {
    /// Full text, derived by concatenating chunks in index order
    ///
    /// Overlapping characters between neighbouring chunks appear twice, so
    /// this is not an exact reconstruction of the ingested text.
    pub fn content(&self) -> String {
        let mut chunks: Vec<&Chunk> = self.chunks.iter().collect();
        chunks.sort_by_key(|c| c.chunk_idx);
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Whether the document may be served to end users
    pub fn is_active(&self) -> bool {
        self.approval.is_approved && !self.obsolescence.is_obsolete
    }
}
