//! Curator Storage Layer
//!
//! Implements the CorpusStore trait on SQLite.
//!
//! # Architecture
//!
//! - `documents` holds metadata and review state, one row per document
//! - `chunks` holds the ordered text windows, keyed by (document, index)
//! - [`SearchScorer`] ranks chunks lexically for fallback retrieval
//!
//! # Examples
//!
//! ```no_run
//! use curator_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for corpus operations
//! ```

#![warn(missing_docs)]

mod lexical;

pub use lexical::{ScoredChunk, SearchScorer};

use curator_domain::{Approval, Chunk, CorpusStore, Document, DocumentId, DocumentQuery, Obsolescence, StatusUpdate};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const DOCUMENT_COLUMNS: &str = "id, company_code, product_code, title, source_url, file_url, version, created_at,
     is_approved, approved_at, approved_by, is_obsolete, obsolete_at, obsolete_by";

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document not found
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A document with this id already exists
    #[error("Duplicate document id: {0}")]
    Duplicate(String),
}

/// SQLite-based implementation of CorpusStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use curator_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("curator.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    /// Rank chunks of non-obsolete documents against a keyword query
    pub fn search_chunks(&self, query: &str, limit: usize) -> Result<Vec<ScoredChunk>, StoreError> {
        let scorer = SearchScorer::new(query);
        if scorer.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT c.doc_id, d.title, c.chunk_idx, c.text
             FROM chunks c JOIN documents d ON d.id = c.doc_id
             WHERE d.is_obsolete = 0
             ORDER BY d.created_at, c.doc_id, c.chunk_idx",
        )?;
        let candidates = stmt
            .query_map([], |row| {
                let id_bytes: Vec<u8> = row.get(0)?;
                Ok(ScoredChunk {
                    doc_id: Self::bytes_to_document_id(&id_bytes).map_err(|e| Self::conversion_error(0, e))?,
                    title: row.get(1)?,
                    chunk_idx: row.get::<_, i64>(2)? as usize,
                    text: row.get(3)?,
                    score: 0.0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let hits = scorer.rank(candidates, limit);
        debug!("Search {:?} matched {} chunks", query, hits.len());
        Ok(hits)
    }

    /// Number of stored documents, obsolete included
    pub fn count_documents(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Convert DocumentId to bytes for storage
    fn document_id_to_bytes(id: DocumentId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to DocumentId
    fn bytes_to_document_id(bytes: &[u8]) -> Result<DocumentId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for DocumentId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(DocumentId::from_value(u128::from_be_bytes(arr)))
    }

    fn conversion_error(column: usize, e: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Blob, Box::new(e))
    }

    /// Map a row selected with `DOCUMENT_COLUMNS`; chunks are loaded separately
    fn row_to_document(row: &Row<'_>) -> rusqlite::Result<Document> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_document_id(&id_bytes).map_err(|e| Self::conversion_error(0, e))?;

        Ok(Document {
            id,
            company_code: row.get(1)?,
            product_code: row.get(2)?,
            title: row.get(3)?,
            chunks: Vec::new(),
            source_url: row.get(4)?,
            file_url: row.get(5)?,
            version: row.get(6)?,
            created_at: row.get::<_, i64>(7)? as u64,
            approval: Approval {
                is_approved: row.get(8)?,
                approved_at: row.get::<_, Option<i64>>(9)?.map(|t| t as u64),
                approved_by: row.get(10)?,
            },
            obsolescence: Obsolescence {
                is_obsolete: row.get(11)?,
                obsolete_at: row.get::<_, Option<i64>>(12)?.map(|t| t as u64),
                obsolete_by: row.get(13)?,
            },
        })
    }

    fn load_chunks(&self, id: DocumentId) -> Result<Vec<Chunk>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT chunk_idx, text FROM chunks WHERE doc_id = ?1 ORDER BY chunk_idx")?;
        let chunks = stmt
            .query_map(params![Self::document_id_to_bytes(id)], |row| {
                Ok(Chunk {
                    doc_id: id,
                    chunk_idx: row.get::<_, i64>(0)? as usize,
                    text: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(chunks)
    }
}

impl CorpusStore for SqliteStore {
    type Error = StoreError;

    fn query_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, Self::Error> {
        let mut sql = format!("SELECT {} FROM documents WHERE 1=1", DOCUMENT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(company) = &query.company_code {
            sql.push_str(" AND company_code = ?");
            params.push(Box::new(company.clone()));
        }

        if let Some(product) = &query.product_code {
            sql.push_str(" AND product_code = ?");
            params.push(Box::new(product.clone()));
        }

        if let Some(exclude) = query.exclude_id {
            sql.push_str(" AND id != ?");
            params.push(Box::new(Self::document_id_to_bytes(exclude)));
        }

        if let Some(approved) = query.approved {
            sql.push_str(" AND is_approved = ?");
            params.push(Box::new(approved));
        }

        if !query.include_obsolete {
            sql.push_str(" AND is_obsolete = 0");
        }

        sql.push_str(" ORDER BY created_at, id");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit as i64));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut documents = stmt
            .query_map(&param_refs[..], Self::row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;

        for document in &mut documents {
            document.chunks = self.load_chunks(document.id)?;
        }

        Ok(documents)
    }

    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error> {
        let document = self
            .conn
            .query_row(
                &format!("SELECT {} FROM documents WHERE id = ?1", DOCUMENT_COLUMNS),
                params![Self::document_id_to_bytes(id)],
                Self::row_to_document,
            )
            .optional()?;

        match document {
            Some(mut document) => {
                document.chunks = self.load_chunks(id)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    fn insert_document(&mut self, document: Document) -> Result<DocumentId, Self::Error> {
        let id_bytes = Self::document_id_to_bytes(document.id);

        let exists: bool = self
            .conn
            .query_row("SELECT 1 FROM documents WHERE id = ?1", params![&id_bytes], |_| Ok(true))
            .optional()?
            .unwrap_or(false);

        if exists {
            return Err(StoreError::Duplicate(document.id.to_string()));
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO documents (id, company_code, product_code, title, source_url, file_url, version, created_at,
                                    is_approved, approved_at, approved_by, is_obsolete, obsolete_at, obsolete_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                &id_bytes,
                &document.company_code,
                &document.product_code,
                &document.title,
                &document.source_url,
                &document.file_url,
                &document.version,
                document.created_at as i64,
                document.approval.is_approved,
                document.approval.approved_at.map(|t| t as i64),
                &document.approval.approved_by,
                document.obsolescence.is_obsolete,
                document.obsolescence.obsolete_at.map(|t| t as i64),
                &document.obsolescence.obsolete_by,
            ],
        )?;

        for chunk in &document.chunks {
            tx.execute(
                "INSERT INTO chunks (doc_id, chunk_idx, text) VALUES (?1, ?2, ?3)",
                params![&id_bytes, chunk.chunk_idx as i64, &chunk.text],
            )?;
        }
        tx.commit()?;

        debug!("Stored document {} with {} chunks", document.id, document.chunks.len());
        Ok(document.id)
    }

    fn update_status(&mut self, id: DocumentId, update: StatusUpdate) -> Result<(), Self::Error> {
        let id_bytes = Self::document_id_to_bytes(id);

        let changed = match update {
            StatusUpdate::Approve { by, at } => self.conn.execute(
                "UPDATE documents SET is_approved = 1, approved_at = ?2, approved_by = ?3 WHERE id = ?1",
                params![&id_bytes, at as i64, by],
            )?,
            StatusUpdate::Unapprove => self.conn.execute(
                "UPDATE documents SET is_approved = 0, approved_at = NULL, approved_by = NULL WHERE id = ?1",
                params![&id_bytes],
            )?,
            StatusUpdate::MarkObsolete { by, at } => self.conn.execute(
                "UPDATE documents SET is_obsolete = 1, obsolete_at = ?2, obsolete_by = ?3 WHERE id = ?1",
                params![&id_bytes, at as i64, by],
            )?,
            StatusUpdate::Restore => self.conn.execute(
                "UPDATE documents SET is_obsolete = 0, obsolete_at = NULL, obsolete_by = NULL WHERE id = ?1",
                params![&id_bytes],
            )?,
        };

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
