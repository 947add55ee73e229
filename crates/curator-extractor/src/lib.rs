//! Curator Extractor
//!
//! Prepares already-extracted document text for storage.
//!
//! # Overview
//!
//! File parsing and scraping happen upstream; this crate receives normalized
//! UTF-8 text and splits it into fixed-size overlapping windows (500 chars,
//! 50 chars of overlap by default) that the corpus stores as chunks.
//!
//! # Architecture
//!
//! ```text
//! Text + metadata → DocumentIngest → Chunker → Document { chunks } → CorpusStore
//! ```
//!
//! # Example Usage
//!
//! ```
//! use curator_extractor::{Chunker, DocumentIngest};
//!
//! let ingest = DocumentIngest {
//!     title: "Правила ОСАГО".to_string(),
//!     text: "Полис ОСАГО действует до 01.01.2030".to_string(),
//!     company_code: Some("SOGAZ".to_string()),
//!     product_code: Some("OSAGO".to_string()),
//!     ..Default::default()
//! };
//!
//! let document = ingest.into_document(&Chunker::default()).unwrap();
//! assert_eq!(document.chunks.len(), 1);
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod ingest;

pub use chunking::Chunker;
pub use config::{ChunkConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use error::ExtractorError;
pub use ingest::{DocumentIngest, UNKNOWN_COMPANY, UNKNOWN_PRODUCT};
