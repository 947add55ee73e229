//! Curator Domain Layer
//!
//! Core model for the insurance knowledge-base curation engine. Defines the
//! documents and chunks the engine reasons about and the trait interface of
//! the corpus collaborator that owns them.
//!
//! ## Key Concepts
//!
//! - **Document**: a titled insurance text tagged with open-vocabulary
//!   company and product codes
//! - **Chunk**: a fixed-size overlapping window of a document's text
//! - **Approval / Obsolescence**: reviewer-controlled lifecycle flags
//! - **CorpusStore**: the queryable corpus snapshot consumed by every check
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod traits;

// Re-exports for convenience
pub use document::{Approval, Chunk, Document, DocumentId, Obsolescence};
pub use traits::{CorpusStore, DocumentQuery, StatusUpdate};
