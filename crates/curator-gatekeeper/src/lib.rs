//! Curator Gatekeeper
//!
//! Lexical checks that run on a document before it enters the corpus and
//! again whenever the corpus is re-analyzed.
//!
//! The Gatekeeper provides:
//! - Near-duplicate detection (title edit distance, keyword overlap,
//!   term-frequency cosine, key phrases, size+title)
//! - Price, term and condition conflicts against related documents
//! - Date extraction and temporal relevance warnings
//! - Upload review combining the three into a suggested action
//!
//! # Examples
//!
//! ```
//! use curator_gatekeeper::DateValidator;
//!
//! let validation = DateValidator::default().validate("Полис действует до 01.01.2020");
//! assert!(!validation.is_valid);
//! assert!(validation.warnings[0].contains("01.01.2020"));
//! ```

#![warn(missing_docs)]

mod config;
mod conflicts;
mod dates;
mod duplicates;
mod error;
pub mod text;
mod validator;

pub use config::{DateConfig, DuplicateThresholds, GatekeeperConfig};
pub use conflicts::{compare_facts, Conflict, ConflictResolver, ConflictType, ExtractedFacts, FactDifference};
pub use dates::{parse_date, DateFinding, DateType, DateValidation, DateValidator};
pub use duplicates::{key_phrases, DuplicateCandidate, DuplicateDetector, DuplicateQuery, DuplicateReason};
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, SuggestedAction, UploadCandidate, UploadReview};
