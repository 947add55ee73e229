//! Curator Janitor
//!
//! Quality scoring for documents already in the corpus.
//!
//! # Overview
//!
//! The janitor is responsible for:
//! - **Scoring**: Deducting from a base score of 100 for each quality issue found
//! - **Staleness**: Flagging documents whose validity dates have passed or that a sibling supersedes
//! - **Attribution**: Checking that the carrier and product codes match what the text talks about
//! - **Batch runs**: Analyzing the whole corpus while streaming progress to a subscriber
//!
//! # Scoring
//!
//! | Issue | Penalty |
//! |-------|---------|
//! | Content shorter than 100 chars | 30 |
//! | No insurance vocabulary | 20 |
//! | Near-duplicate exists | 15 |
//! | Expired validity date | 25 |
//! | Other date warning | 10 |
//! | Newer sibling version | 20 |
//! | Carrier mismatch | 10 |
//! | Title lacks carrier or product | 5 |
//!
//! An outdated or superseded document is always recommended for deletion.
//! Otherwise the score picks the verdict: `keep` at 70 and above, `review`
//! from 40, `delete` below. A duplicate scoring under 60 is deleted.
//!
//! # Usage
//!
//! ## Single Document
//!
//! ```no_run
//! use curator_janitor::DocumentAnalyzer;
//! use curator_store::SqliteStore;
//! # use curator_domain::DocumentId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("curator.db")?;
//! let analyzer = DocumentAnalyzer::default_config();
//! # let id = DocumentId::new();
//!
//! let analysis = analyzer.analyze_by_id(id, &store)?;
//! println!("{} scored {} ({:?})", analysis.title, analysis.score, analysis.recommendation);
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch With Progress
//!
//! ```no_run
//! use curator_janitor::{BatchFilter, DocumentAnalyzer};
//! use curator_store::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::new("curator.db")?;
//!     let analyzer = DocumentAnalyzer::default_config();
//!     let mut events = analyzer.progress().subscribe("nightly");
//!
//!     let listener = tokio::spawn(async move {
//!         while let Some(event) = events.recv().await {
//!             println!("[{:>3}%] {}", event.progress, event.message);
//!         }
//!     });
//!
//!     let report = analyzer
//!         .analyze_all_documents_with_progress("nightly", &BatchFilter::default(), &store)
//!         .await?;
//!     println!("{}", report.summary.summary());
//!     listener.await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use curator_janitor::ScoringConfig;
//!
//! // Default: keep at 70, review from 40
//! let config = ScoringConfig::default();
//!
//! // Strict: higher keep and review bars, longer useful content
//! let config = ScoringConfig::strict();
//!
//! // Lenient: lower bars and shorter useful content
//! let config = ScoringConfig::lenient();
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [scoring]
//! base_score = 100
//! useful_content_length = 100
//! keep_threshold = 70
//! review_threshold = 40
//!
//! [batch]
//! close_delay_ms = 1000
//! ```

#![warn(missing_docs)]

mod analyzer;
mod batch;
mod company;
mod config;
mod error;
mod progress;
mod summary;
mod versions;

pub use analyzer::{
    is_outdated_warning, recommend, AnalysisDetails, DocumentAnalysis, DocumentAnalyzer, ExpiredInfo,
    Recommendation, RecommendationFlags, OUTDATED_MARKERS,
};
pub use batch::{BatchFilter, BatchReport};
pub use company::{
    has_insurance_keywords, is_test_data, validate_company, validate_title, CompanyValidation, TitleValidation,
    GENERAL_COMPANY,
};
pub use config::{AnalyzerConfig, BatchConfig, ScoringConfig};
pub use error::AnalyzerError;
pub use progress::{ProgressEvent, ProgressRegistry, ProgressStep};
pub use summary::BatchSummary;
pub use versions::{effective_date, find_newer_version, NewerVersionInfo};
