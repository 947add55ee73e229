//! Per-document quality analysis

use crate::batch::BatchReport;
use crate::company::{
    has_insurance_keywords, is_test_data, validate_company, validate_title, CompanyValidation,
    TitleValidation,
};
use crate::config::{AnalyzerConfig, ScoringConfig};
use crate::progress::ProgressRegistry;
use crate::versions::{effective_date, find_newer_version, NewerVersionInfo};
use crate::AnalyzerError;
use chrono::{Local, NaiveDate};
use curator_domain::{CorpusStore, Document, DocumentId, DocumentQuery};
use curator_gatekeeper::{DateValidation, DuplicateCandidate, DuplicateQuery, Gatekeeper};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Warning fragments that mark a document as outdated
pub const OUTDATED_MARKERS: &[&str] = &[
    "outdated",
    "expired",
    "no longer valid",
    "устарел",
    "истек",
    "неактуален",
];

/// Whether a date warning says the document is outdated
pub fn is_outdated_warning(warning: &str) -> bool {
    let lower = warning.to_lowercase();
    OUTDATED_MARKERS.iter().any(|m| lower.contains(m))
}

/// What to do with a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Good enough to serve
    Keep,
    /// Needs a human look
    Review,
    /// Should leave the corpus
    Delete,
}

/// The expired date that made a document outdated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiredInfo {
    /// Date as written
    pub expired_date: String,

    /// Text around it
    pub context: String,

    /// Kind of date (`expiry`, `effective`, ...)
    pub source: String,
}

/// Signals behind a score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    /// Content is long enough to be useful
    pub has_useful_content: bool,

    /// Content mentions insurance terms
    pub has_specific_info: bool,

    /// Mirrors `has_specific_info`
    pub is_relevant: bool,

    /// Near-duplicates exist
    pub is_duplicate: bool,

    /// A validity date has passed
    pub is_outdated: bool,

    /// Title or content carries test markers
    pub is_test_data: bool,

    /// Content length in chars
    pub content_length: usize,

    /// Flagged near-duplicates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<DuplicateCandidate>>,

    /// Date findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_validation: Option<DateValidation>,

    /// Set when the newer-version check ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_newer_version: Option<bool>,

    /// Superseding sibling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newer_version_info: Option<NewerVersionInfo>,

    /// Date that made the document outdated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_info: Option<ExpiredInfo>,

    /// Carrier check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_validation: Option<CompanyValidation>,

    /// Title check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_validation: Option<TitleValidation>,
}

/// Quality verdict for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    /// Analyzed document
    pub doc_id: DocumentId,

    /// Its title
    pub title: String,

    /// Its carrier code
    pub company_code: String,

    /// Its product code
    pub product_code: String,

    /// Quality score, 0-100
    pub score: u8,

    /// Problems found, in check order
    pub issues: Vec<String>,

    /// Suggested action
    pub recommendation: Recommendation,

    /// Why
    pub reason: String,

    /// Signals behind the score
    pub details: AnalysisDetails,
}

impl DocumentAnalysis {
    /// Placeholder for a document whose analysis failed
    pub fn degraded(document: &Document, error: &AnalyzerError) -> Self {
        Self {
            doc_id: document.id,
            title: document.title.clone(),
            company_code: document.company_code.clone(),
            product_code: document.product_code.clone(),
            score: 0,
            issues: vec![format!("Analysis error: {}", error)],
            recommendation: Recommendation::Review,
            reason: "Analysis failed; review manually".to_string(),
            details: AnalysisDetails {
                content_length: document.content().chars().count(),
                ..Default::default()
            },
        }
    }
}

/// Flags that override the score-based recommendation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationFlags {
    /// A validity date has passed
    pub is_outdated: bool,

    /// Explanation when a newer sibling exists
    pub newer_version: Option<String>,

    /// Near-duplicates exist
    pub is_duplicate: bool,
}

/// Recommendation chain; the first matching rule wins
pub fn recommend(score: u8, flags: &RecommendationFlags, config: &ScoringConfig) -> (Recommendation, String) {
    if flags.is_outdated {
        return (Recommendation::Delete, "Document is outdated".to_string());
    }
    if let Some(explanation) = &flags.newer_version {
        return (Recommendation::Delete, explanation.clone());
    }
    if flags.is_duplicate && score < config.duplicate_delete_threshold {
        return (Recommendation::Delete, "Duplicate with a low quality score".to_string());
    }
    if flags.is_duplicate {
        return (Recommendation::Review, "Possible duplicate; compare manually".to_string());
    }
    if score >= config.keep_threshold {
        (Recommendation::Keep, "Good quality document".to_string())
    } else if score >= config.review_threshold {
        (Recommendation::Review, "Average quality; review recommended".to_string())
    } else {
        (Recommendation::Delete, "Low quality document".to_string())
    }
}

/// Scores documents and recommends keep/review/delete
///
/// Single documents are analyzed synchronously with
/// [`analyze_document`](Self::analyze_document); whole-corpus runs stream
/// progress through the analyzer's [`ProgressRegistry`].
pub struct DocumentAnalyzer {
    pub(crate) config: AnalyzerConfig,
    pub(crate) gatekeeper: Gatekeeper,
    pub(crate) progress: ProgressRegistry,
    pub(crate) last_results: Arc<RwLock<Option<BatchReport>>>,
}

impl DocumentAnalyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        config.validate().map_err(AnalyzerError::Config)?;
        let gatekeeper = Gatekeeper::new(config.gatekeeper.clone())?;
        Ok(Self {
            config,
            gatekeeper,
            progress: ProgressRegistry::new(),
            last_results: Arc::new(RwLock::new(None)),
        })
    }

    /// Create an analyzer with default configuration
    pub fn default_config() -> Self {
        Self {
            config: AnalyzerConfig::default(),
            gatekeeper: Gatekeeper::default_config(),
            progress: ProgressRegistry::new(),
            last_results: Arc::new(RwLock::new(None)),
        }
    }

    /// Share an existing progress registry
    pub fn with_progress(mut self, registry: ProgressRegistry) -> Self {
        self.progress = registry;
        self
    }

    /// Registry batch runs report to
    pub fn progress(&self) -> &ProgressRegistry {
        &self.progress
    }

    /// Configuration in use
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Latest completed batch, if any
    pub fn last_results(&self) -> Option<BatchReport> {
        self.last_results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Analyze a stored document by id
    pub fn analyze_by_id<S>(&self, id: DocumentId, store: &S) -> Result<DocumentAnalysis, AnalyzerError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        let document = store
            .get_document(id)
            .map_err(|e| AnalyzerError::Store(e.to_string()))?
            .ok_or(AnalyzerError::NotFound(id))?;
        self.analyze_document(&document, store)
    }

    /// Analyze one document against the rest of the corpus
    pub fn analyze_document<S>(&self, document: &Document, store: &S) -> Result<DocumentAnalysis, AnalyzerError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        self.analyze_document_at(document, store, Local::now().date_naive())
    }

    /// Analyze one document, judging dates relative to `today`
    pub fn analyze_document_at<S>(
        &self,
        document: &Document,
        store: &S,
        today: NaiveDate,
    ) -> Result<DocumentAnalysis, AnalyzerError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        let scoring = &self.config.scoring;
        let checks = self.gatekeeper.config();
        let content = document.content();
        let content_length = content.chars().count();

        let mut score = scoring.base_score;
        let mut issues = Vec::new();
        let mut details = AnalysisDetails {
            content_length,
            ..Default::default()
        };

        // 1. Useful content
        details.has_useful_content = content_length > scoring.useful_content_length;
        if !details.has_useful_content {
            issues.push(format!("Too little useful content ({} characters)", content_length));
            score -= scoring.short_content_penalty;
        }

        // 2. Insurance-specific information
        details.has_specific_info = has_insurance_keywords(&content);
        details.is_relevant = details.has_specific_info;
        if !details.has_specific_info {
            issues.push("No specific insurance information".to_string());
            score -= scoring.no_specific_info_penalty;
        }

        details.is_test_data = is_test_data(&document.title, &content);
        if details.is_test_data {
            issues.push("Looks like test data".to_string());
        }

        // 3. Duplicates
        if checks.check_duplicates {
            let query = DuplicateQuery {
                title: document.title.clone(),
                content: content.clone(),
                company_code: Some(document.company_code.clone()),
                product_code: Some(document.product_code.clone()),
                exclude_id: Some(document.id),
            };
            let duplicates = self.gatekeeper.duplicate_detector().find_duplicates(&query, store)?;
            if !duplicates.is_empty() {
                details.is_duplicate = true;
                issues.push(format!("Found {} duplicates", duplicates.len()));
                score -= scoring.duplicate_penalty;
            }
            details.duplicates = Some(duplicates);
        }

        // 4. Dates
        if checks.check_dates {
            let validation = self.gatekeeper.date_validator().validate_at(&content, today);
            if let Some(warning) = validation.warnings.iter().find(|w| is_outdated_warning(w)) {
                details.is_outdated = true;
                issues.push(warning.clone());
                score -= scoring.outdated_penalty;
                details.expired_info = validation.first_expired().map(|finding| ExpiredInfo {
                    expired_date: finding.date.clone(),
                    context: finding.context.clone(),
                    source: finding.date_type.to_string(),
                });
            } else if !validation.warnings.is_empty() {
                issues.push(format!("Date warnings: {}", validation.warnings.join("; ")));
                score -= scoring.date_warning_penalty;
            }
            details.date_validation = Some(validation);
        }

        // 5. Newer version among siblings
        if let Some(own) = effective_date(&content) {
            let siblings = store
                .query_documents(&DocumentQuery::related(
                    Some(&document.company_code),
                    Some(&document.product_code),
                    Some(document.id),
                ))
                .map_err(|e| AnalyzerError::Store(e.to_string()))?;
            let newer = find_newer_version(document, &own, &siblings);
            if let Some(info) = &newer {
                issues.push(format!("Newer version available: \"{}\"", info.title));
                score -= scoring.newer_version_penalty;
            }
            details.has_newer_version = Some(newer.is_some());
            details.newer_version_info = newer;
        }

        // 6. Company belonging
        let company = validate_company(&document.title, &content, &document.company_code);
        if !company.is_correct {
            issues.push(format!(
                "Content points to {} rather than {}",
                company.suggested_company, company.current_company
            ));
            score -= scoring.wrong_company_penalty;
        }
        details.company_validation = Some(company);

        // 7. Title
        let title_check = validate_title(&document.title, &document.company_code, &document.product_code);
        if let Some(suggested) = &title_check.suggested_title {
            issues.push(format!("Title does not name its product or carrier; suggested: \"{}\"", suggested));
            score -= scoring.title_mismatch_penalty;
        }
        details.title_validation = Some(title_check);

        let score = score.clamp(0, 100) as u8;
        let flags = RecommendationFlags {
            is_outdated: details.is_outdated,
            newer_version: details.newer_version_info.as_ref().map(|n| n.explanation.clone()),
            is_duplicate: details.is_duplicate,
        };
        let (recommendation, reason) = recommend(score, &flags, scoring);

        debug!(
            "Analyzed {} ('{}'): score {}, {:?}, {} issues",
            document.id,
            document.title,
            score,
            recommendation,
            issues.len()
        );

        Ok(DocumentAnalysis {
            doc_id: document.id,
            title: document.title.clone(),
            company_code: document.company_code.clone(),
            product_code: document.product_code.clone(),
            score,
            issues,
            recommendation,
            reason,
            details,
        })
    }
}

impl Default for DocumentAnalyzer {
    fn default() -> Self {
        Self::default_config()
    }
}
