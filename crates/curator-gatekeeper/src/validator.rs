//! Upload review

use crate::conflicts::{Conflict, ConflictResolver};
use crate::dates::{DateValidation, DateValidator};
use crate::duplicates::{DuplicateCandidate, DuplicateDetector, DuplicateQuery};
use crate::{GatekeeperConfig, GatekeeperError};
use chrono::{Local, NaiveDate};
use curator_domain::{CorpusStore, DocumentId};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A document that has not been stored yet
#[derive(Debug, Clone, Default)]
pub struct UploadCandidate {
    /// Title supplied by the uploader
    pub title: String,

    /// Normalized text
    pub content: String,

    /// Carrier code
    pub company_code: Option<String>,

    /// Product code
    pub product_code: Option<String>,

    /// Existing document being replaced, left out of every comparison
    pub replaces: Option<DocumentId>,
}

/// What the reviewer is advised to do with an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Nothing found
    Approve,
    /// An almost identical document exists
    Replace,
    /// Something needs a human look
    Review,
}

/// Findings for an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReview {
    /// Flagged near-duplicates
    pub duplicates: Vec<DuplicateCandidate>,

    /// Fact mismatches with related documents
    pub conflicts: Vec<Conflict>,

    /// Date findings
    pub date_validation: DateValidation,

    /// Advice for the reviewer
    pub suggested_action: SuggestedAction,
}

/// The Gatekeeper reviews documents before they enter the corpus
pub struct Gatekeeper {
    config: GatekeeperConfig,
    duplicates: DuplicateDetector,
    conflicts: ConflictResolver,
    dates: DateValidator,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: GatekeeperConfig) -> Result<Self, GatekeeperError> {
        config.validate().map_err(GatekeeperError::Config)?;
        Ok(Self {
            duplicates: DuplicateDetector::new(config.duplicates.clone()),
            conflicts: ConflictResolver::new(),
            dates: DateValidator::new(config.dates.clone()),
            config,
        })
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        let config = GatekeeperConfig::default();
        Self {
            duplicates: DuplicateDetector::new(config.duplicates.clone()),
            conflicts: ConflictResolver::new(),
            dates: DateValidator::new(config.dates.clone()),
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &GatekeeperConfig {
        &self.config
    }

    /// Duplicate detector built from the configuration
    pub fn duplicate_detector(&self) -> &DuplicateDetector {
        &self.duplicates
    }

    /// Conflict resolver
    pub fn conflict_resolver(&self) -> &ConflictResolver {
        &self.conflicts
    }

    /// Date validator built from the configuration
    pub fn date_validator(&self) -> &DateValidator {
        &self.dates
    }

    /// Review an upload against the corpus as of today
    pub fn review_upload<S>(
        &self,
        candidate: &UploadCandidate,
        store: &S,
    ) -> Result<UploadReview, GatekeeperError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        self.review_upload_at(candidate, store, Local::now().date_naive())
    }

    /// Review an upload against the corpus, judging dates relative to `today`
    pub fn review_upload_at<S>(
        &self,
        candidate: &UploadCandidate,
        store: &S,
        today: NaiveDate,
    ) -> Result<UploadReview, GatekeeperError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        // 1. Near-duplicates
        let duplicates = if self.config.check_duplicates {
            let query = DuplicateQuery {
                title: candidate.title.clone(),
                content: candidate.content.clone(),
                company_code: candidate.company_code.clone(),
                product_code: candidate.product_code.clone(),
                exclude_id: candidate.replaces,
            };
            self.duplicates.find_duplicates(&query, store)?
        } else {
            Vec::new()
        };

        // 2. Fact conflicts
        let conflicts = if self.config.check_conflicts {
            self.conflicts.find_conflicts(
                &candidate.content,
                candidate.company_code.as_deref(),
                candidate.product_code.as_deref(),
                candidate.replaces,
                store,
            )?
        } else {
            Vec::new()
        };

        // 3. Dates
        let date_validation = if self.config.check_dates {
            self.dates.validate_at(&candidate.content, today)
        } else {
            DateValidation {
                dates: Vec::new(),
                warnings: Vec::new(),
                recommendations: Vec::new(),
                is_valid: true,
            }
        };

        let suggested_action = self.suggest(&duplicates, &conflicts, &date_validation);
        info!(
            "Reviewed upload '{}': {} duplicates, {} conflicts, {} date warnings -> {:?}",
            candidate.title,
            duplicates.len(),
            conflicts.len(),
            date_validation.warnings.len(),
            suggested_action
        );

        Ok(UploadReview {
            duplicates,
            conflicts,
            date_validation,
            suggested_action,
        })
    }

    fn suggest(
        &self,
        duplicates: &[DuplicateCandidate],
        conflicts: &[Conflict],
        dates: &DateValidation,
    ) -> SuggestedAction {
        let very_similar = self.config.duplicates.very_similar_title;
        if duplicates.iter().any(|d| d.similarity >= very_similar) {
            SuggestedAction::Replace
        } else if !duplicates.is_empty() || !conflicts.is_empty() || !dates.warnings.is_empty() {
            SuggestedAction::Review
        } else {
            SuggestedAction::Approve
        }
    }
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_domain::{Approval, Chunk, Document, DocumentQuery, Obsolescence, StatusUpdate};

    struct MockStore {
        documents: Vec<Document>,
    }

    impl CorpusStore for MockStore {
        type Error = String;

        fn query_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, Self::Error> {
            Ok(self.documents.iter().filter(|d| query.matches(d)).cloned().collect())
        }

        fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error> {
            Ok(self.documents.iter().find(|d| d.id == id).cloned())
        }

        fn insert_document(&mut self, document: Document) -> Result<DocumentId, Self::Error> {
            let id = document.id;
            self.documents.push(document);
            Ok(id)
        }

        fn update_status(&mut self, _id: DocumentId, _update: StatusUpdate) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn doc(title: &str, text: &str) -> Document {
        let id = DocumentId::new();
        Document {
            id,
            company_code: "VSK".to_string(),
            product_code: "TRAVEL".to_string(),
            title: title.to_string(),
            chunks: vec![Chunk {
                doc_id: id,
                chunk_idx: 0,
                text: text.to_string(),
            }],
            source_url: None,
            file_url: None,
            version: String::new(),
            created_at: 0,
            approval: Approval::default(),
            obsolescence: Obsolescence::default(),
        }
    }

    fn candidate(title: &str, content: &str) -> UploadCandidate {
        UploadCandidate {
            title: title.to_string(),
            content: content.to_string(),
            company_code: Some("VSK".to_string()),
            product_code: Some("TRAVEL".to_string()),
            replaces: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_clean_upload_is_approved() {
        let store = MockStore { documents: vec![] };
        let review = Gatekeeper::default()
            .review_upload_at(&candidate("Туризм ВСК", "Покрытие медицинских расходов, версия от 2024-05-01"), &store, today())
            .unwrap();

        assert!(review.duplicates.is_empty());
        assert!(review.conflicts.is_empty());
        assert!(review.date_validation.warnings.is_empty());
        assert_eq!(review.suggested_action, SuggestedAction::Approve);
    }

    #[test]
    fn test_same_title_suggests_replace() {
        let store = MockStore {
            documents: vec![doc("Туризм ВСК", "старый текст")],
        };
        let review = Gatekeeper::default()
            .review_upload_at(&candidate("Туризм ВСК", "новый текст"), &store, today())
            .unwrap();

        assert_eq!(review.duplicates.len(), 1);
        assert_eq!(review.suggested_action, SuggestedAction::Replace);
    }

    #[test]
    fn test_replaced_document_is_ignored() {
        let existing = doc("Туризм ВСК", "Стоимость 1000 руб");
        let store = MockStore {
            documents: vec![existing.clone()],
        };
        let mut upload = candidate("Туризм ВСК", "Стоимость 2000 руб");
        upload.replaces = Some(existing.id);

        let review = Gatekeeper::default().review_upload_at(&upload, &store, today()).unwrap();
        assert!(review.duplicates.is_empty());
        assert!(review.conflicts.is_empty());
        assert_eq!(review.suggested_action, SuggestedAction::Approve);
    }

    #[test]
    fn test_conflict_suggests_review() {
        let store = MockStore {
            documents: vec![doc("Страховка для выезжающих за рубеж", "Стоимость 1000 руб")],
        };
        let review = Gatekeeper::default()
            .review_upload_at(&candidate("Туризм ВСК", "Стоимость 2000 руб"), &store, today())
            .unwrap();

        assert!(review.duplicates.is_empty());
        assert_eq!(review.conflicts.len(), 1);
        assert_eq!(review.suggested_action, SuggestedAction::Review);
    }

    #[test]
    fn test_disabled_checks_are_skipped() {
        let config = GatekeeperConfig {
            check_duplicates: false,
            check_conflicts: false,
            check_dates: false,
            ..GatekeeperConfig::default()
        };
        let store = MockStore {
            documents: vec![doc("Туризм ВСК", "Стоимость 1000 руб")],
        };
        let review = Gatekeeper::new(config)
            .unwrap()
            .review_upload_at(&candidate("Туризм ВСК", "Действует до 01.01.2020, 2000 руб"), &store, today())
            .unwrap();

        assert_eq!(review.suggested_action, SuggestedAction::Approve);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GatekeeperConfig::default();
        config.duplicates.identical_content = -0.1;
        assert!(matches!(Gatekeeper::new(config), Err(GatekeeperError::Config(_))));
    }

    #[test]
    fn test_review_serializes_camel_case() {
        let store = MockStore { documents: vec![] };
        let review = Gatekeeper::default()
            .review_upload_at(&candidate("Туризм", "Действует до 01.01.2020"), &store, today())
            .unwrap();

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["suggestedAction"], "review");
        assert_eq!(json["dateValidation"]["isValid"], false);
        assert_eq!(json["dateValidation"]["dates"][0]["type"], "expiry");
    }
}
