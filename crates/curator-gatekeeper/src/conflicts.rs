//! Fact conflicts between a document and its related corpus

use crate::error::GatekeeperError;
use curator_domain::{CorpusStore, DocumentId, DocumentQuery};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

lazy_static! {
    static ref PRICE: Regex = Regex::new(r"(?i)\d+[,.]?\d*\s*(?:руб|₽|rur)").unwrap();
    static ref TERM: Regex = Regex::new(r"(?i)\d+\s*(?:месяц|год|лет)").unwrap();
    static ref PERCENT: Regex = Regex::new(r"\d+[,.]?\d*\s*%").unwrap();
}

/// Values shown per side in a conflict
const MAX_SHOWN_VALUES: usize = 3;

/// Kind of mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Prices differ
    PriceDifference,
    /// Terms (durations) differ
    TermMismatch,
    /// Percentages differ
    ConditionMismatch,
}

impl ConflictType {
    fn label(&self) -> &'static str {
        match self {
            ConflictType::PriceDifference => "prices",
            ConflictType::TermMismatch => "terms",
            ConflictType::ConditionMismatch => "percentages",
        }
    }
}

/// A mismatch between the new text and one related document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Related document
    pub doc_id: DocumentId,

    /// Its title
    pub doc_title: String,

    /// Mismatch category
    pub conflict_type: ConflictType,

    /// Human-readable summary
    pub description: String,

    /// Values only the new text mentions
    pub new_value: String,

    /// Values only the related document mentions
    pub old_value: String,
}

/// Normalized facts mentioned in a text, in first-occurrence order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFacts {
    /// Amounts of money
    pub prices: Vec<String>,
    /// Durations
    pub terms: Vec<String>,
    /// Percentages
    pub percentages: Vec<String>,
}

impl ExtractedFacts {
    /// Extract facts from text
    pub fn extract(text: &str) -> Self {
        Self {
            prices: collect_normalized(&PRICE, text),
            terms: collect_normalized(&TERM, text),
            percentages: collect_normalized(&PERCENT, text),
        }
    }

    fn categories(&self) -> [(ConflictType, &[String]); 3] {
        [
            (ConflictType::PriceDifference, &self.prices),
            (ConflictType::TermMismatch, &self.terms),
            (ConflictType::ConditionMismatch, &self.percentages),
        ]
    }
}

fn collect_normalized(pattern: &Regex, text: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for m in pattern.find_iter(text) {
        let value: String = m
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if !values.contains(&value) {
            values.push(value);
        }
    }
    values
}

/// One category whose value sets differ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactDifference {
    /// Category
    pub conflict_type: ConflictType,
    /// Values only on the new side
    pub only_new: Vec<String>,
    /// Values only on the old side
    pub only_old: Vec<String>,
}

/// Symmetric differences per category
///
/// A value present on one side only is a difference, including when the
/// other side has no value of that category at all.
pub fn compare_facts(new: &ExtractedFacts, old: &ExtractedFacts) -> Vec<FactDifference> {
    new.categories()
        .into_iter()
        .zip(old.categories())
        .filter_map(|((conflict_type, a), (_, b))| {
            let only_new: Vec<String> = a.iter().filter(|v| !b.contains(v)).cloned().collect();
            let only_old: Vec<String> = b.iter().filter(|v| !a.contains(v)).cloned().collect();
            if only_new.is_empty() && only_old.is_empty() {
                None
            } else {
                Some(FactDifference {
                    conflict_type,
                    only_new,
                    only_old,
                })
            }
        })
        .collect()
}

/// Finds price, term and condition mismatches against related documents
#[derive(Debug, Clone, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    /// Create a resolver
    pub fn new() -> Self {
        Self
    }

    /// Compare `text` with every related non-obsolete document
    pub fn find_conflicts<S>(
        &self,
        text: &str,
        company_code: Option<&str>,
        product_code: Option<&str>,
        exclude_id: Option<DocumentId>,
        store: &S,
    ) -> Result<Vec<Conflict>, GatekeeperError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        let new_facts = ExtractedFacts::extract(text);
        let related = store
            .query_documents(&DocumentQuery::related(company_code, product_code, exclude_id))
            .map_err(|e| GatekeeperError::Store(e.to_string()))?;

        let mut conflicts = Vec::new();
        for doc in related.iter().filter(|d| Some(d.id) != exclude_id) {
            let old_facts = ExtractedFacts::extract(&doc.content());
            for diff in compare_facts(&new_facts, &old_facts) {
                let new_value = join_first(&diff.only_new);
                let old_value = join_first(&diff.only_old);
                debug!("Conflict with {}: {} [{}] vs [{}]", doc.id, diff.conflict_type.label(), new_value, old_value);
                conflicts.push(Conflict {
                    doc_id: doc.id,
                    doc_title: doc.title.clone(),
                    conflict_type: diff.conflict_type,
                    description: format!(
                        "Different {} than in \"{}\"",
                        diff.conflict_type.label(),
                        doc.title
                    ),
                    new_value,
                    old_value,
                });
            }
        }

        Ok(conflicts)
    }
}

fn join_first(values: &[String]) -> String {
    values
        .iter()
        .take(MAX_SHOWN_VALUES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_domain::{Approval, Chunk, Document, Obsolescence, StatusUpdate};

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
            company_code: "RESO".to_string(),
            product_code: "KASKO".to_string(),
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

    #[test]
    fn test_extract_normalizes_values() {
        let facts = ExtractedFacts::extract("Стоимость 5000 РУБ, скидка 10 %, срок 12 месяцев. Повторно: 5000руб");
        assert_eq!(facts.prices, vec!["5000руб"]);
        assert_eq!(facts.percentages, vec!["10%"]);
        assert_eq!(facts.terms, vec!["12месяц"]);
    }

    #[test]
    fn test_price_difference_detected() {
        let old = doc("КАСКО Базовый", "Стоимость полиса 30000 руб на 1 год");
        let store = MockStore { documents: vec![old.clone()] };

        let conflicts = ConflictResolver::new()
            .find_conflicts("Стоимость полиса 35000 руб на 1 год", Some("RESO"), Some("KASKO"), None, &store)
            .unwrap();

        assert_eq!(conflicts.len(), 1);
        let c = &conflicts[0];
        assert_eq!(c.doc_id, old.id);
        assert_eq!(c.conflict_type, ConflictType::PriceDifference);
        assert_eq!(c.new_value, "35000руб");
        assert_eq!(c.old_value, "30000руб");
    }

    #[test]
    fn test_identical_facts_do_not_conflict() {
        let store = MockStore {
            documents: vec![doc("КАСКО", "Франшиза 10% при сроке 1 год")],
        };
        let conflicts = ConflictResolver::new()
            .find_conflicts("Срок 1 год, франшиза 10 %", Some("RESO"), Some("KASKO"), None, &store)
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_category_missing_on_one_side_conflicts() {
        let store = MockStore {
            documents: vec![doc("КАСКО", "Скидка 15%")],
        };
        let conflicts = ConflictResolver::new()
            .find_conflicts("Стоимость 1000 руб", Some("RESO"), Some("KASKO"), None, &store)
            .unwrap();

        assert_eq!(conflicts.len(), 2);
        let price = conflicts
            .iter()
            .find(|c| c.conflict_type == ConflictType::PriceDifference)
            .unwrap();
        assert_eq!(price.new_value, "1000руб");
        assert_eq!(price.old_value, "");
        let condition = conflicts
            .iter()
            .find(|c| c.conflict_type == ConflictType::ConditionMismatch)
            .unwrap();
        assert_eq!(condition.new_value, "");
        assert_eq!(condition.old_value, "15%");
    }

    #[test]
    fn test_compare_facts_one_sided_price() {
        let diffs = compare_facts(
            &ExtractedFacts::extract("Стоимость 1000 руб"),
            &ExtractedFacts::extract("Скидка 15%"),
        );
        let price = diffs
            .iter()
            .find(|d| d.conflict_type == ConflictType::PriceDifference)
            .unwrap();
        assert_eq!(price.only_new, vec!["1000руб"]);
        assert!(price.only_old.is_empty());
    }

    #[test]
    fn test_values_capped_at_three() {
        let new = ExtractedFacts {
            prices: ["1руб", "2руб", "3руб", "4руб"].iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let old = ExtractedFacts {
            prices: vec!["9руб".to_string()],
            ..Default::default()
        };
        let diff = compare_facts(&new, &old);
        assert_eq!(diff.len(), 1);
        assert_eq!(join_first(&diff[0].only_new), "1руб, 2руб, 3руб");
    }

    #[test]
    fn test_excluded_document_is_skipped() {
        let old = doc("КАСКО", "Стоимость 30000 руб");
        let store = MockStore { documents: vec![old.clone()] };
        let conflicts = ConflictResolver::new()
            .find_conflicts("Стоимость 35000 руб", Some("RESO"), Some("KASKO"), Some(old.id), &store)
            .unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_empty_corpus_yields_no_conflicts() {
        let store = MockStore { documents: vec![] };
        let conflicts = ConflictResolver::new()
            .find_conflicts("Стоимость 35000 руб", None, None, None, &store)
            .unwrap();
        assert!(conflicts.is_empty());
    }
}
