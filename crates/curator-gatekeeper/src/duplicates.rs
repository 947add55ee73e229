//! Near-duplicate detection
//!
//! Each corpus document is compared against the candidate with the cheapest
//! check first; the first check that confirms a duplicate decides the
//! reported similarity and reason.

use crate::config::DuplicateThresholds;
use crate::error::GatekeeperError;
use crate::text::{cosine_similarity, edit_similarity, jaccard, size_ratio, title_keywords, title_similarity};
use curator_domain::{CorpusStore, DocumentId, DocumentQuery};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

lazy_static! {
    static ref KEY_PHRASE_PATTERNS: Vec<Regex> = [
        r"(?i)страхов\w*\s+случа\w*[^.;\n]{0,40}",
        r"(?i)страхов\w*\s+сумм\w*[^.;\n]{0,40}",
        r"(?i)страхов\w*\s+преми\w*[^.;\n]{0,40}",
        r"(?i)франшиз\w*[^.;\n]{0,40}",
        r"(?i)срок\w*\s+действи\w*[^.;\n]{0,40}",
        r"(?i)выплат\w*[^.;\n]{0,40}",
        r"(?i)возмещени\w*[^.;\n]{0,40}",
        r"(?i)исключени\w*\s+из\s+\w+[^.;\n]{0,40}",
        r"(?i)территори\w*\s+страховани\w*[^.;\n]{0,40}",
        r"(?i)лимит\w*\s+ответственност\w*[^.;\n]{0,40}",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
}

/// Incoming document to compare against the corpus
#[derive(Debug, Clone, Default)]
pub struct DuplicateQuery {
    /// Candidate title
    pub title: String,

    /// Candidate normalized text
    pub content: String,

    /// Restrict comparison to this company
    pub company_code: Option<String>,

    /// Restrict comparison to this product
    pub product_code: Option<String>,

    /// Never report this document (the candidate itself when re-analyzing)
    pub exclude_id: Option<DocumentId>,
}

/// Which check confirmed a duplicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Title edit similarity alone
    VerySimilarTitle,
    /// Title similarity plus keyword overlap
    SimilarTitleKeywords,
    /// Content cosine similarity alone
    IdenticalContent,
    /// Content similarity plus key-phrase overlap
    SimilarKeyPhrases,
    /// Comparable length and a moderately similar title
    SimilarSizeAndTitle,
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DuplicateReason::VerySimilarTitle => "very similar title",
            DuplicateReason::SimilarTitleKeywords => "similar title keywords",
            DuplicateReason::IdenticalContent => "identical content",
            DuplicateReason::SimilarKeyPhrases => "similar key phrases",
            DuplicateReason::SimilarSizeAndTitle => "similar size and title",
        };
        f.write_str(text)
    }
}

/// A corpus document flagged as a near-duplicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCandidate {
    /// Flagged document
    pub doc_id: DocumentId,

    /// Its title
    pub title: String,

    /// Similarity measured by the deciding check, in [0, 1]
    pub similarity: f64,

    /// Deciding check
    pub reason: DuplicateReason,
}

/// Lexical near-duplicate detector
#[derive(Debug, Clone, Default)]
pub struct DuplicateDetector {
    thresholds: DuplicateThresholds,
}

impl DuplicateDetector {
    /// Create a detector with the given thresholds
    pub fn new(thresholds: DuplicateThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use
    pub fn thresholds(&self) -> &DuplicateThresholds {
        &self.thresholds
    }

    /// Find flagged corpus documents, most similar first
    pub fn find_duplicates<S>(
        &self,
        query: &DuplicateQuery,
        store: &S,
    ) -> Result<Vec<DuplicateCandidate>, GatekeeperError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        let related = DocumentQuery::related(
            query.company_code.as_deref(),
            query.product_code.as_deref(),
            query.exclude_id,
        );
        let documents = store
            .query_documents(&related)
            .map_err(|e| GatekeeperError::Store(e.to_string()))?;

        let mut candidates: Vec<DuplicateCandidate> = documents
            .iter()
            .filter(|doc| Some(doc.id) != query.exclude_id)
            .filter_map(|doc| {
                let content = doc.content();
                self.compare(&query.title, &query.content, &doc.title, &content)
                    .map(|(similarity, reason)| {
                        debug!("Document {} flagged as duplicate ({}, {:.2})", doc.id, reason, similarity);
                        DuplicateCandidate {
                            doc_id: doc.id,
                            title: doc.title.clone(),
                            similarity,
                            reason,
                        }
                    })
            })
            .collect();

        candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(candidates)
    }

    /// Compare two documents; `Some` when they are near-duplicates
    pub fn compare(
        &self,
        title: &str,
        content: &str,
        other_title: &str,
        other_content: &str,
    ) -> Option<(f64, DuplicateReason)> {
        let t = &self.thresholds;

        let title_sim = title_similarity(title, other_title);
        if title_sim > t.very_similar_title {
            return Some((title_sim, DuplicateReason::VerySimilarTitle));
        }
        if title_sim > t.title_keyword_gate {
            let overlap = jaccard(
                &title_keywords(title, t.title_keyword_count),
                &title_keywords(other_title, t.title_keyword_count),
            );
            if overlap > t.title_keyword_jaccard {
                return Some((overlap, DuplicateReason::SimilarTitleKeywords));
            }
        }

        let content_sim = cosine_similarity(content, other_content);
        if content_sim > t.identical_content {
            return Some((content_sim, DuplicateReason::IdenticalContent));
        }
        if content_sim > t.key_phrase_gate {
            let matched = self.key_phrase_overlap(content, other_content);
            if matched > t.key_phrase_fraction {
                return Some((matched, DuplicateReason::SimilarKeyPhrases));
            }
        }

        let ratio = size_ratio(content.chars().count(), other_content.chars().count());
        if ratio > t.size_ratio && title_sim > t.size_title {
            return Some((title_sim, DuplicateReason::SimilarSizeAndTitle));
        }

        None
    }

    /// Fraction of key phrases with a close counterpart on the other side
    fn key_phrase_overlap(&self, a: &str, b: &str) -> f64 {
        let phrases_a = key_phrases(a);
        let phrases_b = key_phrases(b);
        if phrases_a.is_empty() || phrases_b.is_empty() {
            return 0.0;
        }

        let matched = phrases_a
            .iter()
            .filter(|pa| {
                phrases_b
                    .iter()
                    .any(|pb| edit_similarity(pa, pb) > self.thresholds.key_phrase_pair)
            })
            .count();
        matched as f64 / phrases_a.len().max(phrases_b.len()) as f64
    }
}

/// Insurance-specific phrases with their trailing clause, lowercased and deduplicated
pub fn key_phrases(text: &str) -> Vec<String> {
    let mut phrases: Vec<String> = Vec::new();
    for pattern in KEY_PHRASE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let phrase = m.as_str().trim().to_lowercase();
            if !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
    }
    phrases
}
