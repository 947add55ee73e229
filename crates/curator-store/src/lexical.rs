//! Keyword relevance scoring for chunk retrieval
//!
//! Used when no semantic index is available. Scores are in [0, 1].

use curator_domain::DocumentId;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Query terms shorter than this are ignored
const MIN_TERM_CHARS: usize = 3;

const BODY_EXACT: f64 = 2.0;
const TITLE_EXACT: f64 = 6.0;
const BODY_PARTIAL: f64 = 0.5;
const TITLE_PARTIAL: f64 = 1.5;
const BODY_PHRASE: f64 = 15.0;
const TITLE_PHRASE: f64 = 50.0;

/// Raw score that maps to 1.0
const NORMALIZER: f64 = 10.0;

/// A chunk matched by a search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredChunk {
    /// Owning document
    pub doc_id: DocumentId,

    /// Owning document's title
    pub title: String,

    /// Position of the chunk in its document
    pub chunk_idx: usize,

    /// Chunk text
    pub text: String,

    /// Relevance in [0, 1]
    pub score: f64,
}

struct Term {
    text: String,
    exact: Regex,
}

/// Scores chunks against one query
///
/// # Examples
///
/// ```
/// use curator_store::SearchScorer;
///
/// let scorer = SearchScorer::new("ОСАГО тарифы");
/// let with_title = scorer.score("Правила ОСАГО", "полис осаго");
/// let without = scorer.score("Правила", "полис осаго");
/// assert!(with_title > without);
/// ```
pub struct SearchScorer {
    phrase: String,
    terms: Vec<Term>,
}

impl SearchScorer {
    /// Prepare a query
    pub fn new(query: &str) -> Self {
        let phrase = query.trim().to_lowercase();
        let mut terms: Vec<Term> = Vec::new();

        for word in phrase.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.chars().count() < MIN_TERM_CHARS || terms.iter().any(|t| t.text == word) {
                continue;
            }
            // escaped input always compiles
            if let Ok(exact) = Regex::new(&format!(r"\b{}\b", regex::escape(word))) {
                terms.push(Term {
                    text: word.to_string(),
                    exact,
                });
            }
        }

        Self { phrase, terms }
    }

    /// Whether the query has nothing to match on
    pub fn is_empty(&self) -> bool {
        self.phrase.is_empty()
    }

    /// Unnormalized score
    pub fn raw_score(&self, title: &str, text: &str) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let title = title.to_lowercase();
        let text = text.to_lowercase();

        let mut score = 0.0;
        for term in &self.terms {
            let (exact, partial) = Self::count(term, &text);
            score += exact as f64 * BODY_EXACT + partial as f64 * BODY_PARTIAL;

            let (exact, partial) = Self::count(term, &title);
            score += exact as f64 * TITLE_EXACT + partial as f64 * TITLE_PARTIAL;
        }

        if text.contains(&self.phrase) {
            score += BODY_PHRASE;
        }
        if title.contains(&self.phrase) {
            score += TITLE_PHRASE;
        }
        score
    }

    /// Score in [0, 1]
    pub fn score(&self, title: &str, text: &str) -> f64 {
        (self.raw_score(title, text) / NORMALIZER).min(1.0)
    }

    /// Score every candidate, drop non-matches, best first, at most `limit`
    ///
    /// Incoming `score` values are overwritten.
    pub fn rank<I>(&self, candidates: I, limit: usize) -> Vec<ScoredChunk>
    where
        I: IntoIterator<Item = ScoredChunk>,
    {
        let mut hits: Vec<ScoredChunk> = candidates
            .into_iter()
            .filter_map(|mut chunk| {
                chunk.score = self.score(&chunk.title, &chunk.text);
                (chunk.score > 0.0).then_some(chunk)
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(limit);
        hits
    }

    /// (whole-word matches, substring-only matches)
    fn count(term: &Term, haystack: &str) -> (usize, usize) {
        let exact = term.exact.find_iter(haystack).count();
        let all = haystack.matches(term.text.as_str()).count();
        (exact, all.saturating_sub(exact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chunk(title: &str, text: &str) -> ScoredChunk {
        ScoredChunk {
            doc_id: DocumentId::new(),
            title: title.to_string(),
            chunk_idx: 0,
            text: text.to_string(),
            score: 0.0,
        }
    }

    #[test]
    fn test_short_terms_ignored() {
        let scorer = SearchScorer::new("в на ОСАГО");
        assert_eq!(scorer.terms.len(), 1);
        assert_eq!(scorer.terms[0].text, "осаго");
    }

    #[test]
    fn test_exact_body_match() {
        let scorer = SearchScorer::new("полис тарифы");
        // one exact "полис", no phrase
        assert_eq!(scorer.raw_score("", "Полис выдан"), 2.0);
        assert!((scorer.score("", "Полис выдан") - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_partial_match_weighs_less() {
        let scorer = SearchScorer::new("полис тарифы");
        // "полисы" contains "полис" but not as a whole word
        assert_eq!(scorer.raw_score("", "полисы выданы"), 0.5);
        assert_eq!(scorer.raw_score("полисы", ""), 1.5);
    }

    #[test]
    fn test_title_and_phrase_bonus() {
        let scorer = SearchScorer::new("осаго");
        assert_eq!(scorer.raw_score("", "осаго"), 2.0 + 15.0);
        assert_eq!(scorer.raw_score("осаго", ""), 6.0 + 50.0);
    }

    #[test]
    fn test_title_mention_scores_higher() {
        let scorer = SearchScorer::new("ОСАГО тарифы");
        let with_title = scorer.score("Правила ОСАГО", "Полис ОСАГО");
        let without = scorer.score("Правила", "Полис ОСАГО");
        assert!(with_title > without);
    }

    #[test]
    fn test_single_term_title_bonus() {
        let scorer = SearchScorer::new("ОСАГО");
        let with_title = scorer.score("Правила ОСАГО", "Условия страхования");
        let without = scorer.score("Правила", "Условия страхования");
        assert_eq!(with_title, 1.0);
        assert_eq!(without, 0.0);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let scorer = SearchScorer::new("   ");
        assert!(scorer.is_empty());
        assert_eq!(scorer.score("ОСАГО", "ОСАГО"), 0.0);
        assert!(scorer.rank(vec![chunk("ОСАГО", "ОСАГО")], 10).is_empty());
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let scorer = SearchScorer::new("каско франшиза");
        let hits = scorer.rank(
            vec![
                chunk("Ипотека", "ничего общего"),
                chunk("Прочее", "каско"),
                chunk("КАСКО", "франшиза по каско"),
                chunk("Прочее", "франшиза"),
            ],
            2,
        );

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "КАСКО");
        assert!(hits[0].score >= hits[1].score);
        assert!(hits.iter().all(|h| h.score > 0.0));
    }

    proptest! {
        #[test]
        fn test_score_bounds(query in "[a-zа-я ]{0,20}", title in "[a-zа-я ]{0,30}", text in "[a-zа-я ]{0,80}") {
            let score = SearchScorer::new(&query).score(&title, &text);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
