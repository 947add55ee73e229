//! Tallies for a batch run

use crate::analyzer::{DocumentAnalysis, Recommendation};
use serde::{Deserialize, Serialize};

/// Counts collected while a batch runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Documents analyzed (including failures)
    pub total: usize,

    /// Recommended to keep
    pub keep: usize,

    /// Recommended for review
    pub review: usize,

    /// Recommended for deletion
    pub delete: usize,

    /// Analyses that failed and were degraded
    pub errors: usize,

    /// Documents with near-duplicates
    pub duplicates: usize,

    /// Documents with an expired validity date
    pub outdated: usize,

    /// Mean score over all documents
    pub average_score: f64,

    /// Wall time of the run
    pub runtime_ms: u64,

    #[serde(skip)]
    score_sum: u64,
}

impl BatchSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one analysis
    pub fn record(&mut self, analysis: &DocumentAnalysis, failed: bool) {
        self.total += 1;
        match analysis.recommendation {
            Recommendation::Keep => self.keep += 1,
            Recommendation::Review => self.review += 1,
            Recommendation::Delete => self.delete += 1,
        }
        if failed {
            self.errors += 1;
        }
        if analysis.details.is_duplicate {
            self.duplicates += 1;
        }
        if analysis.details.is_outdated {
            self.outdated += 1;
        }
        self.score_sum += u64::from(analysis.score);
        self.average_score = self.score_sum as f64 / self.total as f64;
    }

    /// One-line status for the completion event
    pub fn headline(&self) -> String {
        format!(
            "Analyzed {} documents: {} keep, {} review, {} delete",
            self.total, self.keep, self.review, self.delete
        )
    }

    /// Multi-line report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Batch Analysis Summary".to_string(),
            "======================".to_string(),
            format!("Documents: {}", self.total),
            format!("Average score: {:.1}", self.average_score),
            format!("Runtime: {}ms", self.runtime_ms),
            String::new(),
            "Recommendations:".to_string(),
            format!("  Keep: {}", self.keep),
            format!("  Review: {}", self.review),
            format!("  Delete: {}", self.delete),
        ];

        if self.duplicates > 0 || self.outdated > 0 {
            lines.push(String::new());
            lines.push("Findings:".to_string());
            lines.push(format!("  Duplicates: {}", self.duplicates));
            lines.push(format!("  Outdated: {}", self.outdated));
        }

        if self.errors > 0 {
            lines.push(String::new());
            lines.push(format!("Errors: {}", self.errors));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisDetails;
    use curator_domain::DocumentId;

    fn analysis(score: u8, recommendation: Recommendation) -> DocumentAnalysis {
        DocumentAnalysis {
            doc_id: DocumentId::new(),
            title: "t".to_string(),
            company_code: "SOGAZ".to_string(),
            product_code: "OSAGO".to_string(),
            score,
            issues: Vec::new(),
            recommendation,
            reason: String::new(),
            details: AnalysisDetails::default(),
        }
    }

    #[test]
    fn test_summary_creation() {
        let summary = BatchSummary::new();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_score, 0.0);
    }

    #[test]
    fn test_record() {
        let mut summary = BatchSummary::new();
        summary.record(&analysis(90, Recommendation::Keep), false);
        summary.record(&analysis(50, Recommendation::Review), false);
        summary.record(&analysis(0, Recommendation::Review), true);

        let mut outdated = analysis(40, Recommendation::Delete);
        outdated.details.is_outdated = true;
        summary.record(&outdated, false);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.keep, 1);
        assert_eq!(summary.review, 2);
        assert_eq!(summary.delete, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.outdated, 1);
        assert_eq!(summary.average_score, 45.0);
    }

    #[test]
    fn test_summary_text() {
        let mut summary = BatchSummary::new();
        summary.record(&analysis(80, Recommendation::Keep), false);
        summary.record(&analysis(0, Recommendation::Review), true);
        summary.runtime_ms = 12;

        let text = summary.summary();
        assert!(text.contains("Documents: 2"));
        assert!(text.contains("Average score: 40.0"));
        assert!(text.contains("Keep: 1"));
        assert!(text.contains("Errors: 1"));
        assert!(!text.contains("Findings:"));
        assert_eq!(summary.headline(), "Analyzed 2 documents: 1 keep, 1 review, 0 delete");
    }
}
