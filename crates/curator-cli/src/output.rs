//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use curator_gatekeeper::{SuggestedAction, UploadReview};
use curator_janitor::{BatchReport, DocumentAnalysis, ProgressEvent, Recommendation};
use curator_store::ScoredChunk;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest snippet shown in tables
const SNIPPET_CHARS: usize = 60;

/// Output formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Whether output is machine-readable.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Format a batch report.
    pub fn format_report(&self, report: &BatchReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Self::json(report),
            OutputFormat::Table => {
                let mut out = self.format_analyses_table(&report.analyses);
                out.push_str("\n\n");
                out.push_str(&report.summary.summary());
                Ok(out)
            }
        }
    }

    /// Format a single analysis with its issues.
    pub fn format_analysis(&self, analysis: &DocumentAnalysis) -> Result<String> {
        if self.is_json() {
            return Self::json(analysis);
        }

        let mut lines = vec![
            format!("{} ({})", analysis.title, analysis.doc_id),
            format!("Company: {}  Product: {}", analysis.company_code, analysis.product_code),
            format!(
                "Score: {}  Recommendation: {}",
                analysis.score,
                self.recommendation(analysis.recommendation)
            ),
            format!("Reason: {}", analysis.reason),
        ];
        if analysis.issues.is_empty() {
            lines.push(self.success("No issues"));
        } else {
            lines.push("Issues:".to_string());
            lines.extend(analysis.issues.iter().map(|issue| format!("  - {}", issue)));
        }
        Ok(lines.join("\n"))
    }

    fn format_analyses_table(&self, analyses: &[DocumentAnalysis]) -> String {
        if analyses.is_empty() {
            return self.colorize("No documents analyzed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Title", "Company", "Product", "Score", "Recommendation", "Issues"]);

        for analysis in analyses {
            builder.push_record([
                short_id(&analysis.doc_id.to_string()),
                truncate(&analysis.title, 40),
                analysis.company_code.clone(),
                analysis.product_code.clone(),
                analysis.score.to_string(),
                self.recommendation(analysis.recommendation),
                analysis.issues.len().to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format an upload review.
    pub fn format_review(&self, review: &UploadReview) -> Result<String> {
        if self.is_json() {
            return Self::json(review);
        }

        let action = match review.suggested_action {
            SuggestedAction::Approve => self.success("Suggested action: approve"),
            SuggestedAction::Replace => self.warning("Suggested action: replace the existing document"),
            SuggestedAction::Review => self.warning("Suggested action: review manually"),
        };
        let mut lines = vec![action];

        if !review.duplicates.is_empty() {
            lines.push(String::new());
            lines.push("Possible duplicates:".to_string());
            for dup in &review.duplicates {
                lines.push(format!(
                    "  {} {} ({:.0}%, {})",
                    short_id(&dup.doc_id.to_string()),
                    dup.title,
                    dup.similarity * 100.0,
                    dup.reason
                ));
            }
        }

        if !review.conflicts.is_empty() {
            lines.push(String::new());
            lines.push("Conflicts:".to_string());
            for conflict in &review.conflicts {
                lines.push(format!("  {}: {}", conflict.doc_title, conflict.description));
            }
        }

        let dates = &review.date_validation;
        if !dates.warnings.is_empty() {
            lines.push(String::new());
            lines.extend(dates.warnings.iter().map(|w| self.warning(w)));
        }
        if !dates.recommendations.is_empty() {
            lines.extend(dates.recommendations.iter().map(|r| self.info(r)));
        }

        Ok(lines.join("\n"))
    }

    /// Format search hits.
    pub fn format_hits(&self, hits: &[ScoredChunk]) -> Result<String> {
        if self.is_json() {
            return Self::json(hits);
        }
        if hits.is_empty() {
            return Ok(self.colorize("No matching chunks.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Score", "Document", "Title", "Chunk", "Text"]);
        for hit in hits {
            builder.push_record([
                format!("{:.2}", hit.score),
                short_id(&hit.doc_id.to_string()),
                truncate(&hit.title, 30),
                hit.chunk_idx.to_string(),
                truncate(&hit.text.replace('\n', " "), SNIPPET_CHARS),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        Ok(table.to_string())
    }

    /// One progress line, or the event itself as JSON.
    pub fn format_progress(&self, event: &ProgressEvent) -> String {
        if self.is_json() {
            return serde_json::to_string(event).unwrap_or_default();
        }
        format!("[{:>3}%] {}", event.progress, event.message)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn recommendation(&self, recommendation: Recommendation) -> String {
        match recommendation {
            Recommendation::Keep => self.colorize("keep", "green"),
            Recommendation::Review => self.colorize("review", "yellow"),
            Recommendation::Delete => self.colorize("delete", "red"),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
