//! Whole-corpus analysis with streamed progress

use crate::analyzer::{DocumentAnalysis, DocumentAnalyzer};
use crate::progress::{ProgressEvent, ProgressStep};
use crate::summary::BatchSummary;
use crate::AnalyzerError;
use chrono::{Local, Utc};
use curator_domain::{CorpusStore, DocumentQuery};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::PoisonError;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Progress reserved for loading
const LOAD_SHARE: usize = 5;

/// Progress spread across documents
const ANALYZE_SHARE: usize = 90;

/// Which documents a batch covers
#[derive(Debug, Clone, Default)]
pub struct BatchFilter {
    /// Only this carrier
    pub company_code: Option<String>,

    /// Only approved (or only unapproved) documents
    pub approved: Option<bool>,

    /// Include documents marked obsolete
    pub include_obsolete: bool,

    /// Stop after this many documents
    pub limit: Option<usize>,
}

impl BatchFilter {
    fn to_query(&self) -> DocumentQuery {
        DocumentQuery {
            company_code: self.company_code.clone(),
            approved: self.approved,
            include_obsolete: self.include_obsolete,
            limit: self.limit,
            ..Default::default()
        }
    }
}

/// Latest batch results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Analyses, lowest score first
    pub analyses: Vec<DocumentAnalysis>,

    /// Tallies
    pub summary: BatchSummary,

    /// Unix seconds
    pub completed_at: u64,
}

/// Progress after `done` of `total` documents, within [5, 95]
fn scaled(done: usize, total: usize) -> u8 {
    if total == 0 {
        return (LOAD_SHARE + ANALYZE_SHARE) as u8;
    }
    (LOAD_SHARE + done * ANALYZE_SHARE / total) as u8
}

impl DocumentAnalyzer {
    /// Analyze every document matching `filter`, reporting to `progress_id`
    ///
    /// Emits one `loading` event, an `analyzing` and an `analyzed` event per
    /// document, then `complete` (or `error` if the corpus cannot be loaded).
    /// A document whose analysis fails is recorded as a degraded analysis and
    /// the run continues. The channel is closed after the configured delay.
    pub async fn analyze_all_documents_with_progress<S>(
        &self,
        progress_id: &str,
        filter: &BatchFilter,
        store: &S,
    ) -> Result<BatchReport, AnalyzerError>
    where
        S: CorpusStore,
        S::Error: std::fmt::Display,
    {
        let started = Instant::now();
        info!("Batch {} started", progress_id);
        self.progress.emit(
            progress_id,
            ProgressEvent::new(ProgressStep::Loading, 0, "Loading documents"),
        );

        let documents = match store.query_documents(&filter.to_query()) {
            Ok(documents) => documents,
            Err(e) => {
                let err = AnalyzerError::Store(e.to_string());
                error!("Batch {} aborted: {}", progress_id, err);
                self.progress.emit(
                    progress_id,
                    ProgressEvent::new(ProgressStep::Error, 0, format!("Failed to load documents: {}", err)),
                );
                self.schedule_close(progress_id);
                return Err(err);
            }
        };

        let total = documents.len();
        let today = Local::now().date_naive();
        let mut summary = BatchSummary::new();
        let mut analyses = Vec::with_capacity(total);

        for (i, document) in documents.iter().enumerate() {
            self.progress.emit(
                progress_id,
                ProgressEvent::new(
                    ProgressStep::Analyzing,
                    scaled(i, total),
                    format!("Analyzing {}/{}: {}", i + 1, total, document.title),
                )
                .with_details(json!({ "docId": document.id.to_string(), "index": i })),
            );

            let (analysis, failed) = match self.analyze_document_at(document, store, today) {
                Ok(analysis) => (analysis, false),
                Err(e) => {
                    warn!("Analysis of {} failed: {}", document.id, e);
                    (DocumentAnalysis::degraded(document, &e), true)
                }
            };
            summary.record(&analysis, failed);

            self.progress.emit(
                progress_id,
                ProgressEvent::new(
                    ProgressStep::Analyzed,
                    scaled(i + 1, total),
                    format!("Analyzed {}/{}: {}", i + 1, total, document.title),
                )
                .with_details(json!({
                    "docId": analysis.doc_id.to_string(),
                    "score": analysis.score,
                    "recommendation": analysis.recommendation,
                })),
            );
            analyses.push(analysis);

            tokio::task::yield_now().await;
        }

        analyses.sort_by_key(|a| a.score);
        summary.runtime_ms = started.elapsed().as_millis() as u64;

        let report = BatchReport {
            analyses,
            summary,
            completed_at: Utc::now().timestamp().max(0) as u64,
        };
        *self
            .last_results
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(report.clone());

        info!("Batch {} finished: {}", progress_id, report.summary.headline());
        self.progress.emit(
            progress_id,
            ProgressEvent::new(ProgressStep::Complete, 100, report.summary.headline())
                .with_details(serde_json::to_value(&report.summary).unwrap_or_default()),
        );
        self.schedule_close(progress_id);

        Ok(report)
    }

    /// Close the run's channel after the configured delay, unless the id
    /// was re-subscribed in the meantime
    fn schedule_close(&self, progress_id: &str) {
        let Some(tx) = self.progress.sender(progress_id) else {
            return;
        };
        let registry = self.progress.clone();
        let progress_id = progress_id.to_string();
        let delay = self.config.batch.close_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if registry.close_if_current(&progress_id, &tx) {
                debug!("Progress channel {} closed", progress_id);
            } else {
                debug!("Progress channel {} re-subscribed, left open", progress_id);
            }
        });
    }
}
