//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::commands::parse_id;
use crate::config::CuratorConfig;
use crate::error::Result;
use crate::output::Formatter;
use curator_domain::DocumentId;
use curator_janitor::{BatchFilter, DocumentAnalyzer};
use curator_store::SqliteStore;
use tokio::task::JoinHandle;
use tracing::warn;

impl From<&AnalyzeArgs> for BatchFilter {
    fn from(args: &AnalyzeArgs) -> Self {
        BatchFilter {
            company_code: args.company.clone(),
            approved: args.approved,
            include_obsolete: args.include_obsolete,
            limit: args.limit,
        }
    }
}

/// Execute the analyze command.
///
/// With an id, prints one analysis. Without, runs a batch over the filtered
/// corpus and streams its progress to stderr while it runs.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    store: &SqliteStore,
    config: &CuratorConfig,
    formatter: &Formatter,
) -> Result<()> {
    let analyzer = DocumentAnalyzer::new(config.analyzer_config())?;

    if let Some(id) = &args.id {
        let analysis = analyzer.analyze_by_id(parse_id(id)?, store)?;
        println!("{}", formatter.format_analysis(&analysis)?);
        return Ok(());
    }

    let progress_id = format!("cli-{}", DocumentId::new());
    let mut events = analyzer.progress().subscribe(&progress_id);
    let printer = formatter.clone();
    let listener = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            eprintln!("{}", printer.format_progress(&event));
        }
    });

    let result = analyzer
        .analyze_all_documents_with_progress(&progress_id, &BatchFilter::from(&args), store)
        .await;

    // the channel closes after the configured delay
    join_printer(listener).await;

    let report = result?;
    println!("{}", formatter.format_report(&report)?);

    Ok(())
}

/// Wait for the progress printer; a failed printer never fails the batch
async fn join_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            warn!("Progress printer stopped abnormally: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicked_printer_is_reported() {
        let printer = tokio::spawn(async { panic!("broken pipe") });
        assert!(!join_printer(printer).await);
        assert!(join_printer(tokio::spawn(async {})).await);
    }

    #[test]
    fn test_filter_from_args() {
        let args = AnalyzeArgs {
            id: None,
            company: Some("RESO".to_string()),
            approved: Some(false),
            include_obsolete: true,
            limit: Some(3),
        };
        let filter = BatchFilter::from(&args);
        assert_eq!(filter.company_code.as_deref(), Some("RESO"));
        assert_eq!(filter.approved, Some(false));
        assert!(filter.include_obsolete);
        assert_eq!(filter.limit, Some(3));
    }
}
