//! Ingest command implementation.

use crate::cli::DocumentArgs;
use crate::config::CuratorConfig;
use crate::error::Result;
use crate::output::Formatter;
use curator_domain::{CorpusStore, Document};
use curator_extractor::{Chunker, DocumentIngest};
use curator_store::SqliteStore;
use std::fs;

/// Build a document from a text file and its metadata.
pub fn prepare_document(args: DocumentArgs, config: &CuratorConfig) -> Result<Document> {
    let text = fs::read_to_string(&args.file)?;
    let chunker = Chunker::new(config.chunking)?;

    let ingest = DocumentIngest {
        title: args.title,
        text,
        company_code: args.company,
        product_code: args.product,
        source_url: args.source_url,
        file_url: Some(args.file.display().to_string()),
    };
    Ok(ingest.into_document(&chunker)?)
}

/// Execute the ingest command.
pub fn execute_ingest(
    args: DocumentArgs,
    store: &mut SqliteStore,
    config: &CuratorConfig,
    formatter: &Formatter,
) -> Result<()> {
    let document = prepare_document(args, config)?;
    let chunks = document.chunks.len();
    let id = store.insert_document(document)?;

    if formatter.is_json() {
        println!("{}", serde_json::json!({ "id": id.to_string(), "chunks": chunks }));
    } else {
        println!("{}", formatter.success(&format!("Stored document {} ({} chunks)", id, chunks)));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_prepare_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        fs::write(&path, "Полис ОСАГО действует один год.").unwrap();

        let args = DocumentArgs {
            file: path.clone(),
            title: "Правила ОСАГО".to_string(),
            company: Some("SOGAZ".to_string()),
            product: None,
            source_url: None,
        };
        let document = prepare_document(args, &CuratorConfig::default()).unwrap();

        assert_eq!(document.title, "Правила ОСАГО");
        assert_eq!(document.company_code, "SOGAZ");
        assert_eq!(document.product_code, curator_extractor::UNKNOWN_PRODUCT);
        assert_eq!(document.chunks.len(), 1);
        assert_eq!(document.file_url, Some(path.display().to_string()));
    }

    #[test]
    fn test_missing_file() {
        let args = DocumentArgs {
            file: PathBuf::from("/nonexistent/curator/file.txt"),
            title: "x".to_string(),
            company: None,
            product: None,
            source_url: None,
        };
        assert!(matches!(
            prepare_document(args, &CuratorConfig::default()),
            Err(crate::error::CliError::Io(_))
        ));
    }
}
