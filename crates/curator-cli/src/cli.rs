//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Curator CLI - Keep an insurance knowledge base clean.
#[derive(Debug, Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the config)
    #[arg(long, global = true, env = "CURATOR_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chunk a text file and add it to the corpus
    Ingest(DocumentArgs),

    /// Check a text file against the corpus without storing it
    Review(ReviewArgs),

    /// Score one document, or the whole corpus with live progress
    Analyze(AnalyzeArgs),

    /// Keyword search over stored chunks
    Search(SearchArgs),

    /// Approve a document for serving
    Approve(ApproveArgs),

    /// Mark a document obsolete
    Obsolete(ObsoleteArgs),
}

/// A text file plus the metadata uploaded with it.
#[derive(Debug, Parser)]
pub struct DocumentArgs {
    /// Plain-text file with the extracted document text
    pub file: PathBuf,

    /// Document title
    #[arg(short, long)]
    pub title: String,

    /// Carrier code (e.g. SOGAZ)
    #[arg(long)]
    pub company: Option<String>,

    /// Product code (e.g. OSAGO)
    #[arg(long)]
    pub product: Option<String>,

    /// Page the text was scraped from
    #[arg(long)]
    pub source_url: Option<String>,
}

/// Arguments for the review command.
#[derive(Debug, Parser)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Id of the stored document this upload is meant to replace
    #[arg(long)]
    pub replaces: Option<String>,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Analyze only this document
    pub id: Option<String>,

    /// Only documents of this carrier
    #[arg(long)]
    pub company: Option<String>,

    /// Only approved (true) or unapproved (false) documents
    #[arg(long)]
    pub approved: Option<bool>,

    /// Include documents marked obsolete
    #[arg(long)]
    pub include_obsolete: bool,

    /// Maximum number of documents
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Search query text
    pub query: String,

    /// Maximum number of results
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Arguments for the approve command.
#[derive(Debug, Parser)]
pub struct ApproveArgs {
    /// Document id
    pub id: String,

    /// Reviewer name
    #[arg(long, env = "USER")]
    pub by: String,

    /// Withdraw the approval instead
    #[arg(long)]
    pub revoke: bool,
}

/// Arguments for the obsolete command.
#[derive(Debug, Parser)]
pub struct ObsoleteArgs {
    /// Document id
    pub id: String,

    /// Reviewer name
    #[arg(long, env = "USER")]
    pub by: String,

    /// Clear the obsolete flag instead
    #[arg(long)]
    pub restore: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_command() {
        let cli = Cli::parse_from([
            "curator",
            "ingest",
            "rules.txt",
            "--title",
            "Правила ОСАГО",
            "--company",
            "SOGAZ",
            "--product",
            "OSAGO",
        ]);
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.file, PathBuf::from("rules.txt"));
                assert_eq!(args.title, "Правила ОСАГО");
                assert_eq!(args.company.as_deref(), Some("SOGAZ"));
            }
            _ => panic!("Expected Ingest command"),
        }
    }

    #[test]
    fn test_analyze_batch_filters() {
        let cli = Cli::parse_from([
            "curator",
            "--format",
            "json",
            "analyze",
            "--company",
            "VSK",
            "--approved",
            "true",
            "--limit",
            "20",
        ]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Analyze(args) => {
                assert!(args.id.is_none());
                assert_eq!(args.approved, Some(true));
                assert_eq!(args.limit, Some(20));
                assert!(!args.include_obsolete);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_review_replaces() {
        let cli = Cli::parse_from(["curator", "review", "new.txt", "-t", "Тарифы", "--replaces", "abc"]);
        match cli.command {
            Command::Review(args) => {
                assert_eq!(args.document.title, "Тарифы");
                assert_eq!(args.replaces.as_deref(), Some("abc"));
            }
            _ => panic!("Expected Review command"),
        }
    }

    #[test]
    fn test_approve_requires_id() {
        assert!(Cli::try_parse_from(["curator", "approve", "--by", "editor"]).is_err());
        let cli = Cli::parse_from(["curator", "obsolete", "some-id", "--by", "editor", "--restore"]);
        assert!(matches!(cli.command, Command::Obsolete(ObsoleteArgs { restore: true, .. })));
    }
}
