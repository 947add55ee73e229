//! Review command implementation.

use crate::cli::ReviewArgs;
use crate::commands::parse_id;
use crate::config::CuratorConfig;
use crate::error::Result;
use crate::output::Formatter;
use curator_gatekeeper::{Gatekeeper, UploadCandidate};
use curator_store::SqliteStore;
use std::fs;

/// Execute the review command.
pub fn execute_review(
    args: ReviewArgs,
    store: &SqliteStore,
    config: &CuratorConfig,
    formatter: &Formatter,
) -> Result<()> {
    let replaces = args.replaces.as_deref().map(parse_id).transpose()?;
    let content = fs::read_to_string(&args.document.file)?;

    let candidate = UploadCandidate {
        title: args.document.title,
        content,
        company_code: args.document.company,
        product_code: args.document.product,
        replaces,
    };

    let gatekeeper = Gatekeeper::new(config.gatekeeper.clone())?;
    let review = gatekeeper.review_upload(&candidate, store)?;
    println!("{}", formatter.format_review(&review)?);

    Ok(())
}
