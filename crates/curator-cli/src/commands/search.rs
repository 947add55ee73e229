//! Search command implementation.

use crate::cli::SearchArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use curator_store::SqliteStore;

/// Execute the search command.
pub fn execute_search(args: SearchArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    if args.limit == 0 {
        return Err(CliError::InvalidInput("Limit must be at least 1".to_string()));
    }

    let hits = store.search_chunks(&args.query, args.limit)?;
    println!("{}", formatter.format_hits(&hits)?);

    Ok(())
}
