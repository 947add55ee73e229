//! Approve and obsolete command implementations.

use crate::cli::{ApproveArgs, ObsoleteArgs};
use crate::commands::parse_id;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::Utc;
use curator_domain::{CorpusStore, DocumentId, StatusUpdate};
use curator_store::{SqliteStore, StoreError};

fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

fn apply(store: &mut SqliteStore, id: DocumentId, update: StatusUpdate) -> Result<()> {
    match store.update_status(id, update) {
        Err(StoreError::NotFound(id)) => Err(CliError::NotFound(id)),
        other => Ok(other?),
    }
}

/// Execute the approve command.
pub fn execute_approve(args: ApproveArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    let id = parse_id(&args.id)?;

    if args.revoke {
        apply(store, id, StatusUpdate::Unapprove)?;
        println!("{}", formatter.success(&format!("Approval withdrawn: {}", id)));
    } else {
        apply(store, id, StatusUpdate::Approve { by: args.by.clone(), at: now() })?;
        println!("{}", formatter.success(&format!("Document approved by {}: {}", args.by, id)));
    }

    Ok(())
}

/// Execute the obsolete command.
pub fn execute_obsolete(args: ObsoleteArgs, store: &mut SqliteStore, formatter: &Formatter) -> Result<()> {
    let id = parse_id(&args.id)?;

    if args.restore {
        apply(store, id, StatusUpdate::Restore)?;
        println!("{}", formatter.success(&format!("Document restored: {}", id)));
    } else {
        apply(store, id, StatusUpdate::MarkObsolete { by: args.by.clone(), at: now() })?;
        println!("{}", formatter.success(&format!("Document marked obsolete by {}: {}", args.by, id)));
    }

    Ok(())
}
