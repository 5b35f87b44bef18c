//! Search command
//!
//! Usage: qbank search --category <TAG> <NUMBERS> [--export <DIR>]

use crate::config::GlobalArgs;
use clap::Args;
use qbank_core::{write_view, Category, ExportView, RecordService, SqliteRecordRepository};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Category to search in
    #[arg(long, short)]
    pub category: Category,

    /// Comma-separated question numbers, e.g. `1, 12, 418`
    pub numbers: String,

    /// Write the found questions as CSV into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Execute search
pub fn execute(args: SearchArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    let result = service.search_identifiers(&args.numbers, args.category)?;
    if result.total() == 0 {
        return Err("Please enter valid numbers".into());
    }

    println!("Found {}:", result.found.len());
    for record in &result.found {
        println!("  {}\t{}", record.identifier, record.content);
    }
    println!("Missing {}:", result.missing.len());
    for identifier in &result.missing {
        println!("  {}", identifier);
    }

    if let Some(dir) = args.export {
        let path = write_view(&dir, ExportView::SearchResults(Some(args.category)), &result.found)?;
        println!("✓ Exported {} rows to {}", result.found.len(), path.display());
    }
    Ok(())
}
