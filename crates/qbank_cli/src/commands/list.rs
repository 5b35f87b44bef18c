//! Catalog listing and export commands
//!
//! Usage: qbank list [--category <TAG>] [--search <TERM>] [--export <DIR>]
//!        qbank export [--category <TAG>] [--search <TERM>] [--dir <DIR>]

use super::print_record;
use crate::config::GlobalArgs;
use clap::Args;
use qbank_core::{
    write_view, Category, ExportView, Record, RecordListQuery, RecordService,
    SqliteRecordRepository,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show one category
    #[arg(long, short)]
    pub category: Option<Category>,

    /// Case-insensitive filter on number or content
    #[arg(long, short)]
    pub search: Option<String>,

    /// Also write the listed rows as CSV into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Only export one category
    #[arg(long, short)]
    pub category: Option<Category>,

    /// Case-insensitive filter on number or content
    #[arg(long, short)]
    pub search: Option<String>,

    /// Output directory
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

fn load(
    global: &GlobalArgs,
    category: Option<Category>,
    search: Option<String>,
) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);
    let query = RecordListQuery {
        category,
        search_term: search,
    };
    Ok(service.list_records(&query)?)
}

fn export_to(
    dir: &Path,
    category: Option<Category>,
    records: &[Record],
) -> Result<(), Box<dyn std::error::Error>> {
    let view = category.map_or(ExportView::AllQuestions, ExportView::Category);
    let path = write_view(dir, view, records)?;
    println!("✓ Exported {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Execute list
pub fn execute(args: ListArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let records = load(global, args.category, args.search)?;
    if records.is_empty() {
        println!("No questions found.");
    }
    for record in &records {
        print_record(record);
    }

    if let Some(dir) = args.export {
        export_to(&dir, args.category, &records)?;
    }
    Ok(())
}

/// Execute export
pub fn execute_export(
    args: ExportArgs,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load(global, args.category, args.search)?;
    export_to(&args.dir, args.category, &records)
}
