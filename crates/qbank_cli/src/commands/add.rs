//! Add commands
//!
//! Usage: qbank add <NUMBER> <CONTENT> [--category <TAG>]
//!        qbank add-many <NUMBERS> <CONTENT> [--category <TAG>]

use super::{print_bulk_report, print_progress, print_record};
use crate::config::GlobalArgs;
use clap::Args;
use qbank_core::{Category, RecordService, SqliteRecordRepository};

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Question number, e.g. `12`, `#12 WFD`, `RA012`
    pub number: String,

    /// Question text
    pub content: String,

    /// Category used to complete a bare number
    #[arg(long, short)]
    pub category: Option<Category>,
}

#[derive(Debug, Args)]
pub struct AddManyArgs {
    /// Comma-separated question numbers
    pub numbers: String,

    /// Question text stored under every number
    pub content: String,

    /// Category used to complete bare numbers
    #[arg(long, short)]
    pub category: Option<Category>,
}

/// Execute add
pub fn execute(args: AddArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    let record = service.add_record(&args.number, args.category, &args.content)?;
    println!("✓ Added");
    print_record(&record);
    Ok(())
}

/// Execute add-many
pub fn execute_many(
    args: AddManyArgs,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    let report = service.add_many(&args.numbers, args.category, &args.content, print_progress);
    print_bulk_report(&report);
    if report.total() == 0 {
        return Err("Please enter valid numbers".into());
    }
    Ok(())
}
