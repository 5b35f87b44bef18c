//! Edit and delete commands
//!
//! Usage: qbank edit <ID> --version <N> [--number <NUMBER>] [--content <TEXT>]
//!        qbank delete <ID>

use super::print_record;
use crate::config::GlobalArgs;
use clap::Args;
use qbank_core::{RecordId, RecordService, SqliteRecordRepository};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Record id (as shown by `list`)
    pub id: RecordId,

    /// Version the edit is based on (as shown by `list`)
    #[arg(long)]
    pub version: i64,

    /// New question number, completed within the record's category
    #[arg(long, short)]
    pub number: Option<String>,

    /// New question text
    #[arg(long, short)]
    pub content: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Record id (as shown by `list`)
    pub id: RecordId,
}

/// Execute edit
pub fn execute(args: EditArgs, global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.number.is_none() && args.content.is_none() {
        return Err("nothing to change; pass --number and/or --content".into());
    }

    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    let record = service.edit_record(
        args.id,
        args.number.as_deref(),
        args.content.as_deref(),
        args.version,
    )?;
    println!("✓ Updated");
    print_record(&record);
    Ok(())
}

/// Execute delete
pub fn execute_delete(
    args: DeleteArgs,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    service.delete_record(args.id)?;
    println!("✓ Deleted {}", args.id);
    Ok(())
}
