//! Text and JSON import commands
//!
//! Usage: qbank import-text <PATH>
//!        qbank import-json <PATH>
//!        qbank convert <PATH> [--output <PATH>]

use super::{print_bulk_report, print_progress};
use crate::config::GlobalArgs;
use clap::Args;
use qbank_core::parse::parse_block_report;
use qbank_core::service::interchange::records_to_json;
use qbank_core::{RecordService, SqliteRecordRepository};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportTextArgs {
    /// Text file with one question per line (`-` reads stdin)
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportJsonArgs {
    /// JSON file: `[{"questionNo", "type", "content"}]`
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Text file with one question per line (`-` reads stdin)
    pub path: PathBuf,

    /// Write JSON here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

fn read_input(path: &PathBuf) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
}

/// Execute import-text
pub fn execute_text(
    args: ImportTextArgs,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(&args.path)?;
    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    let report = service.import_block(&text, print_progress);
    for rejected in &report.rejected_lines {
        println!("? {}", rejected);
    }
    print_bulk_report(&report.bulk);
    if report.bulk.total() == 0 {
        return Err("no valid questions found".into());
    }
    Ok(())
}

/// Execute import-json
pub fn execute_json(
    args: ImportJsonArgs,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = read_input(&args.path)?;
    let conn = global.open_store()?;
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn)?);

    let report = service.import_json(&json, print_progress)?;
    print_bulk_report(&report);
    Ok(())
}

/// Execute convert
pub fn execute_convert(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(&args.path)?;
    let parsed = parse_block_report(&text);
    for rejected in &parsed.rejected {
        eprintln!("? {}", rejected);
    }
    if parsed.records.is_empty() {
        return Err("no valid questions found".into());
    }

    let json = records_to_json(&parsed.records)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "✓ Converted {} questions to {}",
                parsed.records.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
