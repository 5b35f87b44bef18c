//! Subcommand implementations.

pub mod add;
pub mod edit;
pub mod import;
pub mod list;
pub mod search;

use qbank_core::{BulkProgress, BulkReport, ItemOutcome, Record};

pub(crate) fn print_progress(progress: BulkProgress) {
    eprintln!(
        "[{}/{}] {}%",
        progress.completed,
        progress.total,
        progress.percent()
    );
}

pub(crate) fn print_bulk_report(report: &BulkReport) {
    for item in &report.items {
        match &item.outcome {
            ItemOutcome::Inserted { .. } => println!("✓ {} added", item.identifier),
            ItemOutcome::SkippedDuplicate => {
                println!("- {} already exists in {}", item.identifier, item.category)
            }
            ItemOutcome::Failed { reason } => println!("✗ {}: {}", item.identifier, reason),
        }
    }
    println!("{}", report.summary());
}

pub(crate) fn print_record(record: &Record) {
    let id = record
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}\t{}\tv{}\t{}\t{}",
        record.identifier, record.category, record.version, id, record.content
    );
}
