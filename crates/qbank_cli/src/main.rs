//! qbank CLI
//!
//! Operator commands over the question bank store.

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "qbank")]
#[command(about = "Question bank - store, reconcile and export practice questions", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: config::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add one question
    Add(commands::add::AddArgs),
    /// Add the same content under several question numbers
    AddMany(commands::add::AddManyArgs),
    /// Import a pasted text block (one `#N TAG content` per line)
    ImportText(commands::import::ImportTextArgs),
    /// Import a JSON array of questions
    ImportJson(commands::import::ImportJsonArgs),
    /// Convert a text block to JSON without touching the store
    Convert(commands::import::ConvertArgs),
    /// List stored questions
    List(commands::list::ListArgs),
    /// Check which question numbers exist in a category
    Search(commands::search::SearchArgs),
    /// Edit a stored question
    Edit(commands::edit::EditArgs),
    /// Delete a stored question
    Delete(commands::edit::DeleteArgs),
    /// Export questions to CSV
    Export(commands::list::ExportArgs),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::AddMany(_) => "add-many",
            Self::ImportText(_) => "import-text",
            Self::ImportJson(_) => "import-json",
            Self::Convert(_) => "convert",
            Self::List(_) => "list",
            Self::Search(_) => "search",
            Self::Edit(_) => "edit",
            Self::Delete(_) => "delete",
            Self::Export(_) => "export",
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.global.init_logging() {
        eprintln!("Warning: logging disabled: {}", e);
    }
    let command = cli.command.name();

    let result = match cli.command {
        Commands::Add(args) => commands::add::execute(args, &cli.global),
        Commands::AddMany(args) => commands::add::execute_many(args, &cli.global),
        Commands::ImportText(args) => commands::import::execute_text(args, &cli.global),
        Commands::ImportJson(args) => commands::import::execute_json(args, &cli.global),
        Commands::Convert(args) => commands::import::execute_convert(args),
        Commands::List(args) => commands::list::execute(args, &cli.global),
        Commands::Search(args) => commands::search::execute(args, &cli.global),
        Commands::Edit(args) => commands::edit::execute(args, &cli.global),
        Commands::Delete(args) => commands::edit::execute_delete(args, &cli.global),
        Commands::Export(args) => commands::list::execute_export(args, &cli.global),
    };

    if let Err(e) = result {
        log::error!("event=cli_command module=cli status=error command={command} error={e}");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    log::info!("event=cli_command module=cli status=ok command={command}");
}
