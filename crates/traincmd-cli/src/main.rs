//! traincmd CLI
//!
//! Command-line interface for queueing and inspecting deferred training
//! commands in a run's result directory

use clap::{Parser, Subcommand};
use traincmd_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "traincmd")]
#[command(about = "traincmd - Deferred commands for training runs", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: commands::StoreArgs,

    /// Logging profile (quiet, development, production); defaults to quiet
    #[arg(long, global = true)]
    log: Option<Profile>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List all commands with their state
    List(commands::list::ListArgs),
    /// Queue a new pending command
    Add(commands::add::AddArgs),
    /// Show which pending commands are due at a given progress
    Due(commands::due::DueArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(cli.log.unwrap_or(Profile::Quiet));

    let result = cli.store.resolve().and_then(|config| match cli.command {
        Commands::List(args) => commands::list::execute(args, config),
        Commands::Add(args) => commands::add::execute(args, config),
        Commands::Due(args) => commands::due::execute(args, config),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
