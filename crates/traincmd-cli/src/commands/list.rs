//! List command
//!
//! Usage: traincmd list [--json]

use super::{summarize, CliResult};
use clap::Args;
use traincmd_store::{CommandStore, StoreConfig};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print the raw command list as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ListArgs, config: StoreConfig) -> CliResult {
    let records = CommandStore::new(config).load();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No commands");
        return Ok(());
    }
    for (index, record) in records.iter().enumerate() {
        println!("{}", summarize(index, record));
    }
    Ok(())
}
