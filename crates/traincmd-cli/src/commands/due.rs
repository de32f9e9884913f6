//! Due command
//!
//! Usage: traincmd due --epoch <N> --iteration <N>

use super::{summarize, CliResult};
use clap::Args;
use traincmd_core::ProgressSnapshot;
use traincmd_store::{CommandStore, StoreConfig};

#[derive(Debug, Args)]
pub struct DueArgs {
    #[arg(long)]
    pub epoch: u64,

    #[arg(long)]
    pub iteration: u64,
}

pub fn execute(args: DueArgs, config: StoreConfig) -> CliResult {
    let progress = ProgressSnapshot::at(args.epoch, args.iteration);
    let records = CommandStore::new(config).load();

    let due: Vec<_> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| record.is_due(&progress))
        .collect();

    if due.is_empty() {
        println!("Nothing due at {}", progress);
        return Ok(());
    }
    for (index, record) in due {
        println!("{}", summarize(index, record));
    }
    Ok(())
}
