pub mod add;
pub mod due;
pub mod list;

use clap::Args;
use std::path::PathBuf;
use traincmd_core::{CommandRecord, Schedule};
use traincmd_store::StoreConfig;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Location of the backing file, shared by all subcommands
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Result directory holding the command file
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Command file name inside the result directory
    #[arg(long, global = true)]
    pub file: Option<String>,

    /// TOML file with `directory` / `file_name` settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl StoreArgs {
    /// Flags override the config file, which overrides the defaults
    pub fn resolve(&self) -> Result<StoreConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => StoreConfig::default(),
        };
        if let Some(dir) = &self.dir {
            config = config.with_directory(dir);
        }
        if let Some(file) = &self.file {
            config = config.with_file_name(file);
        }
        config.validate()?;
        Ok(config)
    }
}

/// One-line summary of a record
pub fn summarize(index: usize, record: &CommandRecord) -> String {
    let name = record.name().unwrap_or("<unnamed>");
    let state = if record.is_executed() {
        "executed"
    } else {
        "pending"
    };
    let schedule = match record.schedule() {
        Some(schedule) => schedule.to_string(),
        None => "no request".to_string(),
    };
    let body = record
        .request_body()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut line = format!("#{index} {name} [{state}] at {schedule} body={body}");
    if let Some(response) = record.response() {
        if let Some(status) = response.get("status") {
            line.push_str(&format!(" status={status}"));
        }
    }
    if record.schedule() == Some(Schedule::Invalid) {
        line.push_str(" (never fires)");
    }
    line
}
