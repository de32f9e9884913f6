//! traincmd Engine - Orchestration layer
//!
//! Runs the command cycle for a training loop: load the command list,
//! execute what is due at the current progress, record outcomes and
//! persist the list again.

pub mod cycle;
pub mod executor;

pub use cycle::{run_command_cycle, CycleReport};
pub use executor::{CommandExecutor, Execution, ProgressSource};
