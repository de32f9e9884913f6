//! Progress snapshot supplied by the host training loop
//!
//! The command core never tracks progress itself. Every scheduling decision
//! and every recorded response reads from a snapshot handed in by the caller.

use serde::{Deserialize, Serialize};

/// Where the training process currently stands
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Completed epochs, non-decreasing within a run
    pub epoch: u64,
    /// Completed iterations, non-decreasing within a run
    pub iteration: u64,
    /// Seconds since the run started
    pub elapsed_time: f64,
}

impl ProgressSnapshot {
    pub fn new(epoch: u64, iteration: u64, elapsed_time: f64) -> Self {
        Self {
            epoch,
            iteration,
            elapsed_time,
        }
    }

    /// Snapshot at the given counters with no elapsed time
    pub fn at(epoch: u64, iteration: u64) -> Self {
        Self::new(epoch, iteration, 0.0)
    }
}

impl std::fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "epoch={} iteration={} elapsed={:.3}s",
            self.epoch, self.iteration, self.elapsed_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_has_zero_elapsed() {
        let snap = ProgressSnapshot::at(3, 100);
        assert_eq!(snap.epoch, 3);
        assert_eq!(snap.iteration, 100);
        assert_eq!(snap.elapsed_time, 0.0);
    }

    #[test]
    fn test_serde_field_names() {
        let snap = ProgressSnapshot::new(1, 2, 0.5);
        let json = serde_json::to_value(snap).unwrap();
        assert_eq!(json["epoch"], 1);
        assert_eq!(json["iteration"], 2);
        assert_eq!(json["elapsed_time"], 0.5);
    }

    #[test]
    fn test_display() {
        let snap = ProgressSnapshot::new(2, 40, 1.25);
        assert_eq!(snap.to_string(), "epoch=2 iteration=40 elapsed=1.250s");
    }
}
