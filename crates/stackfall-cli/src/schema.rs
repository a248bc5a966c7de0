use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use stackfall_engine::{FailureKind, RecordReport, SimulationError, SimulationStats};

/// One line of `run --format json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResult {
    /// Line number of the record in the input (0-indexed)
    pub index: usize,
    /// Final stack height, or -1 if the record aborted
    pub height: i64,
    pub failure: Option<FailureInfo>,
    pub stats: SimulationStats,
}

/// Why a record aborted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    pub kind: FailureKind,
    /// Index of the failing command within the record
    pub command_index: usize,
    pub message: String,
}

impl RecordResult {
    pub fn new(index: usize, report: &RecordReport) -> Self {
        Self {
            index,
            height: report.output(),
            failure: report.error().map(FailureInfo::new),
            stats: report.stats().clone(),
        }
    }
}

impl FailureInfo {
    fn new(error: &SimulationError) -> Self {
        Self {
            kind: error.kind(),
            command_index: error.command_index(),
            message: error.to_string(),
        }
    }
}

/// Summary written by `bench --report`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchReport {
    pub files: Vec<BenchEntry>,
    pub total_elapsed_secs: f64,
}

/// Measurements for one input file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchEntry {
    pub name: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub elapsed_secs: f64,
    pub records: usize,
    pub aborted_records: usize,
    pub completed_pieces: usize,
}

#[cfg(test)]
mod tests {
    use stackfall_engine::run_record;

    use super::*;

    #[test]
    fn test_record_result_json() {
        let result = RecordResult::new(3, &run_record("I0,X1"));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["index"], 3);
        assert_eq!(value["height"], -1);
        assert_eq!(value["failure"]["kind"], "unknown_shape");
        assert_eq!(value["failure"]["command_index"], 1);
        assert_eq!(value["stats"]["completed_pieces"], 1);

        let result = RecordResult::new(0, &run_record("I0"));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["height"], 1);
        assert!(value["failure"].is_null());
    }
}
