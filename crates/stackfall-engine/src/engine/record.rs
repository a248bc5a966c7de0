use crate::SimulationError;

use super::{
    command::parse_record,
    simulation::{Simulation, SimulationEvent},
    simulation_stats::SimulationStats,
};

/// Output value reported for a record that aborted.
pub const ABORTED_OUTPUT: i64 = -1;

/// How a record ended.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum RecordOutcome {
    /// Every command was applied; `height` is the final stack height.
    Completed { height: usize },
    /// A command failed and the rest of the record was skipped.
    Aborted(SimulationError),
}

/// Result of running one record, with the statistics gathered up to its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    outcome: RecordOutcome,
    stats: SimulationStats,
}

impl RecordReport {
    #[must_use]
    pub fn outcome(&self) -> &RecordOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Final height, or `None` if the record aborted.
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        match &self.outcome {
            RecordOutcome::Completed { height } => Some(*height),
            RecordOutcome::Aborted(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&SimulationError> {
        match &self.outcome {
            RecordOutcome::Completed { .. } => None,
            RecordOutcome::Aborted(error) => Some(error),
        }
    }

    /// Value written to the output stream: the final height, or [`ABORTED_OUTPUT`].
    #[must_use]
    pub fn output(&self) -> i64 {
        self.height()
            .and_then(|height| i64::try_from(height).ok())
            .unwrap_or(ABORTED_OUTPUT)
    }
}

/// Runs one input line on a fresh grid.
///
/// Commands are applied strictly in order. The first command that fails to parse or place
/// aborts the record; the failure is kept in the report and no later command is read.
/// A line without commands completes with height 0.
///
/// # Example
///
/// ```
/// use stackfall_engine::{FailureKind, run_record};
///
/// assert_eq!(run_record("T1,Z3,I4").output(), 4);
/// assert_eq!(run_record("").output(), 0);
///
/// let report = run_record("I0,I7,I0");
/// assert_eq!(report.output(), -1);
/// let error = report.error().unwrap();
/// assert_eq!(error.kind(), FailureKind::OutOfBounds);
/// assert_eq!(error.command_index(), 1);
/// assert_eq!(report.stats().completed_pieces(), 1);
/// ```
#[must_use]
pub fn run_record(line: &str) -> RecordReport {
    run_record_observed(line, |_, _| {})
}

/// Like [`run_record`], but passes every simulation event to `observer` together with the
/// index of the command that produced it.
pub fn run_record_observed<F>(line: &str, mut observer: F) -> RecordReport
where
    F: FnMut(usize, SimulationEvent<'_>),
{
    let mut simulation = Simulation::new();
    let outcome = match run_commands(&mut simulation, line, &mut observer) {
        Ok(()) => RecordOutcome::Completed {
            height: simulation.height(),
        },
        Err(error) => RecordOutcome::Aborted(error),
    };
    RecordReport {
        outcome,
        stats: simulation.stats().clone(),
    }
}

fn run_commands<F>(
    simulation: &mut Simulation,
    line: &str,
    observer: &mut F,
) -> Result<(), SimulationError>
where
    F: FnMut(usize, SimulationEvent<'_>),
{
    for (index, command) in parse_record(line).enumerate() {
        let command = command.map_err(|source| SimulationError::Parse { index, source })?;
        simulation
            .apply_observed(command, &mut |event| observer(index, event))
            .map_err(|source| SimulationError::Placement { index, source })?;
    }
    Ok(())
}
