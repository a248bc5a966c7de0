//! Record-level simulation built on top of [`crate::core`].
//!
//! - [`DropCommand`] - one `<ShapeLetter><Column>` token of a record
//! - [`Simulation`] - an isolated grid plus statistics for one record
//! - [`SimulationStats`] - pieces placed, rows cleared and peak height
//! - [`run_record`] - the driver: parses a record, applies every command in order and stops at
//!   the first failure
//! - [`CaseGenerator`] - seeded generator of input records for tests and benchmarks
//!
//! # Record Flow
//!
//! 1. A fresh [`Simulation`] is created for the record
//! 2. Each token is parsed into a [`DropCommand`]
//! 3. The shape is dropped onto the grid, then the rows it touched are checked for clears
//! 4. The first failure of any kind aborts the record, which then reports `-1`
//! 5. Otherwise the record reports the final stack height
//!
//! # Example
//!
//! ```
//! use stackfall_engine::{FailureKind, run_record};
//!
//! let report = run_record("Q0,Q2,Q4,Q6,Q8,I0");
//! assert_eq!(report.output(), 1);
//! assert_eq!(report.stats().total_cleared_rows(), 2);
//!
//! let report = run_record("Q0,X1,Q2");
//! assert_eq!(report.output(), -1);
//! assert_eq!(report.error().map(|e| e.kind()), Some(FailureKind::UnknownShape));
//! ```

pub use self::{case_generator::*, command::*, record::*, simulation::*, simulation_stats::*};

mod case_generator;
mod command;
mod record;
mod simulation;
mod simulation_stats;
