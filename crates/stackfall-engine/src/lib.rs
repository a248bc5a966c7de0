//! Placement-and-clearing engine for stacking falling pieces on a 10-column grid.
//!
//! The crate is split in two layers:
//!
//! - [`core`] - the Shape Catalog, per-column occupancy bitsets and the [`Grid`] state with
//!   its placement and line-clear operations
//! - [`engine`] - the drop-command codec, the per-record [`Simulation`], the record driver
//!   and a seeded test-case generator
//!
//! # Example
//!
//! ```
//! use stackfall_engine::run_record;
//!
//! assert_eq!(run_record("I0").output(), 1);
//! assert_eq!(run_record("Q0,Q2,Q4,Q6,Q8").output(), 0);
//! assert_eq!(run_record("Q-1").output(), -1);
//! ```

use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// The four ways a record can fail.
///
/// Every failure aborts the current record only and maps to the `-1` output sentinel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    #[display("unknown shape")]
    UnknownShape,
    #[display("invalid command")]
    InvalidCommand,
    #[display("out of bounds")]
    OutOfBounds,
    /// Landing computation produced an overlapping cell.
    ///
    /// This indicates corrupted bookkeeping rather than bad input.
    #[display("collision")]
    Collision,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown shape letter {letter:?}")]
pub struct UnknownShapeError {
    pub letter: char,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandParseError {
    #[display("empty drop command")]
    Empty,
    #[display("unknown shape letter {letter:?} in command {command:?}")]
    UnknownShape { command: String, letter: char },
    #[display("invalid column in command {command:?}: {source}")]
    InvalidCommand {
        command: String,
        source: ParseIntError,
    },
}

impl CommandParseError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownShape { .. } => FailureKind::UnknownShape,
            Self::Empty | Self::InvalidCommand { .. } => FailureKind::InvalidCommand,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("shape {shape} at column {left_column} leaves the grid")]
    OutOfBounds { shape: ShapeKind, left_column: i64 },
    #[display("cell at row {row}, column {column} is already occupied")]
    Collision { row: usize, column: usize },
}

impl PlacementError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::OutOfBounds { .. } => FailureKind::OutOfBounds,
            Self::Collision { .. } => FailureKind::Collision,
        }
    }
}

/// Failure that aborted a record, tagged with the 0-based index of the failing command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SimulationError {
    #[display("command #{index}: {source}")]
    Parse {
        index: usize,
        source: CommandParseError,
    },
    #[display("command #{index}: {source}")]
    Placement {
        index: usize,
        source: PlacementError,
    },
}

impl SimulationError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Parse { source, .. } => source.kind(),
            Self::Placement { source, .. } => source.kind(),
        }
    }

    /// Index of the failing command within its record (empty tokens are not counted).
    #[must_use]
    pub fn command_index(&self) -> usize {
        match self {
            Self::Parse { index, .. } | Self::Placement { index, .. } => *index,
        }
    }
}
