use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{grid::GRID_WIDTH, shape::ShapeKind};

use super::command::DropCommand;

/// Seed for deterministic case generation.
///
/// A 128-bit seed written as 32 lowercase hex digits, both by [`fmt::Display`] and by serde.
///
/// # Example
///
/// ```
/// use stackfall_engine::{CaseGenerator, CaseKind, CaseSeed};
///
/// let seed: CaseSeed = "000000000000000000000000deadbeef".parse().unwrap();
/// assert_eq!(seed.to_string(), "000000000000000000000000deadbeef");
///
/// let a = CaseGenerator::with_seed(seed).generate(CaseKind::Random, Some(100));
/// let b = CaseGenerator::with_seed(seed).generate(CaseKind::Random, Some(100));
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaseSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CaseSeedParseError {
    #[display("invalid seed: expected 32 hex digits, got {len}")]
    Length { len: usize },
    #[display("invalid seed {hex:?}: {source}")]
    Hex {
        hex: String,
        source: std::num::ParseIntError,
    },
}

impl fmt::Display for CaseSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for CaseSeed {
    type Err = CaseSeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(CaseSeedParseError::Length { len: s.len() });
        }
        let num = u128::from_str_radix(s, 16).map_err(|source| CaseSeedParseError::Hex {
            hex: s.to_owned(),
            source,
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for CaseSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CaseSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<CaseSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CaseSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        CaseSeed(seed)
    }
}

/// Families of generated input records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseKind {
    /// A tall stack of I pieces spread over the columns.
    MaxHeight,
    /// Two full layers of Q pieces followed by one I.
    FullRowClear,
    /// Interleaved Q, S, Z, T, L and J pieces that fill and clear rows.
    ComplexRowClear,
    /// Starts with a negative column and aborts immediately.
    OutOfBounds,
    /// Uniform random shapes at in-bounds columns.
    Random,
    /// Rows of I pieces; the third I of each row does not fit.
    MaxWidth,
    /// A long random record.
    Stress,
    /// Even-column Q layers, then odd-column ones ending past the right wall.
    AlternatingClear,
    /// Starts with an unknown shape letter.
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown case kind {name:?}")]
pub struct UnknownCaseKindError {
    pub name: String,
}

impl CaseKind {
    pub const ALL: [Self; 9] = [
        Self::MaxHeight,
        Self::FullRowClear,
        Self::ComplexRowClear,
        Self::OutOfBounds,
        Self::Random,
        Self::MaxWidth,
        Self::Stress,
        Self::AlternatingClear,
        Self::InvalidInput,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MaxHeight => "max-height",
            Self::FullRowClear => "full-row-clear",
            Self::ComplexRowClear => "complex-row-clear",
            Self::OutOfBounds => "out-of-bounds",
            Self::Random => "random",
            Self::MaxWidth => "max-width",
            Self::Stress => "stress",
            Self::AlternatingClear => "alternating-clear",
            Self::InvalidInput => "invalid-input",
        }
    }

    /// File name used when a whole suite is written to a directory.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("test_{}.txt", self.name().replace('-', "_"))
    }

    /// Piece count used when none is given, for kinds whose length is configurable.
    ///
    /// Kinds with a fixed pattern return `None` and ignore any requested count.
    #[must_use]
    pub const fn default_pieces(self) -> Option<usize> {
        match self {
            Self::MaxHeight => Some(250),
            Self::Random => Some(10_000),
            Self::Stress => Some(50_000),
            Self::FullRowClear
            | Self::ComplexRowClear
            | Self::OutOfBounds
            | Self::MaxWidth
            | Self::AlternatingClear
            | Self::InvalidInput => None,
        }
    }
}

impl fmt::Display for CaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaseKind {
    type Err = UnknownCaseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownCaseKindError { name: s.to_owned() })
    }
}

/// Seeded generator of input records.
#[derive(Debug, Clone)]
pub struct CaseGenerator {
    rng: Pcg32,
}

impl CaseGenerator {
    #[must_use]
    pub fn with_seed(seed: CaseSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws a uniform shape and a column that keeps it inside the grid.
    pub fn random_command(&mut self) -> DropCommand {
        let shape: ShapeKind = self.rng.random();
        let max_column = GRID_WIDTH - shape.width();
        let left_column = self.rng.random_range(0..=max_column);
        DropCommand::new(shape, i64::try_from(left_column).unwrap_or_default())
    }

    /// Generates one record line of the given kind, without a trailing newline.
    ///
    /// `num_pieces` overrides [`CaseKind::default_pieces`] for the kinds that have one.
    pub fn generate(&mut self, kind: CaseKind, num_pieces: Option<usize>) -> String {
        let num_pieces = num_pieces.or(kind.default_pieces()).unwrap_or_default();
        let commands = match kind {
            CaseKind::MaxHeight => max_height(num_pieces),
            CaseKind::FullRowClear => full_row_clear(),
            CaseKind::ComplexRowClear => complex_row_clear(),
            CaseKind::OutOfBounds => out_of_bounds(),
            CaseKind::Random | CaseKind::Stress => {
                (0..num_pieces).map(|_| self.random_command()).collect()
            }
            CaseKind::MaxWidth => max_width(),
            CaseKind::AlternatingClear => alternating_clear(),
            CaseKind::InvalidInput => {
                return "X5,Q-2,I11,S5".to_owned();
            }
        };
        join_commands(&commands)
    }
}

fn join_commands(commands: &[DropCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn row_of(shape: ShapeKind, columns: impl IntoIterator<Item = i64>) -> Vec<DropCommand> {
    columns
        .into_iter()
        .map(|column| DropCommand::new(shape, column))
        .collect()
}

fn max_height(num_pieces: usize) -> Vec<DropCommand> {
    // I pieces cycle through every column where they fit.
    let positions = GRID_WIDTH - ShapeKind::I.width() + 1;
    (0..num_pieces)
        .map(|i| DropCommand::new(ShapeKind::I, i64::try_from(i % positions).unwrap_or_default()))
        .collect()
}

fn full_row_clear() -> Vec<DropCommand> {
    let mut commands = row_of(ShapeKind::Q, (0..10).step_by(2));
    commands.extend(row_of(ShapeKind::Q, (0..10).step_by(2)));
    commands.push(DropCommand::new(ShapeKind::I, 0));
    commands
}

fn complex_row_clear() -> Vec<DropCommand> {
    let mut commands = row_of(ShapeKind::Q, (0..10).step_by(2));
    commands.extend(row_of(ShapeKind::S, (1..9).step_by(2)));
    commands.extend([
        DropCommand::new(ShapeKind::Z, 1),
        DropCommand::new(ShapeKind::T, 3),
        DropCommand::new(ShapeKind::L, 5),
        DropCommand::new(ShapeKind::J, 7),
    ]);
    commands
}

fn out_of_bounds() -> Vec<DropCommand> {
    vec![
        DropCommand::new(ShapeKind::Q, -1),
        DropCommand::new(ShapeKind::I, 10),
        DropCommand::new(ShapeKind::T, 9),
    ]
}

fn max_width() -> Vec<DropCommand> {
    (0..5)
        .flat_map(|_| row_of(ShapeKind::I, (0..10).step_by(4)))
        .collect()
}

fn alternating_clear() -> Vec<DropCommand> {
    let even = (0..5).flat_map(|_| row_of(ShapeKind::Q, (0..10).step_by(2)));
    let odd = (0..5).flat_map(|_| row_of(ShapeKind::Q, (1..10).step_by(2)));
    even.chain(odd).collect()
}
