use std::{collections::HashMap, fmt};

use super::column::ColumnBits;

pub use self::{line_clear::*, placement::*};

mod line_clear;
mod placement;

/// Number of columns in every grid.
pub const GRID_WIDTH: usize = 10;

/// Occupancy state of one simulation.
///
/// Three structures are kept mutually consistent after every public operation:
///
/// - **Column store**: one [`ColumnBits`] per column
/// - **Column heights**: `heights[c]` is one past the highest occupied row of column `c`, or 0
/// - **Row counts**: sparse map from row index to the number of occupied cells in that row;
///   rows without blocks have no entry
///
/// Heights and row counts are updated incrementally from the cells an operation touches, so no
/// operation scans the whole grid. Rows are numbered from the floor (row 0) upward.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Grid, ShapeKind};
///
/// let mut grid = Grid::new();
/// let placement = grid.drop_shape(ShapeKind::L, 0).unwrap();
/// assert_eq!(placement.landing_row(), 0);
/// assert_eq!(grid.column_heights()[..3], [3, 1, 0]);
///
/// let placement = grid.drop_shape(ShapeKind::I, 0).unwrap();
/// assert_eq!(placement.landing_row(), 3);
/// assert_eq!(grid.height(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    columns: [ColumnBits; GRID_WIDTH],
    heights: [usize; GRID_WIDTH],
    row_counts: HashMap<usize, usize>,
}

impl Grid {
    pub const WIDTH: usize = GRID_WIDTH;

    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack height: one past the highest occupied row, or 0 if the grid is empty.
    #[must_use]
    pub fn height(&self) -> usize {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn column_height(&self, column: usize) -> usize {
        self.heights[column]
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize; GRID_WIDTH] {
        &self.heights
    }

    /// Number of occupied cells in `row`.
    #[must_use]
    pub fn row_count(&self, row: usize) -> usize {
        self.row_counts.get(&row).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row_count(row) == GRID_WIDTH
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, column: usize) -> bool {
        self.columns[column].is_occupied(row)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.iter().all(|&height| height == 0)
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn occupied_cells(&self) -> usize {
        self.row_counts.values().sum()
    }

    /// Recomputes the stack height by scanning every occupied cell.
    ///
    /// Slow; intended as an oracle for [`Self::height`].
    #[must_use]
    pub fn naive_height(&self) -> usize {
        self.columns
            .iter()
            .flat_map(|column| column.occupied_rows().map(|row| row + 1))
            .max()
            .unwrap_or(0)
    }

    /// Occupies a single cell and updates the height and row count bookkeeping.
    ///
    /// The cell must be empty.
    fn occupy_cell(&mut self, row: usize, column: usize) {
        let newly_occupied = self.columns[column].occupy(row);
        debug_assert!(newly_occupied, "cell ({row}, {column}) already occupied");
        let height = &mut self.heights[column];
        *height = (*height).max(row + 1);
        *self.row_counts.entry(row).or_default() += 1;
    }

    /// Creates a `Grid` from ASCII art, for tests and demos.
    ///
    /// '#' is an occupied cell and '.' an empty one; any other character, such as the `|`
    /// side walls printed by [`fmt::Display`], is ignored. Each non-blank line must hold
    /// exactly [`GRID_WIDTH`] cells; the first line is the highest row and the last line is
    /// row 0. Full rows in the art are kept as they are.
    ///
    /// # Example
    ///
    /// ```
    /// use stackfall_engine::Grid;
    ///
    /// let grid = Grid::from_ascii(
    ///     r"
    ///     |#.........|
    ///     |##...#####|
    ///     ",
    /// );
    /// assert_eq!(grid.height(), 2);
    /// assert_eq!(grid.row_count(0), 7);
    /// assert!(grid.is_occupied(1, 0));
    /// ```
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut grid = Self::new();
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();

        for (row, line) in lines.iter().rev().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                GRID_WIDTH,
                "Each row must have exactly {GRID_WIDTH} cells, got {} at row {row}",
                cells.len(),
            );
            for (column, &cell) in cells.iter().enumerate() {
                if cell == '#' {
                    grid.occupy_cell(row, column);
                }
            }
        }
        grid
    }

    /// Checks heights and row counts against a full recomputation from the column store.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut row_counts = HashMap::new();
        for (column, bits) in self.columns.iter().enumerate() {
            let expected = bits.occupied_rows().last().map_or(0, |row| row + 1);
            assert_eq!(self.heights[column], expected, "height of column {column}");
            assert_eq!(bits.is_empty(), expected == 0, "emptiness of column {column}");
            assert_eq!(bits.len(), bits.occupied_rows().count(), "cells of column {column}");
            for row in bits.occupied_rows() {
                *row_counts.entry(row).or_insert(0) += 1;
            }
        }
        assert_eq!(self.row_counts, row_counts, "row counts");
        assert_eq!(
            self.columns.iter().map(ColumnBits::len).sum::<usize>(),
            self.occupied_cells()
        );
        assert_eq!(self.height(), self.naive_height());
    }
}

/// Renders the grid top-down between side walls, with the floor as the last line.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.height()).rev() {
            f.write_str("|")?;
            for column in &self.columns {
                f.write_str(if column.is_occupied(row) { "#" } else { "." })?;
            }
            writeln!(f, "| {row}")?;
        }
        writeln!(f, "+{}+", "-".repeat(GRID_WIDTH))
    }
}
