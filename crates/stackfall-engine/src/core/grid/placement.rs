use arrayvec::ArrayVec;

use crate::{
    PlacementError,
    core::shape::{MAX_SHAPE_HEIGHT, SHAPE_CELLS, ShapeKind},
};

use super::{GRID_WIDTH, Grid};

/// Distinct rows covered by one placement, in ascending order.
pub type TouchedRows = ArrayVec<usize, MAX_SHAPE_HEIGHT>;

/// A shape committed to the grid at its resting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    shape: ShapeKind,
    left_column: usize,
    landing_row: usize,
    touched_rows: TouchedRows,
}

impl Placement {
    #[must_use]
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    #[must_use]
    pub fn left_column(&self) -> usize {
        self.left_column
    }

    /// Row of the shape's local origin after landing.
    #[must_use]
    pub fn landing_row(&self) -> usize {
        self.landing_row
    }

    /// Rows that received at least one block; the only candidates for a line clear.
    #[must_use]
    pub fn touched_rows(&self) -> &[usize] {
        &self.touched_rows
    }

    /// Iterates the absolute `(row, column)` cells occupied by the shape.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shape
            .offsets()
            .iter()
            .map(|o| (self.landing_row + o.row, self.left_column + o.column))
    }
}

/// Adds a block's column offset to the requested left column, rejecting cells off the grid.
fn absolute_column(left_column: i64, offset: usize) -> Option<usize> {
    let column = left_column.checked_add(i64::try_from(offset).ok()?)?;
    usize::try_from(column).ok().filter(|&c| c < GRID_WIDTH)
}

fn absolute_columns(
    shape: ShapeKind,
    left_column: i64,
) -> Result<[usize; SHAPE_CELLS], PlacementError> {
    let mut columns = [0; SHAPE_CELLS];
    for (column, offset) in columns.iter_mut().zip(shape.offsets()) {
        *column = absolute_column(left_column, offset.column)
            .ok_or(PlacementError::OutOfBounds { shape, left_column })?;
    }
    Ok(columns)
}

impl Grid {
    /// Computes the row where `shape` comes to rest when dropped at `left_column`.
    ///
    /// Each block can rest no lower than `height[column] - row_offset`; the landing row is the
    /// largest of these bounds, floored at 0. This costs one lookup per block regardless of how
    /// tall the stack is.
    pub fn landing_row(&self, shape: ShapeKind, left_column: i64) -> Result<usize, PlacementError> {
        let columns = absolute_columns(shape, left_column)?;
        Ok(self.landing_row_at(shape, &columns))
    }

    fn landing_row_at(&self, shape: ShapeKind, columns: &[usize; SHAPE_CELLS]) -> usize {
        shape
            .offsets()
            .iter()
            .zip(columns)
            .map(|(offset, &column)| self.heights[column].saturating_sub(offset.row))
            .max()
            .unwrap_or(0)
    }

    /// Drops `shape` with its leftmost column at `left_column` and commits it to the grid.
    ///
    /// No rows are cleared here; pass [`Placement::touched_rows`] to
    /// [`Grid::clear_full_rows`] afterwards.
    ///
    /// # Errors
    ///
    /// - [`PlacementError::OutOfBounds`] if any block would leave `0..GRID_WIDTH`
    /// - [`PlacementError::Collision`] if a landing cell is already occupied, which means the
    ///   height bookkeeping is corrupted
    ///
    /// The grid is unchanged on error.
    pub fn drop_shape(
        &mut self,
        shape: ShapeKind,
        left_column: i64,
    ) -> Result<Placement, PlacementError> {
        let columns = absolute_columns(shape, left_column)?;
        let landing_row = self.landing_row_at(shape, &columns);

        for (offset, &column) in shape.offsets().iter().zip(&columns) {
            let row = landing_row + offset.row;
            if self.columns[column].is_occupied(row) {
                return Err(PlacementError::Collision { row, column });
            }
        }

        let mut touched_rows = TouchedRows::new();
        for (offset, &column) in shape.offsets().iter().zip(&columns) {
            let row = landing_row + offset.row;
            self.occupy_cell(row, column);
            if !touched_rows.contains(&row) {
                touched_rows.push(row);
            }
        }
        touched_rows.sort_unstable();

        Ok(Placement {
            shape,
            left_column: columns[0] - shape.offsets()[0].column,
            landing_row,
            touched_rows,
        })
    }
}
