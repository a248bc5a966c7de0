use super::{GRID_WIDTH, Grid};

/// Mapping from pre-clear row indices to post-clear ones for a batch of cleared rows.
///
/// A row below the lowest cleared row keeps its index, a cleared row maps to `None`, and any
/// other row moves down by the number of cleared rows strictly below it. The mapping for rows
/// between the lowest and highest cleared rows is precomputed; rows above the highest cleared
/// row all shift by the total count.
///
/// # Example
///
/// ```
/// use stackfall_engine::RowRemap;
///
/// let remap = RowRemap::new([4, 1]).unwrap();
/// assert_eq!(remap.map(0), Some(0));
/// assert_eq!(remap.map(1), None);
/// assert_eq!(remap.map(3), Some(2));
/// assert_eq!(remap.map(4), None);
/// assert_eq!(remap.map(10), Some(8));
/// assert!(RowRemap::new([]).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRemap {
    lowest: usize,
    window: Vec<Option<usize>>,
    cleared: usize,
}

impl RowRemap {
    /// Builds the mapping for a set of cleared rows, or `None` if the set is empty.
    ///
    /// Order and duplicates in `cleared_rows` do not matter.
    pub fn new<I>(cleared_rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut rows: Vec<usize> = cleared_rows.into_iter().collect();
        rows.sort_unstable();
        rows.dedup();
        let (&lowest, &highest) = (rows.first()?, rows.last()?);

        let mut pending = rows.iter().copied().peekable();
        let mut cleared_below = 0;
        let window = (lowest..=highest)
            .map(|row| {
                if pending.next_if_eq(&row).is_some() {
                    cleared_below += 1;
                    None
                } else {
                    Some(row - cleared_below)
                }
            })
            .collect();

        Some(Self {
            lowest,
            window,
            cleared: rows.len(),
        })
    }

    #[must_use]
    pub fn lowest_cleared(&self) -> usize {
        self.lowest
    }

    #[must_use]
    pub fn cleared_count(&self) -> usize {
        self.cleared
    }

    /// Returns the new index of `row`, or `None` if the row is cleared.
    #[must_use]
    pub fn map(&self, row: usize) -> Option<usize> {
        let Some(offset) = row.checked_sub(self.lowest) else {
            return Some(row);
        };
        match self.window.get(offset) {
            Some(&mapped) => mapped,
            None => Some(row - self.cleared),
        }
    }
}

impl Grid {
    /// Returns the full rows among `candidates`, ascending and without duplicates.
    #[must_use]
    pub fn full_rows(&self, candidates: &[usize]) -> Vec<usize> {
        let mut rows: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&row| self.is_row_full(row))
            .collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }

    /// Removes every full row among `touched_rows` in a single compaction and returns them.
    ///
    /// Only rows touched by the last placement can have become full, so no other row is
    /// inspected. All full rows are removed at once: each column drops its blocks on cleared
    /// rows and moves the rest through one [`RowRemap`], which gives the same result as
    /// deleting exactly those rows simultaneously even when they are not adjacent.
    ///
    /// Compaction only removes blocks, so it cannot create a new full row and never needs to
    /// repeat.
    ///
    /// # Example
    ///
    /// ```
    /// use stackfall_engine::Grid;
    ///
    /// let mut grid = Grid::from_ascii(
    ///     r"
    ///     |.#........|
    ///     |##########|
    ///     |##.#######|
    ///     |##########|
    ///     ",
    /// );
    /// let cleared = grid.clear_full_rows(&[0, 1, 2, 3]);
    /// assert_eq!(cleared, [0, 2]);
    /// assert_eq!(grid.height(), 2);
    /// assert_eq!(grid.row_count(0), 9);
    /// assert!(grid.is_occupied(1, 1));
    /// ```
    pub fn clear_full_rows(&mut self, touched_rows: &[usize]) -> Vec<usize> {
        let cleared = self.full_rows(touched_rows);
        let Some(remap) = RowRemap::new(cleared.iter().copied()) else {
            return cleared;
        };

        let old_height = self.height();
        for (column, height) in self.columns.iter_mut().zip(&mut self.heights) {
            column.compact(&remap);
            *height = column.height();
        }
        self.rebuild_row_counts(remap.lowest_cleared(), old_height);

        debug_assert!(
            !self.row_counts.values().any(|&count| count == GRID_WIDTH),
            "full row left after compaction"
        );
        cleared
    }

    /// Recounts rows `from..` after a compaction moved them.
    ///
    /// Counts below `from` are unaffected by the compaction and are kept.
    fn rebuild_row_counts(&mut self, from: usize, old_height: usize) {
        for row in from..old_height {
            self.row_counts.remove(&row);
        }
        for column in &self.columns {
            for row in column.occupied_rows_from(from) {
                *self.row_counts.entry(row).or_default() += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::shape::ShapeKind;

    use super::*;

    #[test]
    fn test_remap_single_row() {
        let remap = RowRemap::new([3]).unwrap();
        assert_eq!(remap.lowest_cleared(), 3);
        assert_eq!(remap.cleared_count(), 1);
        assert_eq!(remap.map(2), Some(2));
        assert_eq!(remap.map(3), None);
        assert_eq!(remap.map(4), Some(3));
    }

    #[test]
    fn test_remap_ignores_order_and_duplicates() {
        let a = RowRemap::new([5, 2, 2, 7]).unwrap();
        let b = RowRemap::new([2, 5, 7]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cleared_count(), 3);
        assert_eq!(
            (0..10).map(|row| a.map(row)).collect::<Vec<_>>(),
            [
                Some(0),
                Some(1),
                None,
                Some(2),
                Some(3),
                None,
                Some(4),
                None,
                Some(5),
                Some(6),
            ]
        );
    }

    #[test]
    fn test_no_full_rows_is_a_no_op() {
        let mut grid = Grid::from_ascii(
            r"
            #########.
            ",
        );
        let before = grid.clone();
        assert!(grid.clear_full_rows(&[0]).is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_untouched_full_rows_are_not_candidates() {
        let mut grid = Grid::from_ascii(
            r"
            #.........
            ##########
            ",
        );
        assert!(grid.clear_full_rows(&[1]).is_empty());
        assert!(grid.is_row_full(0));
        assert_eq!(grid.clear_full_rows(&[0, 1]), [0]);
        assert_eq!(grid.height(), 1);
        grid.assert_consistent();
    }

    #[test]
    fn test_clear_non_adjacent_rows_shifts_by_rows_below() {
        let mut grid = Grid::from_ascii(
            r"
            ...#......
            ##########
            .#........
            ##########
            #.........
            ",
        );
        let cells_before = grid.occupied_cells();

        let cleared = grid.clear_full_rows(&[1, 2, 3]);
        assert_eq!(cleared, [1, 3]);
        assert_eq!(grid.occupied_cells(), cells_before - 2 * GRID_WIDTH);

        let expected = Grid::from_ascii(
            r"
            ...#......
            .#........
            #.........
            ",
        );
        assert_eq!(grid, expected);
        grid.assert_consistent();
    }

    #[test]
    fn test_clear_everything() {
        let mut grid = Grid::from_ascii(
            r"
            ##########
            ##########
            ",
        );
        assert_eq!(grid.clear_full_rows(&[1, 0]), [0, 1]);
        assert!(grid.is_empty());
        assert_eq!(grid, Grid::new());
    }

    #[test]
    fn test_placement_completes_two_rows() {
        let mut grid = Grid::from_ascii(
            r"
            ########..
            ########..
            ",
        );
        let placement = grid.drop_shape(ShapeKind::Q, 8).unwrap();
        let cleared = grid.clear_full_rows(placement.touched_rows());
        assert_eq!(cleared, [0, 1]);
        assert!(grid.is_empty());
        grid.assert_consistent();
    }

    #[test]
    fn test_rows_below_lowest_cleared_keep_counts() {
        let mut grid = Grid::from_ascii(
            r"
            ########..
            ###.######
            ",
        );
        let placement = grid.drop_shape(ShapeKind::Q, 8).unwrap();
        assert_eq!(placement.landing_row(), 1);
        assert_eq!(grid.clear_full_rows(placement.touched_rows()), [1]);
        assert_eq!(grid.row_count(0), 9);
        assert_eq!(grid.row_count(1), 2);
        assert_eq!(grid.height(), 2);
        grid.assert_consistent();
    }
}
