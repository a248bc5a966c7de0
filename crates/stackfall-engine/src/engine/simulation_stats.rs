use serde::{Deserialize, Serialize};

use crate::core::shape::MAX_SHAPE_HEIGHT;

/// Statistics of one simulated record.
///
/// - **Completed pieces**: placements committed to the grid
/// - **Cleared rows**: total rows removed by line clears
/// - **Clear histogram**: how many placements cleared 0, 1, 2 or 3 rows
/// - **Peak height**: tallest stack seen, measured after a drop and before its clear
///
/// # Example
///
/// ```
/// use stackfall_engine::SimulationStats;
///
/// let mut stats = SimulationStats::new();
/// stats.complete_placement(0, 2);
/// stats.complete_placement(2, 2);
///
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.total_cleared_rows(), 2);
/// assert_eq!(stats.clear_counter(), &[1, 0, 1, 0]);
/// assert_eq!(stats.peak_height(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    completed_pieces: usize,
    total_cleared_rows: usize,
    clear_counter: [usize; MAX_SHAPE_HEIGHT + 1],
    peak_height: usize,
}

impl SimulationStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            completed_pieces: 0,
            total_cleared_rows: 0,
            clear_counter: [0; MAX_SHAPE_HEIGHT + 1],
            peak_height: 0,
        }
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Returns a histogram of placements by number of rows cleared.
    ///
    /// Index `n` counts the placements that cleared exactly `n` rows. A single placement can
    /// clear at most [`MAX_SHAPE_HEIGHT`] rows.
    #[must_use]
    pub const fn clear_counter(&self) -> &[usize; MAX_SHAPE_HEIGHT + 1] {
        &self.clear_counter
    }

    #[must_use]
    pub const fn peak_height(&self) -> usize {
        self.peak_height
    }

    /// Updates statistics after a placement and its line clear.
    ///
    /// * `cleared_rows` - Number of rows the placement cleared
    /// * `height` - Stack height right after the drop, before clearing
    pub fn complete_placement(&mut self, cleared_rows: usize, height: usize) {
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        if let Some(count) = self.clear_counter.get_mut(cleared_rows) {
            *count += 1;
        }
        self.peak_height = self.peak_height.max(height);
    }
}
