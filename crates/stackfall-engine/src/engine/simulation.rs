use crate::{
    PlacementError,
    core::grid::{Grid, Placement},
};

use super::{command::DropCommand, simulation_stats::SimulationStats};

/// Observable steps of a simulation, reported after the grid has been updated.
#[derive(Debug, Clone, Copy)]
pub enum SimulationEvent<'a> {
    /// A shape was committed; no rows have been cleared yet.
    Dropped {
        command: DropCommand,
        placement: &'a Placement,
        grid: &'a Grid,
    },
    /// One or more rows were removed by the compaction following a drop.
    Cleared { rows: &'a [usize], grid: &'a Grid },
}

/// Result of applying one drop command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub placement: Placement,
    pub cleared_rows: Vec<usize>,
}

/// Grid state and statistics owned by a single record.
///
/// A `Simulation` is created fresh for every record and dropped when the record ends; nothing
/// is shared between records.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    grid: Grid,
    stats: SimulationStats,
}

impl Simulation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Current stack height.
    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Drops the command's shape and clears any rows it completed.
    ///
    /// The grid is unchanged if the drop fails.
    pub fn apply(&mut self, command: DropCommand) -> Result<StepOutcome, PlacementError> {
        self.apply_observed(command, &mut |_| {})
    }

    /// Like [`Self::apply`], but reports the intermediate states to `observer`.
    pub fn apply_observed<F>(
        &mut self,
        command: DropCommand,
        observer: &mut F,
    ) -> Result<StepOutcome, PlacementError>
    where
        F: FnMut(SimulationEvent<'_>),
    {
        let placement = self
            .grid
            .drop_shape(command.shape(), command.left_column())?;
        observer(SimulationEvent::Dropped {
            command,
            placement: &placement,
            grid: &self.grid,
        });

        let height = self.grid.height();
        let cleared_rows = self.grid.clear_full_rows(placement.touched_rows());
        self.stats.complete_placement(cleared_rows.len(), height);
        if !cleared_rows.is_empty() {
            observer(SimulationEvent::Cleared {
                rows: &cleared_rows,
                grid: &self.grid,
            });
        }

        Ok(StepOutcome {
            placement,
            cleared_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use crate::core::{grid::GRID_WIDTH, shape::ShapeKind};

    use super::*;

    fn random_command(rng: &mut Pcg32) -> DropCommand {
        let shape: ShapeKind = rng.random();
        let max_column = GRID_WIDTH - shape.width();
        let left_column = rng.random_range(0..=max_column);
        DropCommand::new(shape, i64::try_from(left_column).unwrap())
    }

    #[test]
    fn test_apply_updates_stats() {
        let mut simulation = Simulation::new();
        for column in [0, 2, 4, 6] {
            let outcome = simulation.apply(DropCommand::new(ShapeKind::Q, column)).unwrap();
            assert!(outcome.cleared_rows.is_empty());
        }
        let outcome = simulation.apply(DropCommand::new(ShapeKind::Q, 8)).unwrap();
        assert_eq!(outcome.cleared_rows, [0, 1]);
        assert_eq!(outcome.placement.landing_row(), 0);
        assert_eq!(simulation.height(), 0);

        let stats = simulation.stats();
        assert_eq!(stats.completed_pieces(), 5);
        assert_eq!(stats.total_cleared_rows(), 2);
        assert_eq!(stats.clear_counter(), &[4, 0, 1, 0]);
        assert_eq!(stats.peak_height(), 2);
    }

    #[test]
    fn test_failed_drop_keeps_state() {
        let mut simulation = Simulation::new();
        simulation.apply(DropCommand::new(ShapeKind::T, 3)).unwrap();
        let grid = simulation.grid().clone();
        let stats = simulation.stats().clone();

        assert!(simulation.apply(DropCommand::new(ShapeKind::I, 7)).is_err());
        assert_eq!(simulation.grid(), &grid);
        assert_eq!(simulation.stats(), &stats);
    }

    #[test]
    fn test_observer_sees_drop_before_clear() {
        let mut simulation = Simulation::new();
        simulation.apply(DropCommand::new(ShapeKind::I, 0)).unwrap();
        simulation.apply(DropCommand::new(ShapeKind::I, 4)).unwrap();

        let mut events = vec![];
        simulation
            .apply_observed(DropCommand::new(ShapeKind::Q, 8), &mut |event| match event {
                SimulationEvent::Dropped { grid, placement, .. } => {
                    events.push(format!("drop@{} h={}", placement.landing_row(), grid.height()));
                }
                SimulationEvent::Cleared { rows, grid } => {
                    events.push(format!("clear{rows:?} h={}", grid.height()));
                }
            })
            .unwrap();
        assert_eq!(events, ["drop@0 h=2", "clear[0] h=1"]);
    }

    #[test]
    fn test_random_sequences_match_naive_recomputation() {
        let mut rng = Pcg32::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let mut simulation = Simulation::new();
            let mut cleared_total = 0;
            let mut placed = 0;
            for _ in 0..400 {
                let before = simulation.grid().occupied_cells();
                let outcome = simulation.apply(random_command(&mut rng)).unwrap();
                placed += 1;
                cleared_total += outcome.cleared_rows.len();
                assert_eq!(
                    simulation.grid().occupied_cells(),
                    before + 4 - outcome.cleared_rows.len() * GRID_WIDTH
                );
                assert_eq!(simulation.height(), simulation.grid().naive_height());
            }
            simulation.grid().assert_consistent();
            assert_eq!(simulation.stats().completed_pieces(), placed);
            assert_eq!(simulation.stats().total_cleared_rows(), cleared_total);
        }
    }
}
