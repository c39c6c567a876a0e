//! Per-beam cost factor.
//!
//! One factor per laser return. The beam travels from the sensor through a
//! sequence of cells and stops at its measured endpoint, so the cells before
//! the endpoint should be free and the endpoint itself should be occupied.
//! Deviations are penalized asymmetrically: an obstacle blocking the beam
//! mid-flight contradicts the measurement harder than a missing obstacle at
//! the endpoint.

use crate::core::types::Occupancy;

/// Cost when a cell before the endpoint is occupied.
pub const COST_OBSTRUCTED: f64 = 1000.0;

/// Cost when the path is clear but the endpoint cell is free.
pub const COST_MISSED_RETURN: f64 = 900.0;

/// Cost of the ideal state: path clear, endpoint occupied.
pub const COST_CONSISTENT: f64 = 1.0;

/// Cost factor for one laser beam's cell path.
///
/// Holds the ordered, non-empty sequence of cell indices the beam traverses,
/// sensor first, measured endpoint last. Immutable once constructed.
/// [`GridModel::add_beam`](crate::model::GridModel::add_beam) validates every
/// index against the grid at construction time, so `cost` never re-checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeamFactor {
    cells: Vec<usize>,
}

impl BeamFactor {
    /// Build a factor over a validated cell sequence.
    ///
    /// Callers must have checked that `cells` is non-empty and that every
    /// index lies inside the owning grid.
    pub(crate) fn new(cells: Vec<usize>) -> Self {
        debug_assert!(!cells.is_empty());
        Self { cells }
    }

    /// The cells the beam traverses, sensor first, endpoint last.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// The measured endpoint cell.
    pub fn endpoint(&self) -> usize {
        self.cells[self.cells.len() - 1]
    }

    /// Cost of this beam under the given occupancy.
    ///
    /// Pure function of the fixed cell sequence and the assignment:
    /// [`COST_OBSTRUCTED`] if any cell before the endpoint is occupied,
    /// otherwise [`COST_MISSED_RETURN`] if the endpoint is free, otherwise
    /// [`COST_CONSISTENT`].
    pub fn cost(&self, occupancy: &Occupancy) -> f64 {
        let last = self.cells.len() - 1;

        if self.cells[..last]
            .iter()
            .any(|&cell| occupancy.get(cell).is_occupied())
        {
            return COST_OBSTRUCTED;
        }
        if !occupancy.get(self.cells[last]).is_occupied() {
            return COST_MISSED_RETURN;
        }
        COST_CONSISTENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CellState;

    fn occupancy(states: &[u8]) -> Occupancy {
        Occupancy::from_states(
            states
                .iter()
                .map(|&s| {
                    if s == 0 {
                        CellState::Free
                    } else {
                        CellState::Occupied
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn test_cost_obstructed_path() {
        let beam = BeamFactor::new(vec![0, 1, 2]);
        // Any occupied cell before the endpoint dominates.
        assert_eq!(beam.cost(&occupancy(&[1, 0, 0])), COST_OBSTRUCTED);
        assert_eq!(beam.cost(&occupancy(&[0, 1, 0])), COST_OBSTRUCTED);
        assert_eq!(beam.cost(&occupancy(&[1, 1, 1])), COST_OBSTRUCTED);
    }

    #[test]
    fn test_cost_missed_return() {
        let beam = BeamFactor::new(vec![0, 1, 2]);
        assert_eq!(beam.cost(&occupancy(&[0, 0, 0])), COST_MISSED_RETURN);
    }

    #[test]
    fn test_cost_consistent() {
        let beam = BeamFactor::new(vec![0, 1, 2]);
        assert_eq!(beam.cost(&occupancy(&[0, 0, 1])), COST_CONSISTENT);
    }

    #[test]
    fn test_cost_single_cell_beam() {
        // A beam whose whole path is its endpoint: only the endpoint rule
        // applies.
        let beam = BeamFactor::new(vec![3]);
        assert_eq!(beam.cost(&occupancy(&[0, 0, 0, 1])), COST_CONSISTENT);
        assert_eq!(beam.cost(&occupancy(&[0, 0, 0, 0])), COST_MISSED_RETURN);
    }

    #[test]
    fn test_cost_is_pure() {
        let beam = BeamFactor::new(vec![0, 1]);
        let occ = occupancy(&[0, 1]);
        let first = beam.cost(&occ);
        for _ in 0..10 {
            assert_eq!(beam.cost(&occ), first);
        }
        // No observable mutation of the inputs.
        assert_eq!(occ, occupancy(&[0, 1]));
        assert_eq!(beam.cells(), &[0, 1]);
    }

    #[test]
    fn test_endpoint_accessor() {
        let beam = BeamFactor::new(vec![4, 5, 6]);
        assert_eq!(beam.endpoint(), 6);
    }
}
