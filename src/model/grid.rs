//! Grid energy model.
//!
//! Owns the grid geometry and every beam factor, and aggregates their costs
//! into the total energy of an occupancy assignment. The grid is assembled
//! once (one factor appended per observation) and is read-only afterwards;
//! samplers only ever call the energy oracle and `empty_occupancy`.

use rayon::prelude::*;

use crate::core::types::{Occupancy, Pose2D};
use crate::error::{Error, Result};

use super::beam::BeamFactor;
use super::raycast::RayCaster;

/// Factor count above which the energy reduction runs on the rayon pool.
///
/// Below this the per-call overhead outweighs the parallel sum.
const PARALLEL_FACTOR_THRESHOLD: usize = 256;

/// 2D occupancy grid with an attached set of beam factors.
///
/// Cells are addressed by row-major linear index in `[0, width * height)`.
/// The world origin sits at the grid center, the convention the ray caster
/// and the driver binary share.
#[derive(Debug)]
pub struct GridModel {
    /// Grid width in cells.
    width: usize,

    /// Grid height in cells.
    height: usize,

    /// Cell size in meters.
    resolution: f64,

    /// World X coordinate of cell (0, 0).
    origin_x: f64,

    /// World Y coordinate of cell (0, 0).
    origin_y: f64,

    /// Beam factors in insertion order.
    factors: Vec<BeamFactor>,
}

impl GridModel {
    /// Create a grid of `width` x `height` cells.
    ///
    /// Rejects zero cell counts and non-positive or non-finite resolutions
    /// before any factor can be attached.
    pub fn new(width: usize, height: usize, resolution: f64) -> Result<Self> {
        if width == 0 || height == 0 || !resolution.is_finite() || resolution <= 0.0 {
            return Err(Error::InvalidGrid {
                width,
                height,
                resolution,
            });
        }

        // Center the grid around the world origin
        let origin_x = -(width as f64 * resolution) / 2.0;
        let origin_y = -(height as f64 * resolution) / 2.0;

        Ok(Self {
            width,
            height,
            resolution,
            origin_x,
            origin_y,
            factors: Vec::new(),
        })
    }

    /// Create a grid covering `width_m` x `height_m` meters.
    ///
    /// Cell counts are the ceiling of extent over resolution.
    pub fn from_extent(width_m: f64, height_m: f64, resolution: f64) -> Result<Self> {
        if !width_m.is_finite()
            || !height_m.is_finite()
            || width_m <= 0.0
            || height_m <= 0.0
            || !resolution.is_finite()
            || resolution <= 0.0
        {
            return Err(Error::InvalidGrid {
                width: 0,
                height: 0,
                resolution,
            });
        }
        let width = (width_m / resolution).ceil() as usize;
        let height = (height_m / resolution).ceil() as usize;
        Self::new(width, height, resolution)
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell size in meters.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of attached beam factors.
    #[inline]
    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    /// The attached factors in insertion order.
    pub fn factors(&self) -> &[BeamFactor] {
        &self.factors
    }

    /// Linear index of cell `(row, col)`.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.height && col < self.width);
        row * self.width + col
    }

    /// Convert world coordinates to `(col, row)` cell coordinates.
    ///
    /// Returns `None` outside the grid bounds.
    #[inline]
    pub fn world_to_cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let cx = ((x - self.origin_x) / self.resolution).floor();
        let cy = ((y - self.origin_y) / self.resolution).floor();

        if cx >= 0.0 && cy >= 0.0 {
            let cx = cx as usize;
            let cy = cy as usize;
            if cx < self.width && cy < self.height {
                return Some((cx, cy));
            }
        }
        None
    }

    /// Convert world coordinates to signed cell coordinates.
    ///
    /// Unlike [`world_to_cell`](Self::world_to_cell) the result may lie
    /// outside the grid; the ray caster clips against bounds itself.
    #[inline]
    pub(crate) fn world_to_cell_signed(&self, x: f64, y: f64) -> (i64, i64) {
        (
            ((x - self.origin_x) / self.resolution).floor() as i64,
            ((y - self.origin_y) / self.resolution).floor() as i64,
        )
    }

    /// World coordinates of the center of cell `(col, row)`.
    #[inline]
    pub fn cell_to_world(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.resolution,
            self.origin_y + (row as f64 + 0.5) * self.resolution,
        )
    }

    /// An all-free occupancy sized for this grid.
    pub fn empty_occupancy(&self) -> Occupancy {
        Occupancy::all_free(self.cell_count())
    }

    /// Check that `occupancy` covers exactly this grid's cells.
    ///
    /// Samplers call this once before a run; cost evaluation itself never
    /// re-validates.
    pub fn check_occupancy(&self, occupancy: &Occupancy) -> Result<()> {
        if occupancy.len() != self.cell_count() {
            return Err(Error::OccupancySizeMismatch {
                actual: occupancy.len(),
                expected: self.cell_count(),
            });
        }
        Ok(())
    }

    /// Append a beam factor over the given cell path.
    ///
    /// The sequence is ordered sensor-first with the measured endpoint last.
    /// Empty sequences and out-of-range indices are rejected here; beams that
    /// would leave the grid must already be clipped at the boundary by the
    /// caller (the ray caster does this).
    pub fn add_beam(&mut self, cells: Vec<usize>) -> Result<()> {
        if cells.is_empty() {
            return Err(Error::EmptyBeam);
        }
        let cell_count = self.cell_count();
        if let Some(&index) = cells.iter().find(|&&c| c >= cell_count) {
            return Err(Error::BeamCellOutOfRange { index, cell_count });
        }
        self.factors.push(BeamFactor::new(cells));
        Ok(())
    }

    /// Cast a laser return into a beam factor and append it.
    ///
    /// The beam runs from `pose` along its heading for `range` meters,
    /// clipped at the grid boundary.
    pub fn add_laser(&mut self, pose: &Pose2D, range: f64) -> Result<()> {
        let cells = RayCaster::default().cast(self, pose, range)?;
        self.add_beam(cells)
    }

    /// Total energy of `occupancy`: the sum of every factor's cost.
    ///
    /// This is the negative-log unnormalized posterior the samplers' accept
    /// tests consume. The factors are independent, so the sum runs on the
    /// rayon pool for large factor sets; costs are integer-valued in f64, so
    /// the reduction order cannot change the total.
    pub fn energy(&self, occupancy: &Occupancy) -> f64 {
        if self.factors.len() >= PARALLEL_FACTOR_THRESHOLD {
            self.factors.par_iter().map(|f| f.cost(occupancy)).sum()
        } else {
            self.factors.iter().map(|f| f.cost(occupancy)).sum()
        }
    }

    /// Total energy plus the per-cell heat field.
    ///
    /// `heat[i]` accumulates the cost of every factor whose path contains
    /// cell `i`; cells that currently disagree with the measurements glow
    /// hottest. `heat.len()` must equal `cell_count()`; the buffer is zeroed
    /// here so callers can reuse it across iterations.
    pub fn energy_with_heat(&self, occupancy: &Occupancy, heat: &mut [f64]) -> f64 {
        debug_assert_eq!(heat.len(), self.cell_count());
        heat.fill(0.0);

        let mut total = 0.0;
        for factor in &self.factors {
            let cost = factor.cost(occupancy);
            total += cost;
            for &cell in factor.cells() {
                heat[cell] += cost;
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CellState;
    use crate::model::beam::{COST_CONSISTENT, COST_MISSED_RETURN, COST_OBSTRUCTED};

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(GridModel::new(0, 4, 0.1).is_err());
        assert!(GridModel::new(4, 0, 0.1).is_err());
        assert!(GridModel::new(4, 4, 0.0).is_err());
        assert!(GridModel::new(4, 4, -0.5).is_err());
        assert!(GridModel::new(4, 4, f64::NAN).is_err());
    }

    #[test]
    fn test_from_extent_derives_cells() {
        let model = GridModel::from_extent(10.0, 5.0, 0.1).unwrap();
        assert_eq!(model.width(), 100);
        assert_eq!(model.height(), 50);
        assert_eq!(model.cell_count(), 5000);
        assert!(GridModel::from_extent(-1.0, 5.0, 0.1).is_err());
    }

    #[test]
    fn test_empty_occupancy_shape() {
        let model = GridModel::new(7, 3, 0.5).unwrap();
        let occ = model.empty_occupancy();
        assert_eq!(occ.len(), 21);
        assert!(occ.iter().all(|c| c == CellState::Free));
    }

    #[test]
    fn test_add_beam_validation() {
        let mut model = GridModel::new(2, 2, 0.1).unwrap();
        assert!(matches!(model.add_beam(vec![]), Err(Error::EmptyBeam)));
        assert!(matches!(
            model.add_beam(vec![0, 4]),
            Err(Error::BeamCellOutOfRange { index: 4, .. })
        ));
        assert!(model.add_beam(vec![0, 1, 3]).is_ok());
        assert_eq!(model.factor_count(), 1);
    }

    #[test]
    fn test_energy_is_additive() {
        let mut model = GridModel::new(2, 2, 0.1).unwrap();
        model.add_beam(vec![0, 1]).unwrap();
        model.add_beam(vec![2, 3]).unwrap();

        let mut occ = model.empty_occupancy();
        occ.set(1, CellState::Occupied);

        let by_hand: f64 = model.factors().iter().map(|f| f.cost(&occ)).sum();
        assert_eq!(model.energy(&occ), by_hand);
        assert_eq!(by_hand, COST_CONSISTENT + COST_MISSED_RETURN);
    }

    #[test]
    fn test_energy_corridor_table() {
        // 1x2 grid, one beam crossing cell 0 into endpoint cell 1.
        let mut model = GridModel::new(2, 1, 0.1).unwrap();
        model.add_beam(vec![0, 1]).unwrap();

        let states = |a: CellState, b: CellState| Occupancy::from_states(vec![a, b]);
        use CellState::{Free, Occupied};

        assert_eq!(model.energy(&states(Free, Free)), COST_MISSED_RETURN);
        assert_eq!(model.energy(&states(Free, Occupied)), COST_CONSISTENT);
        assert_eq!(model.energy(&states(Occupied, Free)), COST_OBSTRUCTED);
        assert_eq!(model.energy(&states(Occupied, Occupied)), COST_OBSTRUCTED);
    }

    #[test]
    fn test_energy_with_heat_matches_energy() {
        let mut model = GridModel::new(3, 1, 0.1).unwrap();
        model.add_beam(vec![0, 1, 2]).unwrap();
        model.add_beam(vec![2]).unwrap();

        let occ = model.empty_occupancy();
        let mut heat = vec![0.0; model.cell_count()];
        let total = model.energy_with_heat(&occ, &mut heat);

        assert_eq!(total, model.energy(&occ));
        // Both beams miss their returns; their costs land on their paths.
        assert_eq!(heat[0], COST_MISSED_RETURN);
        assert_eq!(heat[1], COST_MISSED_RETURN);
        assert_eq!(heat[2], COST_MISSED_RETURN * 2.0);
    }

    #[test]
    fn test_world_cell_round_trip() {
        let model = GridModel::new(10, 10, 0.1).unwrap();
        let (x, y) = model.cell_to_world(3, 7);
        assert_eq!(model.world_to_cell(x, y), Some((3, 7)));
        // Outside the extent
        assert_eq!(model.world_to_cell(100.0, 0.0), None);
    }

    #[test]
    fn test_check_occupancy_size() {
        let model = GridModel::new(2, 2, 0.1).unwrap();
        assert!(model.check_occupancy(&Occupancy::all_free(4)).is_ok());
        assert!(matches!(
            model.check_occupancy(&Occupancy::all_free(3)),
            Err(Error::OccupancySizeMismatch {
                actual: 3,
                expected: 4
            })
        ));
    }
}
