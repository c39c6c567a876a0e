//! Bresenham ray casting from a sensor pose to its measured endpoint.
//!
//! A laser return at range `r` pins down the cells the beam flew through:
//! everything between the sensor and the endpoint, endpoint last. This module
//! turns pose + range into that ordered cell sequence so the grid can build a
//! beam factor from it.
//!
//! # Algorithm
//!
//! Bresenham's line algorithm over cell coordinates, integer-only stepping
//! from the sensor cell toward the endpoint cell. The grid is convex, so a
//! beam that leaves it never comes back; traversal stops at the boundary and
//! the last in-bounds cell becomes the clipped endpoint.

use crate::core::types::Pose2D;
use crate::error::{Error, Result};

use super::grid::GridModel;

/// Ray caster producing beam cell sequences.
#[derive(Debug, Clone)]
pub struct RayCaster {
    /// Maximum ray length in cells (safety guard).
    max_ray_cells: usize,
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            max_ray_cells: 1000, // ~50m at 5cm resolution
        }
    }
}

impl RayCaster {
    /// Create a ray caster with a custom cell-count guard.
    pub fn new(max_ray_cells: usize) -> Self {
        Self { max_ray_cells }
    }

    /// Cells traversed by a beam from `pose` along its heading for `range`
    /// meters, sensor cell first, endpoint last.
    ///
    /// The pose must lie inside the grid; the range must be positive and
    /// finite. Beams reaching past the grid are clipped at the boundary.
    pub fn cast(&self, grid: &GridModel, pose: &Pose2D, range: f64) -> Result<Vec<usize>> {
        if !range.is_finite() || range <= 0.0 {
            return Err(Error::InvalidRange(range));
        }
        let (start_col, start_row) =
            grid.world_to_cell(pose.x, pose.y)
                .ok_or(Error::PoseOutsideGrid {
                    x: pose.x,
                    y: pose.y,
                })?;

        let end_x = pose.x + range * pose.theta.cos();
        let end_y = pose.y + range * pose.theta.sin();
        let (end_col, end_row) = grid.world_to_cell_signed(end_x, end_y);

        Ok(self.bresenham(
            grid,
            start_col as i64,
            start_row as i64,
            end_col,
            end_row,
        ))
    }

    /// Bresenham traversal collecting in-bounds cells.
    fn bresenham(&self, grid: &GridModel, x0: i64, y0: i64, x1: i64, y1: i64) -> Vec<usize> {
        let width = grid.width() as i64;
        let height = grid.height() as i64;

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        let mut x = x0;
        let mut y = y0;
        let mut err = dx - dy;

        let mut cells = Vec::new();

        loop {
            // Leaving the grid clips the beam at the previous cell.
            if x < 0 || y < 0 || x >= width || y >= height {
                break;
            }
            cells.push((y * width + x) as usize);

            if (x == x1 && y == y1) || cells.len() >= self.max_ray_cells {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_10x10() -> GridModel {
        // 10x10 cells at 0.1 m, world origin at the grid center.
        GridModel::new(10, 10, 0.1).unwrap()
    }

    #[test]
    fn test_cast_along_x_axis() {
        let grid = grid_10x10();
        let pose = Pose2D::new(0.0, 0.0, 0.0);
        let cells = RayCaster::default().cast(&grid, &pose, 0.3).unwrap();

        // Sensor sits in cell (5, 5); three cells toward +X.
        assert_eq!(cells.first(), Some(&grid.index_of(5, 5)));
        assert_eq!(cells.last(), Some(&grid.index_of(5, 8)));
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_cast_clips_at_boundary() {
        let grid = grid_10x10();
        let pose = Pose2D::new(0.0, 0.0, 0.0);
        // Far beyond the 0.5 m half-extent: endpoint clamps to the last column.
        let cells = RayCaster::default().cast(&grid, &pose, 100.0).unwrap();
        assert_eq!(cells.last(), Some(&grid.index_of(5, 9)));
        assert!(cells.len() <= grid.width());
    }

    #[test]
    fn test_cast_diagonal_stays_connected() {
        let grid = grid_10x10();
        let pose = Pose2D::new(0.0, 0.0, std::f64::consts::FRAC_PI_4);
        let cells = RayCaster::default().cast(&grid, &pose, 0.4).unwrap();

        // Consecutive cells differ by at most one row and one column.
        for pair in cells.windows(2) {
            let (r0, c0) = (pair[0] / grid.width(), pair[0] % grid.width());
            let (r1, c1) = (pair[1] / grid.width(), pair[1] % grid.width());
            assert!(r0.abs_diff(r1) <= 1 && c0.abs_diff(c1) <= 1);
        }
        assert!(cells.len() >= 3);
    }

    #[test]
    fn test_cast_rejects_outside_pose() {
        let grid = grid_10x10();
        let pose = Pose2D::new(5.0, 5.0, 0.0);
        assert!(matches!(
            RayCaster::default().cast(&grid, &pose, 1.0),
            Err(Error::PoseOutsideGrid { .. })
        ));
    }

    #[test]
    fn test_cast_rejects_bad_range() {
        let grid = grid_10x10();
        let pose = Pose2D::identity();
        let caster = RayCaster::default();
        assert!(matches!(
            caster.cast(&grid, &pose, 0.0),
            Err(Error::InvalidRange(_))
        ));
        assert!(matches!(
            caster.cast(&grid, &pose, f64::NAN),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn test_add_laser_builds_factor() {
        let mut grid = grid_10x10();
        grid.add_laser(&Pose2D::new(0.0, 0.0, 0.0), 0.3).unwrap();
        assert_eq!(grid.factor_count(), 1);
        let factor = &grid.factors()[0];
        assert_eq!(factor.endpoint(), grid.index_of(5, 8));
    }
}
