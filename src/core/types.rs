//! Core data types for occupancy grid inference.
//!
//! Cells are identified by a row-major linear index: `index = row * width +
//! col`, `row` counting up from the grid origin. An [`Occupancy`] is one
//! complete binary assignment over all cells; [`Marginals`] is the per-cell
//! occupied fraction accumulated over a sampling run.

use serde::{Deserialize, Serialize};

/// Binary state of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    /// Free space (no obstacle)
    Free,
    /// Occupied (contains an obstacle)
    Occupied,
}

impl CellState {
    /// The opposite state.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            CellState::Free => CellState::Occupied,
            CellState::Occupied => CellState::Free,
        }
    }

    /// Whether this state is [`CellState::Occupied`].
    #[inline]
    pub fn is_occupied(self) -> bool {
        matches!(self, CellState::Occupied)
    }
}

/// A complete binary assignment over all grid cells.
///
/// Row-major storage; the domain is always exactly `width * height` cells of
/// the grid that produced it. The sampler owns and mutates one of these in
/// place for the duration of a chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    cells: Vec<CellState>,
}

impl Occupancy {
    /// Create an all-free assignment with `len` cells.
    pub fn all_free(len: usize) -> Self {
        Self {
            cells: vec![CellState::Free; len],
        }
    }

    /// Create an all-occupied assignment with `len` cells.
    pub fn all_occupied(len: usize) -> Self {
        Self {
            cells: vec![CellState::Occupied; len],
        }
    }

    /// Create an assignment from explicit states.
    pub fn from_states(cells: Vec<CellState>) -> Self {
        Self { cells }
    }

    /// Number of cells in the assignment.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the assignment has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// State of cell `index`.
    #[inline]
    pub fn get(&self, index: usize) -> CellState {
        self.cells[index]
    }

    /// Set cell `index` to `state`.
    #[inline]
    pub fn set(&mut self, index: usize, state: CellState) {
        self.cells[index] = state;
    }

    /// Flip cell `index` between free and occupied.
    #[inline]
    pub fn toggle(&mut self, index: usize) {
        self.cells[index] = self.cells[index].toggled();
    }

    /// Iterate over all cell states in index order.
    pub fn iter(&self) -> impl Iterator<Item = CellState> + '_ {
        self.cells.iter().copied()
    }

    /// Raw cell states (row-major).
    pub fn as_slice(&self) -> &[CellState] {
        &self.cells
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }
}

/// Per-cell occupied fraction estimated by a sampling run.
///
/// One value per cell, row-major, each in `[0, 1]`. Carries the grid
/// dimensions so a consumer can reconstruct the 2D layout without the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Marginals {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Marginals {
    /// Create marginals from row-major values and grid dimensions.
    ///
    /// `values.len()` must equal `width * height`.
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
        }
    }

    /// All-zero marginals for a `width` x `height` grid.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
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

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Occupied fraction of cell `index`.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Raw values (row-major).
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Largest per-cell fraction, 0.0 for an empty grid.
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// A 2D sensor pose: position in meters plus heading.
///
/// Position `(x, y)` is in world meters; `theta` is the heading angle in
/// radians, counter-clockwise positive from the X-axis. Only the ray-casting
/// collaborator consumes poses; the samplers never see one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters.
    pub x: f64,
    /// Y position in meters.
    pub y: f64,
    /// Heading angle in radians, CCW positive from the X-axis.
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose.
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// The identity pose (origin, facing along +X).
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }
}
