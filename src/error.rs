//! Error types for AnumanaGrid

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// AnumanaGrid error types
#[derive(Debug, Error)]
pub enum Error {
    /// Grid construction rejected
    #[error("invalid grid: {width}x{height} cells at {resolution} m/cell")]
    InvalidGrid {
        /// Requested width in cells
        width: usize,
        /// Requested height in cells
        height: usize,
        /// Requested resolution in meters per cell
        resolution: f64,
    },

    /// Beam with no cells
    #[error("beam has no cells")]
    EmptyBeam,

    /// Beam referencing a cell outside the grid
    #[error("beam references cell {index}, grid has {cell_count} cells")]
    BeamCellOutOfRange {
        /// Offending cell index
        index: usize,
        /// Number of cells in the grid
        cell_count: usize,
    },

    /// Occupancy whose size disagrees with the grid
    #[error("occupancy has {actual} cells, grid expects {expected}")]
    OccupancySizeMismatch {
        /// Cells in the supplied occupancy
        actual: usize,
        /// Cells the grid expects
        expected: usize,
    },

    /// Sensor pose outside the grid
    #[error("sensor pose ({x:.3}, {y:.3}) lies outside the grid")]
    PoseOutsideGrid {
        /// World X of the pose
        x: f64,
        /// World Y of the pose
        y: f64,
    },

    /// Laser range that is not a usable distance
    #[error("laser range {0} is not a positive finite distance")]
    InvalidRange(f64),

    /// Sampler configuration rejected
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
