//! AnumanaGrid - occupancy grid inference by Markov chain Monte Carlo
//!
//! Estimates, for every cell of a 2D occupancy grid, the probability that the
//! cell is occupied given a set of laser range observations. Each observation
//! becomes a per-beam cost function over the grid; the sum of those costs is
//! an unnormalized negative log-probability (energy) over all occupancy
//! assignments. The assignment space is exponential in the cell count, so the
//! marginals are estimated by sampling: a Metropolis chain (plus a
//! data-driven variant with a measurement-informed proposal) walks the
//! assignment space and the empirical per-cell occupied fraction is reported.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      bin/                           │  ← Driver executable
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Marginals dump, energy
//! │            (marginals, trace, ppm)                  │    trace, image export
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    sampler/                         │  ← MCMC chains
//! │         (metropolis, data_driven, observer)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     model/                          │  ← Energy model
//! │              (beam, grid, raycast)                  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation types
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use anumana_grid::{GridModel, MetropolisConfig, MetropolisSampler};
//!
//! // 1x2 corridor: the beam crosses cell 0 and ends in cell 1.
//! let mut model = GridModel::new(2, 1, 0.1).unwrap();
//! model.add_beam(vec![0, 1]).unwrap();
//!
//! let config = MetropolisConfig {
//!     seed: 42,
//!     ..Default::default()
//! };
//! let sampler = MetropolisSampler::new(config);
//! let run = sampler.run(&model, 5000).unwrap();
//!
//! // The endpoint cell dominates the obstructing cell.
//! assert!(run.marginals.get(1) > run.marginals.get(0));
//! ```

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

pub mod error;

// ============================================================================
// Layer 2: Energy model (depends on core)
// ============================================================================
pub mod model;

// ============================================================================
// Layer 3: Samplers (depends on core, model)
// ============================================================================
pub mod sampler;

// ============================================================================
// Layer 4: I/O at the edges (depends on all layers)
// ============================================================================
pub mod io;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use core::types::{CellState, Marginals, Occupancy, Pose2D};

pub use error::{Error, Result};

pub use model::{BeamFactor, GridModel, RayCaster};

pub use sampler::{
    ChainObserver, ChainStats, DataDrivenConfig, DataDrivenSampler, EnergyTrace,
    MetropolisConfig, MetropolisSampler, NullObserver, ProgressLogger, SamplerRun,
};
