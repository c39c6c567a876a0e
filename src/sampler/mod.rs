//! MCMC samplers over grid occupancy assignments.
//!
//! Both chains target the Boltzmann distribution `∝ exp(-energy(occupancy))`
//! defined by the grid model. [`MetropolisSampler`] proposes spatially local
//! single-cell flips with a symmetric Gaussian jitter;
//! [`DataDrivenSampler`] draws the flipped cell from a measurement-informed
//! distribution and carries the Hastings correction the asymmetry requires.
//! Only mixing speed differs between the two.
//!
//! A chain is inherently sequential: every iteration depends on the previous
//! state, so there is no inter-iteration parallelism. Diagnostics flow
//! one-way through [`ChainObserver`]; observers never feed back into chain
//! state.

mod data_driven;
mod metropolis;
mod observer;
mod random;

pub use data_driven::{DataDrivenConfig, DataDrivenSampler};
pub use metropolis::{MetropolisConfig, MetropolisSampler};
pub use observer::{ChainObserver, EnergyTrace, NullObserver, ProgressLogger};
pub use random::ChainRng;

use crate::core::types::{Marginals, Occupancy};

/// Chain statistics reported alongside the marginals.
#[derive(Debug, Clone, Default)]
pub struct ChainStats {
    /// Iterations executed.
    pub iterations: usize,
    /// Accepted proposals.
    pub accepted: usize,
    /// Rejected proposals.
    pub rejected: usize,
    /// Energy of the final state.
    pub final_energy: f64,
}

impl ChainStats {
    /// Fraction of proposals accepted, 0.0 for an empty run.
    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.accepted as f64 / self.iterations as f64
        }
    }
}

/// Result of one sampling run.
#[derive(Debug, Clone)]
pub struct SamplerRun {
    /// Estimated per-cell occupied fractions.
    pub marginals: Marginals,
    /// Chain diagnostics.
    pub stats: ChainStats,
}

/// Running occupied-counts, normalized into marginals at the end of a run.
///
/// Counts sample the chain's *current* state once per iteration, accept or
/// reject alike.
#[derive(Debug)]
pub(crate) struct MarginalCounts {
    counts: Vec<u64>,
}

impl MarginalCounts {
    pub(crate) fn new(cell_count: usize) -> Self {
        Self {
            counts: vec![0; cell_count],
        }
    }

    /// Increment the count of every currently occupied cell.
    pub(crate) fn record(&mut self, occupancy: &Occupancy) {
        for (count, state) in self.counts.iter_mut().zip(occupancy.iter()) {
            if state.is_occupied() {
                *count += 1;
            }
        }
    }

    /// Normalize to occupied fractions over `iterations`.
    ///
    /// Zero iterations yield all-zero marginals; there is no division in
    /// that case.
    pub(crate) fn into_marginals(self, width: usize, height: usize, iterations: usize) -> Marginals {
        if iterations == 0 {
            return Marginals::zeros(width, height);
        }
        let n = iterations as f64;
        Marginals::new(
            width,
            height,
            self.counts.into_iter().map(|c| c as f64 / n).collect(),
        )
    }
}
