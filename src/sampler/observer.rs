//! Observational side channels for running chains.
//!
//! Observers see each iteration's pre-step energy and the current occupancy
//! snapshot. The channel is strictly one-way: nothing an observer does can
//! reach back into chain state, and sampling results do not depend on which
//! observer (if any) is attached.

use crate::core::types::Occupancy;

/// Receiver for per-iteration chain diagnostics.
pub trait ChainObserver {
    /// Called once per iteration before the proposal, with the iteration
    /// index, the current energy, and the current occupancy.
    fn chain_step(&mut self, iteration: usize, energy: f64, occupancy: &Occupancy) {
        let _ = (iteration, energy, occupancy);
    }
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ChainObserver for NullObserver {}

/// Records the per-iteration energy for offline plotting.
#[derive(Debug, Default, Clone)]
pub struct EnergyTrace {
    energies: Vec<f64>,
}

impl EnergyTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trace with capacity for `iterations` entries.
    pub fn with_capacity(iterations: usize) -> Self {
        Self {
            energies: Vec::with_capacity(iterations),
        }
    }

    /// The recorded energies, one per iteration.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }
}

impl ChainObserver for EnergyTrace {
    fn chain_step(&mut self, _iteration: usize, energy: f64, _occupancy: &Occupancy) {
        self.energies.push(energy);
    }
}

/// Logs chain progress at a fixed iteration stride.
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    every: usize,
}

impl ProgressLogger {
    /// Log every `every` iterations (0 disables logging).
    pub fn new(every: usize) -> Self {
        Self { every }
    }
}

impl Default for ProgressLogger {
    fn default() -> Self {
        Self { every: 1000 }
    }
}

impl ChainObserver for ProgressLogger {
    fn chain_step(&mut self, iteration: usize, energy: f64, occupancy: &Occupancy) {
        if self.every != 0 && iteration % self.every == 0 {
            log::debug!(
                "iteration {}: energy {:.1}, {} cells occupied",
                iteration,
                energy,
                occupancy.occupied_count()
            );
        }
    }
}

/// Pairs fan out to both observers.
impl<A: ChainObserver, B: ChainObserver> ChainObserver for (A, B) {
    fn chain_step(&mut self, iteration: usize, energy: f64, occupancy: &Occupancy) {
        self.0.chain_step(iteration, energy, occupancy);
        self.1.chain_step(iteration, energy, occupancy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_trace_records_in_order() {
        let mut trace = EnergyTrace::new();
        let occ = Occupancy::all_free(2);
        trace.chain_step(0, 900.0, &occ);
        trace.chain_step(1, 1.0, &occ);
        assert_eq!(trace.energies(), &[900.0, 1.0]);
    }

    #[test]
    fn test_pair_fans_out() {
        let occ = Occupancy::all_free(2);
        let mut pair = (EnergyTrace::new(), EnergyTrace::new());
        pair.chain_step(0, 5.0, &occ);
        assert_eq!(pair.0.energies(), &[5.0]);
        assert_eq!(pair.1.energies(), &[5.0]);
    }
}
