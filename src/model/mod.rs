//! Probabilistic energy model over grid occupancy.
//!
//! A [`GridModel`] owns the grid geometry and one [`BeamFactor`] per laser
//! observation. The model's `energy` of an occupancy assignment is the sum of
//! every factor's cost; samplers treat that sum as the negative
//! log-probability (up to normalization) of the assignment.
//!
//! [`RayCaster`] turns a sensor pose plus a measured range into the ordered
//! cell sequence a factor is built from.

mod beam;
mod grid;
mod raycast;

pub use beam::{BeamFactor, COST_CONSISTENT, COST_MISSED_RETURN, COST_OBSTRUCTED};
pub use grid::GridModel;
pub use raycast::RayCaster;
