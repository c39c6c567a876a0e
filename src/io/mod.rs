//! I/O at the edges of the crate.
//!
//! Everything here writes to caller-supplied sinks (a `Write` impl or an
//! explicit path); nothing hard-codes an output location, and nothing in
//! this layer can reach back into model or sampler state.
//!
//! # Contents
//!
//! - [`marginals`]: the marginals text dump and its reader
//! - [`trace`]: per-iteration energy trace dump
//! - [`ppm`]: grayscale / RGB image renders for human inspection

pub mod marginals;
pub mod ppm;
pub mod trace;
