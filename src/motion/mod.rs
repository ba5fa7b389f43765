//! Motion module for antenna-pointing.
//!
//! Provides burst planning and coordinated dual-axis step execution.

mod executor;
mod profile;

pub use executor::{CoordinatedMove, PairedPhase, TailPhase};
pub use profile::{half_periods, Direction, StepBurst};
