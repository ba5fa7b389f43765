//! Motor module for antenna-pointing.
//!
//! Provides the stepper axis driver, its builder and the shared axis mode.

mod builder;
mod driver;
mod state;

pub use builder::StepperAxisBuilder;
pub use driver::{StepperAxis, StepperDrive};
pub use state::AxisMode;
