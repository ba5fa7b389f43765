//! Pointing control: geometry, references and the two-axis controller.

mod calibration;
mod controller;
pub mod geometry;
mod standby;

pub use calibration::{AxisCalibration, Calibration};
pub use controller::{signed_elevation, MountHardware, PointingController};
pub use standby::aggregate as aggregate_standby;
