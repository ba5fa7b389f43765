//! Configuration module for antenna-pointing.
//!
//! Provides types for loading and validating the mount configuration
//! from TOML files (with `std` feature) or built-in flight defaults.

mod axis;
mod limits;
mod mechanical;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{Axis, AxisConfig};
pub use limits::SafetyLimits;
pub use mechanical::MechanicalRatio;
pub use system::{CalibrationConfig, EncoderConfig, MotionConfig, PointingConfig, StandbyConfig};
pub use validation::{validate_config, MIN_SETTLE_US};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, Microsteps, Steps, Ticks, ENCODERS_MAX};
