//! # antenna-pointing
//!
//! Closed-loop pointing core for a two-axis azimuth/elevation antenna mount
//! with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Absolute encoders**: 20-bit SPI encoders are read before every move;
//!   azimuth carries a hardware turn counter for cable-wrap tracking
//! - **Coordinated motion**: both axes step together, the longer move
//!   finishes alone at its own rate
//! - **Safety limits**: elevation is clamped away from the horizon and
//!   zenith, azimuth rotation is bounded and unwound automatically
//! - **Standby supervision**: drivers stay de-energized between passes and
//!   are only woken to correct drift
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use antenna_pointing::{
//!     Axis, Degrees, MountHardware, PointingConfig, PointingController, StepperAxisBuilder,
//! };
//!
//! let config = PointingConfig::default();
//!
//! let azimuth = StepperAxisBuilder::new()
//!     .step_pin(az_step)
//!     .dir_pin(az_dir)
//!     .enable_pin(az_en)
//!     .from_config(&config, Axis::Azimuth)
//!     .build()?;
//! let elevation = StepperAxisBuilder::new()
//!     .step_pin(el_step)
//!     .dir_pin(el_dir)
//!     .enable_pin(el_en)
//!     .from_config(&config, Axis::Elevation)
//!     .build()?;
//!
//! let mut mount = PointingController::new(
//!     &config,
//!     MountHardware { spi, delay, azimuth, elevation, azimuth_cs, elevation_cs },
//! )?;
//!
//! let status = mount.point_to(Degrees(135.0), Degrees(30.0));
//! if status.is_error() {
//!     // report upward
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod encoder;
pub mod error;
pub mod motion;
pub mod motor;
pub mod pointing;

// Re-exports for ergonomic API
pub use config::{validate_config, Axis, AxisConfig, PointingConfig, SafetyLimits};
pub use encoder::{AbsoluteEncoder, EncoderKind};
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use motion::{CoordinatedMove, Direction, StepBurst};
pub use motor::{AxisMode, StepperAxis, StepperAxisBuilder, StepperDrive};
pub use pointing::{Calibration, MountHardware, PointingController};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, Microsteps, Steps, Ticks, ENCODERS_MAX};
