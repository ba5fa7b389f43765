//! Per-axis configuration from TOML.

use core::fmt;

use serde::Deserialize;

use super::units::Microsteps;

/// The two axes of the mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Rotation about the vertical, growing toward east from north.
    Azimuth,
    /// Tilt above the horizon, growing toward zenith.
    Elevation,
}

impl Axis {
    /// Short label used in status messages.
    pub const fn label(self) -> &'static str {
        match self {
            Axis::Azimuth => "Az",
            Axis::Elevation => "Elev",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Drive-train configuration of one axis.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Base steps per motor revolution (200 for 1.8° motors).
    #[serde(default = "default_steps_per_revolution")]
    pub steps_per_revolution: u16,

    /// Driver microstep divisor.
    pub microsteps: Microsteps,

    /// Gearbox ratio between motor shaft and driven shaft.
    pub reduction_ratio: f32,

    /// Nominal period of one step pulse in microseconds.
    pub step_period_us: u32,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,
}

fn default_steps_per_revolution() -> u16 {
    200
}

impl AxisConfig {
    /// Flight configuration of the azimuth axis.
    pub fn azimuth() -> Self {
        Self {
            steps_per_revolution: 200,
            microsteps: Microsteps::SIXTY_FOURTH,
            reduction_ratio: 200.0,
            step_period_us: 20,
            invert_direction: false,
        }
    }

    /// Flight configuration of the elevation axis.
    ///
    /// The elevation driver is wired so that its direction line high lowers
    /// the dish.
    pub fn elevation() -> Self {
        Self {
            steps_per_revolution: 200,
            microsteps: Microsteps::ONE_TWENTY_EIGHTH,
            reduction_ratio: 140.0,
            step_period_us: 30,
            invert_direction: true,
        }
    }

    /// Driver pulses per full motor-shaft revolution.
    pub fn microsteps_per_motor_turn(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }
}
