//! Pointing configuration - root configuration structure.

use serde::Deserialize;

use super::axis::AxisConfig;
use super::limits::SafetyLimits;
use super::units::{Degrees, Ticks, ENCODERS_MAX};

/// Root configuration structure from TOML.
///
/// Every section is optional; missing sections take the flight values.
#[derive(Debug, Clone, Deserialize)]
pub struct PointingConfig {
    /// Azimuth drive train.
    #[serde(default = "AxisConfig::azimuth")]
    pub azimuth: AxisConfig,

    /// Elevation drive train.
    #[serde(default = "AxisConfig::elevation")]
    pub elevation: AxisConfig,

    /// Step timing shared by both axes.
    #[serde(default)]
    pub motion: MotionConfig,

    /// Reference positions and start-up flush.
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Safety limits.
    #[serde(default)]
    pub limits: SafetyLimits,

    /// Standby supervision.
    #[serde(default)]
    pub standby: StandbyConfig,

    /// Encoder read policy.
    #[serde(default)]
    pub encoder: EncoderConfig,
}

impl Default for PointingConfig {
    fn default() -> Self {
        Self {
            azimuth: AxisConfig::azimuth(),
            elevation: AxisConfig::elevation(),
            motion: MotionConfig::default(),
            calibration: CalibrationConfig::default(),
            limits: SafetyLimits::default(),
            standby: StandbyConfig::default(),
            encoder: EncoderConfig::default(),
        }
    }
}

/// Short-move slowdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct MotionConfig {
    /// Bursts with fewer pulses than this run slower.
    pub slowdown_threshold_steps: u32,

    /// Pulse period multiplier for short bursts.
    pub slowdown_factor: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            slowdown_threshold_steps: 2000,
            slowdown_factor: 4,
        }
    }
}

/// Reference positions and the start-up bus flush.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct CalibrationConfig {
    /// Azimuth encoder value when pointing north.
    pub north_offset_ticks: Ticks,

    /// Elevation encoder value when pointing at zenith.
    pub zenith_ticks: Ticks,

    /// Dummy reads per encoder before the turn count is captured.
    pub flush_reads: u8,

    /// Pause after each dummy read, in milliseconds.
    pub flush_delay_ms: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            north_offset_ticks: Ticks(0),
            zenith_ticks: Ticks(715_671),
            flush_reads: 10,
            flush_delay_ms: 50,
        }
    }
}

impl CalibrationConfig {
    /// Elevation encoder value at the horizon, a quarter turn below zenith.
    pub fn horizon_ticks(&self) -> Ticks {
        Ticks::wrapping(self.zenith_ticks.0 as i64 - (ENCODERS_MAX / 4) as i64)
    }
}

/// Standby supervision thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct StandbyConfig {
    /// Elevation drift from zenith that triggers a zenith park, in degrees.
    #[serde(rename = "zenith_correction_threshold_deg")]
    pub zenith_correction_threshold: Degrees,
}

impl Default for StandbyConfig {
    fn default() -> Self {
        Self {
            // zenith margin plus ten degrees
            zenith_correction_threshold: Degrees(12.0),
        }
    }
}

/// Encoder read policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct EncoderConfig {
    /// Attempts per read before an ERROR is surfaced.
    pub max_attempts: u8,

    /// Pause between failed attempts, in milliseconds.
    pub retry_delay_ms: u32,

    /// Chip-select setup time before the first word, in microseconds.
    pub settle_us: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_delay_ms: 50,
            settle_us: 10,
        }
    }
}
