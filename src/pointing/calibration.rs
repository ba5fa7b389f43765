//! Reference positions of both axes.

use crate::config::units::{Ticks, ENCODERS_MAX};
use crate::config::CalibrationConfig;

use super::geometry::normalize;

const HALF_RANGE: i64 = (ENCODERS_MAX / 2) as i64;

/// Reference of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisCalibration {
    /// Encoder value of the axis's zero angle (north, or the horizon).
    pub reference_offset: Ticks,

    /// Hardware turn count captured at start-up (azimuth only).
    pub initial_turn_count: Option<i32>,
}

/// Reference positions of the mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    azimuth: AxisCalibration,
    elevation: AxisCalibration,
}

impl Calibration {
    /// Build from configuration and the azimuth turn count read at start-up.
    pub fn capture(config: &CalibrationConfig, initial_turn_count: i32) -> Self {
        Self {
            azimuth: AxisCalibration {
                reference_offset: normalize(config.north_offset_ticks.0 as i64),
                initial_turn_count: Some(initial_turn_count),
            },
            elevation: AxisCalibration {
                reference_offset: config.horizon_ticks(),
                initial_turn_count: None,
            },
        }
    }

    /// Azimuth reference.
    #[inline]
    pub fn azimuth(&self) -> &AxisCalibration {
        &self.azimuth
    }

    /// Elevation reference.
    #[inline]
    pub fn elevation(&self) -> &AxisCalibration {
        &self.elevation
    }

    /// Encoder value when pointing north.
    #[inline]
    pub fn north(&self) -> Ticks {
        self.azimuth.reference_offset
    }

    /// Encoder value at the horizon.
    #[inline]
    pub fn horizon(&self) -> Ticks {
        self.elevation.reference_offset
    }

    /// Encoder value at zenith, a quarter turn above the horizon.
    #[inline]
    pub fn zenith(&self) -> Ticks {
        normalize(self.horizon().0 as i64 + (ENCODERS_MAX / 4) as i64)
    }

    /// Turn count that anchors the cable-wrap reference.
    #[inline]
    pub fn initial_turn_count(&self) -> i32 {
        self.azimuth.initial_turn_count.unwrap_or(0)
    }

    /// Move the north reference and keep the cable-wrap anchor consistent.
    ///
    /// A move of more than half a turn is taken as crossing the encoder
    /// zero, so the anchor turn count shifts by one in the matching
    /// direction. Returns the applied turn adjustment.
    pub fn set_north_offset(&mut self, north: Ticks) -> i32 {
        let north = normalize(north.0 as i64);
        let moved = north.0 as i64 - self.north().0 as i64;
        let adjustment = if moved > HALF_RANGE {
            -1
        } else if moved < -HALF_RANGE {
            1
        } else {
            0
        };

        self.azimuth.reference_offset = north;
        self.azimuth.initial_turn_count = Some(self.initial_turn_count() + adjustment);
        adjustment
    }

    /// Move the zenith reference; the horizon follows a quarter turn below.
    pub fn set_zenith_offset(&mut self, zenith: Ticks) {
        self.elevation.reference_offset =
            normalize(zenith.0 as i64 - (ENCODERS_MAX / 4) as i64);
    }
}
