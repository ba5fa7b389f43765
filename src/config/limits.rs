//! Safety limits: elevation end-stops and azimuth cable wrap.

use serde::Deserialize;

use super::units::Degrees;

/// Mechanical safety limits of the mount.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct SafetyLimits {
    /// Lowest allowed elevation above the horizon, in degrees.
    #[serde(rename = "horizon_margin_deg")]
    pub horizon_margin: Degrees,

    /// Closest allowed approach to zenith, in degrees.
    #[serde(rename = "zenith_margin_deg")]
    pub zenith_margin: Degrees,

    /// Cumulative azimuth rotation from the zero-wrap reference that
    /// triggers an untangle, in either direction.
    #[serde(rename = "max_azimuth_rotation_deg")]
    pub max_azimuth_rotation: Degrees,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            horizon_margin: Degrees(5.0),
            zenith_margin: Degrees(2.0),
            // plus or minus (nearly) 1.25 turns
            max_azimuth_rotation: Degrees(360.0 + 100.0),
        }
    }
}

impl SafetyLimits {
    /// Lowest commandable elevation.
    #[inline]
    pub fn min_elevation(&self) -> Degrees {
        self.horizon_margin
    }

    /// Highest commandable elevation.
    #[inline]
    pub fn max_elevation(&self) -> Degrees {
        Degrees(90.0 - self.zenith_margin.0)
    }

    /// Clamp an elevation command into the allowed band.
    #[inline]
    pub fn clamp_elevation(&self, elevation: Degrees) -> Degrees {
        elevation.clamp(self.min_elevation(), self.max_elevation())
    }

    /// `true` if a predicted wrap angle is past the bound in either direction.
    #[inline]
    pub fn exceeds_wrap(&self, wrap: Degrees) -> bool {
        wrap.0 > self.max_azimuth_rotation.0 || wrap.0 < -self.max_azimuth_rotation.0
    }
}
