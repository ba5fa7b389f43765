//! Mechanical ratio derived from axis configuration.

use super::axis::AxisConfig;
use super::units::{Steps, ENCODERS_MAX};

/// Conversion between encoder ticks on the driven shaft and driver pulses.
///
/// Computed once at construction and fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MechanicalRatio {
    /// Gearbox ratio between motor shaft and driven shaft.
    pub reduction_ratio: f32,

    /// Driver pulses per motor-shaft revolution.
    pub microsteps_per_motor_turn: u32,
}

impl MechanicalRatio {
    /// Create a ratio from its two factors.
    pub const fn new(reduction_ratio: f32, microsteps_per_motor_turn: u32) -> Self {
        Self {
            reduction_ratio,
            microsteps_per_motor_turn,
        }
    }

    /// Compute the ratio from axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        Self::new(config.reduction_ratio, config.microsteps_per_motor_turn())
    }

    /// Driver pulses for one full turn of the driven shaft.
    #[inline]
    pub fn steps_per_output_turn(&self) -> Steps {
        Steps((self.microsteps_per_motor_turn as f64 * self.reduction_ratio as f64) as i64)
    }

    /// Convert a signed tick delta into driver pulses, truncating toward zero.
    ///
    /// The truncated remainder is below one pulse and is picked up by the
    /// next closed-loop command.
    #[inline]
    pub fn ticks_to_steps(&self, delta_ticks: i64) -> Steps {
        let turns = delta_ticks as f64 / ENCODERS_MAX as f64;
        Steps((turns * self.reduction_ratio as f64 * self.microsteps_per_motor_turn as f64) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_per_output_turn() {
        let ratio = MechanicalRatio::from_config(&AxisConfig::azimuth());
        // 12 800 * 200
        assert_eq!(ratio.steps_per_output_turn(), Steps(2_560_000));
    }

    #[test]
    fn test_ticks_to_steps_truncates_toward_zero() {
        let ratio = MechanicalRatio::new(1.0, 3);
        // ENCODERS_MAX is divisible by 3, so a third of a turn is exactly one pulse
        let one_pulse = ENCODERS_MAX as i64 / 3;
        assert_eq!(ratio.ticks_to_steps(one_pulse), Steps(1));
        assert_eq!(ratio.ticks_to_steps(one_pulse - 1), Steps(0));
        assert_eq!(ratio.ticks_to_steps(-(one_pulse - 1)), Steps(0));
        assert_eq!(ratio.ticks_to_steps(-one_pulse), Steps(-1));
        assert_eq!(ratio.ticks_to_steps(ENCODERS_MAX as i64), Steps(3));
    }

    #[test]
    fn test_half_turn_elevation() {
        let ratio = MechanicalRatio::from_config(&AxisConfig::elevation());
        let steps = ratio.ticks_to_steps(-(ENCODERS_MAX as i64) / 2);
        // half of 25 600 * 140, minus the truncated remainder
        assert!((steps.0 + 1_792_000).abs() <= 2);
    }
}
