//! Step bursts: how many pulses, which way, how fast.

use crate::config::units::Steps;
use crate::config::MotionConfig;

/// Direction of motor motion, in encoder-positive terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward increasing encoder ticks.
    Forward,
    /// Toward decreasing encoder ticks.
    Backward,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// A run of identical pulses on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepBurst {
    /// Number of pulses.
    pub steps: u32,

    /// Direction of every pulse.
    pub direction: Direction,

    /// Full period of one pulse in microseconds, slowdown included.
    pub pulse_period_us: u32,
}

impl StepBurst {
    /// Plan a burst from a signed step count.
    ///
    /// Bursts shorter than the slowdown threshold get their period
    /// multiplied by the slowdown factor so that short corrections do not
    /// lose steps to inertia or backlash.
    pub fn plan(steps: Steps, base_period_us: u32, motion: &MotionConfig) -> Self {
        let count = steps.abs().min(u32::MAX as u64) as u32;
        let pulse_period_us = if count < motion.slowdown_threshold_steps {
            base_period_us.saturating_mul(motion.slowdown_factor)
        } else {
            base_period_us
        };

        Self {
            steps: count,
            direction: Direction::from_steps(steps.0),
            pulse_period_us,
        }
    }

    /// A burst with no pulses.
    pub fn idle(base_period_us: u32) -> Self {
        Self {
            steps: 0,
            direction: Direction::Forward,
            pulse_period_us: base_period_us,
        }
    }

    /// Check if this burst moves nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Signed step count.
    #[inline]
    pub fn signed_steps(&self) -> Steps {
        Steps(self.steps as i64 * self.direction.sign())
    }

    /// Total duration of the burst in microseconds.
    #[inline]
    pub fn duration_us(&self) -> u64 {
        self.steps as u64 * self.pulse_period_us as u64
    }
}

/// Split a pulse period into its high and low holds.
#[inline]
pub fn half_periods(period_us: u32) -> (u32, u32) {
    let high = period_us / 2;
    (high, period_us - high)
}
