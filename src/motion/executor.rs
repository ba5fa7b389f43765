//! Coordinated dual-axis step generation.
//!
//! Both axes start together. While both still have pulses to issue, each
//! pulse is paired and timed by the slower of the two periods. The axis
//! with the longer burst then finishes alone at its own period.

use embedded_hal::delay::DelayNs;

use crate::config::Axis;
use crate::error::Result;
use crate::motor::StepperDrive;

use super::profile::{half_periods, StepBurst};

/// Two-phase schedule for moving both axes together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoordinatedMove {
    /// Azimuth burst.
    pub azimuth: StepBurst,

    /// Elevation burst.
    pub elevation: StepBurst,
}

/// The paired phase of a [`CoordinatedMove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PairedPhase {
    /// Pulses issued to both axes.
    pub steps: u32,
    /// Period of each paired pulse.
    pub pulse_period_us: u32,
}

/// The single-axis tail of a [`CoordinatedMove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TailPhase {
    /// Axis that still has pulses left.
    pub axis: Axis,
    /// Pulses issued to that axis alone.
    pub steps: u32,
    /// That axis's own period.
    pub pulse_period_us: u32,
}

impl CoordinatedMove {
    /// Schedule two bursts.
    pub fn new(azimuth: StepBurst, elevation: StepBurst) -> Self {
        Self { azimuth, elevation }
    }

    /// Pulses shared by both axes, timed by the slower one.
    pub fn paired(&self) -> PairedPhase {
        PairedPhase {
            steps: self.azimuth.steps.min(self.elevation.steps),
            pulse_period_us: self
                .azimuth
                .pulse_period_us
                .max(self.elevation.pulse_period_us),
        }
    }

    /// Remaining pulses of the longer burst, if any.
    pub fn tail(&self) -> Option<TailPhase> {
        let common = self.paired().steps;
        let (axis, burst) = if self.azimuth.steps >= self.elevation.steps {
            (Axis::Azimuth, &self.azimuth)
        } else {
            (Axis::Elevation, &self.elevation)
        };
        let extra = burst.steps - common;
        (extra > 0).then_some(TailPhase {
            axis,
            steps: extra,
            pulse_period_us: burst.pulse_period_us,
        })
    }

    /// Total duration in microseconds.
    pub fn duration_us(&self) -> u64 {
        let paired = self.paired();
        let paired_us = paired.steps as u64 * paired.pulse_period_us as u64;
        let tail_us = self
            .tail()
            .map(|t| t.steps as u64 * t.pulse_period_us as u64)
            .unwrap_or(0);
        paired_us + tail_us
    }

    /// Drive both axes to completion (blocking).
    ///
    /// A pin failure stops the move where it is; pulses already issued are
    /// not undone. Both step lines are left low.
    pub fn execute<AZ, EL, DELAY>(&self, azimuth: &mut AZ, elevation: &mut EL, delay: &mut DELAY) -> Result<()>
    where
        AZ: StepperDrive,
        EL: StepperDrive,
        DELAY: DelayNs,
    {
        if !self.azimuth.is_empty() {
            azimuth.set_direction(self.azimuth.direction)?;
        }
        if !self.elevation.is_empty() {
            elevation.set_direction(self.elevation.direction)?;
        }

        let paired = self.paired();
        let (high_us, low_us) = half_periods(paired.pulse_period_us);
        for _ in 0..paired.steps {
            azimuth.rise_edge()?;
            if let Err(e) = elevation.rise_edge() {
                // Azimuth is mid-pulse; bring its line back down.
                let _ = azimuth.fall_edge();
                return Err(e);
            }
            delay.delay_us(high_us);
            let lowered = azimuth.fall_edge();
            elevation.fall_edge()?;
            lowered?;
            delay.delay_us(low_us);
        }

        if let Some(tail) = self.tail() {
            match tail.axis {
                Axis::Azimuth => azimuth.pulse_train(tail.steps, tail.pulse_period_us, delay)?,
                Axis::Elevation => elevation.pulse_train(tail.steps, tail.pulse_period_us, delay)?,
            }
        }

        Ok(())
    }
}
