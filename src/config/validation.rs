//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::units::{Ticks, ENCODERS_MAX};
use super::{AxisConfig, PointingConfig};

/// Shortest chip-select hold before the encoder may be sampled.
pub const MIN_SETTLE_US: u32 = 10;

/// Validate a pointing configuration.
///
/// Checks:
/// - Reduction ratios are positive and step periods non-zero
/// - Slowdown factor is at least 1
/// - Safety margins are within [0, 45) degrees
/// - The cable-wrap bound allows at least one full turn
/// - Reference ticks are inside the encoder range
/// - The encoder is allowed at least one attempt
/// - Chip select is held at least [`MIN_SETTLE_US`] before sampling
pub fn validate_config(config: &PointingConfig) -> Result<()> {
    validate_axis(&config.azimuth)?;
    validate_axis(&config.elevation)?;

    if config.motion.slowdown_factor == 0 {
        return Err(Error::Config(ConfigError::InvalidSlowdownFactor(
            config.motion.slowdown_factor,
        )));
    }

    for margin in [config.limits.horizon_margin, config.limits.zenith_margin] {
        if !(0.0..45.0).contains(&margin.0) {
            return Err(Error::Config(ConfigError::InvalidMargin(margin.0)));
        }
    }

    if config.limits.max_azimuth_rotation.0 <= 360.0 {
        return Err(Error::Config(ConfigError::InvalidRotationBound(
            config.limits.max_azimuth_rotation.0,
        )));
    }

    validate_ticks(config.calibration.north_offset_ticks)?;
    validate_ticks(config.calibration.zenith_ticks)?;

    if config.encoder.max_attempts == 0 {
        return Err(Error::Config(ConfigError::InvalidAttempts(
            config.encoder.max_attempts,
        )));
    }

    if config.encoder.settle_us < MIN_SETTLE_US {
        return Err(Error::Config(ConfigError::InvalidSettleTime(
            config.encoder.settle_us,
        )));
    }

    Ok(())
}

fn validate_axis(axis: &AxisConfig) -> Result<()> {
    if axis.reduction_ratio.is_nan() || axis.reduction_ratio <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidReductionRatio(
            axis.reduction_ratio,
        )));
    }

    if axis.step_period_us == 0 {
        return Err(Error::Config(ConfigError::InvalidStepPeriod(axis.step_period_us)));
    }

    Ok(())
}

fn validate_ticks(ticks: Ticks) -> Result<()> {
    if ticks.0 >= ENCODERS_MAX {
        return Err(Error::Config(ConfigError::TicksOutOfRange(ticks.0)));
    }
    Ok(())
}
