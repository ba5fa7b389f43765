//! Unit tests for configuration validation.

use antenna_pointing::config::{parse_config, validate_config, PointingConfig};
use antenna_pointing::error::{ConfigError, Error};
use antenna_pointing::{Degrees, Ticks, ENCODERS_MAX};

/// Flight values are valid.
#[test]
fn test_flight_config_is_valid() {
    assert!(validate_config(&PointingConfig::default()).is_ok());
}

/// A zero step period would stall the pulse train.
#[test]
fn test_zero_step_period() {
    let mut config = PointingConfig::default();
    config.azimuth.step_period_us = 0;

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepPeriod(0)))
    );
}

/// Negative gearbox ratios are rejected.
#[test]
fn test_negative_reduction_ratio() {
    let mut config = PointingConfig::default();
    config.azimuth.reduction_ratio = -200.0;

    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidReductionRatio(_)))
    ));
}

/// A slowdown factor of zero would make short bursts instantaneous.
#[test]
fn test_zero_slowdown_factor() {
    let mut config = PointingConfig::default();
    config.motion.slowdown_factor = 0;

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSlowdownFactor(0)))
    );
}

/// Margins must leave a usable elevation band.
#[test]
fn test_margins_out_of_range() {
    let mut config = PointingConfig::default();
    config.limits.zenith_margin = Degrees(45.0);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidMargin(_)))
    ));

    let mut config = PointingConfig::default();
    config.limits.horizon_margin = Degrees(-1.0);
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidMargin(_)))
    ));
}

/// The north reference must be an encoder value.
#[test]
fn test_north_offset_out_of_range() {
    let mut config = PointingConfig::default();
    config.calibration.north_offset_ticks = Ticks(ENCODERS_MAX + 5);

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::TicksOutOfRange(ENCODERS_MAX + 5)))
    );
}

/// At least one encoder attempt is required.
#[test]
fn test_zero_attempts() {
    let mut config = PointingConfig::default();
    config.encoder.max_attempts = 0;

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidAttempts(0)))
    );
}

/// Chip select must be held long enough for the part to latch.
#[test]
fn test_short_settle_time() {
    let mut config = PointingConfig::default();
    config.encoder.settle_us = 9;

    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidSettleTime(9)))
    );
}

/// Parsing runs validation too.
#[test]
fn test_parse_rejects_invalid_values() {
    let result = parse_config(
        r#"
[limits]
max_azimuth_rotation_deg = 180.0
"#,
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidRotationBound(_)))
    ));
}
