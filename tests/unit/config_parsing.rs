//! Unit tests for TOML configuration parsing.

use antenna_pointing::config::{load_config, parse_config, PointingConfig};
use antenna_pointing::{Degrees, Microsteps, Ticks};

const MOUNT_TOML: &str = r#"
[azimuth]
microsteps = 16
reduction_ratio = 100.0
step_period_us = 25

[elevation]
steps_per_revolution = 400
microsteps = 32
reduction_ratio = 90.0
step_period_us = 40
invert_direction = true

[motion]
slowdown_threshold_steps = 500
slowdown_factor = 2

[calibration]
north_offset_ticks = 12345
zenith_ticks = 700000
flush_reads = 3
flush_delay_ms = 5

[limits]
horizon_margin_deg = 10.0
zenith_margin_deg = 1.5
max_azimuth_rotation_deg = 540.0

[standby]
zenith_correction_threshold_deg = 8.0

[encoder]
max_attempts = 4
retry_delay_ms = 20
settle_us = 25
"#;

/// Every section of a complete file is read.
#[test]
fn test_parse_full_mount_config() {
    let config = parse_config(MOUNT_TOML).expect("Failed to parse TOML");

    assert_eq!(config.azimuth.steps_per_revolution, 200);
    assert_eq!(config.azimuth.microsteps, Microsteps::SIXTEENTH);
    assert_eq!(config.azimuth.reduction_ratio, 100.0);
    assert!(!config.azimuth.invert_direction);

    assert_eq!(config.elevation.steps_per_revolution, 400);
    assert_eq!(config.elevation.microsteps_per_motor_turn(), 12_800);
    assert!(config.elevation.invert_direction);

    assert_eq!(config.motion.slowdown_threshold_steps, 500);
    assert_eq!(config.calibration.north_offset_ticks, Ticks(12_345));
    assert_eq!(config.calibration.flush_reads, 3);
    assert_eq!(config.limits.horizon_margin, Degrees(10.0));
    assert_eq!(config.limits.max_elevation(), Degrees(88.5));
    assert_eq!(config.standby.zenith_correction_threshold, Degrees(8.0));
    assert_eq!(config.encoder.max_attempts, 4);
    assert_eq!(config.encoder.settle_us, 25);
}

/// Sections left out take the flight values.
#[test]
fn test_missing_sections_use_flight_values() {
    let config = parse_config(
        r#"
[limits]
horizon_margin_deg = 7.0
"#,
    )
    .expect("Failed to parse TOML");

    let flight = PointingConfig::default();
    assert_eq!(config.limits.horizon_margin, Degrees(7.0));
    assert_eq!(config.limits.zenith_margin, flight.limits.zenith_margin);
    assert_eq!(config.azimuth.step_period_us, flight.azimuth.step_period_us);
    assert_eq!(config.calibration, flight.calibration);
    assert_eq!(config.encoder, flight.encoder);
}

/// An axis section must name its drive train.
#[test]
fn test_axis_section_requires_ratio() {
    let result = parse_config(
        r#"
[azimuth]
microsteps = 64
step_period_us = 20
"#,
    );
    assert!(result.is_err());
}

/// Microstep values are checked while parsing.
#[test]
fn test_invalid_microsteps_rejected() {
    let result = parse_config(
        r#"
[elevation]
microsteps = 3
reduction_ratio = 140.0
step_period_us = 30
"#,
    );
    assert!(result.is_err());
}

/// Loading goes through the file system and validation.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("antenna-pointing-{}.toml", std::process::id()));
    std::fs::write(&path, MOUNT_TOML).expect("Failed to write config");

    let config = load_config(&path).expect("Failed to load config");
    assert_eq!(config.calibration.zenith_ticks, Ticks(700_000));

    std::fs::remove_file(&path).ok();
}

/// A missing file is an I/O error, not a panic.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/antenna-pointing.toml");
    assert!(result.is_err());
}
