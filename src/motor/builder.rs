//! Builder pattern for StepperAxis.

use embedded_hal::digital::OutputPin;

use crate::config::{Axis, AxisConfig, MechanicalRatio, MotionConfig, PointingConfig};
use crate::error::{ConfigError, Error, Result};

use super::driver::{StepperAxis, StepperDrive};

/// Builder for creating StepperAxis instances.
pub struct StepperAxisBuilder<STEP, DIR, EN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
{
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    enable_pin: Option<EN>,
    axis: Option<Axis>,
    ratio: Option<MechanicalRatio>,
    step_period_us: Option<u32>,
    motion: MotionConfig,
    invert_direction: bool,
}

impl<STEP, DIR, EN> Default for StepperAxisBuilder<STEP, DIR, EN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<STEP, DIR, EN> StepperAxisBuilder<STEP, DIR, EN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            step_pin: None,
            dir_pin: None,
            enable_pin: None,
            axis: None,
            ratio: None,
            step_period_us: None,
            motion: MotionConfig::default(),
            invert_direction: false,
        }
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the ENABLE pin.
    pub fn enable_pin(mut self, pin: EN) -> Self {
        self.enable_pin = Some(pin);
        self
    }

    /// Set which axis the driver moves.
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Set the mechanical ratio.
    pub fn ratio(mut self, ratio: MechanicalRatio) -> Self {
        self.ratio = Some(ratio);
        self
    }

    /// Set the nominal pulse period.
    pub fn step_period_us(mut self, period_us: u32) -> Self {
        self.step_period_us = Some(period_us);
        self
    }

    /// Set the short-burst slowdown.
    pub fn motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Configure from an AxisConfig.
    pub fn from_axis_config(mut self, config: &AxisConfig) -> Self {
        self.ratio = Some(MechanicalRatio::from_config(config));
        self.step_period_us = Some(config.step_period_us);
        self.invert_direction = config.invert_direction;
        self
    }

    /// Configure from PointingConfig for the given axis.
    pub fn from_config(self, config: &PointingConfig, axis: Axis) -> Self {
        let axis_config = match axis {
            Axis::Azimuth => &config.azimuth,
            Axis::Elevation => &config.elevation,
        };
        self.axis(axis)
            .motion(config.motion)
            .from_axis_config(axis_config)
    }

    /// Build the StepperAxis.
    ///
    /// The driver starts de-energized.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or the ENABLE pin
    /// cannot be driven low.
    pub fn build(self) -> Result<StepperAxis<STEP, DIR, EN>> {
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;
        let enable_pin = self
            .enable_pin
            .ok_or(Error::Config(ConfigError::MissingField("enable_pin")))?;
        let axis = self
            .axis
            .ok_or(Error::Config(ConfigError::MissingField("axis")))?;
        let ratio = self
            .ratio
            .ok_or(Error::Config(ConfigError::MissingField("ratio")))?;
        let step_period_us = self
            .step_period_us
            .ok_or(Error::Config(ConfigError::MissingField("step_period_us")))?;

        let mut stepper = StepperAxis::new(
            step_pin,
            dir_pin,
            enable_pin,
            axis,
            ratio,
            step_period_us,
            self.motion,
            self.invert_direction,
        );
        stepper.disable()?;
        Ok(stepper)
    }
}
