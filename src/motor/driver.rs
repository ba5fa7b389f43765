//! Stepper axis driver.
//!
//! Generic over embedded-hal 1.0 pin types. The delay provider is borrowed
//! per burst so that the coordinated executor can time two axes with one
//! clock.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Steps;
use crate::config::{Axis, MechanicalRatio, MotionConfig};
use crate::error::{MotorError, Result};
use crate::motion::{half_periods, Direction, StepBurst};

/// Signal-level control of one stepper driver.
///
/// [`StepperAxis`] is the embedded-hal implementation; the controller and
/// the coordinated executor only depend on this trait.
pub trait StepperDrive {
    /// Which axis the driver moves.
    fn axis(&self) -> Axis;

    /// Gearbox and microstep ratio.
    fn ratio(&self) -> &MechanicalRatio;

    /// Whether the power stage is on.
    fn is_enabled(&self) -> bool;

    /// Net pulses issued since construction (forward minus backward).
    ///
    /// Informational only; the encoder is the authority on position.
    fn steps_issued(&self) -> Steps;

    /// Energize the driver.
    fn enable(&mut self) -> Result<()>;

    /// De-energize the driver (safe idle).
    fn disable(&mut self) -> Result<()>;

    /// Set the direction signal.
    fn set_direction(&mut self, direction: Direction) -> Result<()>;

    /// Raise the step signal.
    fn rise_edge(&mut self) -> Result<()>;

    /// Lower the step signal, completing one pulse.
    fn fall_edge(&mut self) -> Result<()>;

    /// Plan a burst for a signed step count, slowdown included.
    fn plan(&self, steps: Steps) -> StepBurst;

    /// Issue `count` pulses in the current direction at a given period.
    fn pulse_train<DELAY: DelayNs>(&mut self, count: u32, period_us: u32, delay: &mut DELAY) -> Result<()> {
        let (high_us, low_us) = half_periods(period_us);
        for _ in 0..count {
            self.rise_edge()?;
            delay.delay_us(high_us);
            self.fall_edge()?;
            delay.delay_us(low_us);
        }
        Ok(())
    }

    /// Issue a signed number of pulses (blocking), slowdown included.
    fn step<DELAY: DelayNs>(&mut self, steps: Steps, delay: &mut DELAY) -> Result<()> {
        let burst = self.plan(steps);
        if burst.is_empty() {
            return Ok(());
        }
        self.set_direction(burst.direction)?;
        self.pulse_train(burst.steps, burst.pulse_period_us, delay)
    }
}

/// One stepper driver: step, direction and enable signals.
///
/// Generic over:
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `EN`: ENABLE pin type (must implement `OutputPin`, high = energized)
pub struct StepperAxis<STEP, DIR, EN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
{
    /// STEP pin (pulse to move one step).
    step_pin: STEP,

    /// DIR pin.
    dir_pin: DIR,

    /// ENABLE pin (driver power stage).
    enable_pin: EN,

    /// Which axis this driver moves.
    axis: Axis,

    /// Gearbox and microstep ratio.
    ratio: MechanicalRatio,

    /// Nominal pulse period in microseconds.
    step_period_us: u32,

    /// Short-burst slowdown.
    motion: MotionConfig,

    /// Whether direction pin logic is inverted.
    invert_direction: bool,

    /// Current direction (cached to avoid unnecessary pin writes).
    current_direction: Option<Direction>,

    /// Whether the power stage is on.
    enabled: bool,

    /// Net pulses since construction, open-loop telemetry only.
    steps_issued: i64,
}

impl<STEP, DIR, EN> StepperAxis<STEP, DIR, EN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        step_pin: STEP,
        dir_pin: DIR,
        enable_pin: EN,
        axis: Axis,
        ratio: MechanicalRatio,
        step_period_us: u32,
        motion: MotionConfig,
        invert_direction: bool,
    ) -> Self {
        Self {
            step_pin,
            dir_pin,
            enable_pin,
            axis,
            ratio,
            step_period_us,
            motion,
            invert_direction,
            current_direction: None,
            enabled: false,
            steps_issued: 0,
        }
    }

    /// Nominal pulse period in microseconds.
    #[inline]
    pub fn step_period_us(&self) -> u32 {
        self.step_period_us
    }

    fn pin_error(&self) -> MotorError {
        MotorError::PinError { axis: self.axis }
    }
}

impl<STEP, DIR, EN> StepperDrive for StepperAxis<STEP, DIR, EN>
where
    STEP: OutputPin,
    DIR: OutputPin,
    EN: OutputPin,
{
    #[inline]
    fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    fn ratio(&self) -> &MechanicalRatio {
        &self.ratio
    }

    #[inline]
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    fn steps_issued(&self) -> Steps {
        Steps(self.steps_issued)
    }

    fn enable(&mut self) -> Result<()> {
        self.enable_pin.set_high().map_err(|_| self.pin_error())?;
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) -> Result<()> {
        self.enable_pin.set_low().map_err(|_| self.pin_error())?;
        self.enabled = false;
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Forward => !self.invert_direction,
            Direction::Backward => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| self.pin_error())?;
        } else {
            self.dir_pin.set_low().map_err(|_| self.pin_error())?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }

    #[inline]
    fn rise_edge(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| self.pin_error())?;
        Ok(())
    }

    #[inline]
    fn fall_edge(&mut self) -> Result<()> {
        self.step_pin.set_low().map_err(|_| self.pin_error())?;
        let sign = self.current_direction.unwrap_or(Direction::Forward).sign();
        self.steps_issued += sign;
        Ok(())
    }

    fn plan(&self, steps: Steps) -> StepBurst {
        StepBurst::plan(steps, self.step_period_us, &self.motion)
    }
}
