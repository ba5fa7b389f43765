//! Closed-loop pointing of the two-axis mount.
//!
//! Every command starts from a fresh encoder reading. The controller owns
//! the shared SPI bus and the single delay provider; the encoders and the
//! motors borrow them per call.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::config::units::{Degrees, Steps, Ticks};
use crate::config::{validate_config, Axis, PointingConfig, SafetyLimits, StandbyConfig};
use crate::encoder::{AbsoluteEncoder, EncoderSample};
use crate::error::{EncoderError, ErrorStatus, Result};
use crate::motion::CoordinatedMove;
use crate::motor::{AxisMode, StepperDrive};

use super::calibration::Calibration;
use super::geometry::{angle_to_ticks, predicted_wrap, shortest_delta, whole_turns};
use super::standby;

/// Peripherals handed over to a [`PointingController`].
pub struct MountHardware<SPI, DELAY, AZ, EL, ACS, ECS> {
    /// Bus shared by both encoders (16-bit words, [`crate::encoder::SPI_MODE`]).
    pub spi: SPI,
    /// Blocking delay used for pulse timing and encoder retries.
    pub delay: DELAY,
    /// Azimuth stepper.
    pub azimuth: AZ,
    /// Elevation stepper.
    pub elevation: EL,
    /// Chip select of the multi-turn azimuth encoder.
    pub azimuth_cs: ACS,
    /// Chip select of the single-turn elevation encoder.
    pub elevation_cs: ECS,
}

/// One axis correction and the encoder status it was computed from.
struct AxisPlan {
    steps: Steps,
    status: ErrorStatus,
}

/// Two-axis azimuth/elevation pointing controller.
pub struct PointingController<SPI, DELAY, AZ, EL, ACS, ECS>
where
    SPI: SpiBus<u16>,
    DELAY: DelayNs,
    AZ: StepperDrive,
    EL: StepperDrive,
    ACS: OutputPin,
    ECS: OutputPin,
{
    spi: SPI,
    delay: DELAY,
    az_motor: AZ,
    elev_motor: EL,
    az_encoder: AbsoluteEncoder<ACS>,
    elev_encoder: AbsoluteEncoder<ECS>,
    calibration: Calibration,
    limits: SafetyLimits,
    standby: StandbyConfig,
    mode: AxisMode,
}

impl<SPI, DELAY, AZ, EL, ACS, ECS> PointingController<SPI, DELAY, AZ, EL, ACS, ECS>
where
    SPI: SpiBus<u16>,
    DELAY: DelayNs,
    AZ: StepperDrive,
    EL: StepperDrive,
    ACS: OutputPin,
    ECS: OutputPin,
{
    /// Bring the mount up.
    ///
    /// Validates the configuration, flushes both encoders with dummy reads,
    /// captures the azimuth turn count that anchors the cable-wrap
    /// reference and energizes both drivers. The controller starts in
    /// [`AxisMode::Active`].
    ///
    /// # Errors
    ///
    /// Invalid configuration, or an azimuth turn count that cannot be read
    /// within the retry budget.
    pub fn new(config: &PointingConfig, hardware: MountHardware<SPI, DELAY, AZ, EL, ACS, ECS>) -> Result<Self> {
        validate_config(config)?;

        let MountHardware {
            mut spi,
            mut delay,
            azimuth: mut az_motor,
            elevation: mut elev_motor,
            azimuth_cs,
            elevation_cs,
        } = hardware;

        let mut az_encoder = AbsoluteEncoder::multi_turn(azimuth_cs, Axis::Azimuth, config.encoder)?;
        let mut elev_encoder = AbsoluteEncoder::single_turn(elevation_cs, Axis::Elevation, config.encoder)?;

        // The first frames after power-up are stale.
        let flush = &config.calibration;
        for _ in 0..flush.flush_reads {
            let _ = az_encoder.read_once(&mut spi, &mut delay);
            delay.delay_ms(flush.flush_delay_ms);
            let _ = elev_encoder.read_once(&mut spi, &mut delay);
            delay.delay_ms(flush.flush_delay_ms);
        }

        let (turns, _) = az_encoder.read_turn_count(&mut spi, &mut delay)?;
        info!("azimuth turn count at start-up: {}", turns);

        az_motor.enable()?;
        elev_motor.enable()?;

        Ok(Self {
            spi,
            delay,
            az_motor,
            elev_motor,
            az_encoder,
            elev_encoder,
            calibration: Calibration::capture(&config.calibration, turns),
            limits: config.limits,
            standby: config.standby,
            mode: AxisMode::Active,
        })
    }

    /// Point at an azimuth and elevation, in degrees.
    ///
    /// Azimuth is measured clockwise from north and wrapped into [0, 360).
    /// Elevation is clamped into the safe band. Both axes move together.
    ///
    /// An encoder failure on azimuth aborts the command before anything
    /// moves. A failure on elevation still lets the azimuth correction run.
    /// On success the status of the last encoder read is returned.
    pub fn point_to(&mut self, azimuth: Degrees, elevation: Degrees) -> ErrorStatus {
        if !azimuth.0.is_finite() || !elevation.0.is_finite() {
            return ErrorStatus::error("pointing command is not a finite angle");
        }
        if let Err(e) = self.activate() {
            return e.into();
        }

        let az_plan = match self.plan_azimuth(azimuth) {
            Ok(plan) => plan,
            Err(e) => return e.into(),
        };

        match self.plan_elevation(elevation) {
            Ok(elev_plan) => self.finish(az_plan.steps, elev_plan.steps, elev_plan.status),
            Err(e) => {
                let failed = ErrorStatus::from(e);
                let moved = self.finish(az_plan.steps, Steps(0), ErrorStatus::none());
                if moved.is_error() {
                    ErrorStatus::concat(&failed, &moved)
                } else {
                    failed
                }
            }
        }
    }

    /// Return to north, removing every accumulated whole turn.
    pub fn untangle_north(&mut self) -> ErrorStatus {
        if let Err(e) = self.activate() {
            return e.into();
        }
        match self.plan_untangle() {
            Ok(plan) => self.finish(plan.steps, Steps(0), plan.status),
            Err(e) => e.into(),
        }
    }

    /// Park elevation just short of zenith. Azimuth does not move.
    pub fn point_zenith(&mut self) -> ErrorStatus {
        if let Err(e) = self.activate() {
            return e.into();
        }
        self.park_elevation()
    }

    /// De-energize both drivers and enter standby.
    pub fn standby_enable(&mut self) -> ErrorStatus {
        let status = self.power_down();
        self.enter(AxisMode::Standby);
        status
    }

    /// Energize both drivers and leave standby.
    pub fn standby_disable(&mut self) -> ErrorStatus {
        match self.power_up() {
            Ok(()) => {
                self.enter(AxisMode::Active);
                ErrorStatus::none()
            }
            Err(e) => e.into(),
        }
    }

    /// Periodic supervision while in standby.
    ///
    /// Energizes the drivers, parks elevation if it drifted too far from
    /// zenith, untangles azimuth if the cable wrap is past its bound, then
    /// de-energizes again. Does nothing outside standby.
    pub fn standby_update(&mut self) -> ErrorStatus {
        if self.mode != AxisMode::Standby {
            return ErrorStatus::none();
        }

        if let Err(e) = self.power_up() {
            let released = self.power_down();
            return with_release(e.into(), released);
        }

        let elevation = self.supervise_elevation();
        let azimuth = self.supervise_azimuth();
        let released = self.power_down();

        with_release(standby::aggregate(elevation, azimuth), released)
    }

    /// Move the north reference.
    ///
    /// The cable-wrap anchor is shifted by one turn when the new reference
    /// sits across the encoder zero from the old one.
    pub fn set_north_offset(&mut self, north: Ticks) {
        let adjustment = self.calibration.set_north_offset(north);
        info!("north offset set to {} (turn anchor {})", north.0, adjustment);
    }

    /// Move the zenith reference.
    pub fn set_zenith_offset(&mut self, zenith: Ticks) {
        self.calibration.set_zenith_offset(zenith);
        info!("zenith offset set to {}", zenith.0);
    }

    /// Azimuth in [0, 360) from north.
    pub fn current_azimuth(&mut self) -> (Option<Degrees>, ErrorStatus) {
        match self.az_encoder.read_position(&mut self.spi, &mut self.delay) {
            Ok((position, status)) => (Some(position.degrees_from(self.calibration.north())), status),
            Err(e) => (None, e.into()),
        }
    }

    /// Elevation above the horizon, in (-180, 180].
    pub fn current_elevation(&mut self) -> (Option<Degrees>, ErrorStatus) {
        match self.elev_encoder.read_position(&mut self.spi, &mut self.delay) {
            Ok((position, status)) => (Some(signed_elevation(position, self.calibration.horizon())), status),
            Err(e) => (None, e.into()),
        }
    }

    /// Cumulative azimuth rotation from the zero-wrap reference, in degrees.
    pub fn cable_wrap(&mut self) -> (Option<Degrees>, ErrorStatus) {
        match self.read_azimuth() {
            Ok((position, turns, status)) => (Some(self.wrap_at(position, turns, 0)), status),
            Err(e) => (None, e.into()),
        }
    }

    /// Current power mode.
    #[inline]
    pub fn mode(&self) -> AxisMode {
        self.mode
    }

    /// Reference positions in use.
    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Safety limits in use.
    #[inline]
    pub fn limits(&self) -> &SafetyLimits {
        &self.limits
    }

    /// Azimuth stepper.
    #[inline]
    pub fn azimuth_motor(&self) -> &AZ {
        &self.az_motor
    }

    /// Elevation stepper.
    #[inline]
    pub fn elevation_motor(&self) -> &EL {
        &self.elev_motor
    }

    fn activate(&mut self) -> Result<()> {
        if self.mode == AxisMode::Standby {
            self.power_up()?;
            self.enter(AxisMode::Active);
        }
        Ok(())
    }

    fn enter(&mut self, mode: AxisMode) {
        info!("mode {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
    }

    fn power_up(&mut self) -> Result<()> {
        self.az_motor.enable()?;
        self.elev_motor.enable()
    }

    fn power_down(&mut self) -> ErrorStatus {
        // Try both even if the first one fails.
        let az = self.az_motor.disable();
        let elev = self.elev_motor.disable();
        match az.and(elev) {
            Ok(()) => ErrorStatus::none(),
            Err(e) => e.into(),
        }
    }

    fn read_azimuth(&mut self) -> Result<(Ticks, i32, ErrorStatus)> {
        let EncoderSample { reading, status } = self.az_encoder.read(&mut self.spi, &mut self.delay)?;
        let turns = reading
            .turn_count
            .ok_or(EncoderError::NoTurnCounter { axis: Axis::Azimuth })?;
        Ok((reading.position, turns, status))
    }

    fn wrap_at(&self, position: Ticks, turns: i32, delta: i64) -> Degrees {
        predicted_wrap(
            turns,
            self.calibration.initial_turn_count(),
            position,
            delta,
            self.calibration.north(),
        )
    }

    fn plan_azimuth(&mut self, azimuth: Degrees) -> Result<AxisPlan> {
        let target = angle_to_ticks(azimuth, self.calibration.north());
        let (current, turns, status) = self.read_azimuth()?;
        let delta = shortest_delta(current, target);

        let ratio = *self.az_motor.ratio();
        let mut steps = ratio.ticks_to_steps(delta);

        let wrap = self.wrap_at(current, turns, delta);
        if self.limits.exceeds_wrap(wrap) {
            let turn = ratio.steps_per_output_turn();
            steps = if wrap.0 > 0.0 { steps - turn } else { steps + turn };
            warn!("cable wrap would reach {} deg, unwinding one turn", wrap.0);
        }

        Ok(AxisPlan { steps, status })
    }

    fn plan_elevation(&mut self, elevation: Degrees) -> Result<AxisPlan> {
        let clamped = self.limits.clamp_elevation(elevation);
        if clamped != elevation {
            warn!("elevation {} deg clamped to {} deg", elevation.0, clamped.0);
        }

        let target = angle_to_ticks(clamped, self.calibration.horizon());
        let (current, status) = self.elev_encoder.read_position(&mut self.spi, &mut self.delay)?;
        let delta = shortest_delta(current, target);

        Ok(AxisPlan {
            steps: self.elev_motor.ratio().ticks_to_steps(delta),
            status,
        })
    }

    fn plan_untangle(&mut self) -> Result<AxisPlan> {
        let north = self.calibration.north();
        let (current, turns, status) = self.read_azimuth()?;
        let delta = shortest_delta(current, north);
        let wrap = self.wrap_at(current, turns, delta);

        let ratio = *self.az_motor.ratio();
        let unwind = Steps(whole_turns(wrap) * ratio.steps_per_output_turn().0);
        info!("untangling {} deg of cable wrap", wrap.0);

        Ok(AxisPlan {
            steps: ratio.ticks_to_steps(delta) - unwind,
            status,
        })
    }

    fn park_elevation(&mut self) -> ErrorStatus {
        let park = self.limits.max_elevation();
        match self.plan_elevation(park) {
            Ok(plan) => self.finish(Steps(0), plan.steps, plan.status),
            Err(e) => e.into(),
        }
    }

    fn supervise_elevation(&mut self) -> ErrorStatus {
        let (elevation, status) = self.current_elevation();
        let Some(elevation) = elevation else {
            return status;
        };

        let drift = libm::fabsf(90.0 - elevation.0);
        if drift <= self.standby.zenith_correction_threshold.0 {
            return status;
        }

        info!("elevation {} deg off zenith, parking", drift);
        self.park_elevation()
    }

    fn supervise_azimuth(&mut self) -> ErrorStatus {
        let (wrap, status) = self.cable_wrap();
        let Some(wrap) = wrap else {
            return status;
        };

        if !self.limits.exceeds_wrap(wrap) {
            return status;
        }

        match self.plan_untangle() {
            Ok(plan) => self.finish(plan.steps, Steps(0), plan.status),
            Err(e) => e.into(),
        }
    }

    /// Run both corrections together and report `status` if the move
    /// completes.
    fn finish(&mut self, azimuth: Steps, elevation: Steps, status: ErrorStatus) -> ErrorStatus {
        let plan = CoordinatedMove::new(self.az_motor.plan(azimuth), self.elev_motor.plan(elevation));
        debug!(
            "moving az {} elev {} steps over {} us",
            azimuth.0,
            elevation.0,
            plan.duration_us()
        );

        match plan.execute(&mut self.az_motor, &mut self.elev_motor, &mut self.delay) {
            Ok(()) => status,
            Err(e) => {
                error!("move aborted");
                e.into()
            }
        }
    }
}

/// Fold the outcome of de-energizing the drivers into a status.
fn with_release(status: ErrorStatus, released: ErrorStatus) -> ErrorStatus {
    match (status.is_error(), released.is_error()) {
        (_, false) => status,
        (false, true) => released,
        (true, true) => ErrorStatus::concat(&status, &released),
    }
}

/// Elevation angle of `position` above `horizon`, in (-180, 180].
pub fn signed_elevation(position: Ticks, horizon: Ticks) -> Degrees {
    let angle = position.degrees_from(horizon);
    if angle.0 > 180.0 {
        Degrees(angle.0 - 360.0)
    } else {
        angle
    }
}
