//! Simulated mount for integration tests.
//!
//! Every pin, the SPI bus and the delay share one [`MountState`]. A falling
//! STEP edge on an energized axis moves that axis's encoder by the geared
//! fraction of a turn, so the controller can close its loop against it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use antenna_pointing::config::MechanicalRatio;
use antenna_pointing::encoder::{EncoderFrame, FrameHealth};
use antenna_pointing::pointing::geometry::angle_to_ticks;
use antenna_pointing::{
    Axis, Degrees, Microsteps, MountHardware, PointingConfig, PointingController, StepperAxis,
    StepperAxisBuilder, Ticks, ENCODERS_MAX,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

const MAX: i64 = ENCODERS_MAX as i64;

/// Hardware turn counter value of the azimuth encoder at start-up.
pub const START_TURN: i64 = 100;

pub type SimAxis = StepperAxis<SimPin, SimPin, SimPin>;
pub type SimController = PointingController<SimBus, SimDelay, SimAxis, SimAxis, SimPin, SimPin>;

/// Recorded signal activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Rise(Axis),
    Fall(Axis),
    DelayUs(u32),
}

/// One reconstructed step pulse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulse {
    pub axes: Vec<Axis>,
    pub period_us: u32,
}

/// What a simulated pin is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Step(Axis),
    Dir(Axis),
    Enable(Axis),
    Select(Axis),
}

struct AxisState {
    steps_per_turn: i64,
    origin: i64,
    motor: i64,
    raises_on_high: bool,
    step_high: bool,
    dir_high: bool,
    enabled: bool,
    queued: VecDeque<FrameHealth>,
    stuck: Option<FrameHealth>,
    reads: u32,
}

impl AxisState {
    fn new(steps_per_turn: i64, origin: i64, raises_on_high: bool) -> Self {
        Self {
            steps_per_turn,
            origin,
            motor: 0,
            raises_on_high,
            step_high: false,
            dir_high: false,
            enabled: false,
            queued: VecDeque::new(),
            stuck: None,
            reads: 0,
        }
    }

    fn absolute(&self) -> i64 {
        self.origin + (self.motor * MAX).div_euclid(self.steps_per_turn)
    }

    fn frame(&mut self) -> EncoderFrame {
        self.reads += 1;
        let health = self
            .queued
            .pop_front()
            .or(self.stuck)
            .unwrap_or(FrameHealth::Good);
        let absolute = self.absolute();
        let turn = absolute.div_euclid(MAX).rem_euclid(1 << 16) as u16;
        EncoderFrame::encode(Ticks::wrapping(absolute), turn, health)
    }
}

/// A pin that refuses to be driven to `level` once `skip` writes passed.
struct PinFault {
    role: Role,
    level: bool,
    skip: u32,
}

struct MountState {
    faults: Vec<PinFault>,
    azimuth: AxisState,
    elevation: AxisState,
    selected: Option<Axis>,
    recording: bool,
    events: Vec<Event>,
    elapsed_ns: u64,
}

impl MountState {
    fn axis(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Azimuth => &mut self.azimuth,
            Axis::Elevation => &mut self.elevation,
        }
    }

    fn drive(&mut self, role: Role, high: bool) -> Result<(), SimPinError> {
        for fault in self.faults.iter_mut() {
            if fault.role == role && fault.level == high {
                if fault.skip == 0 {
                    return Err(SimPinError);
                }
                fault.skip -= 1;
            }
        }

        match role {
            Role::Step(axis) => {
                let state = self.axis(axis);
                let was_high = state.step_high;
                state.step_high = high;
                let event = match (was_high, high) {
                    (false, true) => Some(Event::Rise(axis)),
                    (true, false) => {
                        if state.enabled {
                            state.motor += if state.dir_high == state.raises_on_high { 1 } else { -1 };
                        }
                        Some(Event::Fall(axis))
                    }
                    _ => None,
                };
                if let (true, Some(event)) = (self.recording, event) {
                    self.events.push(event);
                }
            }
            Role::Dir(axis) => self.axis(axis).dir_high = high,
            Role::Enable(axis) => self.axis(axis).enabled = high,
            Role::Select(axis) => {
                if high {
                    if self.selected == Some(axis) {
                        self.selected = None;
                    }
                } else {
                    assert!(self.selected.is_none(), "two encoders selected at once");
                    self.selected = Some(axis);
                }
            }
        }
        Ok(())
    }

    fn wait_ns(&mut self, ns: u64) {
        self.elapsed_ns += ns;
    }
}

pub struct SimPin {
    state: Rc<RefCell<MountState>>,
    role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl digital::Error for SimPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

impl digital::ErrorType for SimPin {
    type Error = SimPinError;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().drive(self.role, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().drive(self.role, true)
    }
}

pub struct SimBus {
    state: Rc<RefCell<MountState>>,
}

impl spi::ErrorType for SimBus {
    type Error = Infallible;
}

impl SpiBus<u16> for SimBus {
    fn read(&mut self, words: &mut [u16]) -> Result<(), Self::Error> {
        self.transfer_in_place(words)
    }

    fn write(&mut self, _words: &[u16]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u16], _write: &[u16]) -> Result<(), Self::Error> {
        self.transfer_in_place(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u16]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let axis = state.selected.expect("transfer without chip select");
        let frame = state.axis(axis).frame();
        words.copy_from_slice(&frame.0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct SimDelay {
    state: Rc<RefCell<MountState>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().wait_ns(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        let mut state = self.state.borrow_mut();
        state.wait_ns(us as u64 * 1_000);
        if state.recording {
            state.events.push(Event::DelayUs(us));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.state.borrow_mut().wait_ns(ms as u64 * 1_000_000);
    }
}

/// Flight configuration with full stepping, so that whole-sky moves stay
/// short in tests.
pub fn bench_config() -> PointingConfig {
    let mut config = PointingConfig::default();
    config.azimuth.microsteps = Microsteps::FULL;
    config.elevation.microsteps = Microsteps::FULL;
    config
}

/// Smallest angle between two azimuths.
pub fn angle_gap(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Group recorded events into pulses.
pub fn pulses(events: &[Event]) -> Vec<Pulse> {
    let mut pulses = Vec::new();
    let mut rising = Vec::new();
    let mut high_us = None;
    for event in events {
        match *event {
            Event::Rise(axis) => rising.push(axis),
            Event::Fall(_) => {}
            Event::DelayUs(us) => match high_us {
                Some(high) => {
                    pulses.push(Pulse {
                        axes: std::mem::take(&mut rising),
                        period_us: high + us,
                    });
                    high_us = None;
                }
                None if !rising.is_empty() => high_us = Some(us),
                None => {}
            },
        }
    }
    pulses
}

/// Azimuth on north in turn [`START_TURN`], elevation at zenith.
#[derive(Clone)]
pub struct SimMount {
    state: Rc<RefCell<MountState>>,
    config: PointingConfig,
}

impl SimMount {
    pub fn new(config: &PointingConfig) -> Self {
        let az_turn = MechanicalRatio::from_config(&config.azimuth).steps_per_output_turn().0;
        let elev_turn = MechanicalRatio::from_config(&config.elevation).steps_per_output_turn().0;
        let north = config.calibration.north_offset_ticks.0 as i64;
        let zenith = config.calibration.zenith_ticks.0 as i64;

        let state = MountState {
            faults: Vec::new(),
            azimuth: AxisState::new(az_turn, START_TURN * MAX + north, true),
            // direction line high lowers the dish
            elevation: AxisState::new(elev_turn, zenith, false),
            selected: None,
            recording: false,
            events: Vec::new(),
            elapsed_ns: 0,
        };

        Self {
            state: Rc::new(RefCell::new(state)),
            config: config.clone(),
        }
    }

    fn pin(&self, role: Role) -> SimPin {
        SimPin {
            state: Rc::clone(&self.state),
            role,
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            state: Rc::clone(&self.state),
        }
    }

    pub fn stepper(&self, axis: Axis) -> SimAxis {
        StepperAxisBuilder::new()
            .step_pin(self.pin(Role::Step(axis)))
            .dir_pin(self.pin(Role::Dir(axis)))
            .enable_pin(self.pin(Role::Enable(axis)))
            .from_config(&self.config, axis)
            .build()
            .expect("stepper builds")
    }

    pub fn hardware(&self) -> MountHardware<SimBus, SimDelay, SimAxis, SimAxis, SimPin, SimPin> {
        MountHardware {
            spi: SimBus {
                state: Rc::clone(&self.state),
            },
            delay: self.delay(),
            azimuth: self.stepper(Axis::Azimuth),
            elevation: self.stepper(Axis::Elevation),
            azimuth_cs: self.pin(Role::Select(Axis::Azimuth)),
            elevation_cs: self.pin(Role::Select(Axis::Elevation)),
        }
    }

    pub fn controller(&self) -> SimController {
        PointingController::new(&self.config, self.hardware()).expect("controller starts")
    }

    /// Teleport azimuth to `angle` degrees from north in the given counter turn.
    pub fn place_azimuth(&self, turn: i64, angle: f32) {
        let ticks = angle_to_ticks(Degrees(angle), self.config.calibration.north_offset_ticks);
        let mut state = self.state.borrow_mut();
        state.azimuth.origin = turn * MAX + ticks.0 as i64;
        state.azimuth.motor = 0;
    }

    /// Teleport elevation to `angle` degrees above the horizon.
    pub fn place_elevation(&self, angle: f32) {
        let ticks = angle_to_ticks(Degrees(angle), self.config.calibration.horizon_ticks());
        let mut state = self.state.borrow_mut();
        state.elevation.origin = ticks.0 as i64;
        state.elevation.motor = 0;
    }

    pub fn azimuth_motor_steps(&self) -> i64 {
        self.state.borrow().azimuth.motor
    }

    pub fn elevation_motor_steps(&self) -> i64 {
        self.state.borrow().elevation.motor
    }

    pub fn azimuth_turn(&self) -> i64 {
        self.state.borrow().azimuth.absolute().div_euclid(MAX)
    }

    pub fn reads(&self, axis: Axis) -> u32 {
        self.state.borrow_mut().axis(axis).reads
    }

    pub fn enabled(&self, axis: Axis) -> bool {
        self.state.borrow_mut().axis(axis).enabled
    }

    pub fn step_line_high(&self, axis: Axis) -> bool {
        self.state.borrow_mut().axis(axis).step_high
    }

    pub fn clear_pin_faults(&self) {
        self.state.borrow_mut().faults.clear();
    }

    /// After `skip` more successful writes of `high` to the pin wired as
    /// `role`, every such write fails.
    pub fn fail_pin(&self, role: Role, high: bool, skip: u32) {
        self.state.borrow_mut().faults.push(PinFault {
            role,
            level: high,
            skip,
        });
    }

    /// The next `count` frames from `axis` report `health`.
    pub fn queue_faults(&self, axis: Axis, health: FrameHealth, count: usize) {
        let mut state = self.state.borrow_mut();
        state.axis(axis).queued.extend(std::iter::repeat(health).take(count));
    }

    /// Every later frame from `axis` reports `health`.
    pub fn stick_fault(&self, axis: Axis, health: FrameHealth) {
        self.state.borrow_mut().axis(axis).stuck = Some(health);
    }

    /// Clear the event log and the clock, then record from now on.
    pub fn start_recording(&self) {
        let mut state = self.state.borrow_mut();
        state.events.clear();
        state.elapsed_ns = 0;
        state.recording = true;
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn elapsed_us(&self) -> u64 {
        self.state.borrow().elapsed_ns / 1_000
    }
}
