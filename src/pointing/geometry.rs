//! Angle and tick arithmetic on the encoder circle.
//!
//! All functions here are pure. Positions live on a circle of
//! [`ENCODERS_MAX`] ticks; deltas are signed and take the short way round.

use crate::config::units::{Degrees, Ticks, ENCODERS_MAX};

const HALF_RANGE: i64 = (ENCODERS_MAX / 2) as i64;

/// Wrap any signed tick count into `[0, ENCODERS_MAX)`.
#[inline]
pub fn normalize(ticks: i64) -> Ticks {
    Ticks::wrapping(ticks)
}

/// Signed delta from `from` to `to` along the shorter arc.
///
/// The result satisfies `|delta| <= ENCODERS_MAX / 2`.
pub fn shortest_delta(from: Ticks, to: Ticks) -> i64 {
    let delta = to.0 as i64 - from.0 as i64;
    if delta > HALF_RANGE {
        delta - ENCODERS_MAX as i64
    } else if delta < -HALF_RANGE {
        delta + ENCODERS_MAX as i64
    } else {
        delta
    }
}

/// Encoder value at `angle` degrees past `reference`.
///
/// The angle is wrapped into [0, 360) first, so -90 and 270 give the same
/// target.
pub fn angle_to_ticks(angle: Degrees, reference: Ticks) -> Ticks {
    let fraction = angle.normalized().0 as f64 / 360.0;
    let raw = libm::floor(fraction * ENCODERS_MAX as f64 + reference.0 as f64);
    normalize(raw as i64)
}

/// Cumulative azimuth rotation, in degrees, that the mount would reach
/// after moving `delta_ticks` from `current`.
///
/// Measured from `north` in the turn where the hardware counter read
/// `initial_turns`. Positive is the counting direction of the encoder.
pub fn predicted_wrap(
    turn_count: i32,
    initial_turns: i32,
    current: Ticks,
    delta_ticks: i64,
    north: Ticks,
) -> Degrees {
    let whole_turns = (turn_count as i64 - initial_turns as i64) as f64;
    let partial =
        (current.0 as i64 + delta_ticks - north.0 as i64) as f64 / ENCODERS_MAX as f64;
    Degrees(((whole_turns + partial) * 360.0) as f32)
}

/// Nearest whole number of turns in a wrap angle.
#[inline]
pub fn whole_turns(wrap: Degrees) -> i64 {
    libm::round(wrap.0 as f64 / 360.0) as i64
}
