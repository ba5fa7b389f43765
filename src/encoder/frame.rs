//! Decoding of one encoder transaction.
//!
//! The encoder answers a chip-select window with three 16-bit words:
//!
//! | word | content                                                   |
//! |------|-----------------------------------------------------------|
//! | 1    | turn counter (multi-turn parts only)                      |
//! | 2    | position bits 19..4                                       |
//! | 3    | position bits 3..0 in the top nibble, status in bits 9, 8 |
//!
//! Both status bits are active low: bit 9 clear means the reading is
//! unusable, bit 8 clear means it is usable but degraded.

use crate::config::units::Ticks;

/// Words exchanged per transaction.
pub const FRAME_WORDS: usize = 3;

const ERROR_BIT: u16 = 1 << 9;
const WARNING_BIT: u16 = 1 << 8;

/// Hardware health reported in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameHealth {
    /// Both status bits set.
    Good,
    /// Warning bit cleared.
    Warning,
    /// Error bit cleared; position must not be used.
    Error,
}

/// Position and turn count decoded from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderReading {
    /// Absolute shaft position.
    pub position: Ticks,
    /// Hardware revolution counter, multi-turn parts only.
    pub turn_count: Option<i32>,
}

/// One raw transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncoderFrame(pub [u16; FRAME_WORDS]);

impl EncoderFrame {
    /// Status carried by word 3.
    pub fn health(&self) -> FrameHealth {
        let status = self.0[2];
        if status & ERROR_BIT == 0 {
            FrameHealth::Error
        } else if status & WARNING_BIT == 0 {
            FrameHealth::Warning
        } else {
            FrameHealth::Good
        }
    }

    /// 20-bit position from words 2 and 3, wrapped into the tick range.
    pub fn position(&self) -> Ticks {
        let raw = ((self.0[1] as u32) << 4) + ((self.0[2] as u32) >> 12);
        Ticks::wrapping(raw as i64)
    }

    /// Turn counter from word 1.
    pub fn turn_count(&self) -> i32 {
        self.0[0] as i32
    }

    /// Decode into a reading, or `None` when the error bit is raised.
    pub fn decode(&self, multi_turn: bool) -> Option<EncoderReading> {
        if self.health() == FrameHealth::Error {
            return None;
        }
        Some(EncoderReading {
            position: self.position(),
            turn_count: multi_turn.then(|| self.turn_count()),
        })
    }

    /// Build the frame an encoder would send for the given state.
    ///
    /// Used by simulators and tests.
    pub fn encode(position: Ticks, turn_count: u16, health: FrameHealth) -> Self {
        let raw = position.0;
        let mut status = ((raw & 0xF) << 12) as u16;
        match health {
            FrameHealth::Good => status |= ERROR_BIT | WARNING_BIT,
            FrameHealth::Warning => status |= ERROR_BIT,
            FrameHealth::Error => status |= WARNING_BIT,
        }
        Self([turn_count, (raw >> 4) as u16, status])
    }
}
