//! Absolute encoder on a shared SPI bus.
//!
//! The encoder owns only its chip-select line. The bus and the delay
//! provider are borrowed for the duration of each call, so two encoders
//! on the same bus can never have a transaction in flight at once.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, SpiBus, MODE_1};

use crate::config::{Axis, EncoderConfig};
use crate::error::{EncoderError, Error, ErrorStatus, Result};

use super::frame::{EncoderFrame, EncoderReading, FrameHealth, FRAME_WORDS};

/// Bus clock expected by the encoders.
pub const SPI_FREQUENCY_HZ: u32 = 1_000_000;

/// Clock polarity/phase expected by the encoders (words are MSB first).
pub const SPI_MODE: Mode = MODE_1;

/// Whether the part reports a revolution counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderKind {
    /// Position only.
    SingleTurn,
    /// Position plus hardware turn counter.
    MultiTurn,
}

/// A reading together with its NONE or WARNING status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSample {
    /// Decoded reading.
    pub reading: EncoderReading,
    /// NONE, or WARNING when the warning bit was raised.
    pub status: ErrorStatus,
}

/// Absolute rotary encoder.
pub struct AbsoluteEncoder<CS>
where
    CS: OutputPin,
{
    /// Active-low chip select.
    cs: CS,

    /// Axis this encoder measures.
    axis: Axis,

    /// Single- or multi-turn part.
    kind: EncoderKind,

    /// Retry and timing policy.
    policy: EncoderConfig,
}

impl<CS> AbsoluteEncoder<CS>
where
    CS: OutputPin,
{
    /// Create an encoder and release its chip select.
    pub fn new(mut cs: CS, axis: Axis, kind: EncoderKind, policy: EncoderConfig) -> Result<Self> {
        cs.set_high().map_err(|_| EncoderError::Bus { axis })?;
        Ok(Self {
            cs,
            axis,
            kind,
            policy,
        })
    }

    /// Create a position-only encoder.
    pub fn single_turn(cs: CS, axis: Axis, policy: EncoderConfig) -> Result<Self> {
        Self::new(cs, axis, EncoderKind::SingleTurn, policy)
    }

    /// Create an encoder with a hardware turn counter.
    pub fn multi_turn(cs: CS, axis: Axis, policy: EncoderConfig) -> Result<Self> {
        Self::new(cs, axis, EncoderKind::MultiTurn, policy)
    }

    /// Axis this encoder measures.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Single- or multi-turn part.
    #[inline]
    pub fn kind(&self) -> EncoderKind {
        self.kind
    }

    /// Exchange one frame with the part, without interpreting it.
    pub fn transfer<SPI, DELAY>(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<EncoderFrame>
    where
        SPI: SpiBus<u16>,
        DELAY: DelayNs,
    {
        let axis = self.axis;
        self.cs.set_low().map_err(|_| EncoderError::Bus { axis })?;
        delay.delay_us(self.policy.settle_us);

        let mut words = [0u16; FRAME_WORDS];
        let exchanged = spi
            .transfer_in_place(&mut words)
            .and_then(|_| spi.flush());

        // Release the part even if the exchange failed.
        let released = self.cs.set_high();
        exchanged.map_err(|_| EncoderError::Bus { axis })?;
        released.map_err(|_| EncoderError::Bus { axis })?;

        Ok(EncoderFrame(words))
    }

    /// One read attempt: transfer and validate the status bits.
    ///
    /// A raised error bit is reported as [`EncoderError::ErrorBit`] and the
    /// position of that frame is discarded.
    pub fn read_once<SPI, DELAY>(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<EncoderSample>
    where
        SPI: SpiBus<u16>,
        DELAY: DelayNs,
    {
        let frame = self.transfer(spi, delay)?;
        let multi_turn = self.kind == EncoderKind::MultiTurn;
        let reading = frame
            .decode(multi_turn)
            .ok_or(EncoderError::ErrorBit { axis: self.axis })?;

        let status = if frame.health() == FrameHealth::Warning {
            let mut msg: heapless::String<32> = heapless::String::new();
            let _ = write!(msg, "{} encoder warning bit", self.axis);
            ErrorStatus::warning(&msg)
        } else {
            ErrorStatus::none()
        };

        Ok(EncoderSample { reading, status })
    }

    /// Read with retries.
    ///
    /// Failed attempts are repeated up to `max_attempts` times in total,
    /// with `retry_delay_ms` between attempts. The last error is returned
    /// once the budget is spent.
    pub fn read<SPI, DELAY>(&mut self, spi: &mut SPI, delay: &mut DELAY) -> Result<EncoderSample>
    where
        SPI: SpiBus<u16>,
        DELAY: DelayNs,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.read_once(spi, delay) {
                Ok(sample) => return Ok(sample),
                Err(e) if attempt >= attempts => {
                    error!("{} encoder: giving up after {} attempts", self.axis.label(), attempt);
                    return Err(e);
                }
                Err(_) => {
                    warn!("{} encoder: attempt {} failed, retrying", self.axis.label(), attempt);
                    attempt += 1;
                    delay.delay_ms(self.policy.retry_delay_ms);
                }
            }
        }
    }

    /// Read only the position.
    pub fn read_position<SPI, DELAY>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(crate::config::Ticks, ErrorStatus)>
    where
        SPI: SpiBus<u16>,
        DELAY: DelayNs,
    {
        let sample = self.read(spi, delay)?;
        Ok((sample.reading.position, sample.status))
    }

    /// Read only the turn counter.
    ///
    /// # Errors
    ///
    /// [`EncoderError::NoTurnCounter`] on a single-turn part, without
    /// touching the bus.
    pub fn read_turn_count<SPI, DELAY>(
        &mut self,
        spi: &mut SPI,
        delay: &mut DELAY,
    ) -> Result<(i32, ErrorStatus)>
    where
        SPI: SpiBus<u16>,
        DELAY: DelayNs,
    {
        if self.kind == EncoderKind::SingleTurn {
            return Err(Error::Encoder(EncoderError::NoTurnCounter { axis: self.axis }));
        }
        let sample = self.read(spi, delay)?;
        let turns = sample
            .reading
            .turn_count
            .ok_or(EncoderError::NoTurnCounter { axis: self.axis })?;
        Ok((turns, sample.status))
    }
}
