//! Encoder module for antenna-pointing.
//!
//! Provides frame decoding and the retrying absolute-encoder reader.

mod device;
mod frame;

pub use device::{AbsoluteEncoder, EncoderKind, EncoderSample, SPI_FREQUENCY_HZ, SPI_MODE};
pub use frame::{EncoderFrame, EncoderReading, FrameHealth, FRAME_WORDS};
