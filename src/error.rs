//! Error types for antenna-pointing.
//!
//! Two layers live here. The typed [`Error`] enum is what the configuration,
//! encoder and motor code returns internally. [`ErrorStatus`] is the uniform
//! NONE / WARNING / ERROR record handed back by every pointing operation.

use core::fmt::{self, Write};

use crate::config::{Axis, MIN_SETTLE_US};

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Capacity of an [`ErrorStatus`] message.
pub const MESSAGE_CAPACITY: usize = 96;

/// Bounded message text carried by an [`ErrorStatus`].
pub type Message = heapless::String<MESSAGE_CAPACITY>;

/// Unified error type for all antenna-pointing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Encoder read error
    Encoder(EncoderError),
    /// Stepper signal error
    Motor(MotorError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Invalid reduction ratio (must be > 0)
    InvalidReductionRatio(f32),
    /// Step period must be at least 1 µs
    InvalidStepPeriod(u32),
    /// Slowdown factor must be at least 1
    InvalidSlowdownFactor(u32),
    /// Safety margin outside [0, 45) degrees
    InvalidMargin(f32),
    /// Cable-wrap bound must exceed one full turn
    InvalidRotationBound(f32),
    /// Tick value outside the encoder range
    TicksOutOfRange(u32),
    /// Encoder retry budget must allow at least one attempt
    InvalidAttempts(u8),
    /// Chip-select hold time below the part's minimum
    InvalidSettleTime(u32),
    /// Required builder field not set
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Encoder read errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderError {
    /// The encoder raised its (active-low) error bit
    ErrorBit {
        /// Axis the encoder belongs to
        axis: Axis,
    },
    /// SPI transfer or chip-select failure
    Bus {
        /// Axis the encoder belongs to
        axis: Axis,
    },
    /// Turn count requested from a single-turn encoder
    NoTurnCounter {
        /// Axis the encoder belongs to
        axis: Axis,
    },
}

/// Stepper signal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Pin operation failed
    PinError {
        /// Axis the driver belongs to
        axis: Axis,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Encoder(e) => write!(f, "{}", e),
            Error::Motor(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidReductionRatio(v) => {
                write!(f, "Invalid reduction ratio: {}. Must be > 0", v)
            }
            ConfigError::InvalidStepPeriod(v) => write!(f, "Invalid step period: {} us. Must be > 0", v),
            ConfigError::InvalidSlowdownFactor(v) => {
                write!(f, "Invalid slowdown factor: {}. Must be >= 1", v)
            }
            ConfigError::InvalidMargin(v) => write!(f, "Invalid safety margin: {} deg. Must be in [0, 45)", v),
            ConfigError::InvalidRotationBound(v) => {
                write!(f, "Invalid max azimuth rotation: {} deg. Must be > 360", v)
            }
            ConfigError::TicksOutOfRange(v) => write!(f, "Tick value {} outside encoder range", v),
            ConfigError::InvalidAttempts(v) => write!(f, "Invalid encoder attempts: {}. Must be >= 1", v),
            ConfigError::InvalidSettleTime(v) => {
                write!(f, "Invalid encoder settle time: {} us. Must be >= {}", v, MIN_SETTLE_US)
            }
            ConfigError::MissingField(field) => write!(f, "{} is required", field),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderError::ErrorBit { axis } => write!(f, "{} encoder error bit", axis),
            EncoderError::Bus { axis } => write!(f, "{} encoder bus failure", axis),
            EncoderError::NoTurnCounter { axis } => write!(f, "{} encoder has no turn counter", axis),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError { axis } => write!(f, "{} stepper pin operation failed", axis),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<EncoderError> for Error {
    fn from(e: EncoderError) -> Self {
        Error::Encoder(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for EncoderError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

/// Severity of an [`ErrorStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Success.
    #[default]
    None,
    /// Result usable, a soft hardware fault was flagged.
    Warning,
    /// Result unusable; the operation aborted or ran out of retries.
    Error,
}

/// Outcome record returned by every pointing operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorStatus {
    kind: ErrorKind,
    message: Message,
}

impl ErrorStatus {
    /// Success with an empty message.
    pub fn none() -> Self {
        Self::default()
    }

    /// Usable result with a soft fault.
    pub fn warning(message: &str) -> Self {
        Self::with_kind(ErrorKind::Warning, message)
    }

    /// Unusable result.
    pub fn error(message: &str) -> Self {
        Self::with_kind(ErrorKind::Error, message)
    }

    fn with_kind(kind: ErrorKind, message: &str) -> Self {
        let mut status = Self {
            kind,
            message: Message::new(),
        };
        push_truncated(&mut status.message, message);
        status
    }

    /// Join two statuses into one ERROR whose message is `"<a>; <b>"`.
    pub fn concat(first: &ErrorStatus, second: &ErrorStatus) -> Self {
        let mut status = Self::error(first.message());
        push_truncated(&mut status.message, "; ");
        push_truncated(&mut status.message, second.message());
        status
    }

    /// Severity.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message text (empty on success).
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// `true` for NONE.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.kind == ErrorKind::None
    }

    /// `true` for WARNING.
    #[inline]
    pub fn is_warning(&self) -> bool {
        self.kind == ErrorKind::Warning
    }

    /// `true` for ERROR.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == ErrorKind::Error
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::None => write!(f, "NONE"),
            ErrorKind::Warning => write!(f, "WARNING: {}", self.message),
            ErrorKind::Error => write!(f, "ERROR: {}", self.message),
        }
    }
}

impl From<Error> for ErrorStatus {
    fn from(e: Error) -> Self {
        let mut status = Self {
            kind: ErrorKind::Error,
            message: Message::new(),
        };
        // A message longer than the buffer is cut short, not dropped.
        let _ = write!(Truncating(&mut status.message), "{}", e);
        status
    }
}

impl From<EncoderError> for ErrorStatus {
    fn from(e: EncoderError) -> Self {
        Error::from(e).into()
    }
}

impl From<MotorError> for ErrorStatus {
    fn from(e: MotorError) -> Self {
        Error::from(e).into()
    }
}

fn push_truncated(buf: &mut Message, text: &str) {
    for c in text.chars() {
        if buf.push(c).is_err() {
            break;
        }
    }
}

struct Truncating<'a>(&'a mut Message);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        push_truncated(self.0, s);
        Ok(())
    }
}
