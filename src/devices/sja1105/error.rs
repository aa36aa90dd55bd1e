//! SJA1105 protocol errors

use crate::platform::PlatformError;
use core::fmt;
use sja1105_core::frame::FrameError;
use sja1105_core::lut::LutError;

/// Result type for SJA1105 operations
pub type Result<T> = core::result::Result<T, Sja1105Error>;

/// SJA1105 operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sja1105Error {
    /// A transport capability reported a failure
    Transport(PlatformError),
    /// Device mutex or readiness poll did not complete in time
    Timeout,
    /// Two consecutive reads of the same registers disagreed
    Verification,
    /// Checksum reported by the switch does not match the transmitted data
    Integrity {
        /// Checksum computed over the transmitted words
        expected: u32,
        /// Checksum read back from the switch
        actual: u32,
    },
    /// Rejected before any transport call
    InvalidArgument(ArgumentError),
}

/// Reasons an argument is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArgumentError {
    /// Zero-length transfer
    EmptyPayload,
    /// Read above the 64-word receive ceiling
    ReadTooLarge(usize),
    /// Write above the configured per-transaction ceiling
    WriteTooLarge(usize),
    /// Full-duplex buffers of different lengths
    LengthMismatch { tx: usize, rx: usize },
    /// Lookup table range with `low > high`
    InvertedRange { low: u16, high: u16 },
    /// Lookup table index beyond capacity
    OutOfBounds { index: u16, capacity: u16 },
    /// Lookup table layout that cannot be encoded
    BadLayout,
    /// Device ID not belonging to the SJA1105 family
    UnknownDevice(u32),
}

impl From<FrameError> for Sja1105Error {
    fn from(e: FrameError) -> Self {
        let arg = match e {
            FrameError::EmptyPayload => ArgumentError::EmptyPayload,
            FrameError::ReadTooLarge(n) => ArgumentError::ReadTooLarge(n),
            FrameError::WriteTooLarge(n) => ArgumentError::WriteTooLarge(n),
        };
        Sja1105Error::InvalidArgument(arg)
    }
}

impl From<LutError> for Sja1105Error {
    fn from(e: LutError) -> Self {
        let arg = match e {
            LutError::InvertedRange { low, high } => ArgumentError::InvertedRange { low, high },
            LutError::OutOfBounds { index, capacity } => {
                ArgumentError::OutOfBounds { index, capacity }
            }
            LutError::EntryTooLong(_) => ArgumentError::BadLayout,
        };
        Sja1105Error::InvalidArgument(arg)
    }
}

impl From<PlatformError> for Sja1105Error {
    fn from(e: PlatformError) -> Self {
        Sja1105Error::Transport(e)
    }
}

impl fmt::Display for Sja1105Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sja1105Error::Transport(e) => write!(f, "transport error: {}", e),
            Sja1105Error::Timeout => write!(f, "timed out"),
            Sja1105Error::Verification => write!(f, "read verification failed"),
            Sja1105Error::Integrity { expected, actual } => write!(
                f,
                "checksum mismatch: expected {:#010x}, got {:#010x}",
                expected, actual
            ),
            Sja1105Error::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
        }
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::EmptyPayload => write!(f, "empty payload"),
            ArgumentError::ReadTooLarge(n) => write!(f, "read of {} words", n),
            ArgumentError::WriteTooLarge(n) => write!(f, "write of {} words", n),
            ArgumentError::LengthMismatch { tx, rx } => {
                write!(f, "tx length {} differs from rx length {}", tx, rx)
            }
            ArgumentError::InvertedRange { low, high } => {
                write!(f, "inverted range {}..={}", low, high)
            }
            ArgumentError::OutOfBounds { index, capacity } => {
                write!(f, "index {} beyond capacity {}", index, capacity)
            }
            ArgumentError::BadLayout => write!(f, "unsupported lookup table layout"),
            ArgumentError::UnknownDevice(id) => write!(f, "unknown device id {:#010x}", id),
        }
    }
}

/// Lookup table invalidation that stopped partway
///
/// Entries `low..low + invalidated` are invalid on the switch; resuming from
/// `low + invalidated` completes the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LutRangeError {
    /// Entries invalidated before the failure
    pub invalidated: u16,
    /// What stopped the sequence
    pub cause: Sja1105Error,
}

impl From<LutRangeError> for Sja1105Error {
    fn from(e: LutRangeError) -> Self {
        e.cause
    }
}

impl fmt::Display for LutRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} after {} entries", self.cause, self.invalidated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SpiError;

    #[test]
    fn test_frame_errors_are_invalid_arguments() {
        assert_eq!(
            Sja1105Error::from(FrameError::ReadTooLarge(65)),
            Sja1105Error::InvalidArgument(ArgumentError::ReadTooLarge(65))
        );
    }

    #[test]
    fn test_lut_range_error_keeps_cause() {
        let e = LutRangeError {
            invalidated: 3,
            cause: Sja1105Error::Timeout,
        };
        assert_eq!(Sja1105Error::from(e), Sja1105Error::Timeout);
    }

    #[test]
    fn test_display() {
        let e = Sja1105Error::Transport(PlatformError::Spi(SpiError::TransferFailed));
        assert_eq!(format!("{}", e), "transport error: SPI error: TransferFailed");
        let e = Sja1105Error::Integrity {
            expected: 1,
            actual: 2,
        };
        assert_eq!(
            format!("{}", e),
            "checksum mismatch: expected 0x00000001, got 0x00000002"
        );
    }
}
