//! Platform error types
//!
//! Errors reported by the capability implementations the protocol layer runs
//! on. Every platform maps its HAL-specific errors onto these variants.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// SPI operation failed
    Spi(SpiError),
    /// GPIO operation failed (chip select or reset line)
    Gpio(GpioError),
    /// Device mutex could not be taken
    Mutex(MutexError),
    /// Invalid configuration provided
    InvalidConfig,
    /// Resource not available
    ResourceUnavailable,
}

/// SPI-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// Transfer failed
    TransferFailed,
    /// Timeout occurred
    Timeout,
    /// Mode fault
    ModeFault,
    /// Overrun error
    Overrun,
    /// Transmit and receive buffers differ in length
    LengthMismatch,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin could not be driven
    DriveFailed,
}

/// Mutex-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MutexError {
    /// Timed out waiting for the current holder
    Timeout,
    /// Mutex state was corrupted by a panicking holder
    Poisoned,
}

impl PlatformError {
    /// Whether the error is a timeout of a blocking primitive
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            PlatformError::Spi(SpiError::Timeout) | PlatformError::Mutex(MutexError::Timeout)
        )
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Spi(e) => write!(f, "SPI error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Mutex(e) => write!(f, "Mutex error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
            PlatformError::ResourceUnavailable => write!(f, "Resource not available"),
        }
    }
}
