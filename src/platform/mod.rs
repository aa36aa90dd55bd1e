//! Platform abstraction layer
//!
//! Everything the SJA1105 protocol layer needs from the embedding environment
//! is expressed as the [`Sja1105Platform`] capability trait. Implementations:
//!
//! - [`mock::MockSwitch`]: simulated switch for host tests (`mock` feature)
//! - [`hal::HalPlatform`]: adapter over `embedded-hal` 1.0 (`hal` feature)

pub mod crc;
pub mod error;
pub mod traits;

#[cfg(feature = "hal")]
pub mod hal;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{GpioError, MutexError, PlatformError, Result, SpiError};
pub use traits::Sja1105Platform;
