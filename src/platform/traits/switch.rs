//! SJA1105 platform capability trait
//!
//! The protocol layer never touches hardware directly. Everything it needs
//! from the embedding environment (the SPI bus, the chip select and reset
//! lines, delays, a clock, a mutex, a CRC engine and a log sink) is reached
//! through this single trait.

use crate::platform::Result;

/// Capability set the SJA1105 protocol layer runs on
///
/// The implementing value doubles as the caller's context: it is borrowed by
/// every operation of the device handle and is free to carry whatever state
/// the platform needs. All methods take `&self` so that one handle can be
/// shared between threads or tasks; implementations keep mutable state behind
/// their own interior mutability.
///
/// # Safety Invariants
///
/// - The protocol layer only calls bus, pin and CRC methods while it holds the
///   mutex obtained through [`take_mutex`](Self::take_mutex)
/// - [`give_mutex`](Self::give_mutex) is called exactly once per successful
///   `take_mutex`, on every exit path
/// - Words are 32-bit and go out most significant bit first
/// - Transfer budgets may be enforced at word granularity: a word already on
///   the wire finishes before `SpiError::Timeout` is reported
pub trait Sja1105Platform {
    /// Transmit `words`, discarding whatever is clocked in
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the transfer fails or does not finish
    /// within `timeout_ms`.
    fn transmit(&self, words: &[u32], timeout_ms: u32) -> Result<()>;

    /// Receive `words.len()` words while clocking out zeros
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi` if the transfer fails or does not finish
    /// within `timeout_ms`.
    fn receive(&self, words: &mut [u32], timeout_ms: u32) -> Result<()>;

    /// Full-duplex transfer
    ///
    /// Both buffers must have the same length.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Spi(SpiError::LengthMismatch)` for unequal
    /// buffers, `PlatformError::Spi(SpiError::Timeout)` when the transfer
    /// outlasts `timeout_ms`, other `PlatformError::Spi` variants for bus
    /// failures.
    fn transmit_receive(&self, tx: &[u32], rx: &mut [u32], timeout_ms: u32) -> Result<()>;

    /// Drive the chip select line (`true` = asserted)
    fn set_chip_select(&self, active: bool);

    /// Drive the reset line (`false` holds the switch in reset)
    fn set_reset_line(&self, high: bool);

    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u64;

    /// Busy-wait or sleep for at least `ns` nanoseconds
    fn delay_ns(&self, ns: u32);

    /// Sleep for at least `ms` milliseconds
    fn delay_ms(&self, ms: u32);

    /// Take the device mutex
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Mutex(MutexError::Timeout)` when the mutex is
    /// still held by another caller after `timeout_ms`.
    fn take_mutex(&self, timeout_ms: u32) -> Result<()>;

    /// Release the device mutex
    fn give_mutex(&self);

    /// Restart CRC accumulation
    fn crc_reset(&self);

    /// Feed `words` into the running CRC and return the updated value
    fn crc_accumulate(&self, words: &[u32]) -> u32;

    /// Diagnostic log sink
    ///
    /// Only called when logging is enabled in the device configuration.
    fn write_log(&self, _message: &str) {}
}

impl<T: Sja1105Platform + ?Sized> Sja1105Platform for &T {
    fn transmit(&self, words: &[u32], timeout_ms: u32) -> Result<()> {
        (**self).transmit(words, timeout_ms)
    }

    fn receive(&self, words: &mut [u32], timeout_ms: u32) -> Result<()> {
        (**self).receive(words, timeout_ms)
    }

    fn transmit_receive(&self, tx: &[u32], rx: &mut [u32], timeout_ms: u32) -> Result<()> {
        (**self).transmit_receive(tx, rx, timeout_ms)
    }

    fn set_chip_select(&self, active: bool) {
        (**self).set_chip_select(active)
    }

    fn set_reset_line(&self, high: bool) {
        (**self).set_reset_line(high)
    }

    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn delay_ns(&self, ns: u32) {
        (**self).delay_ns(ns)
    }

    fn delay_ms(&self, ms: u32) {
        (**self).delay_ms(ms)
    }

    fn take_mutex(&self, timeout_ms: u32) -> Result<()> {
        (**self).take_mutex(timeout_ms)
    }

    fn give_mutex(&self) {
        (**self).give_mutex()
    }

    fn crc_reset(&self) {
        (**self).crc_reset()
    }

    fn crc_accumulate(&self, words: &[u32]) -> u32 {
        (**self).crc_accumulate(words)
    }

    fn write_log(&self, message: &str) {
        (**self).write_log(message)
    }
}
