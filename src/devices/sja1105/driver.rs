//! SJA1105 device handle
//!
//! [`Sja1105`] ties one switch's configuration to the platform capabilities
//! it runs on and keeps the transport counters. All operations take `&self`;
//! transactions are serialized by the platform's device mutex, held through a
//! [`DeviceLock`] guard for the whole of each public operation.
//!
//! The operations themselves are split over sibling modules:
//!
//! - `io`: register reads, writes and raw transfers
//! - `flag`: flag reads and polls
//! - `table`: chunked table writes
//! - `lut`: lookup table invalidation
//! - `reset`: warm and configuration resets, identification

use super::config::Sja1105Config;
use super::error::{Result, Sja1105Error};
use crate::core::logging::device_log;
use crate::platform::{MutexError, PlatformError, Sja1105Platform};
use core::sync::atomic::{AtomicU32, Ordering};
use sja1105_core::events::EventCounters;
use sja1105_core::timing::{T_SPI_LAG_NS, T_SPI_LEAD_NS};

/// SJA1105 device handle
///
/// # Type Parameters
///
/// * `P` - Platform capabilities; `&T` works for any `T: Sja1105Platform`
pub struct Sja1105<P>
where
    P: Sja1105Platform,
{
    /// Platform capabilities and caller context
    platform: P,

    /// Device configuration
    config: Sja1105Config,

    /// Failed transport calls
    spi_errors: AtomicU32,

    /// Words transmitted, control frames included
    words_written: AtomicU32,

    /// Words received
    words_read: AtomicU32,
}

/// Device mutex held; released on drop
pub(super) struct DeviceLock<'a, P: Sja1105Platform> {
    platform: &'a P,
}

impl<P: Sja1105Platform> Drop for DeviceLock<'_, P> {
    fn drop(&mut self) {
        self.platform.give_mutex();
    }
}

/// Chip select asserted; deasserted on drop after the lag time
pub(super) struct ChipSelect<'a, P: Sja1105Platform> {
    platform: &'a P,
}

impl<P: Sja1105Platform> Drop for ChipSelect<'_, P> {
    fn drop(&mut self) {
        self.platform.delay_ns(T_SPI_LAG_NS);
        self.platform.set_chip_select(false);
    }
}

impl<P> Sja1105<P>
where
    P: Sja1105Platform,
{
    /// Create a handle
    ///
    /// No bus traffic happens until the first operation.
    pub fn new(platform: P, config: Sja1105Config) -> Self {
        Self {
            platform,
            config,
            spi_errors: AtomicU32::new(0),
            words_written: AtomicU32::new(0),
            words_read: AtomicU32::new(0),
        }
    }

    /// Device configuration
    pub fn config(&self) -> &Sja1105Config {
        &self.config
    }

    /// Platform capabilities
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Snapshot of the transport counters
    pub fn events(&self) -> EventCounters {
        EventCounters {
            spi_errors: self.spi_errors.load(Ordering::Relaxed),
            words_written: self.words_written.load(Ordering::Relaxed),
            words_read: self.words_read.load(Ordering::Relaxed),
        }
    }

    /// Re-initialize the handle: clear the counters and adopt `config`
    pub fn reinit(&mut self, config: Sja1105Config) {
        self.config = config;
        *self.spi_errors.get_mut() = 0;
        *self.words_written.get_mut() = 0;
        *self.words_read.get_mut() = 0;
        crate::log_debug!("SJA1105 {} re-initialized", config.switch_id);
    }

    /// Give back the platform
    pub fn release(self) -> P {
        self.platform
    }

    /// Take the device mutex
    pub(super) fn lock(&self) -> Result<DeviceLock<'_, P>> {
        match self.platform.take_mutex(self.config.timeout_ms) {
            Ok(()) => Ok(DeviceLock {
                platform: &self.platform,
            }),
            Err(PlatformError::Mutex(MutexError::Timeout)) => {
                device_log!(self, "device mutex timeout");
                Err(Sja1105Error::Timeout)
            }
            Err(e) => {
                device_log!(self, "device mutex failed: {}", e);
                Err(Sja1105Error::Transport(e))
            }
        }
    }

    /// Assert chip select and wait the lead time
    pub(super) fn select(&self, _lock: &DeviceLock<'_, P>) -> ChipSelect<'_, P> {
        self.platform.set_chip_select(true);
        self.platform.delay_ns(T_SPI_LEAD_NS);
        ChipSelect {
            platform: &self.platform,
        }
    }

    /// Counted `transmit`
    pub(super) fn transmit(&self, _cs: &ChipSelect<'_, P>, words: &[u32]) -> Result<()> {
        match self.platform.transmit(words, self.config.timeout_ms) {
            Ok(()) => {
                self.words_written
                    .fetch_add(words.len() as u32, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => Err(self.transport_failed("transmit", e)),
        }
    }

    /// Counted `receive`
    pub(super) fn receive(&self, _cs: &ChipSelect<'_, P>, words: &mut [u32]) -> Result<()> {
        match self.platform.receive(words, self.config.timeout_ms) {
            Ok(()) => {
                self.words_read
                    .fetch_add(words.len() as u32, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => Err(self.transport_failed("receive", e)),
        }
    }

    /// Counted `transmit_receive`
    pub(super) fn transmit_receive(
        &self,
        _cs: &ChipSelect<'_, P>,
        tx: &[u32],
        rx: &mut [u32],
    ) -> Result<()> {
        match self.platform.transmit_receive(tx, rx, self.config.timeout_ms) {
            Ok(()) => {
                self.words_written
                    .fetch_add(tx.len() as u32, Ordering::Relaxed);
                self.words_read.fetch_add(rx.len() as u32, Ordering::Relaxed);
                Ok(())
            }
            Err(e) => Err(self.transport_failed("transmit_receive", e)),
        }
    }

    fn transport_failed(&self, call: &str, e: PlatformError) -> Sja1105Error {
        self.spi_errors.fetch_add(1, Ordering::Relaxed);
        crate::log_warn!("SJA1105 {} {} failed", self.config.switch_id, call);
        device_log!(self, "{} failed: {}", call, e);
        Sja1105Error::Transport(e)
    }
}
