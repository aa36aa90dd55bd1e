//! embedded-hal platform adapter
//!
//! [`HalPlatform`] implements [`Sja1105Platform`] on top of any `embedded-hal`
//! 1.0 SPI bus, two output pins (chip select and reset), a delay provider and
//! a [`TimeSource`]. The bus and pins live behind a critical-section mutex,
//! held for one word at a time. The delay provider sits behind a spinlock
//! and the device mutex is an atomic flag, so neither sleeping nor waiting
//! for the device masks interrupts.
//!
//! # Wiring
//!
//! - SPI mode 1 (CPOL = 0, CPHA = 1), MSB first, 8-bit frames
//! - Chip select is active low and must not be driven by the bus itself
//! - Reset is active low
//!
//! Blocking `embedded-hal` transfers cannot be interrupted mid-word. The
//! `timeout_ms` budget of a transfer is checked against the time source
//! between words; a transfer that outlasts it stops with
//! `SpiError::Timeout` at the next word boundary.

#![cfg(feature = "hal")]

use crate::core::traits::{EmbassyState, SharedState};
use crate::platform::{
    crc::Crc32Accumulator,
    error::{GpioError, MutexError, PlatformError, SpiError},
    traits::Sja1105Platform,
    Result,
};
use core::sync::atomic::{AtomicBool, Ordering};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use sja1105_core::traits::TimeSource;
use spin::Mutex;

/// Pause between two attempts to take a contended device mutex
const MUTEX_RETRY_US: u32 = 50;

struct Parts<SPI, CS, RST> {
    spi: SPI,
    cs: CS,
    rst: RST,
}

/// `Sja1105Platform` over embedded-hal peripherals
///
/// # Type Parameters
///
/// * `SPI` - Bus implementing `embedded_hal::spi::SpiBus<u8>`
/// * `CS` - Chip select pin (active low)
/// * `RST` - Reset pin (active low)
/// * `D` - Delay provider
/// * `T` - Monotonic clock
pub struct HalPlatform<SPI, CS, RST, D, T> {
    parts: EmbassyState<Parts<SPI, CS, RST>>,
    delay: Mutex<D>,
    crc: EmbassyState<Crc32Accumulator>,
    locked: AtomicBool,
    time: T,
}

impl<SPI, CS, RST, D, T> HalPlatform<SPI, CS, RST, D, T>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    RST: OutputPin,
    D: DelayNs,
    T: TimeSource,
{
    /// Wrap the peripherals
    ///
    /// Chip select is left deasserted and the reset line released.
    pub fn new(spi: SPI, mut cs: CS, mut rst: RST, delay: D, time: T) -> Self {
        if cs.set_high().is_err() {
            crate::log_warn!("SJA1105 chip select could not be deasserted");
        }
        if rst.set_high().is_err() {
            crate::log_warn!("SJA1105 reset line could not be released");
        }
        Self {
            parts: EmbassyState::new(Parts { spi, cs, rst }),
            delay: Mutex::new(delay),
            crc: EmbassyState::new(Crc32Accumulator::new()),
            locked: AtomicBool::new(false),
            time,
        }
    }

    /// Whether the device mutex is currently held
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    fn try_lock(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Fail once `timeout_ms` has passed since `start`
    fn check_deadline(&self, start: u64, timeout_ms: u32) -> Result<()> {
        if self.time.expired(start, timeout_ms) {
            crate::log_warn!("SJA1105 transfer exceeded {} ms", timeout_ms);
            return Err(PlatformError::Spi(SpiError::Timeout));
        }
        Ok(())
    }

    /// Exchange one word in place, bounded by the transfer deadline
    fn exchange(
        &self,
        bytes: &mut [u8; 4],
        index: usize,
        start: u64,
        timeout_ms: u32,
    ) -> Result<()> {
        if index > 0 {
            self.check_deadline(start, timeout_ms)?;
        }
        self.parts
            .with_mut(|p| p.spi.transfer_in_place(bytes).map_err(spi_error))
    }

    fn flush(&self) -> Result<()> {
        self.parts.with_mut(|p| p.spi.flush().map_err(spi_error))
    }
}

fn spi_error<E>(_: E) -> PlatformError {
    PlatformError::Spi(SpiError::TransferFailed)
}

impl<SPI, CS, RST, D, T> Sja1105Platform for HalPlatform<SPI, CS, RST, D, T>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    RST: OutputPin,
    D: DelayNs,
    T: TimeSource,
{
    fn transmit(&self, words: &[u32], timeout_ms: u32) -> Result<()> {
        let start = self.time.now_ms();
        for (index, word) in words.iter().enumerate() {
            if index > 0 {
                self.check_deadline(start, timeout_ms)?;
            }
            self.parts
                .with_mut(|p| p.spi.write(&word.to_be_bytes()).map_err(spi_error))?;
        }
        self.flush()
    }

    fn receive(&self, words: &mut [u32], timeout_ms: u32) -> Result<()> {
        let start = self.time.now_ms();
        for (index, word) in words.iter_mut().enumerate() {
            let mut bytes = [0u8; 4];
            self.exchange(&mut bytes, index, start, timeout_ms)?;
            *word = u32::from_be_bytes(bytes);
        }
        self.flush()
    }

    fn transmit_receive(&self, tx: &[u32], rx: &mut [u32], timeout_ms: u32) -> Result<()> {
        if tx.len() != rx.len() {
            return Err(PlatformError::Spi(SpiError::LengthMismatch));
        }
        let start = self.time.now_ms();
        for (index, (out, word)) in tx.iter().zip(rx.iter_mut()).enumerate() {
            let mut bytes = out.to_be_bytes();
            self.exchange(&mut bytes, index, start, timeout_ms)?;
            *word = u32::from_be_bytes(bytes);
        }
        self.flush()
    }

    fn set_chip_select(&self, active: bool) {
        let result = self.parts.with_mut(|p| {
            if active {
                p.cs.set_low()
            } else {
                p.cs.set_high()
            }
            .map_err(|_| PlatformError::Gpio(GpioError::DriveFailed))
        });
        if result.is_err() {
            crate::log_error!("SJA1105 chip select drive failed");
        }
    }

    fn set_reset_line(&self, high: bool) {
        let result = self.parts.with_mut(|p| {
            if high {
                p.rst.set_high()
            } else {
                p.rst.set_low()
            }
            .map_err(|_| PlatformError::Gpio(GpioError::DriveFailed))
        });
        if result.is_err() {
            crate::log_error!("SJA1105 reset line drive failed");
        }
    }

    fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }

    fn delay_ns(&self, ns: u32) {
        self.delay.lock().delay_ns(ns);
    }

    fn delay_ms(&self, ms: u32) {
        self.delay.lock().delay_ms(ms);
    }

    fn take_mutex(&self, timeout_ms: u32) -> Result<()> {
        let start = self.time.now_ms();
        loop {
            if self.try_lock() {
                return Ok(());
            }
            if self.time.expired(start, timeout_ms) {
                return Err(PlatformError::Mutex(MutexError::Timeout));
            }
            self.delay.lock().delay_us(MUTEX_RETRY_US);
        }
    }

    fn give_mutex(&self) {
        self.locked.store(false, Ordering::Release);
    }

    fn crc_reset(&self) {
        self.crc.with_mut(|crc| crc.reset());
    }

    fn crc_accumulate(&self, words: &[u32]) -> u32 {
        self.crc.with_mut(|crc| crc.accumulate(words))
    }
}
