//! Register transactions
//!
//! A read is one chip select window holding the read control frame followed,
//! after the control-to-data latency, by the received words. A write is the
//! write control frame, the minimum write spacing, then the payload.

use super::driver::{DeviceLock, Sja1105};
use super::error::{ArgumentError, Result, Sja1105Error};
use crate::core::logging::device_log;
use crate::platform::Sja1105Platform;
use sja1105_core::frame::{ControlFrame, MAX_RX_PAYLOAD_WORDS};
use sja1105_core::timing::{T_SPI_CTRL_DATA_NS, T_SPI_WR_NS};

impl<P> Sja1105<P>
where
    P: Sja1105Platform,
{
    /// Read `out.len()` consecutive registers starting at `addr`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for zero or more than 64 words, before any bus traffic
    /// - `Timeout` if the device mutex is not available in time
    /// - `Transport` if a transport call fails
    pub fn read_register(&self, addr: u32, out: &mut [u32]) -> Result<()> {
        let frame = ControlFrame::read(addr, out.len())?;
        let lock = self.lock()?;
        self.read_frame(&lock, frame, out)
    }

    /// Read twice and accept the result only if both reads agree
    ///
    /// # Errors
    ///
    /// Same as [`read_register`](Self::read_register), plus `Verification`
    /// when the two reads differ.
    pub fn read_register_with_check(&self, addr: u32, out: &mut [u32]) -> Result<()> {
        let frame = ControlFrame::read(addr, out.len())?;
        let lock = self.lock()?;
        self.read_checked(&lock, frame, out)
    }

    /// Write `words` to consecutive registers starting at `addr`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty payload or one above the configured
    ///   transfer ceiling, before any bus traffic
    /// - `Timeout` if the device mutex is not available in time
    /// - `Transport` if a transport call fails
    pub fn write_register(&self, addr: u32, words: &[u32]) -> Result<()> {
        let frame = self.write_frame(addr, words.len())?;
        let lock = self.lock()?;
        self.write_words(&lock, frame, words)
    }

    /// Raw full-duplex transaction in one chip select window
    ///
    /// `tx` must start with a control frame. Whatever the switch clocks out
    /// while a word is transmitted lands at the same index of `rx`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for empty or unequal buffers
    /// - `Timeout` if the device mutex is not available in time
    /// - `Transport` if the transfer fails
    pub fn transfer(&self, tx: &[u32], rx: &mut [u32]) -> Result<()> {
        if tx.is_empty() {
            return Err(Sja1105Error::InvalidArgument(ArgumentError::EmptyPayload));
        }
        if tx.len() != rx.len() {
            return Err(Sja1105Error::InvalidArgument(
                ArgumentError::LengthMismatch {
                    tx: tx.len(),
                    rx: rx.len(),
                },
            ));
        }
        let lock = self.lock()?;
        let cs = self.select(&lock);
        self.transmit_receive(&cs, tx, rx)
    }

    /// Validated write frame for `words` words
    pub(super) fn write_frame(&self, addr: u32, words: usize) -> Result<ControlFrame> {
        if words > self.config().max_transfer() {
            return Err(Sja1105Error::InvalidArgument(ArgumentError::WriteTooLarge(
                words,
            )));
        }
        Ok(ControlFrame::write(addr, words)?)
    }

    pub(super) fn read_frame(
        &self,
        lock: &DeviceLock<'_, P>,
        frame: ControlFrame,
        out: &mut [u32],
    ) -> Result<()> {
        let cs = self.select(lock);
        self.transmit(&cs, &[frame.encode()])?;
        self.platform().delay_ns(T_SPI_CTRL_DATA_NS);
        self.receive(&cs, out)
    }

    pub(super) fn read_checked(
        &self,
        lock: &DeviceLock<'_, P>,
        frame: ControlFrame,
        out: &mut [u32],
    ) -> Result<()> {
        let mut check = [0u32; MAX_RX_PAYLOAD_WORDS];
        let check = &mut check[..out.len()];
        self.read_frame(lock, frame, out)?;
        self.read_frame(lock, frame, check)?;
        if out != check {
            device_log!(self, "read of {:#x} not stable", frame.address());
            return Err(Sja1105Error::Verification);
        }
        Ok(())
    }

    pub(super) fn write_words(
        &self,
        lock: &DeviceLock<'_, P>,
        frame: ControlFrame,
        words: &[u32],
    ) -> Result<()> {
        let cs = self.select(lock);
        self.transmit(&cs, &[frame.encode()])?;
        self.platform().delay_ns(T_SPI_WR_NS);
        self.transmit(&cs, words)
    }
}
