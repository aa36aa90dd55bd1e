//! Flag reads and polls

use super::driver::{DeviceLock, Sja1105};
use super::error::{Result, Sja1105Error};
use super::registers::FlagSpec;
use crate::core::logging::device_log;
use crate::platform::Sja1105Platform;
use sja1105_core::frame::ControlFrame;
use sja1105_core::timing::poll_attempts;

impl<P> Sja1105<P>
where
    P: Sja1105Platform,
{
    /// Whether any bit of `mask` is set in the register at `addr`
    ///
    /// # Errors
    ///
    /// `Timeout` if the device mutex is not available in time, `Transport` if
    /// the read fails.
    pub fn read_flag(&self, addr: u32, mask: u32) -> Result<bool> {
        let lock = self.lock()?;
        self.flag(&lock, addr, mask)
    }

    /// Poll a flag until it reads `polarity`
    ///
    /// The flag is read up to `timeout_ms / poll_interval_ms + 1` times with
    /// `poll_interval_ms` between attempts. The device mutex is held for the
    /// whole poll.
    ///
    /// # Errors
    ///
    /// `Timeout` once the attempts are exhausted, `Transport` as soon as a
    /// read fails.
    pub fn poll_flag(&self, addr: u32, mask: u32, polarity: bool) -> Result<()> {
        let lock = self.lock()?;
        self.poll(
            &lock,
            FlagSpec {
                address: addr,
                mask,
                polarity,
            },
        )
    }

    pub(super) fn flag(&self, lock: &DeviceLock<'_, P>, addr: u32, mask: u32) -> Result<bool> {
        let mut value = [0u32; 1];
        self.read_frame(lock, ControlFrame::read(addr, 1)?, &mut value)?;
        Ok(value[0] & mask != 0)
    }

    pub(super) fn poll(&self, lock: &DeviceLock<'_, P>, flag: FlagSpec) -> Result<()> {
        let interval = self.config().poll_interval_ms.max(1);
        let attempts = poll_attempts(self.config().timeout_ms, interval);
        for attempt in 0..attempts {
            if self.flag(lock, flag.address, flag.mask)? == flag.polarity {
                return Ok(());
            }
            if attempt + 1 < attempts {
                self.platform().delay_ms(interval);
            }
        }
        device_log!(
            self,
            "flag {:#x}/{:#x} did not reach {} after {} polls",
            flag.address,
            flag.mask,
            flag.polarity,
            attempts
        );
        Err(Sja1105Error::Timeout)
    }
}
