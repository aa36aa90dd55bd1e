//! L2 address lookup table invalidation

use super::driver::{DeviceLock, Sja1105};
use super::error::{LutRangeError, Result};
use super::registers::FlagSpec;
use crate::core::logging::device_log;
use crate::platform::Sja1105Platform;
use sja1105_core::frame::ControlFrame;

impl<P> Sja1105<P>
where
    P: Sja1105Platform,
{
    /// Invalidate L2 lookup entries `low..=high`
    ///
    /// Each entry costs one write burst (entry image plus command word)
    /// followed by a poll of the command's VALID bit until the switch clears
    /// it. The device mutex is held for the whole range.
    ///
    /// # Errors
    ///
    /// Returns a [`LutRangeError`] with the number of entries invalidated
    /// before the failure. Range errors (`low > high`, index beyond capacity)
    /// are reported with `invalidated == 0` before any bus traffic.
    pub fn l2_lut_invalidate_range(
        &self,
        low: u16,
        high: u16,
    ) -> core::result::Result<(), LutRangeError> {
        let layout = self.config().registers.l2_lookup;
        let range = layout.check_range(low, high).map_err(|e| LutRangeError {
            invalidated: 0,
            cause: e.into(),
        })?;
        let lock = self.lock().map_err(|cause| LutRangeError {
            invalidated: 0,
            cause,
        })?;

        let mut invalidated = 0u16;
        for index in range {
            if let Err(cause) = self.invalidate_entry(&lock, index) {
                device_log!(self, "L2 lookup invalidation stopped at {}", index);
                return Err(LutRangeError { invalidated, cause });
            }
            invalidated += 1;
        }
        crate::log_debug!("SJA1105 invalidated L2 lookup {}..={}", low, high);
        Ok(())
    }

    fn invalidate_entry(&self, lock: &DeviceLock<'_, P>, index: u16) -> Result<()> {
        let layout = self.config().registers.l2_lookup;
        // Burst length is fixed by the layout, not by the table write ceiling.
        for write in layout.invalidate_writes(index) {
            let frame = ControlFrame::write(write.address, write.data.len())?;
            self.write_words(lock, frame, &write.data)?;
        }
        self.poll(
            lock,
            FlagSpec {
                address: layout.command_addr,
                mask: layout.valid,
                polarity: false,
            },
        )
    }
}
