//! Reset sequencing and identification

use super::driver::{DeviceLock, Sja1105};
use super::error::{ArgumentError, Result, Sja1105Error};
use crate::core::logging::device_log;
use crate::platform::Sja1105Platform;
use sja1105_core::frame::ControlFrame;
use sja1105_core::status::{ConfigStatus, Variant};
use sja1105_core::timing::{T_RST_NS, T_RST_STARTUP_HW_NS, T_RST_STARTUP_SW_NS};

impl<P> Sja1105<P>
where
    P: Sja1105Platform,
{
    /// Warm reset through the reset generation unit
    ///
    /// Keeps the static configuration. Waits the software startup time, then
    /// polls the readiness flag.
    ///
    /// # Errors
    ///
    /// `Transport` if the register write fails, `Timeout` if the switch does
    /// not become ready.
    pub fn warm_reset(&self) -> Result<()> {
        let lock = self.lock()?;
        let bit = self.config().registers.warm_reset;
        self.register_reset(&lock, bit, T_RST_STARTUP_SW_NS)
    }

    /// Cold reset through the reset generation unit
    ///
    /// Equivalent to a power-on reset: the static configuration is lost.
    ///
    /// # Errors
    ///
    /// Same as [`warm_reset`](Self::warm_reset).
    pub fn cold_reset(&self) -> Result<()> {
        let lock = self.lock()?;
        let bit = self.config().registers.cold_reset;
        self.register_reset(&lock, bit, T_RST_STARTUP_HW_NS)
    }

    /// Hardware reset through the reset line
    ///
    /// Holds the line low for the reset pulse width, releases it, waits the
    /// hardware startup time, then polls the readiness flag. This is the only
    /// operation that drives the reset line.
    ///
    /// # Errors
    ///
    /// `Timeout` if the switch does not become ready, `Transport` if a
    /// readiness read fails.
    pub fn cfg_reset(&self) -> Result<()> {
        let lock = self.lock()?;
        self.platform().set_reset_line(false);
        self.platform().delay_ns(T_RST_NS);
        self.platform().set_reset_line(true);
        self.platform().delay_ns(T_RST_STARTUP_HW_NS);
        self.wait_ready(&lock)
    }

    /// Raw device ID register
    ///
    /// # Errors
    ///
    /// `Timeout` or `Transport`, as for any register read.
    pub fn read_device_id(&self) -> Result<u32> {
        let mut id = [0u32; 1];
        self.read_register(self.config().registers.device_id, &mut id)?;
        Ok(id[0])
    }

    /// Family member behind the device ID register
    ///
    /// # Errors
    ///
    /// `InvalidArgument(UnknownDevice)` for an ID outside the SJA1105 family.
    pub fn identify(&self) -> Result<Variant> {
        let id = self.read_device_id()?;
        match Variant::from_device_id(id) {
            Some(variant) => {
                crate::log_info!("SJA1105 {} identified", self.config().switch_id);
                Ok(variant)
            }
            None => {
                device_log!(self, "unknown device id {:#010x}", id);
                Err(Sja1105Error::InvalidArgument(ArgumentError::UnknownDevice(
                    id,
                )))
            }
        }
    }

    /// Initial configuration status, read twice for stability
    ///
    /// # Errors
    ///
    /// `Verification` if the two reads disagree, otherwise as for any
    /// register read.
    pub fn read_config_status(&self) -> Result<ConfigStatus> {
        let mut status = [0u32; 1];
        self.read_register_with_check(self.config().registers.config_status, &mut status)?;
        Ok(ConfigStatus::from_register(status[0]))
    }

    fn register_reset(&self, lock: &DeviceLock<'_, P>, bit: u32, settle_ns: u32) -> Result<()> {
        let frame = ControlFrame::write(self.config().registers.reset_ctrl, 1)?;
        self.write_words(lock, frame, &[bit])?;
        self.platform().delay_ns(settle_ns);
        self.wait_ready(lock)
    }

    fn wait_ready(&self, lock: &DeviceLock<'_, P>) -> Result<()> {
        let ready = self.config().registers.ready;
        let result = self.poll(lock, ready);
        if result.is_err() {
            crate::log_warn!("SJA1105 {} not ready after reset", self.config().switch_id);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::Sja1105Config;
    use super::super::registers::{DEVICE_ID, RGU_RESET_CTRL};
    use super::*;
    use crate::platform::mock::{MockEvent, MockSwitch};
    use sja1105_core::frame::Direction;

    #[test]
    fn test_warm_reset_writes_bit_and_polls() {
        let mock = MockSwitch::sja1105(Variant::QS);
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        dev.warm_reset().unwrap();

        let frames = mock.frames();
        assert_eq!(frames[0].direction(), Direction::Write);
        assert_eq!(frames[0].address(), RGU_RESET_CTRL);
        assert_eq!(frames[1].direction(), Direction::Read);
        assert_eq!(frames[1].address(), DEVICE_ID);
        let payload = mock.timeline().into_iter().find_map(|e| match e.event {
            MockEvent::Transmit(words) if words == vec![1 << 3] => Some(()),
            _ => None,
        });
        assert!(payload.is_some());
    }

    #[test]
    fn test_warm_reset_times_out_without_ready() {
        let mock = MockSwitch::new();
        let dev = Sja1105::new(&mock, Sja1105Config::default().with_timeout_ms(4));
        assert_eq!(dev.warm_reset(), Err(Sja1105Error::Timeout));
    }

    #[test]
    fn test_cfg_reset_pulses_reset_line() {
        let mock = MockSwitch::sja1105(Variant::PR);
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        dev.cfg_reset().unwrap();

        let timeline = mock.timeline();
        let low = timeline
            .iter()
            .find(|e| e.event == MockEvent::ResetLine(false))
            .unwrap();
        let high = timeline
            .iter()
            .find(|e| e.event == MockEvent::ResetLine(true))
            .unwrap();
        assert!(high.at_ns - low.at_ns >= T_RST_NS as u64);
        assert!(mock.reset_line());
    }

    #[test]
    fn test_identify() {
        let mock = MockSwitch::sja1105(Variant::E);
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        assert_eq!(dev.identify(), Ok(Variant::E));

        mock.set_register(DEVICE_ID, 0x1234);
        assert_eq!(
            dev.identify(),
            Err(Sja1105Error::InvalidArgument(ArgumentError::UnknownDevice(
                0x1234
            )))
        );
    }

    #[test]
    fn test_config_status() {
        let mock = MockSwitch::new();
        mock.set_register(0x1, 0x8000_0000);
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        assert!(dev.read_config_status().unwrap().is_loaded());
    }
}
