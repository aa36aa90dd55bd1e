//! Chunked table writes
//!
//! Configuration tables are longer than what one transaction should carry.
//! They are split into chunks of at most `max_transfer_words` words, each
//! sent behind its own write frame at `base + offset`.

use super::driver::Sja1105;
use super::error::{ArgumentError, Result, Sja1105Error};
use crate::core::logging::device_log;
use crate::platform::Sja1105Platform;
use sja1105_core::chunk::ChunkPlan;
use sja1105_core::frame::{ControlFrame, MAX_TX_PAYLOAD_WORDS};

/// Table write integrity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteMode {
    /// Send the chunks and return
    Fast,
    /// Accumulate a CRC over the sent words and compare it with the
    /// checksum the switch reports afterwards
    Safe,
}

impl<P> Sja1105<P>
where
    P: Sja1105Platform,
{
    /// Write `table` to consecutive registers starting at `base`
    ///
    /// The device mutex is held for the whole table. Chunks are sent in
    /// order; the first transport error stops the sequence and leaves the
    /// remaining chunks unsent. The whole table has to be written again to
    /// recover.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for an empty table or one above 65535 words
    /// - `Timeout` if the device mutex is not available in time
    /// - `Transport` on the first failed chunk
    /// - `Integrity` in [`WriteMode::Safe`] when the checksums disagree
    pub fn write_table(&self, base: u32, table: &[u32], mode: WriteMode) -> Result<()> {
        if table.is_empty() {
            return Err(Sja1105Error::InvalidArgument(ArgumentError::EmptyPayload));
        }
        if table.len() > MAX_TX_PAYLOAD_WORDS {
            return Err(Sja1105Error::InvalidArgument(ArgumentError::WriteTooLarge(
                table.len(),
            )));
        }

        let lock = self.lock()?;
        let plan = ChunkPlan::new(base, table.len(), self.config().max_transfer());
        crate::log_debug!(
            "SJA1105 table write at {:#x}: {} words in {} chunks",
            base,
            table.len(),
            plan.transactions()
        );

        if mode == WriteMode::Safe {
            self.platform().crc_reset();
        }
        let mut expected = 0;
        for chunk in plan {
            let words = chunk.of(table);
            let frame = self.write_frame(chunk.address, words.len())?;
            if let Err(e) = self.write_words(&lock, frame, words) {
                device_log!(
                    self,
                    "table write stopped at {:#x} (offset {})",
                    chunk.address,
                    chunk.offset
                );
                return Err(e);
            }
            if mode == WriteMode::Safe {
                expected = self.platform().crc_accumulate(words);
            }
        }

        if mode == WriteMode::Safe {
            let mut actual = [0u32; 1];
            let frame = ControlFrame::read(self.config().registers.table_crc, 1)?;
            self.read_frame(&lock, frame, &mut actual)?;
            if actual[0] != expected {
                device_log!(
                    self,
                    "table checksum mismatch: {:#010x} != {:#010x}",
                    actual[0],
                    expected
                );
                return Err(Sja1105Error::Integrity {
                    expected,
                    actual: actual[0],
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::config::Sja1105Config;
    use super::super::registers::TABLE_CRC;
    use super::*;
    use crate::platform::crc::crc32_words;
    use crate::platform::mock::MockSwitch;
    use sja1105_core::frame::Direction;

    fn table(len: usize) -> Vec<u32> {
        (0..len as u32).map(|i| i.wrapping_mul(0x0101_0101)).collect()
    }

    #[test]
    fn test_chunks_follow_plan() {
        let mock = MockSwitch::new();
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        let data = table(150);
        dev.write_table(0x20000, &data, WriteMode::Fast).unwrap();

        let frames = mock.write_frames();
        let addresses: Vec<_> = frames.iter().map(|f| f.address()).collect();
        assert_eq!(addresses, vec![0x20000, 0x20040, 0x20080]);
        assert_eq!(frames[2].words(), 22);
        for (i, word) in data.iter().enumerate() {
            assert_eq!(mock.register(0x20000 + i as u32), *word);
        }
        assert_eq!(dev.events().words_written, 150 + 3);
    }

    #[test]
    fn test_safe_mode_accepts_matching_checksum() {
        let mock = MockSwitch::new();
        let data = table(70);
        mock.set_register(TABLE_CRC, crc32_words(&data));
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        dev.write_table(0x20000, &data, WriteMode::Safe).unwrap();
        assert_eq!(mock.crc_resets(), 1);
        let last = mock.frames().pop().unwrap();
        assert_eq!(last.direction(), Direction::Read);
        assert_eq!(last.address(), TABLE_CRC);
    }

    #[test]
    fn test_safe_mode_reports_mismatch() {
        let mock = MockSwitch::new();
        let data = table(10);
        mock.set_register(TABLE_CRC, 0x1234_5678);
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        assert_eq!(
            dev.write_table(0x20000, &data, WriteMode::Safe),
            Err(Sja1105Error::Integrity {
                expected: crc32_words(&data),
                actual: 0x1234_5678
            })
        );
    }

    #[test]
    fn test_empty_table_rejected() {
        let mock = MockSwitch::new();
        let dev = Sja1105::new(&mock, Sja1105Config::default());
        assert_eq!(
            dev.write_table(0x20000, &[], WriteMode::Fast),
            Err(Sja1105Error::InvalidArgument(ArgumentError::EmptyPayload))
        );
        assert!(mock.timeline().is_empty());
    }

    #[test]
    fn test_stops_at_first_failed_chunk() {
        let mock = MockSwitch::new();
        let dev = Sja1105::new(&mock, Sja1105Config::default().with_max_transfer_words(4));
        // first chunk: frame + payload, second chunk: frame only
        mock.fail_transmit_after(3);
        assert!(dev.write_table(0x100, &table(12), WriteMode::Fast).is_err());
        assert_eq!(mock.write_frames().len(), 2);
        assert_eq!(dev.events().words_written, 4 + 1 + 1);
        assert_eq!(dev.events().spi_errors, 1);
    }
}
