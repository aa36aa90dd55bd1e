//! CRC-32 accumulation over SPI words
//!
//! The switch checks its configuration with the IEEE 802.3 CRC-32, computed
//! over the words in the order and byte order they travel on the wire (most
//! significant byte first). Platforms without a hardware CRC unit can back
//! their `crc_reset`/`crc_accumulate` capabilities with [`Crc32Accumulator`].

use crc::{Crc, Digest, CRC_32_ISO_HDLC};

/// CRC32 algorithm (ISO HDLC / Ethernet)
pub static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Calculate the CRC32 of a word sequence in one go
///
/// ```
/// use sja1105::platform::crc::crc32_words;
///
/// // "1234" packed into one big-endian word
/// assert_eq!(crc32_words(&[0x3132_3334]), 0x9be3_e0a3);
/// ```
pub fn crc32_words(words: &[u32]) -> u32 {
    let mut digest = CRC32.digest();
    for word in words {
        digest.update(&word.to_be_bytes());
    }
    digest.finalize()
}

/// Running CRC32 over word chunks
#[derive(Clone)]
pub struct Crc32Accumulator {
    digest: Digest<'static, u32>,
}

impl Crc32Accumulator {
    /// Start a fresh accumulation
    pub fn new() -> Self {
        Self {
            digest: CRC32.digest(),
        }
    }

    /// Discard everything accumulated so far
    pub fn reset(&mut self) {
        self.digest = CRC32.digest();
    }

    /// Feed `words` and return the CRC of everything fed since the last reset
    pub fn accumulate(&mut self, words: &[u32]) -> u32 {
        for word in words {
            self.digest.update(&word.to_be_bytes());
        }
        self.value()
    }

    /// CRC of everything fed since the last reset
    pub fn value(&self) -> u32 {
        self.digest.clone().finalize()
    }
}

impl Default for Crc32Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_known_value() {
        assert_eq!(CRC32.checksum(b"123456789"), 0xCBF43926);
        assert_eq!(crc32_words(&[]), 0);
    }

    #[test]
    fn test_accumulate_matches_one_shot() {
        let words = [0xdead_beef, 0x0102_0304, 0, 0xffff_ffff, 0x1234_5678];
        let mut acc = Crc32Accumulator::new();
        acc.accumulate(&words[..2]);
        let chunked = acc.accumulate(&words[2..]);
        assert_eq!(chunked, crc32_words(&words));
    }

    #[test]
    fn test_reset_discards_state() {
        let mut acc = Crc32Accumulator::new();
        acc.accumulate(&[1, 2, 3]);
        acc.reset();
        assert_eq!(acc.accumulate(&[4]), crc32_words(&[4]));
    }

    #[test]
    fn test_word_byte_order_matters() {
        assert_ne!(crc32_words(&[0x0000_0001]), crc32_words(&[0x0100_0000]));
    }
}
