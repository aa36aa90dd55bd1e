//! Lookup table invalidation planning
//!
//! Dynamic reconfiguration of a lookup table entry is a write of the entry
//! image followed by a command word that tells the switch what to do with it.
//! Writing the command with VALIDENT cleared invalidates the entry at the
//! index carried in the image. The switch clears the VALID bit of the command
//! register once the command has been processed.
//!
//! [`LutLayout`] captures where those registers live and where the index
//! field sits, so that the invalidation algorithm stays device independent.

use core::ops::RangeInclusive;
use heapless::Vec;

/// Longest entry image, in words, a layout may describe
pub const MAX_ENTRY_WORDS: usize = 8;

/// Entry image plus command word
pub const MAX_BURST_WORDS: usize = MAX_ENTRY_WORDS + 1;

/// Lookup table range errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutError {
    /// `low` is above `high`
    InvertedRange { low: u16, high: u16 },
    /// Index beyond the table capacity
    OutOfBounds { index: u16, capacity: u16 },
    /// Layout describes an entry image longer than [`MAX_ENTRY_WORDS`]
    EntryTooLong(usize),
}

impl core::fmt::Display for LutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LutError::InvertedRange { low, high } => {
                write!(f, "inverted range {}..={}", low, high)
            }
            LutError::OutOfBounds { index, capacity } => {
                write!(f, "index {} out of bounds (capacity {})", index, capacity)
            }
            LutError::EntryTooLong(n) => write!(f, "entry image of {} words too long", n),
        }
    }
}

/// Register layout of a dynamically reconfigurable lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LutLayout {
    /// Address of the first entry image word
    pub entry_addr: u32,
    /// Entry image length in words
    pub entry_words: usize,
    /// Word of the image that holds the index field
    pub index_word: usize,
    /// Bit position of the index field
    pub index_shift: u32,
    /// Index field mask (before shifting)
    pub index_mask: u32,
    /// Address of the command word
    pub command_addr: u32,
    /// VALID bit: set by the host to start a command, cleared by the switch when done
    pub valid: u32,
    /// RDWRSET bit: selects a write command
    pub rdwrset: u32,
    /// VALIDENT bit: entry validity written by the command
    pub valident: u32,
    /// Extra command bits ORed into every invalidation (host command field)
    pub command_extra: u32,
    /// Number of entries in the table
    pub capacity: u16,
}

/// One register write of an invalidation command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LutWrite {
    /// Target address
    pub address: u32,
    /// Payload
    pub data: Vec<u32, MAX_BURST_WORDS>,
}

impl LutLayout {
    /// Whether the command word directly follows the entry image
    ///
    /// When it does, image and command go out as a single transaction.
    pub fn is_contiguous(&self) -> bool {
        self.command_addr == self.entry_addr.wrapping_add(self.entry_words as u32)
    }

    /// Validate an inclusive index range against the table capacity
    ///
    /// # Errors
    ///
    /// Returns `LutError::InvertedRange` when `low > high` and
    /// `LutError::OutOfBounds` when `high` is beyond the capacity.
    pub fn check_range(&self, low: u16, high: u16) -> Result<RangeInclusive<u16>, LutError> {
        if low > high {
            return Err(LutError::InvertedRange { low, high });
        }
        if high >= self.capacity {
            return Err(LutError::OutOfBounds {
                index: high,
                capacity: self.capacity,
            });
        }
        if self.entry_words > MAX_ENTRY_WORDS || self.index_word >= self.entry_words.max(1) {
            return Err(LutError::EntryTooLong(self.entry_words));
        }
        Ok(low..=high)
    }

    /// Command word that invalidates the entry carried in the image
    pub fn invalidate_command(&self) -> u32 {
        (self.valid | self.rdwrset | self.command_extra) & !self.valident
    }

    /// Register writes that invalidate the entry at `index`
    ///
    /// One write when the layout is contiguous, otherwise the entry image
    /// followed by the command word.
    pub fn invalidate_writes(&self, index: u16) -> Vec<LutWrite, 2> {
        let mut image: Vec<u32, MAX_BURST_WORDS> = Vec::new();
        for word in 0..self.entry_words.min(MAX_ENTRY_WORDS) {
            let value = if word == self.index_word {
                (index as u32 & self.index_mask) << self.index_shift
            } else {
                0
            };
            let _ = image.push(value);
        }

        let mut writes = Vec::new();
        if self.is_contiguous() {
            let _ = image.push(self.invalidate_command());
            let _ = writes.push(LutWrite {
                address: self.entry_addr,
                data: image,
            });
        } else {
            let mut command = Vec::new();
            let _ = command.push(self.invalidate_command());
            if !image.is_empty() {
                let _ = writes.push(LutWrite {
                    address: self.entry_addr,
                    data: image,
                });
            }
            let _ = writes.push(LutWrite {
                address: self.command_addr,
                data: command,
            });
        }
        writes
    }
}
