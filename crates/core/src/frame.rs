//! SPI control frame codec
//!
//! Every SJA1105 transaction starts with a single 32-bit control word that
//! selects the direction, the payload size and the target address:
//!
//! ```text
//! ┌─────┬──────────────┬───────────────────────────┬──────────┐
//! │ 31  │ 30:25        │ 24:4                      │ 3:0      │
//! │ R/W │ word count   │ address (21 bits)         │ reserved │
//! └─────┴──────────────┴───────────────────────────┴──────────┘
//! ```
//!
//! The word count field is 6 bits wide. A value of zero stands for 64 words,
//! which is also the receive ceiling of the device. Write payloads are not
//! bounded by the field: the switch keeps accepting words for as long as chip
//! select stays asserted.

/// Write bit of the control word
pub const WRITE_FRAME: u32 = 1 << 31;

/// Read frames leave the direction bit cleared
pub const READ_FRAME: u32 = 0;

/// Largest write payload, in words, the protocol layer will put behind one frame
pub const MAX_TX_PAYLOAD_WORDS: usize = u16::MAX as usize;

/// Largest read payload, in words (6-bit size field)
pub const MAX_RX_PAYLOAD_WORDS: usize = 64;

/// 21-bit register address
pub const ADDR_MASK: u32 = 0x001f_ffff;

/// Address occupies bits [24:4]
pub const ADDR_POSITION: u32 = 4;

/// 6-bit word count
pub const SIZE_MASK: u32 = 0x0000_003f;

/// Word count occupies bits [30:25]
pub const SIZE_POSITION: u32 = 25;

/// Transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host reads from the switch
    Read,
    /// Host writes to the switch
    Write,
}

/// Control frame construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Payload is empty
    EmptyPayload,
    /// Read payload exceeds [`MAX_RX_PAYLOAD_WORDS`]
    ReadTooLarge(usize),
    /// Write payload exceeds [`MAX_TX_PAYLOAD_WORDS`]
    WriteTooLarge(usize),
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::EmptyPayload => write!(f, "empty payload"),
            FrameError::ReadTooLarge(n) => {
                write!(f, "read of {} words exceeds {}", n, MAX_RX_PAYLOAD_WORDS)
            }
            FrameError::WriteTooLarge(n) => {
                write!(f, "write of {} words exceeds {}", n, MAX_TX_PAYLOAD_WORDS)
            }
        }
    }
}

/// Decoded control frame
///
/// Instances built through [`ControlFrame::read`] or [`ControlFrame::write`]
/// always satisfy the size bounds; the address is stored already masked to
/// 21 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFrame {
    direction: Direction,
    address: u32,
    words: usize,
}

impl ControlFrame {
    /// Build a read frame for `words` words at `address`
    ///
    /// # Errors
    ///
    /// Returns `FrameError::EmptyPayload` for zero words and
    /// `FrameError::ReadTooLarge` above 64 words.
    pub fn read(address: u32, words: usize) -> Result<Self, FrameError> {
        if words == 0 {
            return Err(FrameError::EmptyPayload);
        }
        if words > MAX_RX_PAYLOAD_WORDS {
            return Err(FrameError::ReadTooLarge(words));
        }
        Ok(Self {
            direction: Direction::Read,
            address: address & ADDR_MASK,
            words,
        })
    }

    /// Build a write frame for `words` words at `address`
    ///
    /// # Errors
    ///
    /// Returns `FrameError::EmptyPayload` for zero words and
    /// `FrameError::WriteTooLarge` above [`MAX_TX_PAYLOAD_WORDS`].
    pub fn write(address: u32, words: usize) -> Result<Self, FrameError> {
        if words == 0 {
            return Err(FrameError::EmptyPayload);
        }
        if words > MAX_TX_PAYLOAD_WORDS {
            return Err(FrameError::WriteTooLarge(words));
        }
        Ok(Self {
            direction: Direction::Write,
            address: address & ADDR_MASK,
            words,
        })
    }

    /// Transfer direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Masked 21-bit address
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Payload length in words
    pub fn words(&self) -> usize {
        self.words
    }

    /// Encode into the on-wire control word
    ///
    /// Only the low 6 bits of the word count reach the wire. For reads this
    /// is lossless (64 encodes as 0); for writes above 64 words the field is
    /// informational and the switch relies on chip select instead.
    pub fn encode(&self) -> u32 {
        let dir = match self.direction {
            Direction::Read => READ_FRAME,
            Direction::Write => WRITE_FRAME,
        };
        let size = (self.words as u32) & SIZE_MASK;
        dir | (size << SIZE_POSITION) | ((self.address & ADDR_MASK) << ADDR_POSITION)
    }

    /// Decode an on-wire control word
    ///
    /// A zero size field decodes as 64 words. Reserved bits are ignored.
    pub fn decode(word: u32) -> Self {
        let direction = if word & WRITE_FRAME != 0 {
            Direction::Write
        } else {
            Direction::Read
        };
        let size = ((word >> SIZE_POSITION) & SIZE_MASK) as usize;
        Self {
            direction,
            address: (word >> ADDR_POSITION) & ADDR_MASK,
            words: if size == 0 { MAX_RX_PAYLOAD_WORDS } else { size },
        }
    }
}
