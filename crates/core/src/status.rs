//! Device identification and configuration status
//!
//! Decoders for the two read-only registers every bring-up sequence looks at
//! first: the device ID and the initial configuration status flags.

use bitflags::bitflags;

/// SJA1105E device ID
pub const SJA1105E_DEVICE_ID: u32 = 0x9c00_000e;
/// SJA1105T device ID
pub const SJA1105T_DEVICE_ID: u32 = 0x9e00_030e;
/// SJA1105P and SJA1105R share a device ID
pub const SJA1105PR_DEVICE_ID: u32 = 0xaf00_030e;
/// SJA1105Q and SJA1105S share a device ID
pub const SJA1105QS_DEVICE_ID: u32 = 0xae00_030e;

bitflags! {
    /// Initial configuration status flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConfigStatus: u32 {
        /// Configuration is valid and has been applied
        const CONFIGS = 1 << 31;
        /// Local (per-table) CRC check failed
        const CRCCHKL = 1 << 30;
        /// Device ID in the configuration did not match
        const IDS = 1 << 29;
        /// Global CRC check failed
        const CRCCHKG = 1 << 28;
    }
}

impl ConfigStatus {
    /// Decode the raw status register
    pub fn from_register(value: u32) -> Self {
        Self::from_bits_truncate(value)
    }

    /// Configuration loaded and every check passed
    pub fn is_loaded(&self) -> bool {
        self.contains(Self::CONFIGS)
            && !self.intersects(Self::CRCCHKL | Self::IDS | Self::CRCCHKG)
    }
}

/// Switch family member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// SJA1105E
    E,
    /// SJA1105T
    T,
    /// SJA1105P or SJA1105R (distinguished only by part number)
    PR,
    /// SJA1105Q or SJA1105S (distinguished only by part number)
    QS,
}

impl Variant {
    /// Identify the family member from the device ID register
    pub fn from_device_id(id: u32) -> Option<Self> {
        match id {
            SJA1105E_DEVICE_ID => Some(Variant::E),
            SJA1105T_DEVICE_ID => Some(Variant::T),
            SJA1105PR_DEVICE_ID => Some(Variant::PR),
            SJA1105QS_DEVICE_ID => Some(Variant::QS),
            _ => None,
        }
    }

    /// Device ID this variant reports
    pub fn device_id(&self) -> u32 {
        match self {
            Variant::E => SJA1105E_DEVICE_ID,
            Variant::T => SJA1105T_DEVICE_ID,
            Variant::PR => SJA1105PR_DEVICE_ID,
            Variant::QS => SJA1105QS_DEVICE_ID,
        }
    }

    /// First generation (E/T) register map
    pub fn is_first_generation(&self) -> bool {
        matches!(self, Variant::E | Variant::T)
    }
}
