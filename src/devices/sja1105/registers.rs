//! SJA1105 Register Definitions
//!
//! Addresses and bit positions the protocol operations consume. The switch
//! family comes in two generations with slightly different maps:
//!
//! - First generation: SJA1105E, SJA1105T
//! - Second generation: SJA1105P, SJA1105Q, SJA1105R, SJA1105S
//!
//! [`RegisterMap::default`] describes the second generation.

use sja1105_core::lut::LutLayout;
use sja1105_core::status::Variant;

// =============================================================================
// Common Registers
// =============================================================================

/// Device ID register
pub const DEVICE_ID: u32 = 0x00_0000;

/// Initial configuration status register
pub const CONFIG_STATUS: u32 = 0x00_0001;

/// Checksum readback of the last table write
pub const TABLE_CRC: u32 = 0x00_0002;

/// Static configuration area
pub const STATIC_CONFIG: u32 = 0x02_0000;

/// Reset generation unit control register
pub const RGU_RESET_CTRL: u32 = 0x10_0440;

// =============================================================================
// Reset Control Bits
// =============================================================================

/// Warm reset (P/Q/R/S)
pub const PQRS_WARM_RST: u32 = 1 << 3;

/// Cold reset (P/Q/R/S)
pub const PQRS_COLD_RST: u32 = 1 << 2;

/// Warm reset (E/T)
pub const ET_WARM_RST: u32 = 1 << 2;

/// Cold reset (E/T)
pub const ET_COLD_RST: u32 = 1 << 3;

// =============================================================================
// L2 Address Lookup Table Reconfiguration
// =============================================================================

/// Entry image (P/Q/R/S)
pub const PQRS_L2_LOOKUP_ENTRY: u32 = 0x24;

/// Entry image length (P/Q/R/S)
pub const PQRS_L2_LOOKUP_ENTRY_WORDS: usize = 5;

/// Index field position in entry word 0 (P/Q/R/S)
pub const PQRS_L2_LOOKUP_INDEX_SHIFT: u32 = 6;

/// Command register (P/Q/R/S)
pub const PQRS_L2_LOOKUP_CMD: u32 = 0x29;

/// Host command field value selecting invalidation (P/Q/R/S)
pub const PQRS_L2_LOOKUP_HOSTCMD_INVALIDATE: u32 = 4 << 23;

/// Entry image (E/T)
pub const ET_L2_LOOKUP_ENTRY: u32 = 0x20;

/// Entry image length (E/T)
pub const ET_L2_LOOKUP_ENTRY_WORDS: usize = 3;

/// Index field position in entry word 0 (E/T)
pub const ET_L2_LOOKUP_INDEX_SHIFT: u32 = 20;

/// Command register (E/T)
pub const ET_L2_LOOKUP_CMD: u32 = 0x23;

/// Index field width (10 bits)
pub const L2_LOOKUP_INDEX_MASK: u32 = 0x3ff;

/// L2 address lookup table capacity
pub const L2_LOOKUP_CAPACITY: u16 = 1024;

/// Command pending; cleared by the switch when done
pub const CMD_VALID: u32 = 1 << 31;

/// Write command
pub const CMD_RDWRSET: u32 = 1 << 30;

/// Entry valid
pub const CMD_VALIDENT: u32 = 1 << 27;

/// Single-bit flag location and the value it must reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Register address
    pub address: u32,
    /// Bits tested; the flag is set when any of them is set
    pub mask: u32,
    /// Awaited value
    pub polarity: bool,
}

/// Addresses and bits used by the device operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMap {
    /// Device ID register
    pub device_id: u32,
    /// Initial configuration status register
    pub config_status: u32,
    /// Checksum readback register used by safe table writes
    pub table_crc: u32,
    /// Reset control register
    pub reset_ctrl: u32,
    /// Warm reset bit
    pub warm_reset: u32,
    /// Cold reset bit
    pub cold_reset: u32,
    /// Flag polled after a reset until the switch answers
    pub ready: FlagSpec,
    /// L2 address lookup table reconfiguration layout
    pub l2_lookup: LutLayout,
}

impl Default for RegisterMap {
    fn default() -> Self {
        Self {
            device_id: DEVICE_ID,
            config_status: CONFIG_STATUS,
            table_crc: TABLE_CRC,
            reset_ctrl: RGU_RESET_CTRL,
            warm_reset: PQRS_WARM_RST,
            cold_reset: PQRS_COLD_RST,
            ready: FlagSpec {
                address: DEVICE_ID,
                mask: 0xffff_ffff,
                polarity: true,
            },
            l2_lookup: LutLayout {
                entry_addr: PQRS_L2_LOOKUP_ENTRY,
                entry_words: PQRS_L2_LOOKUP_ENTRY_WORDS,
                index_word: 0,
                index_shift: PQRS_L2_LOOKUP_INDEX_SHIFT,
                index_mask: L2_LOOKUP_INDEX_MASK,
                command_addr: PQRS_L2_LOOKUP_CMD,
                valid: CMD_VALID,
                rdwrset: CMD_RDWRSET,
                valident: CMD_VALIDENT,
                command_extra: PQRS_L2_LOOKUP_HOSTCMD_INVALIDATE,
                capacity: L2_LOOKUP_CAPACITY,
            },
        }
    }
}

impl RegisterMap {
    /// Register map of a family member
    pub fn for_variant(variant: Variant) -> Self {
        let map = Self::default();
        if !variant.is_first_generation() {
            return map;
        }
        Self {
            warm_reset: ET_WARM_RST,
            cold_reset: ET_COLD_RST,
            l2_lookup: LutLayout {
                entry_addr: ET_L2_LOOKUP_ENTRY,
                entry_words: ET_L2_LOOKUP_ENTRY_WORDS,
                index_shift: ET_L2_LOOKUP_INDEX_SHIFT,
                command_addr: ET_L2_LOOKUP_CMD,
                command_extra: 0,
                ..map.l2_lookup
            },
            ..map
        }
    }
}
