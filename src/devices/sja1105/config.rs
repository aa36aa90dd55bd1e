//! SJA1105 device configuration

use super::registers::RegisterMap;
use sja1105_core::frame::{MAX_RX_PAYLOAD_WORDS, MAX_TX_PAYLOAD_WORDS};
use sja1105_core::status::Variant;

/// Default bound for every blocking primitive (ms)
pub const DEFAULT_TIMEOUT_MS: u32 = 100;

/// Default interval between two readiness or busy polls (ms)
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1;

/// Per-device configuration
///
/// # Example
///
/// ```
/// use sja1105::devices::sja1105::Sja1105Config;
/// use sja1105_core::status::Variant;
///
/// let config = Sja1105Config::default()
///     .with_switch_id(2)
///     .with_variant(Variant::T)
///     .with_timeout_ms(50);
/// assert_eq!(config.registers.l2_lookup.command_addr, 0x23);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sja1105Config {
    /// Identifier reported in device log lines
    pub switch_id: u8,
    /// Bound for mutex acquisition, transport calls and readiness polls (ms)
    pub timeout_ms: u32,
    /// Largest write payload sent behind one control frame
    pub max_transfer_words: u16,
    /// Delay between two polls of a flag (ms)
    pub poll_interval_ms: u32,
    /// Forward diagnostics to `Sja1105Platform::write_log`
    pub logging: bool,
    /// Family member
    pub variant: Variant,
    /// Register map used by the device operations
    pub registers: RegisterMap,
}

impl Default for Sja1105Config {
    fn default() -> Self {
        Self {
            switch_id: 0,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_transfer_words: MAX_RX_PAYLOAD_WORDS as u16,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            logging: false,
            variant: Variant::QS,
            registers: RegisterMap::default(),
        }
    }
}

impl Sja1105Config {
    /// Set the switch identifier
    pub fn with_switch_id(mut self, switch_id: u8) -> Self {
        self.switch_id = switch_id;
        self
    }

    /// Set the timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the per-transaction write ceiling, clamped to `1..=65535`
    pub fn with_max_transfer_words(mut self, words: usize) -> Self {
        self.max_transfer_words = words.clamp(1, MAX_TX_PAYLOAD_WORDS) as u16;
        self
    }

    /// Set the poll interval (at least 1 ms)
    pub fn with_poll_interval_ms(mut self, interval_ms: u32) -> Self {
        self.poll_interval_ms = interval_ms.max(1);
        self
    }

    /// Enable or disable device logging
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }

    /// Select the family member and its register map
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self.registers = RegisterMap::for_variant(variant);
        self
    }

    /// Override the register map
    pub fn with_registers(mut self, registers: RegisterMap) -> Self {
        self.registers = registers;
        self
    }

    /// Per-transaction write ceiling in words
    pub fn max_transfer(&self) -> usize {
        (self.max_transfer_words as usize).max(1)
    }
}
