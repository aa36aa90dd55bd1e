//! SJA1105 timing constants
//!
//! Durations from the switch datasheet that every sequencing decision is
//! built on. These are protocol constants, not configuration.

/// Reset pin pulse width (5 us)
pub const T_RST_NS: u32 = 5_000;

/// Settle time after a hardware (pin) reset before the first SPI access (329 us)
pub const T_RST_STARTUP_HW_NS: u32 = 329_000;

/// Settle time after a software (register) reset (2 us)
pub const T_RST_STARTUP_SW_NS: u32 = 2_000;

/// Minimum spacing between the control frame and write payload
pub const T_SPI_WR_NS: u32 = 130;

/// Delay between the read control frame and the first data word
pub const T_SPI_CTRL_DATA_NS: u32 = 64;

/// Chip select assertion to first clock edge
pub const T_SPI_LEAD_NS: u32 = 40;

/// Last clock edge to chip select release
pub const T_SPI_LAG_NS: u32 = 40;

/// Number of poll attempts that fit into `timeout_ms` at `interval_ms` spacing
///
/// Always at least one attempt, even with a zero timeout. A zero interval is
/// treated as one millisecond.
pub const fn poll_attempts(timeout_ms: u32, interval_ms: u32) -> u32 {
    let interval = if interval_ms == 0 { 1 } else { interval_ms };
    timeout_ms / interval + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_attempts() {
        assert_eq!(poll_attempts(100, 1), 101);
        assert_eq!(poll_attempts(100, 10), 11);
        assert_eq!(poll_attempts(0, 1), 1);
        assert_eq!(poll_attempts(5, 0), 6);
    }

    #[test]
    fn test_hw_settle_exceeds_sw_settle() {
        assert!(T_RST_STARTUP_HW_NS > T_RST_STARTUP_SW_NS);
        assert!(T_RST_NS > T_SPI_WR_NS);
    }
}
