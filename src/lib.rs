#![cfg_attr(not(test), no_std)]

//! sja1105 - SPI control-plane protocol layer for NXP SJA1105 Ethernet switches
//!
//! This library provides the platform capability abstraction, the SJA1105
//! device handle with its register, table, lookup table and reset
//! operations, and a simulated switch for host testing.

#[cfg(all(feature = "mock", not(test)))]
extern crate std;

// Platform capabilities (SPI, pins, delays, mutex, CRC, log sink)
pub mod platform;

// Device drivers using platform abstraction
pub mod devices;

// Shared infrastructure (logging, synchronized state)
pub mod core;

pub use devices::sja1105::{Sja1105, Sja1105Config, Sja1105Error};
pub use platform::{PlatformError, Sja1105Platform};
