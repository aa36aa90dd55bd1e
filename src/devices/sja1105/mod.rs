//! NXP SJA1105 Automotive Ethernet Switch
//!
//! SPI control-plane driver for the SJA1105 family (E, T, P, Q, R, S).
//!
//! ## Features
//!
//! - Register reads (up to 64 words) with optional double-read verification
//! - Register writes and raw full-duplex transfers
//! - Flag reads and bounded polls
//! - Chunked table writes with optional CRC verification
//! - L2 address lookup table range invalidation with resumable progress
//! - Warm, cold and pin resets followed by a readiness poll
//! - Per-device transport counters
//!
//! ## Usage
//!
//! ```ignore
//! use sja1105::devices::sja1105::{Sja1105, Sja1105Config, WriteMode};
//!
//! let switch = Sja1105::new(platform, Sja1105Config::default().with_switch_id(1));
//! switch.cfg_reset()?;
//! switch.write_table(STATIC_CONFIG, &config_blob, WriteMode::Safe)?;
//! switch.l2_lut_invalidate_range(0, 1023)?;
//! ```

mod config;
mod driver;
mod error;
mod flag;
mod io;
mod lut;
pub mod registers;
mod reset;
mod table;

pub use config::{Sja1105Config, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use driver::Sja1105;
pub use error::{ArgumentError, LutRangeError, Result, Sja1105Error};
pub use registers::{FlagSpec, RegisterMap};
pub use table::WriteMode;
