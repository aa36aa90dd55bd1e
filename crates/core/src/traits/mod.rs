//! Platform-agnostic trait abstractions
//!
//! Trait definitions carry no feature gates. Implementations live in the
//! `sja1105` crate's platform module and its tests.

pub mod time;

pub use time::TimeSource;
