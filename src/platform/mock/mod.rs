//! Mock platform implementation for testing
//!
//! [`MockSwitch`] simulates an SJA1105 behind the [`Sja1105Platform`]
//! capability set so the protocol layer can be unit tested without hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! [`Sja1105Platform`]: crate::platform::Sja1105Platform

#![cfg(any(test, feature = "mock"))]

mod switch;

pub use switch::{MockEvent, MockSwitch, SpiTransaction, Stamped};
