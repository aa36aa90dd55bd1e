//! sja1105_core - Pure no_std protocol logic for the SJA1105 SPI control plane
//!
//! This crate holds everything about the switch's control-plane protocol that
//! can be computed without touching a bus: the control frame codec, timing
//! constants, table chunk planning, lookup table invalidation planning and
//! status register decoding.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies outside tests
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`frame`]: SPI control frame encode/decode
//! - [`timing`]: Datasheet timing constants
//! - [`chunk`]: Table write chunk planning
//! - [`lut`]: Lookup table invalidation planning
//! - [`events`]: Transport event counter snapshot
//! - [`status`]: Device ID and configuration status decoding
//! - [`traits`]: Time source abstraction

#![no_std]

pub mod chunk;
pub mod events;
pub mod frame;
pub mod lut;
pub mod status;
pub mod timing;
pub mod traits;
