//! Device drivers
//!
//! Drivers are written against the platform capability traits only, so the
//! same code runs on hardware and against the mock platform.
//!
//! ## Modules
//!
//! - `sja1105`: NXP SJA1105 Ethernet switch control plane

pub mod sja1105;
