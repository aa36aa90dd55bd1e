//! Core infrastructure shared by the platform adapters and the device driver

pub mod logging;
pub mod traits;
