//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod switch;

pub use switch::Sja1105Platform;
