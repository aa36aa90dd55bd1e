//! Core traits shared by the platform adapters
//!
//! `SharedState<T>` lets the mock and embedded platforms guard their
//! peripherals with whichever lock fits the target.

pub mod sync;

pub use sync::SharedState;

#[cfg(feature = "hal")]
pub use sync::EmbassyState;

#[cfg(any(test, feature = "mock"))]
pub use sync::StdState;
