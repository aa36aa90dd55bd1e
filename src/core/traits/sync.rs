//! Synchronized state abstraction
//!
//! Platform adapters keep their peripherals (SPI bus, pins, delay provider,
//! CRC digest) behind `&self` methods. `SharedState` hides which lock guards
//! that state: Embassy's critical-section mutex on target, a std mutex on the
//! host.

/// Platform-agnostic synchronized state access
pub trait SharedState<T> {
    /// Access state immutably
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R;

    /// Access state mutably
    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R;
}

// ============================================================================
// Embassy Implementation
// ============================================================================

#[cfg(feature = "hal")]
use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

/// Critical-section protected state for embedded targets
///
/// Safe to share between tasks and interrupt handlers. Closures run with
/// interrupts masked, so keep them short: one SPI transfer, one pin toggle.
#[cfg(feature = "hal")]
pub struct EmbassyState<T> {
    inner: Mutex<CriticalSectionRawMutex, core::cell::RefCell<T>>,
}

#[cfg(feature = "hal")]
impl<T> EmbassyState<T> {
    /// Wrap `value`; usable in `static` initializers
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(core::cell::RefCell::new(value)),
        }
    }
}

#[cfg(feature = "hal")]
impl<T> SharedState<T> for EmbassyState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

// ============================================================================
// Host Implementation
// ============================================================================

/// `std::sync::Mutex` backed state for host simulation
///
/// A panic inside a closure poisons the mutex; later accesses recover the
/// inner value instead of propagating the poison, so one failed test
/// assertion does not cascade.
#[cfg(any(test, feature = "mock"))]
pub struct StdState<T> {
    inner: std::sync::Mutex<T>,
}

#[cfg(any(test, feature = "mock"))]
impl<T> StdState<T> {
    /// Wrap `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: std::sync::Mutex::new(value),
        }
    }
}

#[cfg(any(test, feature = "mock"))]
impl<T> SharedState<T> for StdState<T> {
    fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}
