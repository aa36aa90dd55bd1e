//! Monotonic time source
//!
//! Platform adapters that implement their own delays and deadlines (for
//! example the mutex acquire loop of the embedded-hal adapter) read the clock
//! through this trait so that they can be driven by a controllable clock on
//! the host.

/// Monotonic clock with millisecond and microsecond resolution
///
/// ```
/// use sja1105_core::traits::TimeSource;
///
/// #[derive(Clone)]
/// struct Uptime(u64);
///
/// impl TimeSource for Uptime {
///     fn now_ms(&self) -> u64 {
///         self.0 / 1000
///     }
///
///     fn now_us(&self) -> u64 {
///         self.0
///     }
/// }
///
/// let time = Uptime(2_500);
/// assert!(time.expired(0, 2));
/// assert!(!time.expired(0, 3));
/// ```
pub trait TimeSource: Clone + Send + Sync {
    /// Milliseconds since an arbitrary epoch
    fn now_ms(&self) -> u64;

    /// Microseconds since the same epoch
    fn now_us(&self) -> u64;

    /// Whether `budget_ms` has elapsed since `start_ms`
    ///
    /// Saturates when `start_ms` lies in the future.
    fn expired(&self, start_ms: u64, budget_ms: u32) -> bool {
        self.now_ms().saturating_sub(start_ms) >= budget_ms as u64
    }
}
