//! Logging abstraction
//!
//! Two logging paths exist side by side:
//!
//! - The `log_*!` macros carry the crate's own diagnostics. They go to defmt
//!   when the `defmt` feature is enabled, to stdout/stderr in host test
//!   builds, and compile to nothing otherwise.
//! - [`device_log!`] feeds the device handle's log sink
//!   (`Sja1105Platform::write_log`). It only fires when the handle's
//!   configuration enables logging and prefixes every message with the
//!   source location and the switch ID.

use core::fmt::{self, Write};
use heapless::String;

/// Capacity of one device log line
pub const LOG_MSG_SIZE: usize = 192;

/// Format one device log line: `file:line (id=N) message`
///
/// Messages longer than [`LOG_MSG_SIZE`] are truncated.
pub fn format_device_log(
    file: &str,
    line: u32,
    switch_id: u8,
    args: fmt::Arguments<'_>,
) -> String<LOG_MSG_SIZE> {
    let file = file.rsplit(['/', '\\']).next().unwrap_or(file);
    let mut message = String::new();
    let _ = write!(message, "{}:{} (id={}) ", file, line, switch_id);
    let _ = message.write_fmt(args);
    message
}

/// Send a formatted line to the device log sink when logging is enabled
///
/// Expects a `Sja1105` handle (or anything with `config()` and `platform()`).
macro_rules! device_log {
    ($dev:expr, $($arg:tt)*) => {{
        if $dev.config().logging {
            let line = $crate::core::logging::format_device_log(
                file!(),
                line!(),
                $dev.config().switch_id,
                format_args!($($arg)*),
            );
            $crate::platform::Sja1105Platform::write_log($dev.platform(), line.as_str());
        }
    }};
}

pub(crate) use device_log;

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[INFO] {}", format!($($arg)*));
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[WARN] {}", format!($($arg)*));
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[DEBUG] {}", format!($($arg)*));
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[TRACE] {}", format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_log_prefix() {
        let line = format_device_log("src/devices/sja1105/io.rs", 42, 3, format_args!("x={}", 7));
        assert_eq!(line.as_str(), "io.rs:42 (id=3) x=7");
    }

    #[test]
    fn test_device_log_truncates() {
        let long = "a".repeat(400);
        let line = format_device_log("f.rs", 1, 0, format_args!("{}", long));
        assert!(line.len() <= LOG_MSG_SIZE);
        assert!(line.starts_with("f.rs:1 (id=0) "));
    }
}
