//! Transport event counters
//!
//! Running totals kept per device handle. The handle updates them around
//! every transport call; this type is the plain snapshot handed to callers.

/// Snapshot of the per-device transport counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounters {
    /// Transport calls that returned an error
    pub spi_errors: u32,
    /// Words successfully transmitted, control frames included
    pub words_written: u32,
    /// Words successfully received
    pub words_read: u32,
}

impl EventCounters {
    /// Total words moved in either direction
    pub fn total_words(&self) -> u64 {
        self.words_written as u64 + self.words_read as u64
    }

    /// Counters accumulated since an earlier snapshot
    ///
    /// Uses wrapping subtraction so a counter that rolled over still yields
    /// the right delta.
    pub fn since(&self, earlier: &EventCounters) -> EventCounters {
        EventCounters {
            spi_errors: self.spi_errors.wrapping_sub(earlier.spi_errors),
            words_written: self.words_written.wrapping_sub(earlier.words_written),
            words_read: self.words_read.wrapping_sub(earlier.words_read),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_reports_delta() {
        let before = EventCounters {
            spi_errors: 1,
            words_written: 10,
            words_read: 4,
        };
        let after = EventCounters {
            spi_errors: 2,
            words_written: 15,
            words_read: 4,
        };
        let delta = after.since(&before);
        assert_eq!(delta.spi_errors, 1);
        assert_eq!(delta.words_written, 5);
        assert_eq!(delta.words_read, 0);
        assert_eq!(after.total_words(), 19);
    }

    #[test]
    fn test_since_handles_wraparound() {
        let before = EventCounters {
            words_written: u32::MAX,
            ..Default::default()
        };
        let after = EventCounters {
            words_written: 2,
            ..Default::default()
        };
        assert_eq!(after.since(&before).words_written, 3);
    }
}
