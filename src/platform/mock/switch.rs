//! Simulated SJA1105 for host testing
//!
//! `MockSwitch` implements the full [`Sja1105Platform`] capability set on top
//! of an in-memory register file. It decodes control frames the way the
//! switch does, so a write followed by a read of the same address echoes the
//! written words. Everything that happens is recorded on a timeline stamped
//! with a simulated clock that only advances through the delay capabilities.

use crate::core::traits::{SharedState, StdState};
use crate::devices::sja1105::RegisterMap;
use crate::platform::{
    crc::Crc32Accumulator,
    error::{MutexError, PlatformError, SpiError},
    traits::Sja1105Platform,
    Result,
};
use sja1105_core::frame::{ControlFrame, Direction};
use sja1105_core::status::Variant;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::string::{String, ToString};
use std::sync::{Condvar, Mutex};
use std::time::Duration;
use std::vec::Vec;

/// One recorded platform interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    /// Chip select driven (`true` = asserted)
    ChipSelect(bool),
    /// Reset line driven
    ResetLine(bool),
    /// Transmit call
    Transmit(Vec<u32>),
    /// Receive call of the given length
    Receive(usize),
    /// Full-duplex call
    TransmitReceive { tx: Vec<u32>, rx: Vec<u32> },
    /// Nanosecond delay
    DelayNs(u32),
    /// Millisecond delay
    DelayMs(u32),
}

/// Timeline entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped {
    /// Simulated time of the event in nanoseconds
    pub at_ns: u64,
    /// What happened
    pub event: MockEvent,
}

/// Bus-level transaction, for tests that only care about SPI traffic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpiTransaction {
    /// Transmit only
    Transmit { words: Vec<u32> },
    /// Receive only
    Receive { len: usize },
    /// Full-duplex
    TransmitReceive { tx: Vec<u32>, rx: Vec<u32> },
}

#[derive(Default)]
struct SimState {
    registers: BTreeMap<u32, u32>,
    power_on: BTreeMap<u32, u32>,
    queued_reads: HashMap<u32, VecDeque<u32>>,
    self_clearing: HashMap<u32, u32>,
    timeline: Vec<Stamped>,
    frames: Vec<ControlFrame>,
    clock_ns: u64,
    cs_active: bool,
    reset_high: bool,
    pending: Option<ControlFrame>,
    cursor: u32,
    transmits_until_failure: Option<usize>,
    fail_receive: bool,
    crc: Crc32Accumulator,
    crc_resets: usize,
    logs: Vec<String>,
    unlocked_bus_access: usize,
}

impl SimState {
    fn record(&mut self, event: MockEvent) {
        self.timeline.push(Stamped {
            at_ns: self.clock_ns,
            event,
        });
    }

    fn read_word(&mut self, addr: u32) -> u32 {
        if let Some(queue) = self.queued_reads.get_mut(&addr) {
            if let Some(value) = queue.pop_front() {
                return value;
            }
        }
        self.registers.get(&addr).copied().unwrap_or(0)
    }

    fn write_word(&mut self, addr: u32, value: u32) {
        let cleared = self.self_clearing.get(&addr).copied().unwrap_or(0);
        self.registers.insert(addr, value & !cleared);
    }

    fn next_transmit_fails(&mut self) -> bool {
        match self.transmits_until_failure.as_mut() {
            Some(0) => true,
            Some(n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }

    /// Feed transmitted words through the frame decoder
    fn absorb(&mut self, words: &[u32]) {
        let mut payload = words;
        if self.pending.is_none() {
            let Some((&first, rest)) = words.split_first() else {
                return;
            };
            let frame = ControlFrame::decode(first);
            self.frames.push(frame);
            self.pending = Some(frame);
            self.cursor = frame.address();
            payload = rest;
        }
        if let Some(frame) = self.pending {
            if frame.direction() == Direction::Write {
                for &word in payload {
                    let addr = self.cursor;
                    self.write_word(addr, word);
                    self.cursor = self.cursor.wrapping_add(1);
                }
            }
        }
    }
}

/// Simulated SJA1105 switch
///
/// # Example
///
/// ```
/// use sja1105::platform::mock::MockSwitch;
/// use sja1105::devices::sja1105::{Sja1105, Sja1105Config};
///
/// let mock = MockSwitch::new();
/// let switch = Sja1105::new(&mock, Sja1105Config::default());
/// switch.write_register(0x20, &[1, 2, 3]).unwrap();
///
/// let mut back = [0u32; 3];
/// switch.read_register(0x20, &mut back).unwrap();
/// assert_eq!(back, [1, 2, 3]);
/// ```
pub struct MockSwitch {
    state: StdState<SimState>,
    held: Mutex<bool>,
    released: Condvar,
}

impl MockSwitch {
    /// Blank switch: empty register file, reset line released
    pub fn new() -> Self {
        let state = SimState {
            reset_high: true,
            ..Default::default()
        };
        Self {
            state: StdState::new(state),
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    /// Switch answering like the given family member
    ///
    /// Seeds the device ID register and marks the reset and lookup table
    /// command bits of the default register map as self-clearing, so warm
    /// resets and lookup table commands complete immediately.
    pub fn sja1105(variant: Variant) -> Self {
        let mock = Self::new();
        let map = RegisterMap::for_variant(variant);
        mock.state.with_mut(|s| {
            s.power_on.insert(map.device_id, variant.device_id());
            s.registers.insert(map.device_id, variant.device_id());
            s.self_clearing
                .insert(map.reset_ctrl, map.warm_reset | map.cold_reset);
            s.self_clearing
                .insert(map.l2_lookup.command_addr, map.l2_lookup.valid);
        });
        mock
    }

    /// Set a register value
    pub fn set_register(&self, addr: u32, value: u32) {
        self.state.with_mut(|s| {
            s.registers.insert(addr, value);
        });
    }

    /// Current register value (0 if never written)
    pub fn register(&self, addr: u32) -> u32 {
        self.state.with(|s| s.registers.get(&addr).copied().unwrap_or(0))
    }

    /// Queue values returned by the next reads of `addr`
    ///
    /// Once the queue is drained, reads fall back to the register file.
    pub fn queue_reads(&self, addr: u32, values: &[u32]) {
        self.state.with_mut(|s| {
            s.queued_reads
                .entry(addr)
                .or_default()
                .extend(values.iter().copied());
        });
    }

    /// Bits of `addr` the simulated switch clears as soon as they are written
    pub fn set_self_clearing(&self, addr: u32, mask: u32) {
        self.state.with_mut(|s| {
            s.self_clearing.insert(addr, mask);
        });
    }

    /// Let `successful` more transmit calls through, then fail every one after
    pub fn fail_transmit_after(&self, successful: usize) {
        self.state
            .with_mut(|s| s.transmits_until_failure = Some(successful));
    }

    /// Make every receive call fail (or stop failing)
    pub fn fail_receive(&self, fail: bool) {
        self.state.with_mut(|s| s.fail_receive = fail);
    }

    /// Stop injecting faults
    pub fn clear_faults(&self) {
        self.state.with_mut(|s| {
            s.transmits_until_failure = None;
            s.fail_receive = false;
        });
    }

    /// Full timeline
    pub fn timeline(&self) -> Vec<Stamped> {
        self.state.with(|s| s.timeline.clone())
    }

    /// Bus transactions in order
    pub fn transactions(&self) -> Vec<SpiTransaction> {
        self.state.with(|s| {
            s.timeline
                .iter()
                .filter_map(|e| match &e.event {
                    MockEvent::Transmit(words) => Some(SpiTransaction::Transmit {
                        words: words.clone(),
                    }),
                    MockEvent::Receive(len) => Some(SpiTransaction::Receive { len: *len }),
                    MockEvent::TransmitReceive { tx, rx } => {
                        Some(SpiTransaction::TransmitReceive {
                            tx: tx.clone(),
                            rx: rx.clone(),
                        })
                    }
                    _ => None,
                })
                .collect()
        })
    }

    /// Control frames the simulated switch decoded, in order
    pub fn frames(&self) -> Vec<ControlFrame> {
        self.state.with(|s| s.frames.clone())
    }

    /// Decoded write frames only
    pub fn write_frames(&self) -> Vec<ControlFrame> {
        self.frames()
            .into_iter()
            .filter(|f| f.direction() == Direction::Write)
            .collect()
    }

    /// Forget recorded events and frames; registers are kept
    pub fn clear_timeline(&self) {
        self.state.with_mut(|s| {
            s.timeline.clear();
            s.frames.clear();
        });
    }

    /// Simulated time in nanoseconds
    pub fn now_ns(&self) -> u64 {
        self.state.with(|s| s.clock_ns)
    }

    /// Number of `crc_reset` calls so far
    pub fn crc_resets(&self) -> usize {
        self.state.with(|s| s.crc_resets)
    }

    /// Lines passed to `write_log`
    pub fn logs(&self) -> Vec<String> {
        self.state.with(|s| s.logs.clone())
    }

    /// Bus or pin accesses made without holding the device mutex
    pub fn unlocked_bus_access(&self) -> usize {
        self.state.with(|s| s.unlocked_bus_access)
    }

    /// Whether the device mutex is currently held
    pub fn mutex_held(&self) -> bool {
        *self.held.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reset line level
    pub fn reset_line(&self) -> bool {
        self.state.with(|s| s.reset_high)
    }

    fn check_locked(&self, s: &mut SimState) {
        if !self.mutex_held() {
            s.unlocked_bus_access += 1;
        }
    }
}

impl Default for MockSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl Sja1105Platform for MockSwitch {
    fn transmit(&self, words: &[u32], _timeout_ms: u32) -> Result<()> {
        self.state.with_mut(|s| {
            self.check_locked(s);
            s.record(MockEvent::Transmit(words.to_vec()));
            if s.next_transmit_fails() {
                return Err(PlatformError::Spi(SpiError::TransferFailed));
            }
            if !s.cs_active || !s.reset_high {
                return Err(PlatformError::Spi(SpiError::ModeFault));
            }
            s.absorb(words);
            Ok(())
        })
    }

    fn receive(&self, words: &mut [u32], _timeout_ms: u32) -> Result<()> {
        self.state.with_mut(|s| {
            self.check_locked(s);
            s.record(MockEvent::Receive(words.len()));
            if s.fail_receive {
                return Err(PlatformError::Spi(SpiError::TransferFailed));
            }
            match s.pending {
                Some(frame) if frame.direction() == Direction::Read && s.cs_active => {
                    for word in words.iter_mut() {
                        let addr = s.cursor;
                        *word = s.read_word(addr);
                        s.cursor = s.cursor.wrapping_add(1);
                    }
                    Ok(())
                }
                _ => Err(PlatformError::Spi(SpiError::ModeFault)),
            }
        })
    }

    fn transmit_receive(&self, tx: &[u32], rx: &mut [u32], _timeout_ms: u32) -> Result<()> {
        if tx.len() != rx.len() {
            return Err(PlatformError::Spi(SpiError::LengthMismatch));
        }
        self.state.with_mut(|s| {
            self.check_locked(s);
            if s.next_transmit_fails() || s.fail_receive {
                s.record(MockEvent::TransmitReceive {
                    tx: tx.to_vec(),
                    rx: rx.to_vec(),
                });
                return Err(PlatformError::Spi(SpiError::TransferFailed));
            }
            // The word clocked in alongside the control frame is undefined.
            rx.fill(0);
            let start = if s.pending.is_none() { 1 } else { 0 };
            s.absorb(tx);
            if let Some(frame) = s.pending {
                if frame.direction() == Direction::Read {
                    for word in rx.iter_mut().skip(start) {
                        let addr = s.cursor;
                        *word = s.read_word(addr);
                        s.cursor = s.cursor.wrapping_add(1);
                    }
                }
            }
            s.record(MockEvent::TransmitReceive {
                tx: tx.to_vec(),
                rx: rx.to_vec(),
            });
            Ok(())
        })
    }

    fn set_chip_select(&self, active: bool) {
        self.state.with_mut(|s| {
            self.check_locked(s);
            s.record(MockEvent::ChipSelect(active));
            s.cs_active = active;
            s.pending = None;
        });
    }

    fn set_reset_line(&self, high: bool) {
        self.state.with_mut(|s| {
            self.check_locked(s);
            s.record(MockEvent::ResetLine(high));
            if high && !s.reset_high {
                s.registers = s.power_on.clone();
            }
            s.reset_high = high;
        });
    }

    fn now_ms(&self) -> u64 {
        self.now_ns() / 1_000_000
    }

    fn delay_ns(&self, ns: u32) {
        self.state.with_mut(|s| {
            s.record(MockEvent::DelayNs(ns));
            s.clock_ns += ns as u64;
        });
    }

    fn delay_ms(&self, ms: u32) {
        self.state.with_mut(|s| {
            s.record(MockEvent::DelayMs(ms));
            s.clock_ns += ms as u64 * 1_000_000;
        });
    }

    fn take_mutex(&self, timeout_ms: u32) -> Result<()> {
        let held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        let (mut held, wait) = self
            .released
            .wait_timeout_while(held, Duration::from_millis(timeout_ms as u64), |h| *h)
            .map_err(|_| PlatformError::Mutex(MutexError::Poisoned))?;
        if wait.timed_out() && *held {
            return Err(PlatformError::Mutex(MutexError::Timeout));
        }
        *held = true;
        Ok(())
    }

    fn give_mutex(&self) {
        let mut held = self.held.lock().unwrap_or_else(|e| e.into_inner());
        *held = false;
        self.released.notify_one();
    }

    fn crc_reset(&self) {
        self.state.with_mut(|s| {
            s.crc.reset();
            s.crc_resets += 1;
        });
    }

    fn crc_accumulate(&self, words: &[u32]) -> u32 {
        self.state.with_mut(|s| s.crc.accumulate(words))
    }

    fn write_log(&self, message: &str) {
        self.state.with_mut(|s| s.logs.push(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sja1105_core::frame::WRITE_FRAME;

    fn locked(mock: &MockSwitch) {
        mock.take_mutex(10).unwrap();
    }

    #[test]
    fn test_write_then_read_echoes() {
        let mock = MockSwitch::new();
        locked(&mock);
        let frame = ControlFrame::write(0x100, 2).unwrap().encode();
        mock.set_chip_select(true);
        mock.transmit(&[frame], 10).unwrap();
        mock.transmit(&[0xaa, 0xbb], 10).unwrap();
        mock.set_chip_select(false);

        let frame = ControlFrame::read(0x100, 2).unwrap().encode();
        let mut buf = [0u32; 2];
        mock.set_chip_select(true);
        mock.transmit(&[frame], 10).unwrap();
        mock.receive(&mut buf, 10).unwrap();
        mock.set_chip_select(false);

        assert_eq!(buf, [0xaa, 0xbb]);
        assert_eq!(mock.frames().len(), 2);
        assert_eq!(mock.unlocked_bus_access(), 0);
    }

    #[test]
    fn test_transmit_without_chip_select_fails() {
        let mock = MockSwitch::new();
        locked(&mock);
        assert_eq!(
            mock.transmit(&[WRITE_FRAME], 10),
            Err(PlatformError::Spi(SpiError::ModeFault))
        );
    }

    #[test]
    fn test_queued_reads_take_priority() {
        let mock = MockSwitch::new();
        locked(&mock);
        mock.set_register(0x5, 9);
        mock.queue_reads(0x5, &[1]);
        let frame = ControlFrame::read(0x5, 1).unwrap().encode();
        let mut buf = [0u32; 1];
        for expected in [1, 9] {
            mock.set_chip_select(true);
            mock.transmit(&[frame], 10).unwrap();
            mock.receive(&mut buf, 10).unwrap();
            mock.set_chip_select(false);
            assert_eq!(buf[0], expected);
        }
    }

    #[test]
    fn test_fault_injection() {
        let mock = MockSwitch::new();
        locked(&mock);
        mock.set_chip_select(true);
        mock.fail_transmit_after(1);
        assert!(mock.transmit(&[WRITE_FRAME], 10).is_ok());
        assert!(mock.transmit(&[1], 10).is_err());
        assert!(mock.transmit(&[1], 10).is_err());
        mock.clear_faults();
        assert!(mock.transmit(&[1], 10).is_ok());
    }

    #[test]
    fn test_mutex_times_out_while_held() {
        let mock = MockSwitch::new();
        mock.take_mutex(10).unwrap();
        assert_eq!(
            mock.take_mutex(5),
            Err(PlatformError::Mutex(MutexError::Timeout))
        );
        mock.give_mutex();
        assert!(mock.take_mutex(5).is_ok());
    }

    #[test]
    fn test_delays_advance_clock() {
        let mock = MockSwitch::new();
        mock.delay_ns(500);
        mock.delay_ms(2);
        assert_eq!(mock.now_ns(), 2_000_500);
        assert_eq!(mock.now_ms(), 2);
    }

    #[test]
    fn test_reset_release_restores_power_on_values() {
        let mock = MockSwitch::sja1105(Variant::T);
        locked(&mock);
        mock.set_register(0x0, 0);
        mock.set_reset_line(false);
        mock.set_reset_line(true);
        assert_eq!(mock.register(0x0), Variant::T.device_id());
    }

    #[test]
    fn test_unlocked_access_is_counted() {
        let mock = MockSwitch::new();
        mock.set_chip_select(true);
        assert_eq!(mock.unlocked_bus_access(), 1);
    }

    #[test]
    fn test_transmit_receive_reads_after_frame() {
        let mock = MockSwitch::new();
        locked(&mock);
        mock.set_register(0x10, 0x1234);
        let frame = ControlFrame::read(0x10, 1).unwrap().encode();
        let mut rx = [0xffu32; 2];
        mock.set_chip_select(true);
        mock.transmit_receive(&[frame, 0], &mut rx, 10).unwrap();
        assert_eq!(rx, [0, 0x1234]);
    }
}
