use critical_section as _;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind, SpiBus};
use sja1105::devices::sja1105::{Sja1105, Sja1105Config, Sja1105Error};
use sja1105::platform::crc::crc32_words;
use sja1105::platform::hal::HalPlatform;
use sja1105::platform::{MutexError, PlatformError, Sja1105Platform, SpiError};
use sja1105_core::frame::ControlFrame;
use sja1105_core::status::SJA1105QS_DEVICE_ID;
use sja1105_core::traits::TimeSource;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
struct FakeError;

impl spi::Error for FakeError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl digital::Error for FakeError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Bus that records every byte sent and answers from a queue
///
/// Each byte clocked advances `clock` by `byte_cost_us`.
#[derive(Clone, Default)]
struct FakeBus {
    sent: Arc<Mutex<Vec<u8>>>,
    answers: Arc<Mutex<VecDeque<u8>>>,
    broken: Arc<AtomicBool>,
    clock: Clock,
    byte_cost_us: Arc<AtomicU64>,
}

impl FakeBus {
    fn clocked(&self, bytes: usize) {
        let cost = self.byte_cost_us.load(Ordering::Relaxed) * bytes as u64;
        (self.clock).0.fetch_add(cost, Ordering::Relaxed);
    }

    fn answer_words(&self, words: &[u32]) {
        let mut answers = self.answers.lock().unwrap();
        for word in words {
            answers.extend(word.to_be_bytes());
        }
    }

    fn sent(&self) -> Vec<u8> {
        self.sent.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), FakeError> {
        if self.broken.load(Ordering::Relaxed) {
            Err(FakeError)
        } else {
            Ok(())
        }
    }
}

impl spi::ErrorType for FakeBus {
    type Error = FakeError;
}

impl SpiBus<u8> for FakeBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), FakeError> {
        self.check()?;
        let mut answers = self.answers.lock().unwrap();
        for byte in words.iter_mut() {
            *byte = answers.pop_front().unwrap_or(0);
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), FakeError> {
        self.check()?;
        self.sent.lock().unwrap().extend_from_slice(words);
        self.clocked(words.len());
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), FakeError> {
        self.write(write)?;
        self.read(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), FakeError> {
        self.write(words)?;
        self.read(words)
    }

    fn flush(&mut self) -> Result<(), FakeError> {
        Ok(())
    }
}

/// Output pin logging its levels
#[derive(Clone)]
struct FakePin {
    name: &'static str,
    log: Arc<Mutex<Vec<(&'static str, bool)>>>,
}

impl digital::ErrorType for FakePin {
    type Error = FakeError;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), FakeError> {
        self.log.lock().unwrap().push((self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), FakeError> {
        self.log.lock().unwrap().push((self.name, true));
        Ok(())
    }
}

/// Microsecond clock shared by the delay provider and the time source
#[derive(Clone, Default)]
struct Clock(Arc<AtomicU64>);

impl TimeSource for Clock {
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    fn now_us(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Delay advancing the shared clock
///
/// With `interrupts` set, every delay records whether another thread could
/// enter a critical section while it was running.
struct FakeDelay {
    clock: Clock,
    interrupts: Option<Arc<Mutex<Vec<bool>>>>,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        if let Some(record) = &self.interrupts {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || {
                critical_section::with(|_| {
                    let _ = tx.send(());
                })
            });
            let open = rx.recv_timeout(Duration::from_millis(500)).is_ok();
            record.lock().unwrap().push(open);
        }
        (self.clock).0.fetch_add(ns.div_ceil(1000) as u64, Ordering::Relaxed);
    }
}

type Platform = HalPlatform<FakeBus, FakePin, FakePin, FakeDelay, Clock>;

struct Rig {
    bus: FakeBus,
    pins: Arc<Mutex<Vec<(&'static str, bool)>>>,
    platform: Platform,
}

fn rig() -> Rig {
    rig_with(None)
}

fn rig_with(interrupts: Option<Arc<Mutex<Vec<bool>>>>) -> Rig {
    let clock = Clock::default();
    let bus = FakeBus {
        clock: clock.clone(),
        ..FakeBus::default()
    };
    let pins = Arc::new(Mutex::new(Vec::new()));
    let cs = FakePin {
        name: "cs",
        log: pins.clone(),
    };
    let rst = FakePin {
        name: "rst",
        log: pins.clone(),
    };
    let delay = FakeDelay {
        clock: clock.clone(),
        interrupts,
    };
    let platform = HalPlatform::new(bus.clone(), cs, rst, delay, clock);
    Rig {
        bus,
        pins,
        platform,
    }
}

#[test]
fn write_goes_out_big_endian() {
    let rig = rig();
    let dev = Sja1105::new(&rig.platform, Sja1105Config::default());
    dev.write_register(0x24, &[0x1122_3344]).unwrap();

    let frame = ControlFrame::write(0x24, 1).unwrap().encode();
    let mut expected = frame.to_be_bytes().to_vec();
    expected.extend([0x11, 0x22, 0x33, 0x44]);
    assert_eq!(rig.bus.sent(), expected);

    let pins = rig.pins.lock().unwrap().clone();
    assert_eq!(
        pins,
        vec![
            ("cs", true),
            ("rst", true),
            ("cs", false),
            ("cs", true)
        ]
    );
}

#[test]
fn read_decodes_big_endian() {
    let rig = rig();
    rig.bus.answer_words(&[0xdead_beef, 0x0102_0304]);
    let dev = Sja1105::new(&rig.platform, Sja1105Config::default());
    let mut out = [0u32; 2];
    dev.read_register(0x10, &mut out).unwrap();
    assert_eq!(out, [0xdead_beef, 0x0102_0304]);
}

#[test]
fn bus_failure_is_transport_error() {
    let rig = rig();
    rig.bus.broken.store(true, Ordering::Relaxed);
    let dev = Sja1105::new(&rig.platform, Sja1105Config::default());
    assert_eq!(
        dev.write_register(0x0, &[1]),
        Err(Sja1105Error::Transport(PlatformError::Spi(
            SpiError::TransferFailed
        )))
    );
    assert!(!rig.platform.is_locked());
}

#[test]
fn mutex_respects_deadline() {
    let rig = rig();
    rig.platform.take_mutex(0).unwrap();
    assert_eq!(
        rig.platform.take_mutex(2),
        Err(PlatformError::Mutex(MutexError::Timeout))
    );
    rig.platform.give_mutex();
    assert!(rig.platform.take_mutex(0).is_ok());
}

#[test]
fn software_crc_matches_reference() {
    let rig = rig();
    let words = [0x0102_0304, 0xffff_0000, 7];
    rig.platform.crc_reset();
    rig.platform.crc_accumulate(&words[..1]);
    let crc = rig.platform.crc_accumulate(&words[1..]);
    assert_eq!(crc, crc32_words(&words));
}

#[test]
fn transmit_receive_requires_equal_lengths() {
    let rig = rig();
    let mut rx = [0u32; 1];
    assert_eq!(
        rig.platform.transmit_receive(&[1, 2], &mut rx, 10),
        Err(PlatformError::Spi(SpiError::LengthMismatch))
    );
}

#[test]
fn cfg_reset_pulses_reset_pin() {
    let rig = rig();
    rig.bus.answer_words(&[SJA1105QS_DEVICE_ID]);
    let dev = Sja1105::new(&rig.platform, Sja1105Config::default());
    dev.cfg_reset().unwrap();

    let pins = rig.pins.lock().unwrap().clone();
    let resets: Vec<_> = pins.iter().filter(|(name, _)| *name == "rst").collect();
    assert_eq!(resets, vec![&("rst", true), &("rst", false), &("rst", true)]);
}

#[test]
fn delays_leave_interrupts_enabled() {
    let record = Arc::new(Mutex::new(Vec::new()));
    let rig = rig_with(Some(record.clone()));
    rig.platform.delay_ns(100);
    rig.platform.delay_ms(1);

    // contended mutex sleeps between attempts
    rig.platform.take_mutex(0).unwrap();
    assert!(rig.platform.take_mutex(1).is_err());
    rig.platform.give_mutex();

    let record = record.lock().unwrap();
    assert!(record.len() > 2);
    assert!(record.iter().all(|open| *open));
}

#[test]
fn slow_transfer_stops_at_word_boundary() {
    let rig = rig();
    // 4 ms per word
    rig.bus.byte_cost_us.store(1000, Ordering::Relaxed);
    assert_eq!(
        rig.platform.transmit(&[0; 10], 10),
        Err(PlatformError::Spi(SpiError::Timeout))
    );
    // words start at 0, 4 and 8 ms; the fourth would start past the budget
    assert_eq!(rig.bus.sent().len(), 12);

    let mut rx = [0u32; 10];
    assert_eq!(
        rig.platform.transmit_receive(&[0; 10], &mut rx, 10),
        Err(PlatformError::Spi(SpiError::Timeout))
    );
    assert!(rig.platform.receive(&mut rx[..2], 10).is_ok());
}

#[test]
fn slow_bus_surfaces_as_transport_timeout() {
    let rig = rig();
    rig.bus.byte_cost_us.store(1000, Ordering::Relaxed);
    let dev = Sja1105::new(&rig.platform, Sja1105Config::default().with_timeout_ms(5));
    let err = dev.write_register(0x10, &[1, 2, 3, 4]).unwrap_err();
    assert!(matches!(err, Sja1105Error::Transport(e) if e.is_timeout()));
    assert_eq!(dev.events().spi_errors, 1);
    assert!(!rig.platform.is_locked());
}
