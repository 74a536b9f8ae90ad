//! In-memory test doubles
//!
//! [`MockBus`] is a 256-byte register file. [`MockDelay`] records delays
//! instead of sleeping. Both write into a shared [`Journal`], so a test can
//! check the exact interleaving of reads, writes and delays a driver
//! operation produced.
//!
//! ```
//! use pca9685_hal::mock::{Event, Journal, MockBus, MockDelay};
//! use pca9685_hal::RegisterBus;
//! use embedded_hal::delay::DelayNs;
//!
//! let journal = Journal::new();
//! let mut bus = MockBus::new(&journal);
//! let mut delay = MockDelay::new(&journal);
//!
//! bus.write_register(0x00, 0x10);
//! delay.delay_us(500);
//!
//! assert_eq!(
//!     journal.events().as_slice(),
//!     &[
//!         Event::Write { address: 0x00, data: 0x10, code: 0 },
//!         Event::Delay { ns: 500_000 },
//!     ]
//! );
//! ```

use core::cell::{Ref, RefCell};

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::bus::{RegisterBus, WRITE_ACK};

/// Maximum number of events a journal keeps
pub const JOURNAL_CAPACITY: usize = 128;

/// One observable bus or timing event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Register read and the value returned
    Read { address: u8, value: u8 },
    /// Register write attempt and the result code returned
    Write { address: u8, data: u8, code: u8 },
    /// Blocking delay
    Delay { ns: u32 },
}

/// Ordered record of events shared between mocks
///
/// Holds at most [`JOURNAL_CAPACITY`] events. Clear it between phases of
/// a long test.
#[derive(Debug, Default)]
pub struct Journal {
    events: RefCell<Vec<Event, JOURNAL_CAPACITY>>,
}

impl Journal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    ///
    /// # Panics
    ///
    /// Panics if the journal already holds [`JOURNAL_CAPACITY`] events.
    pub fn push(&self, event: Event) {
        if self.events.borrow_mut().push(event).is_err() {
            panic!("journal is full ({} events)", JOURNAL_CAPACITY);
        }
    }

    /// Borrow the recorded events
    pub fn events(&self) -> Ref<'_, Vec<Event, JOURNAL_CAPACITY>> {
        self.events.borrow()
    }

    /// Forget all recorded events
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Number of write events
    pub fn write_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Write { .. }))
            .count()
    }

    /// Last event recorded
    pub fn last(&self) -> Option<Event> {
        self.events.borrow().last().copied()
    }
}

/// In-memory PCA9685 register file
pub struct MockBus<'j> {
    journal: &'j Journal,
    registers: [u8; 256],
    /// Bits OR-ed into every read of an address (models latched status bits)
    latched: [u8; 256],
    /// Non-zero entries make writes to that address fail with that code
    failures: [u8; 256],
}

impl<'j> MockBus<'j> {
    /// Create a register file with every register at 0
    pub fn new(journal: &'j Journal) -> Self {
        Self {
            journal,
            registers: [0; 256],
            latched: [0; 256],
            failures: [0; 256],
        }
    }

    /// Preload a register value
    pub fn with_register(mut self, address: u8, value: u8) -> Self {
        self.registers[address as usize] = value;
        self
    }

    /// Make `bits` read back as set at `address` regardless of writes
    pub fn with_latched_bits(mut self, address: u8, bits: u8) -> Self {
        self.latched[address as usize] = bits;
        self
    }

    /// Make writes to `address` fail with `code` (0 clears the failure)
    pub fn fail_writes_to(&mut self, address: u8, code: u8) {
        self.failures[address as usize] = code;
    }

    /// Stored value of a register (without latched bits)
    pub fn register(&self, address: u8) -> u8 {
        self.registers[address as usize]
    }

    /// Full register file
    pub fn registers(&self) -> &[u8; 256] {
        &self.registers
    }
}

impl RegisterBus for MockBus<'_> {
    fn read_register(&mut self, address: u8) -> u8 {
        let value = self.registers[address as usize] | self.latched[address as usize];
        self.journal.push(Event::Read { address, value });
        value
    }

    fn write_register(&mut self, address: u8, data: u8) -> u8 {
        let code = self.failures[address as usize];
        if code == WRITE_ACK {
            self.registers[address as usize] = data;
        }
        self.journal.push(Event::Write {
            address,
            data,
            code,
        });
        code
    }
}

/// Delay provider that records instead of sleeping
pub struct MockDelay<'j> {
    journal: &'j Journal,
    total_ns: u64,
}

impl<'j> MockDelay<'j> {
    /// Create a recording delay
    pub fn new(journal: &'j Journal) -> Self {
        Self {
            journal,
            total_ns: 0,
        }
    }

    /// Total time "slept" so far
    pub fn total_ns(&self) -> u64 {
        self.total_ns
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.journal.push(Event::Delay { ns });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_file() {
        let journal = Journal::new();
        let mut bus = MockBus::new(&journal).with_register(0x01, 0x04);

        assert_eq!(bus.read_register(0x01), 0x04);
        assert_eq!(bus.write_register(0x01, 0x40), WRITE_ACK);
        assert_eq!(bus.register(0x01), 0x40);
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.write_count(), 1);
    }

    #[test]
    fn test_latched_bits() {
        let journal = Journal::new();
        let mut bus = MockBus::new(&journal).with_latched_bits(0x00, 0x80);

        bus.write_register(0x00, 0x10);
        assert_eq!(bus.read_register(0x00), 0x90);
        assert_eq!(bus.register(0x00), 0x10);
    }

    #[test]
    fn test_failed_write_keeps_value() {
        let journal = Journal::new();
        let mut bus = MockBus::new(&journal).with_register(0xFE, 0x1E);
        bus.fail_writes_to(0xFE, 2);

        assert_eq!(bus.write_register(0xFE, 0x79), 2);
        assert_eq!(bus.register(0xFE), 0x1E);
        assert_eq!(
            journal.last(),
            Some(Event::Write {
                address: 0xFE,
                data: 0x79,
                code: 2
            })
        );
    }

    #[test]
    #[should_panic(expected = "journal is full")]
    fn test_journal_overflow_panics() {
        let journal = Journal::new();
        for _ in 0..=JOURNAL_CAPACITY {
            journal.push(Event::Delay { ns: 1 });
        }
    }

    #[test]
    fn test_journal_fills_to_capacity() {
        let journal = Journal::new();
        for _ in 0..JOURNAL_CAPACITY {
            journal.push(Event::Delay { ns: 1 });
        }
        assert_eq!(journal.len(), JOURNAL_CAPACITY);
    }

    #[test]
    fn test_delay_records() {
        let journal = Journal::new();
        let mut delay = MockDelay::new(&journal);

        delay.delay_us(500);
        assert_eq!(delay.total_ns(), 500_000);
        assert_eq!(journal.last(), Some(Event::Delay { ns: 500_000 }));

        journal.clear();
        assert!(journal.is_empty());
    }
}
