//! Register bus abstraction
//!
//! The PCA9685 exposes a flat space of at most 256 single-byte registers.
//! Every driver operation reduces to a sequence of single-register reads
//! and writes issued through [`RegisterBus`].

/// Write result code signalling success
pub const WRITE_ACK: u8 = 0;

/// Write result code reported when no writer is wired up
pub const WRITE_NACK: u8 = 1;

/// Byte-addressed register bus
///
/// Implementations move exactly one byte per call. There is no burst
/// mode and no interrupt handling at this layer.
pub trait RegisterBus {
    /// Read the current value of a register
    ///
    /// Reads carry no failure signal. An implementation that cannot reach
    /// the device must still return a byte (typically 0) and surface the
    /// problem through its own means.
    fn read_register(&mut self, address: u8) -> u8;

    /// Write a value to a register
    ///
    /// Returns [`WRITE_ACK`] (0) on success and any non-zero code on failure.
    fn write_register(&mut self, address: u8, data: u8) -> u8;

    /// Check that both the read and write primitives are present
    ///
    /// Implementations built from optional parts (see [`CallbackBus`])
    /// override this. Everything else is always wired.
    fn is_wired(&self) -> bool {
        true
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    fn read_register(&mut self, address: u8) -> u8 {
        T::read_register(self, address)
    }

    fn write_register(&mut self, address: u8, data: u8) -> u8 {
        T::write_register(self, address, data)
    }

    fn is_wired(&self) -> bool {
        T::is_wired(self)
    }
}

/// Plain function reader, handy for naming `CallbackBus` type parameters
pub type ReadFn = fn(u8) -> u8;

/// Plain function writer, handy for naming `CallbackBus` type parameters
pub type WriteFn = fn(u8, u8) -> u8;

/// Register bus assembled from a reader and a writer callback
///
/// Either callback may be absent. A bus with a missing callback reports
/// `is_wired() == false`. The driver then refuses to touch it during
/// construction and flags the handle.
///
/// # Example
/// ```
/// use pca9685_hal::{CallbackBus, RegisterBus};
///
/// let mut bus = CallbackBus::new(Some(|_addr: u8| 0u8), Some(|_addr: u8, _data: u8| 0u8));
/// assert!(bus.is_wired());
/// assert_eq!(bus.write_register(0x06, 0x00), 0);
/// ```
pub struct CallbackBus<R, W> {
    reader: Option<R>,
    writer: Option<W>,
}

impl<R, W> CallbackBus<R, W>
where
    R: FnMut(u8) -> u8,
    W: FnMut(u8, u8) -> u8,
{
    /// Create a bus from optional reader and writer callbacks
    pub fn new(reader: Option<R>, writer: Option<W>) -> Self {
        Self { reader, writer }
    }

    /// Check if a reader callback is present
    pub fn has_reader(&self) -> bool {
        self.reader.is_some()
    }

    /// Check if a writer callback is present
    pub fn has_writer(&self) -> bool {
        self.writer.is_some()
    }
}

impl<R, W> RegisterBus for CallbackBus<R, W>
where
    R: FnMut(u8) -> u8,
    W: FnMut(u8, u8) -> u8,
{
    fn read_register(&mut self, address: u8) -> u8 {
        match self.reader.as_mut() {
            Some(read) => read(address),
            None => 0,
        }
    }

    fn write_register(&mut self, address: u8, data: u8) -> u8 {
        match self.writer.as_mut() {
            Some(write) => write(address, data),
            None => WRITE_NACK,
        }
    }

    fn is_wired(&self) -> bool {
        self.reader.is_some() && self.writer.is_some()
    }
}
