//! I2C transport for the register bus
//!
//! Adapts any blocking [`embedded_hal::i2c::I2c`] master into a
//! [`RegisterBus`] talking to one PCA9685.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use crate::bus::{RegisterBus, WRITE_ACK};

/// 7-bit I2C device address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// PCA9685 address with all hardware address pins tied low
    pub const PCA9685_DEFAULT: Self = Self(0x40);

    /// LED All Call address (power-on value of ALLCALLADR)
    pub const ALL_CALL: Self = Self(0x70);

    /// Sub-address 1 (power-on value of SUBADR1)
    pub const SUBADDRESS_1: Self = Self(0x71);

    /// Sub-address 2 (power-on value of SUBADR2)
    pub const SUBADDRESS_2: Self = Self(0x72);

    /// Sub-address 3 (power-on value of SUBADR3)
    pub const SUBADDRESS_3: Self = Self(0x74);

    /// Create from 7-bit address
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Create from the 8-bit form stored in the SUBADRx/ALLCALLADR registers
    ///
    /// Those registers hold the address in bits 7:1, bit 0 is unused.
    pub const fn from_register_value(value: u8) -> Self {
        Self(value >> 1)
    }

    /// Get the 7-bit address
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl Default for I2cAddress {
    fn default() -> Self {
        Self::PCA9685_DEFAULT
    }
}

/// Map an I2C error kind onto a non-zero write result code
pub fn error_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Bus => 1,
        ErrorKind::ArbitrationLoss => 2,
        ErrorKind::NoAcknowledge(_) => 3,
        ErrorKind::Overrun => 4,
        _ => 0xFF,
    }
}

/// Register bus over a blocking I2C master
pub struct I2cRegisterBus<I2C> {
    i2c: I2C,
    address: I2cAddress,
    read_failures: u32,
}

impl<I2C: I2c> I2cRegisterBus<I2C> {
    /// Create a bus for the device at `address`
    pub fn new(i2c: I2C, address: I2cAddress) -> Self {
        Self {
            i2c,
            address,
            read_failures: 0,
        }
    }

    /// Get the device address
    pub fn address(&self) -> I2cAddress {
        self.address
    }

    /// Number of register reads that failed on the wire
    ///
    /// Failed reads still return 0 to the driver, this counter is the
    /// only place they show up.
    pub fn read_failures(&self) -> u32 {
        self.read_failures
    }

    /// Release the underlying I2C master
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterBus for I2cRegisterBus<I2C> {
    fn read_register(&mut self, address: u8) -> u8 {
        let mut buf = [0u8];
        match self.i2c.write_read(self.address.addr(), &[address], &mut buf) {
            Ok(()) => buf[0],
            Err(_) => {
                self.read_failures = self.read_failures.saturating_add(1);
                0
            }
        }
    }

    fn write_register(&mut self, address: u8, data: u8) -> u8 {
        match self.i2c.write(self.address.addr(), &[address, data]) {
            Ok(()) => WRITE_ACK,
            Err(e) => error_code(e.kind()),
        }
    }
}
