//! Recorded register transactions
//!
//! Every register access made by the driver goes through these two
//! methods, so the handle's record always describes the last attempt.

use pca9685_hal::{RegisterBus, WRITE_ACK};

use crate::error::Pca9685Error;
use crate::handle::Pca9685;
use crate::record::{Command, Status};

impl<B: RegisterBus, D> Pca9685<B, D> {
    /// Write one register
    ///
    /// The record gets the attempted address and data whether or not the
    /// bus acknowledged the write.
    pub fn write_register(&mut self, address: u8, data: u8) -> Result<(), Pca9685Error> {
        let code = self.bus.write_register(address, data);

        self.record.command = Command::I2cWrite;
        self.record.address = address;
        self.record.data = data;

        let result = if code == WRITE_ACK {
            trace!("pca9685: write {=u8:#x} <- {=u8:#x}", address, data);
            Ok(())
        } else {
            warn!(
                "pca9685: write {=u8:#x} <- {=u8:#x} failed: code {=u8}",
                address, data, code
            );
            Err(Pca9685Error::WriteFailed {
                address,
                data,
                code,
            })
        };
        self.record.status = Status::from(result);
        result
    }

    /// Read one register
    ///
    /// Reads have no failure signal, so the record status is always `ok`.
    pub fn read_register(&mut self, address: u8) -> u8 {
        let data = self.bus.read_register(address);
        trace!("pca9685: read {=u8:#x} -> {=u8:#x}", address, data);

        self.record.command = Command::I2cRead;
        self.record.status = Status::Ok;
        self.record.address = address;
        self.record.data = data;
        data
    }
}
