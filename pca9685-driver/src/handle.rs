//! Driver handle and construction self-check

use embedded_hal::i2c::I2c;
use pca9685_core::registers::{defaults, reg};
use pca9685_core::{DriverConfig, RangeError, Validation};
use pca9685_hal::{I2cAddress, I2cRegisterBus, RegisterBus};

use crate::error::Pca9685Error;
use crate::record::{Command, Status, TransactionRecord};

/// One PCA9685 chip
///
/// Owns the register bus, the delay provider used by the reset sequences,
/// and the record of the last transaction. Created once per chip and kept
/// for as long as the chip is in use. [`release`](Self::release) hands
/// the bus and delay back.
pub struct Pca9685<B, D> {
    pub(crate) bus: B,
    pub(crate) delay: D,
    pub(crate) config: DriverConfig,
    pub(crate) record: TransactionRecord,
    construction_error: Option<Pca9685Error>,
}

impl<B: RegisterBus, D> Pca9685<B, D> {
    /// Create a driver with the default configuration
    pub fn new(bus: B, delay: D) -> Self {
        Self::configure(bus, delay, DriverConfig::default())
    }

    /// Create a driver and check the bus wiring
    ///
    /// Never fails. If the config does not validate or the bus is missing
    /// a primitive, the record gets `cb_check` and an error, and no bus
    /// traffic happens. Otherwise
    /// LED0_ON_L is read and written back once, the record gets
    /// `rw_check`, and (with `verify_wiring`) the value read must be the
    /// power-on default and the write must be acknowledged. A failed
    /// check flags the record but the handle stays usable.
    pub fn configure(bus: B, delay: D, config: DriverConfig) -> Self {
        let mut driver = Self {
            bus,
            delay,
            config,
            record: TransactionRecord::default(),
            construction_error: None,
        };
        if let Err(e) = driver.config.validate() {
            warn!("pca9685: invalid configuration: {}", e);
            driver.fail_check(Pca9685Error::InvalidConfig(e));
        } else if !driver.bus.is_wired() {
            warn!("pca9685: bus reader and writer are both required");
            driver.fail_check(Pca9685Error::MissingCallbacks);
        } else {
            driver.check_wiring();
        }
        driver
    }

    /// Flag the handle without touching the bus
    fn fail_check(&mut self, e: Pca9685Error) {
        self.record.command = Command::CbCheck;
        self.record.status = Status::Error(e);
        self.construction_error = Some(e);
    }

    fn check_wiring(&mut self) {

        let value = self.read_register(reg::LED0_ON_L);
        let written = self.write_register(reg::LED0_ON_L, value);
        self.record.command = Command::RwCheck;

        if !self.config.verify_wiring {
            return;
        }

        let outcome = match written {
            Err(Pca9685Error::WriteFailed { code, .. }) => {
                Err(Pca9685Error::WiringAckFailed { code })
            }
            Err(e) => Err(e),
            Ok(()) if value != defaults::LED => Err(Pca9685Error::UnexpectedPowerOnValue {
                address: reg::LED0_ON_L,
                value,
            }),
            Ok(()) => Ok(()),
        };

        match outcome {
            Ok(()) => {
                info!("pca9685: wiring check passed");
            }
            Err(e) => {
                warn!("pca9685: wiring check failed: {}", e);
                self.record.status = Status::Error(e);
                self.construction_error = Some(e);
            }
        }
    }
}

impl<I2C: I2c, D> Pca9685<I2cRegisterBus<I2C>, D> {
    /// Create a driver on an I2C master at the configured address
    ///
    /// An address that is not 7-bit flags the handle like any other
    /// invalid config.
    pub fn new_i2c(i2c: I2C, delay: D, config: DriverConfig) -> Self {
        let bus = I2cRegisterBus::new(i2c, I2cAddress::new(config.address));
        Self::configure(bus, delay, config)
    }
}

impl<B, D> Pca9685<B, D> {
    /// Last-transaction record
    pub fn record(&self) -> &TransactionRecord {
        &self.record
    }

    /// Configuration the handle was built with
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Error found by the construction self-check, if any
    pub fn construction_error(&self) -> Option<Pca9685Error> {
        self.construction_error
    }

    /// Check if construction found a valid config and both bus primitives
    ///
    /// A handle that failed only the power-on comparison or the ack of the
    /// round trip is still ready.
    pub fn is_ready(&self) -> bool {
        !matches!(
            self.construction_error,
            Some(Pca9685Error::MissingCallbacks | Pca9685Error::InvalidConfig(_))
        )
    }

    /// Borrow the register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the register bus
    ///
    /// Traffic issued directly on the bus bypasses the record.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Borrow the delay provider
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Give back the bus and delay provider
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    pub(crate) fn is_strict(&self) -> bool {
        self.config.validation == Validation::Strict
    }

    /// Record a strict-validation rejection
    ///
    /// The command is left alone since nothing was attempted on the bus.
    pub(crate) fn reject(&mut self, e: RangeError) -> Pca9685Error {
        let e = Pca9685Error::OutOfRange(e);
        warn!("pca9685: rejected: {}", e);
        self.record.status = Status::Error(e);
        e
    }

    /// Close out a multi-write operation
    ///
    /// If any step failed, the first failure becomes the record's status
    /// so it survives later successful steps.
    pub(crate) fn finish(&mut self, outcome: Outcome) -> Result<(), Pca9685Error> {
        match outcome.first_error {
            Some(e) => {
                self.record.status = Status::Error(e);
                Err(e)
            }
            None => Ok(()),
        }
    }
}

/// First failure across a sequence of steps that all run regardless
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    first_error: Option<Pca9685Error>,
}

impl Outcome {
    pub(crate) fn note(&mut self, result: Result<(), Pca9685Error>) {
        if let Err(e) = result {
            self.first_error.get_or_insert(e);
        }
    }
}
