//! PCA9685 driver
//!
//! Turns "set this channel's duty cycle", "set the PWM frequency" and
//! "reset the chip" into ordered single-byte register transactions on a
//! [`RegisterBus`](pca9685_hal::RegisterBus).
//!
//! - [`Pca9685`] - the driver handle, owns the bus, the delay provider and
//!   the last-transaction record
//! - Bus transactions (`read_register` / `write_register`) update the
//!   record on every call
//! - PWM operations (frequency, duty cycle, channel on/off, read back)
//! - Soft and hard reset sequences with the 500 µs oscillator settle delay
//!
//! # Usage
//!
//! ```ignore
//! let mut pwm = Pca9685::new_i2c(i2c, delay, DriverConfig::default());
//! if !pwm.record().status.is_ok() {
//!     // wiring problem, see pwm.record().status
//! }
//!
//! pwm.soft_reset()?;
//! pwm.set_pwm_frequency(50)?;
//! pwm.set_pwm_duty_cycle(Channel::Led(3), 0, 25)?;
//! ```
//!
//! # Concurrency
//!
//! Every operation mutates the handle's record, so a handle shared between
//! threads must be serialized by the caller. Separate handles (separate
//! chips) are independent.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod error;
pub mod handle;
pub mod pwm;
pub mod record;
pub mod reset;
pub mod transactor;

pub use error::Pca9685Error;
pub use handle::Pca9685;
pub use record::{Command, Status, TransactionRecord};

pub use pca9685_core::{Channel, ChannelSteps, DriverConfig, DutyCycle, Validation};
pub use pca9685_hal::{CallbackBus, I2cAddress, I2cRegisterBus, RegisterBus};
