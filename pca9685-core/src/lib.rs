//! Hardware-independent logic for the PCA9685 driver
//!
//! This crate contains everything about the chip that can be computed
//! without touching a bus:
//!
//! - Register map (addresses, manufacturer defaults, MODE bit layouts)
//! - Channel to register address mapping
//! - PWM timing arithmetic (prescaler, step counts, wraparound)
//! - Range checks for the optional strict validation mode
//! - Driver configuration types

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channel;
pub mod config;
pub mod error;
pub mod registers;
pub mod timing;

pub use channel::{base_register, Channel, ChannelRegisters};
pub use config::{ConfigError, DriverConfig, FieldError, Validation};
pub use error::RangeError;
pub use timing::{ChannelSteps, DutyCycle};
