//! PCA9685 register bus abstraction layer
//!
//! This crate defines the boundary between the PCA9685 driver and whatever
//! moves bytes to the chip. The driver only ever needs two primitives: read
//! one register, write one register. Everything else (I2C framing, device
//! addressing, retries) lives on this side of the boundary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  pca9685-driver (handle, resets, PWM)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pca9685-hal (this crate - RegisterBus) │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//! ┌─────────────┐ ┌─────────┐ ┌─────────┐
//! │ I2C adapter │ │callbacks│ │  mock   │
//! │(embedded-hal)│ │         │ │ (tests) │
//! └─────────────┘ └─────────┘ └─────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::RegisterBus`] - Single-byte register read/write
//!
//! Delays are expressed with [`embedded_hal::delay::DelayNs`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod i2c;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key types at crate root for convenience
pub use bus::{CallbackBus, ReadFn, RegisterBus, WriteFn, WRITE_ACK, WRITE_NACK};
pub use i2c::{I2cAddress, I2cRegisterBus};
