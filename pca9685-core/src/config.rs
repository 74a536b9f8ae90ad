//! Driver configuration
//!
//! Everything here has a sensible default, so most users never build a
//! config by hand. With the `toml` feature a config can be loaded from
//! text:
//!
//! ```toml
//! address = 0x41
//! reset_frequency_hz = 50
//! validation = "strict"
//! verify_wiring = false
//! ```

use derive_more::{Display, Error};

use crate::timing::{DEFAULT_FREQUENCY_HZ, FREQUENCY_MAX_HZ, FREQUENCY_MIN_HZ};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default 7-bit I2C address (all address pins low)
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Handling of out-of-range channel, frequency and percent arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Validation {
    /// Silently clamp to the nearest valid bound
    #[default]
    Clamp,
    /// Reject the operation without touching the bus
    Strict,
}

/// Driver configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// 7-bit I2C address of the device
    pub address: u8,
    /// PWM frequency written by soft and hard resets (Hz)
    pub reset_frequency_hz: u16,
    /// Out-of-range argument policy
    pub validation: Validation,
    /// Compare the construction round trip against power-on defaults
    ///
    /// Turn off when attaching to a chip that is already running, whose
    /// LED registers are no longer at their power-on value.
    pub verify_wiring: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            reset_frequency_hz: DEFAULT_FREQUENCY_HZ,
            validation: Validation::Clamp,
            verify_wiring: true,
        }
    }
}

/// A config field holding a value the driver cannot use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// Address does not fit in 7 bits
    #[display("I2C address {_0:#04x} is not a 7-bit address")]
    Address(#[error(not(source))] u8),
    /// Reset frequency outside the prescaler range (strict validation only)
    #[display("reset frequency {_0} Hz is outside 24..=1526 Hz")]
    ResetFrequency(#[error(not(source))] u16),
}

/// Configuration errors
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// TOML text could not be parsed into a config
    #[cfg(feature = "toml")]
    #[display("invalid driver configuration: {_0}")]
    Parse(#[error(not(source))] toml::de::Error),
    /// Parsed, but a field value is unusable
    #[display("{_0}")]
    Field(#[error(source)] FieldError),
}

impl From<FieldError> for ConfigError {
    fn from(e: FieldError) -> Self {
        ConfigError::Field(e)
    }
}

impl DriverConfig {
    /// Default config with strict validation
    pub fn strict() -> Self {
        Self {
            validation: Validation::Strict,
            ..Self::default()
        }
    }

    /// Check field values
    ///
    /// The reset frequency is only range-checked under strict validation,
    /// otherwise it is clamped like any other frequency.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.address > 0x7F {
            return Err(FieldError::Address(self.address));
        }
        let frequency = i32::from(self.reset_frequency_hz);
        if self.validation == Validation::Strict
            && !(FREQUENCY_MIN_HZ..=FREQUENCY_MAX_HZ).contains(&frequency)
        {
            return Err(FieldError::ResetFrequency(self.reset_frequency_hz));
        }
        Ok(())
    }

    /// Parse and validate a config from TOML text
    ///
    /// Missing keys take their default value.
    #[cfg(feature = "toml")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }
}
