//! Driver errors

use derive_more::{Display, Error};
use pca9685_core::{FieldError, RangeError};

/// Errors recorded by the driver
///
/// Every error is also written to the handle's record, so callers that
/// ignore return values can still inspect it after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pca9685Error {
    /// Reader or writer missing at construction
    #[display("Invalid input: bus reader and bus writer callbacks are both required.")]
    MissingCallbacks,
    /// Write primitive returned a non-zero code
    #[display("bus write of {data:#04x} to register {address:#04x} failed with code {code}")]
    WriteFailed { address: u8, data: u8, code: u8 },
    /// Construction round trip read something other than the power-on default
    #[display("configuration error: register {address:#04x} read {value:#04x}, expected 0x00")]
    UnexpectedPowerOnValue { address: u8, value: u8 },
    /// Construction round trip write was not acknowledged
    #[display("configuration error: wiring check write returned code {code}")]
    WiringAckFailed { code: u8 },
    /// Configuration rejected before any bus traffic
    #[display("configuration error: {_0}")]
    InvalidConfig(#[error(source)] FieldError),
    /// Argument rejected by strict validation
    #[display("{_0}")]
    OutOfRange(#[error(source)] RangeError),
}

impl From<RangeError> for Pca9685Error {
    fn from(e: RangeError) -> Self {
        Pca9685Error::OutOfRange(e)
    }
}

impl Pca9685Error {
    /// Check if this error came from the construction self-check
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCallbacks
                | Self::InvalidConfig(_)
                | Self::UnexpectedPowerOnValue { .. }
                | Self::WiringAckFailed { .. }
        )
    }
}
