//! Range errors for strict validation
//!
//! The default policy clamps every out-of-range input to the nearest
//! bound. These errors only come out of the `checked_*` functions used
//! when a driver is configured for strict validation.

use derive_more::{Display, Error};

/// An input outside the range the chip can represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeError {
    /// Channel not in 0..=15 (and not the ALL selector)
    #[display("channel {_0} is outside 0..=15")]
    Channel(#[error(not(source))] i32),
    /// Frequency not in 24..=1526 Hz
    #[display("frequency {_0} Hz is outside 24..=1526 Hz")]
    Frequency(#[error(not(source))] i32),
    /// Percentage not in the accepted range for its role
    #[display("percentage {value} is outside {min}..=100")]
    Percent { value: i32, min: i32 },
}
