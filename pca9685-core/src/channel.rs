//! Channel selection and per-channel register addressing
//!
//! Each of the 16 outputs owns four consecutive registers starting at
//! `LED0_ON_L + 4 * channel`: on-low, on-high, off-low, off-high. The
//! broadcast block at `ALL_LED_ON_L` has the same layout and applies to
//! every channel at once.
//!
//! Out-of-range channel numbers are clamped to the nearest valid channel,
//! never rejected. Strict callers use [`Channel::checked`] instead.

use crate::error::RangeError;
use crate::registers::reg;

/// Number of PWM outputs
pub const CHANNEL_COUNT: usize = 16;

/// Lowest channel number
pub const MIN_CHANNEL: i32 = 0;

/// Highest channel number
pub const MAX_CHANNEL: i32 = 15;

/// Registers per channel (on-low, on-high, off-low, off-high)
pub const REGISTERS_PER_CHANNEL: u8 = 4;

/// Raw channel number that selects the broadcast block
pub const ALL_SENTINEL: i32 = -1;

/// First register of a channel's block, clamping the channel to 0..=15
///
/// ```
/// use pca9685_core::base_register;
/// assert_eq!(base_register(0), 0x06);
/// assert_eq!(base_register(10), 0x2E);
/// assert_eq!(base_register(-5), 0x06);
/// assert_eq!(base_register(99), 0x42);
/// ```
pub fn base_register(channel: i32) -> u8 {
    let clamped = channel.clamp(MIN_CHANNEL, MAX_CHANNEL) as u8;
    reg::LED0_ON_L + REGISTERS_PER_CHANNEL * clamped
}

/// Output selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// A single output (0-15)
    Led(u8),
    /// Every output at once via the broadcast registers
    All,
}

impl Channel {
    /// Select a single output, clamping to 15
    pub const fn new(index: u8) -> Self {
        if index > MAX_CHANNEL as u8 {
            Self::Led(MAX_CHANNEL as u8)
        } else {
            Self::Led(index)
        }
    }

    /// Interpret a raw channel number
    ///
    /// [`ALL_SENTINEL`] (-1) selects every channel. Anything else is
    /// clamped to 0..=15.
    pub fn from_raw(raw: i32) -> Self {
        if raw == ALL_SENTINEL {
            Self::All
        } else {
            Self::Led(raw.clamp(MIN_CHANNEL, MAX_CHANNEL) as u8)
        }
    }

    /// Interpret a raw channel number, rejecting out-of-range values
    pub fn checked(raw: i32) -> Result<Self, RangeError> {
        match raw {
            ALL_SENTINEL => Ok(Self::All),
            MIN_CHANNEL..=MAX_CHANNEL => Ok(Self::Led(raw as u8)),
            _ => Err(RangeError::Channel(raw)),
        }
    }

    /// Reject a single-output selector built with an index above 15
    pub fn validated(self) -> Result<Self, RangeError> {
        match self {
            Self::Led(index) if i32::from(index) > MAX_CHANNEL => {
                Err(RangeError::Channel(i32::from(index)))
            }
            other => Ok(other),
        }
    }

    /// First register of this selector's four-register block
    pub fn base_register(self) -> u8 {
        match self {
            Self::Led(index) => base_register(i32::from(index)),
            Self::All => reg::ALL_LED_ON_L,
        }
    }

    /// The four timing registers for this selector
    pub fn registers(self) -> ChannelRegisters {
        ChannelRegisters::from_base(self.base_register())
    }

    /// Check if this is the broadcast selector
    pub fn is_all(self) -> bool {
        matches!(self, Self::All)
    }

    /// Iterate over every individual output
    pub fn each() -> impl Iterator<Item = Channel> {
        (0..CHANNEL_COUNT as u8).map(Self::Led)
    }
}

impl From<u8> for Channel {
    fn from(index: u8) -> Self {
        Self::new(index)
    }
}

/// Addresses of one channel's timing registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelRegisters {
    pub on_l: u8,
    pub on_h: u8,
    pub off_l: u8,
    pub off_h: u8,
}

impl ChannelRegisters {
    /// Build from the on-low base address
    pub const fn from_base(base: u8) -> Self {
        Self {
            on_l: base,
            on_h: base + 1,
            off_l: base + 2,
            off_h: base + 3,
        }
    }

    /// Addresses in write order
    pub const fn addresses(&self) -> [u8; 4] {
        [self.on_l, self.on_h, self.off_l, self.off_h]
    }
}
