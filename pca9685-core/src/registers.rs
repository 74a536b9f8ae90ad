//! PCA9685 register map
//!
//! Addresses, manufacturer default values and bit layouts. See the NXP
//! PCA9685 datasheet, section 7.3.

/// Register addresses
pub mod reg {
    /// Mode register 1 (sleep, restart, auto-increment)
    pub const MODE1: u8 = 0x00;
    /// Mode register 2 (output drive configuration)
    pub const MODE2: u8 = 0x01;
    /// I2C-bus subaddress 1
    pub const SUBADR1: u8 = 0x02;
    /// I2C-bus subaddress 2
    pub const SUBADR2: u8 = 0x03;
    /// I2C-bus subaddress 3
    pub const SUBADR3: u8 = 0x04;
    /// LED All Call I2C-bus address
    pub const ALLCALLADR: u8 = 0x05;
    /// LED0 on-time low byte (first per-channel register)
    pub const LED0_ON_L: u8 = 0x06;
    /// LED15 off-time high byte (last per-channel register)
    pub const LED15_OFF_H: u8 = 0x45;
    /// Broadcast on-time low byte
    pub const ALL_LED_ON_L: u8 = 0xFA;
    /// Broadcast on-time high byte
    pub const ALL_LED_ON_H: u8 = 0xFB;
    /// Broadcast off-time low byte
    pub const ALL_LED_OFF_L: u8 = 0xFC;
    /// Broadcast off-time high byte
    pub const ALL_LED_OFF_H: u8 = 0xFD;
    /// PWM frequency prescaler
    pub const PRE_SCALE: u8 = 0xFE;
}

/// MODE1 bit flags
pub mod mode1 {
    /// Respond to the LED All Call address
    pub const ALLCALL: u8 = 1 << 0;
    /// Respond to subaddress 3
    pub const SUB3: u8 = 1 << 1;
    /// Respond to subaddress 2
    pub const SUB2: u8 = 1 << 2;
    /// Respond to subaddress 1
    pub const SUB1: u8 = 1 << 3;
    /// Low power mode, oscillator off
    pub const SLEEP: u8 = 1 << 4;
    /// Register auto-increment
    pub const AI: u8 = 1 << 5;
    /// Use the EXTCLK pin clock
    pub const EXTCLK: u8 = 1 << 6;
    /// Restart enabled (set by hardware when PWM was running before sleep)
    pub const RESTART: u8 = 1 << 7;

    /// Value written to clear SLEEP during a restart
    pub const NO_SLEEP: u8 = ALLCALL;
}

/// MODE2 bit flags (bits 5-7 are reserved)
pub mod mode2 {
    /// Output-not-enable mode bit 0
    pub const OUTNE0: u8 = 1 << 0;
    /// Output-not-enable mode bit 1
    pub const OUTNE1: u8 = 1 << 1;
    /// Totem pole outputs (open-drain when clear)
    pub const OUTDRV: u8 = 1 << 2;
    /// Outputs change on ACK instead of STOP
    pub const OCH: u8 = 1 << 3;
    /// Invert output logic
    pub const INVRT: u8 = 1 << 4;
}

/// Manufacturer default register values
pub mod defaults {
    pub const MODE1: u8 = 0x88;
    pub const MODE2: u8 = 0x40;
    pub const SUBADR1: u8 = 0xE2;
    pub const SUBADR2: u8 = 0xE4;
    pub const SUBADR3: u8 = 0xE8;
    pub const ALLCALLADR: u8 = 0xE0;
    /// Every LED register powers up at 0 (channel off)
    pub const LED: u8 = 0x00;
}

/// Named non-LED registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Mode1,
    Mode2,
    SubAddress1,
    SubAddress2,
    SubAddress3,
    AllCallAddress,
    PreScale,
}

impl Register {
    /// Registers restored to manufacturer defaults by a hard reset, in write order
    pub const ADDRESS_REGISTERS: [Register; 4] = [
        Register::SubAddress1,
        Register::SubAddress2,
        Register::SubAddress3,
        Register::AllCallAddress,
    ];

    /// Register address
    pub const fn address(self) -> u8 {
        match self {
            Self::Mode1 => reg::MODE1,
            Self::Mode2 => reg::MODE2,
            Self::SubAddress1 => reg::SUBADR1,
            Self::SubAddress2 => reg::SUBADR2,
            Self::SubAddress3 => reg::SUBADR3,
            Self::AllCallAddress => reg::ALLCALLADR,
            Self::PreScale => reg::PRE_SCALE,
        }
    }

    /// Manufacturer default value, if the register has a fixed one
    ///
    /// PRE_SCALE has none here: its power-on value depends on the
    /// oscillator configuration and a reset rewrites it from the
    /// configured frequency anyway.
    pub const fn default_value(self) -> Option<u8> {
        match self {
            Self::Mode1 => Some(defaults::MODE1),
            Self::Mode2 => Some(defaults::MODE2),
            Self::SubAddress1 => Some(defaults::SUBADR1),
            Self::SubAddress2 => Some(defaults::SUBADR2),
            Self::SubAddress3 => Some(defaults::SUBADR3),
            Self::AllCallAddress => Some(defaults::ALLCALLADR),
            Self::PreScale => None,
        }
    }

    /// Look up a named register by address
    pub const fn from_address(address: u8) -> Option<Self> {
        match address {
            reg::MODE1 => Some(Self::Mode1),
            reg::MODE2 => Some(Self::Mode2),
            reg::SUBADR1 => Some(Self::SubAddress1),
            reg::SUBADR2 => Some(Self::SubAddress2),
            reg::SUBADR3 => Some(Self::SubAddress3),
            reg::ALLCALLADR => Some(Self::AllCallAddress),
            reg::PRE_SCALE => Some(Self::PreScale),
            _ => None,
        }
    }
}

/// Documented power-on value for any register address
///
/// Covers the named registers and every per-channel LED register.
/// Returns `None` for reserved addresses, the broadcast block (write-only)
/// and PRE_SCALE.
pub const fn power_on_default(address: u8) -> Option<u8> {
    match address {
        reg::LED0_ON_L..=reg::LED15_OFF_H => Some(defaults::LED),
        _ => match Register::from_address(address) {
            Some(register) => register.default_value(),
            None => None,
        },
    }
}
