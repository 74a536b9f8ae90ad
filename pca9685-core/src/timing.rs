//! PWM timing arithmetic
//!
//! Converts human units (hertz, percent) into the chip's register values.
//! All math is integer-only with round-half-up, so results are identical
//! on targets without an FPU.
//!
//! # PWM period
//!
//! One period is 4096 steps of a 12-bit counter. Each channel has an ON
//! step (where the output goes high) and an OFF step (where it goes low).
//! A duty cycle is described by a *delay* (how far into the period the
//! output turns on) and an *on time*. When delay + on time runs past the
//! end of the period the OFF step wraps around to the start.
//!
//! ```text
//!  0            on                off                  4095
//!  |-------------|=================|--------------------|
//!                 <---- on time --->
//! ```

use crate::error::RangeError;

/// Internal oscillator frequency
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Steps in one PWM period (12-bit counter)
pub const STEPS: u32 = 4096;

/// Highest step value a 12-bit register can hold
pub const MAX_STEP: u16 = 4095;

/// Lowest PWM frequency the prescaler can produce
pub const FREQUENCY_MIN_HZ: i32 = 24;

/// Highest PWM frequency the prescaler can produce
pub const FREQUENCY_MAX_HZ: i32 = 1526;

/// Smallest legal PRE_SCALE value
pub const PRESCALE_MIN: u8 = 3;

/// Largest legal PRE_SCALE value
pub const PRESCALE_MAX: u8 = 255;

/// Frequency restored by a reset
pub const DEFAULT_FREQUENCY_HZ: u16 = 200;

/// Oscillator settle time after toggling SLEEP
pub const SETTLE_DELAY_US: u32 = 500;

/// Smallest accepted delay percentage (a zero delay is not representable)
pub const DELAY_PERCENT_MIN: i32 = 1;

/// Divide with round-half-up
const fn div_round(numerator: u32, denominator: u32) -> u32 {
    (numerator + denominator / 2) / denominator
}

/// PRE_SCALE value for a PWM frequency
///
/// `round(25 MHz / (4096 * f)) - 1`, with the frequency clamped to
/// 24..=1526 Hz and the result clamped to 3..=255.
///
/// ```
/// use pca9685_core::timing::prescale;
/// assert_eq!(prescale(200), 30);
/// assert_eq!(prescale(50), 121);
/// ```
pub fn prescale(frequency_hz: i32) -> u8 {
    let frequency = frequency_hz.clamp(FREQUENCY_MIN_HZ, FREQUENCY_MAX_HZ) as u32;
    let rounded = div_round(OSCILLATOR_HZ, STEPS * frequency);
    rounded
        .saturating_sub(1)
        .clamp(u32::from(PRESCALE_MIN), u32::from(PRESCALE_MAX)) as u8
}

/// Nominal PWM frequency produced by a PRE_SCALE value
pub fn frequency_from_prescale(prescale: u8) -> u32 {
    div_round(OSCILLATOR_HZ, STEPS * (u32::from(prescale) + 1))
}

/// Scale a percentage already clamped to 0..=100 onto the step range
fn percent_to_steps(percent: i32) -> u16 {
    div_round(STEPS * percent as u32, 100) as u16
}

/// Delay in steps for a percentage of the period (1..=100 %, result 41..=4096)
pub fn delay_steps(percent: i32) -> u16 {
    percent_to_steps(percent.clamp(DELAY_PERCENT_MIN, 100))
}

/// On time in steps for a percentage of the period (0..=100 %, result 0..=4096)
pub fn on_steps(percent: i32) -> u16 {
    percent_to_steps(percent.clamp(0, 100))
}

/// OFF step for a given delay and on time
///
/// `delay + on_time - 1`, wrapped back into the period when it passes
/// step 4095.
pub fn combine_off_steps(delay: u16, on_time: u16) -> u16 {
    ((u32::from(delay) + u32::from(on_time) + STEPS - 1) % STEPS) as u16
}

/// Strict form of [`prescale`]
pub fn checked_prescale(frequency_hz: i32) -> Result<u8, RangeError> {
    if (FREQUENCY_MIN_HZ..=FREQUENCY_MAX_HZ).contains(&frequency_hz) {
        Ok(prescale(frequency_hz))
    } else {
        Err(RangeError::Frequency(frequency_hz))
    }
}

/// Strict form of [`delay_steps`]
pub fn checked_delay_steps(percent: i32) -> Result<u16, RangeError> {
    if (DELAY_PERCENT_MIN..=100).contains(&percent) {
        Ok(delay_steps(percent))
    } else {
        Err(RangeError::Percent {
            value: percent,
            min: DELAY_PERCENT_MIN,
        })
    }
}

/// Strict form of [`on_steps`]
pub fn checked_on_steps(percent: i32) -> Result<u16, RangeError> {
    if (0..=100).contains(&percent) {
        Ok(on_steps(percent))
    } else {
        Err(RangeError::Percent {
            value: percent,
            min: 0,
        })
    }
}

/// Register-level ON/OFF step pair for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSteps {
    /// Step at which the output turns on (0-4095)
    pub on: u16,
    /// Step at which the output turns off (0-4095)
    pub off: u16,
}

impl ChannelSteps {
    /// Create from raw step values, keeping the low 12 bits of each
    pub const fn new(on: u16, off: u16) -> Self {
        Self {
            on: on & MAX_STEP,
            off: off & MAX_STEP,
        }
    }

    /// Split into on-low, on-high, off-low, off-high register bytes
    pub const fn to_bytes(self) -> [u8; 4] {
        [
            (self.on & 0xFF) as u8,
            ((self.on >> 8) & 0x0F) as u8,
            (self.off & 0xFF) as u8,
            ((self.off >> 8) & 0x0F) as u8,
        ]
    }

    /// Reassemble from on-low, on-high, off-low, off-high register bytes
    ///
    /// Bit 4 of each high byte (the full-on/full-off flag) is ignored.
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(
            (bytes[0] as u16) | ((bytes[1] as u16 & 0x0F) << 8),
            (bytes[2] as u16) | ((bytes[3] as u16 & 0x0F) << 8),
        )
    }
}

/// Duty cycle in percent of the PWM period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DutyCycle {
    /// How far into the period the output turns on (1-100 %)
    pub delay_percent: i32,
    /// How long the output stays on (0-100 %)
    pub on_percent: i32,
}

impl DutyCycle {
    /// Fully on from the start of the period
    pub const FULL_ON: Self = Self::new(0, 100);

    /// Off
    pub const OFF: Self = Self::new(0, 0);

    pub const fn new(delay_percent: i32, on_percent: i32) -> Self {
        Self {
            delay_percent,
            on_percent,
        }
    }

    /// Register values for this duty cycle, clamping both percentages
    ///
    /// ON = delay - 1, OFF = delay + on time - 1 (wrapped).
    pub fn steps(self) -> ChannelSteps {
        let delay = delay_steps(self.delay_percent);
        ChannelSteps::new(delay - 1, combine_off_steps(delay, on_steps(self.on_percent)))
    }

    /// Register values for this duty cycle, rejecting out-of-range percentages
    pub fn checked_steps(self) -> Result<ChannelSteps, RangeError> {
        let delay = checked_delay_steps(self.delay_percent)?;
        let on = checked_on_steps(self.on_percent)?;
        Ok(ChannelSteps::new(delay - 1, combine_off_steps(delay, on)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_prescale_spot_values() {
        assert_eq!(prescale(FREQUENCY_MAX_HZ), PRESCALE_MIN);
        assert_eq!(prescale(200), 30);
        assert_eq!(prescale(50), 121);
        assert_eq!(prescale(25), 243);
        assert_eq!(prescale(FREQUENCY_MIN_HZ), 253);
    }

    #[test]
    fn test_prescale_clamps_frequency() {
        assert_eq!(prescale(0), prescale(FREQUENCY_MIN_HZ));
        assert_eq!(prescale(-100), prescale(FREQUENCY_MIN_HZ));
        assert_eq!(prescale(100_000), PRESCALE_MIN);
        assert_eq!(prescale(i32::MAX), PRESCALE_MIN);
    }

    #[test]
    fn test_frequency_from_prescale() {
        assert_eq!(frequency_from_prescale(30), 197);
        assert_eq!(frequency_from_prescale(121), 50);
        assert_eq!(frequency_from_prescale(PRESCALE_MIN), 1526);
    }

    #[test]
    fn test_delay_steps() {
        assert_eq!(delay_steps(0), 41);
        assert_eq!(delay_steps(1), 41);
        assert_eq!(delay_steps(-20), 41);
        assert_eq!(delay_steps(50), 2048);
        assert_eq!(delay_steps(100), 4096);
        assert_eq!(delay_steps(250), 4096);
    }

    #[test]
    fn test_on_steps() {
        assert_eq!(on_steps(0), 0);
        assert_eq!(on_steps(-1), 0);
        assert_eq!(on_steps(25), 1024);
        assert_eq!(on_steps(100), 4096);
        assert_eq!(on_steps(101), 4096);
    }

    #[test]
    fn test_combine_off_steps() {
        assert_eq!(combine_off_steps(1, 0), 0);
        assert_eq!(combine_off_steps(1, 25), 25);
        assert_eq!(combine_off_steps(25, 25), 49);
        assert_eq!(combine_off_steps(25, 1), 25);
        assert_eq!(combine_off_steps(4096, 4096), 4095);
        assert_eq!(combine_off_steps(4000, 200), 103);
    }

    #[test]
    fn test_checked_ranges() {
        assert_eq!(checked_prescale(200), Ok(30));
        assert_eq!(checked_prescale(23), Err(RangeError::Frequency(23)));
        assert_eq!(checked_prescale(1527), Err(RangeError::Frequency(1527)));
        assert_eq!(
            checked_delay_steps(0),
            Err(RangeError::Percent { value: 0, min: 1 })
        );
        assert_eq!(checked_on_steps(0), Ok(0));
        assert_eq!(
            checked_on_steps(101),
            Err(RangeError::Percent { value: 101, min: 0 })
        );
    }

    #[test]
    fn test_duty_cycle_assembly() {
        // 0 % delay clamps to 1 % = 41 steps
        assert_eq!(DutyCycle::OFF.steps(), ChannelSteps { on: 40, off: 40 });
        assert_eq!(
            DutyCycle::new(50, 25).steps(),
            ChannelSteps {
                on: 2047,
                off: 3071
            }
        );
        // 60 % delay + 60 % on wraps past the end of the period
        assert_eq!(
            DutyCycle::new(60, 60).steps(),
            ChannelSteps { on: 2457, off: 819 }
        );
        assert_eq!(
            DutyCycle::new(0, 0).checked_steps(),
            Err(RangeError::Percent { value: 0, min: 1 })
        );
        assert_eq!(DutyCycle::new(1, 0).checked_steps(), Ok(DutyCycle::OFF.steps()));
    }

    #[test]
    fn test_step_bytes() {
        let steps = ChannelSteps::new(0x0123, 0x0ABC);
        assert_eq!(steps.to_bytes(), [0x23, 0x01, 0xBC, 0x0A]);
        assert_eq!(ChannelSteps::from_bytes([0x23, 0x11, 0xBC, 0x1A]), steps);
        assert_eq!(ChannelSteps::new(0xF000, 0x1FFF), ChannelSteps::new(0, 0x0FFF));
    }

    proptest! {
        #[test]
        fn prop_prescale_in_register_range(frequency in any::<i32>()) {
            let value = prescale(frequency);
            prop_assert!((PRESCALE_MIN..=PRESCALE_MAX).contains(&value));
        }

        #[test]
        fn prop_prescale_monotonic(frequency in FREQUENCY_MIN_HZ..FREQUENCY_MAX_HZ) {
            prop_assert!(prescale(frequency) >= prescale(frequency + 1));
        }

        #[test]
        fn prop_delay_steps_in_bounds(percent in any::<i32>()) {
            let steps = delay_steps(percent);
            prop_assert!((41..=4096).contains(&steps));
        }

        #[test]
        fn prop_on_steps_in_bounds(percent in any::<i32>()) {
            prop_assert!(on_steps(percent) <= 4096);
        }

        #[test]
        fn prop_wraparound_law(delay in 1u16..=4096, on in 0u16..=4096) {
            let raw = u32::from(delay) + u32::from(on) - 1;
            let expected = if raw > 4095 { raw - 4096 } else { raw };
            prop_assert_eq!(u32::from(combine_off_steps(delay, on)), expected);
        }

        #[test]
        fn prop_duty_cycle_fits_registers(delay in any::<i32>(), on in any::<i32>()) {
            let steps = DutyCycle::new(delay, on).steps();
            prop_assert!(steps.on <= MAX_STEP);
            prop_assert!(steps.off <= MAX_STEP);
            prop_assert_eq!(ChannelSteps::from_bytes(steps.to_bytes()), steps);
        }
    }
}
