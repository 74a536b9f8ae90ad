//! PWM frequency and per-channel duty cycle

use pca9685_core::registers::reg;
use pca9685_core::timing::{self, checked_prescale, frequency_from_prescale};
use pca9685_core::{Channel, ChannelSteps, DutyCycle};
use pca9685_hal::RegisterBus;

use crate::error::Pca9685Error;
use crate::handle::{Outcome, Pca9685};

impl<B: RegisterBus, D> Pca9685<B, D> {
    /// Set the PWM output frequency
    ///
    /// Writes the prescaler for `frequency_hz` to PRE_SCALE. Out-of-range
    /// frequencies are clamped to 24..=1526 Hz unless the handle is strict.
    /// The chip only latches PRE_SCALE while MODE1.SLEEP is set.
    pub fn set_pwm_frequency(&mut self, frequency_hz: i32) -> Result<(), Pca9685Error> {
        let prescale = if self.is_strict() {
            checked_prescale(frequency_hz).map_err(|e| self.reject(e))?
        } else {
            timing::prescale(frequency_hz)
        };
        debug!(
            "pca9685: frequency {=i32} Hz -> prescale {=u8}",
            frequency_hz, prescale
        );
        self.write_register(reg::PRE_SCALE, prescale)
    }

    /// Set a channel's duty cycle
    ///
    /// The output turns on `delay_percent` into the period and stays on
    /// for `on_percent` of it. [`Channel::All`] writes the broadcast block.
    pub fn set_pwm_duty_cycle(
        &mut self,
        channel: Channel,
        delay_percent: i32,
        on_percent: i32,
    ) -> Result<(), Pca9685Error> {
        let duty = DutyCycle::new(delay_percent, on_percent);
        let steps = if self.is_strict() {
            channel.validated().map_err(|e| self.reject(e))?;
            duty.checked_steps().map_err(|e| self.reject(e))?
        } else {
            duty.steps()
        };
        self.write_steps(channel, steps)
    }

    /// Write raw ON/OFF steps to a channel
    ///
    /// Step values keep their low 12 bits.
    pub fn set_channel_steps(
        &mut self,
        channel: Channel,
        steps: ChannelSteps,
    ) -> Result<(), Pca9685Error> {
        if self.is_strict() {
            channel.validated().map_err(|e| self.reject(e))?;
        }
        self.write_steps(channel, ChannelSteps::new(steps.on, steps.off))
    }

    /// Apply the 0 % delay / 100 % on duty cycle
    ///
    /// The delay clamps to 1 % (41 steps) and the 4096-step on time wraps
    /// the OFF step back onto the ON step, so the chip gets ON = 40 and
    /// OFF = 40. Those are the same register values
    /// [`channel_off`](Self::channel_off) writes. The full-on flag
    /// (bit 4 of ON_H) is never set. Works on a strict handle.
    pub fn channel_on(&mut self, channel: Channel) -> Result<(), Pca9685Error> {
        self.set_channel_steps(channel, DutyCycle::FULL_ON.steps())
    }

    /// Apply the 0 % delay / 0 % on duty cycle (ON = 40, OFF = 40)
    pub fn channel_off(&mut self, channel: Channel) -> Result<(), Pca9685Error> {
        self.set_channel_steps(channel, DutyCycle::OFF.steps())
    }

    /// Read a channel's ON/OFF steps back from the chip
    ///
    /// The broadcast block is write-only on the chip and reads back as 0.
    pub fn read_channel(&mut self, channel: Channel) -> ChannelSteps {
        let regs = channel.registers();
        ChannelSteps::from_bytes([
            self.read_register(regs.on_l),
            self.read_register(regs.on_h),
            self.read_register(regs.off_l),
            self.read_register(regs.off_h),
        ])
    }

    /// Read the raw PRE_SCALE register
    pub fn read_prescale(&mut self) -> u8 {
        self.read_register(reg::PRE_SCALE)
    }

    /// Nominal PWM frequency in Hz for the current PRE_SCALE value
    pub fn pwm_frequency(&mut self) -> u32 {
        frequency_from_prescale(self.read_prescale())
    }

    /// Write the four timing registers of a channel in on-low, on-high,
    /// off-low, off-high order
    ///
    /// Every byte is attempted even if an earlier one fails.
    pub(crate) fn write_steps(
        &mut self,
        channel: Channel,
        steps: ChannelSteps,
    ) -> Result<(), Pca9685Error> {
        trace!(
            "pca9685: {} on={=u16} off={=u16}",
            channel,
            steps.on,
            steps.off
        );
        let mut outcome = Outcome::default();
        for (address, data) in channel
            .registers()
            .addresses()
            .into_iter()
            .zip(steps.to_bytes())
        {
            outcome.note(self.write_register(address, data));
        }
        self.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use crate::record::{Command, Status};
    use crate::{Channel, ChannelSteps, DriverConfig, Pca9685, Pca9685Error};
    use pca9685_core::RangeError;
    use pca9685_hal::mock::{Event, Journal, MockBus, MockDelay};
    use proptest::prelude::*;

    fn writes(journal: &Journal) -> Vec<(u8, u8)> {
        journal
            .events()
            .iter()
            .filter_map(|e| match *e {
                Event::Write { address, data, .. } => Some((address, data)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_set_frequency() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));
        journal.clear();

        driver.set_pwm_frequency(50).unwrap();
        assert_eq!(writes(&journal), vec![(0xFE, 121)]);
        assert_eq!(driver.read_prescale(), 121);
        assert_eq!(driver.pwm_frequency(), 50);
    }

    #[test]
    fn test_set_frequency_clamps() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));
        journal.clear();

        driver.set_pwm_frequency(10).unwrap();
        driver.set_pwm_frequency(5000).unwrap();
        assert_eq!(writes(&journal), vec![(0xFE, 253), (0xFE, 3)]);
    }

    #[test]
    fn test_duty_cycle_bytes() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));
        journal.clear();

        // delay 2048 steps, on 1024 steps: ON = 2047, OFF = 3071
        driver.set_pwm_duty_cycle(Channel::Led(2), 50, 25).unwrap();
        assert_eq!(
            writes(&journal),
            vec![(0x0E, 0xFF), (0x0F, 0x07), (0x10, 0xFF), (0x11, 0x0B)]
        );
        assert_eq!(driver.record().command, Command::I2cWrite);
        assert_eq!(driver.record().address, 0x11);
        assert_eq!(
            driver.read_channel(Channel::Led(2)),
            ChannelSteps::new(2047, 3071)
        );
    }

    #[test]
    fn test_duty_cycle_wraps() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));

        driver.set_pwm_duty_cycle(Channel::Led(0), 60, 60).unwrap();
        assert_eq!(
            driver.read_channel(Channel::Led(0)),
            ChannelSteps::new(2457, 819)
        );
    }

    #[test]
    fn test_all_channels_use_broadcast_block() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));
        journal.clear();

        driver.set_pwm_duty_cycle(Channel::from_raw(-1), 0, 0).unwrap();
        assert_eq!(
            writes(&journal),
            vec![(0xFA, 40), (0xFB, 0), (0xFC, 40), (0xFD, 0)]
        );
    }

    #[test]
    fn test_channel_clamped() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));
        journal.clear();

        driver.channel_on(Channel::Led(40)).unwrap();
        // Channel 15 block, delay 41 steps, on time wraps to the ON step
        assert_eq!(
            writes(&journal),
            vec![(0x42, 40), (0x43, 0), (0x44, 40), (0x45, 0)]
        );
    }

    #[test]
    fn test_channel_on_off() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));

        driver.channel_on(Channel::Led(1)).unwrap();
        assert_eq!(driver.read_channel(Channel::Led(1)), ChannelSteps::new(40, 40));

        driver.channel_off(Channel::Led(1)).unwrap();
        assert_eq!(driver.read_channel(Channel::Led(1)), ChannelSteps::new(40, 40));
    }

    #[test]
    fn test_channel_steps_masked() {
        let journal = Journal::new();
        let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));
        journal.clear();

        driver
            .set_channel_steps(Channel::Led(0), ChannelSteps { on: 0x1ABC, off: 0x0123 })
            .unwrap();
        assert_eq!(
            writes(&journal),
            vec![(0x06, 0xBC), (0x07, 0x0A), (0x08, 0x23), (0x09, 0x01)]
        );
    }

    #[test]
    fn test_duty_cycle_continues_after_failure() {
        let journal = Journal::new();
        let mut bus = MockBus::new(&journal);
        bus.fail_writes_to(0x07, 5);
        let mut driver = Pca9685::new(bus, MockDelay::new(&journal));
        journal.clear();

        let expected = Pca9685Error::WriteFailed {
            address: 0x07,
            data: 0x07,
            code: 5,
        };
        assert_eq!(
            driver.set_pwm_duty_cycle(Channel::Led(0), 50, 25),
            Err(expected)
        );
        assert_eq!(journal.write_count(), 4);
        // Last write succeeded but the failure is kept
        assert_eq!(driver.record().address, 0x09);
        assert_eq!(driver.record().status, Status::Error(expected));
    }

    #[test]
    fn test_strict_rejects_without_bus_traffic() {
        let journal = Journal::new();
        let mut driver = Pca9685::configure(
            MockBus::new(&journal),
            MockDelay::new(&journal),
            DriverConfig::strict(),
        );
        journal.clear();

        assert_eq!(
            driver.set_pwm_frequency(10),
            Err(Pca9685Error::OutOfRange(RangeError::Frequency(10)))
        );
        assert_eq!(
            driver.set_pwm_duty_cycle(Channel::Led(16), 50, 50),
            Err(Pca9685Error::OutOfRange(RangeError::Channel(16)))
        );
        assert_eq!(
            driver.set_pwm_duty_cycle(Channel::Led(3), 0, 50),
            Err(Pca9685Error::OutOfRange(RangeError::Percent { value: 0, min: 1 }))
        );
        assert_eq!(
            driver.set_channel_steps(Channel::Led(20), ChannelSteps::default()),
            Err(Pca9685Error::OutOfRange(RangeError::Channel(20)))
        );
        assert!(journal.is_empty());
        // Command still from construction
        assert_eq!(driver.record().command, Command::RwCheck);
        assert!(!driver.record().status.is_ok());

        // In-range values go through
        driver.set_pwm_frequency(200).unwrap();
        assert_eq!(driver.bus().register(0xFE), 30);
    }

    #[test]
    fn test_strict_accepts_all_channels() {
        let journal = Journal::new();
        let mut driver = Pca9685::configure(
            MockBus::new(&journal),
            MockDelay::new(&journal),
            DriverConfig::strict(),
        );

        assert!(driver.channel_off(Channel::All).is_ok());
        assert_eq!(driver.bus().register(0xFC), 40);
    }

    proptest! {
        #[test]
        fn prop_duty_cycle_readback_in_range(
            channel in 0u8..16,
            delay in -50i32..150,
            on in -50i32..150,
        ) {
            let journal = Journal::new();
            let mut driver = Pca9685::new(MockBus::new(&journal), MockDelay::new(&journal));

            driver.set_pwm_duty_cycle(Channel::Led(channel), delay, on).unwrap();
            let steps = driver.read_channel(Channel::Led(channel));
            prop_assert!(steps.on <= 4095);
            prop_assert!(steps.off <= 4095);
            prop_assert!(steps.on >= 40);
        }
    }
}
