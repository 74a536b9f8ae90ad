//! Soft and hard reset sequences
//!
//! Both sequences put the oscillator to sleep, switch every output off
//! through the broadcast block and reload the prescaler before touching
//! MODE1 again. No step is retried and a failed write never stops the
//! sequence. The first failure is returned and left in the record.

use embedded_hal::delay::DelayNs;
use pca9685_core::registers::{defaults, mode1, reg, Register};
use pca9685_core::timing::{self, SETTLE_DELAY_US};
use pca9685_core::{Channel, DutyCycle};
use pca9685_hal::RegisterBus;

use crate::error::Pca9685Error;
use crate::handle::{Outcome, Pca9685};

impl<B: RegisterBus, D: DelayNs> Pca9685<B, D> {
    /// Stop the outputs and restart the chip, keeping its addressing setup
    ///
    /// MODE1 is written with SLEEP, all outputs are switched off and the
    /// reset frequency is loaded. If MODE1 reads back with RESTART set,
    /// SLEEP is cleared first. After the 500 µs settle delay RESTART is
    /// written to resume PWM output.
    pub fn soft_reset(&mut self) -> Result<(), Pca9685Error> {
        debug!("pca9685: soft reset");
        let mut outcome = self.quiesce();

        let mode = self.read_register(reg::MODE1);
        if mode & mode1::RESTART != 0 {
            debug!("pca9685: restart pending, clearing sleep");
            outcome.note(self.write_register(reg::MODE1, mode1::NO_SLEEP));
        }

        self.delay.delay_us(SETTLE_DELAY_US);
        outcome.note(self.write_register(reg::MODE1, mode1::RESTART));

        let result = self.finish(outcome);
        if result.is_ok() {
            info!("pca9685: soft reset done");
        }
        result
    }

    /// Return every register to its manufacturer default
    ///
    /// Same opening as [`soft_reset`](Self::soft_reset), then the
    /// sub-addresses, the all-call address, MODE2 and finally MODE1 are
    /// written with their power-on values. The settle delay runs once at
    /// the end.
    pub fn hard_reset(&mut self) -> Result<(), Pca9685Error> {
        debug!("pca9685: hard reset");
        let mut outcome = self.quiesce();

        for register in Register::ADDRESS_REGISTERS {
            if let Some(value) = register.default_value() {
                outcome.note(self.write_register(register.address(), value));
            }
        }
        outcome.note(self.write_register(reg::MODE2, defaults::MODE2));
        outcome.note(self.write_register(reg::MODE1, defaults::MODE1));

        self.delay.delay_us(SETTLE_DELAY_US);

        let result = self.finish(outcome);
        if result.is_ok() {
            info!("pca9685: hard reset done");
        }
        result
    }

    /// Sleep, all outputs off, reset frequency
    ///
    /// Ignores strict validation so a reset always goes through.
    fn quiesce(&mut self) -> Outcome {
        let mut outcome = Outcome::default();
        outcome.note(self.write_register(reg::MODE1, mode1::SLEEP));
        outcome.note(self.write_steps(Channel::All, DutyCycle::OFF.steps()));

        let prescale = timing::prescale(i32::from(self.config.reset_frequency_hz));
        outcome.note(self.write_register(reg::PRE_SCALE, prescale));
        outcome
    }
}
