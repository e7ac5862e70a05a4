//! Hardware binding of the half-bridge capability handles.
//!
//! High sides are plain GPIOs on port A. Low sides sit on the OC1A/OC1B
//! pins of port B: duty-cycle driven while Timer 1 runs (sine mode),
//! plain GPIO level while it is stopped (trapezoid mode, shutdown).

use crate::{
    ports::{PORTA, PORTB},
    pwm::{self, PwmChannel},
};
use invwave::{HalfBridge, SwitchState};

const B1_HIGH_BIT: usize = 0; // PA0
const B2_HIGH_BIT: usize = 1; // PA1
const B1_LOW_BIT: usize = 3; // PB3, OC1B
const B2_LOW_BIT: usize = 1; // PB1, OC1A

pub struct Bridge {
    high_bit: usize,
    low_bit: usize,
    low_ocr: PwmChannel,
}

impl Bridge {
    pub const fn bridge1() -> Self {
        Self {
            high_bit: B1_HIGH_BIT,
            low_bit: B1_LOW_BIT,
            low_ocr: PwmChannel::B,
        }
    }

    pub const fn bridge2() -> Self {
        Self {
            high_bit: B2_HIGH_BIT,
            low_bit: B2_LOW_BIT,
            low_ocr: PwmChannel::A,
        }
    }

    /// Sample the live electrical state of both switch lines.
    ///
    /// Reads the PIN registers, so this sees what the pins actually
    /// carry, including the PWM waveform in sine mode.
    pub fn sample(&self) -> SwitchState {
        SwitchState {
            high: PORTA.get(self.high_bit),
            low: PORTB.get(self.low_bit),
        }
    }
}

impl HalfBridge for Bridge {
    fn energize_high(&mut self) {
        PORTA.set(self.high_bit, true);
    }

    fn deenergize_high(&mut self) {
        PORTA.set(self.high_bit, false);
    }

    fn energize_low(&mut self) {
        PORTB.set(self.low_bit, true);
    }

    fn deenergize_low(&mut self) {
        PORTB.set(self.low_bit, false);
    }

    fn set_low_duty(&mut self, duty: u8) {
        pwm::set_duty(self.low_ocr, duty);
    }
}

// vim: ts=4 sw=4 expandtab
