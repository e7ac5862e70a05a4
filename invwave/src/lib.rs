// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waveform generation core for a two-half-bridge inverter.
//!
//! This crate is hardware independent. The firmware binds [HalfBridge]
//! to the real switch pins and PWM compare registers; the tests bind it
//! to a mock that checks the shoot-through invariant on every operation.

#![no_std]

#[cfg(test)]
mod mock;
mod sine;
mod table;
mod trapezoid;

pub use sine::{Polarity, SineGen};
pub use table::SINE_TABLE;
pub use trapezoid::TrapPhase;

/// Capability handle for one half-bridge: the high-side switch, the
/// low-side switch and the low-side PWM duty register.
///
/// Every operation is a direct, unconditional hardware write. The caller
/// is responsible for never closing both switches of one bridge at the
/// same time.
pub trait HalfBridge {
    fn energize_high(&mut self);
    fn deenergize_high(&mut self);

    /// Close the low-side switch statically.
    ///
    /// Used by the trapezoid generator, which runs with the PWM unit
    /// stopped and drives the low-side pin as a plain GPIO.
    fn energize_low(&mut self);
    fn deenergize_low(&mut self);

    /// Write the low-side PWM duty compare value.
    fn set_low_duty(&mut self, duty: u8);

    /// Force everything off. Boot state and fail-safe state.
    fn deenergize_all(&mut self) {
        self.deenergize_high();
        self.deenergize_low();
        self.set_low_duty(0);
    }
}

/// Sampled electrical state of one half-bridge's two switch lines.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SwitchState {
    pub high: bool,
    pub low: bool,
}

impl SwitchState {
    /// Both switches conducting at once would short the supply rail
    /// through the bridge.
    pub fn shoot_through(self) -> bool {
        self.high && self.low
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shoot_through_predicate() {
        let mk = |high, low| SwitchState { high, low };
        assert!(!mk(false, false).shoot_through());
        assert!(!mk(true, false).shoot_through());
        assert!(!mk(false, true).shoot_through());
        assert!(mk(true, true).shoot_through());
    }

    #[test]
    fn test_deenergize_all() {
        use crate::mock::MockBridge;
        use core::cell::Cell;

        let seq = Cell::new(0);
        let mut b = MockBridge::new(&seq);
        b.energize_high();
        b.deenergize_high();
        b.set_low_duty(100);
        b.deenergize_all();
        assert!(!b.high);
        assert!(!b.low);
        assert_eq!(b.duty, 0);
    }
}

// vim: ts=4 sw=4 expandtab
