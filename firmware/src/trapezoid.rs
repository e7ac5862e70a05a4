// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trapezoid mode.
//!
//! Runs entirely in the main context with the PWM unit stopped; the
//! low sides are driven as plain GPIOs. Useful to minimize FET
//! switching time (more efficient than the sine output).

use crate::{
    bridge::Bridge,
    hw::{self, mcu},
    monitor,
    mutex::MainCtx,
};
use invwave::TrapPhase;

/// FET turn-off settle time between opening one switch of a bridge and
/// closing its complement (in us).
const FET_TIMEOUT: u16 = 3;
/// Length of the v+ and v- pulse (in ms).
const PULSE_TIME: u16 = 7;
/// Length of the null pulse where both outputs are connected to gnd (in ms).
const NULL_TIME: u16 = 3;

pub fn run(m: &MainCtx<'_>, wp: &mcu::WDT) -> ! {
    let mut b1 = Bridge::bridge1();
    let mut b2 = Bridge::bridge2();

    let mut phase = TrapPhase::Neg;
    loop {
        phase = phase.next();
        phase.enter(&mut b1, &mut b2, &mut || hw::delay_us(FET_TIMEOUT));

        #[cfg(feature = "debug")]
        if phase == TrapPhase::NullA {
            crate::uart::tx(m, b'.');
        }

        // The hold delay blocks conflict polling; checking right after
        // entering and right before leaving the phase bounds the
        // undetected lifetime of a real conflict to one phase duration.
        monitor::check(m, wp);
        let hold = if phase.is_null() { NULL_TIME } else { PULSE_TIME };
        hw::delay_ms(hold);
        monitor::check(m, wp);
    }
}

// vim: ts=4 sw=4 expandtab
