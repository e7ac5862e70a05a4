// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sine mode.
//!
//! The Timer 1 overflow ISR walks the waveform table; the main loop
//! does nothing but poll the conflict monitor. The ISR is the single
//! writer of the generator state. The main context only sees the
//! atomic diagnostic mirrors.

use crate::{
    bridge::Bridge,
    hw::{Mutex, mcu},
    monitor,
    mutex::{IrqCtx, MainCtx},
    pwm,
};
use avr_atomic::AvrAtomic;
use core::cell::Cell;
use invwave::{Polarity, SineGen};

static GEN: Mutex<Cell<SineGen>> = Mutex::new(Cell::new(SineGen::new()));

/// Diagnostic mirrors of the ISR-owned generator state.
static INDEX: AvrAtomic<u8> = AvrAtomic::new();
static POSITIVE: AvrAtomic<bool> = AvrAtomic::new();

pub fn irq_handler_timer1_ovf(c: &IrqCtx) {
    let cs = c.cs();

    let mut b1 = Bridge::bridge1();
    let mut b2 = Bridge::bridge2();

    let mut g = GEN.borrow(cs).get();
    g.step(&mut b1, &mut b2);
    GEN.borrow(cs).set(g);

    INDEX.store(g.index());
    POSITIVE.store(g.polarity() == Polarity::Positive);
}

pub fn run(m: &MainCtx<'_>, wp: &mcu::WDT) -> ! {
    POSITIVE.store(true);
    pwm::init_sine(m);

    #[cfg(feature = "debug")]
    let mut prev_positive = true;

    loop {
        monitor::check(m, wp);

        #[cfg(feature = "debug")]
        {
            let positive = POSITIVE.load();
            if positive != prev_positive {
                prev_positive = positive;
                crate::uart::tx(m, if positive { b'+' } else { b'-' });
            }
        }
    }
}

// vim: ts=4 sw=4 expandtab
