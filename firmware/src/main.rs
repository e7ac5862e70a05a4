// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Firmware for a two-half-bridge DC/AC inverter.
//!
//! Synthesizes the output waveform by PWMing the low sides of two
//! half-bridges while alternating their high sides. A mode strap pin
//! selects between a table-driven sine output and a trapezoid output
//! at boot. A conflict monitor samples all four switch lines and forces
//! an irreversible all-off shutdown if both switches of one bridge are
//! ever active at the same time.

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]
#![feature(asm_experimental_arch)]

mod bridge;
mod hw;
mod monitor;
mod mutex;
mod ports;
mod pwm;
mod sine;
mod trapezoid;
#[cfg(feature = "debug")]
mod uart;
mod wdt;

use crate::{
    bridge::Bridge,
    hw::{Peripherals, interrupt},
    mutex::{MainCtx, unwrap_option},
    ports::{PORTA, PORTB, PortA, PortB},
};
use invwave::HalfBridge;

/// Mode select strap on PA2.
const MODE_BIT: usize = 2;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mode {
    Sine,
    Trapezoid,
}

/// Read the mode strap once at boot. Open (pull-up) selects sine.
fn select_mode() -> Mode {
    if PORTA.get(MODE_BIT) {
        Mode::Sine
    } else {
        Mode::Trapezoid
    }
}

#[avr_device::entry]
fn main() -> ! {
    wdt::init();

    let dp = unwrap_option(Peripherals::take());

    // # SAFETY
    //
    // This is the context handle for the main() function.
    // Holding a reference to this object proves that the holder
    // is running in main() context.
    let m = unsafe {
        MainCtx::new_with_init(|c| {
            let porta = PortA { PORTA: dp.PORTA };
            porta.setup(c);
            PORTA.init(c, porta);

            let portb = PortB { PORTB: dp.PORTB };
            portb.setup(c);
            PORTB.init(c, portb);

            pwm::DP.init(c, pwm::Dp { TC1: dp.TC1 });
            #[cfg(feature = "debug")]
            uart::DP.init(c, uart::Dp { TC0: dp.TC0 });
        })
    };

    // Startup invariant: all four switches off before any generator
    // runs. The port setup already wrote the all-off levels; this also
    // clears the duty registers.
    Bridge::bridge1().deenergize_all();
    Bridge::bridge2().deenergize_all();

    #[cfg(feature = "debug")]
    uart::init(&m);

    // SAFETY: This must be after construction of MainCtx
    //         and after initialization of static MainInit variables.
    unsafe { interrupt::enable() };

    let mode = select_mode();
    #[cfg(feature = "debug")]
    uart::tx_str(
        &m,
        match mode {
            Mode::Sine => "mode: sine\r\n",
            Mode::Trapezoid => "mode: trapezoid\r\n",
        },
    );

    match mode {
        Mode::Sine => sine::run(&m, &dp.WDT),
        Mode::Trapezoid => trapezoid::run(&m, &dp.WDT),
    }
}

// vim: ts=4 sw=4 expandtab
