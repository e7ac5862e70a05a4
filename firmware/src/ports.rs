// SPDX-License-Identifier: Apache-2.0 OR MIT

#![allow(unused_unsafe)]

use crate::{
    hw::{interrupt, mcu},
    mutex::{LazyMainInit, MainInitCtx},
};

#[rustfmt::skip]
macro_rules! impl_port {
    (
        $struct:ident,
        $name:ident,
        $port:ident,
        $pin:ident,
        $bit0:ident,
        $bit1:ident,
        $bit2:ident,
        $bit3:ident,
        $bit4:ident,
        $bit5:ident,
        $bit6:ident,
        $bit7:ident
    ) => {
        #[allow(non_snake_case)]
        pub struct $struct {
            pub $name: mcu::$name,
        }

        // SAFETY: Is initialized when constructing the MainCtx.
        pub static $name: LazyMainInit<$struct> = unsafe { LazyMainInit::uninit() };

        impl LazyMainInit<$struct> {
            /// Read the input (PIN) level of one pin.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn get(&self, bit: usize) -> bool {
                // SAFETY: Single-register read-only access, safe from
                //         both contexts.
                let p = unsafe { self.deref_unchecked() };
                match bit {
                    0 => p.$name.$pin().read().$bit0().bit(),
                    1 => p.$name.$pin().read().$bit1().bit(),
                    2 => p.$name.$pin().read().$bit2().bit(),
                    3 => p.$name.$pin().read().$bit3().bit(),
                    4 => p.$name.$pin().read().$bit4().bit(),
                    5 => p.$name.$pin().read().$bit5().bit(),
                    6 => p.$name.$pin().read().$bit6().bit(),
                    7 => p.$name.$pin().read().$bit7().bit(),
                    _ => unreachable!(),
                }
            }

            /// Drive one pin of the output (PORT) register.
            ///
            /// The PORT modify is a read-modify-write. It runs under a
            /// critical section, because main and irq context both
            /// drive pins of these ports.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn set(&self, bit: usize, value: bool) {
                interrupt::free(|_| {
                    // SAFETY: The modify cannot be preempted inside the
                    //         critical section.
                    let p = unsafe { self.deref_unchecked() };
                    match bit {
                        0 => p.$name.$port().modify(|_, w| w.$bit0().bit(value)),
                        1 => p.$name.$port().modify(|_, w| w.$bit1().bit(value)),
                        2 => p.$name.$port().modify(|_, w| w.$bit2().bit(value)),
                        3 => p.$name.$port().modify(|_, w| w.$bit3().bit(value)),
                        4 => p.$name.$port().modify(|_, w| w.$bit4().bit(value)),
                        5 => p.$name.$port().modify(|_, w| w.$bit5().bit(value)),
                        6 => p.$name.$port().modify(|_, w| w.$bit6().bit(value)),
                        7 => p.$name.$port().modify(|_, w| w.$bit7().bit(value)),
                        _ => unreachable!(),
                    };
                });
            }
        }
    };
}

impl_port!(
    PortA, PORTA, porta, pina, pa0, pa1, pa2, pa3, pa4, pa5, pa6, pa7
);
impl_port!(
    PortB, PORTB, portb, pinb, pb0, pb1, pb2, pb3, pb4, pb5, pb6, pb7
);

fn pin_input(_bit: usize) -> u8 {
    0
}
fn pin_output(bit: usize) -> u8 {
    1 << bit
}
fn pin_low(_bit: usize) -> u8 {
    0
}
fn pin_high(bit: usize) -> u8 {
    1 << bit
}
fn pin_floating(_bit: usize) -> u8 {
    0
}
fn pin_pullup(bit: usize) -> u8 {
    1 << bit
}

impl PortA {
    pub fn setup(&self, _: &MainInitCtx) {
        // All switch drive pins come up low: deterministic all-off
        // state before any generator runs.
        // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
        unsafe {
            self.PORTA.porta().write(|w| {
                w.bits(
                    pin_low(0) | // bridge 1 high side
                    pin_low(1) | // bridge 2 high side
                    pin_pullup(2) | // mode select, open = sine
                    pin_floating(3) | // AREF
                    pin_low(4) | // DNC
                    pin_low(5) | // DNC
                    pin_low(6) | // DNC
                    pin_low(7), // DNC
                )
            });
            self.PORTA.ddra().write(|w| {
                w.bits(
                    pin_output(0) | // bridge 1 high side
                    pin_output(1) | // bridge 2 high side
                    pin_input(2) | // mode select
                    pin_input(3) | // AREF
                    pin_output(4) | // DNC
                    pin_output(5) | // DNC
                    pin_output(6) | // DNC
                    pin_output(7), // DNC
                )
            });
        }
    }
}

impl PortB {
    pub fn setup(&self, _: &MainInitCtx) {
        // SAFETY: Called with interrupts disabled. Ensured by &MainInitCtx.
        unsafe {
            self.PORTB.portb().write(|w| {
                w.bits(
                    pin_low(0) | // ISP MOSI
                    pin_low(1) | // ISP MISO, OC1A: bridge 2 low side
                    pin_low(2) | // ISP SCK
                    pin_low(3) | // OC1B: bridge 1 low side
                    pin_floating(4) | // XTAL1
                    pin_floating(5) | // XTAL2
                    pin_high(6) | // status UART TX, idle high
                    pin_floating(7), // RESET
                )
            });
            self.PORTB.ddrb().write(|w| {
                w.bits(
                    pin_input(0) | // ISP MOSI
                    pin_output(1) | // OC1A: bridge 2 low side
                    pin_input(2) | // ISP SCK
                    pin_output(3) | // OC1B: bridge 1 low side
                    pin_input(4) | // XTAL1
                    pin_input(5) | // XTAL2
                    pin_output(6) | // status UART TX
                    pin_input(7), // RESET
                )
            });
        }
    }
}

// vim: ts=4 sw=4 expandtab
