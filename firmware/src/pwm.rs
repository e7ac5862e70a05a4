//! Timer 1 owner.
//!
//! In sine mode Timer 1 runs as an 8-bit PWM (TOP = OCR1C = 0xFF,
//! prescaler 16) with OC1A/OC1B driving the two low sides and the
//! overflow interrupt stepping the sine generator. In trapezoid mode
//! and after a fail-safe shutdown the timer is fully stopped, which
//! hands the OC pins back to the PORT register levels.

#![allow(unused_unsafe)]

use crate::{
    hw::mcu,
    mutex::{AnyCtx, LazyMainInit, MainCtx},
};

#[allow(non_snake_case)]
pub struct Dp {
    pub TC1: mcu::TC1,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: LazyMainInit<Dp> = unsafe { LazyMainInit::uninit() };

/// Low-side PWM channel selector.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum PwmChannel {
    /// OCR1A, bridge 2 low side.
    A,
    /// OCR1B, bridge 1 low side.
    B,
}

/// Configure Timer 1 for sine mode and enable the overflow interrupt.
///
/// Overflow rate is FCPU / 16 / 256 = ~3.9 kHz; one 76-step full wave
/// comes out at ~51 Hz.
#[rustfmt::skip]
pub fn init_sine(m: &MainCtx<'_>) {
    let tc1 = &DP.deref(m).TC1;
    tc1.tc1h().write(|w| w);
    tc1.tcnt1().write(|w| w);
    tc1.ocr1a().write(|w| w.set(0));
    tc1.ocr1b().write(|w| w.set(0));
    tc1.ocr1c().write(|w| w.set(0xFF)); // TOP value
    // SAFETY: COM = 0b10, clear OC pin on compare match.
    unsafe {
        tc1.tccr1a().write(|w| {
            w.pwm1a().set_bit()
             .pwm1b().set_bit()
             .com1a().bits(0b10)
             .com1b().bits(0b10)
        });
    }
    tc1.tccr1c().write(|w| w);
    tc1.tccr1d().write(|w| w);
    tc1.tccr1e().write(|w| w);
    tc1.tccr1b().write(|w| w.cs1().prescale_16());
    tc1.timsk().modify(|_, w| w.toie1().set_bit());
}

/// Write one low-side duty compare register.
pub fn set_duty(ch: PwmChannel, duty: u8) {
    // SAFETY: A single 8-bit compare register write is indivisible.
    //         OCR1A/OCR1B are only written by the owner of the
    //         respective bridge handle.
    let m = unsafe { AnyCtx::new().to_main_ctx() };
    let tc1 = &DP.deref(&m).TC1;
    match ch {
        PwmChannel::A => tc1.ocr1a().write(|w| w.set(duty)),
        PwmChannel::B => tc1.ocr1b().write(|w| w.set(duty)),
    }
}

/// Stop Timer 1 and disconnect the OC pins.
///
/// The PORT levels (all low after `deenergize_all()`) take over the
/// pins again.
pub fn disable(m: &MainCtx<'_>) {
    let tc1 = &DP.deref(m).TC1;
    tc1.timsk().modify(|_, w| w.toie1().clear_bit());
    tc1.tccr1b().write(|w| w);
    tc1.tccr1a().write(|w| w);
    tc1.ocr1a().write(|w| w.set(0));
    tc1.ocr1b().write(|w| w.set(0));
}

// vim: ts=4 sw=4 expandtab
