//! Watchdog supervisor.
//!
//! The watchdog is armed first thing in `main()` and serviced only from
//! the SafetyMonitor's no-conflict path. If the main flow ever stops
//! reaching that path, the hardware forces a cold restart. On a
//! detected conflict the watchdog is disabled for good, so the fail-safe
//! hold can only be left through an external reset.

use crate::hw::mcu;

// I/O addresses for the timed watchdog sequences.
const WDTCR: u8 = 0x21;
const MCUSR: u8 = 0x34;

/// Enable the WDT with a timeout of 16 ms.
///
/// Called before `Peripherals::take()`, hence no register handle.
pub fn init() {
    // SAFETY: The asm code only accesses the WDT registers
    //         which are not accessed from anywhere else in the program.
    unsafe {
        core::arch::asm!(
            "ldi {tmp}, 0x18", // WDCE=1, WDE=1
            "out {WDTCR}, {tmp}",
            "ldi {tmp}, 0x08", // WDE=1, WDP=0b000 -> 16 ms
            "out {WDTCR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCR = const WDTCR,
            options(nostack, preserves_flags)
        );
    }
}

/// Service the watchdog. Resets its countdown.
pub fn service(_wp: &mcu::WDT) {
    avr_device::asm::wdr();
}

/// Switch the watchdog off permanently.
///
/// Only called on the way into the fail-safe shutdown hold. A restart
/// loop after a detected wiring or driver fault must not happen; the
/// fault has to be fixed and the board reset by hand.
pub fn disable(_wp: &mcu::WDT) {
    // SAFETY: The asm code only accesses the WDT registers. WDRF must
    //         be cleared first, otherwise WDE stays forced.
    unsafe {
        core::arch::asm!(
            "in {tmp}, {MCUSR}",
            "andi {tmp}, 0xF7", // clear WDRF
            "out {MCUSR}, {tmp}",
            "ldi {tmp}, 0x18", // WDCE=1, WDE=1
            "out {WDTCR}, {tmp}",
            "ldi {tmp}, 0x00", // WDT off
            "out {WDTCR}, {tmp}",
            tmp = out(reg_upper) _,
            WDTCR = const WDTCR,
            MCUSR = const MCUSR,
            options(nostack)
        );
    }
}

// vim: ts=4 sw=4 expandtab
