pub use attiny::{self as mcu, Peripherals};
pub use avr_device::attiny861a as attiny;
pub use avr_device::interrupt::{self, Mutex};

use crate::mutex::IrqCtx;

pub const FCPU: u32 = 16_000_000;

macro_rules! define_isr {
    ($name:ident, $handler:path) => {
        #[avr_device::interrupt(attiny861a)]
        fn $name() {
            // SAFETY: We are inside of an interrupt handler.
            // Therefore, it is safe to construct an `IrqCtx`.
            let c = unsafe { IrqCtx::new() };
            $handler(&c);
        }
    };
}

define_isr!(TIMER1_OVF, crate::sine::irq_handler_timer1_ovf);
#[cfg(feature = "debug")]
define_isr!(TIMER0_COMPA, crate::uart::irq_handler_timer0_compa);

/// Busy-delay for `count * 4` CPU cycles.
#[inline(always)]
fn delay_loop(count: u16) {
    if count == 0 {
        return;
    }
    // SAFETY: The asm code only clobbers the loop counter register pair.
    unsafe {
        core::arch::asm!(
            "1:",
            "sbiw {cnt}, 1",
            "brne 1b",
            cnt = inout(reg_iw) count => _,
            options(nostack)
        )
    }
}

const CYCLES_PER_US: u32 = FCPU / 1_000_000;

/// Calibrated busy-delay.
///
/// This blocks the calling context completely. In the main context that
/// means no conflict polling and no watchdog service for the duration,
/// which is why all callers keep it in the low millisecond range.
pub fn delay_us(us: u16) {
    delay_loop((us as u32 * CYCLES_PER_US / 4) as u16);
}

pub fn delay_ms(ms: u16) {
    for _ in 0..ms {
        delay_us(1000);
    }
}

// vim: ts=4 sw=4 expandtab
