// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shoot-through conflict monitor and fail-safe shutdown.
//!
//! Runs in the main context only. The sine ISR never checks; it must
//! stay short. In sine mode the main loop calls [check] back to back,
//! in trapezoid mode it runs on entry and exit of every phase.

use crate::{
    bridge::Bridge,
    hw::{interrupt, mcu},
    mutex::{MainCtx, MutexCell},
    pwm, wdt,
};
use invwave::HalfBridge;

/// The system state machine.
///
/// SafeShutdown is terminal: there is no software transition out of it.
/// Only an external hardware reset re-creates the Running state.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum SystemState {
    Running,
    SafeShutdown,
}

static STATE: MutexCell<SystemState> = MutexCell::new(SystemState::Running);

/// Sample all four switch lines; shut down on a conflict, service the
/// watchdog otherwise.
pub fn check(m: &MainCtx<'_>, wp: &mcu::WDT) {
    if STATE.get(m) == SystemState::SafeShutdown {
        // No transition out of SafeShutdown.
        hold();
    }

    #[cfg(feature = "monitoring")]
    {
        // Snapshot all four lines in one critical section, so a
        // high-side handover in the sine ISR cannot tear the sample.
        let (b1, b2) = interrupt::free(|_| {
            (Bridge::bridge1().sample(), Bridge::bridge2().sample())
        });
        if b1.shoot_through() || b2.shoot_through() {
            safe_shutdown(m, wp);
        }
    }

    wdt::service(wp);
}

/// Irreversible transition to SafeShutdown.
///
/// Force all switches off, stop the PWM timer, switch off the watchdog
/// and park until an external reset.
pub fn safe_shutdown(m: &MainCtx<'_>, wp: &mcu::WDT) -> ! {
    interrupt::disable();
    STATE.set(m, SystemState::SafeShutdown);

    Bridge::bridge1().deenergize_all();
    Bridge::bridge2().deenergize_all();
    pwm::disable(m);
    wdt::disable(wp);

    hold();
}

#[allow(clippy::empty_loop)]
fn hold() -> ! {
    loop {
        // Wait for an external reset.
    }
}

// vim: ts=4 sw=4 expandtab
