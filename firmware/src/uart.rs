// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Status UART. TX only, software driven.
//!
//! Timer 0 runs in CTC mode and clocks one frame bit per compare-A
//! interrupt onto PB6. Bytes go through a small critical-section queue;
//! when the queue overflows, bytes are silently dropped. Nothing in the
//! control path depends on this module.

use crate::{
    hw::{FCPU, Mutex, interrupt, mcu},
    mutex::{CriticalSection, IrqCtx, LazyMainInit, MainCtx},
    ports::PORTB,
};
use core::cell::Cell;

const BAUD: u32 = 19_200;
const TC0_PS: u32 = 8;
const TC0_OCR: u8 = (FCPU / (BAUD * TC0_PS)) as u8;
const TX_BIT: usize = 6; // PB6

#[allow(non_snake_case)]
pub struct Dp {
    pub TC0: mcu::TC0,
}

// SAFETY: Is initialized when constructing the MainCtx.
pub static DP: LazyMainInit<Dp> = unsafe { LazyMainInit::uninit() };

const QUEUE_SIZE: usize = 32;

/// TX byte queue. Single producer (main), single consumer (ISR), both
/// under a critical section.
struct TxQueue {
    buf: [Mutex<Cell<u8>>; QUEUE_SIZE],
    wr: Mutex<Cell<u8>>,
    rd: Mutex<Cell<u8>>,
}

impl TxQueue {
    const MASK: u8 = (QUEUE_SIZE - 1) as u8;

    const fn new() -> Self {
        Self {
            buf: [const { Mutex::new(Cell::new(0)) }; QUEUE_SIZE],
            wr: Mutex::new(Cell::new(0)),
            rd: Mutex::new(Cell::new(0)),
        }
    }

    fn count(&self, cs: CriticalSection<'_>) -> u8 {
        self.wr.borrow(cs).get().wrapping_sub(self.rd.borrow(cs).get())
    }

    fn insert(&self, cs: CriticalSection<'_>, data: u8) -> bool {
        if self.count(cs) >= QUEUE_SIZE as u8 {
            false
        } else {
            let wr = self.wr.borrow(cs).get();
            self.buf[(wr & Self::MASK) as usize].borrow(cs).set(data);
            self.wr.borrow(cs).set(wr.wrapping_add(1));
            true
        }
    }

    fn get(&self, cs: CriticalSection<'_>) -> Option<u8> {
        if self.count(cs) == 0 {
            None
        } else {
            let rd = self.rd.borrow(cs).get();
            let data = self.buf[(rd & Self::MASK) as usize].borrow(cs).get();
            self.rd.borrow(cs).set(rd.wrapping_add(1));
            Some(data)
        }
    }
}

static TXQUEUE: TxQueue = TxQueue::new();
/// Remaining frame bits, LSB first: start, 8 data, stop.
static FRAME: Mutex<Cell<u16>> = Mutex::new(Cell::new(0));
static NBITS: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));
static ACTIVE: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

pub fn init(m: &MainCtx<'_>) {
    let tc0 = &DP.deref(m).TC0;
    tc0.tccr0a().write(|w| w.ctc0().set_bit());
    tc0.tcnt0h().write(|w| w);
    tc0.tcnt0l().write(|w| w);
    tc0.ocr0a().write(|w| w.set(TC0_OCR));
    tc0.timsk().modify(|_, w| w.ocie0a().set_bit());
    // The timer clock is only started while frames are pending.
}

fn frame(data: u8) -> u16 {
    0x200 | ((data as u16) << 1)
}

pub fn irq_handler_timer0_compa(c: &IrqCtx) {
    let cs = c.cs();

    let mut nbits = NBITS.borrow(cs).get();
    if nbits == 0 {
        match TXQUEUE.get(cs) {
            Some(data) => {
                FRAME.borrow(cs).set(frame(data));
                nbits = 10;
            }
            None => {
                // Queue drained. Stop the bit clock; the TX pin idles
                // high from the last stop bit.
                let tc0 = &DP.deref_irq(c).TC0;
                tc0.tccr0b().write(|w| w);
                ACTIVE.borrow(cs).set(false);
                return;
            }
        }
    }

    let bits = FRAME.borrow(cs).get();
    PORTB.set(TX_BIT, bits & 1 != 0);
    FRAME.borrow(cs).set(bits >> 1);
    NBITS.borrow(cs).set(nbits - 1);
}

/// Queue one byte. Returns false if the queue is full.
pub fn tx(m: &MainCtx<'_>, data: u8) -> bool {
    interrupt::free(|cs| {
        let ok = TXQUEUE.insert(cs, data);
        if ok && !ACTIVE.borrow(cs).get() {
            ACTIVE.borrow(cs).set(true);
            let tc0 = &DP.deref(m).TC0;
            tc0.tcnt0h().write(|w| w);
            tc0.tcnt0l().write(|w| w);
            tc0.tccr0b().write(|w| w.cs0().prescale_8());
        }
        ok
    })
}

/// Queue status text. Excess bytes are dropped.
pub fn tx_str(m: &MainCtx<'_>, s: &str) {
    for data in s.bytes() {
        tx(m, data);
    }
}

// vim: ts=4 sw=4 expandtab
