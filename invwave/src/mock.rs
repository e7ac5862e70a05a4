//! Mock half-bridge for the test suite.
//!
//! Checks the shoot-through invariant after every single operation, so
//! each test implicitly verifies it at every reachable instant.

use crate::HalfBridge;
use core::cell::Cell;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Op {
    HighOn,
    HighOff,
    LowOn,
    LowOff,
    Duty(u8),
}

pub const LOG_CAP: usize = 32;

pub struct MockBridge<'a> {
    /// Shared event counter, so op ordering across two bridges and the
    /// settle hook can be reconstructed.
    seq: &'a Cell<u32>,
    pub high: bool,
    pub low: bool,
    pub duty: u8,
    log: [(u32, Op); LOG_CAP],
    len: usize,
}

impl<'a> MockBridge<'a> {
    pub fn new(seq: &'a Cell<u32>) -> Self {
        Self {
            seq,
            high: false,
            low: false,
            duty: 0,
            log: [(0, Op::HighOff); LOG_CAP],
            len: 0,
        }
    }

    pub fn take_seq(seq: &Cell<u32>) -> u32 {
        let s = seq.get();
        seq.set(s + 1);
        s
    }

    fn push(&mut self, op: Op) {
        let s = Self::take_seq(self.seq);
        if self.len < LOG_CAP {
            self.log[self.len] = (s, op);
            self.len += 1;
        }
    }

    fn check(&self) {
        assert!(
            !(self.high && (self.low || self.duty != 0)),
            "half-bridge shoot-through"
        );
    }

    pub fn clear_log(&mut self) {
        self.len = 0;
    }

    pub fn ops(&self) -> &[(u32, Op)] {
        &self.log[..self.len]
    }
}

impl HalfBridge for MockBridge<'_> {
    fn energize_high(&mut self) {
        self.high = true;
        self.push(Op::HighOn);
        self.check();
    }

    fn deenergize_high(&mut self) {
        self.high = false;
        self.push(Op::HighOff);
        self.check();
    }

    fn energize_low(&mut self) {
        self.low = true;
        self.push(Op::LowOn);
        self.check();
    }

    fn deenergize_low(&mut self) {
        self.low = false;
        self.push(Op::LowOff);
        self.check();
    }

    fn set_low_duty(&mut self, duty: u8) {
        self.duty = duty;
        self.push(Op::Duty(duty));
        self.check();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    #[should_panic(expected = "shoot-through")]
    fn test_mock_guards_the_invariant() {
        let seq = Cell::new(0);
        let mut b = MockBridge::new(&seq);
        b.energize_high();
        b.energize_low();
    }
}

// vim: ts=4 sw=4 expandtab
