use crate::HalfBridge;

/// One phase of the trapezoid output sequence.
///
/// The cycle is NullA -> Pos -> NullB -> Neg -> NullA -> ... During the
/// null phases both output terminals are connected to ground through the
/// low sides.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TrapPhase {
    NullA,
    Pos,
    NullB,
    Neg,
}

impl TrapPhase {
    pub const fn next(self) -> Self {
        match self {
            Self::NullA => Self::Pos,
            Self::Pos => Self::NullB,
            Self::NullB => Self::Neg,
            Self::Neg => Self::NullA,
        }
    }

    pub const fn is_null(self) -> bool {
        matches!(self, Self::NullA | Self::NullB)
    }

    /// Perform the switch transition into this phase.
    ///
    /// The switch leaving the active set is opened first, then `settle`
    /// runs (the FET turn-off settle delay in the firmware), then the
    /// entering switch is closed. Each transition touches exactly one
    /// bridge; the other one keeps its state from the previous phase.
    pub fn enter<B: HalfBridge>(
        self,
        bridge1: &mut B,
        bridge2: &mut B,
        settle: &mut dyn FnMut(),
    ) {
        match self {
            Self::NullA => {
                bridge2.deenergize_high();
                settle();
                bridge2.energize_low();
            }
            Self::Pos => {
                bridge1.deenergize_low();
                settle();
                bridge1.energize_high();
            }
            Self::NullB => {
                bridge1.deenergize_high();
                settle();
                bridge1.energize_low();
            }
            Self::Neg => {
                bridge2.deenergize_low();
                settle();
                bridge2.energize_high();
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mock::{MockBridge, Op};
    use core::cell::Cell;

    #[test]
    fn test_phase_cycle_order() {
        let mut phase = TrapPhase::NullA;
        let expect = [
            TrapPhase::Pos,
            TrapPhase::NullB,
            TrapPhase::Neg,
            TrapPhase::NullA,
            TrapPhase::Pos,
        ];
        for e in expect {
            phase = phase.next();
            assert_eq!(phase, e);
        }
    }

    #[test]
    fn test_null_phases() {
        assert!(TrapPhase::NullA.is_null());
        assert!(TrapPhase::NullB.is_null());
        assert!(!TrapPhase::Pos.is_null());
        assert!(!TrapPhase::Neg.is_null());
    }

    #[test]
    fn test_settle_between_deenergize_and_energize() {
        let seq = Cell::new(0);
        let mut b1 = MockBridge::new(&seq);
        let mut b2 = MockBridge::new(&seq);

        let mut phase = TrapPhase::Neg;
        // Run one full warm-up cycle so every phase starts from its
        // real predecessor state.
        for _ in 0..4 {
            phase = phase.next();
            phase.enter(&mut b1, &mut b2, &mut || {
                MockBridge::take_seq(&seq);
            });
        }

        for _ in 0..4 {
            phase = phase.next();
            b1.clear_log();
            b2.clear_log();
            let mut settle_seq = u32::MAX;
            phase.enter(&mut b1, &mut b2, &mut || {
                settle_seq = MockBridge::take_seq(&seq);
            });

            // Exactly one bridge is touched, with exactly one opening
            // op before the settle delay and one closing op after it.
            let (touched, untouched) = if b1.ops().is_empty() {
                (&b2, &b1)
            } else {
                (&b1, &b2)
            };
            assert!(untouched.ops().is_empty());
            assert_eq!(touched.ops().len(), 2);
            let (open_seq, open_op) = touched.ops()[0];
            let (close_seq, close_op) = touched.ops()[1];
            assert!(matches!(open_op, Op::HighOff | Op::LowOff));
            assert!(matches!(close_op, Op::HighOn | Op::LowOn));
            assert!(open_seq < settle_seq, "settle ran before the opening op");
            assert!(settle_seq < close_seq, "closing op ran before settle");
        }
    }

    #[test]
    fn test_full_cycle_switch_states() {
        let seq = Cell::new(0);
        let mut b1 = MockBridge::new(&seq);
        let mut b2 = MockBridge::new(&seq);
        let mut settle = || {};

        let mut phase = TrapPhase::Neg;
        // Two cycles; the mock panics on any shoot-through, the
        // assertions check the steady per-phase switch pattern.
        for cycle in 0..2 {
            for _ in 0..4 {
                phase = phase.next();
                phase.enter(&mut b1, &mut b2, &mut settle);
                match phase {
                    TrapPhase::NullA => {
                        assert!(!b1.high && !b2.high);
                        assert!(b2.low);
                        if cycle > 0 {
                            // Held over from NullB of the previous cycle.
                            assert!(b1.low);
                        }
                    }
                    TrapPhase::Pos => {
                        assert!(b1.high && !b1.low);
                        assert!(!b2.high && b2.low);
                    }
                    TrapPhase::NullB => {
                        assert!(!b1.high && !b2.high);
                        assert!(b1.low && b2.low);
                    }
                    TrapPhase::Neg => {
                        assert!(b2.high && !b2.low);
                        assert!(!b1.high && b1.low);
                    }
                }
            }
        }
    }
}

// vim: ts=4 sw=4 expandtab
