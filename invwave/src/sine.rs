use crate::{HalfBridge, table::SINE_TABLE};

const N: u8 = SINE_TABLE.len() as u8;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn opposite(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

/// Sine generator state, stepped once per PWM timer overflow.
///
/// The stepping context is the single writer of this state. Everybody
/// else may only look at copies (diagnostics).
#[derive(Copy, Clone)]
pub struct SineGen {
    index: u8,
    polarity: Polarity,
}

impl SineGen {
    pub const fn new() -> Self {
        Self {
            index: 0,
            polarity: Polarity::Positive,
        }
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Advance the waveform by one table step.
    ///
    /// On wrap-around the polarity flips and the high sides are handed
    /// over. The previously applied sample was the table's trailing
    /// zero, so the handover happens with both low sides at zero duty.
    ///
    /// The positive half-wave pairs bridge 1 high with bridge 2 low PWM;
    /// the negative half-wave pairs bridge 2 high with bridge 1 low PWM.
    /// The current path always crosses the two bridges, which keeps the
    /// per-bridge exclusion invariant by construction.
    pub fn step<B: HalfBridge>(&mut self, bridge1: &mut B, bridge2: &mut B) {
        self.index += 1;
        if self.index >= N {
            self.index = 0;
            self.polarity = self.polarity.opposite();

            match self.polarity {
                Polarity::Positive => {
                    bridge2.deenergize_high();
                    bridge1.energize_high();
                }
                Polarity::Negative => {
                    bridge1.deenergize_high();
                    bridge2.energize_high();
                }
            }
        }

        let duty = SINE_TABLE[self.index as usize];
        match self.polarity {
            Polarity::Positive => {
                bridge2.set_low_duty(duty);
                bridge1.set_low_duty(0);
            }
            Polarity::Negative => {
                bridge2.set_low_duty(0);
                bridge1.set_low_duty(duty);
            }
        }
    }
}

impl Default for SineGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mock::MockBridge;
    use core::cell::Cell;

    #[test]
    fn test_half_cycle_flip() {
        let seq = Cell::new(0);
        let mut b1 = MockBridge::new(&seq);
        let mut b2 = MockBridge::new(&seq);
        let mut g = SineGen::new();

        assert_eq!(g.polarity(), Polarity::Positive);

        // 38 timer overflows walk exactly one half-cycle.
        for i in 0..38 {
            g.step(&mut b1, &mut b2);
            if i < 37 {
                assert_eq!(g.polarity(), Polarity::Positive, "early flip at {}", i);
            }
        }

        // One flip, high side handed from bridge 1 to bridge 2.
        assert_eq!(g.polarity(), Polarity::Negative);
        assert_eq!(g.index(), 0);
        assert!(!b1.high);
        assert!(b2.high);
        // The new half-wave PWMs the opposite bridge's low side.
        assert_eq!(b1.duty, SINE_TABLE[0]);
        assert_eq!(b2.duty, 0);
    }

    #[test]
    fn test_low_duty_mutual_exclusion() {
        let seq = Cell::new(0);
        let mut b1 = MockBridge::new(&seq);
        let mut b2 = MockBridge::new(&seq);
        let mut g = SineGen::new();

        for _ in 0..200 {
            g.step(&mut b1, &mut b2);
            assert!(b1.duty == 0 || b2.duty == 0);
        }
    }

    #[test]
    fn test_duty_from_table_only() {
        let seq = Cell::new(0);
        let mut b1 = MockBridge::new(&seq);
        let mut b2 = MockBridge::new(&seq);
        let mut g = SineGen::new();

        for _ in 0..200 {
            g.step(&mut b1, &mut b2);
            for duty in [b1.duty, b2.duty] {
                assert!(duty == 0 || SINE_TABLE.contains(&duty));
            }
        }
    }

    #[test]
    fn test_index_stays_in_range() {
        let seq = Cell::new(0);
        let mut b1 = MockBridge::new(&seq);
        let mut b2 = MockBridge::new(&seq);
        let mut g = SineGen::new();

        for _ in 0..500 {
            g.step(&mut b1, &mut b2);
            assert!((g.index() as usize) < SINE_TABLE.len());
        }
    }

    #[test]
    fn test_flip_only_after_zero_sample() {
        let seq = Cell::new(0);
        let mut b1 = MockBridge::new(&seq);
        let mut b2 = MockBridge::new(&seq);
        let mut g = SineGen::new();

        let mut flips = 0;
        for _ in 0..(38 * 4) {
            let prev_polarity = g.polarity();
            let prev_index = g.index();
            let prev_duties = (b1.duty, b2.duty);

            g.step(&mut b1, &mut b2);

            if g.polarity() != prev_polarity {
                flips += 1;
                // Flips happen only on the wrap step, right after the
                // trailing zero was applied to both low sides.
                assert_eq!(prev_index as usize, SINE_TABLE.len() - 1);
                assert_eq!(g.index(), 0);
                assert_eq!(prev_duties, (0, 0));
            }
        }
        assert_eq!(flips, 4);
    }
}

// vim: ts=4 sw=4 expandtab
