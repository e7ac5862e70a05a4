/// Duty-cycle samples for one half-cycle of the output sine wave.
///
/// The trailing zero is load bearing: the polarity flip happens on the
/// step after this sample was applied, so the handover of the high-side
/// switches always takes place while both low sides are at zero duty.
/// The deadband is encoded in the table shape, not as an explicit delay.
#[rustfmt::skip]
pub const SINE_TABLE: [u8; 38] = [
     21,  41,  61,  81, 100, 119, 136, 153, 169, 184,
    198, 210, 221, 230, 238, 245, 250, 253, 255, 253,
    250, 245, 238, 230, 221, 210, 198, 184, 169, 153,
    136, 119, 100,  81,  61,  41,  21,   0,
];

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table_shape() {
        let n = SINE_TABLE.len();
        assert_eq!(n, 38);
        // Starts hot, ends in the deadband zero.
        assert_ne!(SINE_TABLE[0], 0);
        assert_eq!(SINE_TABLE[n - 1], 0);
        // Peak in the middle.
        assert_eq!(SINE_TABLE[18], 255);
    }

    #[test]
    fn test_table_symmetry() {
        // The non-zero part is symmetric around the peak.
        for i in 0..37 {
            assert_eq!(SINE_TABLE[i], SINE_TABLE[36 - i], "index {}", i);
        }
    }

    #[test]
    fn test_table_monotonic_flanks() {
        for i in 0..18 {
            assert!(SINE_TABLE[i] < SINE_TABLE[i + 1], "rising flank at {}", i);
        }
        for i in 18..37 {
            assert!(SINE_TABLE[i] > SINE_TABLE[i + 1], "falling flank at {}", i);
        }
    }
}

// vim: ts=4 sw=4 expandtab
