//! Predicates over byte ranges used when reconciling IPv4 and IPv6 operands.

/// Returns true if every byte of `bytes` in the inclusive range `[from, to]` is `0xff`.
///
/// Indices beyond the end of `bytes` are not visited.
pub(crate) fn all_ones(bytes: &[u8], from: usize, to: usize) -> bool {
    bytes
        .iter()
        .take(to.saturating_add(1))
        .skip(from)
        .all(|byte| *byte == 0xff)
}

/// Returns true if `a` and `b` agree on every index in the inclusive range `[from, to]`.
///
/// Indices beyond the end of either slice are not visited.
pub(crate) fn range_equal(a: &[u8], b: &[u8], from: usize, to: usize) -> bool {
    a.iter()
        .zip(b)
        .take(to.saturating_add(1))
        .skip(from)
        .all(|(x, y)| x == y)
}

#[cfg(test)]
mod tests {
    use test_utils::param_test;

    use super::*;

    param_test! {
        all_ones_checks_inclusive_range: [
            full_v4: (&[0xff, 0xff, 0xff, 0xff], 0, 3, true),
            prefix_only: (&[0xff, 0xff, 0x00, 0x00], 0, 1, true),
            last_index_included: (&[0xff, 0xff, 0x00, 0x00], 0, 2, false),
            offset_range: (&[0x00, 0xff, 0xff, 0x00], 1, 2, true),
            single_byte: (&[0xfe], 0, 0, false),
            past_the_end: (&[0xff, 0xff], 0, 11, true),
        ]
    }
    fn all_ones_checks_inclusive_range(bytes: &[u8], from: usize, to: usize, expected: bool) {
        assert_eq!(all_ones(bytes, from, to), expected);
    }

    #[test]
    fn all_ones_on_v6_mask_prefix() {
        let mut mask = [0xffu8; 16];
        mask[15] = 0xe0;
        assert!(all_ones(&mask, 0, 11));

        mask[11] = 0xfe;
        assert!(!all_ones(&mask, 0, 11));
    }

    param_test! {
        range_equal_compares_inclusive_range: [
            identical: (&[1, 2, 3, 4], &[1, 2, 3, 4], 0, 3, true),
            differs_outside: (&[1, 2, 3, 4], &[1, 2, 3, 5], 0, 2, true),
            differs_at_end: (&[1, 2, 3, 4], &[1, 2, 3, 5], 0, 3, false),
            differs_before_start: (&[9, 2, 3, 4], &[1, 2, 3, 4], 1, 3, true),
            shorter_operand: (&[1, 2], &[1, 2, 3, 4], 0, 3, true),
        ]
    }
    fn range_equal_compares_inclusive_range(
        a: &[u8],
        b: &[u8],
        from: usize,
        to: usize,
        expected: bool,
    ) {
        assert_eq!(range_equal(a, b, from, to), expected);
    }
}
