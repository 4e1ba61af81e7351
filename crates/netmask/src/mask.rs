//! Construction and application of network masks.

use crate::{
    address::{Address, IPV4_MAPPED_PREFIX},
    utils::{all_ones, range_equal},
};

/// A network mask.
///
/// Masks have the same 4- or 16-byte shape as addresses, and may be parsed from an address
/// literal such as `255.255.255.0`.
pub type Mask = Address;

/// Returned by [`simple_mask_length`] for masks that are not a run of leading one bits.
pub const NON_PREFIX_MASK: i32 = -1;

/// Errors raised when building or applying a [`Mask`].
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy)]
pub enum MaskError {
    /// The prefix length or total width passed to [`cidr_mask`] is out of range.
    #[error("invalid CIDR mask: {ones} leading ones in {bits} bits")]
    InvalidCidrMask {
        /// The requested number of leading one bits.
        ones: u32,
        /// The requested total number of bits.
        bits: u32,
    },
    /// The address and mask are of different families and cannot be reconciled.
    #[error("cannot mask address: length mismatch ({address}-byte address, {mask}-byte mask)")]
    LengthMismatch {
        /// The length of the address in bytes.
        address: usize,
        /// The length of the mask in bytes.
        mask: usize,
    },
}

/// Builds a mask of `bits` total bits whose first `ones` bits are set.
///
/// # Errors
///
/// Returns [`MaskError::InvalidCidrMask`] if `bits` is neither 32 nor 128, or if `ones` exceeds
/// `bits`.
///
/// # Examples
///
/// ```
/// # use netmask::{cidr_mask, Address};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(cidr_mask(12, 32)?, Address::V4([255, 240, 0, 0]));
/// assert!(cidr_mask(33, 32).is_err());
/// # Ok(())
/// # }
/// ```
pub fn cidr_mask(ones: u32, bits: u32) -> Result<Mask, MaskError> {
    const V4_BITS: u32 = u32::BITS;
    const V6_BITS: u32 = u128::BITS;

    if ones > bits {
        return Err(MaskError::InvalidCidrMask { ones, bits });
    }
    match bits {
        V4_BITS => Ok(Address::V4(prefix_bytes(ones))),
        V6_BITS => Ok(Address::V6(prefix_bytes(ones))),
        _ => Err(MaskError::InvalidCidrMask { ones, bits }),
    }
}

fn prefix_bytes<const N: usize>(ones: u32) -> [u8; N] {
    let mut remaining = ones;
    let mut bytes = [0u8; N];

    for byte in bytes.iter_mut() {
        if remaining >= u8::BITS {
            *byte = 0xff;
            remaining -= u8::BITS;
            continue;
        }
        *byte = 0xff - (0xff >> remaining);
        remaining = 0;
    }

    bytes
}

/// Returns the bitwise AND of `address` and `mask`.
///
/// An IPv6 mask whose first 12 bytes are all ones is narrowed to its last four bytes before
/// being applied to an IPv4 address. An IPv4 mask is applied to the last four bytes of an
/// IPv4-mapped IPv6 address, yielding an IPv4 address.
///
/// # Errors
///
/// Returns [`MaskError::LengthMismatch`] if the two operands remain of different lengths after
/// the adjustments above.
///
/// # Examples
///
/// ```
/// # use netmask::{apply_mask, Address};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let masked = apply_mask(&Address::V4([192, 168, 1, 127]), &Address::V4([255, 255, 255, 128]))?;
/// assert_eq!(masked, Address::V4([192, 168, 1, 0]));
/// # Ok(())
/// # }
/// ```
pub fn apply_mask(address: &Address, mask: &Mask) -> Result<Address, MaskError> {
    const PREFIX_END: usize = IPV4_MAPPED_PREFIX.len() - 1;

    match (*address, *mask) {
        (Address::V4(address), Address::V4(mask)) => Ok(Address::V4(and_bytes(address, mask))),
        (Address::V6(address), Address::V6(mask)) => Ok(Address::V6(and_bytes(address, mask))),
        (Address::V4(address), Address::V6(mask)) if all_ones(&mask, 0, PREFIX_END) => {
            tracing::trace!("narrowing IPv6 mask to apply it to an IPv4 address");
            Ok(Address::V4(and_bytes(address, last_four(&mask))))
        }
        (Address::V6(address), Address::V4(mask))
            if range_equal(&address, &IPV4_MAPPED_PREFIX, 0, PREFIX_END) =>
        {
            tracing::trace!("narrowing IPv4-mapped address to apply an IPv4 mask");
            Ok(Address::V4(and_bytes(last_four(&address), mask)))
        }
        (address, mask) => Err(MaskError::LengthMismatch {
            address: address.len(),
            mask: mask.len(),
        }),
    }
}

fn and_bytes<const N: usize>(address: [u8; N], mask: [u8; N]) -> [u8; N] {
    std::array::from_fn(|i| address[i] & mask[i])
}

pub(crate) fn last_four(bytes: &[u8; 16]) -> [u8; 4] {
    let [.., a, b, c, d] = *bytes;
    [a, b, c, d]
}

/// Returns the number of leading one bits of `mask`, or [`NON_PREFIX_MASK`] if a one bit
/// follows a zero bit.
///
/// # Examples
///
/// ```
/// # use netmask::{simple_mask_length, Address, NON_PREFIX_MASK};
/// assert_eq!(simple_mask_length(&Address::V4([255, 255, 255, 0])), 24);
/// assert_eq!(simple_mask_length(&Address::V4([255, 0, 255, 0])), NON_PREFIX_MASK);
/// ```
pub fn simple_mask_length(mask: &Mask) -> i32 {
    let (prefix, trailing_zero) = match *mask {
        Address::V4(bytes) => {
            let mask = u32::from_be_bytes(bytes);
            let prefix = mask.leading_ones();
            (prefix, mask.checked_shl(prefix).unwrap_or(0) == 0)
        }
        Address::V6(bytes) => {
            let mask = u128::from_be_bytes(bytes);
            let prefix = mask.leading_ones();
            (prefix, mask.checked_shl(prefix).unwrap_or(0) == 0)
        }
    };

    if trailing_zero {
        prefix as i32
    } else {
        NON_PREFIX_MASK
    }
}

#[cfg(test)]
mod tests {
    use test_utils::param_test;

    use super::*;
    use crate::address::parse_ipv6;

    fn v6(s: &str) -> Address {
        parse_ipv6(s).expect("valid IPv6 test address")
    }

    param_test! {
        builds_cidr_mask: [
            v4_empty: (0, 32, Address::V4([0, 0, 0, 0])),
            v4_partial: (12, 32, Address::V4([255, 240, 0, 0])),
            v4_class_c: (24, 32, Address::V4([255, 255, 255, 0])),
            v4_full: (32, 32, Address::V4([255; 4])),
            v6_empty: (0, 128, Address::V6([0; 16])),
            v6_nibble: (4, 128, Address::V6([0xf0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])),
            v6_48: (
                48,
                128,
                Address::V6([0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
            ),
            v6_full: (128, 128, Address::V6([0xff; 16])),
        ]
    }
    fn builds_cidr_mask(ones: u32, bits: u32, expected: Mask) {
        assert_eq!(cidr_mask(ones, bits), Ok(expected));
    }

    param_test! {
        rejects_invalid_cidr_mask: [
            too_many_ones_v4: (33, 32),
            unsupported_width: (32, 33),
            too_many_ones_v6: (129, 128),
            zero_width: (0, 0),
            byte_width: (8, 8),
        ]
    }
    fn rejects_invalid_cidr_mask(ones: u32, bits: u32) {
        assert_eq!(
            cidr_mask(ones, bits),
            Err(MaskError::InvalidCidrMask { ones, bits })
        );
    }

    param_test! {
        applies_mask: [
            v4_prefix: (
                Address::V4([192, 168, 1, 127]),
                Address::V4([255, 255, 255, 128]),
                Address::V4([192, 168, 1, 0])
            ),
            v4_literal_mask: (
                Address::V4([192, 168, 1, 127]),
                Address::V4([255, 255, 255, 192]),
                Address::V4([192, 168, 1, 64])
            ),
            v4_with_wide_mask: (
                Address::V4([192, 168, 1, 127]),
                v6("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffe0"),
                Address::V4([192, 168, 1, 96])
            ),
            v4_non_contiguous: (
                Address::V4([192, 168, 1, 127]),
                Address::V4([255, 0, 255, 0]),
                Address::V4([192, 0, 1, 0])
            ),
            v6_prefix: (v6("2001:db8::1"), v6("ffff:ff80::"), v6("2001:d80::")),
            v6_non_contiguous: (v6("2001:db8::1"), v6("f0f0:0f0f::"), v6("2000:d08::")),
            mapped_with_v4_mask: (
                v6("::ffff:192.168.1.127"),
                Address::V4([255, 255, 255, 0]),
                Address::V4([192, 168, 1, 0])
            ),
        ]
    }
    fn applies_mask(address: Address, mask: Mask, expected: Address) {
        assert_eq!(apply_mask(&address, &mask), Ok(expected));
    }

    param_test! {
        rejects_incompatible_operands: [
            v4_with_narrow_v6_mask: (Address::V4([192, 168, 1, 1]), v6("ffff:ffff::")),
            unmapped_v6_with_v4_mask: (v6("2001:db8::1"), Address::V4([255, 255, 0, 0])),
        ]
    }
    fn rejects_incompatible_operands(address: Address, mask: Mask) {
        assert_eq!(
            apply_mask(&address, &mask),
            Err(MaskError::LengthMismatch {
                address: address.len(),
                mask: mask.len(),
            })
        );
    }

    #[test]
    fn masking_does_not_alias_input() {
        let address = v6("::ffff:10.1.2.3");
        let masked = apply_mask(&address, &Address::V4([255, 0, 0, 0])).unwrap();
        assert_eq!(masked, Address::V4([10, 0, 0, 0]));
        assert_eq!(address, v6("::ffff:10.1.2.3"));
    }

    param_test! {
        computes_simple_mask_length: [
            v4_26: (cidr_mask(26, 32).unwrap(), 26),
            v4_non_contiguous: (Address::V4([255, 0, 255, 0]), NON_PREFIX_MASK),
            v4_24: (Address::V4([255, 255, 255, 0]), 24),
            v4_zero: (Address::V4([0, 0, 0, 0]), 0),
            v4_hole_in_byte: (Address::V4([255, 0b1010_0000, 0, 0]), NON_PREFIX_MASK),
            v6_55: (cidr_mask(55, 128).unwrap(), 55),
            v6_full: (Address::V6([0xff; 16]), 128),
            v6_non_contiguous: (v6("8000:f123:0:cafe::"), NON_PREFIX_MASK),
        ]
    }
    fn computes_simple_mask_length(mask: Mask, expected: i32) {
        assert_eq!(simple_mask_length(&mask), expected);
    }

    #[test]
    fn cidr_mask_length_round_trips() {
        for bits in [32, 128] {
            for ones in 0..=bits {
                let mask = cidr_mask(ones, bits).unwrap();
                assert_eq!(simple_mask_length(&mask), ones as i32, "{ones}/{bits}");
            }
        }
    }
}
