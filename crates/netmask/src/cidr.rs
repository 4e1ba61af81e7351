//! Network blocks given as an address and a mask, and parsing of CIDR notation.

use std::str::FromStr;

use crate::{
    address::{parse_ipv4, parse_ipv6, Address, AddressParseError},
    mask::{apply_mask, cidr_mask, last_four, Mask},
    utils::all_ones,
};

/// Raised when text is not a valid `"<address>/<prefix length>"` CIDR block.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("failed to parse given CIDR: {0:?}")]
pub struct CidrParseError(String);

impl CidrParseError {
    fn new(input: &str) -> Self {
        Self(input.to_owned())
    }

    /// Returns the text that failed to parse.
    pub fn input(&self) -> &str {
        &self.0
    }
}

/// A network block, defined by a network address and a mask.
///
/// The stored network need not be canonical (that is, it may have bits set outside the mask):
/// the mask is re-applied to it whenever a membership test is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    /// The network address.
    pub network: Address,
    /// The network mask.
    pub mask: Mask,
}

impl IpNet {
    /// Creates a network block from its parts without validating or canonicalising them.
    pub const fn new(network: Address, mask: Mask) -> Self {
        Self { network, mask }
    }

    /// Returns true if `address` is within this network block.
    ///
    /// Addresses of a different length than the stored network are never contained. A mask
    /// whose length differs from the network is narrowed or widened as in
    /// [`apply_mask`][crate::apply_mask]. If that is not possible the block is malformed, and
    /// this returns false for every address rather than reporting an error; use
    /// [`Network`][crate::Network] to have such blocks rejected at construction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use netmask::{cidr_mask, Address, IpNet};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let net = IpNet::new(Address::V4([172, 16, 0, 0]), cidr_mask(12, 32)?);
    /// assert!(net.contains(&Address::V4([172, 16, 1, 1])));
    /// assert!(!net.contains(&Address::V4([172, 32, 0, 1])));
    /// # Ok(())
    /// # }
    /// ```
    pub fn contains(&self, address: &Address) -> bool {
        if address.len() != self.network.len() {
            return false;
        }
        let Some(mask) = fit_mask(&self.mask, &self.network) else {
            return false;
        };

        self.network
            .as_bytes()
            .iter()
            .zip(address.as_bytes())
            .zip(mask.as_bytes())
            .all(|((network, address), mask)| network & mask == address & mask)
    }

    /// Parses `address` and returns true if it is within this network block.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressParseError`] if `address` is not a valid IPv4 or IPv6 address; an
    /// unparseable address is an error rather than a non-member.
    pub fn contains_str(&self, address: &str) -> Result<bool, AddressParseError> {
        Ok(self.contains(&address.parse()?))
    }
}

impl FromStr for IpNet {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s)
    }
}

/// Returns true if `address` is within `net`.
///
/// See [`IpNet::contains`].
pub fn contains_ip(net: &IpNet, address: &Address) -> bool {
    net.contains(address)
}

/// Parses a CIDR block such as `192.168.1.0/24` or `2001:db8::/32`.
///
/// The returned network is canonical: the host bits of the given address are cleared.
///
/// # Errors
///
/// Returns a [`CidrParseError`] if either side of the `/` is missing or malformed, or if the
/// prefix length exceeds the width of the address.
///
/// # Examples
///
/// ```
/// # use netmask::{parse_cidr, Address};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let net = parse_cidr("192.168.1.77/26")?;
/// assert_eq!(net.network, Address::V4([192, 168, 1, 64]));
/// assert_eq!(net.mask, Address::V4([255, 255, 255, 192]));
///
/// assert!(parse_cidr("192.168.1.1").is_err());
/// # Ok(())
/// # }
/// ```
pub fn parse_cidr(s: &str) -> Result<IpNet, CidrParseError> {
    let (address, prefix) = s.split_once('/').ok_or_else(|| CidrParseError::new(s))?;
    if address.is_empty() || prefix.is_empty() {
        return Err(CidrParseError::new(s));
    }

    let address = parse_ipv4(address)
        .or_else(|| parse_ipv6(address))
        .ok_or_else(|| CidrParseError::new(s))?;
    let prefix = parse_prefix_len(prefix, address.bits()).ok_or_else(|| CidrParseError::new(s))?;

    let mask = cidr_mask(prefix, address.bits()).map_err(|_| CidrParseError::new(s))?;
    let network = apply_mask(&address, &mask).map_err(|_| CidrParseError::new(s))?;

    Ok(IpNet::new(network, mask))
}

/// Parses a strictly formatted decimal prefix length of at most `max`.
///
/// Signs, leading zeros and surrounding whitespace are rejected.
pub(crate) fn parse_prefix_len(s: &str, max: u32) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let prefix: u32 = s.parse().ok()?;
    if prefix.to_string().len() != s.len() || prefix > max {
        return None;
    }
    Some(prefix)
}

/// Adjusts `mask` to the length of `network`, if the two families can be reconciled.
pub(crate) fn fit_mask(mask: &Mask, network: &Address) -> Option<Mask> {
    const PREFIX_END: usize = 11;

    match (*network, *mask) {
        (network, mask) if network.len() == mask.len() => Some(mask),
        (Address::V4(_), Address::V6(mask)) if all_ones(&mask, 0, PREFIX_END) => {
            Some(Address::V4(last_four(&mask)))
        }
        (Address::V6(_), Address::V4(mask)) if network.is_ipv4_mapped() => {
            let mut widened = [0xff; Address::V6_LEN];
            widened[PREFIX_END + 1..].copy_from_slice(&mask);
            Some(Address::V6(widened))
        }
        _ => None,
    }
}
