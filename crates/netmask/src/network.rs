//! A network block value that parses from and renders to text.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::Deserialize;

use crate::{
    address::{parse_address, Address, AddressParseError},
    cidr::{fit_mask, parse_cidr, parse_prefix_len, CidrParseError, IpNet},
    mask::{apply_mask, cidr_mask, simple_mask_length, Mask, MaskError, NON_PREFIX_MASK},
};

/// Errors raised when constructing a [`Network`] or querying it with text.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum NetworkError {
    /// The network address is not a valid IPv4 or IPv6 address.
    #[error("failed to parse network")]
    InvalidNetwork,
    /// The mask is neither a valid prefix length nor a valid mask literal.
    #[error("failed to parse mask")]
    InvalidMask,
    /// The CIDR text is malformed.
    #[error("{0}")]
    Cidr(#[from] CidrParseError),
    /// The mask cannot be applied to the network address.
    #[error("{0}")]
    Mask(#[from] MaskError),
    /// The queried address is malformed.
    #[error("{0}")]
    Address(#[from] AddressParseError),
}

/// The mask operand of [`Network::with_mask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSpec<'a> {
    /// A prefix length.
    Prefix(u32),
    /// A decimal prefix length such as `"24"`, or a mask literal such as `"255.255.255.0"`.
    Text(&'a str),
}

impl From<u32> for MaskSpec<'_> {
    fn from(value: u32) -> Self {
        Self::Prefix(value)
    }
}

impl<'a> From<&'a str> for MaskSpec<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

/// A network block with a canonical network address.
///
/// Renders as `"<address>/<prefix length>"`, or as `"<address>/<mask>"` if the mask is not a
/// run of leading one bits. Both forms parse back into an equal value.
///
/// # Examples
///
/// ```
/// # use netmask::Network;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let net = Network::with_mask("192.168.0.77", "255.255.255.0")?;
/// assert_eq!(net.to_string(), "192.168.0.0/24");
/// assert_eq!(net, "192.168.0.0/24".parse()?);
/// assert!(net.contains("192.168.0.1")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Network(IpNet);

impl Network {
    /// Parses a network from CIDR text such as `"10.0.0.0/8"`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Cidr`] if the text is not valid CIDR notation.
    pub fn new(cidr: &str) -> Result<Self, NetworkError> {
        Ok(Self(parse_cidr(cidr)?))
    }

    /// Builds a network from an address and a separately specified mask.
    ///
    /// Textual masks are first read as a decimal prefix length in range for the address family,
    /// and otherwise as a mask literal. Host bits of `address` are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::InvalidNetwork`] if `address` does not parse,
    /// [`NetworkError::InvalidMask`] if the mask does not parse, and [`NetworkError::Mask`] if
    /// the mask cannot be applied to the address.
    pub fn with_mask<'a>(
        address: &str,
        mask: impl Into<MaskSpec<'a>>,
    ) -> Result<Self, NetworkError> {
        let address = parse_address(address).ok_or(NetworkError::InvalidNetwork)?;
        let bits = address.bits();

        let mask = match mask.into() {
            MaskSpec::Prefix(prefix) => {
                cidr_mask(prefix, bits).map_err(|_| NetworkError::InvalidMask)?
            }
            MaskSpec::Text(text) => match parse_prefix_len(text, bits) {
                Some(prefix) => {
                    tracing::trace!(prefix, "interpreting mask as a prefix length");
                    cidr_mask(prefix, bits).map_err(|_| NetworkError::InvalidMask)?
                }
                None => {
                    tracing::trace!(mask = text, "interpreting mask as a mask literal");
                    parse_address(text).ok_or(NetworkError::InvalidMask)?
                }
            },
        };

        Self::from_parts(&address, &mask)
    }

    /// Clears the host bits of `address` and stores `mask` at the length of the result.
    fn from_parts(address: &Address, mask: &Mask) -> Result<Self, NetworkError> {
        let network = apply_mask(address, mask)?;
        let mask = fit_mask(mask, &network).ok_or(MaskError::LengthMismatch {
            address: network.len(),
            mask: mask.len(),
        })?;

        Ok(Self(IpNet::new(network, mask)))
    }

    /// Returns the canonical network address.
    pub const fn network(&self) -> Address {
        self.0.network
    }

    /// Returns the network mask.
    pub const fn mask(&self) -> Mask {
        self.0.mask
    }

    /// Returns the prefix length, or `None` if the mask is not a run of leading one bits.
    pub fn prefix_len(&self) -> Option<u8> {
        u8::try_from(simple_mask_length(&self.0.mask)).ok()
    }

    /// Returns the underlying network block.
    pub const fn as_ip_net(&self) -> &IpNet {
        &self.0
    }

    /// Parses `address` and returns true if it is within this network.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressParseError`] if `address` is not a valid IPv4 or IPv6 address.
    pub fn contains(&self, address: &str) -> Result<bool, AddressParseError> {
        self.0.contains_str(address)
    }

    /// Returns true if `address` is within this network.
    pub fn contains_address(&self, address: &Address) -> bool {
        self.0.contains(address)
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match simple_mask_length(&self.0.mask) {
            NON_PREFIX_MASK => write!(f, "{}/{}", self.0.network, self.0.mask),
            prefix => write!(f, "{}/{}", self.0.network, prefix),
        }
    }
}

impl FromStr for Network {
    type Err = NetworkError;

    /// Parses CIDR text, or `"<address>/<mask literal>"` as rendered for non-prefix masks.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((address, mask)) if mask.contains(|c: char| c == '.' || c == ':') => {
                Self::with_mask(address, mask)
            }
            _ => Self::new(s),
        }
    }
}

impl TryFrom<String> for Network {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl TryFrom<IpNet> for Network {
    type Error = NetworkError;

    /// Canonicalises the network address of `value` and matches its mask to the result.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Mask`] if the network and mask lengths cannot be reconciled.
    fn try_from(value: IpNet) -> Result<Self, Self::Error> {
        Self::from_parts(&value.network, &value.mask)
    }
}

impl From<Network> for IpNet {
    fn from(value: Network) -> Self {
        value.0
    }
}

/// Parses `cidr` and returns true if `address` is within it.
///
/// # Errors
///
/// Returns an error if either the CIDR block or the address is malformed.
///
/// # Examples
///
/// ```
/// # use netmask::cidr_contains;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert!(cidr_contains("192.168.0.1/24", "192.168.0.16")?);
/// assert!(!cidr_contains("2001:db8::/128", "2001:db99::")?);
/// assert!(cidr_contains("192.168.0.1", "192.168.0.16").is_err());
/// # Ok(())
/// # }
/// ```
pub fn cidr_contains(cidr: &str, address: &str) -> Result<bool, NetworkError> {
    Ok(Network::new(cidr)?.contains(address)?)
}
