use std::{
    fmt::{Display, Formatter},
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use serde::Deserialize;

use super::{error::AddressKind, parse, AddressParseError, NotIpv4Mapped};

/// The first 12 bytes of an IPv4-mapped IPv6 address, `::ffff:0:0/96`.
pub const IPV4_MAPPED_PREFIX: [u8; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff];

/// An IPv4 or IPv6 address stored as its network-order bytes.
///
/// The same shape is used for masks (see [`Mask`][crate::Mask]); the byte length is the
/// discriminant between the two families.
///
/// # Examples
///
/// ```
/// # use netmask::Address;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// assert_eq!(Address::V4([10, 0, 0, 1]), "10.0.0.1".parse()?);
/// assert_eq!("2001:db8::1".parse::<Address>()?.len(), 16);
/// # Ok(())
/// # }
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Address {
    /// A 4-byte IPv4 address.
    V4([u8; 4]),
    /// A 16-byte IPv6 address.
    V6([u8; 16]),
}

impl Address {
    /// The length in bytes of an IPv4 address.
    pub const V4_LEN: usize = 4;

    /// The length in bytes of an IPv6 address.
    pub const V6_LEN: usize = 16;

    /// Builds an address from a byte slice of length 4 or 16.
    ///
    /// Returns `None` for any other length.
    ///
    /// # Examples
    ///
    /// ```
    /// # use netmask::Address;
    /// assert_eq!(Address::from_bytes(&[127, 0, 0, 1]), Some(Address::V4([127, 0, 0, 1])));
    /// assert_eq!(Address::from_bytes(&[127, 0, 1]), None);
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            Self::V4_LEN => <[u8; 4]>::try_from(bytes).ok().map(Self::V4),
            Self::V6_LEN => <[u8; 16]>::try_from(bytes).ok().map(Self::V6),
            _ => None,
        }
    }

    /// Returns the number of bytes in the address, 4 or 16.
    pub const fn len(&self) -> usize {
        match self {
            Self::V4(_) => Self::V4_LEN,
            Self::V6(_) => Self::V6_LEN,
        }
    }

    /// Returns false, as every address has a fixed non-zero length.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the number of bits in the address, 32 or 128.
    pub const fn bits(&self) -> u32 {
        self.len() as u32 * u8::BITS
    }

    /// Returns the address bytes in network order.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::V4(bytes) => bytes,
            Self::V6(bytes) => bytes,
        }
    }

    /// Returns true if this is a 4-byte address.
    pub const fn is_ipv4(&self) -> bool {
        matches!(self, Self::V4(_))
    }

    /// Returns true if this is a 16-byte address.
    pub const fn is_ipv6(&self) -> bool {
        matches!(self, Self::V6(_))
    }

    /// Returns true if this is an IPv6 address within `::ffff:0:0/96`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use netmask::Address;
    /// assert!(Address::V6([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 255, 255, 127, 1, 2, 3]).is_ipv4_mapped());
    /// assert!(!Address::V6([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 255, 254, 127, 1, 2, 3]).is_ipv4_mapped());
    /// assert!(!Address::V4([127, 1, 2, 3]).is_ipv4_mapped());
    /// ```
    pub fn is_ipv4_mapped(&self) -> bool {
        match self {
            Self::V4(_) => false,
            Self::V6(bytes) => bytes[..IPV4_MAPPED_PREFIX.len()] == IPV4_MAPPED_PREFIX,
        }
    }

    /// Returns the IPv4 address embedded in an IPv4-mapped IPv6 address.
    ///
    /// # Errors
    ///
    /// Returns [`NotIpv4Mapped`] for IPv4 addresses and for IPv6 addresses outside
    /// `::ffff:0:0/96`.
    pub fn to_ipv4(&self) -> Result<Address, NotIpv4Mapped> {
        match self {
            Self::V6([.., a, b, c, d]) if self.is_ipv4_mapped() => Ok(Self::V4([*a, *b, *c, *d])),
            _ => Err(NotIpv4Mapped),
        }
    }

    /// Returns the IPv4-mapped IPv6 form of an IPv4 address, and IPv6 addresses unchanged.
    pub fn to_ipv6_mapped(&self) -> Address {
        match self {
            Self::V4(v4) => {
                let mut bytes = [0u8; Self::V6_LEN];
                bytes[..IPV4_MAPPED_PREFIX.len()].copy_from_slice(&IPV4_MAPPED_PREFIX);
                bytes[IPV4_MAPPED_PREFIX.len()..].copy_from_slice(v4);
                Self::V6(bytes)
            }
            Self::V6(_) => *self,
        }
    }
}

/// Returns true if `address` is an IPv6 address whose first 10 bytes are zero and next two are
/// `0xff`.
pub fn is_ipv4_mapped_ipv6(address: &Address) -> bool {
    address.is_ipv4_mapped()
}

/// Returns the last four bytes of an IPv4-mapped IPv6 address as an IPv4 address.
///
/// # Errors
///
/// Returns [`NotIpv4Mapped`] if [`is_ipv4_mapped_ipv6`] is false for `address`.
///
/// # Examples
///
/// ```
/// # use netmask::{extract_ipv4, parse_ipv6, Address, NotIpv4Mapped};
/// let mapped = parse_ipv6("::ffff:127.1.2.3").unwrap();
/// assert_eq!(extract_ipv4(&mapped), Ok(Address::V4([127, 1, 2, 3])));
///
/// let unmapped = parse_ipv6("::fffe:127.1.2.3").unwrap();
/// assert_eq!(extract_ipv4(&unmapped), Err(NotIpv4Mapped));
/// ```
pub fn extract_ipv4(address: &Address) -> Result<Address, NotIpv4Mapped> {
    address.to_ipv4()
}

impl Display for Address {
    /// Formats IPv4 addresses in dotted decimal, and IPv6 addresses as eight zero-padded
    /// hexadecimal groups without zero compression.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V4([a, b, c, d]) => write!(f, "{a}.{b}.{c}.{d}"),
            Self::V6(bytes) => {
                for (i, hextet) in bytes.chunks_exact(2).enumerate() {
                    let separator = if i != 0 { ":" } else { "" };
                    write!(f, "{}{:02x}{:02x}", separator, hextet[0], hextet[1])?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.bytes().find(|b| *b == b'.' || *b == b':') {
            Some(b'.') => parse::parse_ipv4(s).ok_or(AddressKind::Ipv4.into()),
            Some(_) => parse::parse_ipv6(s).ok_or(AddressKind::Ipv6.into()),
            None => Err(AddressKind::Ip.into()),
        }
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<[u8; 4]> for Address {
    fn from(value: [u8; 4]) -> Self {
        Self::V4(value)
    }
}

impl From<[u8; 16]> for Address {
    fn from(value: [u8; 16]) -> Self {
        Self::V6(value)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(value: Ipv4Addr) -> Self {
        Self::V4(value.octets())
    }
}

impl From<Ipv6Addr> for Address {
    fn from(value: Ipv6Addr) -> Self {
        Self::V6(value.octets())
    }
}

impl From<IpAddr> for Address {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(addr) => addr.into(),
            IpAddr::V6(addr) => addr.into(),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(value: Address) -> Self {
        match value {
            Address::V4(bytes) => IpAddr::V4(bytes.into()),
            Address::V6(bytes) => IpAddr::V6(bytes.into()),
        }
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use serde::de::{value::StrDeserializer, IntoDeserializer};
    use test_utils::param_test;

    use super::*;

    const MAPPED_LOOPBACK: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 255, 255, 127, 1, 2, 3];

    param_test! {
        displays_address: [
            ipv4: (Address::V4([192, 168, 1, 0]), "192.168.1.0"),
            ipv4_zero: (Address::V4([0, 0, 0, 0]), "0.0.0.0"),
            ipv6_padded: (
                Address::V6([0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
                "2001:0db8:0000:0000:0000:0000:0000:0000"
            ),
            ipv6_mapped: (Address::V6(MAPPED_LOOPBACK), "0000:0000:0000:0000:0000:ffff:7f01:0203"),
        ]
    }
    fn displays_address(address: Address, expected: &str) {
        assert_eq!(address.to_string(), expected);
    }

    param_test! {
        display_reparses_to_same_address: [
            ipv4: (Address::V4([10, 20, 30, 40])),
            ipv6: (Address::V6([0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0xab, 0xcd, 0, 0, 0, 0, 0, 1])),
            mapped: (Address::V6(MAPPED_LOOPBACK)),
        ]
    }
    fn display_reparses_to_same_address(address: Address) {
        assert_eq!(address.to_string().parse(), Ok(address));
    }

    param_test! {
        from_str_reports_family: [
            bad_ipv4: ("127.0.0.256", AddressKind::Ipv4),
            bad_ipv6: ("2001::0:2001::68", AddressKind::Ipv6),
            neither: ("abc", AddressKind::Ip),
            empty: ("", AddressKind::Ip),
        ]
    }
    fn from_str_reports_family(input: &str, kind: AddressKind) {
        assert_eq!(Address::from_str(input), Err(AddressParseError(kind)));
    }

    #[test]
    fn extracts_mapped_ipv4() {
        assert_eq!(
            extract_ipv4(&Address::V6(MAPPED_LOOPBACK)),
            Ok(Address::V4([127, 1, 2, 3]))
        );
    }

    #[test]
    fn rejects_extracting_from_unmapped() {
        let mut bytes = MAPPED_LOOPBACK;
        bytes[11] = 254;
        assert_eq!(extract_ipv4(&Address::V6(bytes)), Err(NotIpv4Mapped));
        assert_eq!(extract_ipv4(&Address::V4([127, 1, 2, 3])), Err(NotIpv4Mapped));
    }

    #[test]
    fn maps_ipv4_into_ipv6() {
        let mapped = Address::V4([127, 1, 2, 3]).to_ipv6_mapped();
        assert_eq!(mapped, Address::V6(MAPPED_LOOPBACK));
        assert!(is_ipv4_mapped_ipv6(&mapped));
        assert_eq!(mapped.to_ipv4(), Ok(Address::V4([127, 1, 2, 3])));
    }

    #[test]
    fn converts_with_std_types() {
        let v4 = Ipv4Addr::new(192, 0, 2, 1);
        assert_eq!(Address::from(v4), Address::V4([192, 0, 2, 1]));
        assert_eq!(IpAddr::from(Address::from(v4)), IpAddr::V4(v4));

        let v6 = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1);
        assert_eq!(
            Address::from(IpAddr::V6(v6)).as_bytes(),
            &[0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn deserializes_from_string() {
        let deserializer: StrDeserializer<serde::de::value::Error> =
            "::ffff:127.1.2.3".into_deserializer();
        assert_eq!(
            Address::deserialize(deserializer),
            Ok(Address::V6(MAPPED_LOOPBACK))
        );
    }

    #[test]
    fn rejects_invalid_string_when_deserializing() {
        let deserializer: StrDeserializer<serde::de::value::Error> =
            "127.0.0.1.".into_deserializer();
        assert!(Address::deserialize(deserializer).is_err());
    }
}
