use std::fmt::Display;

/// An error which can be returned when parsing an IPv4 or IPv6 address from text.
#[derive(Eq, PartialEq, Clone, Debug, thiserror::Error)]
pub struct AddressParseError(pub(crate) AddressKind);

impl Display for AddressParseError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self.0 {
            AddressKind::Ipv4 => "invalid IPv4 address syntax",
            AddressKind::Ipv6 => "invalid IPv6 address syntax",
            AddressKind::Ip => "invalid IP address syntax",
        };

        fmt.write_str(description)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressKind {
    Ipv4,
    Ipv6,
    Ip,
}

impl From<AddressKind> for AddressParseError {
    fn from(value: AddressKind) -> Self {
        Self(value)
    }
}

/// Raised when extracting an IPv4 address from an IPv6 address that does not carry the
/// `::ffff:0:0/96` prefix.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone, Copy, Default)]
#[error("not an IPv4-mapped IPv6 address")]
pub struct NotIpv4Mapped;
