//! IPv4 and IPv6 addresses as fixed-width byte values, and their textual parsers.

mod ip;
pub use ip::{extract_ipv4, is_ipv4_mapped_ipv6, Address, IPV4_MAPPED_PREFIX};

mod parse;
pub use parse::{parse_address, parse_ipv4, parse_ipv6};

mod error;
pub use error::{AddressParseError, NotIpv4Mapped};
