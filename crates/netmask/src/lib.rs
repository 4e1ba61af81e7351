//! Parsing, masking, and containment checks for IPv4 and IPv6 addresses and CIDR blocks.
//!
//! Addresses are plain fixed-width byte values ([`Address`]); masks share the same shape. A
//! network block is the pair of the two ([`IpNet`]), and [`Network`] wraps it with parsing from
//! and rendering to `"<address>/<prefix>"` text.
//!
//! # Examples
//!
//! ```
//! # use netmask::{cidr_contains, Network};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let net: Network = "172.16.0.0/12".parse()?;
//! assert!(net.contains("172.16.1.1")?);
//! assert!(!net.contains("2001:db8::1")?);
//!
//! assert!(cidr_contains("2001:db8::/32", "2001:db8:1:2::1")?);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub use address::{
    extract_ipv4,
    is_ipv4_mapped_ipv6,
    parse_address,
    parse_ipv4,
    parse_ipv6,
    Address,
    AddressParseError,
    NotIpv4Mapped,
};

pub mod mask;
pub use mask::{apply_mask, cidr_mask, simple_mask_length, Mask, MaskError, NON_PREFIX_MASK};

pub mod cidr;
pub use cidr::{contains_ip, parse_cidr, CidrParseError, IpNet};

pub mod network;
pub use network::{cidr_contains, MaskSpec, Network, NetworkError};

pub(crate) mod utils;
