//! Text parsers for IPv4 and IPv6 addresses.
//!
//! These return `None` rather than an error on malformed input, so callers can cheaply probe one
//! address family and then the other.

use super::Address;

const V4_LEN: usize = Address::V4_LEN;
const V6_LEN: usize = Address::V6_LEN;

/// Parses a dotted-decimal IPv4 address.
///
/// Exactly four components are required, each of 1-3 decimal digits with a value of at most 255
/// and no leading zero unless the component is `"0"` itself.
///
/// # Examples
///
/// ```
/// # use netmask::{parse_ipv4, Address};
/// assert_eq!(parse_ipv4("127.0.1.2"), Some(Address::V4([127, 0, 1, 2])));
/// assert_eq!(parse_ipv4("127.001.002.003"), None);
/// assert_eq!(parse_ipv4("-0.0.0.0"), None);
/// ```
pub fn parse_ipv4(s: &str) -> Option<Address> {
    parse_ipv4_octets(s).map(Address::V4)
}

/// Parses an IPv6 address as described in RFC 4291 and RFC 5952.
///
/// Supports a single `::` elision and a trailing dotted IPv4 form. Zone identifiers are not
/// supported.
///
/// # Examples
///
/// ```
/// # use netmask::parse_ipv6;
/// assert_eq!(parse_ipv6("::ffff:127.1.2.3"), parse_ipv6("::ffff:7f01:0203"));
/// assert_eq!(parse_ipv6("2001::0:2001::68"), None);
/// ```
pub fn parse_ipv6(s: &str) -> Option<Address> {
    parse_ipv6_octets(s).map(Address::V6)
}

/// Parses either an IPv4 or an IPv6 address.
///
/// The family is chosen by whichever of `.` and `:` occurs first in the text; text containing
/// neither is rejected.
pub fn parse_address(s: &str) -> Option<Address> {
    match s.bytes().find(|b| *b == b'.' || *b == b':')? {
        b'.' => parse_ipv4(s),
        _ => parse_ipv6(s),
    }
}

fn parse_ipv4_octets(s: &str) -> Option<[u8; V4_LEN]> {
    let mut octets = [0u8; V4_LEN];
    let mut parts = s.split('.');

    for octet in octets.iter_mut() {
        *octet = parse_decimal_octet(parts.next()?)?;
    }
    if parts.next().is_some() {
        return None;
    }

    Some(octets)
}

fn parse_decimal_octet(part: &str) -> Option<u8> {
    if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

fn parse_hextet(group: &str) -> Option<u16> {
    if group.is_empty() || group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(group, 16).ok()
}

fn parse_ipv6_octets(s: &str) -> Option<[u8; V6_LEN]> {
    let mut octets = [0u8; V6_LEN];
    let mut elision: Option<usize> = None;
    let mut rest = s;

    if let Some(tail) = rest.strip_prefix("::") {
        if tail.is_empty() {
            return Some(octets);
        }
        elision = Some(0);
        rest = tail;
    }

    let mut cursor = 0;
    while cursor < V6_LEN {
        let end = rest.find(|c: char| c == ':' || c == '.').unwrap_or(rest.len());
        let (group, after) = rest.split_at(end);

        if after.starts_with('.') {
            // A trailing IPv4 form fills the last four bytes, or floats before an elision.
            if elision.is_none() && cursor != V6_LEN - V4_LEN {
                return None;
            }
            if cursor + V4_LEN > V6_LEN {
                return None;
            }
            let v4 = parse_ipv4_octets(rest)?;
            octets[cursor..cursor + V4_LEN].copy_from_slice(&v4);
            cursor += V4_LEN;
            rest = "";
            break;
        }

        let hextet = parse_hextet(group)?;
        octets[cursor..cursor + 2].copy_from_slice(&hextet.to_be_bytes());
        cursor += 2;

        let Some(tail) = after.strip_prefix(':') else {
            rest = after;
            break;
        };
        if tail.is_empty() {
            return None;
        }
        rest = tail;

        if let Some(tail) = rest.strip_prefix(':') {
            if elision.is_some() {
                return None;
            }
            elision = Some(cursor);
            rest = tail;
            if rest.is_empty() {
                break;
            }
        }
    }

    if !rest.is_empty() {
        return None;
    }

    match elision {
        Some(at) if cursor < V6_LEN => {
            let gap = V6_LEN - cursor;
            octets.copy_within(at..cursor, at + gap);
            octets[at..at + gap].fill(0);
        }
        // An elision must stand for at least one zero group.
        Some(_) => return None,
        None if cursor < V6_LEN => return None,
        None => (),
    }

    Some(octets)
}
