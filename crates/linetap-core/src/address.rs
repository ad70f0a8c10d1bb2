//! # Address Validation
//!
//! Validates the address typed into the connect form.
//!
//! The accepted form is a dotted quad: four octets of one to three ASCII
//! digits, each at most 255. Leading zeros are accepted ("010" is 10), which
//! `Ipv4Addr::from_str` would refuse, so octets are parsed by hand.

use crate::primitives::{IPV4_OCTETS, MAX_OCTET_DIGITS};
use std::net::Ipv4Addr;
use thiserror::Error;

/// Why an address was rejected. The messages are shown as status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Nothing left after trimming whitespace.
    #[error("Please enter an IP address")]
    Empty,

    /// Not a dotted quad of octets in 0..=255.
    #[error("Invalid IP format")]
    InvalidFormat,
}

/// Validate a user-entered IPv4 address.
///
/// Surrounding whitespace is ignored.
pub fn validate_ipv4(input: &str) -> Result<Ipv4Addr, AddressError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AddressError::Empty);
    }

    let mut octets = [0u8; IPV4_OCTETS];
    let mut count = 0;

    for part in trimmed.split('.') {
        if count == IPV4_OCTETS {
            return Err(AddressError::InvalidFormat);
        }
        octets[count] = parse_octet(part)?;
        count += 1;
    }

    if count != IPV4_OCTETS {
        return Err(AddressError::InvalidFormat);
    }

    Ok(Ipv4Addr::from(octets))
}

fn parse_octet(part: &str) -> Result<u8, AddressError> {
    if part.is_empty()
        || part.len() > MAX_OCTET_DIGITS
        || !part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AddressError::InvalidFormat);
    }
    // At most three digits, so u16 cannot overflow.
    let value = part
        .bytes()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    u8::try_from(value).map_err(|_| AddressError::InvalidFormat)
}
