//! # Address Records
//!
//! A scan campaign works on fixed-width 128-bit addresses. [`AddressRecord`]
//! wraps the raw network-order bytes; ordering, hashing and equality all
//! operate on those bytes.
//!
//! Textual forms accepted by [`AddressRecord::from_str`]:
//! * Standard IPv6 notation (e.g. `2001:db8::1`).
//! * 32 bare hex digits (e.g. `20010db8000000000000000000000001`).

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use thiserror::Error;

/// Ordered list of addresses as read from, or written to, an address file.
pub type AddressList = Vec<AddressRecord>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AddressRecord([u8; AddressRecord::LEN]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a 128-bit address: '{input}'")]
pub struct AddressParseError {
    pub input: String,
}

impl AddressRecord {
    /// Width of one record in bytes, also the record size of binary files.
    pub const LEN: usize = 16;

    pub const fn new(octets: [u8; Self::LEN]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; Self::LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Builds a record from a slice that must be exactly [`Self::LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; Self::LEN] = bytes.try_into().ok()?;
        Some(Self(octets))
    }

    pub const fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl From<u128> for AddressRecord {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<Ipv6Addr> for AddressRecord {
    fn from(addr: Ipv6Addr) -> Self {
        Self(addr.octets())
    }
}

impl From<AddressRecord> for Ipv6Addr {
    fn from(record: AddressRecord) -> Self {
        Ipv6Addr::from(record.0)
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ipv6Addr::from(*self).fmt(f)
    }
}

impl FromStr for AddressRecord {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(record) = parse_bare_hex(trimmed) {
            return Ok(record);
        }

        trimmed
            .parse::<Ipv6Addr>()
            .map(AddressRecord::from)
            .map_err(|_| AddressParseError {
                input: trimmed.to_string(),
            })
    }
}

fn parse_bare_hex(s: &str) -> Option<AddressRecord> {
    if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u128::from_str_radix(s, 16).ok().map(AddressRecord::from)
}
