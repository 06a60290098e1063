//! IPv4 CIDR, dotted mask and wildcard mask conversions.
//!
//! IOS writes interface addresses as `address mask` and EIGRP/ACL networks
//! as `network wildcard`; humans write both as CIDR. A prefix length in
//! 0..=32 maps to exactly one contiguous dotted mask, and the wildcard is
//! that mask with every bit inverted.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Returns the dotted subnet mask for a prefix length.
///
/// # Errors
///
/// Returns [`ParseError::InvalidPrefixLength`] if `prefix_len > 32`.
///
/// ```
/// use ios_types::cidr_to_mask;
/// use std::net::Ipv4Addr;
///
/// assert_eq!(cidr_to_mask(24).unwrap(), Ipv4Addr::new(255, 255, 255, 0));
/// assert_eq!(cidr_to_mask(0).unwrap(), Ipv4Addr::UNSPECIFIED);
/// ```
pub fn cidr_to_mask(prefix_len: u8) -> Result<Ipv4Addr, ParseError> {
    if prefix_len > 32 {
        return Err(ParseError::InvalidPrefixLength(prefix_len));
    }
    let bits = u32::MAX
        .checked_shl(32 - u32::from(prefix_len))
        .unwrap_or(0);
    Ok(Ipv4Addr::from(bits))
}

/// Returns the prefix length of a dotted subnet mask.
///
/// # Errors
///
/// Returns [`ParseError::InvalidMask`] if the mask bits are not contiguous
/// (e.g. `255.0.255.0`).
pub fn mask_to_cidr(mask: Ipv4Addr) -> Result<u8, ParseError> {
    let bits = u32::from(mask);
    let ones = bits.leading_ones();
    if ones + bits.trailing_zeros() < 32 {
        return Err(ParseError::InvalidMask(mask.to_string()));
    }
    // leading_ones() is at most 32
    Ok(ones as u8)
}

/// Inverts every bit of a subnet mask, giving the wildcard mask.
pub fn mask_to_wildcard(mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(!u32::from(mask))
}

/// Inverts every bit of a wildcard mask, giving the subnet mask.
pub fn wildcard_to_mask(wildcard: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(!u32::from(wildcard))
}

/// Returns the prefix length described by a wildcard mask.
///
/// # Errors
///
/// Returns [`ParseError::InvalidWildcard`] if the wildcard does not invert
/// to a contiguous mask.
pub fn wildcard_to_cidr(wildcard: Ipv4Addr) -> Result<u8, ParseError> {
    mask_to_cidr(wildcard_to_mask(wildcard))
        .map_err(|_| ParseError::InvalidWildcard(wildcard.to_string()))
}

/// Parses a dotted subnet mask string, checking that it is contiguous.
pub fn parse_mask(s: &str) -> Result<Ipv4Addr, ParseError> {
    let mask: Ipv4Addr = s
        .parse()
        .map_err(|_| ParseError::InvalidMask(s.to_string()))?;
    mask_to_cidr(mask)?;
    Ok(mask)
}

/// Parses a dotted wildcard mask string, checking that it is contiguous.
pub fn parse_wildcard(s: &str) -> Result<Ipv4Addr, ParseError> {
    let wildcard: Ipv4Addr = s
        .parse()
        .map_err(|_| ParseError::InvalidWildcard(s.to_string()))?;
    wildcard_to_cidr(wildcard)?;
    Ok(wildcard)
}

/// An IPv4 address together with a prefix length, written `a.b.c.d/n`.
///
/// The address keeps its host bits: `10.0.0.1/24` is an interface address,
/// and [`Ipv4Cidr::network`] gives `10.0.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Cidr {
    address: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Cidr {
    /// Creates a new CIDR value.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length exceeds 32.
    pub fn new(address: Ipv4Addr, prefix_len: u8) -> Result<Self, ParseError> {
        if prefix_len > 32 {
            return Err(ParseError::InvalidPrefixLength(prefix_len));
        }
        Ok(Ipv4Cidr {
            address,
            prefix_len,
        })
    }

    /// Builds a CIDR value from the device's `address mask` form.
    pub fn from_mask(address: Ipv4Addr, mask: Ipv4Addr) -> Result<Self, ParseError> {
        Ipv4Cidr::new(address, mask_to_cidr(mask)?)
    }

    /// Builds a CIDR value from the device's `network wildcard` form.
    pub fn from_wildcard(address: Ipv4Addr, wildcard: Ipv4Addr) -> Result<Self, ParseError> {
        Ipv4Cidr::new(address, wildcard_to_cidr(wildcard)?)
    }

    /// Returns the address as written, host bits included.
    pub const fn address(&self) -> Ipv4Addr {
        self.address
    }

    /// Returns the prefix length in bits.
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns the dotted subnet mask.
    pub fn mask(&self) -> Ipv4Addr {
        // prefix_len is validated on construction
        Ipv4Addr::from(
            u32::MAX
                .checked_shl(32 - u32::from(self.prefix_len))
                .unwrap_or(0),
        )
    }

    /// Returns the wildcard mask (bitwise complement of the subnet mask).
    pub fn wildcard(&self) -> Ipv4Addr {
        mask_to_wildcard(self.mask())
    }

    /// Returns the network address (host bits cleared).
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) & u32::from(self.mask()))
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = s
            .split_once('/')
            .ok_or_else(|| ParseError::InvalidCidr(s.to_string()))?;

        let address: Ipv4Addr = addr_str
            .parse()
            .map_err(|_| ParseError::InvalidCidr(s.to_string()))?;
        let prefix_len: u8 = len_str
            .parse()
            .map_err(|_| ParseError::InvalidCidr(s.to_string()))?;

        Ipv4Cidr::new(address, prefix_len)
    }
}

impl TryFrom<String> for Ipv4Cidr {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Ipv4Cidr> for String {
    fn from(cidr: Ipv4Cidr) -> String {
        cidr.to_string()
    }
}
