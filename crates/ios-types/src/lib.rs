//! Value types shared by the IOS reconciliation crates.
//!
//! - [`Ipv4Cidr`]: an IPv4 address with a prefix length (`10.0.0.1/24`)
//! - [`cidr_to_mask`], [`mask_to_cidr`], [`mask_to_wildcard`],
//!   [`wildcard_to_cidr`]: conversions between prefix lengths, dotted
//!   subnet masks and their wildcard complements
//! - [`VlanId`]: IEEE 802.1Q VLAN identifier
//! - [`VlanList`]: ordered VLAN list as written in trunk allowed-VLAN
//!   statements (`10,20,30-32`)

mod ip;
mod vlan;

pub use ip::{
    cidr_to_mask, mask_to_cidr, mask_to_wildcard, parse_mask, parse_wildcard, wildcard_to_cidr,
    wildcard_to_mask, Ipv4Cidr,
};
pub use vlan::{VlanId, VlanList};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IPv4 address: {0}")]
    InvalidIpAddress(String),

    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("invalid prefix length: {0} (must be 0-32)")]
    InvalidPrefixLength(u8),

    #[error("invalid subnet mask: {0}")]
    InvalidMask(String),

    #[error("invalid wildcard mask: {0}")]
    InvalidWildcard(String),

    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),

    #[error("invalid VLAN list: {0}")]
    InvalidVlanList(String),
}
