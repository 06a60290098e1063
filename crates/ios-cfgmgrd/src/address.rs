//! CIDR conversions shared by the address-bearing kinds.

use std::net::Ipv4Addr;

use ios_types::{wildcard_to_mask, Ipv4Cidr};

use ios_cfgmgr_common::CfgMgrResult;

/// Parses a desired CIDR string, keeping the host bits (`10.0.0.1/24`).
pub fn parse_cidr(s: &str) -> CfgMgrResult<Ipv4Cidr> {
    Ok(s.trim().parse::<Ipv4Cidr>()?)
}

/// Formats a device `address mask` pair as CIDR.
pub fn cidr_from_mask(address: Ipv4Addr, mask: Ipv4Addr) -> String {
    // masks are checked for contiguity when the config is parsed
    format!("{}/{}", address, u32::from(mask).leading_ones())
}

/// Formats a device `network wildcard` pair as CIDR.
pub fn cidr_from_wildcard(address: Ipv4Addr, wildcard: Ipv4Addr) -> String {
    cidr_from_mask(address, wildcard_to_mask(wildcard))
}
