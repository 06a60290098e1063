//! Ethernet (routed) interface kind: layer-3 `interface` blocks keyed by
//! interface name.
//!
//! The desired record always resolves to a routed port. Addresses are CIDR
//! strings with the host part kept (`10.0.0.1/24` becomes
//! `ip address 10.0.0.1 255.255.255.0`); the first one is the primary.
//! Spanning-tree settings belong to the switch interface kind and are left
//! as found.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, Resource, Tristate};
use ios_config_codec::{Interface, InterfaceIp, RunningConfig, SwitchportMode};
use ios_types::ParseError;

use crate::address::{cidr_from_mask, parse_cidr};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EthernetInterfaceDesired {
    /// Device interface name, matched exactly (`GigabitEthernet0/1`).
    pub name: String,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub description: Tristate<String>,
    #[serde(default)]
    pub shutdown: bool,
    #[serde(default)]
    pub ips: Vec<String>,
    #[serde(default)]
    pub helper_addresses: Vec<String>,
}

impl EthernetInterfaceDesired {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Tristate::Unset,
            shutdown: false,
            ips: Vec::new(),
            helper_addresses: Vec::new(),
        }
    }
}

/// Rejects interface names that would not survive as one command word.
pub(crate) fn interface_name(name: &str) -> CfgMgrResult<()> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CfgMgrError::invalid_config(
            "name",
            format!("expected a single interface name, got {:?}", name),
        ));
    }
    Ok(())
}

/// Resolves the description against the device's current one and checks it
/// for characters that would break the command line.
pub(crate) fn description_line(
    description: &Tristate<String>,
    prior: Option<&Interface>,
) -> CfgMgrResult<String> {
    let description = description
        .clone()
        .or_prior(prior.map(|p| p.description.clone()));
    if description.chars().any(char::is_control) {
        return Err(CfgMgrError::invalid_config(
            "description",
            "must not contain control characters",
        ));
    }
    Ok(description.trim().to_string())
}

pub(crate) fn interface_teardown(name: &str) -> String {
    format!("default interface {}", name)
}

pub struct EthernetInterfaceResource;

impl Resource for EthernetInterfaceResource {
    const KIND: &'static str = "ethernet-interface";
    type Key = String;
    type Desired = EthernetInterfaceDesired;
    type Record = Interface;

    fn key(desired: &EthernetInterfaceDesired) -> String {
        desired.name.clone()
    }

    fn records(config: &RunningConfig) -> &[Interface] {
        &config.interfaces
    }

    fn matches(record: &Interface, key: &String) -> bool {
        record.name == *key
    }

    fn check_key(key: &String) -> CfgMgrResult<()> {
        interface_name(key)
    }

    fn to_snapshot(
        desired: &EthernetInterfaceDesired,
        prior: Option<&Interface>,
    ) -> CfgMgrResult<Interface> {
        interface_name(&desired.name)?;
        let ips = desired
            .ips
            .iter()
            .map(|ip| -> CfgMgrResult<InterfaceIp> {
                let cidr = parse_cidr(ip)?;
                Ok(InterfaceIp {
                    address: cidr.address(),
                    mask: cidr.mask(),
                })
            })
            .collect::<CfgMgrResult<Vec<_>>>()?;

        for helper in &desired.helper_addresses {
            helper
                .parse::<Ipv4Addr>()
                .map_err(|_| ParseError::InvalidIpAddress(helper.clone()))?;
        }

        let base = prior.cloned().unwrap_or_default();
        Ok(Interface {
            name: desired.name.clone(),
            description: description_line(&desired.description, prior)?,
            shutdown: desired.shutdown,
            switchport: SwitchportMode::Routed,
            ips,
            helper_addresses: desired.helper_addresses.clone(),
            ..base
        })
    }

    fn from_snapshot(record: &Interface) -> EthernetInterfaceDesired {
        EthernetInterfaceDesired {
            name: record.name.clone(),
            description: Tristate::from_device(record.description.clone()),
            shutdown: record.shutdown,
            ips: record
                .ips
                .iter()
                .map(|ip| cidr_from_mask(ip.address, ip.mask))
                .collect(),
            helper_addresses: record.helper_addresses.clone(),
        }
    }

    fn teardown(key: &String) -> String {
        interface_teardown(key)
    }
}
