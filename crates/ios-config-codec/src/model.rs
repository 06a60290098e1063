//! Structured snapshot of a device's running configuration.
//!
//! Every field is two-valued: absence of a feature is a default value
//! (empty string, empty list, [`BpduGuard::Default`]), never an `Option`.

use ios_types::{VlanId, VlanList};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// The parsed running configuration, in device order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningConfig {
    pub vlans: Vec<Vlan>,
    pub interfaces: Vec<Interface>,
    pub static_routes: Vec<StaticRoute>,
    pub eigrp: Vec<EigrpProcess>,
}

/// A `vlan <id>` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: VlanId,
    /// Empty when the device shows no `name` statement.
    pub name: String,
}

impl Vlan {
    pub fn new(id: VlanId) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }
}

/// Layer-2 mode of an interface. Exactly one mode holds at a time, so the
/// access VLAN and the trunk settings can never both be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SwitchportMode {
    /// Not a switchport (routed port or router interface).
    #[default]
    Routed,
    /// `switchport mode access`
    Access { vlan: VlanId },
    /// `switchport mode trunk`
    Trunk {
        /// Empty when no `switchport trunk encapsulation` line is present.
        encapsulation: String,
        /// Empty means the device default (all VLANs allowed).
        allowed_vlans: VlanList,
    },
}

impl SwitchportMode {
    pub fn is_switchport(&self) -> bool {
        !matches!(self, SwitchportMode::Routed)
    }
}

/// `spanning-tree bpduguard` setting as the device writes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BpduGuard {
    /// No bpduguard statement; the global default applies.
    #[default]
    Default,
    Enable,
    Disable,
}

impl BpduGuard {
    /// Returns the device's textual form: `""`, `"enable"` or `"disable"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BpduGuard::Default => "",
            BpduGuard::Enable => "enable",
            BpduGuard::Disable => "disable",
        }
    }

    /// Parses the device's textual form. Unknown words map to `None`.
    pub fn from_device(s: &str) -> Option<Self> {
        match s {
            "" => Some(BpduGuard::Default),
            "enable" => Some(BpduGuard::Enable),
            "disable" => Some(BpduGuard::Disable),
            _ => None,
        }
    }
}

/// One `ip address <addr> <mask> [secondary]` statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceIp {
    pub address: Ipv4Addr,
    pub mask: Ipv4Addr,
}

/// An `interface <name>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    pub description: String,
    pub shutdown: bool,
    pub switchport: SwitchportMode,
    /// Primary address first, then secondaries in device order.
    pub ips: Vec<InterfaceIp>,
    pub helper_addresses: Vec<String>,
    /// Argument of `spanning-tree portfast`; `"enable"` for the bare form,
    /// empty when absent.
    pub stp_portfast: String,
    pub stp_bpdu_guard: BpduGuard,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A global `ip route <prefix> <mask> <next-hop>` statement.
///
/// Prefix and mask are kept verbatim: routes are identified by string
/// equality, not by normalized address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRoute {
    pub prefix: String,
    pub mask: String,
    pub next_hop: String,
}

/// One `network <address> <wildcard>` statement inside `router eigrp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EigrpNetwork {
    pub address: Ipv4Addr,
    pub wildcard: Ipv4Addr,
}

/// A `router eigrp <asn>` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EigrpProcess {
    pub asn: u32,
    pub networks: Vec<EigrpNetwork>,
}

/// One entity of any kind, as handed to `marshal` and `diff`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigEntity {
    Vlan(Vlan),
    Interface(Interface),
    StaticRoute(StaticRoute),
    Eigrp(EigrpProcess),
}

impl ConfigEntity {
    /// Short kind name used in logs and errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            ConfigEntity::Vlan(_) => "vlan",
            ConfigEntity::Interface(_) => "interface",
            ConfigEntity::StaticRoute(_) => "static-route",
            ConfigEntity::Eigrp(_) => "eigrp",
        }
    }
}

impl From<Vlan> for ConfigEntity {
    fn from(vlan: Vlan) -> Self {
        ConfigEntity::Vlan(vlan)
    }
}

impl From<Interface> for ConfigEntity {
    fn from(iface: Interface) -> Self {
        ConfigEntity::Interface(iface)
    }
}

impl From<StaticRoute> for ConfigEntity {
    fn from(route: StaticRoute) -> Self {
        ConfigEntity::StaticRoute(route)
    }
}

impl From<EigrpProcess> for ConfigEntity {
    fn from(process: EigrpProcess) -> Self {
        ConfigEntity::Eigrp(process)
    }
}
