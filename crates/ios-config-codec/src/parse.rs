//! Running-config text to [`RunningConfig`].
//!
//! Top-level statements open a block; indented lines belong to the block
//! above them and a `!` line closes it. Only the statements the entity
//! kinds need are understood, everything else is skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Display;
use std::net::Ipv4Addr;
use std::ops::Range;
use tracing::trace;

use ios_types::{parse_mask, parse_wildcard, VlanId, VlanList};

use crate::error::{CodecError, CodecResult};
use crate::model::{
    BpduGuard, EigrpNetwork, EigrpProcess, Interface, InterfaceIp, RunningConfig, StaticRoute,
    SwitchportMode, Vlan,
};

/// `vlan 10` or `vlan 10,20,30-32`. Excludes `vlan internal allocation ...`.
static VLAN_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^vlan\s+([0-9][0-9,\-]*)$").expect("Invalid regex pattern"));

static INTERFACE_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^interface\s+(\S+)$").expect("Invalid regex pattern"));

static EIGRP_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^router\s+eigrp\s+(\S+)$").expect("Invalid regex pattern"));

/// Layer-2 mode as declared by `switchport mode` / `no switchport`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclaredMode {
    Unspecified,
    Routed,
    Access,
    Trunk,
}

/// Collects interface statements until the block closes.
///
/// IOS writes `switchport access vlan` and `switchport trunk ...` before
/// `switchport mode`, so the mode is only resolved in [`Self::finish`].
#[derive(Debug)]
struct InterfaceBuilder {
    iface: Interface,
    mode: DeclaredMode,
    access_vlan: Option<VlanId>,
    encapsulation: String,
    allowed_vlans: VlanList,
}

impl InterfaceBuilder {
    fn new(name: &str) -> Self {
        Self {
            iface: Interface::new(name),
            mode: DeclaredMode::Unspecified,
            access_vlan: None,
            encapsulation: String::new(),
            allowed_vlans: VlanList::new(),
        }
    }

    fn finish(self) -> Interface {
        let switchport = match self.mode {
            DeclaredMode::Access => SwitchportMode::Access {
                vlan: self.access_vlan.unwrap_or(VlanId::DEFAULT),
            },
            DeclaredMode::Trunk => SwitchportMode::Trunk {
                encapsulation: self.encapsulation,
                allowed_vlans: self.allowed_vlans,
            },
            // an access VLAN without a mode line is still an access port
            DeclaredMode::Unspecified => match self.access_vlan {
                Some(vlan) => SwitchportMode::Access { vlan },
                None => SwitchportMode::Routed,
            },
            DeclaredMode::Routed => SwitchportMode::Routed,
        };
        Interface {
            switchport,
            ..self.iface
        }
    }

    fn apply(&mut self, stmt: &str, line: usize) -> CodecResult<()> {
        let tokens: Vec<&str> = stmt.split_whitespace().collect();
        let iface = &mut self.iface;

        match tokens.as_slice() {
            ["description", ..] => {
                iface.description = rest_after(stmt, "description");
            }
            ["shutdown"] => iface.shutdown = true,
            ["no", "shutdown"] => iface.shutdown = false,
            ["no", "switchport"] => self.mode = DeclaredMode::Routed,
            ["switchport", "mode", "access"] => self.mode = DeclaredMode::Access,
            ["switchport", "mode", "trunk"] => self.mode = DeclaredMode::Trunk,
            ["switchport", "access", "vlan", id] => {
                self.access_vlan = Some(value(id.parse::<VlanId>(), line)?);
            }
            ["switchport", "trunk", "encapsulation", encap] => {
                self.encapsulation = (*encap).to_string();
            }
            ["switchport", "trunk", "allowed", "vlan", "all" | "none"] => {
                self.allowed_vlans = VlanList::new();
            }
            ["switchport", "trunk", "allowed", "vlan", "add", list] => {
                let more: VlanList = value(list.parse(), line)?;
                self.allowed_vlans.extend(&more);
            }
            ["switchport", "trunk", "allowed", "vlan", list] => {
                self.allowed_vlans = value(list.parse(), line)?;
            }
            ["ip", "address", address, mask] => {
                let ip = interface_ip(address, mask, line)?;
                match iface.ips.first_mut() {
                    Some(primary) => *primary = ip,
                    None => iface.ips.push(ip),
                }
            }
            ["ip", "address", address, mask, "secondary"] => {
                let ip = interface_ip(address, mask, line)?;
                iface.ips.push(ip);
            }
            ["no", "ip", "address"] => iface.ips.clear(),
            ["ip", "helper-address", helper] => {
                iface.helper_addresses.push((*helper).to_string());
            }
            ["spanning-tree", "portfast"] => iface.stp_portfast = "enable".to_string(),
            ["spanning-tree", "portfast", rest @ ..] => iface.stp_portfast = rest.join(" "),
            ["spanning-tree", "bpduguard", setting] => {
                iface.stp_bpdu_guard = BpduGuard::from_device(setting).ok_or_else(|| {
                    CodecError::parse(line, format!("unknown bpduguard setting '{}'", setting))
                })?;
            }
            _ => trace!(line, statement = stmt, "Ignoring interface statement"),
        }
        Ok(())
    }
}

/// The block the parser is currently inside.
#[derive(Debug)]
enum Block {
    Global,
    /// Indexes into `RunningConfig::vlans` opened by one `vlan` header.
    Vlans(Range<usize>),
    Interface(InterfaceBuilder),
    Eigrp(usize),
    /// A block this codec does not model (`line vty`, `router ospf`, ...).
    Other,
}

/// Parses full running-config text.
///
/// # Errors
///
/// Returns [`CodecError::Parse`] when a known statement carries a value
/// that cannot be parsed (bad VLAN id, non-contiguous mask, ...).
pub fn parse_running_config(text: &str) -> CodecResult<RunningConfig> {
    let mut config = RunningConfig::default();
    let mut block = Block::Global;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('!') {
            close(&mut config, std::mem::replace(&mut block, Block::Global));
            continue;
        }

        if raw.starts_with(char::is_whitespace) {
            match &mut block {
                Block::Vlans(range) => {
                    for vlan in &mut config.vlans[range.clone()] {
                        apply_vlan(vlan, trimmed);
                    }
                }
                Block::Interface(builder) => builder.apply(trimmed, line)?,
                Block::Eigrp(index) => apply_eigrp(&mut config.eigrp[*index], trimmed, line)?,
                Block::Global | Block::Other => {}
            }
            continue;
        }

        close(&mut config, std::mem::replace(&mut block, Block::Global));
        block = open(&mut config, trimmed, line)?;
    }

    close(&mut config, block);
    Ok(config)
}

fn open(config: &mut RunningConfig, stmt: &str, line: usize) -> CodecResult<Block> {
    if let Some(caps) = VLAN_HEADER_RE.captures(stmt) {
        let ids: VlanList = value(caps[1].parse(), line)?;
        let start = config.vlans.len();
        config.vlans.extend(ids.ids().iter().map(|id| Vlan::new(*id)));
        return Ok(Block::Vlans(start..config.vlans.len()));
    }

    if let Some(caps) = INTERFACE_HEADER_RE.captures(stmt) {
        return Ok(Block::Interface(InterfaceBuilder::new(&caps[1])));
    }

    if let Some(caps) = EIGRP_HEADER_RE.captures(stmt) {
        let asn: u32 = value(caps[1].parse(), line)?;
        config.eigrp.push(EigrpProcess {
            asn,
            networks: Vec::new(),
        });
        return Ok(Block::Eigrp(config.eigrp.len() - 1));
    }

    let tokens: Vec<&str> = stmt.split_whitespace().collect();
    match tokens.as_slice() {
        ["ip", "route", "vrf", ..] => {
            trace!(line, "Ignoring VRF route");
            Ok(Block::Global)
        }
        ["ip", "route", prefix, mask, next_hop, ..] => {
            config.static_routes.push(StaticRoute {
                prefix: (*prefix).to_string(),
                mask: (*mask).to_string(),
                next_hop: (*next_hop).to_string(),
            });
            Ok(Block::Global)
        }
        ["ip", "route", ..] => Err(CodecError::parse(line, "incomplete ip route statement")),
        _ => Ok(Block::Other),
    }
}

fn close(config: &mut RunningConfig, block: Block) {
    if let Block::Interface(builder) = block {
        config.interfaces.push(builder.finish());
    }
}

fn apply_vlan(vlan: &mut Vlan, stmt: &str) {
    if stmt.split_whitespace().next() == Some("name") {
        vlan.name = rest_after(stmt, "name");
    }
}

fn apply_eigrp(process: &mut EigrpProcess, stmt: &str, line: usize) -> CodecResult<()> {
    let tokens: Vec<&str> = stmt.split_whitespace().collect();
    match tokens.as_slice() {
        ["network", address] => {
            let address: Ipv4Addr = value(address.parse(), line)?;
            process.networks.push(EigrpNetwork {
                address,
                wildcard: classful_wildcard(address),
            });
        }
        ["network", address, wildcard] => {
            process.networks.push(EigrpNetwork {
                address: value(address.parse(), line)?,
                wildcard: value(parse_wildcard(wildcard), line)?,
            });
        }
        _ => trace!(line, statement = stmt, "Ignoring eigrp statement"),
    }
    Ok(())
}

fn interface_ip(address: &str, mask: &str, line: usize) -> CodecResult<InterfaceIp> {
    Ok(InterfaceIp {
        address: value(address.parse(), line)?,
        mask: value(parse_mask(mask), line)?,
    })
}

/// Wildcard implied by a `network` statement without one (class A/B/C).
fn classful_wildcard(address: Ipv4Addr) -> Ipv4Addr {
    match address.octets()[0] {
        0..=127 => Ipv4Addr::new(0, 255, 255, 255),
        128..=191 => Ipv4Addr::new(0, 0, 255, 255),
        _ => Ipv4Addr::new(0, 0, 0, 255),
    }
}

fn rest_after(stmt: &str, keyword: &str) -> String {
    stmt.strip_prefix(keyword)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn value<T, E: Display>(result: Result<T, E>, line: usize) -> CodecResult<T> {
    result.map_err(|e| CodecError::parse(line, e.to_string()))
}
