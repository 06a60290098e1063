//! [`ConfigEntity`] to configuration-mode command text.
//!
//! `render_entity` creates an entity from nothing; `diff_entities` emits only
//! the statements that move `old` to `new` and returns an empty string when
//! the two are equal. Sub-mode statements are indented one space and every
//! block ends with a `!` line, as in running-config output.

use crate::error::{CodecError, CodecResult};
use crate::model::{
    BpduGuard, ConfigEntity, EigrpNetwork, EigrpProcess, Interface, InterfaceIp, StaticRoute,
    SwitchportMode, Vlan,
};

/// Renders the command text that creates `entity` on a device without it.
pub fn render_entity(entity: &ConfigEntity) -> String {
    match entity {
        ConfigEntity::Vlan(vlan) => {
            let mut stmts = Vec::new();
            if !vlan.name.is_empty() {
                stmts.push(format!("name {}", vlan.name));
            }
            block(&vlan_header(vlan), &stmts)
        }
        ConfigEntity::Interface(iface) => {
            let mut stmts = interface_transition(&Interface::new(&iface.name), iface);
            if !iface.shutdown {
                stmts.push("no shutdown".to_string());
            }
            block(&interface_header(iface), &stmts)
        }
        ConfigEntity::StaticRoute(route) => format!("{}\n", route_statement(route)),
        ConfigEntity::Eigrp(process) => {
            let stmts: Vec<String> = process.networks.iter().map(network_statement).collect();
            block(&eigrp_header(process), &stmts)
        }
    }
}

/// Renders the minimal command text transitioning `old` into `new`.
///
/// # Errors
///
/// Returns [`CodecError::KindMismatch`] if the two entities are of
/// different kinds.
pub fn diff_entities(old: &ConfigEntity, new: &ConfigEntity) -> CodecResult<String> {
    let text = match (old, new) {
        (ConfigEntity::Vlan(old), ConfigEntity::Vlan(new)) => {
            let mut stmts = Vec::new();
            if old.name != new.name {
                stmts.push(if new.name.is_empty() {
                    "no name".to_string()
                } else {
                    format!("name {}", new.name)
                });
            }
            changed_block(&vlan_header(new), &stmts)
        }
        (ConfigEntity::Interface(old), ConfigEntity::Interface(new)) => {
            let stmts = interface_transition(old, new);
            changed_block(&interface_header(new), &stmts)
        }
        (ConfigEntity::StaticRoute(old), ConfigEntity::StaticRoute(new)) => {
            if old == new {
                String::new()
            } else {
                format!(
                    "no {}\n{}\n",
                    route_statement(old),
                    route_statement(new)
                )
            }
        }
        (ConfigEntity::Eigrp(old), ConfigEntity::Eigrp(new)) => {
            let mut stmts: Vec<String> = old
                .networks
                .iter()
                .filter(|n| !new.networks.contains(n))
                .map(|n| format!("no {}", network_statement(n)))
                .collect();
            stmts.extend(
                new.networks
                    .iter()
                    .filter(|n| !old.networks.contains(n))
                    .map(network_statement),
            );
            changed_block(&eigrp_header(new), &stmts)
        }
        _ => {
            return Err(CodecError::KindMismatch {
                old: old.kind(),
                new: new.kind(),
            })
        }
    };
    Ok(text)
}

fn vlan_header(vlan: &Vlan) -> String {
    format!("vlan {}", vlan.id)
}

fn interface_header(iface: &Interface) -> String {
    format!("interface {}", iface.name)
}

fn eigrp_header(process: &EigrpProcess) -> String {
    format!("router eigrp {}", process.asn)
}

fn route_statement(route: &StaticRoute) -> String {
    format!("ip route {} {} {}", route.prefix, route.mask, route.next_hop)
}

fn network_statement(network: &EigrpNetwork) -> String {
    format!("network {} {}", network.address, network.wildcard)
}

fn ip_statement(ip: &InterfaceIp, secondary: bool) -> String {
    if secondary {
        format!("ip address {} {} secondary", ip.address, ip.mask)
    } else {
        format!("ip address {} {}", ip.address, ip.mask)
    }
}

fn block(header: &str, stmts: &[String]) -> String {
    let mut out = String::with_capacity(header.len() + 2 + stmts.len() * 32);
    out.push_str(header);
    out.push('\n');
    for stmt in stmts {
        out.push(' ');
        out.push_str(stmt);
        out.push('\n');
    }
    out.push_str("!\n");
    out
}

fn changed_block(header: &str, stmts: &[String]) -> String {
    if stmts.is_empty() {
        String::new()
    } else {
        block(header, stmts)
    }
}

/// Interface sub-mode statements moving `old` to `new`, in the order the
/// device needs them: mode before addressing, admin state last.
fn interface_transition(old: &Interface, new: &Interface) -> Vec<String> {
    let mut stmts = Vec::new();

    if old.description != new.description {
        stmts.push(if new.description.is_empty() {
            "no description".to_string()
        } else {
            format!("description {}", new.description)
        });
    }

    switchport_transition(&old.switchport, &new.switchport, &mut stmts);
    ip_transition(&old.ips, &new.ips, &mut stmts);

    for helper in old
        .helper_addresses
        .iter()
        .filter(|h| !new.helper_addresses.contains(h))
    {
        stmts.push(format!("no ip helper-address {}", helper));
    }
    for helper in new
        .helper_addresses
        .iter()
        .filter(|h| !old.helper_addresses.contains(h))
    {
        stmts.push(format!("ip helper-address {}", helper));
    }

    if old.stp_portfast != new.stp_portfast {
        stmts.push(match new.stp_portfast.as_str() {
            "" => "no spanning-tree portfast".to_string(),
            "enable" => "spanning-tree portfast".to_string(),
            other => format!("spanning-tree portfast {}", other),
        });
    }

    if old.stp_bpdu_guard != new.stp_bpdu_guard {
        stmts.push(match new.stp_bpdu_guard {
            BpduGuard::Default => "no spanning-tree bpduguard".to_string(),
            guard => format!("spanning-tree bpduguard {}", guard.as_str()),
        });
    }

    if old.shutdown != new.shutdown {
        let stmt = if new.shutdown { "shutdown" } else { "no shutdown" };
        stmts.push(stmt.to_string());
    }

    stmts
}

fn switchport_transition(old: &SwitchportMode, new: &SwitchportMode, stmts: &mut Vec<String>) {
    if old == new {
        return;
    }

    match (old, new) {
        (_, SwitchportMode::Routed) => stmts.push("no switchport".to_string()),

        (SwitchportMode::Access { .. }, SwitchportMode::Access { vlan }) => {
            stmts.push(format!("switchport access vlan {}", vlan));
        }

        (_, SwitchportMode::Access { vlan }) => {
            match old {
                SwitchportMode::Routed => stmts.push("switchport".to_string()),
                SwitchportMode::Trunk {
                    encapsulation,
                    allowed_vlans,
                } => {
                    if !allowed_vlans.is_empty() {
                        stmts.push("no switchport trunk allowed vlan".to_string());
                    }
                    if !encapsulation.is_empty() {
                        stmts.push("no switchport trunk encapsulation".to_string());
                    }
                }
                SwitchportMode::Access { .. } => {}
            }
            stmts.push("switchport mode access".to_string());
            stmts.push(format!("switchport access vlan {}", vlan));
        }

        (
            SwitchportMode::Trunk {
                encapsulation: old_encap,
                allowed_vlans: old_allowed,
            },
            SwitchportMode::Trunk {
                encapsulation,
                allowed_vlans,
            },
        ) => {
            if old_encap != encapsulation {
                stmts.push(if encapsulation.is_empty() {
                    "no switchport trunk encapsulation".to_string()
                } else {
                    format!("switchport trunk encapsulation {}", encapsulation)
                });
            }
            if old_allowed != allowed_vlans {
                stmts.push(if allowed_vlans.is_empty() {
                    "no switchport trunk allowed vlan".to_string()
                } else {
                    format!("switchport trunk allowed vlan {}", allowed_vlans)
                });
            }
        }

        (
            _,
            SwitchportMode::Trunk {
                encapsulation,
                allowed_vlans,
            },
        ) => {
            match old {
                SwitchportMode::Routed => stmts.push("switchport".to_string()),
                SwitchportMode::Access { vlan } if !vlan.is_default() => {
                    stmts.push("no switchport access vlan".to_string());
                }
                _ => {}
            }
            // encapsulation must precede mode trunk on platforms that support ISL
            if !encapsulation.is_empty() {
                stmts.push(format!("switchport trunk encapsulation {}", encapsulation));
            }
            stmts.push("switchport mode trunk".to_string());
            if !allowed_vlans.is_empty() {
                stmts.push(format!("switchport trunk allowed vlan {}", allowed_vlans));
            }
        }
    }
}

fn ip_transition(old: &[InterfaceIp], new: &[InterfaceIp], stmts: &mut Vec<String>) {
    if old == new {
        return;
    }

    let Some((new_primary, new_secondaries)) = new.split_first() else {
        stmts.push("no ip address".to_string());
        return;
    };
    let (old_primary, old_secondaries) = match old.split_first() {
        Some((primary, rest)) => (Some(primary), rest),
        None => (None, &[][..]),
    };

    for ip in old_secondaries.iter().filter(|ip| !new_secondaries.contains(ip)) {
        stmts.push(format!("no {}", ip_statement(ip, true)));
    }
    if old_primary != Some(new_primary) {
        stmts.push(ip_statement(new_primary, false));
    }
    for ip in new_secondaries.iter().filter(|ip| !old_secondaries.contains(ip)) {
        stmts.push(ip_statement(ip, true));
    }
}
