//! Switch interface kind: layer-2 `interface` blocks keyed by interface name.
//!
//! Access and trunk settings are mutually exclusive. Leaving both unset
//! keeps whatever mode the port is in (routed when it is created); a null
//! clears that mode and returns the port to routed. Addresses and helpers
//! belong to the ethernet interface kind and are left as found.
//!
//! Spanning tree settings are tri-state. An unset BPDU guard keeps the
//! device's setting (no statement on create), `true` maps to `enable` and
//! `false` or null to an explicit `disable`.

use serde::{Deserialize, Serialize};

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, Resource, Tristate};
use ios_config_codec::{BpduGuard, Interface, RunningConfig, SwitchportMode};
use ios_types::{VlanId, VlanList};

use crate::ethernet_intf::{description_line, interface_name, interface_teardown};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessSpec {
    pub vlan: VlanId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrunkSpec {
    /// `dot1q`, `isl` or `negotiate`; empty leaves the platform default.
    #[serde(default)]
    pub encapsulation: String,
    /// Empty allows every VLAN.
    #[serde(default)]
    pub allowed_vlans: Vec<VlanId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpanningTreeSpec {
    /// Portfast argument as the device writes it: `enable`, `disable`,
    /// `trunk`, `edge trunk`.
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub portfast: Tristate<String>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub bpdu_guard: Tristate<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchInterfaceDesired {
    pub name: String,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub description: Tristate<String>,
    #[serde(default)]
    pub shutdown: bool,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub access: Tristate<AccessSpec>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub trunk: Tristate<TrunkSpec>,
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub spanning_tree: Tristate<SpanningTreeSpec>,
}

impl SwitchInterfaceDesired {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Tristate::Unset,
            shutdown: false,
            access: Tristate::Unset,
            trunk: Tristate::Unset,
            spanning_tree: Tristate::Unset,
        }
    }

    pub fn access(mut self, vlan: VlanId) -> Self {
        self.access = Tristate::Value(AccessSpec { vlan });
        self
    }

    pub fn trunk(mut self, encapsulation: impl Into<String>, allowed_vlans: Vec<VlanId>) -> Self {
        self.trunk = Tristate::Value(TrunkSpec {
            encapsulation: encapsulation.into(),
            allowed_vlans,
        });
        self
    }
}

fn single_word(field: &str, value: &str) -> CfgMgrResult<()> {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CfgMgrError::invalid_config(
            field,
            format!("'{}' must be a single word", value),
        ));
    }
    Ok(())
}

fn switchport_mode(
    desired: &SwitchInterfaceDesired,
    prior: Option<&Interface>,
) -> CfgMgrResult<SwitchportMode> {
    match (desired.access.as_value(), desired.trunk.as_value()) {
        (Some(_), Some(_)) => Err(CfgMgrError::invalid_config(
            "switchport",
            "access and trunk are mutually exclusive",
        )),
        (_, Some(trunk)) => {
            single_word("trunk.encapsulation", &trunk.encapsulation)?;
            Ok(SwitchportMode::Trunk {
                encapsulation: trunk.encapsulation.clone(),
                allowed_vlans: VlanList::from(trunk.allowed_vlans.clone()),
            })
        }
        (Some(access), None) => Ok(SwitchportMode::Access { vlan: access.vlan }),
        (None, None) => {
            let current = prior.map(|p| p.switchport.clone()).unwrap_or_default();
            let cleared = match &current {
                SwitchportMode::Access { .. } => desired.access.is_null(),
                SwitchportMode::Trunk { .. } => desired.trunk.is_null(),
                SwitchportMode::Routed => false,
            };
            Ok(if cleared { SwitchportMode::Routed } else { current })
        }
    }
}

fn bpdu_guard_to_device(guard: &Tristate<bool>, prior: Option<BpduGuard>) -> BpduGuard {
    match guard {
        Tristate::Unset => prior.unwrap_or_default(),
        Tristate::Value(true) => BpduGuard::Enable,
        Tristate::Value(false) | Tristate::Null => BpduGuard::Disable,
    }
}

fn bpdu_guard_from_device(guard: BpduGuard) -> Tristate<bool> {
    match guard {
        BpduGuard::Default => Tristate::Unset,
        BpduGuard::Enable => Tristate::Value(true),
        BpduGuard::Disable => Tristate::Value(false),
    }
}

pub struct SwitchInterfaceResource;

impl Resource for SwitchInterfaceResource {
    const KIND: &'static str = "switch-interface";
    type Key = String;
    type Desired = SwitchInterfaceDesired;
    type Record = Interface;

    fn key(desired: &SwitchInterfaceDesired) -> String {
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
        desired: &SwitchInterfaceDesired,
        prior: Option<&Interface>,
    ) -> CfgMgrResult<Interface> {
        interface_name(&desired.name)?;
        let switchport = switchport_mode(desired, prior)?;

        let (stp_portfast, stp_bpdu_guard) = match &desired.spanning_tree {
            Tristate::Unset => prior
                .map(|p| (p.stp_portfast.clone(), p.stp_bpdu_guard))
                .unwrap_or_default(),
            Tristate::Null => (String::new(), BpduGuard::Default),
            Tristate::Value(stp) => {
                let portfast = stp
                    .portfast
                    .clone()
                    .or_prior(prior.map(|p| p.stp_portfast.clone()));
                if portfast.chars().any(char::is_control) {
                    return Err(CfgMgrError::invalid_config(
                        "spanning_tree.portfast",
                        "must not contain control characters",
                    ));
                }
                let guard = bpdu_guard_to_device(&stp.bpdu_guard, prior.map(|p| p.stp_bpdu_guard));
                (portfast, guard)
            }
        };

        let base = prior.cloned().unwrap_or_default();
        Ok(Interface {
            name: desired.name.clone(),
            description: description_line(&desired.description, prior)?,
            shutdown: desired.shutdown,
            switchport,
            stp_portfast,
            stp_bpdu_guard,
            ..base
        })
    }

    fn from_snapshot(record: &Interface) -> SwitchInterfaceDesired {
        let (access, trunk) = match &record.switchport {
            SwitchportMode::Routed => (Tristate::Unset, Tristate::Unset),
            SwitchportMode::Access { vlan } => {
                (Tristate::Value(AccessSpec { vlan: *vlan }), Tristate::Unset)
            }
            SwitchportMode::Trunk {
                encapsulation,
                allowed_vlans,
            } => (
                Tristate::Unset,
                Tristate::Value(TrunkSpec {
                    encapsulation: encapsulation.clone(),
                    allowed_vlans: allowed_vlans.ids().to_vec(),
                }),
            ),
        };

        let stp = SpanningTreeSpec {
            portfast: Tristate::from_device(record.stp_portfast.clone()),
            bpdu_guard: bpdu_guard_from_device(record.stp_bpdu_guard),
        };

        SwitchInterfaceDesired {
            name: record.name.clone(),
            description: Tristate::from_device(record.description.clone()),
            shutdown: record.shutdown,
            access,
            trunk,
            spanning_tree: Tristate::from_device(stp),
        }
    }

    fn teardown(key: &String) -> String {
        interface_teardown(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn vlan(id: u16) -> VlanId {
        VlanId::new(id).unwrap()
    }

    fn with_stp(portfast: Tristate<String>, bpdu_guard: Tristate<bool>) -> SwitchInterfaceDesired {
        SwitchInterfaceDesired {
            spanning_tree: Tristate::Value(SpanningTreeSpec {
                portfast,
                bpdu_guard,
            }),
            ..SwitchInterfaceDesired::new("GigabitEthernet0/2")
        }
    }

    #[test]
    fn test_access_and_trunk_exclusive() {
        let both = SwitchInterfaceDesired::new("Gi0/1")
            .access(vlan(10))
            .trunk("dot1q", vec![vlan(10)]);
        match SwitchInterfaceResource::to_snapshot(&both, None) {
            Err(CfgMgrError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "switchport")
            }
            other => panic!("expected InvalidConfiguration, got {:?}", other),
        }
    }

    #[test]
    fn test_mode_resolution() {
        let access = SwitchInterfaceDesired::new("Gi0/2").access(vlan(10));
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&access, None).unwrap().switchport,
            SwitchportMode::Access { vlan: vlan(10) }
        );

        let trunk = SwitchInterfaceDesired::new("Gi0/1").trunk("dot1q", vec![vlan(20), vlan(10)]);
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&trunk, None).unwrap().switchport,
            SwitchportMode::Trunk {
                encapsulation: "dot1q".into(),
                allowed_vlans: VlanList::from(vec![vlan(10), vlan(20)]),
            }
        );

        // null access with a trunk value is still a trunk
        let trunk_null_access = SwitchInterfaceDesired {
            access: Tristate::Null,
            ..trunk.clone()
        };
        assert!(matches!(
            SwitchInterfaceResource::to_snapshot(&trunk_null_access, None).unwrap().switchport,
            SwitchportMode::Trunk { .. }
        ));

        let neither = SwitchInterfaceDesired::new("Gi0/3");
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&neither, None).unwrap().switchport,
            SwitchportMode::Routed
        );
    }

    #[test]
    fn test_unset_mode_keeps_device_mode() {
        let prior = Interface {
            switchport: SwitchportMode::Access { vlan: vlan(10) },
            ..Interface::new("Gi0/3")
        };

        let neither = SwitchInterfaceDesired::new("Gi0/3");
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&neither, Some(&prior)).unwrap().switchport,
            prior.switchport
        );

        // nulling the other mode leaves the access port alone
        let trunk_null = SwitchInterfaceDesired {
            trunk: Tristate::Null,
            ..neither.clone()
        };
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&trunk_null, Some(&prior)).unwrap().switchport,
            prior.switchport
        );

        let access_null = SwitchInterfaceDesired {
            access: Tristate::Null,
            ..neither
        };
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&access_null, Some(&prior)).unwrap().switchport,
            SwitchportMode::Routed
        );
    }

    #[test]
    fn test_description_only_keeps_everything_else() {
        let prior = Interface {
            description: "old".into(),
            ips: vec![ios_config_codec::InterfaceIp {
                address: "10.1.1.1".parse().unwrap(),
                mask: "255.255.255.0".parse().unwrap(),
            }],
            helper_addresses: vec!["10.0.0.53".into()],
            stp_bpdu_guard: BpduGuard::Enable,
            ..Interface::new("GigabitEthernet0/1")
        };
        let desired = SwitchInterfaceDesired {
            description: Tristate::Value("new".into()),
            ..SwitchInterfaceDesired::new("GigabitEthernet0/1")
        };

        let target = SwitchInterfaceResource::to_snapshot(&desired, Some(&prior)).unwrap();

        assert_eq!(
            target,
            Interface {
                description: "new".into(),
                ..prior
            }
        );
    }

    #[test]
    fn test_spanning_tree_unset_fields_keep_device_values() {
        let prior = Interface {
            stp_portfast: "edge trunk".into(),
            stp_bpdu_guard: BpduGuard::Enable,
            ..Interface::new("Gi0/2")
        };

        let guard_only = with_stp(Tristate::Unset, Tristate::Value(false));
        let target = SwitchInterfaceResource::to_snapshot(&guard_only, Some(&prior)).unwrap();
        assert_eq!(target.stp_portfast, "edge trunk");
        assert_eq!(target.stp_bpdu_guard, BpduGuard::Disable);

        let portfast_only = with_stp(Tristate::Null, Tristate::Unset);
        let target = SwitchInterfaceResource::to_snapshot(&portfast_only, Some(&prior)).unwrap();
        assert_eq!(target.stp_portfast, "");
        assert_eq!(target.stp_bpdu_guard, BpduGuard::Enable);

        let cleared = SwitchInterfaceDesired {
            spanning_tree: Tristate::Null,
            ..SwitchInterfaceDesired::new("Gi0/2")
        };
        let target = SwitchInterfaceResource::to_snapshot(&cleared, Some(&prior)).unwrap();
        assert_eq!(target.stp_portfast, "");
        assert_eq!(target.stp_bpdu_guard, BpduGuard::Default);
    }

    #[test]
    fn test_rejects_multiline_name() {
        let desired = SwitchInterfaceDesired::new("Gi0/1\nno vlan 10").access(vlan(10));
        assert!(matches!(
            SwitchInterfaceResource::to_snapshot(&desired, None),
            Err(CfgMgrError::InvalidConfiguration { .. })
        ));
        assert!(SwitchInterfaceResource::check_key(&"Gi0/1\nno vlan 10".to_string()).is_err());
        assert!(SwitchInterfaceResource::check_key(&"GigabitEthernet0/1".to_string()).is_ok());
    }

    #[test]
    fn test_bpdu_guard_tristate() {
        let cases = [
            (Tristate::Unset, BpduGuard::Default),
            (Tristate::Null, BpduGuard::Disable),
            (Tristate::Value(true), BpduGuard::Enable),
            (Tristate::Value(false), BpduGuard::Disable),
        ];
        for (guard, expected) in cases {
            let iface =
                SwitchInterfaceResource::to_snapshot(&with_stp(Tristate::Unset, guard), None).unwrap();
            assert_eq!(iface.stp_bpdu_guard, expected);
        }

        let unset_stp = SwitchInterfaceDesired::new("Gi0/2");
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&unset_stp, None).unwrap().stp_bpdu_guard,
            BpduGuard::Default
        );
    }

    #[test]
    fn test_portfast_arguments() {
        let edge_trunk = with_stp(Tristate::Value("edge trunk".into()), Tristate::Unset);
        assert_eq!(
            SwitchInterfaceResource::to_snapshot(&edge_trunk, None).unwrap().stp_portfast,
            "edge trunk"
        );

        let bad = with_stp(Tristate::Value("enable\nno vlan 1".into()), Tristate::Unset);
        assert!(matches!(
            SwitchInterfaceResource::to_snapshot(&bad, None),
            Err(CfgMgrError::InvalidConfiguration { .. })
        ));

        let bad_encap = SwitchInterfaceDesired::new("Gi0/1").trunk("dot1q isl", vec![]);
        assert!(matches!(
            SwitchInterfaceResource::to_snapshot(&bad_encap, None),
            Err(CfgMgrError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_from_snapshot_defaults_are_unset() {
        let record = Interface::new("Gi0/3");
        assert_eq!(
            SwitchInterfaceResource::from_snapshot(&record),
            SwitchInterfaceDesired::new("Gi0/3")
        );
    }

    #[test]
    fn test_from_snapshot_access_port() {
        let record = Interface {
            switchport: SwitchportMode::Access { vlan: vlan(10) },
            stp_portfast: "enable".into(),
            stp_bpdu_guard: BpduGuard::Enable,
            ..Interface::new("GigabitEthernet0/2")
        };
        let desired = SwitchInterfaceResource::from_snapshot(&record);
        assert_eq!(desired.access, Tristate::Value(AccessSpec { vlan: vlan(10) }));
        assert_eq!(desired.trunk, Tristate::Unset);
        assert_eq!(
            desired.spanning_tree,
            Tristate::Value(SpanningTreeSpec {
                portfast: Tristate::Value("enable".into()),
                bpdu_guard: Tristate::Value(true),
            })
        );
    }

    #[test]
    fn test_deserialize_document_form() {
        let yaml = "\
name: GigabitEthernet0/1
trunk:
  encapsulation: dot1q
  allowed_vlans: [10, 20]
spanning_tree:
  bpdu_guard: null
";
        let desired: SwitchInterfaceDesired = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(desired.access, Tristate::Unset);
        assert_eq!(
            desired.trunk.as_value().map(|t| t.allowed_vlans.len()),
            Some(2)
        );
        let stp = desired.spanning_tree.as_value().unwrap();
        assert_eq!(stp.bpdu_guard, Tristate::Null);
        assert_eq!(stp.portfast, Tristate::Unset);
    }

    fn tristate<T: std::fmt::Debug + Clone + 'static>(
        value: impl Strategy<Value = T> + 'static,
    ) -> impl Strategy<Value = Tristate<T>> {
        prop_oneof![
            Just(Tristate::Unset),
            Just(Tristate::Null),
            value.prop_map(Tristate::Value),
        ]
    }

    fn desired_strategy() -> impl Strategy<Value = SwitchInterfaceDesired> {
        let vlan_id = (1u16..=4094).prop_map(|id| VlanId::new(id).unwrap());
        let mode = prop_oneof![
            Just((Tristate::<AccessSpec>::Unset, Tristate::<TrunkSpec>::Unset)),
            vlan_id
                .clone()
                .prop_map(|v| (Tristate::Value(AccessSpec { vlan: v }), Tristate::Null)),
            (
                prop_oneof![Just(String::new()), Just("dot1q".to_string())],
                proptest::collection::vec(vlan_id, 0..6),
            )
                .prop_map(|(encapsulation, allowed_vlans)| {
                    (
                        Tristate::Null,
                        Tristate::Value(TrunkSpec {
                            encapsulation,
                            allowed_vlans,
                        }),
                    )
                }),
        ];
        let stp = tristate(
            (
                tristate(prop_oneof![Just("enable".to_string()), Just("disable".to_string())]),
                tristate(any::<bool>()),
            )
                .prop_map(|(portfast, bpdu_guard)| SpanningTreeSpec {
                    portfast,
                    bpdu_guard,
                }),
        );

        (mode, stp, tristate("[a-z]{1,12}"), any::<bool>()).prop_map(
            |((access, trunk), spanning_tree, description, shutdown)| SwitchInterfaceDesired {
                name: "GigabitEthernet0/1".to_string(),
                description,
                shutdown,
                access,
                trunk,
                spanning_tree,
            },
        )
    }

    /// Records carrying only values (or wholly unset sections) that the
    /// device form represents exactly.
    fn value_strategy() -> impl Strategy<Value = SwitchInterfaceDesired> {
        let vlan_id = (1u16..=4094).prop_map(|id| VlanId::new(id).unwrap());
        let mode = prop_oneof![
            vlan_id
                .prop_map(|v| (Tristate::Value(AccessSpec { vlan: v }), Tristate::Unset)),
            (
                prop_oneof![Just(String::new()), Just("dot1q".to_string()), Just("isl".to_string())],
                proptest::collection::btree_set(1u16..=4094, 0..6),
            )
                .prop_map(|(encapsulation, ids)| {
                    (
                        Tristate::Unset,
                        Tristate::Value(TrunkSpec {
                            encapsulation,
                            allowed_vlans: ids.into_iter().map(|id| VlanId::new(id).unwrap()).collect(),
                        }),
                    )
                }),
        ];
        let stp = prop_oneof![
            Just(Tristate::Unset),
            (
                prop_oneof![Just("enable".to_string()), Just("disable".to_string())],
                any::<bool>(),
            )
                .prop_map(|(portfast, guard)| Tristate::Value(SpanningTreeSpec {
                    portfast: Tristate::Value(portfast),
                    bpdu_guard: Tristate::Value(guard),
                })),
        ];
        let description = prop_oneof![
            Just(Tristate::Unset),
            "[a-z]{1,12}".prop_map(Tristate::Value),
        ];

        (mode, stp, description, any::<bool>()).prop_map(
            |((access, trunk), spanning_tree, description, shutdown)| SwitchInterfaceDesired {
                name: "GigabitEthernet0/1".to_string(),
                description,
                shutdown,
                access,
                trunk,
                spanning_tree,
            },
        )
    }

    proptest! {
        #[test]
        fn prop_snapshot_round_trip_is_observably_equal(desired in desired_strategy()) {
            let snapshot = SwitchInterfaceResource::to_snapshot(&desired, None).unwrap();
            let read_back = SwitchInterfaceResource::from_snapshot(&snapshot);
            prop_assert_eq!(SwitchInterfaceResource::to_snapshot(&read_back, None).unwrap(), snapshot);
        }

        #[test]
        fn prop_value_records_round_trip_exactly(desired in value_strategy()) {
            let snapshot = SwitchInterfaceResource::to_snapshot(&desired, None).unwrap();
            prop_assert_eq!(SwitchInterfaceResource::from_snapshot(&snapshot), desired);
        }

        #[test]
        fn prop_read_back_applies_without_change(desired in desired_strategy()) {
            let on_device = SwitchInterfaceResource::to_snapshot(&desired, None).unwrap();
            let read_back = SwitchInterfaceResource::from_snapshot(&on_device);
            prop_assert_eq!(
                SwitchInterfaceResource::to_snapshot(&read_back, Some(&on_device)).unwrap(),
                on_device
            );
        }
    }
}
