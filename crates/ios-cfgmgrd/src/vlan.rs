//! VLAN kind: `vlan <id>` blocks keyed by VLAN id.

use serde::{Deserialize, Serialize};

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, Resource, Tristate};
use ios_config_codec::{RunningConfig, Vlan};
use ios_types::VlanId;

/// Desired state of one VLAN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VlanDesired {
    pub id: VlanId,
    /// Unset keeps the name on the device; null removes it.
    #[serde(default, skip_serializing_if = "Tristate::is_unset")]
    pub name: Tristate<String>,
}

impl VlanDesired {
    pub fn new(id: VlanId) -> Self {
        Self {
            id,
            name: Tristate::Unset,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Tristate::Value(name.into());
        self
    }
}

pub struct VlanResource;

impl Resource for VlanResource {
    const KIND: &'static str = "vlan";
    type Key = VlanId;
    type Desired = VlanDesired;
    type Record = Vlan;

    fn key(desired: &VlanDesired) -> VlanId {
        desired.id
    }

    fn records(config: &RunningConfig) -> &[Vlan] {
        &config.vlans
    }

    fn matches(record: &Vlan, key: &VlanId) -> bool {
        record.id == *key
    }

    fn to_snapshot(desired: &VlanDesired, prior: Option<&Vlan>) -> CfgMgrResult<Vlan> {
        let name = desired.name.clone().or_prior(prior.map(|p| p.name.clone()));
        if name.chars().any(char::is_control) {
            return Err(CfgMgrError::invalid_config(
                "name",
                "must not contain control characters",
            ));
        }
        Ok(Vlan {
            id: desired.id,
            name,
        })
    }

    fn from_snapshot(record: &Vlan) -> VlanDesired {
        VlanDesired {
            id: record.id,
            name: Tristate::from_device(record.name.clone()),
        }
    }

    fn teardown(key: &VlanId) -> String {
        format!("no vlan {}", key)
    }

    fn listed(config: &RunningConfig) -> Vec<&Vlan> {
        let mut vlans: Vec<&Vlan> = config.vlans.iter().collect();
        vlans.sort_by_key(|v| v.id);
        vlans
    }
}
