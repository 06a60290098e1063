//! Desired-state documents: one YAML file describing every managed entity.
//!
//! ```yaml
//! vlans:
//!   - id: 10
//!     name: Engineering
//! switch_interfaces:
//!   - name: GigabitEthernet0/2
//!     access: { vlan: 10 }
//! static_routes:
//!   - { prefix: 0.0.0.0, mask: 0.0.0.0, next_hop: 192.0.2.1 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, Reconciler, Resource, Transport};
use ios_config_codec::ConfigCodec;

use crate::eigrp::{EigrpDesired, EigrpResource};
use crate::ethernet_intf::{EthernetInterfaceDesired, EthernetInterfaceResource};
use crate::route::{StaticRouteDesired, StaticRouteResource};
use crate::switch_intf::{SwitchInterfaceDesired, SwitchInterfaceResource};
use crate::vlan::{VlanDesired, VlanResource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesiredDocument {
    pub vlans: Vec<VlanDesired>,
    pub ethernet_interfaces: Vec<EthernetInterfaceDesired>,
    pub switch_interfaces: Vec<SwitchInterfaceDesired>,
    pub static_routes: Vec<StaticRouteDesired>,
    pub eigrp: Vec<EigrpDesired>,
}

impl DesiredDocument {
    pub fn from_yaml(text: &str) -> CfgMgrResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| CfgMgrError::document(format!("Failed to parse document: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> CfgMgrResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            CfgMgrError::document(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&text)
    }

    /// Number of entities in the document.
    pub fn len(&self) -> usize {
        self.vlans.len()
            + self.ethernet_interfaces.len()
            + self.switch_interfaces.len()
            + self.static_routes.len()
            + self.eigrp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of applying one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedEntity {
    pub kind: &'static str,
    pub key: String,
    /// Device state after the cycle; `null` when the entity was not found
    /// on re-read.
    pub state: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<AppliedEntity>,
}

impl ApplyReport {
    /// Entities that did not show up on the device after their cycle.
    pub fn missing(&self) -> impl Iterator<Item = &AppliedEntity> {
        self.applied.iter().filter(|e| e.state.is_null())
    }
}

async fn apply_kind<R, T, C>(
    reconciler: &Reconciler<T, C>,
    items: &[R::Desired],
    report: &mut ApplyReport,
) -> CfgMgrResult<()>
where
    R: Resource,
    R::Desired: Serialize,
    T: Transport,
    C: ConfigCodec,
{
    for desired in items {
        let key = R::key(desired).to_string();
        let state = reconciler.apply::<R>(desired).await?;
        let state = serde_json::to_value(&state).map_err(|e| {
            CfgMgrError::document(format!("Failed to encode {} {}: {}", R::KIND, key, e))
        })?;
        report.applied.push(AppliedEntity {
            kind: R::KIND,
            key,
            state,
        });
    }
    Ok(())
}

/// Applies every entity in dependency order: VLANs before the interfaces
/// that reference them, interfaces before the routes and EIGRP networks
/// that use their subnets. Stops at the first error.
#[instrument(skip_all, fields(entities = document.len()))]
pub async fn apply_document<T: Transport, C: ConfigCodec>(
    reconciler: &Reconciler<T, C>,
    document: &DesiredDocument,
) -> CfgMgrResult<ApplyReport> {
    let mut report = ApplyReport::default();

    apply_kind::<VlanResource, _, _>(reconciler, &document.vlans, &mut report).await?;
    apply_kind::<EthernetInterfaceResource, _, _>(
        reconciler,
        &document.ethernet_interfaces,
        &mut report,
    )
    .await?;
    apply_kind::<SwitchInterfaceResource, _, _>(
        reconciler,
        &document.switch_interfaces,
        &mut report,
    )
    .await?;
    apply_kind::<StaticRouteResource, _, _>(reconciler, &document.static_routes, &mut report)
        .await?;
    apply_kind::<EigrpResource, _, _>(reconciler, &document.eigrp, &mut report).await?;

    info!(applied = report.applied.len(), "Document applied");
    Ok(report)
}
