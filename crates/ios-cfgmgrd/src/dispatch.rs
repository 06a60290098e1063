//! Runtime dispatch from a kind name and key string to the typed resources.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, Reconciler, Resource, Transport};
use ios_config_codec::ConfigCodec;
use ios_types::VlanId;

use crate::eigrp::EigrpResource;
use crate::ethernet_intf::EthernetInterfaceResource;
use crate::route::{RouteKey, StaticRouteResource};
use crate::switch_intf::SwitchInterfaceResource;
use crate::vlan::VlanResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityKind {
    Vlan,
    StaticRoute,
    Eigrp,
    EthernetInterface,
    SwitchInterface,
}

impl EntityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Vlan => VlanResource::KIND,
            EntityKind::StaticRoute => StaticRouteResource::KIND,
            EntityKind::Eigrp => EigrpResource::KIND,
            EntityKind::EthernetInterface => EthernetInterfaceResource::KIND,
            EntityKind::SwitchInterface => SwitchInterfaceResource::KIND,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn to_json<S: Serialize>(value: &S) -> CfgMgrResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| CfgMgrError::document(format!("Failed to encode result: {}", e)))
}

fn parse_asn(key: &str) -> CfgMgrResult<u32> {
    key.trim()
        .parse()
        .map_err(|_| CfgMgrError::invalid_config("asn", format!("'{}' is not an AS number", key)))
}

/// Reads one entity; `null` when it is not configured.
pub async fn read_entity<T: Transport, C: ConfigCodec>(
    reconciler: &Reconciler<T, C>,
    kind: EntityKind,
    key: &str,
) -> CfgMgrResult<serde_json::Value> {
    match kind {
        EntityKind::Vlan => {
            let id: VlanId = key.trim().parse()?;
            to_json(&reconciler.read::<VlanResource>(&id).await?)
        }
        EntityKind::StaticRoute => {
            let route_key: RouteKey = key.parse()?;
            to_json(&reconciler.read::<StaticRouteResource>(&route_key).await?)
        }
        EntityKind::Eigrp => {
            let asn = parse_asn(key)?;
            to_json(&reconciler.read::<EigrpResource>(&asn).await?)
        }
        EntityKind::EthernetInterface => to_json(
            &reconciler
                .read::<EthernetInterfaceResource>(&key.to_string())
                .await?,
        ),
        EntityKind::SwitchInterface => to_json(
            &reconciler
                .read::<SwitchInterfaceResource>(&key.to_string())
                .await?,
        ),
    }
}

/// Lists every entity of a kind as a JSON array.
pub async fn list_entities<T: Transport, C: ConfigCodec>(
    reconciler: &Reconciler<T, C>,
    kind: EntityKind,
) -> CfgMgrResult<serde_json::Value> {
    match kind {
        EntityKind::Vlan => to_json(&reconciler.list::<VlanResource>().await?),
        EntityKind::StaticRoute => to_json(&reconciler.list::<StaticRouteResource>().await?),
        EntityKind::Eigrp => to_json(&reconciler.list::<EigrpResource>().await?),
        EntityKind::EthernetInterface => {
            to_json(&reconciler.list::<EthernetInterfaceResource>().await?)
        }
        EntityKind::SwitchInterface => {
            to_json(&reconciler.list::<SwitchInterfaceResource>().await?)
        }
    }
}

pub async fn delete_entity<T: Transport, C: ConfigCodec>(
    reconciler: &Reconciler<T, C>,
    kind: EntityKind,
    key: &str,
) -> CfgMgrResult<()> {
    match kind {
        EntityKind::Vlan => {
            let id: VlanId = key.trim().parse()?;
            reconciler.delete::<VlanResource>(&id).await
        }
        EntityKind::StaticRoute => {
            let route_key: RouteKey = key.parse()?;
            reconciler.delete::<StaticRouteResource>(&route_key).await
        }
        EntityKind::Eigrp => reconciler.delete::<EigrpResource>(&parse_asn(key)?).await,
        EntityKind::EthernetInterface => {
            reconciler
                .delete::<EthernetInterfaceResource>(&key.to_string())
                .await
        }
        EntityKind::SwitchInterface => {
            reconciler
                .delete::<SwitchInterfaceResource>(&key.to_string())
                .await
        }
    }
}
