//! Static route kind: global `ip route` statements keyed by prefix + mask.
//!
//! Keys compare by string equality, so `10.0.0.0 255.0.0.0` and
//! `10.0.0.1 255.0.0.0` are different routes even though they cover the
//! same network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ios_cfgmgr_common::{CfgMgrError, CfgMgrResult, Resource};
use ios_config_codec::{RunningConfig, StaticRoute};
use ios_types::{parse_mask, ParseError};

/// Identity of a static route, written `prefix/mask` on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub prefix: String,
    pub mask: String,
}

impl RouteKey {
    pub fn new(prefix: impl Into<String>, mask: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mask: mask.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.mask)
    }
}

impl FromStr for RouteKey {
    type Err = CfgMgrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((prefix, mask)) if !prefix.is_empty() && !mask.is_empty() => {
                Ok(RouteKey::new(prefix, mask))
            }
            _ => Err(CfgMgrError::invalid_config(
                "route key",
                format!("expected <prefix>/<mask>, got '{}'", s),
            )),
        }
    }
}

/// Desired state of one static route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticRouteDesired {
    pub prefix: String,
    pub mask: String,
    pub next_hop: String,
}

pub struct StaticRouteResource;

impl Resource for StaticRouteResource {
    const KIND: &'static str = "static-route";
    type Key = RouteKey;
    type Desired = StaticRouteDesired;
    type Record = StaticRoute;

    fn key(desired: &StaticRouteDesired) -> RouteKey {
        RouteKey::new(&desired.prefix, &desired.mask)
    }

    fn records(config: &RunningConfig) -> &[StaticRoute] {
        &config.static_routes
    }

    fn matches(record: &StaticRoute, key: &RouteKey) -> bool {
        record.prefix == key.prefix && record.mask == key.mask
    }

    fn check_key(key: &RouteKey) -> CfgMgrResult<()> {
        key.prefix
            .parse::<Ipv4Addr>()
            .map_err(|_| ParseError::InvalidIpAddress(key.prefix.clone()))?;
        parse_mask(&key.mask)?;
        Ok(())
    }

    fn to_snapshot(
        desired: &StaticRouteDesired,
        _prior: Option<&StaticRoute>,
    ) -> CfgMgrResult<StaticRoute> {
        Self::check_key(&Self::key(desired))?;
        if desired.next_hop.trim().is_empty() || desired.next_hop.contains(char::is_whitespace) {
            return Err(CfgMgrError::invalid_config(
                "next_hop",
                format!("expected an address or interface name, got '{}'", desired.next_hop),
            ));
        }

        Ok(StaticRoute {
            prefix: desired.prefix.clone(),
            mask: desired.mask.clone(),
            next_hop: desired.next_hop.clone(),
        })
    }

    fn from_snapshot(record: &StaticRoute) -> StaticRouteDesired {
        StaticRouteDesired {
            prefix: record.prefix.clone(),
            mask: record.mask.clone(),
            next_hop: record.next_hop.clone(),
        }
    }

    fn teardown(key: &RouteKey) -> String {
        format!("no ip route {} {}", key.prefix, key.mask)
    }
}
