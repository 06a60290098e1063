//! EIGRP kind: `router eigrp <asn>` blocks keyed by autonomous-system number.
//!
//! Networks are written in CIDR form and carried on the device as
//! `network <address> <wildcard>`.

use serde::{Deserialize, Serialize};

use ios_cfgmgr_common::{CfgMgrResult, Resource};
use ios_config_codec::{EigrpNetwork, EigrpProcess, RunningConfig};

use crate::address::{cidr_from_wildcard, parse_cidr};

/// Desired state of one EIGRP process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EigrpDesired {
    pub asn: u32,
    /// Networks in CIDR form, e.g. `10.0.0.0/8`. Host bits are cleared.
    #[serde(default)]
    pub networks: Vec<String>,
}

pub struct EigrpResource;

impl Resource for EigrpResource {
    const KIND: &'static str = "eigrp";
    type Key = u32;
    type Desired = EigrpDesired;
    type Record = EigrpProcess;

    fn key(desired: &EigrpDesired) -> u32 {
        desired.asn
    }

    fn records(config: &RunningConfig) -> &[EigrpProcess] {
        &config.eigrp
    }

    fn matches(record: &EigrpProcess, key: &u32) -> bool {
        record.asn == *key
    }

    fn to_snapshot(
        desired: &EigrpDesired,
        _prior: Option<&EigrpProcess>,
    ) -> CfgMgrResult<EigrpProcess> {
        let networks = desired
            .networks
            .iter()
            .map(|network| -> CfgMgrResult<EigrpNetwork> {
                let cidr = parse_cidr(network)?;
                Ok(EigrpNetwork {
                    address: cidr.network(),
                    wildcard: cidr.wildcard(),
                })
            })
            .collect::<CfgMgrResult<Vec<_>>>()?;

        Ok(EigrpProcess {
            asn: desired.asn,
            networks,
        })
    }

    fn from_snapshot(record: &EigrpProcess) -> EigrpDesired {
        EigrpDesired {
            asn: record.asn,
            networks: record
                .networks
                .iter()
                .map(|n| cidr_from_wildcard(n.address, n.wildcard))
                .collect(),
        }
    }

    fn teardown(key: &u32) -> String {
        format!("no router eigrp {}", key)
    }
}
