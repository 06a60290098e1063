//! Per-kind contract between desired state and the device snapshot.
//!
//! A [`Resource`] bundles, for one entity kind, the Attribute Codec
//! (`to_snapshot` / `from_snapshot`), the Entity Locator (`records` +
//! `matches`) and the teardown command. Implementations are stateless and
//! do no I/O; the [`Reconciler`](crate::Reconciler) drives them.

use std::fmt;

use ios_config_codec::{ConfigEntity, RunningConfig};
use tracing::debug;

use crate::error::CfgMgrResult;

pub trait Resource {
    /// Kind name used in logs (`vlan`, `static-route`, ...).
    const KIND: &'static str;

    /// Natural identity key (VLAN id, interface name, ASN, prefix+mask).
    type Key: fmt::Display + fmt::Debug + Clone + Send + Sync;

    /// Desired-state record, with tri-state optional attributes.
    type Desired: fmt::Debug + Clone + Send + Sync;

    /// Two-valued device snapshot record.
    type Record: fmt::Debug + Clone + Send + Sync + Into<ConfigEntity>;

    fn key(desired: &Self::Desired) -> Self::Key;

    /// All records of this kind in snapshot order.
    fn records(config: &RunningConfig) -> &[Self::Record];

    /// True if `record` has identity `key`.
    fn matches(record: &Self::Record, key: &Self::Key) -> bool;

    /// Rejects keys that cannot be written into a command line. Checked
    /// before any device I/O.
    fn check_key(_key: &Self::Key) -> CfgMgrResult<()> {
        Ok(())
    }

    /// Materializes the target snapshot record for a desired value.
    ///
    /// `prior` is the record currently on the device, `None` when the
    /// entity is being created. Unset attributes and fields owned by other
    /// kinds are taken from `prior`, so they never show up in the diff;
    /// without a prior record they take the device default.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` or `InvalidAddress`. The engine runs the
    /// conversion once with `prior = None` before any device I/O, so these
    /// never follow a read.
    fn to_snapshot(
        desired: &Self::Desired,
        prior: Option<&Self::Record>,
    ) -> CfgMgrResult<Self::Record>;

    /// Rebuilds the desired-state view of a device record.
    fn from_snapshot(record: &Self::Record) -> Self::Desired;

    /// The single command that removes the entity.
    fn teardown(key: &Self::Key) -> String;

    /// Records in the order `list` reports them. Snapshot order unless a
    /// kind overrides it.
    fn listed(config: &RunningConfig) -> Vec<&Self::Record> {
        Self::records(config).iter().collect()
    }
}

/// Finds the record with identity `key`, scanning in snapshot order.
///
/// Keys are expected to be unique; on duplicates the first match wins and
/// the extra matches are logged.
pub fn locate<'a, R: Resource>(config: &'a RunningConfig, key: &R::Key) -> Option<&'a R::Record> {
    let mut matches = R::records(config).iter().filter(|r| R::matches(r, key));
    let found = matches.next();
    let duplicates = matches.count();
    if duplicates > 0 {
        debug!(
            kind = R::KIND,
            key = %key,
            duplicates,
            "Duplicate identity key in snapshot, using first match"
        );
    }
    found
}
