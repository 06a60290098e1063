//! VLAN ID and VLAN list types with validation.

use crate::ParseError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IEEE 802.1Q VLAN identifier (1-4094).
///
/// VLAN 0 and 4095 are reserved.
///
/// # Examples
///
/// ```
/// use ios_types::VlanId;
///
/// let vlan = VlanId::new(100).unwrap();
/// assert_eq!(vlan.as_u16(), 100);
///
/// assert!(VlanId::new(0).is_err());
/// assert!(VlanId::new(4095).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Minimum valid VLAN ID.
    pub const MIN: u16 = 1;

    /// Maximum valid VLAN ID.
    pub const MAX: u16 = 4094;

    /// Default VLAN ID (VLAN 1).
    pub const DEFAULT: VlanId = VlanId(1);

    /// Creates a new VLAN ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the VLAN ID is not in the valid range (1-4094).
    pub const fn new(id: u16) -> Result<Self, ParseError> {
        if id >= Self::MIN && id <= Self::MAX {
            Ok(VlanId(id))
        } else {
            Err(ParseError::InvalidVlanId(id))
        }
    }

    /// Returns the VLAN ID as a u16.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is the default VLAN (VLAN 1).
    pub const fn is_default(&self) -> bool {
        self.0 == 1
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VlanId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // IOS interface names carry the id as "Vlan100"
        let id_str = match s.get(..4) {
            Some(prefix) if prefix.eq_ignore_ascii_case("vlan") => &s[4..],
            _ => s,
        };

        let id: u16 = id_str.parse().map_err(|_| ParseError::InvalidVlanId(0))?;

        VlanId::new(id)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = ParseError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        VlanId::new(id)
    }
}

impl From<VlanId> for u16 {
    fn from(vlan: VlanId) -> u16 {
        vlan.0
    }
}

/// A sorted, de-duplicated set of VLAN ids as IOS writes them: `1,10-20,30`.
///
/// Used for trunk allowed-VLAN lists and multi-VLAN `vlan` statements.
/// Ranges are expanded on parse and compressed again on display, so two
/// lists covering the same ids always compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<VlanId>", into = "Vec<VlanId>")]
pub struct VlanList(Vec<VlanId>);

impl VlanList {
    /// Creates an empty list.
    pub const fn new() -> Self {
        VlanList(Vec::new())
    }

    /// Returns the ids in ascending order.
    pub fn ids(&self) -> &[VlanId] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, vlan: VlanId) -> bool {
        self.0.binary_search(&vlan).is_ok()
    }

    /// Adds ids from another list, keeping the list sorted.
    pub fn extend(&mut self, other: &VlanList) {
        self.0.extend_from_slice(&other.0);
        self.0.sort_unstable();
        self.0.dedup();
    }
}

impl From<Vec<VlanId>> for VlanList {
    fn from(mut ids: Vec<VlanId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        VlanList(ids)
    }
}

impl From<VlanList> for Vec<VlanId> {
    fn from(list: VlanList) -> Self {
        list.0
    }
}

impl FromIterator<VlanId> for VlanList {
    fn from_iter<I: IntoIterator<Item = VlanId>>(iter: I) -> Self {
        VlanList::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl fmt::Display for VlanList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // group consecutive ids: id - index is constant within a run
        let runs = self
            .0
            .iter()
            .enumerate()
            .chunk_by(|(idx, vlan)| i32::from(vlan.as_u16()) - *idx as i32);

        let mut first = true;
        for (_, run) in &runs {
            let run: Vec<VlanId> = run.map(|(_, vlan)| *vlan).collect();
            if !first {
                f.write_str(",")?;
            }
            first = false;
            match run.as_slice() {
                [single] => write!(f, "{}", single)?,
                [start, .., end] => write!(f, "{}-{}", start, end)?,
                [] => {}
            }
        }
        Ok(())
    }
}

impl FromStr for VlanList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidVlanList(s.to_string());
        let mut ids = Vec::new();

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo: u16 = lo.trim().parse().map_err(|_| invalid())?;
                    let hi: u16 = hi.trim().parse().map_err(|_| invalid())?;
                    if lo > hi {
                        return Err(invalid());
                    }
                    for id in lo..=hi {
                        ids.push(VlanId::new(id)?);
                    }
                }
                None => {
                    let id: u16 = part.parse().map_err(|_| invalid())?;
                    ids.push(VlanId::new(id)?);
                }
            }
        }

        Ok(VlanList::from(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list(ids: &[u16]) -> VlanList {
        ids.iter().map(|id| VlanId::new(*id).unwrap()).collect()
    }

    #[test]
    fn test_valid_vlan_ids() {
        assert!(VlanId::new(1).is_ok());
        assert!(VlanId::new(100).is_ok());
        assert!(VlanId::new(4094).is_ok());
    }

    #[test]
    fn test_invalid_vlan_ids() {
        assert!(VlanId::new(0).is_err());
        assert!(VlanId::new(4095).is_err());
        assert!(VlanId::new(65535).is_err());
    }

    #[test]
    fn test_parse_vlan_prefix() {
        let vlan: VlanId = "Vlan100".parse().unwrap();
        assert_eq!(vlan.as_u16(), 100);

        let vlan2: VlanId = "VLAN200".parse().unwrap();
        assert_eq!(vlan2.as_u16(), 200);

        assert!("Gi0/1".parse::<VlanId>().is_err());
    }

    #[test]
    fn test_default_vlan() {
        assert!(VlanId::DEFAULT.is_default());
        assert!(!VlanId::new(100).unwrap().is_default());
    }

    #[test]
    fn test_list_parse_ranges() {
        let parsed: VlanList = "30,10-12, 1".parse().unwrap();
        assert_eq!(parsed, list(&[1, 10, 11, 12, 30]));
    }

    #[test]
    fn test_list_display_compresses_runs() {
        assert_eq!(list(&[1, 10, 11, 12, 30, 31]).to_string(), "1,10-12,30-31");
        assert_eq!(list(&[5]).to_string(), "5");
        assert_eq!(VlanList::new().to_string(), "");
    }

    #[test]
    fn test_list_rejects_garbage() {
        assert!(matches!("10-x".parse::<VlanList>(), Err(ParseError::InvalidVlanList(_))));
        assert!(matches!("20-10".parse::<VlanList>(), Err(ParseError::InvalidVlanList(_))));
        assert_eq!("0,5".parse::<VlanList>(), Err(ParseError::InvalidVlanId(0)));
    }

    #[test]
    fn test_list_extend_and_contains() {
        let mut vlans = list(&[10, 20]);
        vlans.extend(&list(&[15, 20, 30]));
        assert_eq!(vlans, list(&[10, 15, 20, 30]));
        assert!(vlans.contains(VlanId::new(15).unwrap()));
        assert!(!vlans.contains(VlanId::new(16).unwrap()));
        assert_eq!(vlans.len(), 4);
    }

    #[test]
    fn test_list_normalizes_order() {
        assert_eq!(list(&[30, 10, 10, 20]), list(&[10, 20, 30]));
    }
}
