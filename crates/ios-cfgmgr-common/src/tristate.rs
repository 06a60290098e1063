//! Three-valued optional attribute for desired state.
//!
//! `Unset` leaves the device as it is, `Null` asks for the attribute to be
//! absent or disabled, and `Value` asks for a specific value. In a YAML or
//! JSON document a missing field is `Unset` and an explicit `null` is
//! `Null`; struct fields need `#[serde(default)]` for that to work, and
//! `skip_serializing_if = "Tristate::is_unset"` to write it back out.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Tristate<T> {
    #[default]
    Unset,
    Null,
    Value(T),
}

impl<T> Tristate<T> {
    pub const fn is_unset(&self) -> bool {
        matches!(self, Tristate::Unset)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Tristate::Null)
    }

    pub const fn is_value(&self) -> bool {
        matches!(self, Tristate::Value(_))
    }

    /// Returns the value when present; `Unset` and `Null` give `None`.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Tristate::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Tristate<&T> {
        match self {
            Tristate::Unset => Tristate::Unset,
            Tristate::Null => Tristate::Null,
            Tristate::Value(v) => Tristate::Value(v),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Tristate<U> {
        match self {
            Tristate::Unset => Tristate::Unset,
            Tristate::Null => Tristate::Null,
            Tristate::Value(v) => Tristate::Value(f(v)),
        }
    }
}

impl<T: Default + PartialEq> Tristate<T> {
    /// Builds the desired-state view of a device value: the type's default
    /// (empty string, `false`, ...) reads back as `Unset`.
    pub fn from_device(value: T) -> Self {
        if value == T::default() {
            Tristate::Unset
        } else {
            Tristate::Value(value)
        }
    }

    /// Resolves to the two-valued device form: `Unset` and `Null` become
    /// the type's default.
    pub fn unwrap_or_default(self) -> T {
        self.into_value().unwrap_or_default()
    }

    /// Resolves against the value currently on the device: `Unset` keeps
    /// `prior` (the default when there is none), `Null` clears to the
    /// default.
    pub fn or_prior(self, prior: Option<T>) -> T {
        match self {
            Tristate::Unset => prior.unwrap_or_default(),
            Tristate::Null => T::default(),
            Tristate::Value(v) => v,
        }
    }
}

impl<T> From<T> for Tristate<T> {
    fn from(value: T) -> Self {
        Tristate::Value(value)
    }
}

impl<T: Serialize> Serialize for Tristate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tristate::Value(v) => serializer.serialize_some(v),
            Tristate::Unset | Tristate::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Tristate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // only reached when the field is present; missing fields take Default
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Tristate::Value(v),
            None => Tristate::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(default, skip_serializing_if = "Tristate::is_unset")]
        name: Tristate<String>,
        #[serde(default, skip_serializing_if = "Tristate::is_unset")]
        guard: Tristate<bool>,
    }

    #[test]
    fn test_missing_null_and_value() {
        let record: Record = serde_json::from_str(r#"{"guard": null}"#).unwrap();
        assert_eq!(record.name, Tristate::Unset);
        assert_eq!(record.guard, Tristate::Null);

        let record: Record = serde_json::from_str(r#"{"name": "Eng", "guard": false}"#).unwrap();
        assert_eq!(record.name, Tristate::Value("Eng".to_string()));
        assert_eq!(record.guard, Tristate::Value(false));
    }

    #[test]
    fn test_serialize_skips_unset() {
        let record = Record {
            name: Tristate::Unset,
            guard: Tristate::Null,
        };
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"guard":null}"#);

        let record = Record {
            name: "Eng".to_string().into(),
            guard: Tristate::Unset,
        };
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"name":"Eng"}"#);
    }

    #[test]
    fn test_device_conversions() {
        assert_eq!(Tristate::from_device(String::new()), Tristate::Unset);
        assert_eq!(
            Tristate::from_device("Eng".to_string()),
            Tristate::Value("Eng".to_string())
        );
        assert_eq!(Tristate::<String>::Null.unwrap_or_default(), "");
        assert_eq!(Tristate::Value(7u16).unwrap_or_default(), 7);
    }

    #[test]
    fn test_or_prior() {
        let prior = Some("Eng".to_string());
        assert_eq!(Tristate::Unset.or_prior(prior.clone()), "Eng");
        assert_eq!(Tristate::<String>::Unset.or_prior(None), "");
        assert_eq!(Tristate::Null.or_prior(prior.clone()), "");
        assert_eq!(Tristate::Value("Ops".to_string()).or_prior(prior), "Ops");
    }

    #[test]
    fn test_accessors() {
        let value = Tristate::Value(3);
        assert!(value.is_value());
        assert_eq!(value.as_value(), Some(&3));
        assert_eq!(value.as_ref().map(|v| v * 2), Tristate::Value(6));
        assert!(Tristate::<i32>::Null.is_null());
        assert_eq!(Tristate::<i32>::Null.into_value(), None);
    }
}
