//! Domain value objects - Immutable identifiers used across the game

use serde::{Deserialize, Serialize};

/// Macro to implement common traits for string wrapper types
macro_rules! impl_string_wrapper {
    ($type:ident) => {
        impl From<String> for $type {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $type {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::borrow::Borrow<str> for $type {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Unique identifier for a scenario within a certification.
///
/// Used as the completion key in the player's history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScenarioId(String);

impl ScenarioId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_string_wrapper!(ScenarioId);

/// Identifier of a certification pack (its directory name on disk)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CertificationId(String);

impl CertificationId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_string_wrapper!(CertificationId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn scenario_id_set_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(ScenarioId::from("d1_s01"));

        assert!(set.contains("d1_s01"));
        assert!(!set.contains("d1_s02"));
    }

    #[test]
    fn certification_id_displays_raw_value() {
        let id = CertificationId::new("cissp".to_string());
        assert_eq!(id.to_string(), "cissp");
        assert_eq!(id.as_str(), "cissp");
    }
}
