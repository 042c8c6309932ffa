//! Specialty domain
//!
//! Specialties are a closed set. Adding one means adding a variant to
//! [`Specialty`] and a row to the profile table in [`profile`]; nothing else
//! dispatches on specialty names.
//!
//! Declaration order matters: it is the order used for selection output,
//! Opinion Set iteration, merging and report listing.

pub mod profile;
pub mod selector;

pub use profile::SpecialtyProfile;
pub use selector::SpecialtySelector;

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Medical specialty of an opinion producer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Specialty {
    /// Cardiovascular disease
    Cardiology,
    /// Tumors and cancer care
    Oncology,
    /// Medical imaging interpretation
    Radiology,
}

impl Specialty {
    /// All specialties in declaration order
    pub const ALL: [Specialty; 3] = [
        Specialty::Cardiology,
        Specialty::Oncology,
        Specialty::Radiology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Specialty::Cardiology => "cardiology",
            Specialty::Oncology => "oncology",
            Specialty::Radiology => "radiology",
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.profile().display_name
    }

    /// Table row describing this specialty
    pub fn profile(&self) -> &'static SpecialtyProfile {
        profile::profile_of(*self)
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Specialty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cardiology" | "cardio" => Ok(Specialty::Cardiology),
            "oncology" | "onco" => Ok(Specialty::Oncology),
            "radiology" | "radio" | "imaging" => Ok(Specialty::Radiology),
            other => Err(DomainError::UnknownSpecialty(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_ord() {
        let mut shuffled = vec![Specialty::Radiology, Specialty::Cardiology, Specialty::Oncology];
        shuffled.sort();
        assert_eq!(shuffled, Specialty::ALL.to_vec());
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("Cardiology".parse::<Specialty>().unwrap(), Specialty::Cardiology);
        assert_eq!("imaging".parse::<Specialty>().unwrap(), Specialty::Radiology);
        assert!(matches!(
            "dermatology".parse::<Specialty>(),
            Err(DomainError::UnknownSpecialty(_))
        ));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Specialty::Oncology).unwrap();
        assert_eq!(json, "\"oncology\"");
    }
}
