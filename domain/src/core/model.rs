//! Model value object identifying a language model behind an opinion producer

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Language models known to the consultation engine (Value Object)
///
/// Each specialty is served by its own fine-tuned model; the general model
/// structures raw case text and the lite model runs on the local tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    /// General-purpose model used for case structuring
    Ernie45,
    /// Cardiology fine-tune
    ErnieCardiology,
    /// Oncology fine-tune
    ErnieOncology,
    /// Radiology fine-tune
    ErnieRadiology,
    /// Quantized model for the resource-constrained local tier
    ErnieLite,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Ernie45 => "ernie-4.5-8b",
            Model::ErnieCardiology => "ernie-cardiology",
            Model::ErnieOncology => "ernie-oncology",
            Model::ErnieRadiology => "ernie-radiology",
            Model::ErnieLite => "ernie-lite",
            Model::Custom(s) => s,
        }
    }
}

impl Default for Model {
    /// Returns the general structuring model
    fn default() -> Self {
        Model::Ernie45
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "ernie-4.5-8b" => Model::Ernie45,
            "ernie-cardiology" => Model::ErnieCardiology,
            "ernie-oncology" => Model::ErnieOncology,
            "ernie-radiology" => Model::ErnieRadiology,
            "ernie-lite" => Model::ErnieLite,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(model) = s.parse::<Model>();
        Ok(model)
    }
}
