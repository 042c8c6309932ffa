//! Role-based model configuration.
//!
//! [`ModelConfig`] groups the model selections for each producer role.
//! This is a static value object: once created, models don't change at runtime.

use crate::core::model::Model;
use crate::specialty::Specialty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role-based model configuration.
///
/// - **Structuring**: turns raw case text into a structured projection
/// - **Specialists**: per-specialty overrides; unset specialties use the
///   model from their profile table row
/// - **Local**: model for the resource-constrained local tier
///
/// # Example
///
/// ```
/// use consilium_domain::{Model, ModelConfig, Specialty};
///
/// let config = ModelConfig::default()
///     .with_specialist(Specialty::Oncology, Model::Custom("onco-v2".into()));
///
/// assert_eq!(config.specialist(Specialty::Oncology).as_str(), "onco-v2");
/// assert_eq!(config.specialist(Specialty::Cardiology), Model::ErnieCardiology);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model for the structuring producer.
    pub structuring: Model,
    /// Explicit per-specialty model overrides.
    #[serde(default)]
    pub specialists: BTreeMap<Specialty, Model>,
    /// Model for the local processing tier.
    pub local: Model,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            structuring: Model::Ernie45,
            specialists: BTreeMap::new(),
            local: Model::ErnieLite,
        }
    }
}

impl ModelConfig {
    pub fn with_structuring(mut self, model: Model) -> Self {
        self.structuring = model;
        self
    }

    pub fn with_specialist(mut self, specialty: Specialty, model: Model) -> Self {
        self.specialists.insert(specialty, model);
        self
    }

    pub fn with_local(mut self, model: Model) -> Self {
        self.local = model;
        self
    }

    /// Resolve the model for a specialty (override, else profile default).
    pub fn specialist(&self, specialty: Specialty) -> Model {
        self.specialists
            .get(&specialty)
            .cloned()
            .unwrap_or_else(|| specialty.profile().model())
    }
}
