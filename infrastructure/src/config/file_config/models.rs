//! Role-based model configuration from TOML (`[models]` section)

use consilium_domain::{ConfigIssue, ConfigIssueCode, Model, ModelConfig, Specialty};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// structuring = "ernie-4.5-8b"
/// local = "ernie-lite"
///
/// [models.specialists]
/// oncology = "onco-v2"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model that structures raw case text
    pub structuring: Option<String>,
    /// Model for the local processing tier
    pub local: Option<String>,
    /// Per-specialty overrides keyed by specialty name
    pub specialists: BTreeMap<String, String>,
}

impl FileModelsConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(field: &str, value: Option<&String>) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) if s.trim().is_empty() => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName,
                    format!("models.{}: model name cannot be empty", field),
                )],
            ),
            Some(s) => {
                // Unknown names become Model::Custom
                let Ok(model) = s.trim().parse::<Model>();
                (Some(model), Vec::new())
            }
        }
    }

    pub fn to_model_config(&self) -> (ModelConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut config = ModelConfig::default();

        let (structuring, mut found) = Self::parse_single_model("structuring", self.structuring.as_ref());
        issues.append(&mut found);
        if let Some(model) = structuring {
            config = config.with_structuring(model);
        }

        let (local, mut found) = Self::parse_single_model("local", self.local.as_ref());
        issues.append(&mut found);
        if let Some(model) = local {
            config = config.with_local(model);
        }

        for (name, value) in &self.specialists {
            let specialty = match name.parse::<Specialty>() {
                Ok(s) => s,
                Err(e) => {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::UnknownSpecialty,
                        format!("models.specialists: {}", e),
                    ));
                    continue;
                }
            };
            let field = format!("specialists.{}", name);
            let (model, mut found) = Self::parse_single_model(&field, Some(value));
            issues.append(&mut found);
            if let Some(model) = model {
                config = config.with_specialist(specialty, model);
            }
        }

        (config, issues)
    }
}
