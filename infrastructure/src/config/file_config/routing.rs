//! Routing configuration from TOML (`[routing]` section)

use consilium_domain::{ComplexityBounds, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complexity band boundaries
///
/// ```toml
/// [routing]
/// simple_bound = 0.3   # scores below go to the local tier
/// medium_bound = 0.7   # scores below go hybrid, the rest remote
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    pub simple_bound: f64,
    pub medium_bound: f64,
}

impl Default for FileRoutingConfig {
    fn default() -> Self {
        let bounds = ComplexityBounds::default();
        Self {
            simple_bound: bounds.simple(),
            medium_bound: bounds.medium(),
        }
    }
}

impl FileRoutingConfig {
    pub fn to_bounds(&self) -> (ComplexityBounds, Vec<ConfigIssue>) {
        match ComplexityBounds::new(self.simple_bound, self.medium_bound) {
            Ok(bounds) => (bounds, Vec::new()),
            Err(e) => (
                ComplexityBounds::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidComplexityBounds,
                    format!("routing: {}", e),
                )],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;
    use super::*;

    #[test]
    fn test_custom_bounds() {
        let config: FileConfig =
            toml::from_str("[routing]\nsimple_bound = 0.2\nmedium_bound = 0.6\n").unwrap();
        let (bounds, issues) = config.routing.to_bounds();
        assert!(issues.is_empty());
        assert_eq!(bounds.simple(), 0.2);
        assert_eq!(bounds.medium(), 0.6);
    }

    #[test]
    fn test_inverted_bounds_are_fatal() {
        let config: FileConfig =
            toml::from_str("[routing]\nsimple_bound = 0.8\nmedium_bound = 0.4\n").unwrap();
        let (_, issues) = config.routing.to_bounds();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidComplexityBounds);
        assert!(issues[0].is_error());
    }
}
