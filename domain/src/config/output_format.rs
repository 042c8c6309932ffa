//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for diagnosis and routing results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Consultations, debate trail and both report views (default)
    #[default]
    Full,
    /// Only the clinical view
    Clinical,
    /// Only the plain-language view
    Plain,
    /// JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(OutputFormat::Full),
            "clinical" | "professional" => Ok(OutputFormat::Clinical),
            "plain" | "patient" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}
