//! Opinion value objects

use crate::specialty::Specialty;
use serde::{Deserialize, Serialize};

/// Risk assessment attached to an opinion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Lenient parse; unknown values yield `None`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" | "低" => Some(RiskLevel::Low),
            "medium" | "moderate" | "中" => Some(RiskLevel::Medium),
            "high" | "severe" | "高" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One specialist's assessment of a case (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    /// Specialty that produced this opinion
    pub specialty: Specialty,
    /// Free-text summary (carries the failure reason for error opinions)
    pub summary: String,
    /// Ordered diagnosis candidates
    #[serde(default)]
    pub diagnoses: Vec<String>,
    /// Ordered recommendations
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// Confidence in [0, 1]; 0.0 marks an unusable opinion
    pub confidence: f64,
    /// Round that produced this opinion (0 = initial analysis)
    #[serde(default)]
    pub round: usize,
    /// Failure reason when the producer could not form an opinion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Opinion {
    /// Create a round-0 opinion with the given summary.
    pub fn new(specialty: Specialty, summary: impl Into<String>) -> Self {
        Self {
            specialty,
            summary: summary.into(),
            diagnoses: Vec::new(),
            recommendations: Vec::new(),
            risk_level: RiskLevel::default(),
            confidence: 0.0,
            round: 0,
            error: None,
        }
    }

    /// Error opinion: failure reason in the summary, confidence 0.0.
    pub fn error(specialty: Specialty, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            summary: format!("{} consultation failed: {}", specialty.display_name(), reason),
            error: Some(reason),
            ..Self::new(specialty, String::new())
        }
    }

    pub fn with_diagnoses(mut self, diagnoses: Vec<String>) -> Self {
        self.diagnoses = diagnoses;
        self
    }

    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Set the confidence, clamped to [0, 1].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    pub fn in_round(mut self, round: usize) -> Self {
        self.round = round;
        self
    }

    /// Whether this opinion may count toward agreement.
    pub fn is_usable(&self) -> bool {
        self.confidence > 0.0
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_opinion_shape() {
        let opinion = Opinion::error(Specialty::Oncology, "model unavailable");
        assert_eq!(opinion.confidence, 0.0);
        assert!(opinion.summary.contains("model unavailable"));
        assert!(opinion.diagnoses.is_empty());
        assert!(opinion.is_error());
        assert!(!opinion.is_usable());
    }

    #[test]
    fn test_confidence_clamped() {
        let opinion = Opinion::new(Specialty::Cardiology, "ok").with_confidence(1.4);
        assert_eq!(opinion.confidence, 1.0);
        let opinion = Opinion::new(Specialty::Cardiology, "ok").with_confidence(f64::NAN);
        assert_eq!(opinion.confidence, 0.0);
    }

    #[test]
    fn test_risk_level_lenient_parse() {
        assert_eq!(RiskLevel::parse_lenient(" HIGH "), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse_lenient("moderate"), Some(RiskLevel::Medium));
        assert_eq!(RiskLevel::parse_lenient("unclear"), None);
    }

    #[test]
    fn test_serialized_error_field_is_optional() {
        let opinion = Opinion::new(Specialty::Radiology, "clear").with_confidence(0.7);
        let json = serde_json::to_value(&opinion).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["risk_level"], "medium");
    }
}
