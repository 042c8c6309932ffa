//! Complexity scoring.

use super::tier::Tier;
use crate::core::error::DomainError;
use crate::util::contains_any;
use serde::{Deserialize, Serialize};

/// A category of case difficulty detected from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexitySignal {
    /// Several conditions or complications at once
    MultipleConditions,
    /// Rare or atypical presentation
    RareCondition,
    /// Imaging is part of the work-up
    ImagingRequired,
}

impl ComplexitySignal {
    pub const ALL: [ComplexitySignal; 3] = [
        ComplexitySignal::MultipleConditions,
        ComplexitySignal::RareCondition,
        ComplexitySignal::ImagingRequired,
    ];

    /// Score contribution when the signal is present. All weights are positive.
    pub fn weight(&self) -> f64 {
        match self {
            ComplexitySignal::MultipleConditions => 0.3,
            ComplexitySignal::RareCondition => 0.5,
            ComplexitySignal::ImagingRequired => 0.4,
        }
    }

    pub fn terms(&self) -> &'static [&'static str] {
        match self {
            ComplexitySignal::MultipleConditions => &[
                "multiple",
                "complex",
                "complications",
                "多发",
                "多种",
                "并发症",
            ],
            ComplexitySignal::RareCondition => {
                &["rare", "unusual", "atypical", "罕见", "少见", "不典型"]
            }
            ComplexitySignal::ImagingRequired => {
                &["ct", "mri", "imaging", "scan", "影像", "扫描"]
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexitySignal::MultipleConditions => "multiple_conditions",
            ComplexitySignal::RareCondition => "rare_condition",
            ComplexitySignal::ImagingRequired => "imaging_required",
        }
    }

    /// Whether the lower-cased `text` carries this signal.
    pub fn detect(&self, text: &str) -> bool {
        contains_any(text, self.terms())
    }
}

impl std::fmt::Display for ComplexitySignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized case difficulty, always in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplexityScore(f64);

impl ComplexityScore {
    /// Clamp into `[0, 1]`; NaN becomes 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for ComplexityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Routing band of a complexity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityBand {
    Simple,
    Medium,
    Complex,
}

impl ComplexityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityBand::Simple => "simple",
            ComplexityBand::Medium => "medium",
            ComplexityBand::Complex => "complex",
        }
    }

    /// Tier each band is dispatched to.
    pub fn tier(&self) -> Tier {
        match self {
            ComplexityBand::Simple => Tier::Local,
            ComplexityBand::Medium => Tier::Hybrid,
            ComplexityBand::Complex => Tier::Remote,
        }
    }
}

impl std::fmt::Display for ComplexityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Band boundaries: simple `[0, simple)`, medium `[simple, medium)`,
/// complex `[medium, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityBounds {
    simple: f64,
    medium: f64,
}

impl ComplexityBounds {
    pub fn new(simple: f64, medium: f64) -> Result<Self, DomainError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(simple) || !in_unit(medium) || simple > medium {
            return Err(DomainError::InvalidBounds { simple, medium });
        }
        Ok(Self { simple, medium })
    }

    pub fn simple(&self) -> f64 {
        self.simple
    }

    pub fn medium(&self) -> f64 {
        self.medium
    }

    pub fn band(&self, score: ComplexityScore) -> ComplexityBand {
        let value = score.value();
        if value < self.simple {
            ComplexityBand::Simple
        } else if value < self.medium {
            ComplexityBand::Medium
        } else {
            ComplexityBand::Complex
        }
    }
}

impl Default for ComplexityBounds {
    fn default() -> Self {
        Self {
            simple: 0.3,
            medium: 0.7,
        }
    }
}

/// Score plus the signals that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAssessment {
    pub score: ComplexityScore,
    pub signals: Vec<ComplexitySignal>,
}

impl ComplexityAssessment {
    pub fn from_signals(signals: Vec<ComplexitySignal>) -> Self {
        let raw: f64 = signals.iter().map(ComplexitySignal::weight).sum();
        Self {
            score: ComplexityScore::new(raw),
            signals,
        }
    }

    pub fn band(&self, bounds: &ComplexityBounds) -> ComplexityBand {
        bounds.band(self.score)
    }
}

/// Score a textual case projection.
///
/// Each signal category counts at most once however many of its terms match.
pub fn assess_complexity(text: &str) -> ComplexityAssessment {
    let lowered = text.to_lowercase();
    let signals = ComplexitySignal::ALL
        .into_iter()
        .filter(|signal| signal.detect(&lowered))
        .collect();
    ComplexityAssessment::from_signals(signals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_case_is_zero() {
        let assessment = assess_complexity("Mild headache since yesterday");
        assert_eq!(assessment.score.value(), 0.0);
        assert!(assessment.signals.is_empty());
    }

    #[test]
    fn test_imaging_weight_included() {
        let assessment = assess_complexity("Tumor seen on CT scan");
        assert_eq!(assessment.signals, vec![ComplexitySignal::ImagingRequired]);
        assert!((assessment.score.value() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_clamped() {
        let assessment =
            assess_complexity("Multiple complications, rare presentation, MRI pending");
        assert_eq!(assessment.signals.len(), 3);
        assert_eq!(assessment.score.value(), 1.0);
    }

    #[test]
    fn test_adding_signal_never_lowers_score() {
        let texts = [
            "chest pain",
            "chest pain, multiple lesions",
            "chest pain, multiple lesions, atypical course",
            "chest pain, multiple lesions, atypical course, MRI",
        ];
        let scores: Vec<f64> = texts
            .iter()
            .map(|t| assess_complexity(t).score.value())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_chinese_terms() {
        let assessment = assess_complexity("罕见病例，需影像检查");
        assert_eq!(
            assessment.signals,
            vec![ComplexitySignal::RareCondition, ComplexitySignal::ImagingRequired]
        );
    }

    #[test]
    fn test_short_terms_need_word_boundaries() {
        assert!(assess_complexity("doctor notes acute infarction").signals.is_empty());
    }

    #[test]
    fn test_plural_imaging_abbreviations_count() {
        for text in ["MRIs and CTs ordered", "CTA of the chest"] {
            assert_eq!(
                assess_complexity(text).signals,
                vec![ComplexitySignal::ImagingRequired],
                "{text}"
            );
        }
    }

    #[test]
    fn test_bands() {
        let bounds = ComplexityBounds::default();
        assert_eq!(bounds.band(ComplexityScore::new(0.2)), ComplexityBand::Simple);
        assert_eq!(bounds.band(ComplexityScore::new(0.3)), ComplexityBand::Medium);
        assert_eq!(bounds.band(ComplexityScore::new(0.5)), ComplexityBand::Medium);
        assert_eq!(bounds.band(ComplexityScore::new(0.7)), ComplexityBand::Complex);
        assert_eq!(bounds.band(ComplexityScore::new(0.9)), ComplexityBand::Complex);
        assert_eq!(ComplexityBand::Medium.tier(), Tier::Hybrid);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(ComplexityBounds::new(0.8, 0.5).is_err());
        assert!(ComplexityBounds::new(-0.1, 0.5).is_err());
        assert!(ComplexityBounds::new(0.3, 1.5).is_err());
        assert!(ComplexityBounds::new(0.4, 0.4).is_ok());
    }
}
