//! Case record value objects.
//!
//! A [`CaseRecord`] is produced once by the extraction collaborator and never
//! changes afterwards. The structuring producer turns it into a
//! [`StructuredCase`], which is what the specialty selector and specialists see.

use serde::{Deserialize, Serialize};

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Raw extracted case text plus an optional structured projection (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    raw_text: String,
    extraction_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    structured: Option<StructuredCase>,
}

impl CaseRecord {
    /// Create a record from extracted text; confidence is clamped to [0, 1].
    pub fn new(raw_text: impl Into<String>, extraction_confidence: f64) -> Self {
        Self {
            raw_text: raw_text.into(),
            extraction_confidence: clamp_unit(extraction_confidence),
            structured: None,
        }
    }

    /// Zero-confidence record standing in for a failed extraction.
    pub fn failed_extraction() -> Self {
        Self::new(String::new(), 0.0)
    }

    /// Attach a structured projection produced alongside the text.
    pub fn with_structured(mut self, structured: StructuredCase) -> Self {
        self.structured = Some(structured);
        self
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn extraction_confidence(&self) -> f64 {
        self.extraction_confidence
    }

    pub fn structured(&self) -> Option<&StructuredCase> {
        self.structured.as_ref()
    }

    /// Lower-cased textual projection used for keyword matching.
    pub fn search_text(&self) -> String {
        match &self.structured {
            Some(structured) => {
                format!("{}\n{}", self.raw_text.to_lowercase(), structured.search_text())
            }
            None => self.raw_text.to_lowercase(),
        }
    }
}

/// Basic patient attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.age.is_none() && self.gender.is_none()
    }
}

impl std::fmt::Display for PatientInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "unknown");
        }
        let mut parts = Vec::new();
        if let Some(id) = &self.id {
            parts.push(format!("id {}", id));
        }
        if let Some(age) = self.age {
            parts.push(format!("age {}", age));
        }
        if let Some(gender) = &self.gender {
            parts.push(gender.clone());
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Structured projection of a case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredCase {
    pub patient: PatientInfo,
    pub chief_complaint: String,
    pub medical_history: Vec<String>,
    pub examination_results: Vec<String>,
    pub current_medications: Vec<String>,
    /// Free-text summary returned by the structuring producer
    pub summary: String,
    /// The raw text this projection was derived from
    pub raw_text: String,
    /// Confidence in the projection (0.0 = structuring or extraction failed)
    pub confidence: f64,
}

impl StructuredCase {
    /// Minimal projection carrying only the raw text.
    pub fn from_raw(case: &CaseRecord) -> Self {
        Self {
            raw_text: case.raw_text().to_string(),
            confidence: case.extraction_confidence(),
            ..Default::default()
        }
    }

    /// Degraded projection used when structuring failed.
    pub fn degraded(case: &CaseRecord, reason: impl Into<String>) -> Self {
        Self {
            raw_text: case.raw_text().to_string(),
            summary: format!("Structuring failed: {}", reason.into()),
            confidence: 0.0,
            ..Default::default()
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_unit(confidence);
        self
    }

    /// Whether the projection carries any usable content.
    pub fn is_empty(&self) -> bool {
        self.chief_complaint.trim().is_empty()
            && self.medical_history.is_empty()
            && self.examination_results.is_empty()
            && self.summary.trim().is_empty()
            && self.raw_text.trim().is_empty()
    }

    /// Lower-cased concatenation of every textual field.
    pub fn search_text(&self) -> String {
        let mut text = String::new();
        for part in [
            self.patient.to_string().as_str(),
            &self.chief_complaint,
            &self.summary,
            &self.raw_text,
        ] {
            text.push_str(part);
            text.push('\n');
        }
        for item in self
            .medical_history
            .iter()
            .chain(&self.examination_results)
            .chain(&self.current_medications)
        {
            text.push_str(item);
            text.push('\n');
        }
        text.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(CaseRecord::new("x", 1.7).extraction_confidence(), 1.0);
        assert_eq!(CaseRecord::new("x", -0.2).extraction_confidence(), 0.0);
        assert_eq!(CaseRecord::new("x", f64::NAN).extraction_confidence(), 0.0);
    }

    #[test]
    fn test_failed_extraction_is_zero_confidence() {
        let case = CaseRecord::failed_extraction();
        assert_eq!(case.extraction_confidence(), 0.0);
        assert!(case.raw_text().is_empty());
    }

    #[test]
    fn test_search_text_is_lowercase_and_includes_projection() {
        let structured = StructuredCase {
            chief_complaint: "Chest Pain".to_string(),
            examination_results: vec!["ECG abnormal".to_string()],
            ..Default::default()
        };
        let case = CaseRecord::new("Patient SEEN today", 0.9).with_structured(structured);
        let text = case.search_text();
        assert!(text.contains("patient seen today"));
        assert!(text.contains("chest pain"));
        assert!(text.contains("ecg abnormal"));
    }

    #[test]
    fn test_degraded_projection() {
        let case = CaseRecord::new("raw", 0.8);
        let projection = StructuredCase::degraded(&case, "timeout");
        assert_eq!(projection.confidence, 0.0);
        assert_eq!(projection.raw_text, "raw");
        assert!(projection.summary.contains("timeout"));
    }

    #[test]
    fn test_patient_display() {
        let patient = PatientInfo {
            id: None,
            age: Some(65),
            gender: Some("male".to_string()),
        };
        assert_eq!(patient.to_string(), "age 65, male");
        assert_eq!(PatientInfo::default().to_string(), "unknown");
    }
}
