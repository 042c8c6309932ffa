//! Opinion parsing from model responses.
//!
//! Producers ask for a JSON object; models do not always comply. Parsing is
//! therefore lenient:
//!
//! 1. ` ```json ` (or bare ` ``` `) fenced blocks
//! 2. The entire response as JSON
//! 3. The outermost `{ ... }` span
//! 4. Otherwise the whole text becomes the summary with [`DEFAULT_CONFIDENCE`]
//!
//! An empty response is unusable and yields an error opinion.

use super::entities::{Opinion, RiskLevel};
use crate::case::{CaseRecord, PatientInfo, StructuredCase};
use crate::routing::ComplexityAssessment;
use crate::specialty::Specialty;
use crate::sync::PreliminaryAssessment;
use serde_json::Value;

/// Confidence assumed when a response does not state one.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Parse a specialist response into an [`Opinion`].
pub fn parse_opinion(specialty: Specialty, round: usize, response: &str) -> Opinion {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Opinion::error(specialty, "empty model response").in_round(round);
    }

    let fields = parse_fields(trimmed);
    Opinion::new(specialty, fields.summary)
        .with_diagnoses(fields.diagnoses)
        .with_recommendations(fields.recommendations)
        .with_risk(fields.risk)
        .with_confidence(fields.confidence)
        .in_round(round)
}

/// Parse a local-tier response into a [`PreliminaryAssessment`].
///
/// Escalation is decided from `complexity`, not from the response.
pub fn parse_preliminary(response: &str, complexity: ComplexityAssessment) -> PreliminaryAssessment {
    let escalation_recommended = PreliminaryAssessment::needs_escalation(&complexity);
    let trimmed = response.trim();
    let mut fields = if trimmed.is_empty() {
        OpinionFields {
            summary: "Local analysis returned no content".to_string(),
            confidence: 0.0,
            ..OpinionFields::default()
        }
    } else {
        parse_fields(trimmed)
    };

    if escalation_recommended {
        fields
            .recommendations
            .push("Escalate to the remote tier for detailed specialist analysis".to_string());
    }

    PreliminaryAssessment {
        summary: fields.summary,
        diagnoses: fields.diagnoses,
        recommendations: fields.recommendations,
        confidence: fields.confidence,
        complexity,
        escalation_recommended,
    }
}

#[derive(Default)]
struct OpinionFields {
    summary: String,
    diagnoses: Vec<String>,
    recommendations: Vec<String>,
    risk: RiskLevel,
    confidence: f64,
}

/// JSON fields when present, otherwise the whole text as summary.
fn parse_fields(trimmed: &str) -> OpinionFields {
    let Some(json) = extract_json(trimmed).filter(Value::is_object) else {
        return OpinionFields {
            summary: trimmed.to_string(),
            confidence: DEFAULT_CONFIDENCE,
            ..OpinionFields::default()
        };
    };

    OpinionFields {
        summary: json
            .get("summary")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
        diagnoses: string_list(json.get("diagnoses")),
        recommendations: string_list(json.get("recommendations")),
        risk: json
            .get("risk_level")
            .or_else(|| json.get("risk"))
            .and_then(Value::as_str)
            .and_then(RiskLevel::parse_lenient)
            .unwrap_or_default(),
        confidence: json
            .get("confidence")
            .and_then(parse_confidence)
            .unwrap_or(DEFAULT_CONFIDENCE),
    }
}

/// Parse a structuring response into a [`StructuredCase`].
///
/// Falls back to a raw projection whose summary is the response text when no
/// JSON object is found. An empty response yields a degraded projection.
pub fn parse_structured_case(case: &CaseRecord, response: &str) -> StructuredCase {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return StructuredCase::degraded(case, "empty model response");
    }

    let Some(json) = extract_json(trimmed).filter(Value::is_object) else {
        return StructuredCase {
            summary: trimmed.to_string(),
            ..StructuredCase::from_raw(case)
        };
    };

    let patient = json
        .get("patient_info")
        .map(parse_patient)
        .unwrap_or_default();

    StructuredCase {
        patient,
        chief_complaint: json
            .get("chief_complaint")
            .map(value_to_text)
            .unwrap_or_default(),
        medical_history: string_list(json.get("medical_history")),
        examination_results: string_list(json.get("examination_results")),
        current_medications: string_list(json.get("current_medications")),
        summary: json
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        ..StructuredCase::from_raw(case)
    }
}

/// Locate a JSON value inside free-form model output.
pub fn extract_json(text: &str) -> Option<Value> {
    let mut in_block = false;
    let mut block = String::new();
    for line in text.lines() {
        let marker = line.trim();
        if !in_block && (marker == "```json" || marker == "```") {
            in_block = true;
            block.clear();
        } else if in_block && marker == "```" {
            in_block = false;
            if let Ok(value) = serde_json::from_str::<Value>(&block) {
                return Some(value);
            }
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end]).ok()
}

/// Numbers in (1, 100] are read as percentages.
fn parse_confidence(value: &Value) -> Option<f64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let normalized = if raw > 1.0 && raw <= 100.0 {
        raw / 100.0
    } else {
        raw
    };
    Some(normalized.clamp(0.0, 1.0))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => s
            .split(['\n', ';'])
            .map(|part| part.trim().trim_start_matches(['-', '*']).trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("diagnosis"))
            .map(value_to_text)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

fn parse_patient(value: &Value) -> PatientInfo {
    let Value::Object(map) = value else {
        return PatientInfo::default();
    };
    let age = map.get("age").and_then(|v| match v {
        Value::Number(n) => n.as_u64().and_then(|a| u32::try_from(a).ok()),
        Value::String(s) => s
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok(),
        _ => None,
    });
    let text = |key: &str| {
        map.get(key)
            .map(value_to_text)
            .filter(|s| !s.is_empty())
    };

    PatientInfo {
        id: text("id"),
        age,
        gender: text("gender"),
    }
}
