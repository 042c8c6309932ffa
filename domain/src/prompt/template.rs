//! Prompt templates for the diagnosis flow

use crate::case::{CaseRecord, StructuredCase};
use crate::opinion::Opinion;
use crate::specialty::SpecialtyProfile;
use crate::sync::LocalAnalysis;

const OPINION_FORMAT: &str = r#"Respond with a JSON object:
```json
{
  "summary": "one paragraph assessment",
  "diagnoses": ["most likely first"],
  "recommendations": ["concrete next steps"],
  "risk_level": "low | medium | high",
  "confidence": 0.0
}
```"#;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the structuring producer
    pub fn structuring_system() -> &'static str {
        r#"You are an experienced medical record analyst. Your task is to extract
structured information from medical documents including:
1. Patient basic information (age, gender, ID)
2. Chief complaint and present illness history
3. Past medical history
4. Examination results
5. Current medications

Output the information in a clear, structured JSON format."#
    }

    /// User prompt for structuring a raw case
    pub fn structuring_prompt(case: &CaseRecord) -> String {
        format!(
            r#"Please analyze the following medical record and extract structured information:

{}

Provide the output in JSON format with keys: patient_info, chief_complaint,
medical_history, examination_results, current_medications."#,
            case.raw_text()
        )
    }

    /// User prompt for an initial specialist consultation
    pub fn specialist_prompt(profile: &SpecialtyProfile, case: &StructuredCase) -> String {
        format!(
            r#"Patient case for {} consultation:

Patient Information: {}
Chief Complaint: {}
Medical History: {}
Examination Results: {}
Current Medications: {}

Please provide your assessment as a {} specialist ({}).

{}"#,
            profile.display_name,
            case.patient,
            or_none(&case.chief_complaint),
            join_or_none(&case.medical_history),
            join_or_none(&case.examination_results),
            join_or_none(&case.current_medications),
            profile.display_name,
            profile.expertise,
            OPINION_FORMAT
        )
    }

    /// User prompt for revising an opinion against peer opinions
    ///
    /// `peers` never contains the reviser's own specialty.
    pub fn revision_prompt(current: &Opinion, peers: &[Opinion]) -> String {
        let mut prompt = format!(
            "Your current assessment:\n{}\n\nBased on the following opinions from other specialists:\n\n",
            current.summary
        );

        for peer in peers {
            prompt.push_str(&format!(
                "**{}**:\n{}\n",
                peer.specialty.display_name(),
                peer.summary
            ));
            if !peer.diagnoses.is_empty() {
                prompt.push_str(&format!("Diagnoses: {}\n", peer.diagnoses.join("; ")));
            }
            prompt.push('\n');
        }

        prompt.push_str(
            "Please revise your analysis considering these perspectives. \
             Maintain your expertise while addressing any conflicts or gaps.\n\n",
        );
        prompt.push_str(OPINION_FORMAT);
        prompt
    }

    /// System prompt for the resource-constrained local model
    pub fn local_system() -> &'static str {
        r#"You are a compact on-device clinical assistant. Give a brief preliminary
assessment only; a specialist team may review your output later.
Keep the summary short and the recommendations practical."#
    }

    /// User prompt for local preliminary analysis
    pub fn local_prompt(case: &StructuredCase) -> String {
        format!(
            "Preliminary review of this case:\n\nPatient: {}\nChief Complaint: {}\nFindings: {}\n\n{}",
            case.patient,
            or_none(&case.chief_complaint),
            join_or_none(&case.examination_results),
            OPINION_FORMAT
        )
    }

    /// Case text handed to remote verification of a local result
    pub fn verification_case_text(analysis: &LocalAnalysis) -> String {
        let mut text = analysis.structured.raw_text.clone();
        text.push_str("\n\nPreliminary local assessment: ");
        text.push_str(&analysis.preliminary.summary);
        if !analysis.preliminary.diagnoses.is_empty() {
            text.push_str("\nPreliminary diagnoses: ");
            text.push_str(&analysis.preliminary.diagnoses.join("; "));
        }
        text
    }
}

fn or_none(s: &str) -> &str {
    if s.trim().is_empty() { "none recorded" } else { s }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none recorded".to_string()
    } else {
        items.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specialty::Specialty;

    #[test]
    fn test_revision_prompt_lists_peers() {
        let current = Opinion::new(Specialty::Cardiology, "Likely angina");
        let peers = vec![
            Opinion::new(Specialty::Radiology, "Cardiomegaly on X-ray")
                .with_diagnoses(vec!["Cardiomegaly".into()]),
        ];
        let prompt = PromptTemplate::revision_prompt(&current, &peers);
        assert!(prompt.contains("Likely angina"));
        assert!(prompt.contains("**Radiology**"));
        assert!(prompt.contains("Diagnoses: Cardiomegaly"));
        assert!(!prompt.contains("**Cardiology**"));
    }

    #[test]
    fn test_specialist_prompt_includes_case() {
        let case = StructuredCase {
            chief_complaint: "Chest pain".into(),
            examination_results: vec!["ECG abnormal".into()],
            ..StructuredCase::default()
        };
        let prompt = PromptTemplate::specialist_prompt(Specialty::Cardiology.profile(), &case);
        assert!(prompt.contains("Chief Complaint: Chest pain"));
        assert!(prompt.contains("ECG abnormal"));
        assert!(prompt.contains("Medical History: none recorded"));
    }

    #[test]
    fn test_structuring_prompt_embeds_raw_text() {
        let case = CaseRecord::new("患者男性，65岁", 0.9);
        assert!(PromptTemplate::structuring_prompt(&case).contains("患者男性，65岁"));
    }
}
