//! Specialty profile table.
//!
//! One row per [`Specialty`]: trigger terms, system prompt, model identifier
//! and a short expertise description. Trigger terms are bilingual; a match on
//! any synonym triggers the specialty.

use super::Specialty;
use crate::core::model::Model;

/// Static description of a specialty
#[derive(Debug)]
pub struct SpecialtyProfile {
    pub specialty: Specialty,
    pub display_name: &'static str,
    /// Lower-case trigger terms (English and Chinese synonyms)
    pub trigger_terms: &'static [&'static str],
    pub system_prompt: &'static str,
    pub model_id: &'static str,
    pub expertise: &'static str,
}

impl SpecialtyProfile {
    pub fn model(&self) -> Model {
        let Ok(model) = self.model_id.parse::<Model>();
        model
    }
}

static PROFILES: [SpecialtyProfile; 3] = [
    SpecialtyProfile {
        specialty: Specialty::Cardiology,
        display_name: "Cardiology",
        trigger_terms: &[
            "heart",
            "cardiac",
            "chest pain",
            "ecg",
            "ekg",
            "hypertension",
            "arrhythmia",
            "心脏",
            "胸痛",
            "胸闷",
            "心电图",
            "高血压",
        ],
        system_prompt: "You are a cardiology specialist with expertise in cardiovascular diseases.\n\
Analyze cases for:\n\
- Coronary artery disease\n\
- Heart failure\n\
- Arrhythmias\n\
- Hypertension\n\
- ECG interpretation\n\
\n\
Provide evidence-based recommendations following current guidelines.",
        model_id: "ernie-cardiology",
        expertise: "Coronary artery disease, heart failure, arrhythmias, hypertension and ECG interpretation",
    },
    SpecialtyProfile {
        specialty: Specialty::Oncology,
        display_name: "Oncology",
        trigger_terms: &[
            "tumor",
            "tumour",
            "cancer",
            "malignant",
            "carcinoma",
            "chemotherapy",
            "metastasis",
            "肿瘤",
            "癌",
            "化疗",
        ],
        system_prompt: "You are an oncology specialist with expertise in cancer diagnosis and treatment.\n\
Analyze cases for:\n\
- Tumor staging\n\
- Pathology report interpretation\n\
- Treatment options (surgery, chemo, radiation)\n\
- Prognosis assessment\n\
\n\
Provide comprehensive cancer care recommendations.",
        model_id: "ernie-oncology",
        expertise: "Tumor staging, pathology interpretation, treatment options and prognosis",
    },
    SpecialtyProfile {
        specialty: Specialty::Radiology,
        display_name: "Radiology",
        trigger_terms: &[
            "ct",
            "mri",
            "x-ray",
            "xray",
            "imaging",
            "scan",
            "ultrasound",
            "影像",
            "扫描",
            "超声",
        ],
        system_prompt: "You are a radiology specialist expert in medical imaging interpretation.\n\
Analyze imaging reports for:\n\
- CT/MRI findings\n\
- X-ray abnormalities\n\
- Ultrasound results\n\
- Location and severity of abnormalities\n\
\n\
Provide detailed imaging analysis and follow-up recommendations.",
        model_id: "ernie-radiology",
        expertise: "CT, MRI, X-ray and ultrasound findings with follow-up recommendations",
    },
];

/// Look up the table row for a specialty
pub fn profile_of(specialty: Specialty) -> &'static SpecialtyProfile {
    PROFILES
        .iter()
        .find(|p| p.specialty == specialty)
        .unwrap_or(&PROFILES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_specialty_has_a_row() {
        for specialty in Specialty::ALL {
            assert_eq!(profile_of(specialty).specialty, specialty);
        }
    }

    #[test]
    fn test_trigger_terms_are_lowercase() {
        for specialty in Specialty::ALL {
            for term in specialty.profile().trigger_terms {
                assert_eq!(*term, term.to_lowercase());
            }
        }
    }

    #[test]
    fn test_profiles_are_bilingual() {
        for specialty in Specialty::ALL {
            let terms = specialty.profile().trigger_terms;
            assert!(terms.iter().any(|t| t.is_ascii()));
            assert!(terms.iter().any(|t| !t.is_ascii()));
        }
    }

    #[test]
    fn test_profile_models() {
        assert_eq!(Specialty::Cardiology.profile().model(), Model::ErnieCardiology);
        assert_eq!(Specialty::Oncology.profile().model(), Model::ErnieOncology);
        assert_eq!(Specialty::Radiology.profile().model(), Model::ErnieRadiology);
    }
}
