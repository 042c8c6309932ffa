//! Keyword-taxonomy specialty selection.

use super::Specialty;
use crate::case::StructuredCase;
use crate::util::contains_any;

/// Picks the specialties relevant to a structured case.
///
/// Deterministic: a specialty is selected when the lower-cased projection
/// contains any of its trigger terms. When nothing triggers, the configured
/// default specialty is returned so the consultation is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialtySelector {
    default_specialty: Specialty,
}

impl Default for SpecialtySelector {
    fn default() -> Self {
        Self::new(Specialty::Cardiology)
    }
}

impl SpecialtySelector {
    pub fn new(default_specialty: Specialty) -> Self {
        Self { default_specialty }
    }

    pub fn default_specialty(&self) -> Specialty {
        self.default_specialty
    }

    /// Select specialties for a structured case, in declaration order.
    pub fn select(&self, case: &StructuredCase) -> Vec<Specialty> {
        self.select_text(&case.search_text())
    }

    /// Select specialties for arbitrary text, in declaration order.
    pub fn select_text(&self, text: &str) -> Vec<Specialty> {
        let lower = text.to_lowercase();
        let selected: Vec<Specialty> = Specialty::ALL
            .into_iter()
            .filter(|s| Self::triggers(*s, &lower))
            .collect();

        if selected.is_empty() {
            vec![self.default_specialty]
        } else {
            selected
        }
    }

    /// Whether lower-cased `text` triggers `specialty`.
    pub fn triggers(specialty: Specialty, text: &str) -> bool {
        contains_any(text, specialty.profile().trigger_terms)
    }
}
