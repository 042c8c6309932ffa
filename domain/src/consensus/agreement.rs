//! Agreement measure between opinions.
//!
//! Agreement is the confidence-weighted mean of pairwise Jaccard overlaps of
//! the normalized diagnosis-candidate sets of every usable opinion pair. Each
//! pair is weighted by the product of its two confidences.

use crate::opinion::{Opinion, OpinionSet};
use std::collections::BTreeSet;

/// Canonical form used when comparing diagnosis candidates.
///
/// Lower-cases, collapses internal whitespace and drops trailing punctuation,
/// so `"Acute  MI."` and `"acute mi"` compare equal.
pub fn normalize_candidate(candidate: &str) -> String {
    candidate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', ',', ';', ':', '。', '，', '；'])
        .to_lowercase()
}

/// Jaccard overlap of two diagnosis lists after normalization.
///
/// Two empty lists agree fully; one empty list against a non-empty one does
/// not agree at all.
pub fn pairwise_overlap(a: &[String], b: &[String]) -> f64 {
    let left = normalized_set(a);
    let right = normalized_set(b);
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }
    let shared = left.intersection(&right).count() as f64;
    let total = left.union(&right).count() as f64;
    shared / total
}

/// Agreement across the usable opinions of a set, in `[0, 1]`.
///
/// Fewer than two usable opinions means there is nobody to disagree with,
/// so the score is `1.0`.
pub fn agreement_score(set: &OpinionSet) -> f64 {
    let usable: Vec<&Opinion> = set.usable().collect();
    if usable.len() < 2 {
        return 1.0;
    }

    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for (i, left) in usable.iter().enumerate() {
        for right in &usable[i + 1..] {
            let weight = left.confidence * right.confidence;
            weighted += weight * pairwise_overlap(&left.diagnoses, &right.diagnoses);
            weight_sum += weight;
        }
    }

    if weight_sum <= 0.0 {
        return 1.0;
    }
    (weighted / weight_sum).clamp(0.0, 1.0)
}

fn normalized_set(items: &[String]) -> BTreeSet<String> {
    items
        .iter()
        .map(|item| normalize_candidate(item))
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::specialty::Specialty;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn opinion(specialty: Specialty, diagnoses: &[&str], confidence: f64) -> Opinion {
        Opinion::new(specialty, "summary")
            .with_diagnoses(strings(diagnoses))
            .with_confidence(confidence)
    }

    #[test]
    fn test_normalize_candidate() {
        assert_eq!(normalize_candidate("  Acute   MI. "), "acute mi");
        assert_eq!(normalize_candidate("冠心病。"), "冠心病");
    }

    #[test]
    fn test_pairwise_overlap() {
        let a = strings(&["Angina", "Hypertension"]);
        let b = strings(&["angina", "Diabetes"]);
        assert!((pairwise_overlap(&a, &b) - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(pairwise_overlap(&[], &[]), 1.0);
        assert_eq!(pairwise_overlap(&a, &[]), 0.0);
    }

    #[test]
    fn test_identical_diagnoses_fully_agree() {
        let set: OpinionSet = vec![
            opinion(Specialty::Cardiology, &["Angina"], 0.9),
            opinion(Specialty::Radiology, &["angina."], 0.7),
        ]
        .into_iter()
        .collect();
        assert!((agreement_score(&set) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_error_opinions_are_ignored() {
        let set: OpinionSet = vec![
            opinion(Specialty::Cardiology, &["Angina"], 0.9),
            Opinion::error(Specialty::Oncology, "timeout"),
        ]
        .into_iter()
        .collect();
        assert_eq!(agreement_score(&set), 1.0);
    }

    #[test]
    fn test_weighting_favours_confident_pairs() {
        let set: OpinionSet = vec![
            opinion(Specialty::Cardiology, &["Angina"], 0.9),
            opinion(Specialty::Oncology, &["Angina"], 0.9),
            opinion(Specialty::Radiology, &["Fracture"], 0.1),
        ]
        .into_iter()
        .collect();
        // pairs: (c,o)=1.0 w .81, (c,r)=0 w .09, (o,r)=0 w .09
        let expected = 0.81 / (0.81 + 0.09 + 0.09);
        assert!((agreement_score(&set) - expected).abs() < 1e-9);
    }
}
