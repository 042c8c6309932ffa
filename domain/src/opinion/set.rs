//! Opinion Set and Opinion History

use super::entities::Opinion;
use crate::specialty::Specialty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live opinion per specialty.
///
/// Backed by a `BTreeMap` keyed on [`Specialty`], so iteration always follows
/// specialty declaration order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpinionSet {
    opinions: BTreeMap<Specialty, Opinion>,
}

impl OpinionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an opinion, replacing any previous one for the same specialty.
    pub fn insert(&mut self, opinion: Opinion) -> Option<Opinion> {
        self.opinions.insert(opinion.specialty, opinion)
    }

    pub fn get(&self, specialty: Specialty) -> Option<&Opinion> {
        self.opinions.get(&specialty)
    }

    pub fn contains(&self, specialty: Specialty) -> bool {
        self.opinions.contains_key(&specialty)
    }

    pub fn len(&self) -> usize {
        self.opinions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opinions.is_empty()
    }

    /// Opinions in specialty declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Opinion> {
        self.opinions.values()
    }

    pub fn specialties(&self) -> impl Iterator<Item = Specialty> + '_ {
        self.opinions.keys().copied()
    }

    /// Opinions with non-zero confidence.
    pub fn usable(&self) -> impl Iterator<Item = &Opinion> {
        self.iter().filter(|o| o.is_usable())
    }

    pub fn usable_count(&self) -> usize {
        self.usable().count()
    }

    /// Every opinion except the one belonging to `specialty`.
    pub fn peers_of(&self, specialty: Specialty) -> Vec<Opinion> {
        self.iter()
            .filter(|o| o.specialty != specialty)
            .cloned()
            .collect()
    }
}

impl FromIterator<Opinion> for OpinionSet {
    fn from_iter<I: IntoIterator<Item = Opinion>>(iter: I) -> Self {
        let mut set = OpinionSet::new();
        for opinion in iter {
            set.insert(opinion);
        }
        set
    }
}

impl<'a> IntoIterator for &'a OpinionSet {
    type Item = &'a Opinion;
    type IntoIter = std::collections::btree_map::Values<'a, Specialty, Opinion>;

    fn into_iter(self) -> Self::IntoIter {
        self.opinions.values()
    }
}

/// Every Opinion Set a debate went through; index 0 is the seeded set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpinionHistory {
    rounds: Vec<OpinionSet>,
}

impl OpinionHistory {
    /// Start a history from the seeded (round 0) set.
    pub fn seeded(seed: OpinionSet) -> Self {
        Self { rounds: vec![seed] }
    }

    pub fn push(&mut self, set: OpinionSet) {
        self.rounds.push(set);
    }

    pub fn rounds(&self) -> &[OpinionSet] {
        &self.rounds
    }

    /// Number of completed revision rounds (excludes the seed).
    pub fn revision_count(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }

    pub fn latest(&self) -> Option<&OpinionSet> {
        self.rounds.last()
    }

    /// Every opinion a specialty held, oldest first.
    pub fn trail(&self, specialty: Specialty) -> Vec<&Opinion> {
        self.rounds.iter().filter_map(|set| set.get(specialty)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opinion(specialty: Specialty, confidence: f64) -> Opinion {
        Opinion::new(specialty, format!("{} view", specialty)).with_confidence(confidence)
    }

    #[test]
    fn test_iteration_follows_declaration_order() {
        let set: OpinionSet = vec![
            opinion(Specialty::Radiology, 0.6),
            opinion(Specialty::Cardiology, 0.8),
        ]
        .into_iter()
        .collect();

        let order: Vec<Specialty> = set.specialties().collect();
        assert_eq!(order, vec![Specialty::Cardiology, Specialty::Radiology]);
    }

    #[test]
    fn test_one_live_opinion_per_specialty() {
        let mut set = OpinionSet::new();
        set.insert(opinion(Specialty::Oncology, 0.4));
        let previous = set.insert(opinion(Specialty::Oncology, 0.9).in_round(1));
        assert_eq!(set.len(), 1);
        assert_eq!(previous.unwrap().confidence, 0.4);
        assert_eq!(set.get(Specialty::Oncology).unwrap().round, 1);
    }

    #[test]
    fn test_peers_exclude_self() {
        let set: OpinionSet = Specialty::ALL.into_iter().map(|s| opinion(s, 0.5)).collect();
        let peers = set.peers_of(Specialty::Oncology);
        assert_eq!(peers.len(), 2);
        assert!(peers.iter().all(|p| p.specialty != Specialty::Oncology));
    }

    #[test]
    fn test_usable_skips_zero_confidence() {
        let set: OpinionSet = vec![
            opinion(Specialty::Cardiology, 0.8),
            Opinion::error(Specialty::Oncology, "timeout"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.usable_count(), 1);
    }

    #[test]
    fn test_history_trail() {
        let seed: OpinionSet = vec![opinion(Specialty::Cardiology, 0.5)].into_iter().collect();
        let mut history = OpinionHistory::seeded(seed);
        history.push(
            vec![opinion(Specialty::Cardiology, 0.7).in_round(1)]
                .into_iter()
                .collect(),
        );
        assert_eq!(history.revision_count(), 1);
        let trail = history.trail(Specialty::Cardiology);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].round, 1);
    }

    #[test]
    fn test_set_serializes_as_map() {
        let set: OpinionSet = vec![opinion(Specialty::Cardiology, 0.8)].into_iter().collect();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("cardiology").is_some());
    }
}
