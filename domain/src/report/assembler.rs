use crate::case::StructuredCase;
use crate::consensus::{ConsensusResult, DebateState};
use crate::opinion::{OpinionHistory, OpinionSet};
use crate::orchestration::PhaseTimings;
use crate::specialty::Specialty;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary metadata of a diagnosis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub specialist_count: usize,
    pub confidence: f64,
    pub debate_enabled: bool,
    pub rounds: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination: Option<DebateState>,
}

/// The two rendered views of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportViews {
    pub clinical: String,
    pub plain_language: String,
}

/// Final output of the diagnosis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub case: StructuredCase,
    /// Initial per-specialty opinions
    pub consultations: OpinionSet,
    /// Every Opinion Set up to consensus, seed first
    pub history: OpinionHistory,
    pub consensus: ConsensusResult,
    pub views: ReportViews,
    pub metadata: ReportMetadata,
    /// Declared expertise of each consulted specialist
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub panel: BTreeMap<Specialty, String>,
    #[serde(default)]
    pub timings: PhaseTimings,
}

impl DiagnosticReport {
    /// Opinion Set the consensus was merged from.
    pub fn final_opinions(&self) -> &OpinionSet {
        self.history.latest().unwrap_or(&self.consultations)
    }
}

/// Renders consensus into a [`DiagnosticReport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(
        &self,
        case: StructuredCase,
        history: OpinionHistory,
        consensus: ConsensusResult,
        debate_enabled: bool,
    ) -> DiagnosticReport {
        let consultations = history.rounds().first().cloned().unwrap_or_default();
        let final_set = history.latest().cloned().unwrap_or_default();

        let views = ReportViews {
            clinical: render_clinical(&case, &final_set, &consensus),
            plain_language: render_plain(&consensus),
        };
        let metadata = ReportMetadata {
            specialist_count: consultations.len(),
            confidence: consensus.confidence,
            debate_enabled,
            rounds: consensus.rounds,
            termination: consensus.termination,
        };

        DiagnosticReport {
            case,
            consultations,
            history,
            consensus,
            views,
            metadata,
            panel: BTreeMap::new(),
            timings: PhaseTimings::new(),
        }
    }
}

fn render_clinical(case: &StructuredCase, opinions: &OpinionSet, consensus: &ConsensusResult) -> String {
    let mut lines = vec![
        "# Diagnostic Report (Clinical)".to_string(),
        String::new(),
        "## Patient".to_string(),
        format!("{}", case.patient),
    ];
    if !case.chief_complaint.is_empty() {
        lines.push(format!("Chief complaint: {}", case.chief_complaint));
    }

    lines.push(String::new());
    lines.push("## Specialist Consultations".to_string());
    for opinion in opinions {
        lines.push(String::new());
        lines.push(format!(
            "### {} (risk: {}, confidence: {:.0}%)",
            opinion.specialty.display_name(),
            opinion.risk_level,
            opinion.confidence * 100.0
        ));
        lines.push(opinion.summary.clone());
    }

    lines.push(String::new());
    lines.push("## Consensus".to_string());
    lines.push(format!("Confidence: {:.1}%", consensus.confidence * 100.0));
    if let Some(state) = consensus.termination {
        lines.push(format!("Debate: {}", state));
    }
    for diagnosis in &consensus.diagnoses {
        lines.push(format!("- {}", diagnosis));
    }

    lines.push(String::new());
    lines.push("## Recommendations".to_string());
    if consensus.recommendations.is_empty() {
        lines.push("- Follow-up as clinically indicated".to_string());
    }
    for recommendation in &consensus.recommendations {
        lines.push(format!("- {}", recommendation));
    }

    lines.join("\n")
}

fn render_plain(consensus: &ConsensusResult) -> String {
    let mut lines = vec![
        "# Your Health Report".to_string(),
        String::new(),
        "## What We Found".to_string(),
        "Our team of specialists has reviewed your case.".to_string(),
    ];
    if let Some(first) = consensus.diagnoses.first() {
        lines.push(format!("The main finding discussed was: {}.", first));
    }

    lines.push(String::new());
    lines.push("## What You Need to Do".to_string());
    let steps: Vec<&str> = if consensus.recommendations.is_empty() {
        vec![
            "Follow the prescribed treatment plan",
            "Schedule a follow-up appointment",
            "Monitor your symptoms",
        ]
    } else {
        consensus.recommendations.iter().map(String::as_str).collect()
    };
    for (i, step) in steps.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, step));
    }

    lines.push(String::new());
    lines.push("## Questions?".to_string());
    lines.push("Please contact your healthcare provider for any concerns.".to_string());
    lines.join("\n")
}
