//! Console output formatter for diagnosis and routing results

use colored::Colorize;
use consilium_domain::{
    DiagnosticReport, LocalAnalysis, LocalTierStatus, Opinion, OutputFormat, PhaseTimings,
    RoutedResult, SyncSummary,
};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors off (e.g. `[output] color = false`).
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Render a diagnosis report in the requested view.
    pub fn format_report(report: &DiagnosticReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format_report_full(report),
            OutputFormat::Clinical => format!("{}\n", report.views.clinical),
            OutputFormat::Plain => format!("{}\n", report.views.plain_language),
            OutputFormat::Json => Self::to_json(report),
        }
    }

    /// Render a routed result in the requested view.
    pub fn format_routed(result: &RoutedResult, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::to_json(result);
        }

        let report = result.report.as_ref().or(result.verification.as_ref());
        match (format, report) {
            (OutputFormat::Clinical | OutputFormat::Plain, Some(report)) => {
                Self::format_report(report, format)
            }
            (OutputFormat::Clinical | OutputFormat::Plain, None) => result
                .local
                .as_ref()
                .map(Self::format_local)
                .unwrap_or_default(),
            _ => Self::format_routed_full(result),
        }
    }

    pub fn format_sync(summary: &SyncSummary) -> String {
        let line = summary.to_string();
        if summary.refused {
            format!("{} {}\n", "!".yellow().bold(), line.yellow())
        } else if summary.failed > 0 {
            format!("{} {}\n", "!".yellow().bold(), line)
        } else {
            format!("{} {}\n", "v".green().bold(), line)
        }
    }

    pub fn format_status(status: &LocalTierStatus) -> String {
        let mode = if status.offline_mode {
            "offline".yellow().bold()
        } else {
            "online".green().bold()
        };
        let mut output = format!("{} {}\n", "Local tier:".cyan().bold(), mode);
        output.push_str(&format!(
            "{} {}\n",
            "Pending sync:".cyan().bold(),
            status.pending_sync
        ));
        if let Some(dir) = &status.cache_dir {
            output.push_str(&format!("{} {}\n", "Cache dir:".cyan().bold(), dir));
        }
        output
    }

    fn format_report_full(report: &DiagnosticReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Diagnostic Consensus"));
        output.push('\n');

        if !report.case.chief_complaint.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Chief complaint:".cyan().bold(),
                report.case.chief_complaint
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Specialists:".cyan().bold(),
            report
                .consultations
                .specialties()
                .map(|s| s.display_name())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        for (specialty, expertise) in &report.panel {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{}:", specialty.display_name()).dimmed(),
                expertise
            ));
        }

        output.push_str(&Self::section_header("Initial Consultations"));
        for opinion in &report.consultations {
            output.push_str(&Self::opinion(opinion));
        }

        if report.metadata.debate_enabled {
            output.push_str(&Self::section_header("Debate"));
            output.push_str(&format!(
                "Revision rounds: {}\n",
                report.history.revision_count()
            ));
            if let Some(state) = report.metadata.termination {
                let state = state.to_string();
                let state = if report.consensus.converged() {
                    state.green()
                } else {
                    state.yellow()
                };
                output.push_str(&format!("Outcome: {}\n", state));
            }
            if report.history.revision_count() > 0 {
                for opinion in report.final_opinions() {
                    output.push_str(&Self::opinion(opinion));
                }
            }
        }

        output.push_str(&Self::section_header("Clinical Report"));
        output.push_str(&report.views.clinical);
        output.push('\n');

        output.push_str(&Self::section_header("For the Patient"));
        output.push_str(&report.views.plain_language);
        output.push('\n');

        output.push_str(&Self::timings(&report.timings));
        output.push_str(&Self::footer());
        output
    }

    fn format_routed_full(result: &RoutedResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Routed Case"));
        output.push('\n');
        output.push_str(&format!(
            "{} {:.2} ({})\n",
            "Complexity:".cyan().bold(),
            result.complexity,
            result.band
        ));
        if !result.signals.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Signals:".cyan().bold(),
                result
                    .signals
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Processed by:".cyan().bold(),
            result.processed_by
        ));
        if let Some(deferred) = result.deferred_tier {
            output.push_str(&format!(
                "{} {} (queued while offline)\n",
                "Deferred:".yellow().bold(),
                deferred
            ));
        }
        output.push_str(&format!(
            "{} {:.1}%\n",
            "Confidence:".cyan().bold(),
            result.confidence * 100.0
        ));

        if let Some(local) = &result.local {
            output.push_str(&Self::section_header("Local Assessment"));
            output.push_str(&Self::format_local(local));
        }

        if let Some(report) = &result.verification {
            output.push_str(&Self::section_header("Remote Verification"));
            output.push_str(&Self::format_report_full(report));
        }

        if let Some(report) = &result.report {
            output.push('\n');
            output.push_str(&Self::format_report_full(report));
        }

        output
    }

    fn format_local(local: &LocalAnalysis) -> String {
        let preliminary = &local.preliminary;
        let mut output = format!(
            "{} (confidence: {:.0}%)\n",
            preliminary.summary,
            preliminary.confidence * 100.0
        );
        for diagnosis in &preliminary.diagnoses {
            output.push_str(&format!("  * {}\n", diagnosis));
        }
        if !preliminary.recommendations.is_empty() {
            output.push_str(&format!("{}\n", "Recommendations:".bold()));
            for recommendation in &preliminary.recommendations {
                output.push_str(&format!("  * {}\n", recommendation));
            }
        }
        if preliminary.escalation_recommended {
            output.push_str(&format!("{}\n", "Escalation recommended".yellow().bold()));
        }
        if let Some(id) = &local.queued_as {
            output.push_str(&format!("{} {}\n", "Queued as".dimmed(), id));
        }
        output
    }

    fn opinion(opinion: &Opinion) -> String {
        let title = format!(
            "── {} (round {}) ──",
            opinion.specialty.display_name(),
            opinion.round
        );
        match &opinion.error {
            Some(error) => format!("\n{}\nError: {}\n", title.red().bold(), error),
            None => {
                let mut out = format!(
                    "\n{}\n{}\n{} {:.0}%  {} {}\n",
                    title.yellow().bold(),
                    opinion.summary,
                    "confidence:".dimmed(),
                    opinion.confidence * 100.0,
                    "risk:".dimmed(),
                    opinion.risk_level
                );
                for diagnosis in &opinion.diagnoses {
                    out.push_str(&format!("  * {}\n", diagnosis));
                }
                out
            }
        }
    }

    fn timings(timings: &PhaseTimings) -> String {
        if timings.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = timings
            .iter()
            .map(|t| format!("{} {}ms", t.phase.display_name(), t.millis))
            .collect();
        format!(
            "\n{} {} (total {}ms)\n",
            "Timings:".dimmed(),
            parts.join(", ").dimmed(),
            timings.total_millis()
        )
    }

    fn to_json<T: serde::Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consilium_domain::{
        CaseRecord, ComplexityBand, ConsensusMerger, OpinionHistory, OpinionSet, ReportAssembler,
        Specialty, StructuredCase, Tier,
    };

    fn report() -> DiagnosticReport {
        let mut opinion = Opinion::new(Specialty::Cardiology, "Likely stable angina");
        opinion.diagnoses = vec!["Stable angina".to_string()];
        opinion.confidence = 0.8;
        let set: OpinionSet = [opinion].into_iter().collect();
        let consensus = ConsensusMerger::new().merge(&set);
        ReportAssembler.assemble(
            StructuredCase::from_raw(&CaseRecord::new("chest pain", 1.0)),
            OpinionHistory::seeded(set),
            consensus,
            false,
        )
    }

    #[test]
    fn test_views_select_report_text() {
        colored::control::set_override(false);
        let report = report();
        assert_eq!(
            ConsoleFormatter::format_report(&report, OutputFormat::Clinical).trim_end(),
            report.views.clinical
        );
        assert_eq!(
            ConsoleFormatter::format_report(&report, OutputFormat::Plain).trim_end(),
            report.views.plain_language
        );
    }

    #[test]
    fn test_full_includes_consultations() {
        colored::control::set_override(false);
        let full = ConsoleFormatter::format_report(&report(), OutputFormat::Full);
        assert!(full.contains("Initial Consultations"));
        assert!(full.contains("Likely stable angina"));
        assert!(!full.contains("Debate"));
    }

    #[test]
    fn test_full_lists_panel_expertise() {
        colored::control::set_override(false);
        let mut report = report();
        report.panel.insert(
            Specialty::Cardiology,
            Specialty::Cardiology.profile().expertise.to_string(),
        );
        let full = ConsoleFormatter::format_report(&report, OutputFormat::Full);
        assert!(full.contains("Cardiology: Coronary artery disease"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = ConsoleFormatter::format_report(&report(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metadata"]["debate_enabled"], false);
    }

    #[test]
    fn test_routed_remote_clinical_uses_report_view() {
        let report = report();
        let result = RoutedResult {
            complexity: 0.9,
            band: ComplexityBand::Complex,
            signals: vec![],
            processed_by: Tier::Remote,
            confidence: 0.8,
            deferred_tier: None,
            local: None,
            verification: None,
            report: Some(report.clone()),
        };
        assert_eq!(
            ConsoleFormatter::format_routed(&result, OutputFormat::Clinical).trim_end(),
            report.views.clinical
        );
    }

    #[test]
    fn test_sync_summary_line() {
        colored::control::set_override(false);
        let summary = SyncSummary {
            synced: 2,
            failed: 1,
            pending: 1,
            refused: false,
        };
        assert!(ConsoleFormatter::format_sync(&summary).contains("2 synced, 1 failed, 1 pending"));
    }
}
