//! Progress reporting for diagnosis and routing runs

use colored::Colorize;
use consilium_application::ProgressNotifier;
use consilium_domain::{ComplexityAssessment, Phase, Specialty, Tier};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with indicatif bars, one per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn task_label(phase: &Phase, specialty: Option<Specialty>) -> String {
        match specialty {
            Some(s) => s.display_name().to_string(),
            None => phase.display_name().to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase.display_name().to_string());
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_task_complete(&self, phase: &Phase, specialty: Option<Specialty>, success: bool) {
        if let Ok(slot) = self.phase_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let label = Self::task_label(phase, specialty);
            let status = if success {
                format!("{} {}", "v".green(), label)
            } else {
                format!("{} {}", "x".red(), label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase, elapsed: Duration) {
        if let Ok(mut slot) = self.phase_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!(
                "{} ({}ms)",
                "done".green(),
                elapsed.as_millis()
            ));
        } else {
            let _ = self.multi.println(format!(
                "{} {} ({}ms)",
                "v".green(),
                phase.display_name(),
                elapsed.as_millis()
            ));
        }
    }

    fn on_debate_round(&self, round: usize, max_rounds: usize, agreement: f64) {
        let _ = self.multi.println(format!(
            "{} Debate round {}/{} (agreement {:.0}%)",
            "->".cyan(),
            round,
            max_rounds,
            agreement * 100.0
        ));
    }

    fn on_route_decision(&self, assessment: &ComplexityAssessment, tier: Tier) {
        let _ = self.multi.println(format!(
            "{} Complexity {} -> {} tier",
            "->".cyan(),
            assessment.score,
            tier.as_str().bold()
        ));
    }
}

/// Simple text-based progress for non-interactive output
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            phase.display_name().bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, phase: &Phase, specialty: Option<Specialty>, success: bool) {
        let label = ProgressReporter::task_label(phase, specialty);
        if success {
            eprintln!("  {} {}", "v".green(), label);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), label);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase, elapsed: Duration) {
        eprintln!("  {}", format!("{}ms", elapsed.as_millis()).dimmed());
    }

    fn on_debate_round(&self, round: usize, max_rounds: usize, agreement: f64) {
        eprintln!(
            "{} Debate round {}/{} (agreement {:.0}%)",
            "->".cyan(),
            round,
            max_rounds,
            agreement * 100.0
        );
    }

    fn on_route_decision(&self, assessment: &ComplexityAssessment, tier: Tier) {
        eprintln!("{} Complexity {} -> {} tier", "->".cyan(), assessment.score, tier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_label_prefers_specialty() {
        assert_eq!(
            ProgressReporter::task_label(&Phase::Consultation, Some(Specialty::Oncology)),
            Specialty::Oncology.display_name()
        );
        assert_eq!(
            ProgressReporter::task_label(&Phase::Structuring, None),
            Phase::Structuring.display_name()
        );
    }

    #[test]
    fn test_reporter_survives_out_of_order_callbacks() {
        let reporter = ProgressReporter::new();
        reporter.on_task_complete(&Phase::Consultation, Some(Specialty::Cardiology), true);
        reporter.on_phase_complete(&Phase::Consultation, Duration::from_millis(3));
        reporter.on_phase_start(&Phase::Debate, 2);
        reporter.on_phase_start(&Phase::Merge, 1);
        reporter.on_phase_complete(&Phase::Merge, Duration::from_millis(1));
    }
}
