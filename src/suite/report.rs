//! Suite summary rendering

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use console::style;

use super::runner::{CheckOutcome, CheckState};
use crate::status::ExitStatus;

#[derive(Debug, Clone)]
pub struct SuiteReport {
    outcomes: Vec<CheckOutcome>,
    elapsed: Duration,
}

impl SuiteReport {
    pub fn new(outcomes: Vec<CheckOutcome>, elapsed: Duration) -> Self {
        Self { outcomes, elapsed }
    }

    pub fn outcomes(&self) -> &[CheckOutcome] {
        &self.outcomes
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn passed(&self) -> usize {
        self.count(|s| matches!(s, CheckState::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CheckState::Failed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CheckState::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&CheckState) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.state)).count()
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.failed() > 0 {
            ExitStatus::CheckFailed
        } else {
            ExitStatus::Success
        }
    }

    /// Results table
    pub fn render_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Check", "Project", "Result", "Time"]);

        for outcome in &self.outcomes {
            let result = match &outcome.state {
                CheckState::Passed => style("PASS").green().to_string(),
                CheckState::Failed => style("FAIL").red().bold().to_string(),
                CheckState::Skipped(reason) => style(format!("SKIP ({})", reason)).yellow().to_string(),
            };
            table.add_row(vec![
                Cell::new(outcome.name()),
                Cell::new(outcome.project.to_string()),
                Cell::new(result),
                Cell::new(format!("{}ms", outcome.elapsed.as_millis())),
            ]);
        }

        table.to_string()
    }

    /// Failed assertions, one line each
    pub fn render_failures(&self) -> String {
        let mut out = String::new();
        for outcome in self.outcomes.iter().filter(|o| o.state == CheckState::Failed) {
            out.push_str(&format!("{}\n", style(outcome.name()).red().bold()));
            for failure in outcome.failures() {
                out.push_str(&format!("  {}: {}\n", failure.assertion, failure.message));
            }
        }
        out
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped in {:.2}s",
            self.passed(),
            self.failed(),
            self.skipped(),
            self.elapsed.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::assertions::AssertionResult;
    use crate::suite::checks::CheckId;

    fn outcome(id: CheckId, state: CheckState, assertions: Vec<AssertionResult>) -> CheckOutcome {
        CheckOutcome {
            id,
            project: id.project(),
            state,
            assertions,
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_counts_and_exit_status() {
        let report = SuiteReport::new(
            vec![
                outcome(CheckId::Health, CheckState::Passed, vec![]),
                outcome(
                    CheckId::TourUnknown,
                    CheckState::Failed,
                    vec![AssertionResult::fail("status=404", "Expected 404, got 200")],
                ),
                outcome(CheckId::SignUpWeakPassword, CheckState::Skipped("mock".to_string()), vec![]),
            ],
            Duration::from_millis(20),
        );

        assert_eq!((report.passed(), report.failed(), report.skipped()), (1, 1, 1));
        assert_eq!(report.exit_status(), ExitStatus::CheckFailed);
        assert!(report.render_failures().contains("Expected 404, got 200"));
        assert!(report.render_table().contains("unknown tour is 404"));
        assert_eq!(report.summary_line(), "1 passed, 1 failed, 1 skipped in 0.02s");
    }

    #[test]
    fn test_all_passed() {
        let report = SuiteReport::new(
            vec![outcome(CheckId::Health, CheckState::Passed, vec![])],
            Duration::ZERO,
        );
        assert_eq!(report.exit_status(), ExitStatus::Success);
        assert!(report.render_failures().is_empty());
    }
}
