//! Terminal rendering of evaluation results.
//!
//! One status line per result, using the `console` crate for color.
//! Color handling follows the terminal and the NO_COLOR convention; the
//! rendering functions return plain strings plus a styled marker so they
//! stay testable without a TTY.

use crate::checks::CheckResult;
use console::style;

/// Status classes a rendered line can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    Error,
    Running,
    Info,
}

impl Status {
    /// Canonical marker text for the status.
    pub fn marker(self) -> &'static str {
        match self {
            Status::Done => "(✓) Done:",
            Status::Error => "(x) Error:",
            Status::Running => "(-) Running:",
            Status::Info => "(i) Info:",
        }
    }

    /// Marker with terminal styling applied (a no-op when colors are
    /// disabled).
    fn styled(self) -> String {
        let marker = self.marker();
        match self {
            Status::Done => style(marker).green().to_string(),
            Status::Error => style(marker).red().to_string(),
            Status::Running => style(marker).cyan().to_string(),
            Status::Info => style(marker).blue().to_string(),
        }
    }
}

/// Renders status lines for check results.
pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Reporter
    }

    /// Render one result as a status line.
    pub fn render_result(&self, result: &CheckResult) -> String {
        match result.failure {
            None => {
                let detail = if result.version.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", result.version)
                };
                format!("{} {}{}", Status::Done.styled(), result.subject, detail)
            }
            Some(kind) => format!(
                "{} {}: {}",
                Status::Error.styled(),
                result.subject,
                kind.describe()
            ),
        }
    }

    /// Render the closing summary line.
    pub fn render_summary(&self, results: &[CheckResult]) -> String {
        let failed = results.iter().filter(|r| !r.passed()).count();
        if failed == 0 {
            format!(
                "{} all {} checks passed",
                Status::Done.styled(),
                results.len()
            )
        } else {
            format!(
                "{} {} of {} checks failed",
                Status::Error.styled(),
                failed,
                results.len()
            )
        }
    }

    /// Print a free-form informational line.
    pub fn info(&self, msg: &str) {
        println!("{} {}", Status::Info.styled(), msg);
    }

    /// Print a free-form error line to stderr.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", Status::Error.styled(), msg);
    }

    /// Print each result and the summary.
    pub fn print_results(&self, results: &[CheckResult]) {
        for result in results {
            println!("{}", self.render_result(result));
        }
        println!("{}", self.render_summary(results));
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
