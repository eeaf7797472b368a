use std::io::{self, Write};

use serde::Serialize;

/// Process exit status when every check passed.
pub const EXIT_OK: i32 = 0;
/// One or more checks failed, or the body could not be parsed.
pub const EXIT_CHECKS_FAILED: i32 = 1;
/// No response could be obtained from the server.
pub const EXIT_TRANSPORT: i32 = 2;

/// Result of evaluating one rule. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub label: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckOutcome {
    pub fn pass(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: true,
            detail: None,
        }
    }

    pub fn fail(label: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            label: label.into(),
            passed: false,
            detail,
        }
    }

    pub fn check(label: impl Into<String>, passed: bool, detail: impl FnOnce() -> String) -> Self {
        if passed {
            Self::pass(label)
        } else {
            Self::fail(label, Some(detail()))
        }
    }
}

/// Ordered outcomes of one run plus their counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<CheckOutcome>,
    pub pass_count: usize,
    pub fail_count: usize,
}

impl RunReport {
    pub fn from_outcomes(outcomes: Vec<CheckOutcome>) -> Self {
        let pass_count = outcomes.iter().filter(|o| o.passed).count();
        let fail_count = outcomes.len() - pass_count;
        Self {
            outcomes,
            pass_count,
            fail_count,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    pub fn outcome(&self, label: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }
}

/// Outcomes of one scenario (one request and its checks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub target: String,
    pub report: RunReport,
}

/// Why a session stopped before evaluating every scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Abort {
    Transport { target: String, message: String },
    Parse { target: String, message: String },
}

/// Everything a checker run produced, in scenario order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub contract: String,
    pub scenarios: Vec<ScenarioReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort: Option<Abort>,
}

impl SessionReport {
    pub fn pass_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.report.pass_count).sum()
    }

    pub fn fail_count(&self) -> usize {
        self.scenarios.iter().map(|s| s.report.fail_count).sum()
    }

    pub fn passed(&self) -> bool {
        self.abort.is_none() && self.fail_count() == 0
    }

    /// Map the report to a process exit status.
    pub fn exit_code(&self) -> i32 {
        match (&self.abort, self.fail_count()) {
            (Some(Abort::Transport { .. }), _) => EXIT_TRANSPORT,
            (Some(Abort::Parse { .. }), _) | (None, 1..) => EXIT_CHECKS_FAILED,
            (None, 0) => EXIT_OK,
        }
    }
}

/// Output format of the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn render(report: &SessionReport, format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
    match format {
        OutputFormat::Text => render_text(report, out),
        OutputFormat::Json => render_json(report, out),
    }
}

/// Plain-text report: one line per check, then a blank-line-separated
/// summary block.
pub fn render_text(report: &SessionReport, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Contract: {}", report.contract)?;

    for (index, scenario) in report.scenarios.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "[Scenario {}] {}", index + 1, scenario.name)?;
        writeln!(out, "  GET {}", scenario.target)?;
        for outcome in &scenario.report.outcomes {
            write_outcome(outcome, out)?;
        }
    }

    writeln!(out)?;
    match &report.abort {
        Some(Abort::Transport { target, message }) => {
            writeln!(out, "FATAL: could not reach {target}: {message}")?;
        }
        Some(Abort::Parse { target, message }) => {
            writeln!(out, "ABORTED: response from {target} is not valid JSON: {message}")?;
        }
        None => {}
    }
    writeln!(
        out,
        "RESULTS: {} passed, {} failed",
        report.pass_count(),
        report.fail_count()
    )?;
    let verdict = if report.passed() { "PASS" } else { "FAIL" };
    writeln!(out, "OVERALL: {verdict}")
}

fn write_outcome(outcome: &CheckOutcome, out: &mut impl Write) -> io::Result<()> {
    if outcome.passed {
        return writeln!(out, "  PASS: {}", outcome.label);
    }
    writeln!(out, "  FAIL: {}", outcome.label)?;
    if let Some(detail) = &outcome.detail {
        writeln!(out, "        {detail}")?;
    }
    Ok(())
}

pub fn render_json(report: &SessionReport, out: &mut impl Write) -> io::Result<()> {
    #[derive(Serialize)]
    struct JsonReport<'a> {
        #[serde(flatten)]
        session: &'a SessionReport,
        pass_count: usize,
        fail_count: usize,
        exit_code: i32,
    }

    let payload = JsonReport {
        session: report,
        pass_count: report.pass_count(),
        fail_count: report.fail_count(),
        exit_code: report.exit_code(),
    };
    serde_json::to_writer_pretty(&mut *out, &payload)?;
    writeln!(out)
}
