//! Display and output formatting utilities

use crate::grammar::{CheckedFormula, Formula};
use crate::interpret::{Interpretation, Kind, Outcome, NO_ANSWER};
use crate::protocol::SolveResponse;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Format solver outcomes for display
pub struct ResultFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    formula: &'a str,
    #[serde(flatten)]
    interpretation: Interpretation<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unconstrained: Vec<&'a str>,
}

impl ResultFormatter {
    /// Format an outcome for console output.
    ///
    /// `checked` is the local grammar summary of the formula when it passed;
    /// it is used to list variables the solver left unassigned.
    pub fn format_outcome(formula: &Formula, outcome: &Outcome, checked: Option<&CheckedFormula>) -> String {
        let mut output = String::new();

        let (heading, subtitle) = match outcome.kind() {
            Kind::Satisfiable => (ColorOutput::success("✅ Satisfiable"), "Valid assignment found"),
            Kind::Unsatisfiable => (ColorOutput::error("❌ Unsatisfiable"), "No valid assignment exists"),
            Kind::Error => (ColorOutput::error("⚠️  Error"), "Parsing error occurred"),
        };
        output.push_str(&format!("{}\n{}\n\n", heading, subtitle));
        output.push_str(&format!("Formula: {}\n", formula));

        if let Some(message) = outcome.error_message() {
            output.push_str(&format!("{}\n", ColorOutput::error(message)));
            return output;
        }

        output.push_str("Assignment:\n");
        if outcome.pairs().is_empty() {
            if outcome.kind() == Kind::Unsatisfiable {
                output.push_str(&format!("  {}\n", ColorOutput::error("No assignment exists (UNSAT)")));
            } else {
                output.push_str("  (no variables constrained)\n");
            }
        }
        for pair in outcome.pairs() {
            let value = if pair.value {
                ColorOutput::success("true")
            } else {
                ColorOutput::error("false")
            };
            output.push_str(&format!("  {} = {}\n", ColorOutput::variable(&pair.name), value));
        }

        if outcome.kind() == Kind::Satisfiable {
            let unconstrained = Self::unconstrained(outcome, checked);
            if !unconstrained.is_empty() {
                output.push_str(&format!("Unconstrained: {} (any value)\n", unconstrained.join(", ")));
            }
            output.push_str("\nThe formula is satisfiable with the above assignment. ");
            output.push_str("Variables not shown can have any value.\n");
        } else {
            output.push_str("\nThe formula is unsatisfiable. No variable assignment makes it true.\n");
        }

        output
    }

    /// Format an outcome as pretty-printed JSON
    pub fn format_json(formula: &Formula, outcome: &Outcome, checked: Option<&CheckedFormula>) -> Result<String> {
        let report = JsonReport {
            formula: formula.as_str(),
            interpretation: outcome.interpretation(),
            unconstrained: Self::unconstrained(outcome, checked),
        };
        serde_json::to_string_pretty(&report).context("Failed to serialize result")
    }

    /// Formula variables that do not appear in a satisfying assignment
    pub fn unconstrained<'a>(outcome: &Outcome, checked: Option<&'a CheckedFormula>) -> Vec<&'a str> {
        if outcome.kind() != Kind::Satisfiable {
            return Vec::new();
        }
        checked
            .map(|checked| {
                checked
                    .atoms()
                    .iter()
                    .filter(|atom| !outcome.pairs().iter().any(|pair| &pair.name == *atom))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Text written to a saved report.
    ///
    /// `Result:` is the solver's own text: the assignment string verbatim,
    /// or the error message when there is no assignment.
    pub fn report_content(formula: &Formula, response: &SolveResponse, timestamp: DateTime<Utc>) -> String {
        let result = [response.assignment.as_deref(), response.error.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .unwrap_or(NO_ANSWER);
        format!(
            "Formula: {}\nResult: {}\nTimestamp: {}\n",
            formula,
            result,
            timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }

    /// Save a report file into `output_dir`, returning its path
    pub fn save_report<P: AsRef<Path>>(output_dir: P, formula: &Formula, response: &SolveResponse) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let now = Utc::now();
        let path = output_dir.join(format!("marina-result-{}.txt", now.timestamp_millis()));
        std::fs::write(&path, Self::report_content(formula, response, now))
            .with_context(|| format!("Failed to write report: {}", path.display()))?;

        Ok(path)
    }
}

/// Terminal colouring for status lines and assignments
pub struct ColorOutput;

impl ColorOutput {
    pub fn success(text: &str) -> String {
        Self::paint(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::paint(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::paint(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::paint(text, Color::Blue)
    }

    /// A variable name inside an assignment
    pub fn variable(name: &str) -> String {
        Self::paint(name, Color::Cyan)
    }

    /// Whether escape codes should be emitted (`NO_COLOR` unset, `TERM` not `dumb`)
    pub fn enabled() -> bool {
        std::env::var_os("NO_COLOR").is_none()
            && std::env::var("TERM").map_or(true, |term| term != "dumb")
    }

    fn paint(text: &str, color: Color) -> String {
        if Self::enabled() {
            format!("\x1b[{}m{}\x1b[0m", color as u8, text)
        } else {
            text.to_string()
        }
    }
}

#[derive(Clone, Copy)]
enum Color {
    Red = 31,
    Green = 32,
    Yellow = 33,
    Blue = 34,
    Cyan = 36,
}
