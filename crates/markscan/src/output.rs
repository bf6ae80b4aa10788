//! Output formatting.

use crate::cli::OutputFormat;
use crate::orchestrator::FileReport;
use indexmap::IndexMap;
use markup_lexer::LinePos;
use markup_scanner::Issue;
use serde::Serialize;
use std::fmt::Write;

/// A formatted file for JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedFile {
    /// Path relative to the workspace.
    pub filename: String,
    pub measures: IndexMap<&'static str, i64>,
    pub issues: Vec<FormattedIssue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FormattedFailure>,
}

/// A formatted issue for JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedIssue {
    pub rule: String,
    /// 1-indexed line, absent for file-level issues.
    pub line: Option<u32>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
}

/// A visitor that stopped early.
#[derive(Debug, Serialize)]
pub struct FormattedFailure {
    pub phase: String,
    pub visitor: String,
    pub message: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 0-indexed column, in characters.
    pub column: u32,
}

impl From<LinePos> for Position {
    fn from(pos: LinePos) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
        }
    }
}

impl FormattedFile {
    fn new(report: &FileReport) -> Self {
        Self {
            filename: report.path.to_string(),
            measures: report
                .aggregate
                .measures()
                .map(|(metric, value)| (metric.as_str(), value))
                .collect(),
            issues: report
                .aggregate
                .sorted_issues()
                .into_iter()
                .map(FormattedIssue::new)
                .collect(),
            failures: report
                .failures
                .iter()
                .map(|failure| FormattedFailure {
                    phase: failure.phase.to_string(),
                    visitor: failure.visitor.clone(),
                    message: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

impl FormattedIssue {
    fn new(issue: &Issue) -> Self {
        let span = issue.span();
        Self {
            rule: issue.rule_key().to_string(),
            line: issue.line(),
            message: issue.message().to_string(),
            cost: issue.cost(),
            start: span.map(|s| s.start.into()),
            end: span.map(|s| s.end.into()),
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: Vec<FormattedFile>,
    summary: &'a CheckSummary,
}

/// Formats scan reports for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the reports followed by the summary.
    pub fn format(&self, reports: &[FileReport], summary: &CheckSummary) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(reports, summary),
            OutputFormat::Json => self.format_json(reports, summary),
            OutputFormat::Machine => self.format_machine(reports, summary),
        }
    }

    fn format_human(&self, reports: &[FileReport], summary: &CheckSummary) -> String {
        let mut output = String::new();

        for report in reports {
            let path = &report.path;
            for issue in report.aggregate.sorted_issues() {
                match (issue.line(), issue.span()) {
                    (_, Some(span)) => {
                        let (line, column) = (span.start.line, span.start.column + 1);
                        let _ = writeln!(output, "{path}:{line}:{column}");
                    }
                    (Some(line), None) => {
                        let _ = writeln!(output, "{path}:{line}");
                    }
                    (None, None) => {
                        let _ = writeln!(output, "{path}");
                    }
                }
                let _ = write!(output, "Issue: {} ({})", issue.message(), issue.rule_key());
                if let Some(cost) = issue.cost() {
                    let _ = write!(output, " [cost {cost}]");
                }
                output.push_str("\n\n");
            }
            for failure in &report.failures {
                let _ = writeln!(
                    output,
                    "{path}\nFailure: {} stopped during {}: {}\n",
                    failure.visitor, failure.phase, failure.error
                );
            }
        }

        if reports.iter().any(|r| r.aggregate.measures().next().is_some()) {
            output.push_str("Measures:\n");
            for report in reports {
                let measures: Vec<String> = report
                    .aggregate
                    .measures()
                    .map(|(metric, value)| format!("{metric}={value}"))
                    .collect();
                let _ = writeln!(output, "  {} {}", report.path, measures.join(" "));
            }
        }

        output.push_str(&summary.format());
        output.push('\n');
        output
    }

    fn format_json(&self, reports: &[FileReport], summary: &CheckSummary) -> String {
        let json = JsonOutput {
            files: reports.iter().map(FormattedFile::new).collect(),
            summary,
        };
        let mut output = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
        output.push('\n');
        output
    }

    /// One line per issue, measure and failure.
    fn format_machine(&self, reports: &[FileReport], summary: &CheckSummary) -> String {
        let mut output = String::new();

        for report in reports {
            let path = &report.path;
            for issue in report.aggregate.sorted_issues() {
                let location = match issue.span() {
                    Some(span) => format!(
                        "{}:{}:{}:{}",
                        span.start.line,
                        span.start.column + 1,
                        span.end.line,
                        span.end.column + 1
                    ),
                    None => issue.line().unwrap_or(0).to_string(),
                };
                let _ = writeln!(
                    output,
                    "ISSUE {path}:{location} {} ({})",
                    issue.message(),
                    issue.rule_key()
                );
            }
            for (metric, value) in report.aggregate.measures() {
                let _ = writeln!(output, "MEASURE {path} {metric} {value}");
            }
            for failure in &report.failures {
                let _ = writeln!(
                    output,
                    "FAILURE {path} {} {} {}",
                    failure.phase, failure.visitor, failure.error
                );
            }
        }

        let _ = writeln!(
            output,
            "COMPLETED {} FILES {} ISSUES {} FAILURES",
            summary.file_count, summary.issue_count, summary.failure_count
        );
        output
    }
}

/// Summary of a scan run.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummary {
    /// Number of files scanned.
    pub file_count: usize,
    /// Number of files with at least one issue.
    pub files_with_issues: usize,
    pub issue_count: usize,
    /// Number of visitors that stopped on an error.
    pub failure_count: usize,
}

impl CheckSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut summary = Self {
            file_count: reports.len(),
            ..Self::default()
        };
        for report in reports {
            let issues = report.aggregate.issues().len();
            summary.issue_count += issues;
            summary.files_with_issues += usize::from(issues > 0);
            summary.failure_count += report.failures.len();
        }
        summary
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let issue_word = if self.issue_count == 1 {
            "issue"
        } else {
            "issues"
        };
        let file_word = if self.file_count == 1 {
            "file"
        } else {
            "files"
        };

        let mut line = format!(
            "====================================\nmarkscan found {} {} in {} of {} {}",
            self.issue_count, issue_word, self.files_with_issues, self.file_count, file_word
        );
        if self.failure_count > 0 {
            let _ = write!(line, " ({} visitor failures)", self.failure_count);
        }
        line
    }
}
