//! The per-file sink of issues and measures.

use crate::issue::Issue;
use camino::{Utf8Path, Utf8PathBuf};
use markup_lexer::Charset;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::fmt;

/// Measures computed for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Number of lines.
    Lines,
    /// Lines holding something other than comments and whitespace.
    Ncloc,
    /// Lines holding comment text.
    CommentLines,
    /// Decision points in template logic.
    Complexity,
    /// Number of start elements.
    Elements,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Lines => "lines",
            Metric::Ncloc => "ncloc",
            Metric::CommentLines => "comment_lines",
            Metric::Complexity => "complexity",
            Metric::Elements => "elements",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues and measures collected for one file during a scan.
///
/// Created before scanning, written by visitors, read by the host
/// afterwards. Every file gets its own aggregate.
#[derive(Debug, Clone)]
pub struct SourceAggregate {
    file: Utf8PathBuf,
    charset: Charset,
    measures: IndexMap<Metric, i64>,
    issues: Vec<Issue>,
    detailed_lines: BTreeSet<u32>,
}

impl SourceAggregate {
    pub fn new(file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            file: file.into(),
            charset: Charset::default(),
            measures: IndexMap::new(),
            issues: Vec::new(),
            detailed_lines: BTreeSet::new(),
        }
    }

    /// Sets the encoding the file was decoded with. UTF-8 by default.
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// The file being scanned.
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }

    /// Encoding of the file, for visitors that read it again.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Records an issue. Issues keep the order in which they were added.
    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Issues in the order they were added.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues in canonical report order, see [`Issue::canonical_cmp`].
    pub fn sorted_issues(&self) -> Vec<&Issue> {
        let mut sorted: Vec<_> = self.issues.iter().collect();
        sorted.sort_by(|a, b| a.canonical_cmp(b));
        sorted
    }

    /// Sets a measure, replacing any earlier value.
    pub fn set_measure(&mut self, metric: Metric, value: i64) {
        self.measures.insert(metric, value);
    }

    pub fn measure(&self, metric: Metric) -> Option<i64> {
        self.measures.get(&metric).copied()
    }

    /// Measures in the order they were first set.
    pub fn measures(&self) -> impl Iterator<Item = (Metric, i64)> + '_ {
        self.measures.iter().map(|(metric, value)| (*metric, *value))
    }

    /// Marks a line for line-level reporting.
    pub fn add_detailed_line(&mut self, line: u32) {
        self.detailed_lines.insert(line);
    }

    pub fn detailed_lines(&self) -> &BTreeSet<u32> {
        &self.detailed_lines
    }
}
