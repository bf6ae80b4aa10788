//! Rule parameters.

use serde::Deserialize;

/// Parameters of every built-in check.
///
/// Deserialized from the `checks` section of the configuration file; any
/// missing field keeps its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecksConfig {
    pub unclosed_tag: UnclosedTagConfig,
    pub img_without_alt: Toggle,
    pub avoid_html_comment: Toggle,
    pub complexity_threshold: ComplexityThresholdConfig,
    pub file_header: FileHeaderConfig,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            unclosed_tag: UnclosedTagConfig::default(),
            img_without_alt: Toggle { enabled: true },
            avoid_html_comment: Toggle { enabled: true },
            complexity_threshold: ComplexityThresholdConfig::default(),
            file_header: FileHeaderConfig::default(),
        }
    }
}

/// Enable flag for checks without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnclosedTagConfig {
    pub enabled: bool,
    /// Elements whose end tag may be omitted.
    pub ignore_tags: Vec<String>,
}

impl Default for UnclosedTagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ignore_tags: [
                "html", "head", "body", "p", "dt", "dd", "li", "option", "thead", "th", "tbody",
                "tr", "td", "tfoot", "colgroup",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ComplexityThresholdConfig {
    pub enabled: bool,
    /// Highest complexity allowed without an issue.
    pub max: i64,
}

impl Default for ComplexityThresholdConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max: 10,
        }
    }
}

/// Disabled unless a header is configured.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FileHeaderConfig {
    pub enabled: bool,
    /// Text every file must start with. Line endings are compared loosely.
    pub header: String,
}
