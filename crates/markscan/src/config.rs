//! Configuration loading.

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use markup_checks::ChecksConfig;
use markup_lexer::{Charset, ProfileKind, UnknownCharset, UnknownProfile};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Name of the configuration file looked up in the workspace.
pub const CONFIG_FILE: &str = "markscan.json";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        source: globset::Error,
    },

    #[error(transparent)]
    UnknownProfile(#[from] UnknownProfile),

    #[error(transparent)]
    UnknownCharset(#[from] UnknownCharset),
}

/// Contents of `markscan.json`. Comments are allowed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Encoding of every scanned file.
    pub charset: String,
    /// File extensions per grammar profile.
    pub profiles: IndexMap<String, Vec<String>>,
    /// Glob patterns of files to skip, relative to the workspace.
    pub exclude: Vec<String>,
    pub checks: ChecksConfig,
}

impl Default for Config {
    fn default() -> Self {
        let markup = [
            "html", "htm", "xhtml", "jsp", "jspf", "jspx", "php", "erb", "rhtml", "tag",
        ];
        Self {
            charset: Charset::Utf8.label().to_string(),
            profiles: IndexMap::from([
                (
                    ProfileKind::Markup.to_string(),
                    markup.into_iter().map(String::from).collect(),
                ),
                (ProfileKind::Component.to_string(), vec!["vue".to_string()]),
            ]),
            exclude: Vec::new(),
            checks: ChecksConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&remove_json_comments(&content)).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Loads the explicit configuration file, or `markscan.json` from the
    /// workspace when it exists, or the defaults.
    pub fn resolve(explicit: Option<&Utf8Path>, workspace: &Utf8Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = workspace.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(%path, "using workspace configuration");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn charset(&self) -> Result<Charset, ConfigError> {
        Ok(Charset::from_label(&self.charset)?)
    }

    /// Maps lowercase extensions (without the dot) to their profile.
    pub fn extension_map(&self) -> Result<FxHashMap<String, ProfileKind>, ConfigError> {
        let mut map = FxHashMap::default();
        for (profile, extensions) in &self.profiles {
            let kind: ProfileKind = profile.parse()?;
            for extension in extensions {
                let extension = extension.trim_start_matches('.').to_ascii_lowercase();
                map.insert(extension, kind);
            }
        }
        Ok(map)
    }
}

/// Removes `//` and `/* */` comments outside of strings.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '"' => in_string = false,
                '\\' => result.extend(chars.next()),
                _ => {}
            }
            continue;
        }
        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}
