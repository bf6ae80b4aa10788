//! Workspace walking and per-file scanning.

use crate::cli::Args;
use crate::config::{Config, ConfigError};
use crate::output::{CheckSummary, Formatter};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use markup_checks::Registry;
use markup_lexer::{tokenize_bytes, Charset, GrammarProfile, ProfileKind};
use markup_scanner::metrics::{self, ComplexityConfig};
use markup_scanner::{scan, SourceAggregate, VisitorFailure};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::fs;
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

/// Directories skipped in every workspace.
const DEFAULT_IGNORES: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/target/**",
    "**/vendor/**",
];

/// Orchestration errors.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("workspace {0} is not a directory")]
    NotADirectory(Utf8PathBuf),

    #[error("cannot resolve the current directory: {0}")]
    CurrentDir(String),
}

/// The scan result for one file.
#[derive(Debug)]
pub struct FileReport {
    /// Path relative to the workspace.
    pub path: Utf8PathBuf,
    pub aggregate: SourceAggregate,
    pub failures: Vec<VisitorFailure>,
}

/// Everything needed to scan a workspace.
pub struct Scanner {
    workspace: Utf8PathBuf,
    ignore: GlobSet,
    extensions: FxHashMap<String, ProfileKind>,
    charset: Charset,
    markup: GrammarProfile,
    component: GrammarProfile,
    complexity: ComplexityConfig,
    registry: Registry,
}

impl Scanner {
    pub fn new(
        workspace: Utf8PathBuf,
        config: &Config,
        extra_ignores: &[String],
    ) -> Result<Self, OrchestratorError> {
        if !workspace.is_dir() {
            return Err(OrchestratorError::NotADirectory(workspace));
        }
        let mut builder = GlobSetBuilder::new();
        let patterns = extra_ignores
            .iter()
            .chain(&config.exclude)
            .map(String::as_str)
            .chain(DEFAULT_IGNORES.iter().copied());
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: "<set>".to_string(),
            source,
        })?;

        Ok(Self {
            workspace,
            ignore,
            extensions: config.extension_map()?,
            charset: config.charset()?,
            markup: ProfileKind::Markup.profile(),
            component: ProfileKind::Component.profile(),
            complexity: ComplexityConfig::default(),
            registry: Registry::from_config(&config.checks),
        })
    }

    pub fn workspace(&self) -> &Utf8Path {
        &self.workspace
    }

    fn profile_for(&self, path: &Utf8Path) -> Option<&GrammarProfile> {
        let extension = path.extension()?.to_ascii_lowercase();
        Some(match self.extensions.get(&extension)? {
            ProfileKind::Markup => &self.markup,
            ProfileKind::Component => &self.component,
        })
    }

    /// Lists files with a configured extension that no ignore pattern
    /// matches, in path order.
    pub fn files(&self) -> Vec<Utf8PathBuf> {
        let mut files: Vec<Utf8PathBuf> = WalkDir::new(&self.workspace)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
            .filter(|p| self.profile_for(p).is_some())
            .filter(|p| {
                let relative = p.strip_prefix(&self.workspace).unwrap_or(p);
                !self.ignore.is_match(relative.as_str())
            })
            .collect();
        files.sort();
        files
    }

    /// Tokenizes and scans a single file with a fresh aggregate and
    /// fresh visitors.
    pub fn scan_file(&self, path: &Utf8Path) -> Option<FileReport> {
        let profile = self.profile_for(path)?;
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(error) => {
                tracing::warn!(%path, %error, "cannot read file");
                return None;
            }
        };

        let started = Instant::now();
        let nodes = tokenize_bytes(&bytes, self.charset, profile);
        let mut aggregate = SourceAggregate::new(path).with_charset(self.charset);
        let report = scan(
            &nodes,
            &mut aggregate,
            &mut metrics::default_visitors(&self.complexity),
            &mut self.registry.visitors(),
        );
        tracing::debug!(
            %path,
            profile = profile.name(),
            nodes = nodes.len(),
            issues = aggregate.issues().len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "scanned"
        );

        Some(FileReport {
            path: path
                .strip_prefix(&self.workspace)
                .unwrap_or(path)
                .to_path_buf(),
            aggregate,
            failures: report.failures,
        })
    }

    /// Scans every file of the workspace in parallel.
    pub fn scan_all(&self) -> Vec<FileReport> {
        let files = self.files();
        tracing::info!(workspace = %self.workspace, files = files.len(), "scanning");
        files
            .par_iter()
            .filter_map(|path| self.scan_file(path))
            .collect()
    }
}

fn resolve_workspace(workspace: &Utf8Path) -> Result<Utf8PathBuf, OrchestratorError> {
    if workspace.is_absolute() {
        return Ok(workspace.to_path_buf());
    }
    let current = std::env::current_dir()
        .map_err(|e| OrchestratorError::CurrentDir(e.to_string()))?;
    let current = Utf8PathBuf::try_from(current)
        .map_err(|e| OrchestratorError::CurrentDir(e.to_string()))?;
    Ok(current.join(workspace))
}

/// Runs a scan as described by the command line and prints the result.
pub fn run(args: &Args) -> Result<CheckSummary, OrchestratorError> {
    let workspace = resolve_workspace(&args.workspace)?;
    let config = Config::resolve(args.config.as_deref(), &workspace)?;
    let scanner = Scanner::new(workspace, &config, &args.ignore)?;

    let started = Instant::now();
    let reports = scanner.scan_all();
    let summary = CheckSummary::from_reports(&reports);
    tracing::info!(
        files = summary.file_count,
        issues = summary.issue_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scan finished"
    );

    print!("{}", Formatter::new(args.output).format(&reports, &summary));
    Ok(summary)
}
