//! The set of checks run on every file.

use crate::config::ChecksConfig;
use crate::rules::{AvoidHtmlComment, ComplexityThreshold, FileHeader, ImgWithoutAlt, UnclosedTag};
use markup_scanner::{Check, Visitor};

/// Checks built once from configuration and shared by all scans.
#[derive(Default)]
pub struct Registry {
    checks: Vec<Box<dyn Check>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every enabled built-in check.
    pub fn from_config(config: &ChecksConfig) -> Self {
        let mut registry = Self::new();
        if config.unclosed_tag.enabled {
            registry.register(UnclosedTag::new(&config.unclosed_tag));
        }
        if config.img_without_alt.enabled {
            registry.register(ImgWithoutAlt);
        }
        if config.avoid_html_comment.enabled {
            registry.register(AvoidHtmlComment);
        }
        if config.complexity_threshold.enabled {
            registry.register(ComplexityThreshold::new(&config.complexity_threshold));
        }
        if config.file_header.enabled {
            registry.register(FileHeader::new(&config.file_header));
        }
        registry
    }

    /// Adds a check. Checks run in registration order.
    pub fn register(&mut self, check: impl Check + 'static) {
        self.checks.push(Box::new(check));
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Rule keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks.iter().map(|check| check.key())
    }

    /// Creates one fresh visitor per check, for a single scan.
    pub fn visitors(&self) -> Vec<Box<dyn Visitor + '_>> {
        self.checks.iter().map(|check| check.visitor()).collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
