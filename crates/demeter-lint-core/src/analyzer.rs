//! Core analyzer for orchestrating review execution.

use crate::ast::{Node, SourceDocument};
use crate::config::Config;
use crate::context::FileContext;
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Violation};
use crate::visit;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// File suffix of AST documents.
pub const AST_SUFFIX: &str = ".ast.json";

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing an AST document.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the document that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or a
    /// glob pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        // Merge patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        let mut include_patterns = self.include_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
            include_patterns.extend(config.analyzer.include.iter().cloned());
        }

        // Add default excludes if none specified
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(["**/tmp/**".to_string(), "**/vendor/**".to_string()]);
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude: compile_patterns(&exclude_patterns)?,
            include: compile_patterns(&include_patterns)?,
            config: self.config.unwrap_or_default(),
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, glob::PatternError> {
    patterns.iter().map(|p| glob::Pattern::new(p)).collect()
}

/// The main analyzer that orchestrates review execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    include: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all AST documents under the root and returns the results.
    ///
    /// Files are reviewed in parallel, each with its own finding list; the
    /// merged list is sorted by file, line, and column.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or a
    /// document fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        let outcomes = match self.config.analyzer.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| self.analyze_files(&files)),
            None => self.analyze_files(&files),
        };

        for outcome in outcomes {
            match outcome {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                    result.files_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files ({} skipped)",
            result.violations.len(),
            result.files_checked,
            result.files_skipped
        );

        Ok(result)
    }

    fn analyze_files(&self, files: &[PathBuf]) -> Vec<Result<Vec<Violation>, AnalyzerError>> {
        files
            .par_iter()
            .map(|path| self.analyze_file(path))
            .collect()
    }

    /// Analyzes a single AST document file and returns violations.
    fn analyze_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let content = std::fs::read_to_string(path)?;
        let doc = SourceDocument::from_json(&content).map_err(|e| AnalyzerError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let source_path = doc
            .path
            .clone()
            .unwrap_or_else(|| self.source_path_for(path));

        Ok(self.analyze_source(&source_path, &doc.root))
    }

    /// Runs every enabled rule over one tree.
    ///
    /// `source_path` is the path of the original source file; it decides
    /// file-scoped rules and is reported in each finding.
    #[must_use]
    pub fn analyze_source(&self, source_path: &Path, root: &Node) -> Vec<Violation> {
        let ctx = FileContext::new(source_path, &self.root);

        let active: Vec<&dyn Rule> = self
            .rules
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .map(|rule| &**rule)
            .collect();

        let violations = visit::review(&ctx, root, &active);
        self.apply_severity_override(violations)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(&self, mut violations: Vec<Violation>) -> Vec<Violation> {
        for v in &mut violations {
            if let Some(severity) = self.config.rule_severity(&v.rule) {
                v.severity = severity;
            }
        }
        violations
    }

    /// Derives the source path of a document that does not declare one:
    /// `ast/app/models/user.rb.ast.json` -> `ast/app/models/user.rb`.
    fn source_path_for(&self, doc_path: &Path) -> PathBuf {
        let relative = doc_path.strip_prefix(&self.root).unwrap_or(doc_path);
        let text = relative.to_string_lossy();
        PathBuf::from(text.strip_suffix(AST_SUFFIX).unwrap_or(&*text))
    }

    /// Discovers all AST documents to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let pattern = format!(
            "{}/**/*{AST_SUFFIX}",
            glob::Pattern::escape(&self.root.to_string_lossy())
        );
        let mut files = Vec::new();

        for entry in glob::glob(&pattern)? {
            let path = entry.map_err(|e| AnalyzerError::Io(e.into_error()))?;

            if self.should_exclude(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        Ok(files)
    }

    /// Checks if a path should be excluded, by pattern or by missing include.
    ///
    /// Patterns match the path relative to the root, so a root that itself
    /// lives under `tmp/` is not excluded wholesale.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let matches = |pattern: &glob::Pattern| pattern.matches_path(relative);

        if self.exclude.iter().any(matches) {
            return true;
        }

        !self.include.is_empty() && !self.include.iter().any(matches)
    }
}
