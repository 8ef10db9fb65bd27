//! Project-level runner behind [`check!`](crate::check).
//!
//! Loads `demeter-lint.toml` and the model schema from the project root,
//! reviews the AST documents, and reports findings that reach `fail_on`.

use demeter_lint_core::{
    Analyzer, AnalyzerError, Config, ConfigError, LintResult, ModelIndex, SchemaError, Severity,
};
use demeter_lint_rules::Preset;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["demeter-lint.toml", ".demeter-lint.toml"];

/// Errors while running a project check.
#[derive(Debug, Error)]
pub enum RunError {
    /// The config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The model schema could not be loaded.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Analysis failed.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// Unknown preset name.
    #[error("unknown preset `{0}`. Valid presets: recommended, minimal")]
    UnknownPreset(String),

    /// Unknown severity name.
    #[error("unknown severity `{0}`. Valid values: error, warning, info")]
    UnknownSeverity(String),
}

/// Overrides for a project check; `None` falls back to the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions<'a> {
    /// Preset name.
    pub preset: Option<&'a str>,
    /// Config file, relative to the project root.
    pub config_path: Option<&'a str>,
    /// Failure threshold.
    pub fail_on: Option<&'a str>,
}

/// Findings of a project check and the threshold they are judged by.
#[derive(Debug)]
pub struct Outcome {
    /// Review results.
    pub result: LintResult,
    /// Effective failure threshold.
    pub fail_on: Severity,
}

impl Outcome {
    /// Returns true if any finding reaches the threshold.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.result.has_violations_at(self.fail_on)
    }

    /// Formats the failing findings as a test report.
    #[must_use]
    pub fn report(&self) -> String {
        self.result.format_test_report(self.fail_on)
    }
}

/// Reviews the project at `root`.
///
/// # Errors
///
/// Returns an error if the config, schema, or any AST document cannot be
/// loaded, or an override names an unknown preset or severity.
pub fn check_project(root: &Path, options: CheckOptions<'_>) -> Result<Outcome, RunError> {
    let config = load_config(root, options.config_path)?;
    let preset = resolve_preset(options.preset, &config)?;
    let fail_on = resolve_fail_on(options.fail_on, &config)?;
    let models = Arc::new(load_models(root, &config)?);

    let ast_root = root.join(&config.analyzer.root);
    let mut builder = Analyzer::builder().root(ast_root);
    for rule in preset.rules(&models, &config) {
        builder = builder.rule_box(rule);
    }

    let result = builder.config(config).build()?.analyze()?;
    Ok(Outcome { result, fail_on })
}

/// Runs demeter-lint as part of `cargo test`.
///
/// # Panics
///
/// Panics with a formatted report if findings at or above `fail_on` are
/// found, or if the check cannot run at all.
pub fn run_check(preset: Option<&str>, config_path: Option<&str>, fail_on: Option<&str>) {
    let root = find_project_root();
    let options = CheckOptions {
        preset,
        config_path,
        fail_on,
    };

    let outcome = check_project(&root, options)
        .unwrap_or_else(|e| panic!("demeter-lint: check of {} failed: {e}", root.display()));

    if outcome.is_failure() {
        panic!("{}", outcome.report());
    }
}

fn load_config(root: &Path, explicit_path: Option<&str>) -> Result<Config, RunError> {
    if let Some(path) = explicit_path {
        return Ok(Config::from_file(&resolve(root, Path::new(path)))?);
    }

    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .map_or_else(|| Ok(Config::default()), |path| Ok(Config::from_file(&path)?))
}

fn load_models(root: &Path, config: &Config) -> Result<ModelIndex, RunError> {
    match &config.schema {
        Some(schema) => Ok(ModelIndex::from_file(&resolve(root, schema))?),
        None => {
            tracing::warn!("No model schema configured; law-of-demeter will not report anything");
            Ok(ModelIndex::new())
        }
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Finds the project root: the nearest ancestor of `CARGO_MANIFEST_DIR`
/// holding a config file, else the manifest directory itself.
fn find_project_root() -> PathBuf {
    let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    };
    let manifest_dir = PathBuf::from(manifest_dir);

    manifest_dir
        .ancestors()
        .find(|dir| CONFIG_CANDIDATES.iter().any(|name| dir.join(name).is_file()))
        .map_or_else(|| manifest_dir.clone(), Path::to_path_buf)
}

/// Resolves the preset from explicit argument > config > default.
fn resolve_preset(explicit: Option<&str>, config: &Config) -> Result<Preset, RunError> {
    let name = explicit
        .or(config.preset.as_deref())
        .unwrap_or("recommended");
    Preset::from_name(name).ok_or_else(|| RunError::UnknownPreset(name.to_string()))
}

/// Resolves the failure threshold from explicit argument > config > default.
fn resolve_fail_on(explicit: Option<&str>, config: &Config) -> Result<Severity, RunError> {
    let name = explicit.or(config.fail_on.as_deref()).unwrap_or("error");
    Severity::from_name(name).ok_or_else(|| RunError::UnknownSeverity(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preset_defaults_to_recommended() {
        let config = Config::default();
        assert_eq!(
            resolve_preset(None, &config).unwrap(),
            Preset::Recommended
        );
    }

    #[test]
    fn resolve_preset_explicit_takes_precedence() {
        let mut config = Config::default();
        config.preset = Some("recommended".to_string());
        assert_eq!(
            resolve_preset(Some("minimal"), &config).unwrap(),
            Preset::Minimal
        );
    }

    #[test]
    fn resolve_preset_rejects_unknown() {
        let config = Config::default();
        assert!(matches!(
            resolve_preset(Some("strict"), &config),
            Err(RunError::UnknownPreset(name)) if name == "strict"
        ));
    }

    #[test]
    fn resolve_fail_on_precedence() {
        let mut config = Config::default();
        assert_eq!(resolve_fail_on(None, &config).unwrap(), Severity::Error);

        config.fail_on = Some("info".to_string());
        assert_eq!(resolve_fail_on(None, &config).unwrap(), Severity::Info);
        assert_eq!(
            resolve_fail_on(Some("warning"), &config).unwrap(),
            Severity::Warning
        );
    }

    #[test]
    fn resolve_fail_on_rejects_unknown() {
        let config = Config::default();
        assert!(matches!(
            resolve_fail_on(Some("critical"), &config),
            Err(RunError::UnknownSeverity(_))
        ));
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        assert_eq!(
            resolve(Path::new("/project"), Path::new("/schemas/models.toml")),
            PathBuf::from("/schemas/models.toml")
        );
        assert_eq!(
            resolve(Path::new("/project"), Path::new("models.toml")),
            PathBuf::from("/project/models.toml")
        );
    }
}
