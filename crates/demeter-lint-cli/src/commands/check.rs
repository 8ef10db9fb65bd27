//! Check command implementation.

use anyhow::{bail, Context, Result};
use demeter_lint_core::{Analyzer, Config, ModelIndex, RuleBox, Severity};
use demeter_lint_rules::{
    law_of_demeter, replace_instance_variable_with_local_variable, LawOfDemeter, Preset,
    ReplaceInstanceVariableWithLocalVariable,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of the check command.
pub struct CheckOptions {
    /// Project root holding the AST documents.
    pub path: PathBuf,
    /// Model schema overriding the configured one.
    pub schema: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
}

/// Runs the check command.
///
/// Returns `true` when findings reach the configured `fail_on` severity.
pub fn run(options: CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let fail_on = fail_on_severity(&config)?;
    let models = Arc::new(load_models(&options, &config)?);

    let rules_to_add = if let Some(filter) = &options.rules {
        let rule_names: Vec<&str> = filter.split(',').map(str::trim).collect();
        filter_rules(&rule_names, &models, &config)
    } else {
        let preset = match config.preset.as_deref() {
            Some(name) => Preset::from_name(name)
                .with_context(|| format!("Unknown preset: {name}"))?,
            None => Preset::Recommended,
        };
        preset.rules(&models, &config)
    };

    let mut builder = Analyzer::builder().root(&options.path).config(config);
    for pattern in options.exclude {
        builder = builder.exclude(pattern);
    }
    for rule in rules_to_add {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        options.path.display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, options.format)?;

    Ok(result.has_violations_at(fail_on))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn fail_on_severity(config: &Config) -> Result<Severity> {
    match config.fail_on.as_deref() {
        None => Ok(Severity::Error),
        Some(name) => match Severity::from_name(name) {
            Some(severity) => Ok(severity),
            None => bail!("Invalid fail_on severity: {name}"),
        },
    }
}

/// Loads the model index from `--schema`, or from the configured schema
/// relative to the project root.
fn load_models(options: &CheckOptions, config: &Config) -> Result<ModelIndex> {
    let schema = options
        .schema
        .clone()
        .or_else(|| config.schema.as_ref().map(|s| resolve_schema(&options.path, s)));

    let Some(schema) = schema else {
        tracing::warn!("No model schema configured; law-of-demeter will not report anything");
        return Ok(ModelIndex::new());
    };

    let models = ModelIndex::from_file(&schema)
        .with_context(|| format!("Failed to load model schema: {}", schema.display()))?;
    tracing::debug!("Loaded {} models from {}", models.len(), schema.display());
    Ok(models)
}

fn resolve_schema(root: &Path, schema: &Path) -> PathBuf {
    if schema.is_absolute() {
        schema.to_path_buf()
    } else {
        root.join(schema)
    }
}

fn filter_rules(names: &[&str], models: &Arc<ModelIndex>, config: &Config) -> Vec<RuleBox> {
    let mut rules: Vec<RuleBox> = Vec::new();

    for name in names {
        match *name {
            law_of_demeter::NAME | law_of_demeter::CODE => {
                rules.push(Box::new(LawOfDemeter::from_index(Arc::clone(models))));
            }
            replace_instance_variable_with_local_variable::NAME
            | replace_instance_variable_with_local_variable::CODE => {
                rules.push(Box::new(ReplaceInstanceVariableWithLocalVariable::from_config(
                    config.rule(replace_instance_variable_with_local_variable::NAME),
                )));
            }
            _ => tracing::warn!("Unknown rule: {}", name),
        }
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_names_and_codes() {
        let models = Arc::new(ModelIndex::new());
        let config = Config::default();
        let rules = filter_rules(
            &["DL001", "replace-instance-variable-with-local-variable"],
            &models,
            &config,
        );
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec!["law-of-demeter", "replace-instance-variable-with-local-variable"]
        );
    }

    #[test]
    fn filter_skips_unknown_rules() {
        let models = Arc::new(ModelIndex::new());
        assert!(filter_rules(&["no-such-rule"], &models, &Config::default()).is_empty());
    }

    #[test]
    fn fail_on_defaults_to_error() {
        assert_eq!(
            fail_on_severity(&Config::default()).expect("default"),
            Severity::Error
        );

        let config = Config::parse("fail_on = \"warning\"").expect("parse");
        assert_eq!(fail_on_severity(&config).expect("warning"), Severity::Warning);

        let config = Config::parse("fail_on = \"fatal\"").expect("parse");
        assert!(fail_on_severity(&config).is_err());
    }

    #[test]
    fn relative_schema_resolves_against_root() {
        assert_eq!(
            resolve_schema(Path::new("/project"), Path::new("db/models.toml")),
            PathBuf::from("/project/db/models.toml")
        );
        assert_eq!(
            resolve_schema(Path::new("/project"), Path::new("/etc/models.toml")),
            PathBuf::from("/etc/models.toml")
        );
    }
}
