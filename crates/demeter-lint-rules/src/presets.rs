//! Rule presets for common configurations.

use crate::{LawOfDemeter, ReplaceInstanceVariableWithLocalVariable};
use demeter_lint_core::{Config, ModelIndex, RuleBox};
use std::sync::Arc;

/// Preset configurations for demeter-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule with sensible defaults.
    Recommended,
    /// Only `law-of-demeter`, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Looks up a preset by its configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "recommended" => Some(Self::Recommended),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self, models: &Arc<ModelIndex>, config: &Config) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(models, config),
            Self::Minimal => minimal_rules(models),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `law-of-demeter` (DL001)
/// - `replace-instance-variable-with-local-variable` (DL002), with any
///   `patterns` from `config`
#[must_use]
pub fn recommended_rules(models: &Arc<ModelIndex>, config: &Config) -> Vec<RuleBox> {
    all_rules(models, config)
}

/// Returns the minimal set of rules.
#[must_use]
pub fn minimal_rules(models: &Arc<ModelIndex>) -> Vec<RuleBox> {
    vec![Box::new(LawOfDemeter::from_index(Arc::clone(models)))]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules(models: &Arc<ModelIndex>, config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(LawOfDemeter::from_index(Arc::clone(models))),
        Box::new(ReplaceInstanceVariableWithLocalVariable::from_config(
            config.rule(crate::replace_instance_variable_with_local_variable::NAME),
        )),
    ]
}
