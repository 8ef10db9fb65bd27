//! Rule to forbid instance variables in partial views.
//!
//! # Rationale
//!
//! A partial that reads `@post` silently depends on whatever controller
//! action rendered it. Passing `post` as a local makes the dependency
//! explicit and lets the partial be reused.
//!
//! # Configuration
//!
//! - `patterns`: extra glob patterns (relative to the project root) of files
//!   to treat as partials, e.g. `["app/components/**/_*.erb"]`

use demeter_lint_core::{FileContext, Findings, NodeKind, Reference, Rule, RuleConfig, Severity};
use tracing::warn;

/// Rule code for replace-instance-variable-with-local-variable.
pub const CODE: &str = "DL002";

/// Rule name for replace-instance-variable-with-local-variable.
pub const NAME: &str = "replace-instance-variable-with-local-variable";

/// Message reported for each finding.
pub const MESSAGE: &str = "replace instance variable with local variable";

/// Best-practice write-up.
pub const URL: &str =
    "http://rails-bestpractices.com/posts/27-replace-instance-variable-with-local-variable";

/// Flags every instance variable reference inside a partial view.
#[derive(Debug, Clone)]
pub struct ReplaceInstanceVariableWithLocalVariable {
    /// Additional files treated as partials.
    pub patterns: Vec<glob::Pattern>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ReplaceInstanceVariableWithLocalVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplaceInstanceVariableWithLocalVariable {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            severity: Severity::Error,
        }
    }

    /// Creates a rule from its configuration section.
    ///
    /// Invalid patterns are logged and skipped.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let Some(config) = config else {
            return Self::new();
        };

        let patterns = config
            .get_str_array("patterns")
            .into_iter()
            .filter_map(|p| match glob::Pattern::new(&p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(rule = NAME, pattern = %p, "Ignoring invalid pattern: {e}");
                    None
                }
            })
            .collect();

        Self {
            patterns,
            ..Self::new()
        }
    }

    /// Adds a glob pattern of files to treat as partials.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid glob.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, glob::PatternError> {
        self.patterns.push(glob::Pattern::new(pattern)?);
        Ok(self)
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ReplaceInstanceVariableWithLocalVariable {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids instance variables in partial views"
    }

    fn url(&self) -> Option<&'static str> {
        Some(URL)
    }

    fn suggestion(&self) -> Option<&'static str> {
        Some(
            "Pass the value as a local, \
             e.g. `render partial: \"post\", locals: { post: @post }`",
        )
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn interesting_nodes(&self) -> &'static [NodeKind] {
        &[NodeKind::InstanceVariable]
    }

    fn is_interesting_file(&self, ctx: &FileContext<'_>) -> bool {
        ctx.is_partial_view
            || self
                .patterns
                .iter()
                .any(|p| p.matches_path(&ctx.relative_path))
    }

    fn on_reference(&self, _ctx: &FileContext<'_>, node: &Reference, findings: &mut Findings<'_>) {
        findings.add_error(node.span, MESSAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demeter_lint_core::{visit, Config, Node, Violation};
    use std::path::Path;

    fn partial_body() -> Node {
        // <%= @post.title %> <%= post.body %>
        Node::block(
            "template",
            vec![
                Node::call(Node::ivar("@post").at(1, 5), "title").at(1, 5),
                Node::call(Node::lvar("post").at(1, 25), "body").at(1, 25),
            ],
        )
    }

    fn check_file(rule: &ReplaceInstanceVariableWithLocalVariable, path: &str) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new(path), Path::new("/"));
        visit::check(rule, &ctx, &partial_body())
    }

    #[test]
    fn test_detects_ivar_in_partial() {
        let rule = ReplaceInstanceVariableWithLocalVariable::new();
        let violations = check_file(&rule, "app/views/posts/_post.html.erb");

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(violations[0].message, MESSAGE);
        assert_eq!(violations[0].location.column, 5);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_ignores_full_views_and_models() {
        let rule = ReplaceInstanceVariableWithLocalVariable::new();
        assert!(check_file(&rule, "app/views/posts/show.html.erb").is_empty());
        assert!(check_file(&rule, "app/models/post.rb").is_empty());
    }

    #[test]
    fn test_extra_patterns() {
        let rule = ReplaceInstanceVariableWithLocalVariable::new()
            .pattern("app/components/**/_*.erb")
            .expect("valid pattern");
        assert_eq!(check_file(&rule, "app/components/cards/_card.erb").len(), 1);
        assert!(check_file(&rule, "app/components/cards/card.erb").is_empty());
    }

    #[test]
    fn test_from_config_skips_invalid_patterns() {
        let config = Config::parse(
            r#"
[rules.replace-instance-variable-with-local-variable]
patterns = ["app/cells/**/*.erb", "["]
"#,
        )
        .expect("Failed to parse");

        let rule = ReplaceInstanceVariableWithLocalVariable::from_config(config.rule(NAME));
        assert_eq!(rule.patterns.len(), 1);
        assert_eq!(check_file(&rule, "app/cells/post/show.erb").len(), 1);
    }
}
