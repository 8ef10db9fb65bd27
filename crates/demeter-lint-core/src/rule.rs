//! Rule trait for defining reviews.

use crate::ast::{Block, Call, NodeKind, Reference};
use crate::context::FileContext;
use crate::types::Severity;
use crate::visit::Findings;

/// A review driven by the traversal engine.
///
/// A rule declares the node kinds it cares about through
/// [`Rule::interesting_nodes`]; the engine then calls the matching `on_*`
/// callback for every such node, in document order. Callbacks record
/// findings through [`Findings::add_error`].
///
/// # Example
///
/// ```ignore
/// use demeter_lint_core::{Call, FileContext, Findings, NodeKind, Rule};
///
/// pub struct NoSend;
///
/// impl Rule for NoSend {
///     fn name(&self) -> &'static str { "no-send" }
///     fn code(&self) -> &'static str { "DL100" }
///     fn interesting_nodes(&self) -> &'static [NodeKind] { &[NodeKind::Call] }
///
///     fn on_call(&self, _ctx: &FileContext<'_>, node: &Call, findings: &mut Findings<'_>) {
///         if node.message == "send" {
///             findings.add_error(node.span, "avoid send");
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "law-of-demeter").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "DL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the URL of the best practice this rule enforces.
    fn url(&self) -> Option<&'static str> {
        None
    }

    /// Returns a fix hint attached to every finding.
    fn suggestion(&self) -> Option<&'static str> {
        None
    }

    /// Returns the default severity for findings from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Node kinds this rule wants to be called for.
    fn interesting_nodes(&self) -> &'static [NodeKind];

    /// Whether this rule applies to the given file. All files by default.
    fn is_interesting_file(&self, _ctx: &FileContext<'_>) -> bool {
        true
    }

    /// Called for every call node, if [`NodeKind::Call`] is interesting.
    fn on_call(&self, _ctx: &FileContext<'_>, _node: &Call, _findings: &mut Findings<'_>) {}

    /// Called for every reference whose kind is interesting.
    fn on_reference(
        &self,
        _ctx: &FileContext<'_>,
        _node: &Reference,
        _findings: &mut Findings<'_>,
    ) {
    }

    /// Called for every block node, if [`NodeKind::Block`] is interesting.
    fn on_block(&self, _ctx: &FileContext<'_>, _node: &Block, _findings: &mut Findings<'_>) {}
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn interesting_nodes(&self) -> &'static [NodeKind] {
            &[NodeKind::Call]
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.description(), "");
        assert_eq!(rule.url(), None);
        assert_eq!(rule.default_severity(), Severity::Error);
    }
}
