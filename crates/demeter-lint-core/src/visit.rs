//! Traversal engine.
//!
//! Walks a tree depth-first in document order (pre-order: a node before its
//! children, a call's subject before its arguments) and dispatches every
//! node to the rules that declared its kind as interesting.

use crate::ast::{Node, Span};
use crate::context::FileContext;
use crate::rule::Rule;
use crate::types::{Location, Suggestion, Violation};

use std::path::Path;

/// Pre-order iterator over a tree.
///
/// Uses an explicit stack, so deeply nested call chains cannot overflow.
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().rev());
        Some(node)
    }
}

/// Returns a pre-order iterator starting at `root`.
#[must_use]
pub fn walk(root: &Node) -> Walk<'_> {
    Walk { stack: vec![root] }
}

/// Sink through which a rule records findings for the current file.
///
/// Each finding is stamped with the rule's code, name, severity,
/// suggestion, and URL.
pub struct Findings<'a> {
    rule: &'a dyn Rule,
    file: &'a Path,
    out: &'a mut Vec<Violation>,
}

impl<'a> Findings<'a> {
    /// Creates a sink appending to `out` on behalf of `rule`.
    pub fn new(rule: &'a dyn Rule, file: &'a Path, out: &'a mut Vec<Violation>) -> Self {
        Self { rule, file, out }
    }

    /// Records one finding at `span`.
    pub fn add_error(&mut self, span: Span, message: impl Into<String>) {
        let location = Location::new(self.file.to_path_buf(), span.line, span.column);
        let mut violation = Violation::new(
            self.rule.code(),
            self.rule.name(),
            self.rule.default_severity(),
            location,
            message,
        );
        if let Some(hint) = self.rule.suggestion() {
            violation = violation.with_suggestion(Suggestion::new(hint));
        }
        if let Some(url) = self.rule.url() {
            violation = violation.with_doc_ref(url);
        }
        self.out.push(violation);
    }
}

/// Runs `rules` over one tree and returns their findings in visitation order.
///
/// Rules whose [`Rule::is_interesting_file`] rejects `ctx` are skipped
/// entirely.
#[must_use]
pub fn review(ctx: &FileContext<'_>, root: &Node, rules: &[&dyn Rule]) -> Vec<Violation> {
    let active: Vec<&dyn Rule> = rules
        .iter()
        .copied()
        .filter(|rule| rule.is_interesting_file(ctx))
        .collect();

    let mut violations = Vec::new();
    if active.is_empty() {
        return violations;
    }

    for node in walk(root) {
        let kind = node.kind();
        for &rule in &active {
            if !rule.interesting_nodes().contains(&kind) {
                continue;
            }
            let mut findings = Findings::new(rule, &ctx.relative_path, &mut violations);
            match node {
                Node::Call(call) => rule.on_call(ctx, call, &mut findings),
                Node::Reference(reference) => rule.on_reference(ctx, reference, &mut findings),
                Node::Block(block) => rule.on_block(ctx, block, &mut findings),
            }
        }
    }

    violations
}

/// Runs a single rule over one tree.
#[must_use]
pub fn check(rule: &dyn Rule, ctx: &FileContext<'_>, root: &Node) -> Vec<Violation> {
    review(ctx, root, &[rule])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Call, NodeKind, Reference};
    use crate::types::Severity;

    fn sample_tree() -> Node {
        // def show; render(@post.title); end
        Node::block(
            "def",
            vec![Node::Call(Call {
                subject: None,
                message: "render".to_string(),
                arguments: vec![Node::call(Node::ivar("@post").at(1, 8), "title").at(1, 8)],
                span: Span::new(1, 1),
            })],
        )
    }

    #[test]
    fn walk_is_pre_order() {
        let tree = sample_tree();
        let kinds: Vec<NodeKind> = walk(&tree).map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Block,
                NodeKind::Call,
                NodeKind::Call,
                NodeKind::InstanceVariable,
            ]
        );
    }

    #[test]
    fn walk_handles_deep_chains() {
        let mut node = Node::lvar("x");
        for _ in 0..100_000 {
            node = Node::call(node, "next");
        }
        assert_eq!(walk(&node).count(), 100_001);
        // Drop iteratively so the test itself does not overflow the stack.
        let mut current = Some(node);
        while let Some(Node::Call(call)) = current {
            current = call.subject.map(|b| *b);
        }
    }

    struct CallCounter;

    impl Rule for CallCounter {
        fn name(&self) -> &'static str {
            "call-counter"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn url(&self) -> Option<&'static str> {
            Some("http://example.com/calls")
        }
        fn interesting_nodes(&self) -> &'static [NodeKind] {
            &[NodeKind::Call]
        }
        fn on_call(&self, _ctx: &FileContext<'_>, node: &Call, findings: &mut Findings<'_>) {
            findings.add_error(node.span, node.message.clone());
        }
    }

    struct IvarInPartials;

    impl Rule for IvarInPartials {
        fn name(&self) -> &'static str {
            "ivar-in-partials"
        }
        fn code(&self) -> &'static str {
            "T002"
        }
        fn suggestion(&self) -> Option<&'static str> {
            Some("pass a local")
        }
        fn default_severity(&self) -> Severity {
            Severity::Error
        }
        fn interesting_nodes(&self) -> &'static [NodeKind] {
            &[NodeKind::InstanceVariable]
        }
        fn is_interesting_file(&self, ctx: &FileContext<'_>) -> bool {
            ctx.is_partial_view
        }
        fn on_reference(
            &self,
            _ctx: &FileContext<'_>,
            node: &Reference,
            findings: &mut Findings<'_>,
        ) {
            findings.add_error(node.span, node.name.clone());
        }
    }

    #[test]
    fn dispatches_only_interesting_kinds() {
        let tree = sample_tree();
        let path = Path::new("app/controllers/posts_controller.rb");
        let ctx = FileContext::new(path, Path::new("/"));

        let violations = check(&CallCounter, &ctx, &tree);
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, vec!["render", "title"]);
        assert_eq!(violations[0].code, "T001");
        assert_eq!(violations[0].doc_ref.as_deref(), Some("http://example.com/calls"));
        assert_eq!(violations[1].location.line, 1);
        assert_eq!(violations[1].location.column, 8);
    }

    #[test]
    fn skips_uninteresting_files() {
        let tree = sample_tree();
        let ctx = FileContext::new(Path::new("app/views/posts/show.html.erb"), Path::new("/"));
        assert!(check(&IvarInPartials, &ctx, &tree).is_empty());

        let ctx = FileContext::new(Path::new("app/views/posts/_post.html.erb"), Path::new("/"));
        let violations = check(&IvarInPartials, &ctx, &tree);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(
            violations[0].suggestion,
            Some(Suggestion::new("pass a local"))
        );
    }

    #[test]
    fn runs_several_rules_in_one_pass() {
        let tree = sample_tree();
        let ctx = FileContext::new(Path::new("app/views/posts/_post.html.erb"), Path::new("/"));
        let rules: [&dyn Rule; 2] = [&CallCounter, &IvarInPartials];
        let violations = review(&ctx, &tree, &rules);
        let codes: Vec<&str> = violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec!["T001", "T001", "T002"]);
    }
}
