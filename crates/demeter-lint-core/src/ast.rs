//! Syntax tree model consumed by reviews.
//!
//! Trees arrive as JSON documents produced by an external parser:
//!
//! ```json
//! {
//!   "path": "app/views/invoices/show.html.erb",
//!   "root": {
//!     "type": "call",
//!     "subject": {
//!       "type": "call",
//!       "subject": { "type": "reference", "kind": "ivar", "name": "@invoice" },
//!       "message": "user"
//!     },
//!     "message": "name",
//!     "span": { "line": 3, "column": 5 }
//!   }
//! }
//! ```
//!
//! Only three node shapes exist: [`Call`], [`Reference`], and [`Block`].
//! Everything that is neither a method call nor a terminal name reference
//! is a [`Block`] with a free-form kind label.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Position of a node in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Span {
    /// Creates a span at the given line and column.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

/// Flattened node kind, used by reviews to declare what they want to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A method call (`subject.message(args)`).
    Call,
    /// A local variable reference (`invoice`).
    LocalVariable,
    /// An instance variable reference (`@invoice`).
    InstanceVariable,
    /// Any other terminal reference (constants, globals, `self`).
    OtherReference,
    /// Any non-call, non-reference construct.
    Block,
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Method call.
    Call(Call),
    /// Terminal name reference.
    Reference(Reference),
    /// Any other construct.
    Block(Block),
}

impl Node {
    /// Builds a call node `subject.message`.
    #[must_use]
    pub fn call(subject: Node, message: impl Into<String>) -> Self {
        Self::Call(Call {
            subject: Some(Box::new(subject)),
            message: message.into(),
            arguments: Vec::new(),
            span: Span::default(),
        })
    }

    /// Builds a receiverless call node such as `belongs_to` or `render`.
    #[must_use]
    pub fn bare_call(message: impl Into<String>) -> Self {
        Self::Call(Call {
            subject: None,
            message: message.into(),
            arguments: Vec::new(),
            span: Span::default(),
        })
    }

    /// Builds a local variable reference.
    #[must_use]
    pub fn lvar(name: impl Into<String>) -> Self {
        Self::Reference(Reference::new(ReferenceKind::LocalVariable, name))
    }

    /// Builds an instance variable reference.
    #[must_use]
    pub fn ivar(name: impl Into<String>) -> Self {
        Self::Reference(Reference::new(ReferenceKind::InstanceVariable, name))
    }

    /// Builds a block node with the given children.
    #[must_use]
    pub fn block(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Block(Block {
            kind: kind.into(),
            children,
            span: Span::default(),
        })
    }

    /// Returns this node positioned at `line:column`.
    #[must_use]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        let span = Span::new(line, column);
        match &mut self {
            Self::Call(call) => call.span = span,
            Self::Reference(reference) => reference.span = span,
            Self::Block(block) => block.span = span,
        }
        self
    }

    /// Returns the flattened kind of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Call(_) => NodeKind::Call,
            Self::Reference(reference) => match reference.kind {
                ReferenceKind::LocalVariable => NodeKind::LocalVariable,
                ReferenceKind::InstanceVariable => NodeKind::InstanceVariable,
                ReferenceKind::Other => NodeKind::OtherReference,
            },
            Self::Block(_) => NodeKind::Block,
        }
    }

    /// Returns the source position of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Call(call) => call.span,
            Self::Reference(reference) => reference.span,
            Self::Block(block) => block.span,
        }
    }

    /// Returns the call if this node is one.
    #[must_use]
    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Self::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Returns the reference if this node is one.
    #[must_use]
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Returns the direct children of this node in document order.
    ///
    /// For a call, the subject comes before the arguments.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Node> {
        let (subject, rest): (Option<&Node>, &[Node]) = match self {
            Self::Call(call) => (call.subject.as_deref(), &call.arguments),
            Self::Reference(_) => (None, &[]),
            Self::Block(block) => (None, &block.children),
        };
        subject.into_iter().chain(rest.iter())
    }
}

/// A method call `subject.message(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Receiver of the call; `None` for receiverless calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Box<Node>>,
    /// Method name.
    pub message: String,
    /// Call arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Node>,
    /// Source position.
    #[serde(default)]
    pub span: Span,
}

impl Call {
    /// Returns the subject if it is itself a call.
    #[must_use]
    pub fn subject_call(&self) -> Option<&Call> {
        self.subject.as_deref().and_then(Node::as_call)
    }

    /// Returns the subject if it is a terminal reference.
    #[must_use]
    pub fn subject_reference(&self) -> Option<&Reference> {
        self.subject.as_deref().and_then(Node::as_reference)
    }
}

/// Kind of a terminal reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReferenceKind {
    /// Local variable (`lvar`).
    LocalVariable,
    /// Instance variable (`ivar`).
    InstanceVariable,
    /// Anything else.
    Other,
}

impl ReferenceKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocalVariable => "lvar",
            Self::InstanceVariable => "ivar",
            Self::Other => "other",
        }
    }
}

impl From<String> for ReferenceKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "lvar" | "local_variable" => Self::LocalVariable,
            "ivar" | "instance_variable" => Self::InstanceVariable,
            _ => Self::Other,
        }
    }
}

impl From<ReferenceKind> for String {
    fn from(kind: ReferenceKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A terminal name reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// What the name refers to.
    pub kind: ReferenceKind,
    /// Identifier as written, sigil included (`@invoice`).
    pub name: String,
    /// Source position.
    #[serde(default)]
    pub span: Span,
}

impl Reference {
    /// Creates a reference at the default position.
    #[must_use]
    pub fn new(kind: ReferenceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Returns true for local and instance variable references.
    #[must_use]
    pub fn is_variable(&self) -> bool {
        matches!(
            self.kind,
            ReferenceKind::LocalVariable | ReferenceKind::InstanceVariable
        )
    }
}

/// Any construct that is neither a call nor a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Free-form label (`class`, `def`, `template`, ...).
    pub kind: String,
    /// Child nodes in document order.
    #[serde(default)]
    pub children: Vec<Node>,
    /// Source position.
    #[serde(default)]
    pub span: Span,
}

/// One parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Path of the original source file, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Root node of the tree.
    pub root: Node,
}

impl SourceDocument {
    /// Creates a document for `path` rooted at `root`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, root: Node) -> Self {
        Self {
            path: Some(path.into()),
            root,
        }
    }

    /// Parses a document from JSON.
    ///
    /// `serde_json` stops at 128 levels of nesting, so a tree deeper than
    /// that (roughly 127 chained calls) is rejected. The analyzer counts such
    /// documents in [`LintResult::files_skipped`](crate::LintResult).
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, nested too deeply, or does
    /// not describe a tree.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_level_chain() {
        let json = r#"{
            "path": "app/models/invoice.rb",
            "root": {
                "type": "call",
                "subject": {
                    "type": "call",
                    "subject": { "type": "reference", "kind": "ivar", "name": "@invoice" },
                    "message": "user"
                },
                "message": "name",
                "span": { "line": 3, "column": 5 }
            }
        }"#;

        let doc = SourceDocument::from_json(json).expect("document should parse");
        let outer = doc.root.as_call().expect("root is a call");
        assert_eq!(outer.message, "name");
        assert_eq!(outer.span, Span::new(3, 5));

        let inner = outer.subject_call().expect("subject is a call");
        assert_eq!(inner.message, "user");
        assert_eq!(inner.span, Span::default());

        let reference = inner.subject_reference().expect("inner subject is a reference");
        assert_eq!(reference.kind, ReferenceKind::InstanceVariable);
        assert_eq!(reference.name, "@invoice");
    }

    #[test]
    fn unknown_reference_kind_is_other() {
        let json = r#"{ "type": "reference", "kind": "const", "name": "User" }"#;
        let node: Node = serde_json::from_str(json).expect("node should parse");
        assert_eq!(node.kind(), NodeKind::OtherReference);
    }

    #[test]
    fn long_reference_kind_names_are_accepted() {
        let json = r#"{ "type": "reference", "kind": "local_variable", "name": "invoice" }"#;
        let node: Node = serde_json::from_str(json).expect("node should parse");
        assert_eq!(node.kind(), NodeKind::LocalVariable);
    }

    #[test]
    fn rejects_unknown_node_type() {
        let json = r#"{ "root": { "type": "lambda" } }"#;
        assert!(SourceDocument::from_json(json).is_err());
    }

    #[test]
    fn children_put_subject_before_arguments() {
        let Node::Call(mut call) = Node::call(Node::lvar("form"), "text_field") else {
            unreachable!()
        };
        call.arguments.push(Node::ivar("@title"));
        let node = Node::Call(call);

        let kinds: Vec<NodeKind> = node.children().map(Node::kind).collect();
        assert_eq!(kinds, vec![NodeKind::LocalVariable, NodeKind::InstanceVariable]);
    }

    fn chain_json(depth: usize) -> String {
        let mut json = String::from(r#"{"root": "#);
        for _ in 0..depth {
            json.push_str(r#"{"type":"call","message":"next","subject":"#);
        }
        json.push_str(r#"{"type":"reference","kind":"lvar","name":"x"}"#);
        json.push_str(&"}".repeat(depth + 1));
        json
    }

    #[test]
    fn nesting_limit() {
        assert!(SourceDocument::from_json(&chain_json(50)).is_ok());

        let err = SourceDocument::from_json(&chain_json(200)).unwrap_err();
        assert!(err.to_string().contains("recursion limit exceeded"));
    }

    #[test]
    fn at_sets_span() {
        let node = Node::ivar("@post").at(4, 9);
        assert_eq!(node.span(), Span::new(4, 9));
    }
}
