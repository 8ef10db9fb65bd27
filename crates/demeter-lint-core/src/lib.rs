//! # demeter-lint-core
//!
//! Core framework for reviewing Rails-style model code from parsed syntax trees.
//!
//! This crate provides the foundational traits and types for building
//! reviews. It includes:
//!
//! - [`Node`] and friends, the syntax tree model
//! - [`Rule`] trait with one callback per node kind
//! - [`visit`], the traversal engine that dispatches nodes to rules
//! - [`AssociationRegistry`] / [`AttributeRegistry`] lookups and the
//!   [`ModelIndex`] that implements them
//! - [`Analyzer`] for orchestrating review execution over a directory
//! - [`Violation`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use demeter_lint_core::{Analyzer, ModelIndex};
//!
//! let models = Arc::new(ModelIndex::from_file(Path::new("models.toml"))?);
//! let analyzer = Analyzer::builder()
//!     .root("./ast")
//!     .rule(MyRule::new(models))
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod ast;
mod config;
mod context;
pub mod inflect;
pub mod registry;
mod rule;
mod types;
pub mod visit;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, AST_SUFFIX};
pub use ast::{Block, Call, Node, NodeKind, Reference, ReferenceKind, SourceDocument, Span};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use registry::{
    Association, AssociationKind, AssociationRegistry, AttributeRegistry, ModelIndex, SchemaError,
};
pub use rule::{Rule, RuleBox};
pub use types::{LintResult, Location, Severity, Suggestion, Violation};
pub use visit::Findings;
