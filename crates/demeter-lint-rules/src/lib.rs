//! # demeter-lint-rules
//!
//! Built-in review rules for demeter-lint.
//!
//! ## Available Rules
//!
//! | Code | Name |
//! |------|------|
//! | DL001 | `law-of-demeter` |
//! | DL002 | `replace-instance-variable-with-local-variable` |
//!
//! ## Usage
//!
//! ```ignore
//! use demeter_lint_core::{Analyzer, ModelIndex};
//! use demeter_lint_rules::{LawOfDemeter, ReplaceInstanceVariableWithLocalVariable};
//!
//! let models = Arc::new(ModelIndex::from_file(Path::new("models.toml"))?);
//! let analyzer = Analyzer::builder()
//!     .root("./ast")
//!     .rule(LawOfDemeter::from_index(models))
//!     .rule(ReplaceInstanceVariableWithLocalVariable::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod law_of_demeter;
mod presets;
pub mod replace_instance_variable_with_local_variable;

pub use law_of_demeter::LawOfDemeter;
pub use presets::{all_rules, minimal_rules, recommended_rules, Preset};
pub use replace_instance_variable_with_local_variable::ReplaceInstanceVariableWithLocalVariable;

/// Re-export core types for convenience.
pub use demeter_lint_core::{Rule, Severity, Violation};
