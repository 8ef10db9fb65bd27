//! # demeter-lint
//!
//! Reviews Rails code for Law of Demeter violations and instance variables
//! in partial views, working from exported syntax trees and a model schema.
//!
//! This is the main facade crate that re-exports core functionality and rules.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! demeter-lint = "0.3"
//! ```
//!
//! ```rust,ignore
//! // tests/demeter.rs
//! demeter_lint::check!();
//! ```
//!
//! This reviews the project as part of `cargo test`. Configure via
//! `demeter-lint.toml`:
//!
//! ```toml
//! schema = "models.toml"
//! fail_on = "warning"
//!
//! [analyzer]
//! root = "ast"
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use demeter_lint::{Analyzer, ModelIndex};
//! use demeter_lint::rules::LawOfDemeter;
//!
//! let models = Arc::new(ModelIndex::from_file(Path::new("models.toml"))?);
//! let analyzer = Analyzer::builder()
//!     .root("./ast")
//!     .rule(LawOfDemeter::from_index(models))
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use demeter_lint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use demeter_lint_rules::*;
}

mod runner;

pub use runner::{check_project, run_check, CheckOptions, Outcome, RunError};

/// Generates a `#[test]` that reviews the current project.
///
/// Accepts optional `preset`, `config`, and `fail_on` overrides:
///
/// ```rust,ignore
/// demeter_lint::check!(preset = "minimal", fail_on = "warning");
/// ```
#[macro_export]
macro_rules! check {
    () => {
        $crate::check!(@emit None, None, None);
    };
    (preset = $preset:literal $(,)?) => {
        $crate::check!(@emit Some($preset), None, None);
    };
    (config = $config:literal $(,)?) => {
        $crate::check!(@emit None, Some($config), None);
    };
    (fail_on = $fail_on:literal $(,)?) => {
        $crate::check!(@emit None, None, Some($fail_on));
    };
    (preset = $preset:literal, config = $config:literal $(,)?) => {
        $crate::check!(@emit Some($preset), Some($config), None);
    };
    (preset = $preset:literal, fail_on = $fail_on:literal $(,)?) => {
        $crate::check!(@emit Some($preset), None, Some($fail_on));
    };
    (config = $config:literal, fail_on = $fail_on:literal $(,)?) => {
        $crate::check!(@emit None, Some($config), Some($fail_on));
    };
    (preset = $preset:literal, config = $config:literal, fail_on = $fail_on:literal $(,)?) => {
        $crate::check!(@emit Some($preset), Some($config), Some($fail_on));
    };
    (@emit $preset:expr, $config:expr, $fail_on:expr) => {
        #[test]
        fn demeter_lint_check() {
            $crate::run_check($preset, $config, $fail_on);
        }
    };
}
