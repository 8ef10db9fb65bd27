//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const CONFIG_FILE: &str = "demeter-lint.toml";

const DEFAULT_CONFIG: &str = r#"# demeter-lint configuration

# Rule preset: "recommended" (default) or "minimal"
preset = "recommended"

# Fail (exit code 1) when findings reach this severity
fail_on = "error"

# Model schema declaring associations and attributes
schema = "models.toml"

[analyzer]
# Directory holding the *.ast.json documents (default: current directory)
# root = "./ast"

# Glob patterns to exclude from analysis
exclude = [
    "**/tmp/**",
    "**/vendor/**",
]

# Number of files reviewed in parallel (default: one per CPU)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.law-of-demeter]
enabled = true
# severity = "error"

[rules.replace-instance-variable-with-local-variable]
enabled = true
# Extra files to treat as partial views
# patterns = ["app/components/**/_*.erb"]
"#;

const DEFAULT_SCHEMA: &str = r#"# Models, their attributes, and associations.
# kind: belongs_to, has_one, has_many (anything else is ignored)
# class_name defaults to the classified association name.

# [[models]]
# name = "Invoice"
# attributes = ["total"]
# associations = [
#     { name = "user", kind = "belongs_to" },
#     { name = "items", kind = "has_many", class_name = "LineItem" },
# ]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_defaults(Path::new("."), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Declare your models in models.toml");
    println!("  2. Export AST documents (*.ast.json) for your sources");
    println!("  3. Run: demeter-lint check");

    Ok(())
}

/// Writes the default config, and a schema template if none exists.
fn write_defaults(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    let schema_path = dir.join("models.toml");
    if !schema_path.exists() {
        std::fs::write(schema_path, DEFAULT_SCHEMA)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use demeter_lint_core::registry::ModelSchema;
    use demeter_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_files_parse() {
        let config = Config::parse(DEFAULT_CONFIG).expect("default config parses");
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.is_rule_enabled("law-of-demeter"));

        let schema = ModelSchema::parse(DEFAULT_SCHEMA).expect("default schema parses");
        assert!(schema.models.is_empty());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        write_defaults(tmp.path(), false).unwrap();
        assert!(write_defaults(tmp.path(), false).is_err());
        assert!(write_defaults(tmp.path(), true).is_ok());
    }

    #[test]
    fn default_config_fails_on_one_finding() {
        use crate::commands::check::{self, CheckOptions};
        use crate::config_resolver::ConfigSource;
        use crate::OutputFormat;

        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("models.toml"),
            r#"
[[models]]
name = "Invoice"
associations = [{ name = "user", kind = "belongs_to" }]

[[models]]
name = "User"
attributes = ["name"]
"#,
        )
        .unwrap();
        write_defaults(tmp.path(), false).unwrap();
        std::fs::write(
            tmp.path().join("show.ast.json"),
            r#"{ "path": "app/views/invoices/show.html.erb", "root": {
                "type": "call", "message": "name", "span": { "line": 1, "column": 4 },
                "subject": { "type": "call", "message": "user",
                    "subject": { "type": "reference", "kind": "ivar", "name": "@invoice" } }
            } }"#,
        )
        .unwrap();

        let options = CheckOptions {
            path: tmp.path().to_path_buf(),
            schema: None,
            format: OutputFormat::Compact,
            rules: None,
            exclude: Vec::new(),
        };
        let source = ConfigSource::Project(tmp.path().join(CONFIG_FILE));
        assert!(check::run(options, &source).unwrap());
    }

    #[test]
    fn keeps_existing_schema() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("models.toml"), "models = []").unwrap();
        write_defaults(tmp.path(), false).unwrap();
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("models.toml")).unwrap(),
            "models = []"
        );
    }
}
