//! List rules command implementation.

use demeter_lint_core::{Config, ModelIndex};
use demeter_lint_rules::all_rules;
use std::sync::Arc;

/// Runs the list-rules command.
pub fn run() {
    let rules = all_rules(&Arc::new(ModelIndex::new()), &Config::default());

    println!("Available rules:\n");
    println!("{:<8} {:<48} Description", "Code", "Name");
    println!("{}", "-".repeat(100));

    for rule in &rules {
        println!(
            "{:<8} {:<48} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
        if let Some(url) = rule.url() {
            println!("{:<8} {:<48} {url}", "", "");
        }
    }

    println!("\nPresets:");
    println!("  recommended  - DL001, DL002 (default)");
    println!("  minimal      - DL001 only (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  demeter-lint check --rules law-of-demeter");
    println!("  demeter-lint check --rules DL001,DL002");
}
