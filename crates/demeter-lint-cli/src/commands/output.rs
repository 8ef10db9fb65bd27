//! Report rendering for review results.

use anyhow::Result;
use demeter_lint_core::{LintResult, Severity, Violation};
use std::collections::BTreeMap;

use crate::OutputFormat;

/// Prints review results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Compact => {
            for violation in &result.violations {
                println!("{}", compact_line(violation));
            }
        }
    }
    Ok(())
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{}:{}:{} - {}",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            violation.message,
        );
        println!(
            "  {} [{} {}]",
            severity_label(violation.severity),
            violation.code,
            violation.rule
        );
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        if let Some(url) = &violation.doc_ref {
            println!("  = see: {url}");
        }
        println!();
    }

    for (rule, count) in count_by_rule(&result.violations) {
        println!("  {count:>5}  {rule}");
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{summary_color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) \
         in {} file(s)\x1b[0m",
        result.files_checked
    );
    if result.files_skipped > 0 {
        println!(
            "\x1b[33mSkipped {} file(s) that failed to parse\x1b[0m",
            result.files_skipped
        );
    }
}

/// `file:line:col: severity [code] message`
fn compact_line(violation: &Violation) -> String {
    format!(
        "{}:{}:{}: {} [{}] {}",
        violation.location.file.display(),
        violation.location.line,
        violation.location.column,
        violation.severity,
        violation.code,
        violation.message,
    )
}

/// Finding counts per rule name, in name order.
fn count_by_rule(violations: &[Violation]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for v in violations {
        *counts.entry(v.rule.as_str()).or_insert(0) += 1;
    }
    counts
}
