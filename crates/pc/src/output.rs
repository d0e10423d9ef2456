//! Output formatting helpers for the `pc` CLI.
//!
//! JSON output goes through [`output_json`]; human output is aligned
//! columns from `catalog-ui` plus the one-line and detail formats below.

use std::io::{self, Write};

use serde::Serialize;

use catalog_core::coverage::Coverage;
use catalog_core::form::Form;
use catalog_core::product::Product;
use catalog_core::rule::Rule;
use catalog_core::step::Step;
use catalog_ui::layout::render_columns;
use catalog_ui::styles::{render_bold, render_category, render_muted, render_operand};

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print rows under a header as aligned columns. Prints nothing for no rows.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", render_columns(headers, rows));
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

pub const PRODUCT_HEADERS: &[&str] = &["ID", "NAME", "FORM", "STATES"];

pub fn product_row(product: &Product) -> Vec<String> {
    vec![
        product.id.clone(),
        product.name.clone(),
        product.form_number.clone(),
        product.available_states.len().to_string(),
    ]
}

pub const COVERAGE_HEADERS: &[&str] = &["ID", "NAME", "FORM", "LIMITS", "DEDUCTIBLES"];

pub fn coverage_row(coverage: &Coverage) -> Vec<String> {
    vec![
        coverage.id.clone(),
        coverage.name.clone(),
        form_label(&coverage.form_number, &coverage.form_edition_date),
        or_dash(&coverage.limits.join(", ")),
        or_dash(&coverage.deductibles.join(", ")),
    ]
}

pub const FORM_HEADERS: &[&str] = &["ID", "NUMBER", "NAME", "EFFECTIVE", "TYPE", "CATEGORY", "PDF"];

pub fn form_row(form: &Form) -> Vec<String> {
    vec![
        form.id.clone(),
        form.label(),
        form.form_name.clone(),
        form.effective_date.clone(),
        form.form_type.to_string(),
        form.category.to_string(),
        if form.download_url.is_some() { "yes" } else { "no" }.to_string(),
    ]
}

pub const RULE_HEADERS: &[&str] = &["ID", "CODE", "NAME", "PROPRIETARY"];

pub fn rule_row(rule: &Rule) -> Vec<String> {
    vec![
        rule.id.clone(),
        or_dash(rule.code()),
        rule.name.clone(),
        if rule.proprietary { "yes" } else { "no" }.to_string(),
    ]
}

fn form_label(number: &str, edition: &str) -> String {
    if edition.is_empty() {
        number.to_string()
    } else {
        format!("{number} ({edition})")
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// One chain line: `#order  label  details`. Operands show only the
/// operator.
pub fn format_step_line(step: &Step) -> String {
    if step.is_operand() {
        return format!("{:>3}  {}", step.order, render_operand(&step.operand));
    }
    let mut parts = vec![format!(
        "{}{}{}",
        step.paren_before, step.step_name, step.paren_after
    )];
    if let Some(value) = step.value {
        parts.push(format!("= {value}"));
    }
    parts.push(render_muted(&format!("[{}]", step.coverage)));
    if !step.states.is_empty() {
        parts.push(render_muted(&step.states.join(",")));
    }
    format!("{:>3}  {}", step.order, parts.join("  "))
}

/// Detailed multi-line view of a step.
pub fn format_step_detail(step: &Step) -> String {
    let mut lines = vec![format!("{} {}", step.id, render_bold(step.label()))];
    lines.push(format!("Type: {}", step.step_type));
    lines.push(format!("Order: {}", step.order));
    if step.is_factor() {
        lines.push(format!("Coverage: {}", step.coverage));
        lines.push(format!("Factor type: {}", step.factor_type));
        lines.push(format!("Value: {}", step.value_or_zero()));
        lines.push(format!("Rounding: {}", step.rounding));
        if !step.table.is_empty() {
            lines.push(format!("Table: {}", step.table));
        }
        if !step.states.is_empty() {
            lines.push(format!("States: {}", step.states.join(", ")));
        }
        if !step.upstream_id.is_empty() {
            lines.push(format!("Upstream: {}", step.upstream_id));
        }
        if !step.rules.is_empty() {
            lines.push(String::new());
            lines.push(render_category("Rules"));
            lines.push(step.rules.clone());
        }
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

pub fn format_product_detail(product: &Product) -> String {
    let mut lines = vec![format!("{} {}", product.id, render_bold(&product.name))];
    lines.push(format!("Form: {}", product.form_number));
    if let Some(url) = &product.form_download_url {
        lines.push(format!("PDF: {url}"));
    }
    lines.push(format!(
        "States: {}",
        if product.available_states.is_empty() {
            "none".to_string()
        } else {
            product.available_states.join(", ")
        }
    ));
    lines.join("\n")
}

pub fn format_coverage_detail(coverage: &Coverage) -> String {
    let mut lines = vec![format!("{} {}", coverage.id, render_bold(&coverage.name))];
    lines.push(format!(
        "Form: {}",
        form_label(&coverage.form_number, &coverage.form_edition_date)
    ));
    lines.push(format!("Limits: {}", or_dash(&coverage.limits.join(", "))));
    lines.push(format!(
        "Deductibles: {}",
        or_dash(&coverage.deductibles.join(", "))
    ));
    if !coverage.description.is_empty() {
        lines.push(String::new());
        lines.push(render_category("Description"));
        lines.push(coverage.description.clone());
    }
    lines.join("\n")
}

pub fn format_form_detail(form: &Form) -> String {
    let mut lines = vec![format!("{} {}", form.id, render_bold(&form.form_name))];
    lines.push(format!("Number: {}", form.label()));
    lines.push(format!("Effective: {}", form.effective_date));
    lines.push(format!("Type: {}", form.form_type));
    lines.push(format!("Category: {}", form.category));
    if let Some(product_id) = &form.product_id {
        lines.push(format!("Product: {product_id}"));
    }
    if let Some(url) = &form.download_url {
        lines.push(format!("PDF: {url}"));
    }
    lines.join("\n")
}

pub fn format_rule_detail(rule: &Rule) -> String {
    let mut lines = vec![format!("{} {}", rule.id, render_bold(&rule.name))];
    if !rule.code().is_empty() {
        lines.push(format!("Code: {}", rule.code()));
    }
    lines.push(format!("IF {}", rule.condition));
    lines.push(format!("THEN {}", rule.outcome));
    if !rule.reference.is_empty() {
        lines.push(format!("Reference: {}", rule.reference));
    }
    lines.push(format!(
        "Proprietary: {}",
        if rule.proprietary { "yes" } else { "no" }
    ));
    if let Some(product_id) = &rule.product_id {
        lines.push(format!("Product: {product_id}"));
    }
    if let Some(coverage_id) = &rule.coverage_id {
        lines.push(format!("Coverage: {coverage_id}"));
    }
    if let Some(updated) = rule.updated_at {
        lines.push(format!("Updated: {}", updated.format("%Y-%m-%d %H:%M")));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::enums::Operand;
    use catalog_core::step::StepBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn coverage_row_dashes_empty_amounts() {
        let mut cov = Coverage::new("Building", "CP 00 10");
        cov.id = "c1".into();
        cov.form_edition_date = "10/12".into();
        cov.set_limits(["1000000"]);
        assert_eq!(
            coverage_row(&cov),
            vec!["c1", "Building", "CP 00 10 (10/12)", "$1,000,000", "-"]
        );
    }

    #[test]
    fn rule_detail_reads_as_if_then() {
        let mut rule = Rule::new("Vacancy", "building vacant 60 days", "suspend glass");
        rule.id = "r1".into();
        let detail = format_rule_detail(&rule);
        assert!(detail.contains("IF building vacant 60 days"));
        assert!(detail.contains("THEN suspend glass"));
        assert!(!detail.contains("Code:"));
    }

    #[test]
    fn operand_line_is_just_the_operator() {
        let step = StepBuilder::operand(Operand::Multiply).order(1).build();
        assert!(format_step_line(&step).ends_with('*'));
    }

    #[test]
    fn table_output_smoke() {
        output_table(&["ID", "NAME"], &[vec!["p1".into(), "Auto".into()]]);
        output_table(&["ID"], &[]);
    }
}
