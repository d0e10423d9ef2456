//! Form summarization shared by `pc product summarize` and
//! `pc form summarize`.

use std::time::Duration;

use anyhow::{Context, Result};

use catalog_ai::pdf::extract_text;
use catalog_ai::{AiError, FormSummary, HttpChatClient, summarize};
use catalog_storage::BlobStore;
use catalog_ui::styles::{render_bold, render_category, render_muted};

use crate::context::{Catalog, RuntimeContext};
use crate::output::output_json;

/// Reads the PDF behind `url`, extracts its text and asks the configured
/// model for a summary.
pub fn summarize_pdf(catalog: &Catalog, url: Option<&str>) -> Result<FormSummary> {
    let url = url.ok_or(AiError::NoForm)?;
    let bytes = catalog
        .blobs
        .get(url)
        .with_context(|| format!("failed to read {url}"))?;
    let text = extract_text(&bytes)?;

    let ai = &catalog.config.ai;
    let client = HttpChatClient::from_env(
        ai.endpoint.clone(),
        ai.model.clone(),
        &ai.api_key_env,
        Duration::from_secs(ai.timeout_secs),
    )?;
    let summary = summarize(&client, &text, ai.max_words).context("summarization failed")?;
    Ok(summary)
}

/// Prints a summary as JSON or as sectioned text.
pub fn print_summary(ctx: &RuntimeContext, summary: &FormSummary) {
    if ctx.json {
        output_json(summary);
        return;
    }
    println!("{}", format_summary(summary));
}

fn bullets(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("  {}", render_muted(title)));
    lines.extend(items.iter().map(|item| format!("    - {item}")));
}

fn format_summary(summary: &FormSummary) -> String {
    let mut lines = Vec::new();
    if !summary.category.is_empty() {
        lines.push(format!("Category: {}", summary.category));
    }
    for coverage in &summary.coverages {
        lines.push(String::new());
        lines.push(render_bold(&coverage.coverage_name));
        if !coverage.scope_of_coverage.is_empty() {
            lines.push(format!("  {}", coverage.scope_of_coverage));
        }
        if !coverage.limits.is_empty() {
            lines.push(format!("  Limits: {}", coverage.limits));
        }
        bullets(&mut lines, "Perils covered", &coverage.perils_covered);
        bullets(&mut lines, "Conditions", &coverage.conditions);
        bullets(&mut lines, "Exclusions", &coverage.exclusions);
    }
    for (title, items) in [
        ("General conditions", &summary.general_conditions),
        ("General exclusions", &summary.general_exclusions),
    ] {
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(render_category(title));
        lines.extend(items.iter().map(|item| format!("  - {item}")));
    }
    lines.join("\n")
}
