//! `pc price` -- evaluate a product's pricing chain.

use anyhow::{Context, Result};
use serde::Serialize;

use catalog_pricing::engine::{TraceEntry, evaluate_with_trace};
use catalog_storage::catalog::{load_chain, require_product};
use catalog_ui::styles::{render_muted, render_total};

use crate::cli::PriceArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceView {
    step_id: String,
    order: i64,
    label: String,
    running: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pending: Option<String>,
}

impl From<&TraceEntry> for TraceView {
    fn from(entry: &TraceEntry) -> Self {
        Self {
            step_id: entry.step_id.clone(),
            order: entry.order,
            label: entry.label.clone(),
            running: entry.running.map(|d| d.to_string()),
            pending: entry.pending.as_ref().map(|op| op.as_str().to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PriceView {
    product_id: String,
    total: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trace: Vec<TraceView>,
}

/// Execute the `pc price` command.
pub fn run(ctx: &RuntimeContext, args: &PriceArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let product = require_product(&catalog.store, &args.product)?;
    let chain = load_chain(&catalog.store, &product.id)
        .with_context(|| format!("failed to load steps of {}", product.id))?;
    let (total, trace) = evaluate_with_trace(&chain);
    let total = total.to_string();

    if ctx.json {
        output_json(&PriceView {
            product_id: product.id,
            total,
            trace: if args.trace {
                trace.iter().map(TraceView::from).collect()
            } else {
                Vec::new()
            },
        });
        return Ok(());
    }

    if args.trace {
        let rows: Vec<Vec<String>> = trace
            .iter()
            .map(|entry| {
                vec![
                    entry.order.to_string(),
                    entry.label.clone(),
                    entry
                        .running
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    entry
                        .pending
                        .as_ref()
                        .map(|op| op.as_str().to_string())
                        .unwrap_or_default(),
                ]
            })
            .collect();
        output_table(&["#", "STEP", "RUNNING", "PENDING"], &rows);
        println!();
    }

    if ctx.quiet {
        println!("{total}");
    } else {
        println!(
            "{} {}",
            render_muted(&format!("{} total:", product.name)),
            render_total(&total)
        );
    }
    Ok(())
}
