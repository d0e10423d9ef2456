//! `pc search` -- fuzzy search across the whole catalog.

use anyhow::{Context, Result};

use catalog_core::document::{FORMS, PRODUCTS};
use catalog_core::form::Form;
use catalog_core::product::Product;
use catalog_query::SearchIndex;
use catalog_storage::DocumentStoreExt;
use catalog_storage::catalog::{all_coverages, all_steps};
use catalog_ui::styles::{render_kind, render_muted};

use crate::cli::SearchArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `pc search` command.
pub fn run(ctx: &RuntimeContext, args: &SearchArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let store = &catalog.store;

    let products: Vec<Product> = store.list(PRODUCTS).context("failed to load products")?;
    let coverages = all_coverages(store).context("failed to load coverages")?;
    let forms: Vec<Form> = store.list(FORMS).context("failed to load forms")?;
    let steps = all_steps(store).context("failed to load steps")?;

    let index = SearchIndex::build(&products, &coverages, &forms, &steps)
        .with_threshold(catalog.config.search.threshold);
    let mut hits = index.search(&args.query);
    if let Some(limit) = args.limit {
        hits.truncate(limit);
    }

    if ctx.json {
        output_json(&hits);
        return Ok(());
    }
    if hits.is_empty() {
        if !ctx.quiet {
            println!("No results for \"{}\"", args.query.trim());
        }
        return Ok(());
    }
    for hit in &hits {
        let mut line = format!("{} {}", render_kind(hit.entry.kind.as_str()), hit.entry.name);
        if let Some(number) = hit.entry.form_number.as_deref().filter(|n| *n != hit.entry.name) {
            line.push_str(&format!(" ({number})"));
        }
        if !hit.breadcrumb.is_empty() {
            line.push_str(&format!(" {}", render_muted(&hit.breadcrumb)));
        }
        line.push_str(&format!("  {}", render_muted(&hit.entry.id)));
        println!("{line}");
    }
    Ok(())
}
