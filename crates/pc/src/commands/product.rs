//! `pc product` -- create, list, show, update, delete, upload, summarize.

use anyhow::{Context, Result};
use serde::Serialize;

use catalog_core::coverage::Coverage;
use catalog_core::document::PRODUCTS;
use catalog_core::filter::filter_by_query;
use catalog_core::product::Product;
use catalog_pricing::evaluate;
use catalog_storage::blob::upload_form_file;
use catalog_storage::catalog::{
    coverages, delete_product, insert_record, load_chain, require_product, update_record,
};
use catalog_storage::DocumentStoreExt;
use catalog_ui::styles::{render_category, render_total};

use crate::cli::{
    IdArgs, ListArgs, ProductArgs, ProductCommands, ProductCreateArgs, ProductDeleteArgs,
    ProductUpdateArgs, UploadArgs,
};
use crate::commands::{confirm_delete, non_empty};
use crate::commands::summarize::{print_summary, summarize_pdf};
use crate::context::RuntimeContext;
use crate::output::{
    COVERAGE_HEADERS, PRODUCT_HEADERS, coverage_row, format_product_detail, output_json,
    output_table, product_row,
};

/// Execute the `pc product` command.
pub fn run(ctx: &RuntimeContext, args: &ProductArgs) -> Result<()> {
    match &args.command {
        ProductCommands::Create(a) => create(ctx, a),
        ProductCommands::List(a) => list(ctx, a),
        ProductCommands::Show(a) => show(ctx, a),
        ProductCommands::Update(a) => update(ctx, a),
        ProductCommands::Delete(a) => delete(ctx, a),
        ProductCommands::Upload(a) => upload(ctx, a),
        ProductCommands::Summarize(a) => summarize(ctx, a),
    }
}

fn create(ctx: &RuntimeContext, args: &ProductCreateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut product = Product::new(args.name.trim(), args.form_number.trim());
    product.available_states = args
        .states
        .iter()
        .filter_map(|s| non_empty(s))
        .map(|s| s.to_uppercase())
        .collect();

    let id = insert_record(&catalog.store, PRODUCTS, &mut product)
        .context("failed to create product")?;

    if ctx.json {
        output_json(&product);
    } else if ctx.quiet {
        println!("{id}");
    } else {
        println!("Created product: {id}");
        println!("  Name: {}", product.name);
        println!("  Form: {}", product.form_number);
    }
    Ok(())
}

fn list(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let products: Vec<Product> = catalog
        .store
        .list(PRODUCTS)
        .context("failed to list products")?;
    let products = filter_by_query(&products, args.search.as_deref());

    if ctx.json {
        output_json(&products);
    } else if products.is_empty() {
        if !ctx.quiet {
            println!("No products found");
        }
    } else {
        let rows: Vec<Vec<String>> = products.iter().map(product_row).collect();
        output_table(PRODUCT_HEADERS, &rows);
    }
    Ok(())
}

/// JSON view of `pc product show`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductView {
    #[serde(flatten)]
    product: Product,
    coverages: Vec<Coverage>,
    step_count: usize,
    total: String,
}

fn show(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let product = require_product(&catalog.store, &args.id)?;
    let coverages = coverages(&catalog.store, &product.id)
        .with_context(|| format!("failed to load coverages of {}", product.id))?;
    let chain = load_chain(&catalog.store, &product.id)
        .with_context(|| format!("failed to load steps of {}", product.id))?;
    let total = evaluate(&chain).to_string();

    if ctx.json {
        output_json(&ProductView {
            product,
            coverages,
            step_count: chain.len(),
            total,
        });
        return Ok(());
    }

    println!("{}", format_product_detail(&product));
    println!("Steps: {}", chain.len());
    println!("Total: {}", render_total(&total));
    if !coverages.is_empty() {
        println!();
        println!("{}", render_category("Coverages"));
        let rows: Vec<Vec<String>> = coverages.iter().map(coverage_row).collect();
        output_table(COVERAGE_HEADERS, &rows);
    }
    Ok(())
}

fn update(ctx: &RuntimeContext, args: &ProductUpdateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut product = require_product(&catalog.store, &args.id)?;
    if let Some(name) = &args.name {
        product.name = name.trim().to_string();
    }
    if let Some(form_number) = &args.form_number {
        product.form_number = form_number.trim().to_string();
    }
    update_record(&catalog.store, PRODUCTS, &product)
        .with_context(|| format!("failed to update product {}", product.id))?;

    if ctx.json {
        output_json(&product);
    } else if !ctx.quiet {
        println!("Updated product: {}", product.id);
    }
    Ok(())
}

fn delete(ctx: &RuntimeContext, args: &ProductDeleteArgs) -> Result<()> {
    confirm_delete(ctx, args.force, &format!("product {}", args.id))?;
    let catalog = ctx.open()?;
    let removed = delete_product(&catalog.store, &args.id, args.recursive)
        .with_context(|| format!("failed to delete product {}", args.id))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "deleted": args.id,
            "documents": removed,
        }));
    } else if !ctx.quiet {
        println!("Deleted {}", args.id);
        if args.recursive && removed > 1 {
            println!("  Removed {} documents", removed);
        }
    }
    Ok(())
}

fn upload(ctx: &RuntimeContext, args: &UploadArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut product = require_product(&catalog.store, &args.id)?;
    let (_, url) = upload_form_file(&catalog.blobs, &args.file)
        .with_context(|| format!("failed to upload {}", args.file.display()))?;
    product.form_download_url = Some(url.clone());
    update_record(&catalog.store, PRODUCTS, &product)?;

    if ctx.json {
        output_json(&product);
    } else if !ctx.quiet {
        println!("Uploaded {} for product {}", args.file.display(), product.id);
        println!("  URL: {url}");
    }
    Ok(())
}

fn summarize(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let product = require_product(&catalog.store, &args.id)?;
    let summary = summarize_pdf(&catalog, product.form_download_url.as_deref())?;
    print_summary(ctx, &summary);
    Ok(())
}
