//! `pc coverage` -- coverages under a product, their amounts and linked form.

use anyhow::{Context, Result};

use catalog_core::coverage::Coverage;
use catalog_core::document::coverages_of;
use catalog_core::filter::filter_by_query;
use catalog_storage::DocumentStoreExt;
use catalog_storage::catalog::{
    coverages, insert_record, linked_form, require_product, update_record,
};

use crate::cli::{
    AmountsArgs, ChildArgs, ChildDeleteArgs, CoverageArgs, CoverageCommands, CoverageCreateArgs,
    CoverageUpdateArgs, ProductListArgs,
};
use crate::commands::{confirm_delete, non_empty};
use crate::context::{Catalog, RuntimeContext};
use crate::output::{
    COVERAGE_HEADERS, coverage_row, format_coverage_detail, format_form_detail, output_json,
    output_table,
};

/// Execute the `pc coverage` command.
pub fn run(ctx: &RuntimeContext, args: &CoverageArgs) -> Result<()> {
    match &args.command {
        CoverageCommands::Create(a) => create(ctx, a),
        CoverageCommands::List(a) => list(ctx, a),
        CoverageCommands::Show(a) => show(ctx, a),
        CoverageCommands::Update(a) => update(ctx, a),
        CoverageCommands::Delete(a) => delete(ctx, a),
        CoverageCommands::Limits(a) => set_amounts(ctx, a, Amounts::Limits),
        CoverageCommands::Deductibles(a) => set_amounts(ctx, a, Amounts::Deductibles),
        CoverageCommands::Form(a) => form(ctx, a),
    }
}

fn load(catalog: &Catalog, product_id: &str, coverage_id: &str) -> Result<Coverage> {
    require_product(&catalog.store, product_id)?;
    Ok(catalog.store.get(&coverages_of(product_id), coverage_id)?)
}

fn create(ctx: &RuntimeContext, args: &CoverageCreateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;

    let mut coverage = Coverage::new(args.name.trim(), args.form_number.trim());
    coverage.form_edition_date = args.edition.as_deref().and_then(non_empty).unwrap_or_default();
    coverage.description = args.description.clone().unwrap_or_default();
    coverage.set_limits(&args.limits);
    coverage.set_deductibles(&args.deductibles);

    let id = insert_record(&catalog.store, &coverages_of(&args.product), &mut coverage)
        .context("failed to create coverage")?;

    if ctx.json {
        output_json(&coverage);
    } else if ctx.quiet {
        println!("{id}");
    } else {
        println!("Created coverage: {id}");
        println!("  Name: {}", coverage.name);
        println!("  Product: {}", args.product);
    }
    Ok(())
}

fn list(ctx: &RuntimeContext, args: &ProductListArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let all = coverages(&catalog.store, &args.product)
        .with_context(|| format!("failed to list coverages of {}", args.product))?;
    let found = filter_by_query(&all, args.search.as_deref());

    if ctx.json {
        output_json(&found);
    } else if found.is_empty() {
        if !ctx.quiet {
            println!("No coverages found");
        }
    } else {
        let rows: Vec<Vec<String>> = found.iter().map(coverage_row).collect();
        output_table(COVERAGE_HEADERS, &rows);
    }
    Ok(())
}

fn show(ctx: &RuntimeContext, args: &ChildArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let coverage = load(&catalog, &args.product, &args.id)?;
    if ctx.json {
        output_json(&coverage);
    } else {
        println!("{}", format_coverage_detail(&coverage));
    }
    Ok(())
}

fn update(ctx: &RuntimeContext, args: &CoverageUpdateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut coverage = load(&catalog, &args.product, &args.id)?;
    if let Some(name) = &args.name {
        coverage.name = name.trim().to_string();
    }
    if let Some(description) = &args.description {
        coverage.description = description.clone();
    }
    if let Some(form_number) = &args.form_number {
        coverage.form_number = form_number.trim().to_string();
    }
    if let Some(edition) = &args.edition {
        coverage.form_edition_date = edition.trim().to_string();
    }
    update_record(&catalog.store, &coverages_of(&args.product), &coverage)
        .with_context(|| format!("failed to update coverage {}", coverage.id))?;

    if ctx.json {
        output_json(&coverage);
    } else if !ctx.quiet {
        println!("Updated coverage: {}", coverage.id);
    }
    Ok(())
}

fn delete(ctx: &RuntimeContext, args: &ChildDeleteArgs) -> Result<()> {
    confirm_delete(ctx, args.force, &format!("coverage {}", args.id))?;
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    catalog
        .store
        .remove::<Coverage>(&coverages_of(&args.product), &args.id)
        .with_context(|| format!("failed to delete coverage {}", args.id))?;

    if ctx.json {
        output_json(&serde_json::json!({ "deleted": args.id }));
    } else if !ctx.quiet {
        println!("Deleted {}", args.id);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Amounts {
    Limits,
    Deductibles,
}

fn set_amounts(ctx: &RuntimeContext, args: &AmountsArgs, which: Amounts) -> Result<()> {
    let catalog = ctx.open()?;
    let mut coverage = load(&catalog, &args.product, &args.id)?;
    let (label, amounts) = match which {
        Amounts::Limits => {
            coverage.set_limits(&args.amounts);
            ("Limits", &coverage.limits)
        }
        Amounts::Deductibles => {
            coverage.set_deductibles(&args.amounts);
            ("Deductibles", &coverage.deductibles)
        }
    };
    let shown = amounts.join(", ");
    update_record(&catalog.store, &coverages_of(&args.product), &coverage)
        .with_context(|| format!("failed to update coverage {}", coverage.id))?;

    if ctx.json {
        output_json(&coverage);
    } else if !ctx.quiet {
        println!(
            "{label}: {}",
            if shown.is_empty() { "none" } else { shown.as_str() }
        );
    }
    Ok(())
}

fn form(ctx: &RuntimeContext, args: &ChildArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let coverage = load(&catalog, &args.product, &args.id)?;
    let form = linked_form(&catalog.store, &coverage).context("failed to load forms")?;

    if ctx.json {
        output_json(&form);
        return Ok(());
    }
    match form {
        Some(form) => println!("{}", format_form_detail(&form)),
        None => println!(
            "No form matches {}{}",
            coverage.form_number,
            if coverage.form_edition_date.is_empty() {
                String::new()
            } else {
                format!(" ({})", coverage.form_edition_date)
            }
        ),
    }
    Ok(())
}
