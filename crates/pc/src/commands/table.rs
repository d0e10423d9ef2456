//! `pc table` -- rating table dimensions of a factor step.

use anyhow::{Context, Result};
use serde::Serialize;

use catalog_core::dimension::{Dimension, TableGrid};
use catalog_core::document::{dimensions_of, steps_of};
use catalog_core::enums::DimensionType;
use catalog_core::step::Step;
use catalog_storage::DocumentStoreExt;
use catalog_storage::catalog::{dimensions, require_product, save_dimension};
use catalog_ui::layout::render_grid;
use catalog_ui::styles::{render_bold, render_muted};

use crate::cli::{
    ChildArgs, DimensionAddArgs, DimensionDeleteArgs, DimensionUpdateArgs, TableArgs,
    TableCommands,
};
use crate::commands::{confirm_delete, parse_label};
use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `pc table` command.
pub fn run(ctx: &RuntimeContext, args: &TableArgs) -> Result<()> {
    match &args.command {
        TableCommands::Show(a) => show(ctx, a),
        TableCommands::Add(a) => add(ctx, a),
        TableCommands::Update(a) => update(ctx, a),
        TableCommands::Delete(a) => delete(ctx, a),
    }
}

fn parse_dim_type(raw: &str) -> Result<DimensionType> {
    parse_label(raw, DimensionType::LABELS, DimensionType::parse_known)
}

#[derive(Serialize)]
struct TableView {
    step: Step,
    dimensions: Vec<Dimension>,
    rows: Vec<String>,
    columns: Vec<String>,
}

fn show(ctx: &RuntimeContext, args: &ChildArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let step: Step = catalog.store.get(&steps_of(&args.product), &args.id)?;
    let dims = dimensions(&catalog.store, &args.product, &step.id)
        .with_context(|| format!("failed to load dimensions of {}", step.id))?;
    let grid = TableGrid::from_dimensions(&dims);

    if ctx.json {
        output_json(&TableView {
            step,
            dimensions: dims,
            rows: grid.rows,
            columns: grid.columns,
        });
        return Ok(());
    }

    let title = if step.table.is_empty() {
        step.label().to_string()
    } else {
        format!("{} ({})", step.label(), step.table)
    };
    println!("{}", render_bold(&title));
    if dims.is_empty() {
        println!("{}", render_muted("No dimensions"));
        return Ok(());
    }
    let rows: Vec<Vec<String>> = dims
        .iter()
        .map(|d| {
            vec![
                d.id.clone(),
                d.dim_type.to_string(),
                d.name.clone(),
                d.technical_code.clone(),
                d.values.clone(),
            ]
        })
        .collect();
    output_table(&["ID", "AXIS", "NAME", "CODE", "VALUES"], &rows);
    println!();
    println!("{}", render_grid(&grid));
    Ok(())
}

fn add(ctx: &RuntimeContext, args: &DimensionAddArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let mut dimension = Dimension::new(
        args.name.trim(),
        args.values.trim(),
        args.code.trim(),
        parse_dim_type(&args.dim_type)?,
    );
    let id = save_dimension(&catalog.store, &args.product, &args.step, &mut dimension)
        .context("failed to add dimension")?;

    if ctx.json {
        output_json(&dimension);
    } else if ctx.quiet {
        println!("{id}");
    } else {
        println!("Added {} dimension {}: {}", dimension.dim_type, id, dimension.name);
    }
    Ok(())
}

fn update(ctx: &RuntimeContext, args: &DimensionUpdateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let mut dimension: Dimension = catalog
        .store
        .get(&dimensions_of(&args.product, &args.step), &args.id)?;
    if let Some(name) = &args.name {
        dimension.name = name.trim().to_string();
    }
    if let Some(values) = &args.values {
        dimension.values = values.trim().to_string();
    }
    if let Some(code) = &args.code {
        dimension.technical_code = code.trim().to_string();
    }
    if let Some(raw) = &args.dim_type {
        dimension.dim_type = parse_dim_type(raw)?;
    }
    save_dimension(&catalog.store, &args.product, &args.step, &mut dimension)
        .with_context(|| format!("failed to update dimension {}", args.id))?;

    if ctx.json {
        output_json(&dimension);
    } else if !ctx.quiet {
        println!("Updated dimension: {}", dimension.id);
    }
    Ok(())
}

fn delete(ctx: &RuntimeContext, args: &DimensionDeleteArgs) -> Result<()> {
    confirm_delete(ctx, args.force, &format!("dimension {}", args.id))?;
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    catalog
        .store
        .remove::<Dimension>(&dimensions_of(&args.product, &args.step), &args.id)
        .with_context(|| format!("failed to delete dimension {}", args.id))?;

    if ctx.json {
        output_json(&serde_json::json!({ "deleted": args.id }));
    } else if !ctx.quiet {
        println!("Deleted {}", args.id);
    }
    Ok(())
}
