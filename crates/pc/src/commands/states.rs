//! `pc states` -- the states a product is available in.

use anyhow::{Context, Result};
use serde::Serialize;

use catalog_core::states::StateSelection;
use catalog_storage::catalog::{require_product, set_available_states};
use catalog_ui::layout::render_state_map;

use crate::cli::{StateCodesArgs, StatesArgs, StatesCommands, StatesListArgs};
use crate::context::{Catalog, RuntimeContext};
use crate::output::output_json;

/// Execute the `pc states` command.
pub fn run(ctx: &RuntimeContext, args: &StatesArgs) -> Result<()> {
    match &args.command {
        StatesCommands::List(a) => list(ctx, a),
        StatesCommands::Add(a) => edit(ctx, &a.product, |sel| {
            for code in &a.codes {
                sel.add(code)?;
            }
            Ok(())
        }),
        StatesCommands::Remove(a) => edit(ctx, &a.product, |sel| {
            for code in &a.codes {
                sel.remove(code)?;
            }
            Ok(())
        }),
        StatesCommands::Toggle(a) => toggle(ctx, a),
        StatesCommands::All(a) => edit(ctx, &a.product, |sel| {
            sel.select_all();
            Ok(())
        }),
        StatesCommands::Clear(a) => edit(ctx, &a.product, |sel| {
            sel.clear();
            Ok(())
        }),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatesView {
    product_id: String,
    count: usize,
    states: Vec<String>,
}

fn load(catalog: &Catalog, product_id: &str) -> Result<StateSelection> {
    let product = require_product(&catalog.store, product_id)?;
    Ok(StateSelection::from_codes(&product.available_states))
}

fn list(ctx: &RuntimeContext, args: &StatesListArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let selection = load(&catalog, &args.product)?;

    let states = match args.search.as_deref() {
        Some(query) => selection.search(query),
        None => selection.codes(),
    };

    if ctx.json {
        output_json(&StatesView {
            product_id: args.product.clone(),
            count: states.len(),
            states,
        });
    } else if args.search.is_some() {
        if states.is_empty() {
            println!("No matching states");
        } else {
            println!("{}", states.join(", "));
        }
    } else {
        println!("{}", render_state_map(&selection));
        if !ctx.quiet {
            println!();
            println!("{} of 50 states selected", selection.len());
        }
    }
    Ok(())
}

/// Loads the selection, applies `change`, saves `availableStates` in one
/// update, and prints the result.
fn edit<F>(ctx: &RuntimeContext, product_id: &str, change: F) -> Result<()>
where
    F: FnOnce(&mut StateSelection) -> Result<()>,
{
    let catalog = ctx.open()?;
    let mut selection = load(&catalog, product_id)?;
    change(&mut selection)?;
    save(ctx, &catalog, product_id, &selection)
}

fn save(
    ctx: &RuntimeContext,
    catalog: &Catalog,
    product_id: &str,
    selection: &StateSelection,
) -> Result<()> {
    let codes = selection.codes();
    set_available_states(&catalog.store, product_id, &codes)
        .with_context(|| format!("failed to save states of {product_id}"))?;

    if ctx.json {
        output_json(&StatesView {
            product_id: product_id.to_string(),
            count: codes.len(),
            states: codes,
        });
    } else if !ctx.quiet {
        println!("{} of 50 states selected", codes.len());
    }
    Ok(())
}

fn toggle(ctx: &RuntimeContext, args: &StateCodesArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut selection = load(&catalog, &args.product)?;
    for code in &args.codes {
        let on = selection.toggle(code)?;
        if !ctx.json && !ctx.quiet {
            println!("{} {}", code.trim().to_uppercase(), if on { "on" } else { "off" });
        }
    }
    save(ctx, &catalog, &args.product, &selection)
}
