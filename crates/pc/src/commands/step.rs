//! `pc step` -- the pricing chain of a product.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use catalog_core::document::steps_of;
use catalog_core::enums::{FactorType, Operand, Rounding};
use catalog_core::filter::Searchable;
use catalog_core::states::parse_state;
use catalog_core::step::{Step, StepBuilder};
use catalog_pricing::chain::{StepFilter, move_step, renumber};
use catalog_storage::DocumentStoreExt;
use catalog_storage::catalog::{
    append_step, delete_step, load_chain, require_product, update_record, write_step_orders,
};
use catalog_ui::styles::{render_dimmed, render_muted};

use crate::cli::{
    ChildArgs, ChildDeleteArgs, FactorFields, StepArgs, StepCommands, StepFactorArgs,
    StepListArgs, StepMoveArgs, StepOperandArgs, StepUpdateArgs,
};
use crate::commands::{confirm_delete, non_empty, parse_label, parse_value};
use crate::context::RuntimeContext;
use crate::output::{format_step_detail, format_step_line, output_json};

/// Execute the `pc step` command.
pub fn run(ctx: &RuntimeContext, args: &StepArgs) -> Result<()> {
    match &args.command {
        StepCommands::Factor(a) => add_factor(ctx, a),
        StepCommands::Operand(a) => add_operand(ctx, a),
        StepCommands::List(a) => list(ctx, a),
        StepCommands::Show(a) => show(ctx, a),
        StepCommands::Update(a) => update(ctx, a),
        StepCommands::Delete(a) => delete(ctx, a),
        StepCommands::Move(a) => move_to(ctx, a),
    }
}

fn parse_operand(raw: &str) -> Result<Operand> {
    match Operand::parse_known(raw.trim()) {
        Some(op) if op.is_arithmetic() => Ok(op),
        _ => bail!("invalid operand '{raw}': expected one of + - * / ="),
    }
}

fn parse_states(raw: &[String]) -> Result<Vec<String>> {
    let mut states = Vec::with_capacity(raw.len());
    for code in raw.iter().filter_map(|s| non_empty(s)) {
        states.push(parse_state(&code)?.to_string());
    }
    Ok(states)
}

/// Copies every flag that was given onto `step`.
fn apply_factor_fields(step: &mut Step, fields: &FactorFields) -> Result<()> {
    if let Some(coverage) = &fields.coverage {
        step.coverage = coverage.trim().to_string();
    }
    if let Some(raw) = &fields.value {
        step.value = Some(parse_value(raw)?);
    }
    if let Some(raw) = &fields.factor_type {
        step.factor_type = parse_label(raw, FactorType::LABELS, FactorType::parse_known)?;
    }
    if let Some(table) = &fields.table {
        step.table = table.trim().to_string();
    }
    if let Some(raw) = &fields.rounding {
        step.rounding = parse_label(raw, Rounding::LABELS, Rounding::parse_known)?;
    }
    if let Some(rules) = &fields.rules {
        step.rules = rules.clone();
    }
    if let Some(states) = &fields.states {
        step.states = parse_states(states)?;
    }
    if let Some(upstream) = &fields.upstream {
        step.upstream_id = upstream.trim().to_string();
    }
    if let Some(paren) = &fields.paren_before {
        step.paren_before = paren.clone();
    }
    if let Some(paren) = &fields.paren_after {
        step.paren_after = paren.clone();
    }
    Ok(())
}

fn report_added(ctx: &RuntimeContext, step: &Step) {
    if ctx.json {
        output_json(step);
    } else if ctx.quiet {
        println!("{}", step.id);
    } else {
        println!("Added step {} at position {}: {}", step.id, step.order, step.label());
    }
}

fn add_factor(ctx: &RuntimeContext, args: &StepFactorArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut step = StepBuilder::factor(args.name.trim()).build();
    apply_factor_fields(&mut step, &args.fields)?;
    append_step(&catalog.store, &args.product, &mut step).context("failed to add step")?;
    report_added(ctx, &step);
    Ok(())
}

fn add_operand(ctx: &RuntimeContext, args: &StepOperandArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut step = StepBuilder::operand(parse_operand(&args.operand)?).build();
    append_step(&catalog.store, &args.product, &mut step).context("failed to add step")?;
    report_added(ctx, &step);
    Ok(())
}

/// JSON view of one listed step.
#[derive(Serialize)]
struct StepView<'a> {
    #[serde(flatten)]
    step: &'a Step,
    dimmed: bool,
}

fn list(ctx: &RuntimeContext, args: &StepListArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let chain = load_chain(&catalog.store, &args.product)
        .with_context(|| format!("failed to load steps of {}", args.product))?;

    let filter = StepFilter {
        coverages: args.coverages.clone(),
        states: parse_states(&args.states)?,
    };
    let query = args.search.as_deref().map(str::trim).unwrap_or("");
    let shown: Vec<&Step> = chain.iter().filter(|s| s.matches_query(query)).collect();

    if ctx.json {
        let views: Vec<StepView<'_>> = shown
            .iter()
            .map(|&step| StepView {
                step,
                dimmed: !filter.matches(step),
            })
            .collect();
        output_json(&views);
        return Ok(());
    }

    if shown.is_empty() {
        if !ctx.quiet {
            println!("No steps found");
        }
        return Ok(());
    }
    for step in shown {
        let line = format!("{}  {}", format_step_line(step), render_muted(&step.id));
        if filter.matches(step) {
            println!("{line}");
        } else {
            println!("{}", render_dimmed(&line));
        }
    }
    Ok(())
}

fn show(ctx: &RuntimeContext, args: &ChildArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let step: Step = catalog.store.get(&steps_of(&args.product), &args.id)?;
    if ctx.json {
        output_json(&step);
    } else {
        println!("{}", format_step_detail(&step));
    }
    Ok(())
}

fn update(ctx: &RuntimeContext, args: &StepUpdateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let collection = steps_of(&args.product);
    let mut step: Step = catalog.store.get(&collection, &args.id)?;

    if step.is_operand() {
        if let Some(raw) = &args.operand {
            step.operand = parse_operand(raw)?;
        }
    } else {
        if args.operand.is_some() {
            bail!("step {} is a factor; --operand only applies to operand steps", step.id);
        }
        if let Some(name) = &args.name {
            step.step_name = name.trim().to_string();
        }
        apply_factor_fields(&mut step, &args.fields)?;
    }
    update_record(&catalog.store, &collection, &step)
        .with_context(|| format!("failed to update step {}", step.id))?;

    if ctx.json {
        output_json(&step);
    } else if !ctx.quiet {
        println!("Updated step: {}", step.id);
    }
    Ok(())
}

fn delete(ctx: &RuntimeContext, args: &ChildDeleteArgs) -> Result<()> {
    confirm_delete(ctx, args.force, &format!("step {}", args.id))?;
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let mut chain: Vec<Step> = load_chain(&catalog.store, &args.product)?
        .into_iter()
        .filter(|s| s.id != args.id)
        .collect();
    renumber(&mut chain);
    delete_step(&catalog.store, &args.product, &args.id, &chain)
        .with_context(|| format!("failed to delete step {}", args.id))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "deleted": args.id,
            "remaining": chain.len(),
        }));
    } else if !ctx.quiet {
        println!("Deleted {}", args.id);
    }
    Ok(())
}

fn move_to(ctx: &RuntimeContext, args: &StepMoveArgs) -> Result<()> {
    let catalog = ctx.open()?;
    require_product(&catalog.store, &args.product)?;
    let chain = load_chain(&catalog.store, &args.product)?;
    let reordered = move_step(&chain, &args.id, args.position)?;
    write_step_orders(&catalog.store, &args.product, &reordered)
        .context("failed to write step order")?;

    if ctx.json {
        output_json(&reordered);
    } else if !ctx.quiet {
        println!("Moved {} to position {}", args.id, args.position);
        for step in &reordered {
            println!("{}", format_step_line(step));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn operand_must_be_arithmetic() {
        assert_eq!(parse_operand(" / ").unwrap(), Operand::Divide);
        assert!(parse_operand("").is_err());
        assert!(parse_operand("%").is_err());
    }

    #[test]
    fn factor_fields_apply_only_given_flags() {
        let mut step = StepBuilder::factor("Base Rate").coverage("Building").build();
        let fields = FactorFields {
            value: Some("1.5".into()),
            states: Some(vec!["ca".into(), " tx".into()]),
            rounding: Some("2 Decimals".into()),
            ..FactorFields::default()
        };
        apply_factor_fields(&mut step, &fields).unwrap();
        assert_eq!(step.coverage, "Building");
        assert_eq!(step.value_or_zero().to_string(), "1.5");
        assert_eq!(step.states, vec!["CA", "TX"]);
        assert_eq!(step.rounding, Rounding::TwoDecimals);
    }

    #[test]
    fn unknown_state_is_rejected() {
        let mut step = StepBuilder::factor("Base Rate").build();
        let fields = FactorFields {
            states: Some(vec!["ZZ".into()]),
            ..FactorFields::default()
        };
        assert!(apply_factor_fields(&mut step, &fields).is_err());
    }
}
