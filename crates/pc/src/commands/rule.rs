//! `pc rule` -- freeform business rules.

use anyhow::{Context, Result};
use chrono::Utc;

use catalog_core::document::RULES;
use catalog_core::filter::filter_by_query;
use catalog_core::rule::Rule;
use catalog_storage::DocumentStoreExt;
use catalog_storage::catalog::{insert_record, require_product, update_record};

use crate::cli::{DeleteArgs, IdArgs, ListArgs, RuleArgs, RuleCommands, RuleCreateArgs, RuleUpdateArgs};
use crate::commands::{confirm_delete, non_empty};
use crate::context::RuntimeContext;
use crate::output::{RULE_HEADERS, format_rule_detail, output_json, output_table, rule_row};

/// Execute the `pc rule` command.
pub fn run(ctx: &RuntimeContext, args: &RuleArgs) -> Result<()> {
    match &args.command {
        RuleCommands::Create(a) => create(ctx, a),
        RuleCommands::List(a) => list(ctx, a),
        RuleCommands::Show(a) => show(ctx, a),
        RuleCommands::Update(a) => update(ctx, a),
        RuleCommands::Delete(a) => delete(ctx, a),
    }
}

fn create(ctx: &RuntimeContext, args: &RuleCreateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut rule = Rule::new(args.name.trim(), args.condition.trim(), args.outcome.trim());
    rule.rule_id = args.rule_id.as_deref().and_then(non_empty);
    rule.reference = args.reference.clone().unwrap_or_default();
    rule.proprietary = args.proprietary;
    rule.product_id = args.product.as_deref().and_then(non_empty);
    rule.coverage_id = args.coverage.as_deref().and_then(non_empty);
    if let Some(product_id) = &rule.product_id {
        require_product(&catalog.store, product_id)?;
    }
    rule.touch(Utc::now());

    let id = insert_record(&catalog.store, RULES, &mut rule).context("failed to create rule")?;

    if ctx.json {
        output_json(&rule);
    } else if ctx.quiet {
        println!("{id}");
    } else {
        println!("Created rule: {id}");
        println!("  Name: {}", rule.name);
    }
    Ok(())
}

fn list(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let rules: Vec<Rule> = catalog.store.list(RULES).context("failed to list rules")?;
    let rules = filter_by_query(&rules, args.search.as_deref());

    if ctx.json {
        output_json(&rules);
    } else if rules.is_empty() {
        if !ctx.quiet {
            println!("No rules found");
        }
    } else {
        let rows: Vec<Vec<String>> = rules.iter().map(rule_row).collect();
        output_table(RULE_HEADERS, &rows);
    }
    Ok(())
}

fn show(ctx: &RuntimeContext, args: &IdArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let rule: Rule = catalog.store.get(RULES, &args.id)?;
    if ctx.json {
        output_json(&rule);
    } else {
        println!("{}", format_rule_detail(&rule));
    }
    Ok(())
}

fn update(ctx: &RuntimeContext, args: &RuleUpdateArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let mut rule: Rule = catalog.store.get(RULES, &args.id)?;
    if let Some(name) = &args.name {
        rule.name = name.trim().to_string();
    }
    if let Some(condition) = &args.condition {
        rule.condition = condition.trim().to_string();
    }
    if let Some(outcome) = &args.outcome {
        rule.outcome = outcome.trim().to_string();
    }
    if let Some(code) = &args.rule_id {
        rule.rule_id = non_empty(code);
    }
    if let Some(reference) = &args.reference {
        rule.reference = reference.clone();
    }
    if let Some(proprietary) = args.proprietary {
        rule.proprietary = proprietary;
    }
    if let Some(product) = &args.product {
        rule.product_id = non_empty(product);
        if let Some(product_id) = &rule.product_id {
            require_product(&catalog.store, product_id)?;
        }
    }
    if let Some(coverage) = &args.coverage {
        rule.coverage_id = non_empty(coverage);
    }
    rule.touch(Utc::now());
    update_record(&catalog.store, RULES, &rule)
        .with_context(|| format!("failed to update rule {}", rule.id))?;

    if ctx.json {
        output_json(&rule);
    } else if !ctx.quiet {
        println!("Updated rule: {}", rule.id);
    }
    Ok(())
}

fn delete(ctx: &RuntimeContext, args: &DeleteArgs) -> Result<()> {
    confirm_delete(ctx, args.force, &format!("rule {}", args.id))?;
    let catalog = ctx.open()?;
    catalog
        .store
        .remove::<Rule>(RULES, &args.id)
        .with_context(|| format!("failed to delete rule {}", args.id))?;

    if ctx.json {
        output_json(&serde_json::json!({ "deleted": args.id }));
    } else if !ctx.quiet {
        println!("Deleted {}", args.id);
    }
    Ok(())
}
