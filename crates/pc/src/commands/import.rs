//! `pc import` -- load products, coverages and forms from a workbook.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use catalog_sheets::{ImportOp, Sheet, plan_import, read_workbook};
use catalog_storage::{BatchExt, DocumentStore};

use crate::cli::ImportArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `pc import` command.
pub fn run(ctx: &RuntimeContext, args: &ImportArgs) -> Result<()> {
    let workbook = read_workbook(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let ops = plan_import(&workbook)?;
    let summary = ImportSummary::from_ops(&ops, args.dry_run);
    debug!(file = %args.file.display(), ops = ops.len(), "planned import");

    if args.dry_run {
        if ctx.json {
            output_json(&summary);
        } else {
            for op in &ops {
                println!(
                    "{:<10} {} {}",
                    op.sheet.name(),
                    op.collection,
                    op.id.as_deref().unwrap_or("(new)")
                );
            }
            if !ctx.quiet {
                println!("\n{} (dry run, nothing written)", summary.describe());
            }
        }
        return Ok(());
    }

    let catalog = ctx.open()?;
    apply_ops(&catalog.store, &ops).context("import failed, nothing was written")?;

    if ctx.json {
        output_json(&summary);
    } else if !ctx.quiet {
        println!("Imported {}", summary.describe());
    }
    Ok(())
}

/// Writes every op in one batch.
pub fn apply_ops(store: &dyn DocumentStore, ops: &[ImportOp]) -> Result<()> {
    store.run_in_batch(&|batch| {
        for op in ops {
            batch.upsert_body(&op.collection, op.id.as_deref(), &op.seed, &op.body)?;
        }
        Ok(())
    })?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportSummary {
    dry_run: bool,
    total: usize,
    sheets: BTreeMap<&'static str, usize>,
}

impl ImportSummary {
    fn from_ops(ops: &[ImportOp], dry_run: bool) -> Self {
        let mut sheets: BTreeMap<&'static str, usize> =
            Sheet::ALL.iter().map(|s| (s.name(), 0)).collect();
        for op in ops {
            *sheets.entry(op.sheet.name()).or_default() += 1;
        }
        Self {
            dry_run,
            total: ops.len(),
            sheets,
        }
    }

    fn describe(&self) -> String {
        let count = |sheet: Sheet| self.sheets.get(sheet.name()).copied().unwrap_or(0);
        format!(
            "{} products, {} coverages, {} forms",
            count(Sheet::Products),
            count(Sheet::Coverages),
            count(Sheet::Forms)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::coverage::Coverage;
    use catalog_core::document::{FORMS, PRODUCTS, coverages_of};
    use catalog_core::form::Form;
    use catalog_core::product::Product;
    use catalog_sheets::{Row, Workbook};
    use catalog_storage::{DocumentStoreExt, SqliteStore};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn applies_products_and_coverages() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut wb = Workbook::default();
        wb.push(
            Sheet::Products,
            row(json!({"id": "p1", "name": "Homeowners", "formNumber": "HO 00 03"})),
        );
        wb.push(
            Sheet::Coverages,
            row(json!({"productId": "p1", "name": "Dwelling", "formNumber": "HO 00 03"})),
        );
        let ops = plan_import(&wb).unwrap();
        apply_ops(&store, &ops).unwrap();

        let product: Product = store.get(PRODUCTS, "p1").unwrap();
        assert_eq!(product.name, "Homeowners");
        let coverages: Vec<Coverage> = store.list(&coverages_of("p1")).unwrap();
        assert_eq!(coverages.len(), 1);
        assert_eq!(coverages[0].name, "Dwelling");
    }

    #[test]
    fn numeric_cells_read_back_as_records() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut wb = Workbook::default();
        wb.push(Sheet::Forms, row(json!({"formName": "Jacket", "formNumber": 1234})));
        wb.push(
            Sheet::Coverages,
            row(json!({"productId": "p1", "name": "Dwelling", "limits": [100000, 250000]})),
        );
        apply_ops(&store, &plan_import(&wb).unwrap()).unwrap();

        let forms: Vec<Form> = store.list(FORMS).unwrap();
        assert_eq!(forms[0].form_number, "1234");
        let coverages: Vec<Coverage> = store.list(&coverages_of("p1")).unwrap();
        assert_eq!(coverages[0].limits, vec!["100000", "250000"]);
    }

    #[test]
    fn summary_counts_each_sheet() {
        let mut wb = Workbook::default();
        wb.push(Sheet::Forms, row(json!({"formName": "Dwelling", "formNumber": "DP 00 01"})));
        let ops = plan_import(&wb).unwrap();
        let summary = ImportSummary::from_ops(&ops, true);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.describe(), "0 products, 0 coverages, 1 forms");
    }
}
