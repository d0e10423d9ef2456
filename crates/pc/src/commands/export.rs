//! `pc export` -- dump products, coverages and forms as a JSONL workbook.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use serde_json::Value;

use catalog_core::document::{COVERAGES, FORMS, PRODUCTS};
use catalog_sheets::jsonl::write_jsonl;
use catalog_sheets::workbook::PRODUCT_ID_COLUMN;
use catalog_sheets::{Row, Sheet, Workbook};
use catalog_storage::{DocumentStore, StoredDocument};

use crate::cli::ExportArgs;
use crate::context::RuntimeContext;

/// Execute the `pc export` command.
pub fn run(ctx: &RuntimeContext, args: &ExportArgs) -> Result<()> {
    let catalog = ctx.open()?;
    let workbook = build_workbook(&catalog.store)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_jsonl(&mut writer, &workbook)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !ctx.quiet {
                eprintln!(
                    "Exported {} products, {} coverages, {} forms to {}",
                    workbook.sheet(Sheet::Products).len(),
                    workbook.sheet(Sheet::Coverages).len(),
                    workbook.sheet(Sheet::Forms).len(),
                    path.display()
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_jsonl(&mut handle, &workbook).context("failed to write export")?;
            handle.flush().ok();
        }
    }
    Ok(())
}

fn to_row(doc: &StoredDocument) -> Row {
    match doc.to_value() {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

/// Collects the three sheets. Coverage rows carry their parent product's
/// id so an import can route them back.
pub fn build_workbook(store: &dyn DocumentStore) -> Result<Workbook> {
    let mut workbook = Workbook::default();
    for doc in store.list_docs(PRODUCTS).context("failed to load products")? {
        workbook.push(Sheet::Products, to_row(&doc));
    }
    for doc in store.list_group(COVERAGES).context("failed to load coverages")? {
        let mut row = to_row(&doc);
        if let Some(product_id) = doc.parent_id() {
            row.insert(PRODUCT_ID_COLUMN.into(), Value::String(product_id.to_string()));
        }
        workbook.push(Sheet::Coverages, row);
    }
    for doc in store.list_docs(FORMS).context("failed to load forms")? {
        workbook.push(Sheet::Forms, to_row(&doc));
    }
    Ok(workbook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::coverage::Coverage;
    use catalog_core::document::coverages_of;
    use catalog_core::product::Product;
    use catalog_storage::catalog::insert_record;
    use catalog_storage::SqliteStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn coverage_rows_carry_product_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut product = Product::new("Homeowners", "HO 00 03");
        let pid = insert_record(&store, PRODUCTS, &mut product).unwrap();
        let mut coverage = Coverage::new("Dwelling", "HO 00 03");
        insert_record(&store, &coverages_of(&pid), &mut coverage).unwrap();

        let workbook = build_workbook(&store).unwrap();
        assert_eq!(workbook.sheet(Sheet::Products).len(), 1);
        let row = &workbook.sheet(Sheet::Coverages)[0];
        assert_eq!(row[PRODUCT_ID_COLUMN], Value::String(pid));
        assert_eq!(row["name"], Value::String("Dwelling".into()));
        assert!(workbook.sheet(Sheet::Forms).is_empty());
    }
}
