//! Typed catalog operations: validated writes and the cross-collection
//! reads the console needs.

use serde_json::{Map, Value};
use tracing::debug;

use catalog_core::coverage::Coverage;
use catalog_core::dimension::Dimension;
use catalog_core::document::{
    COVERAGES, Document, FORMS, PRODUCTS, STEPS, coverages_of, dimensions_of, steps_of,
};
use catalog_core::form::Form;
use catalog_core::product::Product;
use catalog_core::step::Step;
use catalog_core::validation::{Validate, validate_dimension_slot};

use crate::error::{Result, StorageError};
use crate::traits::{Batch, DocumentStore, DocumentStoreExt};

// ---------------------------------------------------------------------------
// Validated writes
// ---------------------------------------------------------------------------

/// Validates and inserts a record, returning its id.
pub fn insert_record<T: Document + Validate>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &mut T,
) -> Result<String> {
    record.validate()?;
    store.create(collection, record)
}

/// Validates and replaces an existing record.
pub fn update_record<T: Document + Validate>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &T,
) -> Result<()> {
    record.validate()?;
    store.save(collection, record)
}

/// Fails with a typed not-found error unless the product exists.
pub fn require_product(store: &dyn DocumentStore, product_id: &str) -> Result<Product> {
    store.get(PRODUCTS, product_id)
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Writes only the `availableStates` field of a product.
pub fn set_available_states(
    store: &dyn DocumentStore,
    product_id: &str,
    states: &[String],
) -> Result<()> {
    let mut fields = Map::new();
    fields.insert("availableStates".into(), serde_json::to_value(states)?);
    match store.merge_doc(PRODUCTS, product_id, &fields) {
        Err(e) if e.is_not_found() => Err(StorageError::not_found(Product::KIND, product_id)),
        other => other,
    }
}

/// Deletes a product. With `recursive`, its coverages, steps and step
/// dimensions go too; otherwise they are left in place.
pub fn delete_product(store: &dyn DocumentStore, product_id: &str, recursive: bool) -> Result<usize> {
    if recursive {
        match store.delete_tree(PRODUCTS, product_id) {
            Err(e) if e.is_not_found() => Err(StorageError::not_found(Product::KIND, product_id)),
            other => other,
        }
    } else {
        store.remove::<Product>(PRODUCTS, product_id)?;
        Ok(1)
    }
}

// ---------------------------------------------------------------------------
// Coverages and forms
// ---------------------------------------------------------------------------

/// Every coverage of every product as `(product id, coverage)`.
pub fn all_coverages(store: &dyn DocumentStore) -> Result<Vec<(String, Coverage)>> {
    store.list_group_of(COVERAGES)
}

pub fn coverages(store: &dyn DocumentStore, product_id: &str) -> Result<Vec<Coverage>> {
    store.list(&coverages_of(product_id))
}

/// The form a coverage points at, matched by number and edition.
pub fn linked_form(store: &dyn DocumentStore, coverage: &Coverage) -> Result<Option<Form>> {
    let forms: Vec<Form> = store.list(FORMS)?;
    Ok(coverage.linked_form(&forms).cloned())
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// A product's steps sorted by `order` (ties keep storage order).
pub fn load_chain(store: &dyn DocumentStore, product_id: &str) -> Result<Vec<Step>> {
    let mut steps: Vec<Step> = store.list(&steps_of(product_id))?;
    steps.sort_by_key(|s| s.order);
    Ok(steps)
}

/// Every step of every product as `(product id, step)`.
pub fn all_steps(store: &dyn DocumentStore) -> Result<Vec<(String, Step)>> {
    store.list_group_of(STEPS)
}

/// Appends a step to the end of a product's chain.
pub fn append_step(store: &dyn DocumentStore, product_id: &str, step: &mut Step) -> Result<String> {
    require_product(store, product_id)?;
    let collection = steps_of(product_id);
    step.order = store.count_docs(&collection)? as i64;
    insert_record(store, &collection, step)
}

/// Persists the `order` of every step in one batch.
pub fn write_step_orders(store: &dyn DocumentStore, product_id: &str, steps: &[Step]) -> Result<()> {
    let collection = steps_of(product_id);
    store.run_in_batch(&|batch| merge_orders(batch, &collection, steps))?;
    debug!(product_id, count = steps.len(), "step order written");
    Ok(())
}

fn merge_orders(batch: &dyn Batch, collection: &str, steps: &[Step]) -> Result<()> {
    for step in steps {
        let mut fields = Map::new();
        fields.insert("order".into(), Value::from(step.order));
        batch.merge_doc(collection, &step.id, &fields)?;
    }
    Ok(())
}

/// Deletes a step and its table dimensions, and writes the `order` of the
/// `remaining` steps, in one batch. Either all of it lands or none of it.
pub fn delete_step(
    store: &dyn DocumentStore,
    product_id: &str,
    step_id: &str,
    remaining: &[Step],
) -> Result<()> {
    let collection = steps_of(product_id);
    store.get::<Step>(&collection, step_id)?;
    let dims_collection = dimensions_of(product_id, step_id);
    let dims = store.list_docs(&dims_collection)?;

    store.run_in_batch(&|batch| {
        for dim in &dims {
            batch.delete_doc(&dims_collection, &dim.id)?;
        }
        batch.delete_doc(&collection, step_id)?;
        let others: Vec<Step> = remaining.iter().filter(|s| s.id != step_id).cloned().collect();
        merge_orders(batch, &collection, &others)
    })?;
    debug!(product_id, step_id, dimensions = dims.len(), "step deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

pub fn dimensions(
    store: &dyn DocumentStore,
    product_id: &str,
    step_id: &str,
) -> Result<Vec<Dimension>> {
    store.list(&dimensions_of(product_id, step_id))
}

/// Adds or replaces a dimension after checking the step's axis slots.
pub fn save_dimension(
    store: &dyn DocumentStore,
    product_id: &str,
    step_id: &str,
    dimension: &mut Dimension,
) -> Result<String> {
    store.get::<Step>(&steps_of(product_id), step_id)?;
    dimension.validate()?;
    let existing = dimensions(store, product_id, step_id)?;
    validate_dimension_slot(&existing, dimension)?;

    let collection = dimensions_of(product_id, step_id);
    if dimension.id.is_empty() {
        store.create(&collection, dimension)
    } else {
        store.save(&collection, dimension)?;
        Ok(dimension.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteStore;
    use catalog_core::enums::{DimensionType, Operand};
    use catalog_core::step::StepBuilder;
    use pretty_assertions::assert_eq;

    fn store_with_product() -> (SqliteStore, String) {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut product = Product::new("Commercial Property", "CP 00 10");
        let id = insert_record(&store, PRODUCTS, &mut product).unwrap();
        (store, id)
    }

    #[test]
    fn insert_validates() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut product = Product::new("", "CP 00 10");
        let err = insert_record(&store, PRODUCTS, &mut product).unwrap_err();
        assert!(matches!(err, StorageError::Invalid(_)));
        assert_eq!(store.count_docs(PRODUCTS).unwrap(), 0);
    }

    #[test]
    fn append_assigns_order() {
        let (store, pid) = store_with_product();
        let mut a = StepBuilder::factor("Base").build();
        let mut b = StepBuilder::operand(Operand::Add).build();
        append_step(&store, &pid, &mut a).unwrap();
        append_step(&store, &pid, &mut b).unwrap();
        let chain = load_chain(&store, &pid).unwrap();
        let orders: Vec<i64> = chain.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(chain[1].operand, Operand::Add);
    }

    #[test]
    fn append_requires_product() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut step = StepBuilder::factor("Base").build();
        let err = append_step(&store, "missing", &mut step).unwrap_err();
        assert_eq!(err.to_string(), "product not found: missing");
    }

    #[test]
    fn write_orders_in_batch() {
        let (store, pid) = store_with_product();
        let mut a = StepBuilder::factor("A").build();
        let mut b = StepBuilder::factor("B").build();
        append_step(&store, &pid, &mut a).unwrap();
        append_step(&store, &pid, &mut b).unwrap();
        a.order = 1;
        b.order = 0;
        write_step_orders(&store, &pid, &[a, b]).unwrap();
        let names: Vec<String> = load_chain(&store, &pid)
            .unwrap()
            .into_iter()
            .map(|s| s.step_name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn delete_step_drops_dimensions() {
        let (store, pid) = store_with_product();
        let mut step = StepBuilder::factor("Construction").build();
        let sid = append_step(&store, &pid, &mut step).unwrap();
        let mut dim = Dimension::new("Class", "Frame,Masonry", "CLS", DimensionType::Row);
        save_dimension(&store, &pid, &sid, &mut dim).unwrap();

        delete_step(&store, &pid, &sid, &[]).unwrap();
        assert_eq!(store.count_docs(&dimensions_of(&pid, &sid)).unwrap(), 0);
        assert!(delete_step(&store, &pid, &sid, &[]).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_step_rewrites_remaining_order() {
        let (store, pid) = store_with_product();
        let mut a = StepBuilder::factor("A").build();
        let mut b = StepBuilder::factor("B").build();
        let mut c = StepBuilder::factor("C").build();
        append_step(&store, &pid, &mut a).unwrap();
        let bid = append_step(&store, &pid, &mut b).unwrap();
        append_step(&store, &pid, &mut c).unwrap();

        let mut remaining: Vec<Step> = load_chain(&store, &pid)
            .unwrap()
            .into_iter()
            .filter(|s| s.id != bid)
            .collect();
        for (i, step) in remaining.iter_mut().enumerate() {
            step.order = i as i64;
        }
        delete_step(&store, &pid, &bid, &remaining).unwrap();

        let chain = load_chain(&store, &pid).unwrap();
        let orders: Vec<(String, i64)> =
            chain.into_iter().map(|s| (s.step_name, s.order)).collect();
        assert_eq!(orders, vec![("A".to_string(), 0), ("C".to_string(), 1)]);
    }

    #[test]
    fn failed_renumber_keeps_the_step() {
        let (store, pid) = store_with_product();
        let mut a = StepBuilder::factor("A").build();
        let aid = append_step(&store, &pid, &mut a).unwrap();
        let mut dim = Dimension::new("Class", "Frame", "CLS", DimensionType::Row);
        save_dimension(&store, &pid, &aid, &mut dim).unwrap();

        let mut ghost = StepBuilder::factor("Ghost").build();
        ghost.id = "missing".into();
        assert!(delete_step(&store, &pid, &aid, &[ghost]).is_err());

        assert_eq!(load_chain(&store, &pid).unwrap().len(), 1);
        assert_eq!(store.count_docs(&dimensions_of(&pid, &aid)).unwrap(), 1);
    }

    #[test]
    fn dimension_slots_enforced() {
        let (store, pid) = store_with_product();
        let mut step = StepBuilder::factor("Construction").build();
        let sid = append_step(&store, &pid, &mut step).unwrap();

        let mut row = Dimension::new("Class", "Frame", "CLS", DimensionType::Row);
        save_dimension(&store, &pid, &sid, &mut row).unwrap();
        let mut dup = Dimension::new("Other", "X", "OTH", DimensionType::Row);
        assert!(save_dimension(&store, &pid, &sid, &mut dup).is_err());

        row.values = "Frame,Masonry".into();
        save_dimension(&store, &pid, &sid, &mut row).unwrap();
        let dims = dimensions(&store, &pid, &sid).unwrap();
        assert_eq!(dims.len(), 1);
        assert_eq!(dims[0].labels(), vec!["Frame", "Masonry"]);
    }

    #[test]
    fn states_merge_and_recursive_delete() {
        let (store, pid) = store_with_product();
        set_available_states(&store, &pid, &["CA".into(), "TX".into()]).unwrap();
        let product = require_product(&store, &pid).unwrap();
        assert_eq!(product.available_states, vec!["CA", "TX"]);
        assert_eq!(product.form_number, "CP 00 10");

        let mut cov = Coverage::new("Building", "CP 00 10");
        insert_record(&store, &coverages_of(&pid), &mut cov).unwrap();
        assert_eq!(all_coverages(&store).unwrap().len(), 1);
        assert_eq!(delete_product(&store, &pid, true).unwrap(), 2);
        assert!(all_coverages(&store).unwrap().is_empty());
    }

    #[test]
    fn linked_form_lookup() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut form = Form::new("Building and Personal Property", "CP 00 10", "10/12");
        insert_record(&store, FORMS, &mut form).unwrap();
        let cov = Coverage::new("Building", "CP 00 10");
        assert_eq!(linked_form(&store, &cov).unwrap().unwrap().id, form.id);
        let other = Coverage::new("Glass", "CP 99 99");
        assert!(linked_form(&store, &other).unwrap().is_none());
    }
}
