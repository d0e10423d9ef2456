//! Atomic write batches for [`SqliteStore`].

use rusqlite::Connection;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::sqlite::documents;
use crate::sqlite::store::SqliteStore;
use crate::traits::Batch;

/// A connection that is inside an open transaction.
///
/// It implements [`Batch`] by delegating to the same connection-level
/// helpers used by [`SqliteStore`].
pub(crate) struct SqliteBatch<'a> {
    pub(crate) conn: &'a Connection,
}

impl Batch for SqliteBatch<'_> {
    fn doc_exists(&self, collection: &str, id: &str) -> Result<bool> {
        documents::doc_exists_on_conn(self.conn, collection, id)
    }

    fn put_doc(&self, collection: &str, id: &str, body: &Value) -> Result<()> {
        documents::put_doc_on_conn(self.conn, collection, id, body)
    }

    fn merge_doc(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<()> {
        documents::merge_doc_on_conn(self.conn, collection, id, fields)
    }

    fn delete_doc(&self, collection: &str, id: &str) -> Result<()> {
        documents::delete_doc_on_conn(self.conn, collection, id)
    }
}

// ---------------------------------------------------------------------------
// SqliteStore::run_in_batch
// ---------------------------------------------------------------------------

impl SqliteStore {
    /// Runs a closure inside a database transaction.
    ///
    /// Commits if the closure returns `Ok`; otherwise the transaction is
    /// rolled back when dropped and the closure's error is returned.
    pub fn run_in_batch_impl(&self, f: &dyn Fn(&dyn Batch) -> Result<()>) -> Result<()> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;

        let batch = SqliteBatch { conn: &tx };
        f(&batch)?;
        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
        debug!("batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{BatchExt, DocumentStore, DocumentStoreExt};
    use catalog_core::product::Product;
    use serde_json::json;

    fn test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn batch_commit() {
        let store = test_store();
        store
            .run_in_batch_impl(&|b| {
                b.put_doc("forms", "f1", &json!({"formName": "A"}))?;
                b.put_doc("forms", "f2", &json!({"formName": "B"}))?;
                Ok(())
            })
            .unwrap();
        assert_eq!(store.count_docs("forms").unwrap(), 2);
    }

    #[test]
    fn batch_rollback_on_error() {
        let store = test_store();
        let result = store.run_in_batch_impl(&|b| {
            b.put_doc("forms", "f1", &json!({"formName": "A"}))?;
            Err(StorageError::Internal("test rollback".into()))
        });
        assert!(result.is_err());
        assert!(!store.doc_exists("forms", "f1").unwrap());
    }

    #[test]
    fn upsert_assigns_distinct_ids_for_same_name() {
        let store = test_store();
        store
            .run_in_batch_impl(&|b| {
                b.upsert("products", &Product::new("Auto", "PP 00 01"))?;
                b.upsert("products", &Product::new("Auto", "PP 00 01"))?;
                Ok(())
            })
            .unwrap();
        let products: Vec<Product> = store.list("products").unwrap();
        assert_eq!(products.len(), 2);
        assert_ne!(products[0].id, products[1].id);
    }
}
