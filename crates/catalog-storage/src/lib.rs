//! Storage backend for the product catalog.
//!
//! Provides the [`DocumentStore`] trait with a SQLite implementation
//! ([`SqliteStore`]), typed catalog operations in [`catalog`], and the
//! [`BlobStore`] used for uploaded form PDFs.

pub mod blob;
pub mod catalog;
pub mod error;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience.
pub use blob::{BlobStore, FsBlobStore};
pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::{Batch, BatchExt, DocumentStore, DocumentStoreExt, StoredDocument};

// ---------------------------------------------------------------------------
// DocumentStore trait implementation for SqliteStore
// ---------------------------------------------------------------------------

use serde_json::{Map, Value};

use crate::error::Result;

impl DocumentStore for SqliteStore {
    fn get_doc(&self, collection: &str, id: &str) -> Result<StoredDocument> {
        self.get_doc_impl(collection, id)
    }

    fn doc_exists(&self, collection: &str, id: &str) -> Result<bool> {
        self.doc_exists_impl(collection, id)
    }

    fn list_docs(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        self.list_docs_impl(collection)
    }

    fn list_group(&self, group: &str) -> Result<Vec<StoredDocument>> {
        self.list_group_impl(group)
    }

    fn count_docs(&self, collection: &str) -> Result<usize> {
        self.count_docs_impl(collection)
    }

    fn insert_doc(&self, collection: &str, id: &str, body: &Value) -> Result<()> {
        self.insert_doc_impl(collection, id, body)
    }

    fn put_doc(&self, collection: &str, id: &str, body: &Value) -> Result<()> {
        self.put_doc_impl(collection, id, body)
    }

    fn merge_doc(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<()> {
        self.merge_doc_impl(collection, id, fields)
    }

    fn delete_doc(&self, collection: &str, id: &str) -> Result<()> {
        self.delete_doc_impl(collection, id)
    }

    fn delete_tree(&self, collection: &str, id: &str) -> Result<usize> {
        self.delete_tree_impl(collection, id)
    }

    fn run_in_batch(&self, f: &dyn Fn(&dyn Batch) -> Result<()>) -> Result<()> {
        self.run_in_batch_impl(f)
    }
}
