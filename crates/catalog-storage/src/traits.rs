//! DocumentStore and Batch traits -- the public API for catalog persistence.
//!
//! Records are JSON documents addressed by a collection path and an id.
//! Consumers depend on these traits rather than on [`SqliteStore`] so tests
//! and other backends can be substituted.
//!
//! [`SqliteStore`]: crate::sqlite::SqliteStore

use chrono::Utc;
use serde_json::{Map, Value};

use catalog_core::document::{Document, parent_id};
use catalog_core::idgen::generate_id;

use crate::error::{Result, StorageError};

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// A document as stored: its address plus the JSON body (without `id`).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub collection: String,
    pub id: String,
    pub body: Value,
}

impl StoredDocument {
    /// Id of the parent document for subcollection entries.
    pub fn parent_id(&self) -> Option<&str> {
        parent_id(&self.collection)
    }

    /// The body with `id` injected, as a flat JSON object.
    pub fn to_value(&self) -> Value {
        let mut value = self.body.clone();
        if let Value::Object(map) = &mut value {
            map.insert("id".into(), Value::String(self.id.clone()));
        }
        value
    }

    /// Decodes the document into a typed record.
    pub fn decode<T: Document>(&self) -> Result<T> {
        serde_json::from_value(self.to_value()).map_err(|e| StorageError::Malformed {
            collection: self.collection.clone(),
            id: self.id.clone(),
            reason: e.to_string(),
        })
    }
}

/// Serializes a record into a stored body, dropping its `id` field.
pub fn encode_body<T: Document>(record: &T) -> Result<Value> {
    let mut value = serde_json::to_value(record)?;
    if let Value::Object(map) = &mut value {
        map.remove("id");
    }
    Ok(value)
}

/// Picks a fresh id for a record in `collection`, retrying on collision.
pub fn allocate_id(
    collection: &str,
    seed: &str,
    exists: &dyn Fn(&str) -> Result<bool>,
) -> Result<String> {
    let now = Utc::now();
    for nonce in 0..16 {
        let id = generate_id(collection, seed, now, nonce);
        if !exists(&id)? {
            return Ok(id);
        }
    }
    Err(StorageError::Internal(format!(
        "could not allocate a unique id in {collection}"
    )))
}

// ---------------------------------------------------------------------------
// DocumentStore trait
// ---------------------------------------------------------------------------

/// Persistent collections of JSON documents.
pub trait DocumentStore {
    /// Reads one document.
    fn get_doc(&self, collection: &str, id: &str) -> Result<StoredDocument>;

    /// Returns `true` if the document exists.
    fn doc_exists(&self, collection: &str, id: &str) -> Result<bool>;

    /// Lists a collection in insertion order.
    fn list_docs(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// Lists every subcollection named `group` across all parents.
    fn list_group(&self, group: &str) -> Result<Vec<StoredDocument>>;

    /// Counts the documents in a collection.
    fn count_docs(&self, collection: &str) -> Result<usize>;

    /// Inserts a new document; fails if the id is taken.
    fn insert_doc(&self, collection: &str, id: &str, body: &Value) -> Result<()>;

    /// Writes a document, replacing any existing body.
    fn put_doc(&self, collection: &str, id: &str, body: &Value) -> Result<()>;

    /// Merges `fields` into an existing document.
    fn merge_doc(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<()>;

    /// Deletes one document. Subcollections are left in place.
    fn delete_doc(&self, collection: &str, id: &str) -> Result<()>;

    /// Deletes a document and everything nested under it. Returns the number
    /// of documents removed.
    fn delete_tree(&self, collection: &str, id: &str) -> Result<usize>;

    /// Runs `f` against a batch whose writes commit together or not at all.
    fn run_in_batch(&self, f: &dyn Fn(&dyn Batch) -> Result<()>) -> Result<()>;
}

/// Write access inside [`DocumentStore::run_in_batch`].
pub trait Batch {
    fn doc_exists(&self, collection: &str, id: &str) -> Result<bool>;
    fn put_doc(&self, collection: &str, id: &str, body: &Value) -> Result<()>;
    fn merge_doc(&self, collection: &str, id: &str, fields: &Map<String, Value>) -> Result<()>;
    fn delete_doc(&self, collection: &str, id: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Typed helpers
// ---------------------------------------------------------------------------

/// Typed record access on top of [`DocumentStore`].
pub trait DocumentStoreExt: DocumentStore {
    fn get<T: Document>(&self, collection: &str, id: &str) -> Result<T> {
        match self.get_doc(collection, id) {
            Err(e) if e.is_not_found() => Err(StorageError::not_found(T::KIND, id)),
            other => other?.decode(),
        }
    }

    fn list<T: Document>(&self, collection: &str) -> Result<Vec<T>> {
        self.list_docs(collection)?
            .iter()
            .map(StoredDocument::decode)
            .collect()
    }

    /// Lists a collection group as `(parent id, record)` pairs.
    fn list_group_of<T: Document>(&self, group: &str) -> Result<Vec<(String, T)>> {
        self.list_group(group)?
            .iter()
            .map(|doc| {
                let parent = doc.parent_id().unwrap_or_default().to_owned();
                Ok((parent, doc.decode()?))
            })
            .collect()
    }

    /// Inserts a record, assigning a fresh id when it has none. The assigned
    /// id is written back into the record.
    fn create<T: Document>(&self, collection: &str, record: &mut T) -> Result<String> {
        if record.id().is_empty() {
            let id = allocate_id(collection, record.display_name(), &|id| {
                self.doc_exists(collection, id)
            })?;
            record.set_id(id);
        }
        self.insert_doc(collection, record.id(), &encode_body(record)?)?;
        Ok(record.id().to_owned())
    }

    /// Replaces an existing record.
    fn save<T: Document>(&self, collection: &str, record: &T) -> Result<()> {
        if !self.doc_exists(collection, record.id())? {
            return Err(StorageError::not_found(T::KIND, record.id()));
        }
        self.put_doc(collection, record.id(), &encode_body(record)?)
    }

    /// Deletes a record, reporting its kind when missing.
    fn remove<T: Document>(&self, collection: &str, id: &str) -> Result<()> {
        match self.delete_doc(collection, id) {
            Err(e) if e.is_not_found() => Err(StorageError::not_found(T::KIND, id)),
            other => other,
        }
    }
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {}

/// Typed writes on top of [`Batch`].
pub trait BatchExt: Batch {
    /// Writes a record, assigning a fresh id when it has none. Returns the id.
    fn upsert<T: Document>(&self, collection: &str, record: &T) -> Result<String> {
        let id = (!record.id().is_empty()).then(|| record.id());
        self.upsert_body(collection, id, record.display_name(), &encode_body(record)?)
    }

    /// Writes an untyped body under `id`, or under a fresh id derived from
    /// `seed` when `id` is `None`. Returns the id used.
    fn upsert_body(
        &self,
        collection: &str,
        id: Option<&str>,
        seed: &str,
        body: &Value,
    ) -> Result<String> {
        let id = match id {
            Some(id) => id.to_owned(),
            None => allocate_id(collection, seed, &|id| self.doc_exists(collection, id))?,
        };
        self.put_doc(collection, &id, body)?;
        Ok(id)
    }
}

impl<B: Batch + ?Sized> BatchExt for B {}
