//! Document CRUD operations for [`SqliteStore`].

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::{Map, Value};
use tracing::debug;

use catalog_core::document::{group_name, parent_id};

use crate::error::{Result, StorageError};
use crate::sqlite::store::SqliteStore;
use crate::traits::StoredDocument;

// ---------------------------------------------------------------------------
// Connection-level helpers (shared with Batch)
// ---------------------------------------------------------------------------

fn row_to_document(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn decode_row((collection, id, body): (String, String, String)) -> Result<StoredDocument> {
    let body: Value = serde_json::from_str(&body)?;
    Ok(StoredDocument {
        collection,
        id,
        body,
    })
}

fn body_text(body: &Value) -> Result<String> {
    let mut body = body.clone();
    match &mut body {
        Value::Object(map) => {
            map.remove("id");
        }
        other => {
            return Err(StorageError::Internal(format!(
                "document body must be a JSON object, got {other}"
            )));
        }
    }
    Ok(serde_json::to_string(&body)?)
}

pub(crate) fn get_doc_on_conn(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> Result<StoredDocument> {
    let row = conn
        .query_row(
            "SELECT collection, id, body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            row_to_document,
        )
        .optional()?;
    match row {
        Some(row) => decode_row(row),
        None => Err(StorageError::not_found("document", format!("{collection}/{id}"))),
    }
}

pub(crate) fn doc_exists_on_conn(conn: &Connection, collection: &str, id: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1 AND id = ?2",
        params![collection, id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub(crate) fn list_docs_on_conn(conn: &Connection, collection: &str) -> Result<Vec<StoredDocument>> {
    let mut stmt = conn.prepare(
        "SELECT collection, id, body FROM documents WHERE collection = ?1 ORDER BY rowid",
    )?;
    let rows = stmt.query_map(params![collection], row_to_document)?;
    rows.map(|r| decode_row(r?)).collect()
}

pub(crate) fn list_group_on_conn(conn: &Connection, group: &str) -> Result<Vec<StoredDocument>> {
    let mut stmt = conn.prepare(
        "SELECT collection, id, body FROM documents
         WHERE group_name = ?1 AND parent_id IS NOT NULL
         ORDER BY collection, rowid",
    )?;
    let rows = stmt.query_map(params![group], row_to_document)?;
    rows.map(|r| decode_row(r?)).collect()
}

pub(crate) fn count_docs_on_conn(conn: &Connection, collection: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(count).unwrap_or(0))
}

pub(crate) fn insert_doc_on_conn(
    conn: &Connection,
    collection: &str,
    id: &str,
    body: &Value,
) -> Result<()> {
    if doc_exists_on_conn(conn, collection, id)? {
        return Err(StorageError::AlreadyExists {
            collection: collection.to_owned(),
            id: id.to_owned(),
        });
    }
    put_doc_on_conn(conn, collection, id, body)
}

/// Upserts a document. The row keeps its position (rowid) on update so
/// listings stay in insertion order.
pub(crate) fn put_doc_on_conn(
    conn: &Connection,
    collection: &str,
    id: &str,
    body: &Value,
) -> Result<()> {
    if id.is_empty() || id.contains('/') {
        return Err(StorageError::Internal(format!("invalid document id {id:?}")));
    }
    conn.execute(
        "INSERT INTO documents (collection, id, group_name, parent_id, body)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(collection, id) DO UPDATE SET
            body = excluded.body,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![
            collection,
            id,
            group_name(collection),
            parent_id(collection),
            body_text(body)?
        ],
    )?;
    debug!(collection, id, "document written");
    Ok(())
}

pub(crate) fn merge_doc_on_conn(
    conn: &Connection,
    collection: &str,
    id: &str,
    fields: &Map<String, Value>,
) -> Result<()> {
    let mut doc = get_doc_on_conn(conn, collection, id)?;
    if let Value::Object(map) = &mut doc.body {
        for (k, v) in fields {
            map.insert(k.clone(), v.clone());
        }
    }
    put_doc_on_conn(conn, collection, id, &doc.body)
}

pub(crate) fn delete_doc_on_conn(conn: &Connection, collection: &str, id: &str) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
        params![collection, id],
    )?;
    if n == 0 {
        return Err(StorageError::not_found("document", format!("{collection}/{id}")));
    }
    debug!(collection, id, "document deleted");
    Ok(())
}

/// Deletes a document and every document whose collection path is nested
/// under it.
pub(crate) fn delete_tree_on_conn(conn: &Connection, collection: &str, id: &str) -> Result<usize> {
    delete_doc_on_conn(conn, collection, id)?;
    let prefix = format!("{collection}/{id}/");
    let nested = conn.execute(
        "DELETE FROM documents WHERE substr(collection, 1, length(?1)) = ?1",
        params![prefix],
    )?;
    Ok(nested + 1)
}

// ---------------------------------------------------------------------------
// SqliteStore methods
// ---------------------------------------------------------------------------

impl SqliteStore {
    pub fn get_doc_impl(&self, collection: &str, id: &str) -> Result<StoredDocument> {
        let conn = self.lock_conn()?;
        get_doc_on_conn(&conn, collection, id)
    }

    pub fn doc_exists_impl(&self, collection: &str, id: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        doc_exists_on_conn(&conn, collection, id)
    }

    pub fn list_docs_impl(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let conn = self.lock_conn()?;
        list_docs_on_conn(&conn, collection)
    }

    pub fn list_group_impl(&self, group: &str) -> Result<Vec<StoredDocument>> {
        let conn = self.lock_conn()?;
        list_group_on_conn(&conn, group)
    }

    pub fn count_docs_impl(&self, collection: &str) -> Result<usize> {
        let conn = self.lock_conn()?;
        count_docs_on_conn(&conn, collection)
    }

    pub fn insert_doc_impl(&self, collection: &str, id: &str, body: &Value) -> Result<()> {
        let conn = self.lock_conn()?;
        insert_doc_on_conn(&conn, collection, id, body)
    }

    pub fn put_doc_impl(&self, collection: &str, id: &str, body: &Value) -> Result<()> {
        let conn = self.lock_conn()?;
        put_doc_on_conn(&conn, collection, id, body)
    }

    pub fn merge_doc_impl(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        let conn = self.lock_conn()?;
        merge_doc_on_conn(&conn, collection, id, fields)
    }

    pub fn delete_doc_impl(&self, collection: &str, id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        delete_doc_on_conn(&conn, collection, id)
    }

    pub fn delete_tree_impl(&self, collection: &str, id: &str) -> Result<usize> {
        let conn = self.lock_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Transaction(format!("failed to begin: {e}")))?;
        let removed = delete_tree_on_conn(&tx, collection, id)?;
        tx.commit()
            .map_err(|e| StorageError::Transaction(format!("failed to commit: {e}")))?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn put_and_get() {
        let store = test_store();
        store
            .put_doc_impl("products", "p1", &json!({"name": "Homeowners", "id": "ignored"}))
            .unwrap();
        let doc = store.get_doc_impl("products", "p1").unwrap();
        assert_eq!(doc.body, json!({"name": "Homeowners"}));
        assert_eq!(doc.to_value(), json!({"id": "p1", "name": "Homeowners"}));
    }

    #[test]
    fn get_missing_is_not_found() {
        let err = test_store().get_doc_impl("products", "nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn insert_rejects_duplicates() {
        let store = test_store();
        store.insert_doc_impl("forms", "f1", &json!({})).unwrap();
        let err = store.insert_doc_impl("forms", "f1", &json!({})).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn list_keeps_insertion_order_across_updates() {
        let store = test_store();
        for id in ["b", "a", "c"] {
            store.put_doc_impl("rules", id, &json!({"name": id})).unwrap();
        }
        store.put_doc_impl("rules", "b", &json!({"name": "B"})).unwrap();
        let ids: Vec<String> = store
            .list_docs_impl("rules")
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn group_spans_parents() {
        let store = test_store();
        store.put_doc_impl("products/p1/coverages", "c1", &json!({})).unwrap();
        store.put_doc_impl("products/p2/coverages", "c2", &json!({})).unwrap();
        store.put_doc_impl("products/p2/steps", "s1", &json!({})).unwrap();
        let docs = store.list_group_impl("coverages").unwrap();
        let parents: Vec<Option<&str>> = docs.iter().map(|d| d.parent_id()).collect();
        assert_eq!(parents, vec![Some("p1"), Some("p2")]);
    }

    #[test]
    fn merge_updates_only_given_fields() {
        let store = test_store();
        store
            .put_doc_impl("products", "p1", &json!({"name": "HO", "formNumber": "HO-3"}))
            .unwrap();
        let mut fields = Map::new();
        fields.insert("availableStates".into(), json!(["CA"]));
        store.merge_doc_impl("products", "p1", &fields).unwrap();
        let doc = store.get_doc_impl("products", "p1").unwrap();
        assert_eq!(
            doc.body,
            json!({"name": "HO", "formNumber": "HO-3", "availableStates": ["CA"]})
        );
    }

    #[test]
    fn delete_leaves_subcollections() {
        let store = test_store();
        store.put_doc_impl("products", "p1", &json!({})).unwrap();
        store.put_doc_impl("products/p1/steps", "s1", &json!({})).unwrap();
        store.delete_doc_impl("products", "p1").unwrap();
        assert_eq!(store.count_docs_impl("products/p1/steps").unwrap(), 1);
        assert!(store.delete_doc_impl("products", "p1").unwrap_err().is_not_found());
    }

    #[test]
    fn delete_tree_removes_nested() {
        let store = test_store();
        store.put_doc_impl("products", "p1", &json!({})).unwrap();
        store.put_doc_impl("products", "p10", &json!({})).unwrap();
        store.put_doc_impl("products/p1/steps", "s1", &json!({})).unwrap();
        store.put_doc_impl("products/p1/steps/s1/dimensions", "d1", &json!({})).unwrap();
        store.put_doc_impl("products/p10/steps", "s9", &json!({})).unwrap();
        assert_eq!(store.delete_tree_impl("products", "p1").unwrap(), 3);
        assert_eq!(store.count_docs_impl("products/p10/steps").unwrap(), 1);
    }

    #[test]
    fn rejects_non_object_bodies() {
        let store = test_store();
        assert!(store.put_doc_impl("forms", "f1", &json!([1, 2])).is_err());
        assert!(store.put_doc_impl("forms", "", &json!({})).is_err());
    }
}
