//! SQLite-backed storage implementation.

mod batch;
mod documents;
pub mod schema;
mod store;

pub use store::SqliteStore;
