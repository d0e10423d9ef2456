//! Fuzzy search across the whole catalog.
//!
//! A [`SearchIndex`] is built in memory from products, coverages, forms and
//! steps, then queried with [`SearchIndex::search`].

pub mod index;
pub mod score;

pub use index::{EntryKind, SearchEntry, SearchHit, SearchIndex};
pub use score::DEFAULT_THRESHOLD;
