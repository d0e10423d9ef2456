//! Collection paths and the [`Document`] trait shared by all records.
//!
//! Records live in named collections. Child records live in
//! subcollections addressed through their parent, e.g.
//! `products/{productId}/coverages`.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Top-level product collection.
pub const PRODUCTS: &str = "products";
/// Top-level form collection.
pub const FORMS: &str = "forms";
/// Top-level rule collection.
pub const RULES: &str = "rules";
/// Subcollection name of coverages under a product.
pub const COVERAGES: &str = "coverages";
/// Subcollection name of pricing steps under a product.
pub const STEPS: &str = "steps";
/// Subcollection name of table dimensions under a step.
pub const DIMENSIONS: &str = "dimensions";

/// Path of the coverages of one product.
pub fn coverages_of(product_id: &str) -> String {
    format!("{PRODUCTS}/{product_id}/{COVERAGES}")
}

/// Path of the pricing steps of one product.
pub fn steps_of(product_id: &str) -> String {
    format!("{PRODUCTS}/{product_id}/{STEPS}")
}

/// Path of the dimensions of one step.
pub fn dimensions_of(product_id: &str, step_id: &str) -> String {
    format!("{PRODUCTS}/{product_id}/{STEPS}/{step_id}/{DIMENSIONS}")
}

/// Returns the last segment of a collection path (`products/p1/coverages`
/// -> `coverages`). Collection-group queries match on this name.
pub fn group_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Returns the id of the parent document of a subcollection path, or `None`
/// for a top-level collection.
pub fn parent_id(path: &str) -> Option<&str> {
    let mut segments = path.rsplit('/');
    segments.next()?;
    segments.next()
}

/// A record stored as a JSON document keyed by an opaque id.
///
/// The id is not part of the stored body; stores inject it on read.
pub trait Document: Serialize + DeserializeOwned {
    /// Human-readable kind used in messages ("product", "coverage", ...).
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Name shown in listings and search results.
    fn display_name(&self) -> &str;
}
