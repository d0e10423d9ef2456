//! Pricing for the product catalog.
//!
//! A product's premium is computed from an ordered chain of factor and
//! operand steps. [`engine`] folds a chain into a total; [`chain`] keeps the
//! chain ordered and decides which steps a display filter highlights.

pub mod chain;
pub mod engine;

pub use engine::{PriceTotal, evaluate};
