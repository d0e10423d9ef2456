//! Terminal rendering for the catalog console.
//!
//! Provides Ayu-themed styling, terminal detection, and the text layouts
//! used for pricing chains, state maps and rating tables.

pub mod layout;
pub mod styles;
pub mod terminal;
