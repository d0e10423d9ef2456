//! Core types for the product catalog.
//!
//! Products own coverages and an ordered chain of pricing steps; forms and
//! rules are top-level collections. Everything here is plain data plus the
//! checks that run before a record is written.

pub mod coverage;
pub mod dimension;
pub mod document;
pub mod enums;
pub mod filter;
pub mod form;
pub mod idgen;
pub mod product;
pub mod rule;
pub mod states;
pub mod step;
pub mod validation;
