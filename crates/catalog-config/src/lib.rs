//! Configuration management for the product catalog console.
//!
//! This crate discovers the `.catalog/` directory, loads
//! `.catalog/config.yaml` layered over built-in defaults and `PC_*`
//! environment variables, and edits individual keys in place.

pub mod catalog_dir;
pub mod config;

pub use catalog_dir::{CATALOG_DIR_NAME, ensure_catalog_dir, find_catalog_dir, find_catalog_dir_or_error};
pub use config::{CatalogConfig, ConfigError, Result, load_config, save_config};
