//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the global flags; [`RuntimeContext::open`]
//! resolves the `.catalog` directory and hands back a [`Catalog`] with the
//! loaded configuration, the document store and the blob store.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use catalog_config::{CatalogConfig, find_catalog_dir, find_catalog_dir_or_error, load_config};
use catalog_storage::{FsBlobStore, SqliteStore};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Directory to start the `.catalog` search from.
    pub start_dir: Option<PathBuf>,

    /// Whether to produce JSON output (flag or `json: true` in config).
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,

    /// Skip delete confirmations.
    pub yes: bool,
}

/// An opened catalog: everything a command needs to read and write.
pub struct Catalog {
    pub dir: PathBuf,
    pub config: CatalogConfig,
    pub store: SqliteStore,
    pub blobs: FsBlobStore,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// A catalog whose config sets `json: true` turns JSON output on even
    /// without `--json`. A missing or unreadable config leaves it off.
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        let mut ctx = Self {
            start_dir: global.dir.clone(),
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
            yes: global.yes,
        };
        if !ctx.json {
            ctx.json = ctx
                .start()
                .ok()
                .and_then(|start| find_catalog_dir(&start))
                .and_then(|dir| load_config(&dir).ok())
                .is_some_and(|config| config.json);
        }
        ctx
    }

    /// The `--dir` value, or the working directory.
    pub fn start(&self) -> Result<PathBuf> {
        match &self.start_dir {
            Some(dir) => Ok(dir.clone()),
            None => env::current_dir().context("failed to get current directory"),
        }
    }

    /// Locates the `.catalog` directory.
    pub fn catalog_dir(&self) -> Result<PathBuf> {
        Ok(find_catalog_dir_or_error(&self.start()?)?)
    }

    /// Loads the configuration of the discovered catalog.
    pub fn config(&self) -> Result<(PathBuf, CatalogConfig)> {
        let dir = self.catalog_dir()?;
        let config = load_config(&dir)
            .with_context(|| format!("failed to load config in {}", dir.display()))?;
        Ok((dir, config))
    }

    /// Opens the catalog's store and blob folder.
    pub fn open(&self) -> Result<Catalog> {
        let (dir, config) = self.config()?;
        let db_path = config.database_path(&dir);
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("failed to open database: {}", db_path.display()))?;
        let blobs_path = config.blobs_path(&dir);
        let blobs = FsBlobStore::open(&blobs_path)
            .with_context(|| format!("failed to open blob store: {}", blobs_path.display()))?;
        debug!(catalog = %dir.display(), "opened catalog");
        Ok(Catalog {
            dir,
            config,
            store,
            blobs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_config::{ensure_catalog_dir, save_config};

    fn global(dir: PathBuf, json: bool) -> GlobalArgs {
        GlobalArgs {
            dir: Some(dir),
            json,
            verbose: false,
            quiet: false,
            yes: false,
        }
    }

    #[test]
    fn config_can_turn_on_json() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ensure_catalog_dir(tmp.path()).unwrap();
        let config = CatalogConfig {
            json: true,
            ..CatalogConfig::default()
        };
        save_config(&dir, &config).unwrap();

        let ctx = RuntimeContext::from_global_args(&global(tmp.path().to_path_buf(), false));
        assert!(ctx.json);
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = RuntimeContext::from_global_args(&global(tmp.path().to_path_buf(), false));
        assert!(!ctx.json);
        if env::var_os("PC_DIR").is_none() {
            let err = ctx.open().err().unwrap();
            assert!(format!("{err:#}").contains("pc init"));
        }
    }

    #[test]
    fn open_creates_database_and_blobs() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = ensure_catalog_dir(tmp.path()).unwrap();
        let ctx = RuntimeContext::from_global_args(&global(tmp.path().to_path_buf(), true));
        if env::var_os("PC_DIR").is_none() {
            let catalog = ctx.open().unwrap();
            assert!(dir.join("catalog.db").exists());
            assert!(catalog.blobs.root().ends_with("blobs"));
        }
    }
}
