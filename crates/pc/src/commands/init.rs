//! `pc init` -- create a catalog in the current directory.

use std::fs;

use anyhow::{Context, Result, bail};

use catalog_config::{CatalogConfig, ensure_catalog_dir, save_config};
use catalog_storage::{FsBlobStore, SqliteStore};

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Default gitignore content for the `.catalog` directory.
const GITIGNORE_CONTENT: &str = r#"# Catalog database files
*.db
*.db-journal
*.db-wal
*.db-shm

# Uploaded PDFs
blobs/
"#;

/// Execute the `pc init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let start = ctx.start()?;
    let config = CatalogConfig::default();
    let db_path = config.database_path(&start.join(catalog_config::CATALOG_DIR_NAME));

    if !args.force && db_path.exists() {
        bail!(
            "Found existing database at {}\n\n\
            This catalog is already initialized.\n\
            Use --force to re-initialize.",
            db_path.display()
        );
    }

    let catalog_dir = ensure_catalog_dir(&start)
        .with_context(|| format!("failed to create .catalog in {}", start.display()))?;

    let gitignore_path = catalog_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(&gitignore_path, GITIGNORE_CONTENT).with_context(|| {
            format!("failed to create .gitignore: {}", gitignore_path.display())
        })?;
    }

    if !catalog_dir.join("config.yaml").exists() {
        save_config(&catalog_dir, &config).context("failed to write config.yaml")?;
    }

    let db_path = config.database_path(&catalog_dir);
    SqliteStore::open(&db_path)
        .with_context(|| format!("failed to create database: {}", db_path.display()))?;
    FsBlobStore::open(config.blobs_path(&catalog_dir)).context("failed to create blob folder")?;

    if ctx.json {
        output_json(&serde_json::json!({
            "catalog": catalog_dir.display().to_string(),
            "database": db_path.display().to_string(),
        }));
    } else if !ctx.quiet {
        println!();
        println!("pc initialized successfully!");
        println!();
        println!("  Catalog: {}", catalog_dir.display());
        println!("  Database: {}", db_path.display());
        println!();
        println!("Run `pc product create \"My Product\" --form-number CP-00-10` to get started.");
        println!();
    }

    Ok(())
}
