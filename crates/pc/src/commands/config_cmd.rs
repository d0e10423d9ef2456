//! `pc config` -- read and edit `config.yaml` (set/get/list).

use anyhow::{Context, Result};

use catalog_config::config::{get_value, list_values, set_value};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `pc config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Set(set_args) => {
            let dir = ctx.catalog_dir()?;
            let config = set_value(&dir, &set_args.key, &set_args.value)
                .with_context(|| format!("failed to set config key '{}'", set_args.key))?;
            let value = get_value(&config, &set_args.key)?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "key": set_args.key,
                    "value": value,
                }));
            } else if !ctx.quiet {
                println!("Set {} = {}", set_args.key, value);
            }
        }

        ConfigCommands::Get(get_args) => {
            let (_, config) = ctx.config()?;
            let value = get_value(&config, &get_args.key)?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "key": get_args.key,
                    "value": value,
                }));
            } else {
                println!("{value}");
            }
        }

        ConfigCommands::List => {
            let (_, config) = ctx.config()?;
            let entries = list_values(&config)?;

            if ctx.json {
                let map: serde_json::Map<String, serde_json::Value> = entries
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect();
                output_json(&map);
            } else {
                for (key, value) in &entries {
                    println!("{key} = {value}");
                }
            }
        }
    }

    Ok(())
}
