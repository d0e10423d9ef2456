//! Configuration types and loading for the catalog console.
//!
//! [`CatalogConfig`] mirrors `.catalog/config.yaml`. [`load_config`] layers
//! the file over built-in defaults and under `PC_*` environment variables;
//! [`set_value`] edits one dotted key in the file.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// File name of the config inside the catalog directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Prefix of environment overrides, e.g. `PC_AI__MODEL`.
const ENV_PREFIX: &str = "PC_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("failed to merge configuration: {0}")]
    Layered(#[from] figment::Error),

    #[error("no .catalog directory found (run 'pc init' first)")]
    CatalogDirNotFound,

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite file, relative to the catalog directory unless absolute.
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

fn default_database() -> String {
    "catalog.db".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobConfig {
    #[serde(default = "default_blob_dir")]
    pub dir: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            dir: default_blob_dir(),
        }
    }
}

fn default_blob_dir() -> String {
    "blobs".to_string()
}

/// Chat completion settings used by `summarize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_ai_model")]
    pub model: String,

    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_api_key_env", rename = "api-key-env")]
    pub api_key_env: String,

    #[serde(default = "default_max_words", rename = "max-words")]
    pub max_words: usize,

    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            api_key_env: default_api_key_env(),
            max_words: default_max_words(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_ai_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_ai_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_words() -> usize {
    100_000
}

fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fuzzy match cutoff: 0 is exact, 1 matches anything.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    0.3
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub blobs: BlobConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub search: SearchConfig,

    /// Default to JSON output.
    #[serde(default)]
    pub json: bool,
}

impl CatalogConfig {
    pub fn database_path(&self, catalog_dir: &Path) -> PathBuf {
        catalog_dir.join(&self.store.database)
    }

    pub fn blobs_path(&self, catalog_dir: &Path) -> PathBuf {
        catalog_dir.join(&self.blobs.dir)
    }

    /// Range checks serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(ConfigError::InvalidValue {
                key: "search.threshold".into(),
                reason: "must be between 0 and 1".into(),
            });
        }
        if self.ai.max_words == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ai.max-words".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading and saving
// ---------------------------------------------------------------------------

fn read_file(catalog_dir: &Path) -> Result<Option<String>> {
    let path = catalog_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    // An empty file is valid and contributes nothing.
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}

/// `PC_AI__MAX_WORDS` becomes `ai.max-words`.
fn env_layer() -> Env {
    Env::prefixed(ENV_PREFIX)
        .split("__")
        .map(|key| key.as_str().replace('_', "-").into())
}

/// Defaults, then `config.yaml`, then `PC_*` variables (`__` nests).
pub fn config_figment(catalog_dir: &Path) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(CatalogConfig::default()));
    if let Some(content) = read_file(catalog_dir)? {
        figment = figment.merge(Yaml::string(&content));
    }
    Ok(figment.merge(env_layer()))
}

/// Loads the effective configuration for a catalog directory.
pub fn load_config(catalog_dir: &Path) -> Result<CatalogConfig> {
    extract(config_figment(catalog_dir)?)
}

fn extract(figment: Figment) -> Result<CatalogConfig> {
    let config: CatalogConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Writes `config` to `config.yaml`, creating the directory if needed.
pub fn save_config(catalog_dir: &Path, config: &CatalogConfig) -> Result<()> {
    std::fs::create_dir_all(catalog_dir)?;
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(catalog_dir.join(CONFIG_FILE), yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Dotted key access
// ---------------------------------------------------------------------------

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.')
        .try_fold(root, |node, part| node.as_mapping()?.get(part))
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// The value of a dotted key such as `ai.model`.
pub fn get_value(config: &CatalogConfig, key: &str) -> Result<String> {
    let tree = serde_yaml::to_value(config)?;
    match lookup(&tree, key) {
        Some(v) if !v.is_mapping() => Ok(render(v)),
        _ => Err(ConfigError::UnknownKey(key.to_string())),
    }
}

/// Every leaf as `(dotted key, value)`, in declaration order.
pub fn list_values(config: &CatalogConfig) -> Result<Vec<(String, String)>> {
    fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
        match value.as_mapping() {
            Some(map) => {
                for (k, v) in map {
                    let name = render(k);
                    let key = if prefix.is_empty() {
                        name
                    } else {
                        format!("{prefix}.{name}")
                    };
                    walk(&key, v, out);
                }
            }
            None => out.push((prefix.to_string(), render(value))),
        }
    }
    let tree = serde_yaml::to_value(config)?;
    let mut out = Vec::new();
    walk("", &tree, &mut out);
    Ok(out)
}

fn insert_path(map: &mut Mapping, parts: &[&str], value: Value) {
    let Some((head, rest)) = parts.split_first() else {
        return;
    };
    let key = Value::String((*head).to_string());
    if rest.is_empty() {
        map.insert(key, value);
        return;
    }
    let child = map
        .entry(key)
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if !child.is_mapping() {
        *child = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(inner) = child {
        insert_path(inner, rest, value);
    }
}

/// Sets one dotted key in `config.yaml`, leaving the other keys as written.
///
/// `raw` is read as a YAML scalar, so `true` and `0.5` keep their types.
/// The edited file must still load.
pub fn set_value(catalog_dir: &Path, key: &str, raw: &str) -> Result<CatalogConfig> {
    let defaults = serde_yaml::to_value(CatalogConfig::default())?;
    match lookup(&defaults, key) {
        Some(v) if !v.is_mapping() => {}
        _ => return Err(ConfigError::UnknownKey(key.to_string())),
    }

    let mut file: Mapping = match read_file(catalog_dir)? {
        Some(content) => serde_yaml::from_str(&content)?,
        None => Mapping::new(),
    };
    let value: Value = serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.into()));
    let parts: Vec<&str> = key.split('.').collect();
    insert_path(&mut file, &parts, value);

    let merged = Figment::from(Serialized::defaults(CatalogConfig::default()))
        .merge(Serialized::defaults(&file));
    let config = extract(merged).map_err(|e| match e {
        ConfigError::InvalidValue { .. } => e,
        other => ConfigError::InvalidValue {
            key: key.to_string(),
            reason: other.to_string(),
        },
    })?;

    std::fs::create_dir_all(catalog_dir)?;
    std::fs::write(catalog_dir.join(CONFIG_FILE), serde_yaml::to_string(&file)?)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
