use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use toml_edit::{value, DocumentMut};

/// Keys accepted by `marquee config get` and `marquee config set`.
pub const KEYS: &[&str] = &[
    "catalog_path",
    "similarity_path",
    "top_k",
    "logging.level",
    "logging.coloured",
];

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Environment overrides for the `[logging]` table. The env layer only
/// produces top-level keys, so these are applied after the build.
const ENV_LOGGING_LEVEL: &str = "MARQUEE_LOGGING_LEVEL";
const ENV_LOGGING_COLOURED: &str = "MARQUEE_LOGGING_COLOURED";

/// Configuration for marquee.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (MARQUEE_* prefix)
/// 3. Config file (~/.config/marquee/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the movie catalog JSON.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/movies.json
    /// - ENV: MARQUEE_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/movies.json"
    /// - Default: ~/.local/share/marquee/movies.json
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Path to the similarity matrix JSON.
    ///
    /// Can be set via:
    /// - CLI: --similarity /path/to/similarity.json
    /// - ENV: MARQUEE_SIMILARITY_PATH
    /// - Config: similarity_path = "/path/to/similarity.json"
    /// - Default: ~/.local/share/marquee/similarity.json
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// Number of recommendations when `--top-k` is not given.
    #[serde(default = "default_top_k", deserialize_with = "native_or_text")]
    pub top_k: usize,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The `[logging]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default = "default_coloured", deserialize_with = "native_or_text")]
    pub coloured: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            similarity_path: default_similarity_path(),
            top_k: default_top_k(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            coloured: default_coloured(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/marquee/config.toml
    /// Reads environment variables with MARQUEE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from an explicit file path plus the environment.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("marquee");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let mut config: Self = builder.build().context("Failed to build configuration")?;
        config.logging.apply_env(|name| std::env::var(name).ok())?;
        config.logging.log_level()?;

        Ok(config)
    }

    /// Override artifact paths with values given on the command line.
    #[must_use]
    pub fn with_overrides(mut self, catalog: Option<PathBuf>, similarity: Option<PathBuf>) -> Self {
        if let Some(path) = catalog {
            self.catalog_path = path;
        }
        if let Some(path) = similarity {
            self.similarity_path = path;
        }
        self
    }

    /// Look up a single value by its dotted key.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "catalog_path" => self.catalog_path.display().to_string(),
            "similarity_path" => self.similarity_path.display().to_string(),
            "top_k" => self.top_k.to_string(),
            "logging.level" => self.logging.level.clone(),
            "logging.coloured" => self.logging.coloured.to_string(),
            _ => anyhow::bail!(unknown_key(key)),
        };
        Ok(value)
    }
}

impl LoggingConfig {
    /// Apply `MARQUEE_LOGGING_*` overrides found through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(level) = lookup(ENV_LOGGING_LEVEL) {
            self.level = level.trim().to_string();
        }
        if let Some(coloured) = lookup(ENV_LOGGING_COLOURED) {
            self.coloured = coloured.trim().parse().map_err(|_| {
                anyhow::anyhow!(
                    "{} must be true or false, got '{}'",
                    ENV_LOGGING_COLOURED,
                    coloured
                )
            })?;
        }
        Ok(())
    }

    /// The configured level as a twyg level.
    pub fn log_level(&self) -> Result<twyg::LogLevel> {
        parse_level(&self.level)
    }
}

fn parse_level(level: &str) -> Result<twyg::LogLevel> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(twyg::LogLevel::Trace),
        "debug" => Ok(twyg::LogLevel::Debug),
        "info" => Ok(twyg::LogLevel::Info),
        "warn" => Ok(twyg::LogLevel::Warn),
        "error" => Ok(twyg::LogLevel::Error),
        _ => anyhow::bail!(
            "Invalid logging level: {}\n\nValid levels: {}",
            level,
            LEVELS.join(", ")
        ),
    }
}

/// Install the global logger.
///
/// Logs go to stderr so that recommendation output on stdout stays
/// pipeable. `verbose` forces the debug level.
pub fn setup_logging(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        twyg::LogLevel::Debug
    } else {
        logging.log_level()?
    };

    let opts = twyg::OptsBuilder::new()
        .coloured(logging.coloured)
        .output(twyg::Output::Stderr)
        .level(level)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid logging options: {:?}", e))?;

    twyg::setup(opts).map_err(|e| anyhow::anyhow!("Could not set up logger: {:?}", e))?;

    Ok(())
}

/// A value written natively in the config file, or as a string by the
/// environment layer.
#[derive(Deserialize)]
#[serde(untagged)]
enum NativeOrText<T> {
    Native(T),
    Text(String),
}

fn native_or_text<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match NativeOrText::<T>::deserialize(deserializer)? {
        NativeOrText::Native(value) => Ok(value),
        NativeOrText::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn unknown_key(key: &str) -> String {
    format!("Unknown config key: {}\n\nValid keys: {}", key, KEYS.join(", "))
}

/// Apply `key = value` to TOML config text, keeping comments and layout.
pub fn update_document(contents: &str, key: &str, raw: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Failed to parse config file")?;

    match key {
        "catalog_path" | "similarity_path" => {
            doc[key] = value(raw);
        }
        "top_k" => {
            let top_k: i64 = raw
                .parse()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| anyhow::anyhow!("top_k must be a non-negative integer, got '{}'", raw))?;
            doc[key] = value(top_k);
        }
        "logging.level" => {
            parse_level(raw)?;
            ensure_table(&mut doc, "logging");
            doc["logging"]["level"] = value(raw.to_lowercase());
        }
        "logging.coloured" => {
            let coloured: bool = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("logging.coloured must be true or false, got '{}'", raw))?;
            ensure_table(&mut doc, "logging");
            doc["logging"]["coloured"] = value(coloured);
        }
        _ => anyhow::bail!(unknown_key(key)),
    }

    Ok(doc.to_string())
}

fn ensure_table(doc: &mut DocumentMut, name: &str) {
    if !doc.contains_key(name) {
        doc[name] = toml_edit::table();
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
}

fn default_catalog_path() -> PathBuf {
    data_dir().join("movies.json")
}

fn default_similarity_path() -> PathBuf {
    data_dir().join("similarity.json")
}

const fn default_top_k() -> usize {
    marquee_search::DEFAULT_TOP_K
}

fn default_level() -> String {
    String::from("warn")
}

const fn default_coloured() -> bool {
    true
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/marquee/config.toml
/// - macOS: ~/Library/Application Support/marquee/config.toml
/// - Windows: %APPDATA%\marquee\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Marquee Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (MARQUEE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Movie catalog: a JSON list of {"title": ...} records, or a column table
# such as {"title": {"0": "Avatar", ...}, "movie_id": {"0": 19995, ...}}
#
# Can also be set via:
# - CLI: marquee --catalog /custom/movies.json recommend Avatar
# - Environment: MARQUEE_CATALOG_PATH=/custom/movies.json
#
# Default: Platform-specific data directory
#catalog_path = "/path/to/movies.json"

# Similarity matrix: a JSON array of N rows of N scores, where row i
# belongs to catalog entry i
#
# Can also be set via:
# - CLI: marquee --similarity /custom/similarity.json recommend Avatar
# - Environment: MARQUEE_SIMILARITY_PATH=/custom/similarity.json
#
# Default: Platform-specific data directory
#similarity_path = "/path/to/similarity.json"

# Number of recommendations to show
top_k = 5

[logging]
# One of: trace, debug, info, warn, error
level = "warn"
coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    ensure_config_file_at(&config_file_path())
}

fn ensure_config_file_at(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
