use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use hashkit_core::{
    Algorithm, DEEP_WEB_HASH, DEFAULT_CHUNK_SIZE, DEFAULT_MEMORY_LIMIT, Digest, EngineConfig,
    TargetDigestPolicy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub chunk_size: usize,
    pub memory_limit: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    /// Hex digests `hashkit check` hunts for when no `--target` is given
    pub targets: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub default_format: String,
    pub color_enabled: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            targets: vec![DEEP_WEB_HASH.to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "text".to_string(),
            color_enabled: true,
        }
    }
}

impl AppConfig {
    /// Engine configuration for `algorithms`, or the full bank when empty
    pub fn engine_config(&self, algorithms: &[Algorithm]) -> EngineConfig {
        let mut config = if algorithms.is_empty() {
            EngineConfig::default()
        } else {
            EngineConfig::with_algorithms(algorithms.iter().copied())
        };
        config.chunk_size = self.engine.chunk_size;
        config.memory_limit = self.engine.memory_limit;
        config
    }

    /// Target policy from explicit targets, falling back to the configured ones
    pub fn target_policy(&self, overrides: &[String]) -> Result<TargetDigestPolicy> {
        let targets = if overrides.is_empty() {
            self.matching.targets.as_slice()
        } else {
            overrides
        };
        TargetDigestPolicy::from_hex(targets).context("Invalid target digest")
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn get_config_path(&self) -> PathBuf {
        self.config_path.clone()
    }

    fn default_config_path() -> PathBuf {
        // XDG_CONFIG_HOME wins on Linux/macOS
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("hashkit/config.toml");
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hashkit")
            .join("config.toml")
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new();

        // Layer 1: Defaults
        figment = figment.merge(Serialized::defaults(AppConfig::default()));

        // Layer 2: Config file (if exists)
        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        // Layer 3: Environment variables
        figment = figment.merge(Env::prefixed("HASHKIT_").split("__"));

        figment.extract().context("Failed to load configuration")
    }

    /// Get a configuration value by key (dot notation)
    pub fn get(&self, key: &str) -> Result<String> {
        let value = self.load_as_toml()?;

        let mut current = &value;
        for part in key.split('.') {
            match current {
                toml::Value::Table(table) => {
                    current = table
                        .get(part)
                        .ok_or_else(|| anyhow::anyhow!("Key '{}' not found", key))?;
                }
                _ => anyhow::bail!("Invalid key path: {}", key),
            }
        }

        render_value(current).ok_or_else(|| anyhow::anyhow!("Value at '{}' is not a simple type", key))
    }

    /// Set a configuration value by key (dot notation)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed_value = parse_config_value(key, value)?;

        let mut config = if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            toml::from_str(&content)?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let parts: Vec<&str> = key.split('.').collect();
        let Some((last, sections)) = parts.split_last() else {
            anyhow::bail!("Empty key");
        };

        let mut current = &mut config;
        for part in sections {
            let toml::Value::Table(table) = current else {
                anyhow::bail!("Invalid key path: expected table at '{}'", part);
            };
            current = table
                .entry(part.to_string())
                .or_insert(toml::Value::Table(toml::map::Map::new()));
        }
        let toml::Value::Table(table) = current else {
            anyhow::bail!("Cannot set value on non-table");
        };
        table.insert(last.to_string(), parsed_value);

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, toml::to_string_pretty(&config)?)?;
        log::debug!("Set {key} in {}", self.config_path.display());

        Ok(())
    }

    /// List all configuration values
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let value = self.load_as_toml()?;

        let mut items = Vec::new();
        Self::collect_values(&value, String::new(), &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(items)
    }

    fn load_as_toml(&self) -> Result<toml::Value> {
        let toml_string = toml::to_string(&self.load()?)?;
        Ok(toml::from_str(&toml_string)?)
    }

    fn collect_values(value: &toml::Value, prefix: String, items: &mut Vec<(String, String)>) {
        match value {
            toml::Value::Table(table) => {
                for (key, val) in table {
                    let new_prefix = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    Self::collect_values(val, new_prefix, items);
                }
            }
            other => {
                if let Some(rendered) = render_value(other) {
                    items.push((prefix, rendered));
                }
            }
        }
    }
}

/// Scalars print as-is, arrays of scalars as a comma-separated list
fn render_value(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Array(values) => values
            .iter()
            .map(render_value)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        _ => None,
    }
}

/// Validate a value and convert it to the TOML type its key expects
fn parse_config_value(key: &str, value: &str) -> Result<toml::Value> {
    match key {
        "engine.chunk_size" | "engine.memory_limit" => {
            let size: i64 = value
                .parse()
                .with_context(|| format!("{key} must be a positive integer"))?;
            if size <= 0 {
                anyhow::bail!("{key} must be greater than 0");
            }
            Ok(toml::Value::Integer(size))
        }
        "matching.targets" => {
            let targets = value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| {
                    Digest::from_hex(t)
                        .map(|d| toml::Value::String(d.to_hex()))
                        .with_context(|| format!("'{t}' is not a hex digest"))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(toml::Value::Array(targets))
        }
        "output.default_format" => match value.to_lowercase().as_str() {
            format @ ("text" | "json" | "csv") => Ok(toml::Value::String(format.to_string())),
            _ => anyhow::bail!("default_format must be one of: text, json, csv"),
        },
        "output.color_enabled" => {
            let enabled: bool = value.parse().context("Value must be 'true' or 'false'")?;
            Ok(toml::Value::Boolean(enabled))
        }
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }
}

/// Load the configuration from the default location
pub fn get_config() -> Result<AppConfig> {
    ConfigManager::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("hashkit").join("config.toml"))
    }

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = manager(&temp_dir).load().unwrap();
        assert_eq!(config.engine.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.matching.targets, vec![DEEP_WEB_HASH.to_string()]);
        assert_eq!(config.output.default_format, "text");
    }

    #[test]
    fn test_engine_config_uses_settings() {
        let mut config = AppConfig::default();
        config.engine.chunk_size = 4096;

        let full = config.engine_config(&[]);
        assert_eq!(full.algorithms, Algorithm::ALL.to_vec());
        assert_eq!(full.chunk_size, 4096);

        let subset = config.engine_config(&[Algorithm::Lsh]);
        assert_eq!(subset.algorithms, vec![Algorithm::Lsh]);
        assert_eq!(subset.memory_limit, DEFAULT_MEMORY_LIMIT);
    }

    #[test]
    fn test_target_policy_prefers_overrides() {
        let config = AppConfig::default();
        let policy = config.target_policy(&[]).unwrap();
        assert_eq!(policy.targets()[0].to_hex(), DEEP_WEB_HASH);

        let policy = config.target_policy(&["abcd".to_string()]).unwrap();
        assert_eq!(policy.targets()[0].as_bytes(), &[0xab, 0xcd]);

        assert!(config.target_policy(&["xyz".to_string()]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(parse_config_value("engine.chunk_size", "0").is_err());
        assert!(parse_config_value("engine.chunk_size", "big").is_err());
        assert!(parse_config_value("output.default_format", "yaml").is_err());
        assert!(parse_config_value("output.color_enabled", "maybe").is_err());
        assert!(parse_config_value("matching.targets", "00,zz").is_err());
        assert!(parse_config_value("engine.unknown", "1").is_err());
    }

    #[test]
    fn test_render_arrays() {
        let value = toml::Value::Array(vec![
            toml::Value::String("aa".into()),
            toml::Value::String("bb".into()),
        ]);
        assert_eq!(render_value(&value).unwrap(), "aa,bb");
        assert!(render_value(&toml::Value::Table(toml::map::Map::new())).is_none());
    }
}
