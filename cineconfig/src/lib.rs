//! # CineTree Configuration Module
//!
//! This module provides configuration management for CineTree, including:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Type-safe getters and setters for configuration values
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use cineconfig::get_config;
//!
//! // Get the global configuration
//! let config = get_config();
//!
//! // Access configuration values
//! let language = config.get_tmdb_language();
//! let capacity = config.get_cache_capacity()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::info;

// Embedded default configuration
const DEFAULT_CONFIG: &str = include_str!("cinetree.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load CineTree configuration"));
}

const ENV_CONFIG_DIR: &str = "CINETREE_CONFIG";
const ENV_PREFIX: &str = "CINETREE_CONFIG__";

// Default values for configuration
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_CACHE_CAPACITY: usize = 1000;
const DEFAULT_CACHE_TTL_SECONDS: usize = 0;
const DEFAULT_CONNECT_TIMEOUT_SECONDS: usize = 10;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: usize = 30;
const DEFAULT_POOL_MAX_PER_HOST: usize = 8;
const DEFAULT_DISCOVER_PAGE_LIMIT: usize = 0;
const DEFAULT_YEARS_BACK: usize = 10;

/// Macro to generate getter/setter for usize values with default
macro_rules! impl_usize_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<usize> {
            match self.get_value($path)? {
                Value::Number(n) if n.is_i64() => Ok(n.as_i64().unwrap() as usize),
                Value::Number(n) if n.is_u64() => Ok(n.as_u64().unwrap() as usize),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, size: usize) -> Result<()> {
            let n = Number::from(size);
            self.set_value($path, Value::Number(n))
        }
    };
}

/// Macro to generate getter for string values with default
macro_rules! impl_string_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> String {
            match self.get_value($path) {
                Ok(Value::String(s)) if !s.is_empty() => s,
                _ => $default.to_string(),
            }
        }

        pub fn $setter(&self, value: String) -> Result<()> {
            self.set_value($path, Value::String(value))
        }
    };
}

/// Configuration manager for CineTree
///
/// This structure manages the application configuration, including:
/// - Loading configuration from YAML files
/// - Merging with default configuration
/// - Handling environment variable overrides
/// - Providing typed getters/setters for configuration values
///
/// # Examples
///
/// ```no_run
/// use cineconfig::get_config;
///
/// let config = get_config();
/// println!("TMDB base URL: {}", config.get_tmdb_base_url());
/// ```
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var = ENV_CONFIG_DIR, path = %env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(".cinetree").exists() {
            return ".cinetree".to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(".cinetree");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Default fallback
        ".cinetree".to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(anyhow!("Configuration path is not a directory"));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        // Test read permission
        fs::read_dir(path)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `CINETREE_CONFIG` environment variable
    /// 3. `.cinetree` in the current directory
    /// 4. `.cinetree` in the user's home directory
    ///
    /// The directory is created if it doesn't exist, and validated for
    /// read/write permissions.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created or validated
    pub fn config_dir(directory: &str) -> String {
        let dir_path = Self::find_config_dir(directory);
        let path = Path::new(&dir_path);

        Self::validate_config_dir(path).expect("Cannot validate configuration directory");

        dir_path
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    ///
    /// # Arguments
    ///
    /// * `directory` - The directory containing the config.yaml file, or empty to use defaults
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::config_dir(directory);
        info!(config_dir = %config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        let yaml_data = if let Ok(data) = fs::read(&path) {
            info!(config_file = %path, "Loaded config file");
            data
        } else {
            info!(config_file = %path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        merge_yaml(&mut default_value, &external_value);
        let mut config_value = Self::lower_keys_value(default_value);

        Self::apply_env_overrides(&mut config_value);

        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        config.save()?;
        Ok(config)
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let data = self.data.lock().unwrap();
        let yaml = serde_yaml::to_string(&*data)?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Returns the configuration directory in use
    pub fn dir(&self) -> &str {
        &self.config_dir
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["tmdb", "language"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        Self::set_value_internal(&mut data, path, value)?;
        drop(data);
        self.save()?;
        Ok(())
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key = path[0].to_lowercase();
            let key_value = Value::String(key);
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["cache", "capacity"]`)
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides(config: &mut Value) {
        for (key, value) in env::vars() {
            if key.starts_with(ENV_PREFIX) {
                let key_path = key
                    .trim_start_matches(ENV_PREFIX)
                    .split("__")
                    .collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        let new_key = Value::String(s.to_lowercase());
                        let new_val = Self::lower_keys_value(v);
                        new_map.insert(new_key, new_val);
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    // ============ TMDB ============

    /// Gets the TMDB API key
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured. The key is usually
    /// supplied through the `CINETREE_CONFIG__TMDB__API_KEY` environment
    /// variable or the `tmdb.api_key` entry of `config.yaml`.
    pub fn get_tmdb_api_key(&self) -> Result<String> {
        match self.get_value(&["tmdb", "api_key"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Err(anyhow!(
                "No TMDB API key configured (tmdb.api_key or CINETREE_CONFIG__TMDB__API_KEY)"
            )),
        }
    }

    /// Sets the TMDB API key
    pub fn set_tmdb_api_key(&self, key: String) -> Result<()> {
        self.set_value(&["tmdb", "api_key"], Value::String(key))
    }

    impl_string_config!(
        get_tmdb_base_url,
        set_tmdb_base_url,
        &["tmdb", "base_url"],
        DEFAULT_BASE_URL
    );

    impl_string_config!(
        get_tmdb_language,
        set_tmdb_language,
        &["tmdb", "language"],
        DEFAULT_LANGUAGE
    );

    impl_usize_config!(
        get_discover_page_limit,
        set_discover_page_limit,
        &["tmdb", "discover_page_limit"],
        DEFAULT_DISCOVER_PAGE_LIMIT
    );

    // ============ Cache ============

    impl_usize_config!(
        get_cache_capacity,
        set_cache_capacity,
        &["cache", "capacity"],
        DEFAULT_CACHE_CAPACITY
    );

    impl_usize_config!(
        get_cache_ttl_seconds,
        set_cache_ttl_seconds,
        &["cache", "ttl_seconds"],
        DEFAULT_CACHE_TTL_SECONDS
    );

    // ============ HTTP ============

    impl_usize_config!(
        get_http_connect_timeout_seconds,
        set_http_connect_timeout_seconds,
        &["http", "connect_timeout_seconds"],
        DEFAULT_CONNECT_TIMEOUT_SECONDS
    );

    impl_usize_config!(
        get_http_request_timeout_seconds,
        set_http_request_timeout_seconds,
        &["http", "request_timeout_seconds"],
        DEFAULT_REQUEST_TIMEOUT_SECONDS
    );

    impl_usize_config!(
        get_http_pool_max_per_host,
        set_http_pool_max_per_host,
        &["http", "pool_max_per_host"],
        DEFAULT_POOL_MAX_PER_HOST
    );

    // ============ Tree ============

    impl_usize_config!(
        get_years_back,
        set_years_back,
        &["tree", "years_back"],
        DEFAULT_YEARS_BACK
    );
}

/// Returns the global configuration instance
///
/// This function provides access to the singleton configuration instance,
/// which is lazily loaded on first access.
///
/// # Examples
///
/// ```no_run
/// use cineconfig::get_config;
///
/// let config = get_config();
/// let language = config.get_tmdb_language();
/// ```
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// This function recursively merges two YAML value trees:
/// - For mappings (objects), it merges keys from external into default
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        // Scalars and sequences are replaced wholesale
        (d, e) => *d = e.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(yaml: &str) -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        if !yaml.is_empty() {
            fs::write(dir.path().join("config.yaml"), yaml).unwrap();
        }
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_defaults_without_config_file() {
        let (_dir, config) = temp_config("");

        assert_eq!(config.get_tmdb_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.get_tmdb_language(), "en");
        assert_eq!(config.get_cache_capacity().unwrap(), 1000);
        assert_eq!(config.get_cache_ttl_seconds().unwrap(), 0);
        assert_eq!(config.get_http_pool_max_per_host().unwrap(), 8);
        assert_eq!(config.get_years_back().unwrap(), 10);
        assert!(config.get_tmdb_api_key().is_err());
    }

    #[test]
    fn test_external_file_overrides_defaults() {
        let yaml = "tmdb:\n  api_key: \"abc123\"\n  language: \"fr\"\ncache:\n  capacity: 50\n";
        let (_dir, config) = temp_config(yaml);

        assert_eq!(config.get_tmdb_api_key().unwrap(), "abc123");
        assert_eq!(config.get_tmdb_language(), "fr");
        assert_eq!(config.get_cache_capacity().unwrap(), 50);
        // Untouched sections keep their defaults
        assert_eq!(config.get_http_request_timeout_seconds().unwrap(), 30);
    }

    #[test]
    fn test_set_value_persists() {
        let (dir, config) = temp_config("");

        config.set_tmdb_api_key("zzz".to_string()).unwrap();
        config.set_cache_capacity(42).unwrap();

        // Reload from the same directory and check persistence
        let reloaded = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(reloaded.get_tmdb_api_key().unwrap(), "zzz");
        assert_eq!(reloaded.get_cache_capacity().unwrap(), 42);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let yaml = "TMDB:\n  LANGUAGE: \"de\"\n";
        let (_dir, config) = temp_config(yaml);
        assert_eq!(config.get_tmdb_language(), "de");
    }

    #[test]
    fn test_merge_yaml_nested() {
        let mut base: Value = serde_yaml::from_str("a:\n  b: 1\n  c: 2\n").unwrap();
        let ext: Value = serde_yaml::from_str("a:\n  c: 3\nd: 4\n").unwrap();
        merge_yaml(&mut base, &ext);

        let merged = Config {
            config_dir: String::new(),
            path: String::new(),
            data: Mutex::new(base),
        };
        assert_eq!(
            merged.get_value(&["a", "b"]).unwrap(),
            Value::Number(Number::from(1))
        );
        assert_eq!(
            merged.get_value(&["a", "c"]).unwrap(),
            Value::Number(Number::from(3))
        );
        assert_eq!(
            merged.get_value(&["d"]).unwrap(),
            Value::Number(Number::from(4))
        );
    }
}
