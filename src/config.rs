//! Configuration module for the catalog service.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file (`.carmatch/settings.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `CARMATCH_` and use double
//! underscores to separate nested levels:
//! - `CARMATCH_SERVER__BIND=0.0.0.0:9000` sets `server.bind`
//! - `CARMATCH_ASSETS__DATASET=/srv/cars.csv` sets `assets.dataset`
//! - `CARMATCH_PAGINATION__SALES_PAGE_SIZE=50` sets `pagination.sales_page_size`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Directory holding the settings file, searched for from the current directory upward.
pub const CONFIG_DIR: &str = ".carmatch";
pub const ENV_PREFIX: &str = "CARMATCH_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory relative asset paths are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Persisted artifacts
    #[serde(default)]
    pub assets: AssetsConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Page sizes for the listings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Logging levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Vehicle dataset (CSV)
    #[serde(default = "default_dataset_path")]
    pub dataset: PathBuf,

    /// Cluster id to display name mapping (JSON object)
    #[serde(default = "default_labels_path")]
    pub labels: PathBuf,

    /// Trained cluster model artifact (JSON)
    #[serde(default = "default_model_path")]
    pub model: PathBuf,

    /// Purchase-intent list (JSON array)
    #[serde(default = "default_orders_path")]
    pub orders: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Rows per catalog page
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: NonZeroUsize,

    /// Rows per page of prediction matches
    #[serde(default = "default_prediction_page_size")]
    pub prediction_page_size: NonZeroUsize,

    /// Rows per page of the sales listing
    #[serde(default = "default_sales_page_size")]
    pub sales_page_size: NonZeroUsize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for every target
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `"carmatch::catalog" = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 { 1 }
fn default_dataset_path() -> PathBuf { PathBuf::from("data/vehicles.csv") }
fn default_labels_path() -> PathBuf { PathBuf::from("data/cluster_labels.json") }
fn default_model_path() -> PathBuf { PathBuf::from("data/cluster_model.json") }
fn default_orders_path() -> PathBuf { PathBuf::from("data/orders.json") }
fn default_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_catalog_page_size() -> NonZeroUsize { NonZeroUsize::new(50).unwrap_or(NonZeroUsize::MIN) }
fn default_prediction_page_size() -> NonZeroUsize { NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN) }
fn default_sales_page_size() -> NonZeroUsize { NonZeroUsize::new(20).unwrap_or(NonZeroUsize::MIN) }
fn default_log_level() -> String { "info".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            assets: AssetsConfig::default(),
            server: ServerConfig::default(),
            pagination: PaginationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset_path(),
            labels: default_labels_path(),
            model: default_model_path(),
            orders: default_orders_path(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            catalog_page_size: default_catalog_page_size(),
            prediction_page_size: default_prediction_page_size(),
            sales_page_size: default_sales_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::figment(&config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings
            })
    }

    /// Load configuration from a specific file
    ///
    /// A file inside a `.carmatch/` directory makes that directory's parent
    /// the workspace root, as [`Settings::load`] would.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let path = path.as_ref();
        Self::figment(path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::root_of_config(path);
                }
                settings
            })
    }

    /// Workspace root implied by a settings file path, if it sits in the config directory.
    fn root_of_config(config_path: &Path) -> Option<PathBuf> {
        let absolute = std::path::absolute(config_path).ok()?;
        let config_dir = absolute.parent()?;
        if config_dir.file_name()? != CONFIG_DIR {
            return None;
        }
        config_dir.parent().map(Path::to_path_buf)
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nesting; single underscores stay in field names
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Find the settings file by looking for the config directory
    /// from the current directory up to the filesystem root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where `.carmatch` is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Resolve an asset path against the workspace root when it is relative
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.workspace_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.assets.dataset, PathBuf::from("data/vehicles.csv"));
        assert_eq!(settings.server.bind, "127.0.0.1:8080");
        assert_eq!(settings.pagination.catalog_page_size.get(), 50);
        assert_eq!(settings.pagination.prediction_page_size.get(), 10);
        assert_eq!(settings.pagination.sales_page_size.get(), 20);
        assert_eq!(settings.logging.default, "info");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");

        let toml_content = r#"
version = 2

[assets]
dataset = "/srv/carmatch/DatasetFinal.csv"

[server]
bind = "0.0.0.0:9000"

[pagination]
sales_page_size = 5

[logging.modules]
catalog = "debug"
"#;

        fs::write(&config_path, toml_content).unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.version, 2);
        assert_eq!(settings.assets.dataset, PathBuf::from("/srv/carmatch/DatasetFinal.csv"));
        // Unspecified asset paths keep their defaults
        assert_eq!(settings.assets.orders, PathBuf::from("data/orders.json"));
        assert_eq!(settings.server.bind, "0.0.0.0:9000");
        assert_eq!(settings.pagination.sales_page_size.get(), 5);
        assert_eq!(settings.pagination.catalog_page_size.get(), 50);
        assert_eq!(settings.logging.modules["catalog"], "debug");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[pagination]\ncatalog_page_size = 0\n").unwrap();

        assert!(Settings::load_from(&config_path).is_err());
    }

    #[test]
    fn test_save_settings() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested/settings.toml");

        let mut settings = Settings::default();
        settings.server.bind = "127.0.0.1:3000".to_string();
        settings.assets.model = PathBuf::from("models/segments.json");

        settings.save(&config_path).unwrap();

        let loaded = Settings::load_from(&config_path).unwrap();
        assert_eq!(loaded.server.bind, "127.0.0.1:3000");
        assert_eq!(loaded.assets.model, PathBuf::from("models/segments.json"));
    }

    #[test]
    fn test_load_from_sets_workspace_root() {
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let config_path = config_dir.join("settings.toml");
        fs::write(&config_path, "version = 1\n").unwrap();

        let settings = Settings::load_from(&config_path).unwrap();
        assert_eq!(settings.workspace_root.as_deref(), Some(temp_dir.path()));
        assert_eq!(
            settings.resolve(&settings.assets.dataset),
            temp_dir.path().join("data/vehicles.csv")
        );

        // A file outside the config directory implies no root
        let loose = temp_dir.path().join("custom.toml");
        fs::write(&loose, "version = 1\n").unwrap();
        assert_eq!(Settings::load_from(&loose).unwrap().workspace_root, None);

        // An explicit root in the file wins
        fs::write(&config_path, "workspace_root = \"/srv/carmatch\"\n").unwrap();
        assert_eq!(
            Settings::load_from(&config_path).unwrap().workspace_root,
            Some(PathBuf::from("/srv/carmatch"))
        );
    }

    #[test]
    fn test_resolve_relative_paths() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.resolve(Path::new("data/vehicles.csv")),
            PathBuf::from("data/vehicles.csv")
        );

        settings.workspace_root = Some(PathBuf::from("/srv/carmatch"));
        assert_eq!(
            settings.resolve(Path::new("data/vehicles.csv")),
            PathBuf::from("/srv/carmatch/data/vehicles.csv")
        );
        assert_eq!(
            settings.resolve(Path::new("/abs/orders.json")),
            PathBuf::from("/abs/orders.json")
        );
    }
}
