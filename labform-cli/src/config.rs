use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Records backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BackendConfig {
    /// Server URL (e.g., "https://lims.example.com")
    pub server_url: Option<String>,
    /// API key sent as a bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl BackendConfig {
    /// Returns true if the backend is configured (has both server_url and api_key)
    pub fn is_configured(&self) -> bool {
        self.server_url.is_some() && self.api_key.is_some()
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Form layout used for new records
    pub layout_path: ConfigValue<PathBuf>,
    /// Name recorded as the preparer of new records
    pub prepared_by: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    /// Backend configuration
    pub backend: BackendConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    layout_path: Option<PathBuf>,
    prepared_by: Option<String>,
    backend: Option<BackendConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut layout_path = ConfigValue::new(
            Self::default_data_dir().join("layout.yaml"),
            ConfigSource::Default,
        );
        let mut prepared_by = ConfigValue::new("default".to_string(), ConfigSource::Default);
        let mut config_file = None;
        let mut backend = BackendConfig::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(layout) = file_config.layout_path {
                layout_path = ConfigValue::new(resolve_against(&path, layout), ConfigSource::File);
            }
            if let Some(user) = file_config.prepared_by {
                prepared_by = ConfigValue::new(user, ConfigSource::File);
            }
            if let Some(backend_config) = file_config.backend {
                backend = backend_config;
            }
            config_file = Some(path);
        }

        if let Ok(layout) = std::env::var("LABFORM_LAYOUT_PATH") {
            layout_path = ConfigValue::new(PathBuf::from(layout), ConfigSource::Environment);
        }
        if let Ok(user) = std::env::var("LABFORM_PREPARED_BY") {
            prepared_by = ConfigValue::new(user, ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("LABFORM_SERVER_URL") {
            backend.server_url = Some(url);
        }
        if let Ok(key) = std::env::var("LABFORM_API_KEY") {
            backend.api_key = Some(key);
        }

        Ok(Self {
            layout_path,
            prepared_by,
            config_file,
            backend,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/labform/
    /// - macOS: ~/Library/Application Support/labform/
    /// - Windows: %APPDATA%/labform/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("labform")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/labform/
    /// - macOS: ~/Library/Application Support/labform/
    /// - Windows: %APPDATA%/labform/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("labform")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Relative paths in the config file are relative to the file itself.
fn resolve_against(config_path: &Path, value: PathBuf) -> PathBuf {
    if value.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&value))
            .unwrap_or(value)
    } else {
        value
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
