use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application data directory (catalog file, SQLite database)
    pub data_dir: PathBuf,

    /// Path to the place catalog JSON file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Route origin (where routes start from)
    #[serde(default)]
    pub origin: OriginConfig,

    /// Upstream provider settings
    #[serde(default)]
    pub providers: ProviderConfig,

    /// Admin settings
    #[serde(default)]
    pub admin: AdminConfig,
}

fn default_catalog_path() -> String {
    "places.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file name, relative to the data directory
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

fn default_db_file() -> String {
    "placebot.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file: default_db_file(),
        }
    }
}

/// Where routes start from. The transport does not supply a user location,
/// so the origin is a fixed, configured point (city center by default).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginConfig {
    /// Display label for the origin
    pub label: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for OriginConfig {
    fn default() -> Self {
        // Saint Petersburg city center
        Self {
            label: "City center".to_string(),
            latitude: 59.9343,
            longitude: 30.3351,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the Open-Meteo forecast API
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// Base URL of the Open-Meteo geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Base URL of the OSRM routing API
    #[serde(default = "default_routing_url")]
    pub routing_url: String,

    /// Per-call bound applied by the aggregation engine, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_routing_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_call_timeout_secs() -> u64 {
    7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            weather_url: default_weather_url(),
            geocoding_url: default_geocoding_url(),
            routing_url: default_routing_url(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    /// Caller ID granted access to `/stats`. Empty means no admin.
    #[serde(default)]
    pub caller_id: String,
}

impl AdminConfig {
    /// Check whether a caller ID matches the configured admin.
    pub fn is_admin(&self, caller_id: &str) -> bool {
        !self.caller_id.is_empty() && self.caller_id == caller_id
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("placebot");

        Self {
            data_dir,
            catalog_path: default_catalog_path(),
            storage: StorageConfig::default(),
            origin: OriginConfig::default(),
            providers: ProviderConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Resolved path to the catalog file.
    pub fn catalog_file(&self) -> PathBuf {
        let path = PathBuf::from(&self.catalog_path);
        if path.is_absolute() {
            path
        } else {
            self.data_dir.join(path)
        }
    }

    /// Resolved path to the SQLite database.
    pub fn db_file(&self) -> PathBuf {
        self.data_dir.join(&self.storage.db_file)
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.providers.weather_url, "providers.weather_url", &mut result);
        self.validate_url(
            &self.providers.geocoding_url,
            "providers.geocoding_url",
            &mut result,
        );
        self.validate_url(&self.providers.routing_url, "providers.routing_url", &mut result);

        if self.providers.call_timeout_secs == 0 {
            result.add_error(
                "providers.call_timeout_secs",
                "Provider call timeout must be greater than 0",
            );
        } else if self.providers.call_timeout_secs > 60 {
            result.add_warning(
                "providers.call_timeout_secs",
                "Provider call timeout is unusually long (>60s)",
            );
        }

        if !(-90.0..=90.0).contains(&self.origin.latitude) {
            result.add_error("origin.latitude", "Latitude must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.origin.longitude) {
            result.add_error("origin.longitude", "Longitude must be between -180 and 180");
        }

        if !self.catalog_file().exists() {
            result.add_warning(
                "catalog_path",
                format!("Catalog file does not exist: {}", self.catalog_file().display()),
            );
        }

        if self.admin.caller_id.is_empty() {
            result.add_warning("admin.caller_id", "No admin configured - /stats will be unavailable");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("placebot");

        Ok(config_dir.join("config.toml"))
    }
}
