//! # Configuration State
//!
//! Register configuration loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`CASHIER_*`)
//! 2. Config file (`CASHIER_CONFIG`, else `<platform config dir>/config.toml`)
//! 3. Defaults (this file)
//!
//! Configured values only seed the default [`Settings`] used until the
//! durable settings record loads. Once it has loaded, the stored record wins.
//!
//! ## Example `config.toml`
//! ```toml
//! database_path = "/var/lib/cashier/cashier.db"
//! store_name = "Corner Café"
//! tax_rate = "15"
//! currency = "SAR"
//! language = "en"
//! operator_name = "Front counter"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use cashier_core::{
    Currency, Language, Settings, StoreProfile, TaxRate, DEFAULT_STORE_NAME,
    DEFAULT_TAX_RATE_BPS,
};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the platform config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

const DATABASE_FILE_NAME: &str = "cashier.db";

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// No home directory to derive the default database location from.
    #[error("Could not determine app data directory")]
    NoDataDir,

    #[error("Cannot create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Register configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigState {
    /// SQLite file. `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Store name printed on receipts until the settings record loads.
    pub store_name: String,

    /// VAT as a percentage, e.g. `15` or `8.25`.
    pub tax_rate: Decimal,

    /// Display currency.
    pub currency: Currency,

    pub language: Language,

    /// Shown as the signed-in user when no identity provider is wired.
    pub operator_name: Option<String>,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            database_path: None,
            store_name: DEFAULT_STORE_NAME.to_string(),
            tax_rate: TaxRate::from_bps(DEFAULT_TAX_RATE_BPS).percentage(),
            currency: Currency::default(),
            language: Language::default(),
            operator_name: None,
        }
    }
}

impl ConfigState {
    /// Loads configuration from the config file and process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var_os("CASHIER_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => ProjectDirs::from("com", "cashier", "pos")
                .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
                .filter(|path| path.exists()),
        };
        Self::load_from(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Loads configuration from an optional file and an environment lookup.
    pub fn load_from(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => ConfigState::default(),
        };

        if let Some(path) = env("CASHIER_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(name) = env("CASHIER_STORE_NAME") {
            config.store_name = name;
        }

        if let Some(rate) = env("CASHIER_TAX_RATE") {
            config.tax_rate = Decimal::from_str(rate.trim()).map_err(|e| {
                ConfigError::InvalidValue {
                    key: "CASHIER_TAX_RATE".to_string(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(code) = env("CASHIER_CURRENCY") {
            config.currency =
                Currency::from_str(&code).map_err(|e| ConfigError::InvalidValue {
                    key: "CASHIER_CURRENCY".to_string(),
                    reason: e.to_string(),
                })?;
        }

        if let Some(operator) = env("CASHIER_OPERATOR") {
            config.operator_name = Some(operator).filter(|o| !o.trim().is_empty());
        }

        config.tax_rate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// The configured tax rate, validated.
    pub fn tax_rate(&self) -> Result<TaxRate, ConfigError> {
        TaxRate::from_percent(self.tax_rate)
            .filter(|rate| rate.bps() <= 10_000)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "tax_rate".to_string(),
                reason: format!("{} is not a percentage between 0 and 100", self.tax_rate),
            })
    }

    /// Settings used until the durable settings record loads.
    pub fn default_settings(&self) -> Settings {
        Settings {
            store: StoreProfile {
                name: self.store_name.clone(),
                ..StoreProfile::default()
            },
            tax_rate: self
                .tax_rate()
                .unwrap_or_else(|_| TaxRate::from_bps(DEFAULT_TAX_RATE_BPS)),
            currency: self.currency,
            language: self.language,
        }
    }

    /// Resolves the database file, creating the data directory if needed.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.cashier.pos/cashier.db`
    /// - **Windows**: `%APPDATA%\cashier\pos\data\cashier.db`
    /// - **Linux**: `~/.local/share/pos/cashier.db`
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let dirs = ProjectDirs::from("com", "cashier", "pos").ok_or(ConfigError::NoDataDir)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).map_err(|source| ConfigError::CreateDir {
            path: data_dir.to_path_buf(),
            source,
        })?;

        Ok(data_dir.join(DATABASE_FILE_NAME))
    }
}
